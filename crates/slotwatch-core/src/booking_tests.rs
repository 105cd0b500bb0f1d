use super::*;
use crate::test_support::{CountingAlert, FakePage};

fn ymd(y: i32, m: u32, d: u32) -> AppointmentDate {
    AppointmentDate::from_ymd(y, m, d).unwrap()
}

async fn attempt(page: &FakePage, alert: &CountingAlert, state: PageState, target: AppointmentDate) -> BookingOutcome {
    let selectors = SelectorsConfig::default();
    let timeouts = TimeoutsConfig::default();
    BookingEngine::new(&selectors, &timeouts, alert)
        .attempt(page, state, target)
        .await
}

/// A page without an appointment offering `earliest` as first slot.
fn new_booking_page(earliest: &str) -> FakePage {
    FakePage::new()
        .visible("#newBookingBtn")
        .visible("#bookingListBtn")
        .visible("#bookBtn")
        .text("table.mat-table tbody tr:first-child td:first-child", earliest)
}

/// A page holding an appointment, offering `earliest` as first slot.
fn rebook_page(earliest: &str) -> FakePage {
    FakePage::new()
        .visible("#rebookBtn")
        .visible("#bookingListBtn")
        .text("table.mat-table tbody tr:first-child td:first-child", earliest)
}

const FIRST_SLOT: &str = "table.mat-table tbody tr:first-child td:first-child";

#[tokio::test(start_paused = true)]
async fn test_better_slot_is_booked_and_alerted() {
    let page = new_booking_page("Tu. 01.10.2024");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::Succeeded);
    assert_eq!(page.clicks(), vec!["#bookingListBtn", FIRST_SLOT, "#bookBtn"]);
    assert_eq!(alert.plays(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_existing_appointment_is_rescheduled_then_rebooked() {
    let page = rebook_page("We. 20.08.2025");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithExistingAppointment, ymd(2025, 8, 28)).await;

    assert_eq!(outcome, BookingOutcome::Succeeded);
    assert_eq!(
        page.clicks(),
        vec!["#rebookBtn", "#bookingListBtn", FIRST_SLOT, "#rebookBtn"]
    );
    assert_eq!(alert.plays(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_later_slot_is_not_attempted() {
    let page = rebook_page("Th. 01.09.2025");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithExistingAppointment, ymd(2025, 8, 28)).await;

    assert_eq!(outcome, BookingOutcome::NotAttempted);
    assert_eq!(page.clicks(), vec!["#rebookBtn", "#bookingListBtn"]);
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slot_on_target_date_is_not_attempted() {
    let page = new_booking_page("Fr. 15.08.2025");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2025, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::NotAttempted);
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slot_one_day_before_target_is_attempted() {
    let page = new_booking_page("Th. 14.08.2025");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2025, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::Succeeded);
    assert!(page.clicks().contains(&FIRST_SLOT.to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_failed_confirmation_never_alerts() {
    let page = new_booking_page("Tu. 01.10.2024").failing_click("#bookBtn");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::Confirm));
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_confirmation_button_never_alerts() {
    let page = FakePage::new()
        .visible("#bookingListBtn")
        .text(FIRST_SLOT, "Tu. 01.10.2024");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::Confirm));
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_selection_stops_before_confirm() {
    let page = new_booking_page("Tu. 01.10.2024").failing_click(FIRST_SLOT);
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::Select));
    assert_eq!(page.clicks(), vec!["#bookingListBtn"]);
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_reschedule_stops_sequence() {
    let page = rebook_page("Tu. 01.10.2024").failing_click("#rebookBtn");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::Reschedule));
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_slot_list_button() {
    let page = FakePage::new().visible("#newBookingBtn");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::OpenSlotList));
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_earliest_is_a_hard_stop() {
    let page = new_booking_page("No appointments available");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::ParseEarliest));
    assert_eq!(page.clicks(), vec!["#bookingListBtn"]);
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_empty_slot_cell_is_a_hard_stop() {
    let page = new_booking_page("   ");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::ParseEarliest));
}

#[tokio::test(start_paused = true)]
async fn test_listing_never_rendered() {
    let page = FakePage::new().visible("#bookingListBtn");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::ParseEarliest));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_state_proceeds_best_effort() {
    let page = new_booking_page("Tu. 01.10.2024");
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::Unknown, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::Succeeded);
    assert_eq!(page.clicks(), vec!["#bookingListBtn", FIRST_SLOT, "#bookBtn"]);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_state_without_listing_fails_quietly() {
    let page = FakePage::new();
    let alert = CountingAlert::new();

    let outcome = attempt(&page, &alert, PageState::Unknown, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::FailedAtStep(BookingStep::OpenSlotList));
    assert_eq!(alert.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_alert_failure_does_not_undo_success() {
    let page = new_booking_page("Tu. 01.10.2024");
    let alert = CountingAlert::failing();

    let outcome = attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2026, 8, 15)).await;

    assert_eq!(outcome, BookingOutcome::Succeeded);
    assert_eq!(alert.plays(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_waits_for_listing_to_render() {
    let page = new_booking_page("Th. 01.09.2025");
    let alert = CountingAlert::new();
    let start = tokio::time::Instant::now();

    attempt(&page, &alert, PageState::WithoutExistingAppointment, ymd(2025, 8, 28)).await;

    assert!(start.elapsed() >= TimeoutsConfig::default().listing_render());
}

#[test]
fn test_step_names() {
    assert_eq!(BookingStep::Reschedule.to_string(), "reschedule");
    assert_eq!(BookingStep::OpenSlotList.to_string(), "open-slot-list");
    assert_eq!(BookingStep::ParseEarliest.to_string(), "parse-earliest");
    assert_eq!(BookingStep::Select.to_string(), "select");
    assert_eq!(BookingStep::Confirm.to_string(), "confirm");
}

#[test]
fn test_outcome_display() {
    assert_eq!(BookingOutcome::NotAttempted.to_string(), "not-attempted");
    assert_eq!(BookingOutcome::Succeeded.to_string(), "succeeded");
    assert_eq!(
        BookingOutcome::FailedAtStep(BookingStep::Select).to_string(),
        "failed-at-select"
    );
}
