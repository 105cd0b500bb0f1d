//! Booking decision and the click sequence that carries it out.

use std::fmt;

use slotwatch_config::{SelectorsConfig, TimeoutsConfig};
use tracing::{info, warn};

use crate::date::{AppointmentDate, DateParser};
use crate::driver::{Alert, PageDriver};
use crate::error::{AtStep, WatchError};
use crate::page_state::PageState;

/// Named sub-steps of a booking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Reschedule,
    OpenSlotList,
    ParseEarliest,
    Select,
    Confirm,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Reschedule => "reschedule",
            BookingStep::OpenSlotList => "open-slot-list",
            BookingStep::ParseEarliest => "parse-earliest",
            BookingStep::Select => "select",
            BookingStep::Confirm => "confirm",
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one booking attempt came to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The earliest offer was not earlier than the target.
    NotAttempted,
    /// The slot was selected and confirmed.
    Succeeded,
    /// The sequence stopped at this step.
    FailedAtStep(BookingStep),
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::NotAttempted => write!(f, "not-attempted"),
            BookingOutcome::Succeeded => write!(f, "succeeded"),
            BookingOutcome::FailedAtStep(step) => write!(f, "failed-at-{}", step),
        }
    }
}

/// Drives one pass of the booking sequence.
///
/// There is no retry inside a pass: a failed step ends it and the next
/// polling iteration starts over from a freshly loaded page.
pub struct BookingEngine<'a> {
    selectors: &'a SelectorsConfig,
    timeouts: &'a TimeoutsConfig,
    alert: &'a dyn Alert,
}

impl<'a> BookingEngine<'a> {
    pub fn new(selectors: &'a SelectorsConfig, timeouts: &'a TimeoutsConfig, alert: &'a dyn Alert) -> Self {
        Self {
            selectors,
            timeouts,
            alert,
        }
    }

    /// Look at the earliest offered slot and book it if it beats `target`.
    pub async fn attempt(&self, page: &dyn PageDriver, state: PageState, target: AppointmentDate) -> BookingOutcome {
        match self.run(page, state, target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let step = e.step().unwrap_or(BookingStep::OpenSlotList);
                warn!(step = %step, state = %state, error = %e, "Booking attempt stopped");
                BookingOutcome::FailedAtStep(step)
            }
        }
    }

    async fn run(&self, page: &dyn PageDriver, state: PageState, target: AppointmentDate) -> Result<BookingOutcome, WatchError> {
        let click = self.timeouts.click();

        match state {
            PageState::WithExistingAppointment => {
                page.click(&self.selectors.manage_appointment, click)
                    .await
                    .at(BookingStep::Reschedule)?;
            }
            PageState::WithoutExistingAppointment => {}
            PageState::Unknown => {
                info!("Page state unknown, trying the slot listing anyway");
            }
        }

        page.click(&self.selectors.open_slot_list, click)
            .await
            .at(BookingStep::OpenSlotList)?;

        // The listing is filled in asynchronously and signals nothing when done.
        tokio::time::sleep(self.timeouts.listing_render()).await;

        let earliest = self.earliest_offered(page).await.at(BookingStep::ParseEarliest)?;
        let is_better = earliest < target;
        info!(
            earliest = %earliest,
            target = %target,
            is_better,
            "Earliest offered slot compared against target"
        );

        if !is_better {
            return Ok(BookingOutcome::NotAttempted);
        }

        page.click(&self.selectors.first_slot, click)
            .await
            .at(BookingStep::Select)?;
        info!(slot = %earliest, "Selected earliest slot");

        let confirm = match state {
            PageState::WithExistingAppointment => &self.selectors.confirm_rebook,
            PageState::WithoutExistingAppointment | PageState::Unknown => &self.selectors.confirm_book,
        };
        page.click(confirm, click).await.at(BookingStep::Confirm)?;
        info!(slot = %earliest, state = %state, "Booking confirmed");

        if let Err(e) = self.alert.play_alert().await {
            warn!(error = %e, "Booking confirmed but the alert could not be played");
        }

        Ok(BookingOutcome::Succeeded)
    }

    async fn earliest_offered(&self, page: &dyn PageDriver) -> Result<AppointmentDate, WatchError> {
        let selector = &self.selectors.first_slot;
        let cell = page.locate(selector, self.timeouts.slot_cell()).await?;
        let text = page
            .text_content(&cell)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| WatchError::EmptyElement(selector.clone()))?;

        Ok(DateParser::parse(&text)?)
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
