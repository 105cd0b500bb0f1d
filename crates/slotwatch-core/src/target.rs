//! The date an offered slot has to beat.

use crate::date::AppointmentDate;

/// Fold the configured deadline and the currently held appointment into the
/// threshold for this iteration.
///
/// A held appointment only tightens the threshold; it never loosens it past
/// the deadline.
pub fn resolve_target(deadline: AppointmentDate, existing: Option<AppointmentDate>) -> AppointmentDate {
    match existing {
        Some(held) if held < deadline => held,
        _ => deadline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> AppointmentDate {
        AppointmentDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_no_existing_uses_deadline() {
        let deadline = ymd(2026, 8, 15);
        assert_eq!(resolve_target(deadline, None), deadline);
    }

    #[test]
    fn test_earlier_existing_wins() {
        let deadline = ymd(2026, 8, 15);
        let held = ymd(2025, 8, 28);
        assert_eq!(resolve_target(deadline, Some(held)), held);
    }

    #[test]
    fn test_later_existing_is_ignored() {
        let deadline = ymd(2025, 8, 15);
        assert_eq!(resolve_target(deadline, Some(ymd(2025, 9, 1))), deadline);
    }

    #[test]
    fn test_equal_existing_yields_deadline() {
        let deadline = ymd(2025, 8, 15);
        assert_eq!(resolve_target(deadline, Some(deadline)), deadline);
    }

    #[test]
    fn test_result_never_exceeds_deadline_and_is_idempotent() {
        let deadline = ymd(2025, 8, 15);
        let start = ymd(2025, 1, 1).as_naive();
        for offset in 0..365 {
            let held = AppointmentDate::from(start + chrono::Days::new(offset));
            let target = resolve_target(deadline, Some(held));
            assert!(target <= deadline);
            if held < deadline {
                assert_eq!(target, held);
            } else {
                assert_eq!(target, deadline);
            }
            assert_eq!(resolve_target(deadline, Some(held)), target);
            assert_eq!(resolve_target(target, Some(held)), target);
        }
    }
}
