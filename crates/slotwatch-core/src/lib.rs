//! # slotwatch Core
//!
//! Page-state detection and the decision/booking state machine.
//!
//! One polling iteration runs strictly in this order:
//!
//! 1. [`PageStateClassifier`] decides which [`PageState`] the page is in and
//!    extracts the held appointment date, if any.
//! 2. [`resolve_target`] folds the configured deadline and the held date into
//!    the single [`AppointmentDate`] that an offered slot must beat.
//! 3. [`BookingEngine`] opens the slot listing, parses the earliest offer and,
//!    when it is strictly earlier than the target, books it.
//!
//! [`PollingSupervisor`] repeats that forever, isolating failures per
//! iteration, until a [`ShutdownSignal`] stops it.
//!
//! The browser and the alert are reached only through the [`PageDriver`] and
//! [`Alert`] traits.

mod booking;
mod date;
mod driver;
mod error;
mod page_state;
mod signal;
mod supervisor;
mod target;

#[cfg(test)]
mod test_support;

pub use booking::{BookingEngine, BookingOutcome, BookingStep};
pub use date::{AppointmentDate, DateParser};
pub use driver::{Alert, ElementHandle, PageDriver};
pub use error::{AlertError, DriverError, MalformedDateError, WatchError};
pub use page_state::{Classification, PageState, PageStateClassifier};
pub use signal::ShutdownSignal;
pub use supervisor::{IterationReport, IterationStage, PollingSupervisor, SupervisorState};
pub use target::resolve_target;
