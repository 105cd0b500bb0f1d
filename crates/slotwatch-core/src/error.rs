//! Error types for the watcher core.

use thiserror::Error;

use crate::booking::BookingStep;
use crate::supervisor::IterationStage;

/// Rendered text did not hold a weekday-prefixed `DD.MM.YYYY` date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDateError {
    #[error("no weekday-prefixed DD.MM.YYYY date in {0:?}")]
    NoMatch(String),

    #[error("{day:02}.{month:02}.{year} is not a calendar date")]
    InvalidCalendarDate { day: u32, month: u32, year: i32 },
}

/// Failures reported by a [`PageDriver`](crate::PageDriver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// A bounded wait ran out.
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// The browser connection is gone.
    #[error("Session closed")]
    SessionClosed,

    /// The browser stopped answering protocol calls.
    #[error("Browser unresponsive: {0}")]
    Unresponsive(String),

    #[error("Driver error: {0}")]
    Other(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout(_))
    }

    /// Timeouts and missing elements both mean "not there (yet)".
    pub fn is_absence(&self) -> bool {
        matches!(self, DriverError::Timeout(_) | DriverError::ElementNotFound(_))
    }
}

/// The alert could not be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Alert failed: {0}")]
pub struct AlertError(pub String);

/// Errors raised inside one polling iteration.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    MalformedDate(#[from] MalformedDateError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("element {0} has no text")]
    EmptyElement(String),

    /// A named booking sub-step failed.
    #[error("booking step '{step}' failed: {source}")]
    BookingStepFailure {
        step: BookingStep,
        #[source]
        source: Box<WatchError>,
    },

    /// The page could not be driven before booking started.
    #[error("{stage} failed: {source}")]
    Iteration {
        stage: IterationStage,
        #[source]
        source: DriverError,
    },
}

impl WatchError {
    /// The booking step this error is attributed to, if any.
    pub fn step(&self) -> Option<BookingStep> {
        match self {
            WatchError::BookingStepFailure { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Attribute an error to the booking step it happened in.
pub(crate) trait AtStep<T> {
    fn at(self, step: BookingStep) -> Result<T, WatchError>;
}

impl<T, E: Into<WatchError>> AtStep<T> for Result<T, E> {
    fn at(self, step: BookingStep) -> Result<T, WatchError> {
        self.map_err(|e| WatchError::BookingStepFailure {
            step,
            source: Box::new(e.into()),
        })
    }
}
