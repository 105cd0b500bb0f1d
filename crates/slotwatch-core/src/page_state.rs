//! Page-state classification.

use std::fmt;
use std::time::Duration;

use slotwatch_config::{SelectorsConfig, TimeoutsConfig};
use tracing::{debug, info, warn};

use crate::date::{AppointmentDate, DateParser};
use crate::driver::PageDriver;
use crate::error::DriverError;

/// The UI state the booking page is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// An appointment is held and can be rescheduled.
    WithExistingAppointment,
    /// No appointment is held; a new one can be booked.
    WithoutExistingAppointment,
    /// Neither affordance showed up.
    Unknown,
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageState::WithExistingAppointment => write!(f, "with-existing-appointment"),
            PageState::WithoutExistingAppointment => write!(f, "without-existing-appointment"),
            PageState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of classifying the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub state: PageState,
    /// Date of the held appointment, when it could be read.
    pub existing: Option<AppointmentDate>,
}

/// Decides which [`PageState`] the page is in.
pub struct PageStateClassifier<'a> {
    selectors: &'a SelectorsConfig,
    timeouts: &'a TimeoutsConfig,
}

impl<'a> PageStateClassifier<'a> {
    pub fn new(selectors: &'a SelectorsConfig, timeouts: &'a TimeoutsConfig) -> Self {
        Self { selectors, timeouts }
    }

    /// Classify the current page.
    ///
    /// Fails only when the driver itself stops answering; a missing or
    /// unreadable appointment date still yields a classification.
    pub async fn classify(&self, page: &dyn PageDriver) -> Result<Classification, DriverError> {
        match page.wait_for_network_idle(self.timeouts.settle()).await {
            Ok(()) => {}
            Err(e) if e.is_timeout() => debug!("Page still busy after settle wait, classifying anyway"),
            Err(e) => return Err(e),
        }

        let visibility = self.timeouts.visibility();

        let classification = if is_visible(page, &self.selectors.manage_appointment, visibility).await? {
            if is_visible(page, &self.selectors.new_booking, Duration::ZERO).await? {
                warn!(
                    manage = %self.selectors.manage_appointment,
                    new_booking = %self.selectors.new_booking,
                    "Both appointment affordances are visible, treating the page as holding an appointment"
                );
            }
            Classification {
                state: PageState::WithExistingAppointment,
                existing: self.existing_date(page).await,
            }
        } else if is_visible(page, &self.selectors.new_booking, visibility).await? {
            Classification {
                state: PageState::WithoutExistingAppointment,
                existing: None,
            }
        } else {
            Classification {
                state: PageState::Unknown,
                existing: None,
            }
        };

        match classification.existing {
            Some(date) => info!(state = %classification.state, existing = %date, "Page classified"),
            None => info!(state = %classification.state, "Page classified"),
        }

        Ok(classification)
    }

    /// Read the held appointment date from the detail region.
    async fn existing_date(&self, page: &dyn PageDriver) -> Option<AppointmentDate> {
        let selector = &self.selectors.appointment_detail;

        let text = match page.locate(selector, self.timeouts.visibility()).await {
            Ok(element) => page.text_content(&element).await,
            Err(e) => Err(e),
        };

        match text {
            Ok(Some(text)) => match DateParser::extract(&text) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(selector = %selector, error = %e, "Could not read the held appointment date");
                    None
                }
            },
            Ok(None) => {
                warn!(selector = %selector, "Appointment detail region has no text");
                None
            }
            Err(e) => {
                warn!(selector = %selector, error = %e, "Appointment detail region not readable");
                None
            }
        }
    }
}

/// Visibility probe that treats "not there in time" as `false`.
async fn is_visible(page: &dyn PageDriver, selector: &str, timeout: Duration) -> Result<bool, DriverError> {
    match page.wait_for_visible(selector, timeout).await {
        Ok(()) => Ok(true),
        Err(e) if e.is_absence() => Ok(false),
        Err(e) => Err(e),
    }
}
