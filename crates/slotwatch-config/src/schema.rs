//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub watch: WatchConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub selectors: SelectorsConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub alert: AlertConfig,
}

impl Config {
    /// Build a configuration with defaults for everything but the required
    /// `[watch]` fields.
    pub fn new(deadline: NaiveDate, session_url: impl Into<String>) -> Self {
        Self {
            watch: WatchConfig {
                deadline,
                polling_interval_seconds: default_polling_interval(),
                session_url: session_url.into(),
            },
            timeouts: TimeoutsConfig::default(),
            selectors: SelectorsConfig::default(),
            browser: BrowserConfig::default(),
            alert: AlertConfig::default(),
        }
    }
}

/// What to watch and the date that must be beaten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Last acceptable appointment date (`YYYY-MM-DD`).
    pub deadline: NaiveDate,

    /// Pause between polling iterations.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,

    /// Session URL carrying the access token.
    pub session_url: String,
}

impl WatchConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_seconds)
    }
}

fn default_polling_interval() -> u64 {
    5
}

/// Upper bounds for every wait performed against the page, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Network-idle wait after navigation and before classification.
    #[serde(default = "default_settle")]
    pub settle: u64,

    /// Visibility probe for state-defining affordances.
    #[serde(default = "default_visibility")]
    pub visibility: u64,

    /// Wait for a click target to become visible.
    #[serde(default = "default_click")]
    pub click: u64,

    /// Fixed delay while the offered-slots listing renders.
    #[serde(default = "default_listing_render")]
    pub listing_render: u64,

    /// Wait for the first offered-slot cell.
    #[serde(default = "default_slot_cell")]
    pub slot_cell: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            settle: default_settle(),
            visibility: default_visibility(),
            click: default_click(),
            listing_render: default_listing_render(),
            slot_cell: default_slot_cell(),
        }
    }
}

impl TimeoutsConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle)
    }

    pub fn visibility(&self) -> Duration {
        Duration::from_millis(self.visibility)
    }

    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click)
    }

    pub fn listing_render(&self) -> Duration {
        Duration::from_millis(self.listing_render)
    }

    pub fn slot_cell(&self) -> Duration {
        Duration::from_millis(self.slot_cell)
    }
}

fn default_settle() -> u64 {
    5000
}

fn default_visibility() -> u64 {
    2000
}

fn default_click() -> u64 {
    5000
}

fn default_listing_render() -> u64 {
    1000
}

fn default_slot_cell() -> u64 {
    2000
}

/// CSS selectors for the page affordances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorsConfig {
    /// Affordance shown when an appointment is already held; also the
    /// reschedule trigger.
    #[serde(default = "default_manage_appointment")]
    pub manage_appointment: String,

    /// Region holding the details of the held appointment.
    #[serde(default = "default_appointment_detail")]
    pub appointment_detail: String,

    /// Affordance shown when no appointment is held yet.
    #[serde(default = "default_new_booking")]
    pub new_booking: String,

    /// "Earliest slot" button that opens the offered-slots listing.
    #[serde(default = "default_open_slot_list")]
    pub open_slot_list: String,

    /// First cell of the first row of the offered-slots table.
    #[serde(default = "default_first_slot")]
    pub first_slot: String,

    /// Final confirmation when moving an existing appointment.
    #[serde(default = "default_confirm_rebook")]
    pub confirm_rebook: String,

    /// Final confirmation for a fresh booking.
    #[serde(default = "default_confirm_book")]
    pub confirm_book: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            manage_appointment: default_manage_appointment(),
            appointment_detail: default_appointment_detail(),
            new_booking: default_new_booking(),
            open_slot_list: default_open_slot_list(),
            first_slot: default_first_slot(),
            confirm_rebook: default_confirm_rebook(),
            confirm_book: default_confirm_book(),
        }
    }
}

impl SelectorsConfig {
    /// All selectors paired with their config path.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("selectors.manage_appointment", &self.manage_appointment),
            ("selectors.appointment_detail", &self.appointment_detail),
            ("selectors.new_booking", &self.new_booking),
            ("selectors.open_slot_list", &self.open_slot_list),
            ("selectors.first_slot", &self.first_slot),
            ("selectors.confirm_rebook", &self.confirm_rebook),
            ("selectors.confirm_book", &self.confirm_book),
        ]
    }
}

fn default_manage_appointment() -> String {
    "#rebookBtn".to_string()
}

fn default_appointment_detail() -> String {
    "#appointmentDetails".to_string()
}

fn default_new_booking() -> String {
    "#newBookingBtn".to_string()
}

fn default_open_slot_list() -> String {
    "#bookingListBtn".to_string()
}

fn default_first_slot() -> String {
    "table.mat-table tbody tr:first-child td:first-child".to_string()
}

fn default_confirm_rebook() -> String {
    "#rebookBtn".to_string()
}

fn default_confirm_book() -> String {
    "#bookBtn".to_string()
}

/// Browser launch and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Run Chrome without a window.
    #[serde(default)]
    pub headless: bool,

    /// Profile directory; `~` is expanded by the loader.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

/// Alert played after a completed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_enabled")]
    pub enabled: bool,

    /// Sound file handed to the system audio player.
    #[serde(default)]
    pub sound_file: Option<PathBuf>,

    /// How many times the sound is played.
    #[serde(default = "default_alert_repeat")]
    pub repeat: u32,

    /// Upper bound for a single playback; a player still running is killed.
    #[serde(default = "default_max_playback_seconds")]
    pub max_playback_seconds: u64,
}

impl AlertConfig {
    pub fn max_playback(&self) -> Duration {
        Duration::from_secs(self.max_playback_seconds)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: default_alert_enabled(),
            sound_file: None,
            repeat: default_alert_repeat(),
            max_playback_seconds: default_max_playback_seconds(),
        }
    }
}

fn default_alert_enabled() -> bool {
    true
}

fn default_alert_repeat() -> u32 {
    1
}

fn default_max_playback_seconds() -> u64 {
    30
}
