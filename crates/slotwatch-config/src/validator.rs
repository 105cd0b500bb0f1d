//! Configuration validation.

use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration against today's local date.
    pub fn validate(config: &Config) -> ValidationResult {
        Self::validate_at(config, chrono::Local::now().date_naive())
    }

    /// Validate the configuration as of `today`.
    pub fn validate_at(config: &Config, today: NaiveDate) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_watch(config, today, &mut result);
        Self::validate_timeouts(config, &mut result);
        Self::validate_selectors(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_alert(config, &mut result);

        result
    }

    fn validate_watch(config: &Config, today: NaiveDate, result: &mut ValidationResult) {
        let watch = &config.watch;

        if watch.polling_interval_seconds == 0 {
            result.add_error(ValidationError::new(
                "watch.polling_interval_seconds",
                "polling_interval_seconds must be greater than 0",
            ));
        } else if watch.polling_interval_seconds < 2 {
            result.add_warning(ValidationWarning::new(
                "watch.polling_interval_seconds",
                "polling more often than every 2 seconds may get the session throttled",
            ));
        }

        if watch.session_url.trim().is_empty() {
            result.add_error(ValidationError::new(
                "watch.session_url",
                "session_url cannot be empty",
            ));
        } else {
            match url::Url::parse(&watch.session_url) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
                Ok(_) => result.add_error(ValidationError::new(
                    "watch.session_url",
                    "session_url must start with http:// or https://",
                )),
                Err(e) => result.add_error(ValidationError::new(
                    "watch.session_url",
                    format!("session_url is not a valid URL: {}", e),
                )),
            }
        }

        if watch.deadline < today {
            result.add_warning(ValidationWarning::new(
                "watch.deadline",
                format!(
                    "deadline {} is in the past; only a held appointment can still be improved",
                    watch.deadline
                ),
            ));
        }
    }

    fn validate_timeouts(config: &Config, result: &mut ValidationResult) {
        let t = &config.timeouts;
        let entries = [
            ("timeouts.settle", t.settle),
            ("timeouts.visibility", t.visibility),
            ("timeouts.click", t.click),
            ("timeouts.listing_render", t.listing_render),
            ("timeouts.slot_cell", t.slot_cell),
        ];

        for (path, value) in entries {
            if value == 0 {
                result.add_error(ValidationError::new(path, "timeout must be greater than 0"));
            }
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        for (path, selector) in config.selectors.entries() {
            if selector.trim().is_empty() {
                result.add_error(ValidationError::new(path, "selector cannot be empty"));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }
    }

    fn validate_alert(config: &Config, result: &mut ValidationResult) {
        if !config.alert.enabled {
            return;
        }

        if config.alert.repeat == 0 {
            result.add_warning(ValidationWarning::new(
                "alert.repeat",
                "repeat is 0, the alert will be silent",
            ));
        }

        if config.alert.max_playback_seconds == 0 {
            result.add_error(ValidationError::new(
                "alert.max_playback_seconds",
                "Playback limit must be greater than 0",
            ));
        }

        if let Some(ref path) = config.alert.sound_file {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "alert.sound_file",
                    format!("Sound file does not exist: {:?}, falling back to terminal bell", path),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
