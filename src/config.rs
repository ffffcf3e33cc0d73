use crate::error::{CheckoutError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_ACCESS_URL: &str =
    "https://drive.google.com/drive/folders/1B2Hjl9ZXQGwTTT3BrdgtE1dLZuJGqmbz?usp=drive_link";

/// Timing of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay before the first poll and between polls.
    pub interval: Duration,
    /// Hard ceiling measured from session start.
    pub timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub base_url: String,
    pub polling: PollingConfig,
    pub request_timeout: Duration,
    /// Opened from the success view after payment is confirmed.
    pub access_url: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            polling: PollingConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            access_url: DEFAULT_ACCESS_URL.to_string(),
        }
    }
}

impl CheckoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CheckoutError::Config("base URL must not be empty".into()));
        }
        if self.polling.interval.is_zero() {
            return Err(CheckoutError::Config(
                "poll interval must be greater than zero".into(),
            ));
        }
        if self.polling.interval > MAX_POLL_INTERVAL {
            return Err(CheckoutError::Config(
                "poll interval must not exceed one hour".into(),
            ));
        }
        if self.polling.timeout > MAX_POLL_TIMEOUT {
            return Err(CheckoutError::Config(
                "poll timeout must not exceed 24 hours".into(),
            ));
        }
        if self.polling.timeout < self.polling.interval {
            return Err(CheckoutError::Config(
                "poll timeout must be at least one poll interval".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CheckoutError::Config(
                "request timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_polling_protocol() {
        let config = CheckoutConfig::default();
        assert_eq!(config.polling.interval, Duration::from_secs(3));
        assert_eq!(config.polling.timeout, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = CheckoutConfig::default();
        config.polling.interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));
    }

    #[test]
    fn test_rejects_timeout_shorter_than_interval() {
        let mut config = CheckoutConfig::default();
        config.polling.timeout = Duration::from_secs(1);
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));
    }

    #[test]
    fn test_rejects_unbounded_polling() {
        let mut config = CheckoutConfig::default();
        config.polling.timeout = Duration::from_secs(u64::MAX);
        assert!(matches!(config.validate(), Err(CheckoutError::Config(ref m)) if m.contains("24 hours")));

        let mut config = CheckoutConfig::default();
        config.polling.interval = MAX_POLL_INTERVAL + Duration::from_secs(1);
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));

        config.polling.interval = MAX_POLL_INTERVAL;
        config.polling.timeout = MAX_POLL_TIMEOUT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let config = CheckoutConfig {
            base_url: " ".into(),
            ..CheckoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));
    }
}
