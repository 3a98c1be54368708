//! Engine Configuration
//!
//! All configuration is supplied as a plain value at construction by the
//! embedding layer. There is deliberately no CLI, environment-variable, or
//! config-file surface: the widget's host decides the endpoint and timings at
//! build/startup and the engine treats them as constants.

use std::time::Duration;

use crate::backend::DEFAULT_ENDPOINT;
use crate::scheduler::{LEAVE_DELAY, READ_DELAY, REPLY_DELAY};

/// Default bound on a single reply request
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Companion engine configuration
#[derive(Clone, Debug)]
pub struct CompanionConfig {
    /// Remote reply endpoint URL
    pub endpoint_url: String,
    /// Delay from submission until the typing indicator shows
    pub read_delay: Duration,
    /// Delay from submission until the reply call starts (total, so the
    /// indicator is visible for `reply_delay - read_delay` before it)
    pub reply_delay: Duration,
    /// Delay from the farewell until the companion is gone, matching the
    /// surface-owned exit animation
    pub leave_delay: Duration,
    /// Bounded timeout applied by the HTTP client to each reply request
    pub request_timeout: Duration,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            read_delay: READ_DELAY,
            reply_delay: REPLY_DELAY,
            leave_delay: LEAVE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CompanionConfig {
    /// Configuration with the canonical widget timings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply endpoint URL
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    /// Set the reading delay
    #[must_use]
    pub fn with_read_delay(mut self, read_delay: Duration) -> Self {
        self.read_delay = read_delay;
        self
    }

    /// Set the total reply delay
    #[must_use]
    pub fn with_reply_delay(mut self, reply_delay: Duration) -> Self {
        self.reply_delay = reply_delay;
        self
    }

    /// Set the departure delay
    #[must_use]
    pub fn with_leave_delay(mut self, leave_delay: Duration) -> Self {
        self.leave_delay = leave_delay;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_the_widget_timings() {
        let config = CompanionConfig::default();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT);
        assert_eq!(config.read_delay, Duration::from_millis(800));
        assert_eq!(config.reply_delay, Duration::from_millis(3800));
        assert_eq!(config.leave_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_builders() {
        let config = CompanionConfig::new()
            .with_endpoint_url("http://localhost:1/no")
            .with_read_delay(Duration::from_millis(10))
            .with_reply_delay(Duration::from_millis(50))
            .with_leave_delay(Duration::from_millis(20))
            .with_request_timeout(Duration::from_secs(1));

        assert_eq!(config.endpoint_url, "http://localhost:1/no");
        assert_eq!(config.read_delay, Duration::from_millis(10));
        assert_eq!(config.reply_delay, Duration::from_millis(50));
        assert_eq!(config.leave_delay, Duration::from_millis(20));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }
}
