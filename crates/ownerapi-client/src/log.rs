//! Adjustable call logging.
//!
//! Call-progress diagnostics are gated by a single numeric threshold held by
//! the client instance. The comparison direction is inverted relative to the
//! usual log-level convention: a message with declared severity `level` is
//! emitted only when the configured threshold is numerically *greater* than
//! `level`. A threshold of 0 (the default) therefore emits nothing, while
//! [`API_LOG_ALL`] emits everything.
//!
//! Parse and transport failures bypass the gate entirely and always go to the
//! error channel.

use tracing::{debug, error};

/// Severity of call start/end messages
pub const API_CALL_LEVEL: u8 = 1;

/// Severity of call-completion detail messages
pub const API_RETURN_LEVEL: u8 = 2;

/// Threshold that emits every message; must stay the largest level
pub const API_LOG_ALL: u8 = 255;

/// Verbosity gate for call-progress diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct CallLog {
    threshold: u8,
}

impl CallLog {
    /// Create a gate with the given threshold
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Replace the threshold
    pub fn set_level(&mut self, threshold: u8) {
        self.threshold = threshold;
    }

    /// Current threshold
    pub fn level(&self) -> u8 {
        self.threshold
    }

    /// Whether a message with the given severity would be emitted
    pub fn enabled(&self, level: u8) -> bool {
        self.threshold > level
    }

    /// Emit a call-progress message at the given severity
    pub(crate) fn emit(&self, level: u8, message: &str) {
        if self.enabled(level) {
            debug!(target: "ownerapi", "{}", message);
        }
    }

    /// Error channel: emitted regardless of the threshold
    pub(crate) fn error(&self, message: &str) {
        error!(target: "ownerapi", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_suppresses_everything() {
        let log = CallLog::default();
        assert!(!log.enabled(API_CALL_LEVEL));
        assert!(!log.enabled(API_RETURN_LEVEL));
    }

    #[test]
    fn threshold_equal_to_severity_suppresses() {
        // The gate is strictly-greater-than, so L == S must not emit.
        let log = CallLog::new(API_CALL_LEVEL);
        assert!(!log.enabled(API_CALL_LEVEL));
    }

    #[test]
    fn threshold_above_severity_emits() {
        let log = CallLog::new(API_CALL_LEVEL + 1);
        assert!(log.enabled(API_CALL_LEVEL));
        assert!(!log.enabled(API_RETURN_LEVEL));
    }

    #[test]
    fn log_all_emits_every_severity_below_it() {
        let log = CallLog::new(API_LOG_ALL);
        assert!(log.enabled(API_CALL_LEVEL));
        assert!(log.enabled(API_RETURN_LEVEL));
        assert!(log.enabled(API_LOG_ALL - 1));
        assert!(!log.enabled(API_LOG_ALL));
    }

    #[test]
    fn set_level_replaces_threshold() {
        let mut log = CallLog::default();
        log.set_level(API_RETURN_LEVEL + 1);
        assert_eq!(log.level(), API_RETURN_LEVEL + 1);
        assert!(log.enabled(API_RETURN_LEVEL));
    }
}
