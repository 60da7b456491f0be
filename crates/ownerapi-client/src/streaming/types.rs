//! Types for telemetry streaming

use thiserror::Error;

/// Canonical telemetry columns, in the order the streaming host documents
/// them. Used when [`StreamOptions::values`] is not supplied.
pub const STREAMING_COLUMNS: [&str; 12] = [
    "elevation",
    "est_heading",
    "est_lat",
    "est_lng",
    "est_range",
    "heading",
    "odometer",
    "power",
    "range",
    "shift_state",
    "speed",
    "soc",
];

/// Options for opening a telemetry stream
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Account username, sent as the basic-auth user
    pub username: String,
    /// Account password, sent as the basic-auth password
    pub password: String,
    /// Numeric vehicle identifier. The streaming host routes on this value,
    /// not on the string id used by the REST portal.
    pub vehicle_id: u64,
    /// Telemetry columns to request; defaults to [`STREAMING_COLUMNS`]
    pub values: Option<Vec<String>>,
}

impl StreamOptions {
    /// Create options requesting the default column set
    pub fn new(username: impl Into<String>, password: impl Into<String>, vehicle_id: u64) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            vehicle_id,
            values: None,
        }
    }

    /// Request a specific set of columns
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = Some(values);
        self
    }

    /// Comma-joined column list for the `values` query parameter
    pub(crate) fn values_param(&self) -> String {
        match &self.values {
            Some(values) => values.join(","),
            None => STREAMING_COLUMNS.join(","),
        }
    }
}

/// Errors that can occur during streaming
#[derive(Debug, Error)]
pub enum StreamError {
    /// HTTP/connection error
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// Streaming URL could not be constructed
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Streaming host refused the handshake
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Result type for streaming operations
pub type StreamResult<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_param_is_the_canonical_list_in_order() {
        let options = StreamOptions::new("user", "pass", 42);
        assert_eq!(
            options.values_param(),
            "elevation,est_heading,est_lat,est_lng,est_range,heading,odometer,\
             power,range,shift_state,speed,soc"
        );
    }

    #[test]
    fn explicit_values_override_the_default() {
        let options = StreamOptions::new("user", "pass", 42)
            .with_values(vec!["speed".to_string(), "soc".to_string()]);
        assert_eq!(options.values_param(), "speed,soc");
    }
}
