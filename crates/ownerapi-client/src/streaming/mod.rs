//! Telemetry streaming support
//!
//! The streaming host is separate from the REST portal and speaks a different
//! dialect: a long-lived GET authenticated with HTTP basic auth (username and
//! password, not the bearer token) whose body is a continuous delimited text
//! stream. No JSON parsing or envelope unwrapping happens here; raw chunks are
//! handed through as they arrive.
//!
//! # Example
//!
//! ```no_run
//! use ownerapi_client::{OwnerApiClient, StreamOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OwnerApiClient::new()?;
//!
//! let options = StreamOptions::new("elon@example.com", "password", 42);
//! let mut stream = client.start_streaming(&options).await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     let chunk = chunk?;
//!     print!("{}", String::from_utf8_lossy(&chunk));
//! }
//! # Ok(())
//! # }
//! ```

mod stream;
mod types;

pub use stream::TelemetryStream;
pub use types::{StreamError, StreamOptions, StreamResult, STREAMING_COLUMNS};
