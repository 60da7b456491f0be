//! Owner API Client Library
//!
//! Provides a typed HTTP client for the unofficial vehicle Owner API: OAuth
//! password-grant login, vehicle-scoped state queries and commands, and the
//! raw telemetry stream.
//!
//! Every REST response arrives wrapped in a `{"response": ...}` envelope; the
//! client unwraps it before handing the payload back. A body that parses is
//! success at this layer even when the API reports an application-level
//! failure inside it; command results carry `result`/`reason` fields for the
//! caller to inspect. There is no retry, no caching, and no token renewal.
//!
//! # Example
//!
//! ```rust,no_run
//! use ownerapi_client::{OwnerApiClient, VehicleOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OwnerApiClient::new()?;
//!
//!     // Obtain a bearer token; the client never retains it
//!     let token = client.login("elon@example.com", "password").await?;
//!
//!     // Pick a vehicle; its routing id is the string-typed `id_s`
//!     let vehicle = client.vehicle(&token, 0).await?;
//!     let options = VehicleOptions::for_vehicle(&token, &vehicle);
//!
//!     // State queries and commands
//!     let charge = client.charge_state(&options).await?;
//!     println!("battery: {:?}%", charge.battery_level);
//!
//!     let outcome = client.honk_horn(&options).await?;
//!     if !outcome.result {
//!         eprintln!("command refused: {}", outcome.reason);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Streaming
//!
//! The telemetry stream lives on a separate host, authenticates with HTTP
//! basic auth instead of the bearer token, and returns a continuous delimited
//! text stream; see the [`streaming`] module.

mod client;
mod error;
pub mod log;
pub mod streaming;
pub mod testing;
mod types;

pub use client::{
    OwnerApiClient, OwnerApiClientBuilder, CHARGE_STORAGE, DEFAULT_PORTAL,
    DEFAULT_STREAMING_PORTAL, OAUTH_CLIENT_ID, OAUTH_CLIENT_SECRET,
};
pub use error::{OwnerApiError, Result};
pub use types::{
    ChargeStateData, ClimateStateData, CommandResponse, DriveStateData, GuiSettingsData,
    OpenTrunkRequest, RemoteStartRequest, SetChargeLimitRequest, SetTempsRequest, SunRoofRequest,
    SunRoofState, Trunk, ValetModeRequest, Vehicle, VehicleOptions, VehicleStateData,
};

// Re-export streaming types for convenience
pub use streaming::{StreamError, StreamOptions, TelemetryStream, STREAMING_COLUMNS};
