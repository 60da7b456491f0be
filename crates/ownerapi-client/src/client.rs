//! Owner API HTTP client implementation

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::error::{OwnerApiError, Result};
use crate::log::{CallLog, API_CALL_LEVEL, API_RETURN_LEVEL};
use crate::streaming::{StreamOptions, TelemetryStream};
use crate::types::*;

/// Default REST API portal
pub const DEFAULT_PORTAL: &str = "https://owner-api.teslamotors.com";

/// Default telemetry streaming portal. Must end with a trailing slash; the
/// numeric vehicle id is appended directly.
pub const DEFAULT_STREAMING_PORTAL: &str = "https://streaming.vn.teslamotors.com/stream/";

/// OAuth client identifier sent with every login request.
///
/// This is a public value shared by every client of the service, not a user
/// secret, so it is stored in the clear.
pub const OAUTH_CLIENT_ID: &str =
    "e4a9949fcfa04068f59abb5a658f2bac0a3428e4652315490b659d5ab3f35a9e";

/// OAuth client secret paired with [`OAUTH_CLIENT_ID`]; public for the same
/// reason.
pub const OAUTH_CLIENT_SECRET: &str =
    "c75f14bbadc8bee3a7594412c31416f8300256d7668ea7e6e7f06727bfb9d220";

/// Charge limit preset for long-term storage, in percent
pub const CHARGE_STORAGE: u8 = 50;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Owner API REST client
///
/// Holds no credentials: the caller obtains a bearer token via [`login`] and
/// passes it back in [`VehicleOptions`] for every per-vehicle call. Each
/// operation issues exactly one HTTP request and completes exactly once; there
/// is no caching and no retry.
///
/// [`login`]: OwnerApiClient::login
#[derive(Debug, Clone)]
pub struct OwnerApiClient {
    client: Client,
    stream_client: Client,
    portal: Url,
    streaming_portal: String,
    log: CallLog,
}

/// Builder for [`OwnerApiClient`]
#[derive(Debug, Clone)]
pub struct OwnerApiClientBuilder {
    portal: String,
    streaming_portal: String,
    timeout: Duration,
    connect_timeout: Duration,
    log_level: u8,
}

impl Default for OwnerApiClientBuilder {
    fn default() -> Self {
        Self {
            portal: DEFAULT_PORTAL.to_string(),
            streaming_portal: DEFAULT_STREAMING_PORTAL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            log_level: 0,
        }
    }
}

impl OwnerApiClientBuilder {
    /// Override the REST portal base URL
    pub fn portal(mut self, portal: impl Into<String>) -> Self {
        self.portal = portal.into();
        self
    }

    /// Override the streaming portal base URL (must end with `/`)
    pub fn streaming_portal(mut self, portal: impl Into<String>) -> Self {
        self.streaming_portal = portal.into();
        self
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the call-logging verbosity threshold (see [`crate::log`])
    pub fn log_level(mut self, level: u8) -> Self {
        self.log_level = level;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<OwnerApiClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        // The telemetry stream is long-lived, so its client carries no total
        // request timeout; a total timeout also bounds the response body and
        // would cut the stream off mid-flight. Only the connect phase is
        // bounded.
        let stream_client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()?;

        let portal = Url::parse(&self.portal)?;
        // Validate the streaming portal eagerly; the raw string is kept
        // because stream URLs are built by direct concatenation.
        Url::parse(&self.streaming_portal)?;

        Ok(OwnerApiClient {
            client,
            stream_client,
            portal,
            streaming_portal: self.streaming_portal,
            log: CallLog::new(self.log_level),
        })
    }
}

impl OwnerApiClient {
    /// Create a client against the default portals
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> OwnerApiClientBuilder {
        OwnerApiClientBuilder::default()
    }

    /// Get the REST portal base URL
    pub fn portal(&self) -> &Url {
        &self.portal
    }

    /// Get the streaming portal base URL
    pub fn streaming_portal(&self) -> &str {
        &self.streaming_portal
    }

    /// Adjust the call-logging verbosity threshold
    pub fn set_log_level(&mut self, level: u8) {
        self.log.set_level(level);
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// Useful for making custom requests while reusing the client's
    /// connection pool.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange username and password for a bearer token.
    ///
    /// Sends a form-encoded password grant to `/oauth/token`. The credentials
    /// are consumed once and never retained; token renewal is entirely the
    /// caller's responsibility.
    ///
    /// A body that is not JSON, or a body without an `access_token` field,
    /// yields [`OwnerApiError::Auth`] carrying the raw status and body.
    /// Transport failures propagate as [`OwnerApiError::Http`].
    ///
    /// There is no logout: the service offers no token invalidation, so none
    /// is pretended here.
    #[instrument(skip(self, username, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        self.log.emit(API_CALL_LEVEL, "login() start");

        let url = self.portal.join("/oauth/token")?;
        let form = [
            ("grant_type", "password"),
            ("client_id", OAUTH_CLIENT_ID),
            ("client_secret", OAUTH_CLIENT_SECRET),
            ("email", username),
            ("password", password),
        ];

        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|t| t.access_token);

        let result = match token {
            Some(token) => Ok(token),
            None => {
                self.log
                    .error("error parsing response to oauth token request");
                Err(OwnerApiError::Auth { status, body })
            }
        };

        self.log.emit(API_RETURN_LEVEL, "login() completed");
        result
    }

    // =========================================================================
    // Vehicle Listing
    // =========================================================================

    /// List the vehicles on the account.
    ///
    /// Each descriptor's routing identifier is the string-typed `id_s` field;
    /// see [`Vehicle::id`].
    #[instrument(skip(self, token))]
    pub async fn vehicles(&self, token: &str) -> Result<Vec<Vehicle>> {
        self.log.emit(API_CALL_LEVEL, "vehicles() start");

        let url = self.portal.join("/api/1/vehicles")?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let result = self.unwrap_envelope("vehicles", response).await;

        self.log.emit(API_RETURN_LEVEL, "Command: /vehicles completed");
        result
    }

    /// Fetch the descriptor at `index` in the account's vehicle list.
    ///
    /// Index 0 is the common single-vehicle case.
    #[instrument(skip(self, token))]
    pub async fn vehicle(&self, token: &str, index: usize) -> Result<Vehicle> {
        let mut vehicles = self.vehicles(token).await?;
        let count = vehicles.len();
        if index < count {
            Ok(vehicles.swap_remove(index))
        } else {
            Err(OwnerApiError::VehicleNotFound { index, count })
        }
    }

    // =========================================================================
    // Request Executor
    // =========================================================================

    /// Build the per-vehicle command URL:
    /// `portal + "/api/1/vehicles/" + vehicle_id + "/" + command`
    fn vehicle_url(&self, vehicle_id: &str, command: &str) -> Result<Url> {
        Ok(self
            .portal
            .join(&format!("/api/1/vehicles/{}/{}", vehicle_id, command))?)
    }

    /// Generic GET against a fixed per-vehicle command path
    async fn get_command<T: DeserializeOwned>(
        &self,
        options: &VehicleOptions,
        command: &str,
    ) -> Result<T> {
        self.log
            .emit(API_CALL_LEVEL, &format!("GET call: {} start", command));

        let url = self.vehicle_url(&options.vehicle_id, command)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&options.token)
            .send()
            .await?;
        let result = self.unwrap_envelope(command, response).await;

        self.log
            .emit(API_RETURN_LEVEL, &format!("GET request: {} completed", command));
        result
    }

    /// Generic POST against a fixed per-vehicle command path.
    ///
    /// When `body` is `None` no request body is sent at all.
    async fn post_command<T, B>(
        &self,
        options: &VehicleOptions,
        command: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.log
            .emit(API_CALL_LEVEL, &format!("POST call: {} start", command));

        let url = self.vehicle_url(&options.vehicle_id, command)?;
        let mut request = self.client.post(url).bearer_auth(&options.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let result = self.unwrap_envelope(command, response).await;

        self.log
            .emit(API_RETURN_LEVEL, &format!("POST command: {} completed", command));
        result
    }

    /// Parse the body as JSON and unwrap the `{response: ...}` envelope.
    ///
    /// A body that fails to parse, or that lacks the envelope, is logged on
    /// the error channel and surfaced as [`OwnerApiError::Parse`]. A body that
    /// parses is success at this layer even if it carries an API-level error
    /// payload; interpreting those is the caller's job.
    async fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        command: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.text().await?;
        match serde_json::from_str::<ResponseEnvelope<T>>(&body) {
            Ok(envelope) => Ok(envelope.response),
            Err(e) => {
                self.log
                    .error(&format!("error parsing response to {}: {}", command, e));
                Err(OwnerApiError::parse(command, e.to_string()))
            }
        }
    }

    // =========================================================================
    // State Queries
    // =========================================================================

    /// GET the vehicle state
    #[instrument(skip(self, options))]
    pub async fn vehicle_state(&self, options: &VehicleOptions) -> Result<VehicleStateData> {
        self.get_command(options, "data_request/vehicle_state").await
    }

    /// GET the climate state
    #[instrument(skip(self, options))]
    pub async fn climate_state(&self, options: &VehicleOptions) -> Result<ClimateStateData> {
        self.get_command(options, "data_request/climate_state").await
    }

    /// GET the drive state
    #[instrument(skip(self, options))]
    pub async fn drive_state(&self, options: &VehicleOptions) -> Result<DriveStateData> {
        self.get_command(options, "data_request/drive_state").await
    }

    /// GET the charge state
    #[instrument(skip(self, options))]
    pub async fn charge_state(&self, options: &VehicleOptions) -> Result<ChargeStateData> {
        self.get_command(options, "data_request/charge_state").await
    }

    /// GET the display settings
    #[instrument(skip(self, options))]
    pub async fn gui_settings(&self, options: &VehicleOptions) -> Result<GuiSettingsData> {
        self.get_command(options, "data_request/gui_settings").await
    }

    /// GET whether mobile access is enabled
    #[instrument(skip(self, options))]
    pub async fn mobile_enabled(&self, options: &VehicleOptions) -> Result<bool> {
        self.get_command(options, "mobile_enabled").await
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Honk the horn
    #[instrument(skip(self, options))]
    pub async fn honk_horn(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/honk_horn", None::<&()>)
            .await
    }

    /// Flash the lights
    #[instrument(skip(self, options))]
    pub async fn flash_lights(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/flash_lights", None::<&()>)
            .await
    }

    /// Start charging
    #[instrument(skip(self, options))]
    pub async fn start_charge(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/charge_start", None::<&()>)
            .await
    }

    /// Stop charging
    #[instrument(skip(self, options))]
    pub async fn stop_charge(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/charge_stop", None::<&()>)
            .await
    }

    /// Open the charge port door
    #[instrument(skip(self, options))]
    pub async fn open_charge_port(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/charge_port_door_open", None::<&()>)
            .await
    }

    /// Set the charge limit to a specific percentage
    #[instrument(skip(self, options))]
    pub async fn set_charge_limit(
        &self,
        options: &VehicleOptions,
        percent: u8,
    ) -> Result<CommandResponse> {
        let body = SetChargeLimitRequest { percent };
        self.post_command(options, "command/set_charge_limit", Some(&body))
            .await
    }

    /// Set the charge limit to the storage preset ([`CHARGE_STORAGE`])
    #[instrument(skip(self, options))]
    pub async fn charge_storage(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.set_charge_limit(options, CHARGE_STORAGE).await
    }

    /// Set the charge limit to the standard preset (90%)
    #[instrument(skip(self, options))]
    pub async fn charge_standard(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/charge_standard", None::<&()>)
            .await
    }

    /// Set the charge limit to maximum range (100%)
    #[instrument(skip(self, options))]
    pub async fn charge_max_range(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/charge_max_range", None::<&()>)
            .await
    }

    /// Lock the doors
    #[instrument(skip(self, options))]
    pub async fn door_lock(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/door_lock", None::<&()>)
            .await
    }

    /// Unlock the doors
    #[instrument(skip(self, options))]
    pub async fn door_unlock(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/door_unlock", None::<&()>)
            .await
    }

    /// Turn on the HVAC system
    #[instrument(skip(self, options))]
    pub async fn climate_start(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/auto_conditioning_start", None::<&()>)
            .await
    }

    /// Turn off the HVAC system
    #[instrument(skip(self, options))]
    pub async fn climate_stop(&self, options: &VehicleOptions) -> Result<CommandResponse> {
        self.post_command(options, "command/auto_conditioning_stop", None::<&()>)
            .await
    }

    /// Set the driver and passenger climate temperatures.
    ///
    /// When `passenger` is omitted it defaults to the driver temperature.
    #[instrument(skip(self, options))]
    pub async fn set_temps(
        &self,
        options: &VehicleOptions,
        driver: f64,
        passenger: Option<f64>,
    ) -> Result<CommandResponse> {
        let body = SetTempsRequest::new(driver, passenger);
        self.post_command(options, "command/set_temps", Some(&body))
            .await
    }

    /// Set the sunroof to a specific state
    #[instrument(skip(self, options))]
    pub async fn sun_roof_control(
        &self,
        options: &VehicleOptions,
        state: SunRoofState,
    ) -> Result<CommandResponse> {
        let body = SunRoofRequest::control(state);
        self.post_command(options, "command/sun_roof_control", Some(&body))
            .await
    }

    /// Move the sunroof to a position, in percent open
    #[instrument(skip(self, options))]
    pub async fn sun_roof_move(
        &self,
        options: &VehicleOptions,
        percent: u8,
    ) -> Result<CommandResponse> {
        let body = SunRoofRequest::move_to(percent);
        self.post_command(options, "command/sun_roof_control", Some(&body))
            .await
    }

    /// Enable keyless driving. Requires the account password again.
    #[instrument(skip(self, options, password))]
    pub async fn remote_start_drive(
        &self,
        options: &VehicleOptions,
        password: &str,
    ) -> Result<CommandResponse> {
        let body = RemoteStartRequest {
            password: password.to_string(),
        };
        self.post_command(options, "command/remote_start_drive", Some(&body))
            .await
    }

    /// Open the trunk or frunk
    #[instrument(skip(self, options))]
    pub async fn open_trunk(
        &self,
        options: &VehicleOptions,
        which: Trunk,
    ) -> Result<CommandResponse> {
        let body = OpenTrunkRequest {
            which_trunk: which.as_str().to_string(),
        };
        self.post_command(options, "command/trunk_open", Some(&body))
            .await
    }

    /// Turn valet mode on or off.
    ///
    /// The PIN is required when enabling and when the car has no PIN set.
    #[instrument(skip(self, options, pin))]
    pub async fn set_valet_mode(
        &self,
        options: &VehicleOptions,
        on: bool,
        pin: &str,
    ) -> Result<CommandResponse> {
        let body = ValetModeRequest {
            on,
            password: pin.to_string(),
        };
        self.post_command(options, "command/set_valet_mode", Some(&body))
            .await
    }

    /// Wake up a sleeping vehicle. Note the bare path: no `command/` prefix.
    #[instrument(skip(self, options))]
    pub async fn wake_up(&self, options: &VehicleOptions) -> Result<Vehicle> {
        self.post_command(options, "wake_up", None::<&()>).await
    }

    // =========================================================================
    // Streaming
    // =========================================================================

    /// Open the long-lived telemetry stream for a vehicle.
    ///
    /// The streaming host authenticates with HTTP basic auth (account
    /// username and password), not the bearer token, and routes on the
    /// numeric [`Vehicle::vehicle_id`]. The body is handed through as raw
    /// chunks; see [`crate::streaming`].
    ///
    /// The builder's request timeout does not apply here; the stream stays
    /// open until the host closes the connection.
    #[instrument(skip(self, options))]
    pub async fn start_streaming(&self, options: &StreamOptions) -> Result<TelemetryStream> {
        self.log.emit(API_CALL_LEVEL, "start_streaming() start");

        let stream =
            TelemetryStream::connect(self.stream_client.clone(), &self.streaming_portal, options)
                .await?;

        self.log.emit(API_RETURN_LEVEL, "start_streaming() connected");
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OwnerApiClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_portal() {
        let client = OwnerApiClient::builder().portal("not a url").build();
        assert!(client.is_err());
    }

    #[test]
    fn test_invalid_streaming_portal() {
        let client = OwnerApiClient::builder()
            .streaming_portal("not a url")
            .build();
        assert!(client.is_err());
    }

    #[test]
    fn test_vehicle_url_shape() {
        let client = OwnerApiClient::builder()
            .portal("http://localhost:9080")
            .build()
            .unwrap();
        let url = client
            .vehicle_url("100", "data_request/charge_state")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9080/api/1/vehicles/100/data_request/charge_state"
        );
    }

    #[test]
    fn test_vehicle_url_no_double_slash_with_trailing_portal_slash() {
        let client = OwnerApiClient::builder()
            .portal("http://localhost:9080/")
            .build()
            .unwrap();
        let url = client.vehicle_url("100", "command/honk_horn").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9080/api/1/vehicles/100/command/honk_horn"
        );
    }

    #[test]
    fn test_default_portals() {
        let client = OwnerApiClient::new().unwrap();
        assert_eq!(client.portal().as_str(), format!("{}/", DEFAULT_PORTAL));
        assert_eq!(client.streaming_portal(), DEFAULT_STREAMING_PORTAL);
    }

    #[test]
    fn test_storage_preset() {
        assert_eq!(CHARGE_STORAGE, 50);
    }
}
