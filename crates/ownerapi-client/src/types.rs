//! Request and response types for the Owner API client

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Call Options
// =============================================================================

/// Per-call options: the bearer token plus the vehicle to address.
///
/// Reconstructed per call; the client never retains a token.
#[derive(Debug, Clone)]
pub struct VehicleOptions {
    /// Bearer token obtained from [`crate::OwnerApiClient::login`]
    pub token: String,
    /// String-typed vehicle identifier used for URL routing
    pub vehicle_id: String,
}

impl VehicleOptions {
    /// Create options from a token and a routing identifier
    pub fn new(token: impl Into<String>, vehicle_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            vehicle_id: vehicle_id.into(),
        }
    }

    /// Options addressing the given vehicle descriptor
    pub fn for_vehicle(token: impl Into<String>, vehicle: &Vehicle) -> Self {
        Self::new(token, vehicle.id())
    }
}

// =============================================================================
// Wire Envelope
// =============================================================================

/// Every REST response wraps its payload in a top-level `response` field.
/// Unwrapping happens in the request executor, never in endpoint bindings.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope<T> {
    pub response: T,
}

/// Body of the OAuth token endpoint response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

// =============================================================================
// Vehicle Descriptor
// =============================================================================

/// A vehicle descriptor returned by the vehicle-list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// String-typed identifier. All per-vehicle REST routing must use this
    /// field; the API returns a numeric `id` as well, but routing expects
    /// the string form.
    pub id_s: String,
    /// Numeric identifier used by the streaming host
    #[serde(default)]
    pub vehicle_id: Option<u64>,
    /// Numeric display id; not valid for routing
    #[serde(default, rename = "id")]
    pub display_id: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    /// Current availability, e.g. "online" or "asleep"
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub option_codes: Option<String>,
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Remaining descriptor fields, passed through verbatim
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Vehicle {
    /// Identifier to use in per-vehicle calls (always the string-typed id)
    pub fn id(&self) -> &str {
        &self.id_s
    }
}

// =============================================================================
// Command Types
// =============================================================================

/// Result of a vehicle command POST.
///
/// A body that parses is success at this layer even when the API reports an
/// application-level failure inside it (e.g. vehicle asleep); callers inspect
/// `result` and `reason`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub reason: String,
}

/// Sunroof states accepted by `command/sun_roof_control`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunRoofState {
    Open,
    Close,
    Comfort,
    Vent,
}

impl SunRoofState {
    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Comfort => "comfort",
            Self::Vent => "vent",
        }
    }
}

/// Which trunk to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trunk {
    Rear,
    Front,
}

impl Trunk {
    /// Wire name used in the `which_trunk` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rear => "rear",
            Self::Front => "frunk",
        }
    }
}

/// Payload for `command/set_charge_limit`
#[derive(Debug, Clone, Serialize)]
pub struct SetChargeLimitRequest {
    pub percent: u8,
}

/// Payload for `command/set_temps`
#[derive(Debug, Clone, Serialize)]
pub struct SetTempsRequest {
    pub driver_temp: f64,
    pub passenger_temp: f64,
}

impl SetTempsRequest {
    /// The passenger temperature defaults to the driver value when omitted,
    /// not to any fixed default.
    pub fn new(driver: f64, passenger: Option<f64>) -> Self {
        Self {
            driver_temp: driver,
            passenger_temp: passenger.unwrap_or(driver),
        }
    }
}

/// Payload for `command/sun_roof_control`.
///
/// Two shapes share this command path: absolute state control carries only
/// `state`, while move-to-percent carries `state: "move"` plus `percent`.
#[derive(Debug, Clone, Serialize)]
pub struct SunRoofRequest {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
}

impl SunRoofRequest {
    /// Absolute state control; no `percent` field is serialized
    pub fn control(state: SunRoofState) -> Self {
        Self {
            state: state.as_str().to_string(),
            percent: None,
        }
    }

    /// Move the sunroof to a position
    pub fn move_to(percent: u8) -> Self {
        Self {
            state: "move".to_string(),
            percent: Some(percent),
        }
    }
}

/// Payload for `command/remote_start_drive`
#[derive(Debug, Clone, Serialize)]
pub struct RemoteStartRequest {
    pub password: String,
}

/// Payload for `command/trunk_open`
#[derive(Debug, Clone, Serialize)]
pub struct OpenTrunkRequest {
    pub which_trunk: String,
}

/// Payload for `command/set_valet_mode`
#[derive(Debug, Clone, Serialize)]
pub struct ValetModeRequest {
    pub on: bool,
    pub password: String,
}

// =============================================================================
// State Query Types
// =============================================================================

/// Charge state returned by `data_request/charge_state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeStateData {
    #[serde(default)]
    pub charging_state: Option<String>,
    #[serde(default)]
    pub battery_level: Option<u8>,
    #[serde(default)]
    pub charge_limit_soc: Option<u8>,
    #[serde(default)]
    pub battery_range: Option<f64>,
    #[serde(default)]
    pub est_battery_range: Option<f64>,
    #[serde(default)]
    pub charge_rate: Option<f64>,
    #[serde(default)]
    pub time_to_full_charge: Option<f64>,
    #[serde(default)]
    pub charge_port_door_open: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Climate state returned by `data_request/climate_state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateStateData {
    #[serde(default)]
    pub inside_temp: Option<f64>,
    #[serde(default)]
    pub outside_temp: Option<f64>,
    #[serde(default)]
    pub driver_temp_setting: Option<f64>,
    #[serde(default)]
    pub passenger_temp_setting: Option<f64>,
    #[serde(default)]
    pub is_auto_conditioning_on: Option<bool>,
    #[serde(default)]
    pub fan_status: Option<u8>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Drive state returned by `data_request/drive_state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveStateData {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub heading: Option<u16>,
    /// None when parked
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub shift_state: Option<String>,
    #[serde(default)]
    pub gps_as_of: Option<i64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Vehicle state returned by `data_request/vehicle_state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleStateData {
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub car_version: Option<String>,
    #[serde(default)]
    pub sun_roof_percent_open: Option<u8>,
    #[serde(default)]
    pub valet_mode: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Display settings returned by `data_request/gui_settings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiSettingsData {
    #[serde(default)]
    pub gui_distance_units: Option<String>,
    #[serde(default)]
    pub gui_temperature_units: Option<String>,
    #[serde(default)]
    pub gui_charge_rate_units: Option<String>,
    #[serde(default)]
    pub gui_24_hour_time: Option<bool>,
    #[serde(default)]
    pub gui_range_display: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn set_temps_passenger_defaults_to_driver() {
        let req = SetTempsRequest::new(70.0, None);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"driver_temp": 70.0, "passenger_temp": 70.0})
        );
    }

    #[test]
    fn set_temps_explicit_passenger_kept() {
        let req = SetTempsRequest::new(70.0, Some(65.0));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"driver_temp": 70.0, "passenger_temp": 65.0})
        );
    }

    #[test]
    fn sun_roof_move_carries_move_state_and_percent() {
        let req = SunRoofRequest::move_to(50);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"state": "move", "percent": 50})
        );
    }

    #[test]
    fn sun_roof_control_omits_percent() {
        let req = SunRoofRequest::control(SunRoofState::Open);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"state": "open"}));
        assert!(value.get("percent").is_none());
    }

    #[test]
    fn valet_mode_payload_shape() {
        let req = ValetModeRequest {
            on: true,
            password: "1234".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"on": true, "password": "1234"})
        );
    }

    #[test]
    fn trunk_payload_shape() {
        let req = OpenTrunkRequest {
            which_trunk: Trunk::Front.as_str().to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"which_trunk": "frunk"})
        );
    }

    #[test]
    fn vehicle_routing_id_is_the_string_form() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": 1457_u64,
            "id_s": "100",
            "vehicle_id": 42,
            "display_name": "Nikola",
            "name": "X"
        }))
        .unwrap();

        assert_eq!(vehicle.id(), "100");
        assert_eq!(vehicle.display_id, Some(1457));
        assert_eq!(vehicle.vehicle_id, Some(42));
        // Unknown fields survive in the flattened map
        assert_eq!(vehicle.extra["name"], json!("X"));
    }

    #[test]
    fn command_response_defaults_when_fields_missing() {
        let resp: CommandResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!resp.result);
        assert!(resp.reason.is_empty());
    }
}
