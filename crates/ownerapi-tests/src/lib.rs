//! Integration-test harness for the Owner API client
//!
//! Provides [`MockPortal`], an in-process axum rendition of the Owner API:
//! the OAuth token endpoint, the vehicle list, the per-vehicle command
//! routes, and the telemetry streaming host (mounted under `/stream/`).
//! Every request is recorded verbatim so tests can assert on the exact URL,
//! headers, and body the client put on the wire.
//!
//! # Test Structure
//!
//! - `auth_test.rs` - Token endpoint contract
//! - `vehicle_api_test.rs` - Vehicle listing, state queries, commands
//! - `streaming_test.rs` - Telemetry stream handshake and raw pass-through

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

/// Token handed out by the mock token endpoint
pub const MOCK_TOKEN: &str = "tok-123";

/// Rows served by the mock streaming host
pub const MOCK_STREAM_BODY: &str = "1466,120,3,210,65,0,0,0\n1467,121,3,209,65,0,0,0\n";

/// Vehicle id whose stream drips one row at a time (see [`SLOW_STREAM_ROWS`])
pub const SLOW_STREAM_VEHICLE_ID: u64 = 777;

/// Number of rows the slow stream emits, one per [`SLOW_STREAM_INTERVAL`]
pub const SLOW_STREAM_ROWS: u32 = 4;

/// Pause before each slow-stream row
pub const SLOW_STREAM_INTERVAL: Duration = Duration::from_millis(200);

/// A request observed by the mock portal
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// In-process mock of the Owner API portal
#[derive(Clone, Default)]
pub struct MockPortal {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// When set, vehicle routes answer with a body that is not JSON
    garble: Arc<AtomicBool>,
}

impl MockPortal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything the portal has seen so far, in order
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path equals `path`
    pub fn recorded_for(&self, path: &str) -> Vec<RecordedRequest> {
        self.recorded()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Make vehicle routes return an unparseable body
    pub fn set_garble(&self, on: bool) {
        self.garble.store(on, Ordering::SeqCst);
    }

    /// Build the router serving this portal
    pub fn router(&self) -> Router {
        Router::new()
            .route("/oauth/token", post(oauth_token))
            .route("/api/1/vehicles", get(list_vehicles))
            .route(
                "/api/1/vehicles/{id}/{*command}",
                get(vehicle_get).post(vehicle_post),
            )
            .route("/stream/{*rest}", get(stream_telemetry))
            .with_state(self.clone())
    }

    fn record(&self, method: &str, uri: &axum::http::Uri, headers: &HeaderMap, body: String) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(|s| s.to_string()),
            authorization,
            body,
        });
    }
}

async fn oauth_token(
    State(portal): State<MockPortal>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: String,
) -> Response {
    portal.record("POST", &uri, &headers, body.clone());

    if body.contains("password=wrong") {
        // Non-JSON body on purpose: the client must surface it raw
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    if body.contains("email=notoken%40example.com") {
        // Parseable JSON, but no access_token field
        return Json(json!({"token_type": "bearer"})).into_response();
    }

    Json(json!({
        "access_token": MOCK_TOKEN,
        "token_type": "bearer",
        "expires_in": 7_776_000
    }))
    .into_response()
}

async fn list_vehicles(
    State(portal): State<MockPortal>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    portal.record("GET", &uri, &headers, String::new());

    Json(json!({
        "response": [
            {
                "id": 1457_u64,
                "id_s": "100",
                "vehicle_id": 42,
                "display_name": "Nikola",
                "vin": "5YJSA1CN5CFP01657",
                "state": "online",
                "tokens": ["abc", "def"],
                "name": "X"
            },
            {
                "id": 1458_u64,
                "id_s": "200",
                "vehicle_id": 43,
                "display_name": "Wardenclyffe",
                "state": "asleep"
            }
        ]
    }))
    .into_response()
}

async fn vehicle_get(
    State(portal): State<MockPortal>,
    Path((id, command)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    portal.record("GET", &uri, &headers, String::new());
    vehicle_response(&portal, &id, &command)
}

async fn vehicle_post(
    State(portal): State<MockPortal>,
    Path((id, command)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: String,
) -> Response {
    portal.record("POST", &uri, &headers, body);
    vehicle_response(&portal, &id, &command)
}

fn vehicle_response(portal: &MockPortal, id: &str, command: &str) -> Response {
    if portal.garble.load(Ordering::SeqCst) {
        return "not json".to_string().into_response();
    }

    let payload = match command {
        "data_request/charge_state" => json!({
            "charging_state": "Complete",
            "battery_level": 64,
            "charge_limit_soc": 90,
            "battery_range": 239.02,
            "est_battery_range": 155.79,
            "charge_rate": -1.0,
            "time_to_full_charge": 0.0,
            "charge_port_door_open": true
        }),
        "data_request/climate_state" => json!({
            "inside_temp": 17.0,
            "outside_temp": 9.5,
            "driver_temp_setting": 22.6,
            "passenger_temp_setting": 22.6,
            "is_auto_conditioning_on": false,
            "fan_status": 0
        }),
        "data_request/drive_state" => json!({
            "latitude": 33.794839,
            "longitude": -84.401593,
            "heading": 4,
            "speed": null,
            "shift_state": null,
            "gps_as_of": 1_466_634_896_i64
        }),
        "data_request/vehicle_state" => json!({
            "locked": true,
            "odometer": 3666.555,
            "car_version": "2.20.35",
            "sun_roof_percent_open": 0,
            "valet_mode": false
        }),
        "data_request/gui_settings" => json!({
            "gui_distance_units": "mi/hr",
            "gui_temperature_units": "F",
            "gui_charge_rate_units": "mi/hr",
            "gui_24_hour_time": false,
            "gui_range_display": "Rated"
        }),
        "mobile_enabled" => json!(true),
        "wake_up" => json!({
            "id": 1457_u64,
            "id_s": id,
            "vehicle_id": 42,
            "state": "online"
        }),
        c if c.starts_with("command/") => json!({"result": true, "reason": ""}),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "unknown command"})),
            )
                .into_response()
        }
    };

    Json(json!({ "response": payload })).into_response()
}

async fn stream_telemetry(
    State(portal): State<MockPortal>,
    Path(rest): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    portal.record("GET", &uri, &headers, String::new());

    let vehicle_id = rest.trim_end_matches('/');
    if vehicle_id == "0" {
        return (StatusCode::NOT_FOUND, "no such vehicle".to_string()).into_response();
    }

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Basic "))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "basic auth required".to_string()).into_response();
    }

    if vehicle_id == SLOW_STREAM_VEHICLE_ID.to_string() {
        return Body::from_stream(slow_rows()).into_response();
    }

    MOCK_STREAM_BODY.to_string().into_response()
}

/// One numbered row per interval; the full body takes longer than the short
/// request timeouts tests configure.
fn slow_rows() -> impl futures::Stream<Item = Result<String, Infallible>> {
    futures::stream::unfold(0u32, |row| async move {
        if row >= SLOW_STREAM_ROWS {
            return None;
        }
        tokio::time::sleep(SLOW_STREAM_INTERVAL).await;
        Some((Ok(format!("row{}\n", row)), row + 1))
    })
}
