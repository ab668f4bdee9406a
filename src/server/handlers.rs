use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::config::DeliveryConfig;
use crate::geo::{format_coords, GeoPoint};
use crate::location::{CheckOutcome, CheckReport, ManualProvider};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/check ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub(super) async fn check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckQuery>,
) -> Result<Json<CheckReport>, ApiError> {
    let start = Instant::now();

    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")),
    };

    let outcome = state.check.run(&ManualProvider::new(lat, lon));
    if let CheckOutcome::Unavailable(e) = &outcome {
        return Err(api_error(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let report = CheckReport::from_outcome(&outcome, state.check.config());
    tracing::info!(
        lat,
        lon,
        status = ?report.status,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/check"
    );
    Ok(Json(report))
}

// ─── GET /api/config ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub reference_point: GeoPoint,
    pub radius_km: f64,
    pub formatted_reference: String,
}

impl From<&DeliveryConfig> for ConfigResponse {
    fn from(config: &DeliveryConfig) -> Self {
        let p = config.reference_point;
        Self {
            reference_point: p,
            radius_km: config.radius_km,
            formatted_reference: format_coords(p.latitude, p.longitude),
        }
    }
}

pub(super) async fn config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(state.check.config()))
}
