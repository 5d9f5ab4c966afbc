// 🛰️ REST API - remote equivalent of the local calculation
//
// POST /api/calculate   {amount, previousAmount?} -> {amount, breakdown, changes?}
// GET  /api/health

use crate::calculation::{calculate, CalculationRequest, CalculationResult};
use crate::config::ServerConfig;
use crate::error::DenominationError;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const HEALTH_MESSAGE: &str = "Backend is running";

/// API response wrapper used for health and error bodies.
/// Calculation results are returned bare so both paths share one shape.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
}

impl From<DenominationError> for ApiError {
    fn from(err: DenominationError) -> Self {
        match err {
            DenominationError::InvalidAmount(_) => ApiError::BadRequest(err.to_string()),
            DenominationError::Remote(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status, Json(ApiResponse::err(message))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(HEALTH_MESSAGE))
}

/// POST /api/calculate - Breakdown plus optional changes
async fn calculate_denominations(
    payload: std::result::Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<Json<CalculationResult>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected malformed calculation request");
        ApiError::from(rejection)
    })?;

    info!(
        amount = request.amount,
        previous_amount = ?request.previous_amount,
        "received calculation request"
    );

    match calculate(&request) {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            warn!(error = %err, "invalid calculation request");
            Err(err.into())
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/calculate", post(calculate_denominations));

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origins)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let response = ApiError::from(DenominationError::invalid_amount("negative")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(DenominationError::remote("down")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiResponse::err("Invalid amount: negative")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid amount: negative");
        assert!(body.get("data").is_none());
    }
}
