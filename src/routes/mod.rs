// Route exports
pub mod matches;
pub mod signal;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::core::{Matcher, RoomRegistry, SignalRelay};
use crate::models::ErrorResponse;
use crate::routes::signal::Heartbeat;
use crate::services::{InterestStore, MatchStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub interests: Arc<dyn InterestStore>,
    pub matcher: Matcher,
    pub relay: Arc<SignalRelay>,
    pub heartbeat: Heartbeat,
}

impl AppState {
    pub fn new(
        interests: Arc<dyn InterestStore>,
        matches: Arc<dyn MatchStore>,
        exclude_previous_matches: bool,
    ) -> Self {
        let matcher = Matcher::new(interests.clone(), matches)
            .exclude_previous_matches(exclude_previous_matches);

        Self {
            interests,
            matcher,
            relay: Arc::new(SignalRelay::new(RoomRegistry::new())),
            heartbeat: Heartbeat::default(),
        }
    }

    /// Override the WebSocket ping interval and idle timeout
    pub fn with_heartbeat(mut self, heartbeat: Heartbeat) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl error::ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

/// Map a storage-layer error onto an HTTP response
pub(crate) fn store_error_response(err: &StoreError, action: &str) -> HttpResponse {
    match err {
        StoreError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: msg.clone(),
            status_code: 400,
        }),
        StoreError::NotFound(user_id) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: format!("No interests registered for {}", user_id),
            status_code: 404,
        }),
        StoreError::Database(_) | StoreError::Migrate(_) | StoreError::Timeout(_) => {
            tracing::error!("Failed to {}: {}", action, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to {}", action),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Register extractor configs and every route
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error))
        .configure(configure_routes);
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").configure(matches::configure))
        .configure(signal::configure);
}
