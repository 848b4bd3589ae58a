use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::normalize_interests;
use crate::models::{
    ErrorResponse, HealthResponse, MatchOutcome, MatchResponse, MessageResponse,
    SubmitInterestsRequest, SubmitInterestsResponse,
};
use crate::routes::{store_error_response, AppState};

/// Configure interest and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/users", web::post().to(submit_interests))
        .route("/match/{user_id}", web::get().to(find_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.interests.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rooms: state.relay.room_count(),
        timestamp: chrono::Utc::now(),
    })
}

/// Store a user's interests
///
/// POST /api/users
///
/// Request body:
/// ```json
/// {
///   "userId": "alice",
///   "interests": "music, hiking, reading"
/// }
/// ```
async fn submit_interests(
    state: web::Data<AppState>,
    req: web::Json<SubmitInterestsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for submit_interests request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let interests = normalize_interests(&req.interests);
    if interests.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "interests must contain at least one non-empty entry".to_string(),
            status_code: 400,
        });
    }

    match state.interests.upsert(&req.user_id, &interests).await {
        Ok(()) => {
            tracing::info!("Stored {} interests for {}", interests.len(), req.user_id);
            HttpResponse::Ok().json(SubmitInterestsResponse { success: true })
        }
        Err(e) => store_error_response(&e, "store interests"),
    }
}

/// Find the best match for a user
///
/// GET /api/match/{user_id}
///
/// Responds with `{ "matchedUser": ..., "score": ... }`, or
/// `{ "message": "No matches found" }` when nobody else is registered.
async fn find_match(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    tracing::info!("Finding match for user: {}", user_id);

    match state.matcher.find_best_match(&user_id).await {
        Ok(MatchOutcome::Matched(best)) => HttpResponse::Ok().json(MatchResponse {
            matched_user: best.matched_user,
            score: best.score,
        }),
        Ok(MatchOutcome::NoCandidates) => HttpResponse::Ok().json(MessageResponse {
            message: "No matches found".to_string(),
        }),
        Err(e) => store_error_response(&e, "find match"),
    }
}
