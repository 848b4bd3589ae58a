use serde::{Deserialize, Serialize};

/// Response for a successful interest submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitInterestsResponse {
    pub success: bool,
}

/// Response when a best match was found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "matchedUser")]
    pub matched_user: String,
    pub score: f64,
}

/// Informational response, e.g. when no candidates exist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rooms: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
