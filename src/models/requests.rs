use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to store a user's interests
///
/// `interests` is a comma-separated list, tokenized by
/// [`crate::core::scoring::normalize_interests`] before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitInterestsRequest {
    #[validate(length(min = 1, max = 255))]
    #[serde(alias = "user_id", alias = "username", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "interest", rename = "interests")]
    pub interests: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_legacy_field_names() {
        let req: SubmitInterestsRequest =
            serde_json::from_str(r#"{"username":"alice","interest":"music"}"#).unwrap();
        assert_eq!(req.user_id, "alice");
        assert_eq!(req.interests, "music");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_fields() {
        let req = SubmitInterestsRequest {
            user_id: String::new(),
            interests: "music".to_string(),
        };
        assert!(req.validate().is_err());

        let req = SubmitInterestsRequest {
            user_id: "alice".to_string(),
            interests: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
