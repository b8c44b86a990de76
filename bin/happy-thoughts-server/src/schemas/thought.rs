//! Request and response bodies of the `/thoughts` endpoints.
//!
//! Field names follow the JSON documents clients of this API already consume:
//! `_id` for the identifier and camelCase everywhere else.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::entities::{NewThought, ThoughtRecord, UpdateAck};

/// Request body for `POST /thoughts`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateThoughtRequest {
    /// Text of the thought, 5 to 140 characters.
    #[validate(required(message = "message is required"))]
    #[schema(min_length = 5, max_length = 140, example = "Express is great!")]
    pub message: Option<String>,
}

impl TryFrom<CreateThoughtRequest> for NewThought {
    type Error = ValidationErrors;

    fn try_from(req: CreateThoughtRequest) -> Result<Self, Self::Error> {
        req.validate()?;
        NewThought::new(req.message.unwrap_or_default())
    }
}

/// A stored thought.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: String,
    pub hearts: i64,
    /// ISO-8601 timestamp with millisecond precision.
    pub created_at: String,
}

/// Acknowledgement returned by `POST /thoughts/{id}/like`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    /// Always `null`: a like never inserts.
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable summary.
    pub message: String,
    /// Details: field-level validation errors, a parser message, or `null`.
    pub error: serde_json::Value,
}

impl ThoughtRecord {
    pub fn to_response(&self) -> ThoughtResponse {
        ThoughtResponse {
            id: self.id.clone(),
            message: self.message.clone(),
            hearts: self.hearts,
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl UpdateAck {
    pub fn to_response(&self) -> LikeResponse {
        LikeResponse {
            acknowledged: self.acknowledged,
            matched_count: self.matched_count,
            modified_count: self.modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_message_is_a_validation_error() {
        let req: CreateThoughtRequest = serde_json::from_value(json!({})).unwrap();
        let errors = NewThought::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("message"));

        let req: CreateThoughtRequest = serde_json::from_value(json!({ "message": null })).unwrap();
        assert!(NewThought::try_from(req).is_err());
    }

    #[test]
    fn valid_request_becomes_a_new_thought() {
        let req = CreateThoughtRequest { message: Some("Express is great!".to_owned()) };
        let thought = NewThought::try_from(req).unwrap();
        assert_eq!(thought.message(), "Express is great!");
    }

    #[test]
    fn thought_response_uses_client_field_names() {
        let record = NewThought::new("Hello world")
            .unwrap()
            .into_record("64b7f0c2a1b2c3d4e5f60718".to_owned());
        let value = serde_json::to_value(record.to_response()).unwrap();

        assert_eq!(value["_id"], "64b7f0c2a1b2c3d4e5f60718");
        assert_eq!(value["hearts"], 0);
        let created_at = value["createdAt"].as_str().unwrap();
        assert!(created_at.ends_with('Z'));
        assert_eq!(created_at.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn like_response_mirrors_the_update_result() {
        let ack = UpdateAck { acknowledged: true, matched_count: 1, modified_count: 1 };
        let value = serde_json::to_value(ack.to_response()).unwrap();
        assert_eq!(
            value,
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 1,
                "upsertedId": null,
                "upsertedCount": 0,
            })
        );
    }
}
