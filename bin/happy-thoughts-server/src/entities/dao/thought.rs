use chrono::{DateTime, SubsecRound, Utc};
use validator::{Validate, ValidationErrors};

/// A stored thought, as returned by every [`crate::entities::ThoughtStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtRecord {
    /// 24-character hex ObjectId assigned by the store.
    pub id: String,
    pub message: String,
    pub hearts: i64,
    pub created_at: DateTime<Utc>,
}

/// A thought whose message passed the length check and may be written.
///
/// The fields are private: the only way to obtain a `NewThought` is
/// [`NewThought::new`], so a store never sees an out-of-bounds message.
#[derive(Debug, Clone, Validate)]
pub struct NewThought {
    #[validate(length(min = 5, max = 140, message = "message must be between 5 and 140 characters"))]
    message: String,
    created_at: DateTime<Utc>,
}

impl NewThought {
    /// Validate `message` and stamp the creation time.
    ///
    /// `created_at` is truncated to milliseconds, the resolution every backend
    /// persists, so the returned record matches what a later read yields.
    pub fn new(message: impl Into<String>) -> Result<Self, ValidationErrors> {
        let thought = Self {
            message: message.into(),
            created_at: Utc::now().trunc_subsecs(3),
        };
        thought.validate()?;
        Ok(thought)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach the store-assigned id. New thoughts always start with zero hearts.
    pub fn into_record(self, id: String) -> ThoughtRecord {
        ThoughtRecord {
            id,
            message: self.message,
            hearts: 0,
            created_at: self.created_at,
        }
    }
}

/// Summary of a heart increment, shaped after the store's update result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateAck {
    /// An acknowledged update that touched nothing.
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_count > 0
    }
}
