use std::future::Future;

use crate::db::{Store, StoreError};
use crate::entities::dao::{NewThought, ThoughtRecord, UpdateAck};

/// Number of thoughts returned by the listing endpoint.
pub const RECENT_THOUGHTS_LIMIT: usize = 20;

pub trait ThoughtStore: Send + Sync + 'static {
    /// Persist a validated thought and return it with its generated id.
    fn insert_thought(
        &self,
        thought: NewThought,
    ) -> impl Future<Output = Result<ThoughtRecord, StoreError>> + Send;

    /// Most recent thoughts first, at most `limit` of them.
    fn list_recent_thoughts(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ThoughtRecord>, StoreError>> + Send;

    /// Look up one thought by id. Only tests read single records back.
    #[cfg(test)]
    fn get_thought(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ThoughtRecord>, StoreError>> + Send;

    /// Atomically add one heart. An id that matches nothing (including one
    /// that is not a well-formed ObjectId) yields [`UpdateAck::unmatched`].
    fn add_heart(&self, id: &str) -> impl Future<Output = Result<UpdateAck, StoreError>> + Send;
}

impl ThoughtStore for Store {
    async fn insert_thought(&self, thought: NewThought) -> Result<ThoughtRecord, StoreError> {
        match self {
            Store::Mongo(s) => s.insert_thought(thought).await,
            Store::Sqlite(s) => s.insert_thought(thought).await,
        }
    }

    async fn list_recent_thoughts(&self, limit: usize) -> Result<Vec<ThoughtRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.list_recent_thoughts(limit).await,
            Store::Sqlite(s) => s.list_recent_thoughts(limit).await,
        }
    }

    #[cfg(test)]
    async fn get_thought(&self, id: &str) -> Result<Option<ThoughtRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.get_thought(id).await,
            Store::Sqlite(s) => s.get_thought(id).await,
        }
    }

    async fn add_heart(&self, id: &str) -> Result<UpdateAck, StoreError> {
        match self {
            Store::Mongo(s) => s.add_heart(id).await,
            Store::Sqlite(s) => s.add_heart(id).await,
        }
    }
}
