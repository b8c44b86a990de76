//! MongoDB implementation of [`ThoughtStore`].
//!
//! Documents live in the `thoughts` collection of the database named in the
//! connection URL (`happyThoughts` when the URL names none). The field layout
//! (`_id`, `message`, `hearts`, `createdAt`) matches the documents the service
//! has always written; extra fields such as `__v` are ignored on read.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::StoreError;
use crate::entities::{NewThought, ThoughtRecord, ThoughtStore, UpdateAck};

const DEFAULT_DATABASE: &str = "happyThoughts";
const COLLECTION: &str = "thoughts";

/// On-disk shape of a thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThoughtDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    message: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    hearts: i64,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
}

/// Older documents may carry `hearts: null`; count those as no hearts.
fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

impl From<ThoughtDocument> for ThoughtRecord {
    fn from(document: ThoughtDocument) -> Self {
        ThoughtRecord {
            id: document.id.to_hex(),
            message: document.message,
            hearts: document.hearts,
            created_at: DateTime::<Utc>::from(document.created_at.to_system_time()),
        }
    }
}

/// MongoDB-backed thought store.
#[derive(Clone, Debug)]
pub struct MongoStore {
    thoughts: Collection<ThoughtDocument>,
}

impl MongoStore {
    /// Connect to `url` and make sure the listing index exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        Self::with_database(&database).await
    }

    /// Use the `thoughts` collection of an already opened database.
    pub async fn with_database(database: &Database) -> Result<Self, StoreError> {
        let thoughts = database.collection::<ThoughtDocument>(COLLECTION);

        thoughts
            .create_index(IndexModel::builder().keys(doc! { "createdAt": -1 }).build())
            .await?;
        debug!(database = %database.name(), collection = COLLECTION, "mongodb collection ready");

        Ok(Self { thoughts })
    }
}

/// Ids that are not well-formed ObjectIds cannot match any document.
fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn new_document(thought: &NewThought) -> ThoughtDocument {
    ThoughtDocument {
        id: ObjectId::new(),
        message: thought.message().to_owned(),
        hearts: 0,
        created_at: bson::DateTime::from_millis(thought.created_at().timestamp_millis()),
    }
}

impl ThoughtStore for MongoStore {
    async fn insert_thought(&self, thought: NewThought) -> Result<ThoughtRecord, StoreError> {
        let document = new_document(&thought);
        self.thoughts.insert_one(&document).await?;
        Ok(thought.into_record(document.id.to_hex()))
    }

    async fn list_recent_thoughts(&self, limit: usize) -> Result<Vec<ThoughtRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .thoughts
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .limit(limit)
            .await?;
        let documents: Vec<ThoughtDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(ThoughtRecord::from).collect())
    }

    #[cfg(test)]
    async fn get_thought(&self, id: &str) -> Result<Option<ThoughtRecord>, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let document = self.thoughts.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(ThoughtRecord::from))
    }

    async fn add_heart(&self, id: &str) -> Result<UpdateAck, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(UpdateAck::unmatched());
        };
        let result = self
            .thoughts
            .update_one(doc! { "_id": oid }, doc! { "$inc": { "hearts": 1 } })
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }
}
