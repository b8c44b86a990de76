//! SQLite implementation of [`ThoughtStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are embedded at
//! compile time from `./migrations` (relative to the crate root) and run on
//! [`SqliteStore::connect`]. The table's CHECK constraints repeat the message
//! length bound so the invariant holds even for rows written outside the API.
//!
//! `created_at` is stored as fixed-width RFC 3339 text with millisecond
//! precision, which sorts lexically in chronological order.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::StoreError;
use crate::entities::{NewThought, ThoughtRecord, ThoughtStore, UpdateAck};

type ThoughtRow = (String, String, i64, String);

/// SQLite-backed thought store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://thoughts.db"`
    /// or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so keep exactly one alive for the lifetime of the pool.
        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn row_to_record((id, message, hearts, created_at): ThoughtRow) -> Result<ThoughtRecord, StoreError> {
    let created_at = match created_at.parse::<DateTime<Utc>>() {
        Ok(ts) => ts,
        Err(e) => {
            return Err(StoreError::CorruptRecord {
                id,
                reason: format!("created_at `{created_at}`: {e}"),
            });
        }
    };
    Ok(ThoughtRecord { id, message, hearts, created_at })
}

impl ThoughtStore for SqliteStore {
    async fn insert_thought(&self, thought: NewThought) -> Result<ThoughtRecord, StoreError> {
        let id = ObjectId::new().to_hex();
        sqlx::query(
            "INSERT INTO thoughts (id, message, hearts, created_at) VALUES (?1, ?2, 0, ?3)",
        )
        .bind(&id)
        .bind(thought.message())
        .bind(format_timestamp(thought.created_at()))
        .execute(&self.pool)
        .await?;
        Ok(thought.into_record(id))
    }

    async fn list_recent_thoughts(&self, limit: usize) -> Result<Vec<ThoughtRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<ThoughtRow> = sqlx::query_as(
            "SELECT id, message, hearts, created_at FROM thoughts \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_record).collect()
    }

    #[cfg(test)]
    async fn get_thought(&self, id: &str) -> Result<Option<ThoughtRecord>, StoreError> {
        let row: Option<ThoughtRow> = sqlx::query_as(
            "SELECT id, message, hearts, created_at FROM thoughts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_record).transpose()
    }

    async fn add_heart(&self, id: &str) -> Result<UpdateAck, StoreError> {
        let result = sqlx::query("UPDATE thoughts SET hearts = hearts + 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.rows_affected(),
            modified_count: result.rows_affected(),
        })
    }
}
