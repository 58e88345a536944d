//! SQLite durable backend for session messages.
//!
//! Implements `DurableBackend` from `solace-core` using sqlx with split
//! read/write pools. Rows are mapped through a private row struct, the
//! sender is stored as the `is_bot` flag.

use chrono::{DateTime, SecondsFormat, Utc};
use solace_core::store::durable::DurableBackend;
use solace_types::error::BackendError;
use solace_types::message::{Message, MessageId, NewMessage, Sender};
use sqlx::Row;
use tracing::debug;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DurableBackend`.
#[derive(Clone)]
pub struct SqliteMessageBackend {
    pool: DatabasePool,
}

impl SqliteMessageBackend {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: i64,
    content: String,
    is_bot: bool,
    session_id: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            is_bot: row.try_get("is_bot")?,
            session_id: row.try_get("session_id")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, BackendError> {
        Ok(Message {
            id: MessageId::from(self.id),
            content: self.content,
            sender: Sender::from_is_bot(self.is_bot),
            session_id: self.session_id,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

/// Fixed-width so that lexical order in SQL matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, BackendError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BackendError::Decode(format!("invalid timestamp '{s}': {e}")))
}

fn map_sqlx_error(err: sqlx::Error) -> BackendError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => BackendError::Decode(err.to_string()),
        other => BackendError::Unavailable(other.to_string()),
    }
}

impl DurableBackend for SqliteMessageBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(&self, message: &NewMessage) -> Result<Message, BackendError> {
        let timestamp = format_timestamp(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO messages (content, is_bot, session_id, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(&message.content)
        .bind(message.sender.is_bot())
        .bind(&message.session_id)
        .bind(&timestamp)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        debug!(session_id = %message.session_id, id, "Inserted message row");

        Ok(message
            .clone()
            .into_message(MessageId::from(id), parse_timestamp(&timestamp)?))
    }

    async fn query_by_session(&self, session_id: &str) -> Result<Vec<Message>, BackendError> {
        let rows = sqlx::query(
            "SELECT id, content, is_bot, session_id, timestamp FROM messages
             WHERE session_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let row = MessageRow::from_row(row).map_err(map_sqlx_error)?;
            messages.push(row.into_message()?);
        }
        Ok(messages)
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        debug!(session_id, deleted = result.rows_affected(), "Deleted message rows");
        Ok(())
    }
}
