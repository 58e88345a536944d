//! PostgREST durable backend (the hosted Supabase table shape).
//!
//! Talks to `{base_url}/rest/v1/{table}` over HTTPS with the `apikey` and
//! bearer headers. Rows carry `is_bot` instead of a sender enum and may use
//! numeric or string ids depending on how the table was created.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when building
//! request headers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solace_core::store::durable::DurableBackend;
use solace_types::error::BackendError;
use solace_types::message::{Message, MessageId, NewMessage, Sender};
use tracing::debug;

/// Longest slice of an error body carried into `BackendError::Rejected`.
const MAX_ERROR_BODY: usize = 512;

/// Rows sharing a timestamp fall back to id order, which follows inserts.
const ORDER_BY: &str = "timestamp.asc,id.asc";

/// PostgREST-backed implementation of `DurableBackend`.
pub struct PostgrestBackend {
    client: reqwest::Client,
    base_url: String,
    table: String,
    api_key: Option<SecretString>,
}

impl PostgrestBackend {
    pub fn new(base_url: &str, table: &str, api_key: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key.expose_secret())
                .bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    fn session_filter(session_id: &str) -> (&'static str, String) {
        ("session_id", format!("eq.{session_id}"))
    }
}

#[derive(Serialize)]
struct InsertRecord<'a> {
    content: &'a str,
    is_bot: bool,
    session_id: &'a str,
    timestamp: String,
}

#[derive(Deserialize)]
struct MessageRecord {
    id: Value,
    content: String,
    is_bot: bool,
    session_id: String,
    timestamp: String,
}

impl MessageRecord {
    fn into_message(self) -> Result<Message, BackendError> {
        let id = match self.id {
            Value::Number(n) => MessageId(n.to_string()),
            Value::String(s) => MessageId(s),
            other => return Err(BackendError::Decode(format!("unsupported id: {other}"))),
        };

        Ok(Message {
            id,
            content: self.content,
            sender: Sender::from_is_bot(self.is_bot),
            session_id: self.session_id,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

/// Accepts RFC 3339 (`timestamptz`) and zone-less (`timestamp`) columns;
/// the latter are read as UTC.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, BackendError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| BackendError::Decode(format!("invalid timestamp '{s}': {e}")))
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Unavailable(err.to_string())
}

/// Pass 2xx responses through, turn anything else into `Rejected`.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    Err(BackendError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode_records(response: Response) -> Result<Vec<Message>, BackendError> {
    let records: Vec<MessageRecord> = response
        .json()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    records.into_iter().map(MessageRecord::into_message).collect()
}

impl DurableBackend for PostgrestBackend {
    fn name(&self) -> &str {
        "postgrest"
    }

    async fn insert(&self, message: &NewMessage) -> Result<Message, BackendError> {
        let record = InsertRecord {
            content: &message.content,
            is_bot: message.sender.is_bot(),
            session_id: &message.session_id,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let response = self
            .authorize(self.client.post(self.endpoint()))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(transport_error)?;

        let saved = decode_records(check_status(response).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no representation".to_string()))?;

        debug!(session_id = %saved.session_id, id = %saved.id, "Inserted PostgREST row");
        Ok(saved)
    }

    async fn query_by_session(&self, session_id: &str) -> Result<Vec<Message>, BackendError> {
        let response = self
            .authorize(self.client.get(self.endpoint()))
            .query(&[
                ("select", "*".to_string()),
                Self::session_filter(session_id),
                ("order", ORDER_BY.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        decode_records(check_status(response).await?).await
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), BackendError> {
        let response = self
            .authorize(self.client.delete(self.endpoint()))
            .query(&[Self::session_filter(session_id)])
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await?;
        Ok(())
    }
}
