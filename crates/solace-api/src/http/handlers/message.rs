//! Message HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/messages              - Run one turn, returns `[user, bot]`
//! - GET    /api/messages/{session_id} - Ordered session history
//! - DELETE /api/messages/{session_id} - Clear a session

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use solace_types::message::{Message, Sender};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Request body for POST /api/messages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTurnRequest {
    pub content: String,
    pub session_id: String,
}

/// Wire shape of a message. Carries both `sender` and the legacy `isBot`
/// flag so older clients keep working.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub is_bot: bool,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(m: Message) -> Self {
        Self {
            is_bot: m.is_bot(),
            id: m.id.0,
            content: m.content,
            sender: m.sender,
            session_id: m.session_id,
            timestamp: m.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub success: bool,
}

/// POST /api/messages - Submit an utterance and get both persisted messages.
pub async fn submit_turn(
    State(state): State<AppState>,
    payload: Result<Json<SubmitTurnRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<MessageView>>>, AppError> {
    let clock = RequestClock::start();
    let Json(body) = payload?;

    let turn = state
        .orchestrator
        .submit_turn(&body.session_id, &body.content)
        .await?;

    let messages = turn.into_messages().into_iter().map(MessageView::from).collect();
    Ok(Json(clock.finish(messages)))
}

/// GET /api/messages/{session_id} - Ordered history of a session.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MessageView>>>, AppError> {
    let clock = RequestClock::start();

    let messages = state
        .orchestrator
        .get_history(&session_id)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();

    Ok(Json(clock.finish(messages)))
}

/// DELETE /api/messages/{session_id} - Remove every message of a session.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ClearResult>>, AppError> {
    let clock = RequestClock::start();

    state.orchestrator.clear_session(&session_id).await?;

    Ok(Json(clock.finish(ClearResult { success: true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::router::build_router;
    use serde_json::{json, Value};
    use solace_types::config::{DurableKind, GenerationKind, ServiceConfig};

    async fn spawn_app() -> (String, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.durable.kind = DurableKind::None;
        config.generation.kind = GenerationKind::Static;
        config.generation.static_reply = Some("That sounds hard. I'm here.".to_string());

        let state = AppState::with_config(config, tmp.path().to_path_buf()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        (format!("http://{addr}"), tmp)
    }

    #[tokio::test]
    async fn test_post_returns_user_then_bot() {
        let (base, _tmp) = spawn_app().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/api/messages"))
            .json(&json!({ "content": "I feel lonely", "sessionId": "s1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["content"], "I feel lonely");
        assert_eq!(data[0]["isBot"], false);
        assert_eq!(data[0]["sender"], "user");
        assert_eq!(data[0]["sessionId"], "s1");
        assert_eq!(data[1]["content"], "That sounds hard. I'm here.");
        assert_eq!(data[1]["isBot"], true);
        assert!(body["meta"]["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_get_and_delete_history() {
        let (base, _tmp) = spawn_app().await;
        let client = reqwest::Client::new();

        for text in ["first", "second"] {
            client
                .post(format!("{base}/api/messages"))
                .json(&json!({ "content": text, "sessionId": "s1" }))
                .send()
                .await
                .unwrap();
        }

        let body: Value = client
            .get(format!("{base}/api/messages/s1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let contents: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(
            contents,
            vec!["first", "That sounds hard. I'm here.", "second", "That sounds hard. I'm here."]
        );

        let resp = client
            .delete(format!("{base}/api/messages/s1"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"]["success"], true);

        let body: Value = client
            .get(format!("{base}/api/messages/s1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let (base, _tmp) = spawn_app().await;
        let client = reqwest::Client::new();

        let cases = [
            json!({ "content": "", "sessionId": "s1" }),
            json!({ "content": "x".repeat(501), "sessionId": "s1" }),
            json!({ "content": "hello", "sessionId": "   " }),
            json!({ "content": "hello" }),
        ];
        for case in cases {
            let resp = client
                .post(format!("{base}/api/messages"))
                .json(&case)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 400, "case {case}");
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        }

        let body: Value = client
            .get(format!("{base}/api/messages/s1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_health_reports_adapters() {
        let (base, _tmp) = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["durable"], "none");
        assert_eq!(body["generator"], "static");
    }
}
