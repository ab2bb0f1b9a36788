//! Chat-transport adapter for the Swasthya health assistant.
//!
//! Exposes an axum [`Router`] with the messaging webhook (form-encoded
//! `From`/`Body` in, TwiML out) and a liveness route, both backed by one
//! [`Assistant`].

pub mod error;
pub mod twiml;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Form, Router,
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
  routing::get,
};
use serde::Deserialize;
use swasthya_core::{assistant::Assistant, store::KnowledgeStore, translate::Translator};
use swasthya_translate::TranslationConfig;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SWASTHYA__*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  /// Reseed the knowledge store with the built-in dataset on every start.
  /// An empty store is always seeded.
  #[serde(default)]
  pub seed_on_start: bool,
  #[serde(default)]
  pub translation:   TranslationConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("swasthya.db") }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, T> {
  pub assistant: Arc<Assistant<S, T>>,
}

impl<S, T> Clone for AppState<S, T> {
  fn clone(&self) -> Self { Self { assistant: Arc::clone(&self.assistant) } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the assistant.
pub fn router<S, T>(state: AppState<S, T>) -> Router
where
  S: KnowledgeStore + 'static,
  T: Translator + 'static,
{
  Router::new()
    .route("/", get(health))
    .route("/webhook", get(webhook_query::<S, T>).post(webhook_form::<S, T>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Route handlers ──────────────────────────────────────────────────────────

async fn health() -> &'static str { "Server is running!" }

/// Fields the chat provider posts for an inbound message.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
  #[serde(rename = "From", default)]
  pub from: String,
  #[serde(rename = "Body", default)]
  pub body: String,
}

async fn webhook_form<S, T>(
  State(state): State<AppState<S, T>>,
  Form(msg): Form<InboundMessage>,
) -> Response
where
  S: KnowledgeStore + 'static,
  T: Translator + 'static,
{
  respond(&state, msg).await.unwrap_or_else(IntoResponse::into_response)
}

async fn webhook_query<S, T>(
  State(state): State<AppState<S, T>>,
  Query(msg): Query<InboundMessage>,
) -> Response
where
  S: KnowledgeStore + 'static,
  T: Translator + 'static,
{
  respond(&state, msg).await.unwrap_or_else(IntoResponse::into_response)
}

async fn respond<S, T>(state: &AppState<S, T>, msg: InboundMessage) -> Result<Response, Error>
where
  S: KnowledgeStore + 'static,
  T: Translator + 'static,
{
  let from = msg.from.trim();
  if from.is_empty() {
    return Err(Error::BadRequest("missing From".to_owned()));
  }
  tracing::info!(from, body = %msg.body, "incoming message");

  let reply = state
    .assistant
    .handle_inbound_message(from, &msg.body)
    .await
    .inspect_err(|error| tracing::error!(from, %error, "failed to answer message"))?;

  let xml = twiml::message(&reply)?;
  Ok(([(header::CONTENT_TYPE, twiml::CONTENT_TYPE)], xml).into_response())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Local;
  use swasthya_core::{language::LANGUAGE_PROMPT, translate::Localizer};
  use swasthya_store_sqlite::{Dataset, SqliteStore};
  use swasthya_translate::HttpTranslator;
  use tower::ServiceExt as _;

  type TestState = AppState<SqliteStore, HttpTranslator>;

  async fn make_state() -> TestState {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .seed(Dataset::builtin(), Local::now().date_naive())
      .await
      .unwrap();

    // No endpoint: every translation fails and replies stay in English.
    let translator = HttpTranslator::new(TranslationConfig::default()).unwrap();
    let assistant = Assistant::new(
      Arc::new(store),
      Localizer::new(translator, Duration::from_secs(1)),
    );
    AppState { assistant: Arc::new(assistant) }
  }

  fn form(from: &str, body: &str) -> String {
    fn enc(s: &str) -> String {
      s.bytes()
        .map(|b| match b {
          b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' => (b as char).to_string(),
          b' ' => "+".to_owned(),
          _ => format!("%{b:02X}"),
        })
        .collect()
    }
    format!("From={}&Body={}", enc(from), enc(body))
  }

  async fn send(state: TestState, req: Request<Body>) -> (StatusCode, String) {
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
  }

  async fn post_message(state: TestState, from: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
      .method("POST")
      .uri("/webhook")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(form(from, body)))
      .unwrap();
    send(state, req).await
  }

  async fn get_uri(state: TestState, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    send(state, req).await
  }

  #[tokio::test]
  async fn root_reports_running() {
    let (status, body) = get_uri(make_state().await, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Server is running!");
  }

  #[tokio::test]
  async fn first_contact_gets_language_prompt() {
    let (status, xml) = post_message(make_state().await, "whatsapp:+91900", "hello").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<Response><Message>"), "{xml}");
    assert!(xml.contains(LANGUAGE_PROMPT), "{xml}");
  }

  #[tokio::test]
  async fn conversation_survives_across_requests() {
    let state = make_state().await;
    let (_, xml) = post_message(state.clone(), "whatsapp:+91900", "English").await;
    assert!(xml.contains("You selected English."), "{xml}");

    let (status, xml) = post_message(state.clone(), "whatsapp:+91900", "fever").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("high temperature"), "{xml}");
    assert!(xml.contains("Stay hydrated"), "{xml}");

    let (_, xml) = post_message(state, "whatsapp:+91900", "chills, alert").await;
    assert!(xml.contains("Possible diseases:"), "{xml}");
  }

  #[tokio::test]
  async fn get_webhook_reads_query_string() {
    let (status, xml) = get_uri(make_state().await, "/webhook?From=%2B91901&Body=odia").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("ଆପଣ"), "{xml}");
  }

  #[tokio::test]
  async fn missing_sender_is_rejected() {
    let (status, _) = post_message(make_state().await, "  ", "fever").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
