//! HTTP translation client for Swasthya.
//!
//! Speaks the LibreTranslate JSON API (`POST /translate`). The client is a
//! plain [`Translator`]; bounding its latency and falling back on failure is
//! the job of [`swasthya_core::translate::Localizer`].

pub mod error;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use swasthya_core::{language::Language, translate::Translator};

pub use error::{Error, Result};

/// Connection settings for the translation service.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
  /// Base URL, e.g. `https://libretranslate.example.org`. Translation is
  /// disabled when absent.
  pub endpoint:     Option<String>,
  pub api_key:      Option<String>,
  /// Upper bound on a single translation, in seconds.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 10 }

impl Default for TranslationConfig {
  fn default() -> Self {
    Self { endpoint: None, api_key: None, timeout_secs: default_timeout_secs() }
  }
}

impl TranslationConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
  q:       &'a str,
  source:  &'a str,
  target:  &'a str,
  format:  &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
  #[serde(rename = "translatedText")]
  translated_text: String,
}

/// Async client for a LibreTranslate-compatible service.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTranslator {
  client: Client,
  config: TranslationConfig,
}

impl HttpTranslator {
  pub fn new(config: TranslationConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, config })
  }

  pub fn is_enabled(&self) -> bool { self.config.endpoint.is_some() }

  fn url(&self) -> Option<String> {
    self
      .config
      .endpoint
      .as_deref()
      .map(|base| format!("{}/translate", base.trim_end_matches('/')))
  }

  /// `POST /translate`
  pub async fn request(
    &self,
    text: &str,
    source: Option<Language>,
    target: Language,
  ) -> Result<String> {
    let url = self.url().ok_or(Error::Disabled)?;
    let body = TranslateRequest {
      q:       text,
      source:  source.map_or("auto", Language::code),
      target:  target.code(),
      format:  "text",
      api_key: self.config.api_key.as_deref(),
    };

    let resp = self.client.post(&url).json(&body).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status(resp.status().as_u16()));
    }
    let parsed: TranslateResponse = resp.json().await?;
    tracing::debug!(target_language = target.code(), chars = text.len(), "translated");
    Ok(parsed.translated_text)
  }
}

impl Translator for HttpTranslator {
  type Error = Error;

  async fn translate(
    &self,
    text: &str,
    source: Option<Language>,
    target: Language,
  ) -> Result<String> {
    self.request(text, source, target).await
  }
}

#[cfg(test)]
mod tests {
  use axum::{Json, Router, http::StatusCode, routing::post};
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  use super::*;

  /// Serve `app` on an ephemeral port and return its base URL.
  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  fn translator(endpoint: Option<String>) -> HttpTranslator {
    HttpTranslator::new(TranslationConfig {
      endpoint,
      api_key: Some("k".into()),
      timeout_secs: 5,
    })
    .unwrap()
  }

  #[tokio::test]
  async fn disabled_without_endpoint() {
    let t = translator(None);
    assert!(!t.is_enabled());
    let err = t.translate("fever", None, Language::Hindi).await.unwrap_err();
    assert!(matches!(err, Error::Disabled));
  }

  #[tokio::test]
  async fn posts_libretranslate_request() {
    let app = Router::new().route(
      "/translate",
      post(|Json(body): Json<Value>| async move {
        assert_eq!(body["source"], "auto");
        assert_eq!(body["target"], "en");
        assert_eq!(body["api_key"], "k");
        Json(json!({ "translatedText": format!("EN:{}", body["q"].as_str().unwrap()) }))
      }),
    );
    let base = serve(app).await;
    let t = translator(Some(format!("{base}/")));
    let out = t.translate("बुखार", None, Language::English).await.unwrap();
    assert_eq!(out, "EN:बुखार");
  }

  #[tokio::test]
  async fn error_status_is_reported() {
    let app = Router::new().route(
      "/translate",
      post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base = serve(app).await;
    let t = translator(Some(base));
    let err = t
      .translate("fever", Some(Language::English), Language::Odia)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Status(429)));
  }
}
