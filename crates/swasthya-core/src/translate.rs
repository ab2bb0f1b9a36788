//! The `Translator` trait and the fail-open [`Localizer`] around it.

use std::{future::Future, time::Duration};

use crate::{Error, Result, language::Language};

/// An external text-to-text translation service.
pub trait Translator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Translate `text` into `target`. A `source` of `None` asks the service to
  /// detect the input language.
  fn translate<'a>(
    &'a self,
    text: &'a str,
    source: Option<Language>,
    target: Language,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Bounded-time, fail-open wrapper around a [`Translator`].
///
/// Every call either returns the translation within `timeout` or falls back
/// to the input text; failures are logged and never surface to the caller.
pub struct Localizer<T> {
  translator: T,
  timeout:    Duration,
}

impl<T: Translator> Localizer<T> {
  pub fn new(translator: T, timeout: Duration) -> Self {
    Self { translator, timeout }
  }

  /// One bounded translation attempt.
  pub async fn try_translate(
    &self,
    text: &str,
    source: Option<Language>,
    target: Language,
  ) -> Result<String> {
    match tokio::time::timeout(
      self.timeout,
      self.translator.translate(text, source, target),
    )
    .await
    {
      Ok(Ok(translated)) => Ok(translated),
      Ok(Err(e)) => Err(Error::Translation(e.to_string())),
      Err(_) => Err(Error::Translation(format!(
        "timed out after {:?}",
        self.timeout
      ))),
    }
  }

  /// Bring user text into English, auto-detecting its language.
  pub async fn to_english(&self, text: &str, from: Language) -> String {
    if from.is_english() {
      return text.to_owned();
    }
    self.fallible(text, None, Language::English).await
  }

  /// Render English text in the user's language.
  pub async fn from_english(&self, text: &str, to: Language) -> String {
    if to.is_english() {
      return text.to_owned();
    }
    self.fallible(text, Some(Language::English), to).await
  }

  async fn fallible(
    &self,
    text: &str,
    source: Option<Language>,
    target: Language,
  ) -> String {
    match self.try_translate(text, source, target).await {
      Ok(translated) => translated,
      Err(error) => {
        tracing::warn!(
          target_language = target.code(),
          %error,
          "translation failed; using untranslated text"
        );
        text.to_owned()
      }
    }
  }
}

#[cfg(test)]
pub(crate) mod fakes {
  //! Translators with scripted behaviour for tests.

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("service unavailable")]
  pub struct Unavailable;

  /// Tags text with the target code, e.g. `[hi] fever`. Text headed into
  /// English comes back unchanged.
  pub struct Tagging;

  impl Translator for Tagging {
    type Error = Unavailable;

    async fn translate(
      &self,
      text: &str,
      _source: Option<Language>,
      target: Language,
    ) -> Result<String, Unavailable> {
      if target.is_english() {
        Ok(text.to_owned())
      } else {
        Ok(format!("[{}] {text}", target.code()))
      }
    }
  }

  /// Always fails.
  pub struct Failing;

  impl Translator for Failing {
    type Error = Unavailable;

    async fn translate(
      &self,
      _text: &str,
      _source: Option<Language>,
      _target: Language,
    ) -> Result<String, Unavailable> {
      Err(Unavailable)
    }
  }

  /// Never answers within any reasonable timeout.
  pub struct Stalling;

  impl Translator for Stalling {
    type Error = Unavailable;

    async fn translate(
      &self,
      text: &str,
      _source: Option<Language>,
      _target: Language,
    ) -> Result<String, Unavailable> {
      tokio::time::sleep(Duration::from_secs(30)).await;
      Ok(text.to_owned())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{fakes::*, *};

  const SHORT: Duration = Duration::from_millis(50);

  #[tokio::test]
  async fn english_skips_the_service() {
    let l = Localizer::new(Failing, SHORT);
    assert_eq!(l.to_english("fever", Language::English).await, "fever");
    assert_eq!(l.from_english("fever", Language::English).await, "fever");
  }

  #[tokio::test]
  async fn successful_translation_is_returned() {
    let l = Localizer::new(Tagging, SHORT);
    assert_eq!(l.from_english("fever", Language::Odia).await, "[or] fever");
    assert_eq!(
      l.try_translate("fever", None, Language::Hindi).await.unwrap(),
      "[hi] fever"
    );
  }

  #[tokio::test]
  async fn failure_falls_back_to_input() {
    let l = Localizer::new(Failing, SHORT);
    assert_eq!(l.from_english("fever", Language::Hindi).await, "fever");
    assert!(matches!(
      l.try_translate("fever", None, Language::Hindi).await,
      Err(Error::Translation(_))
    ));
  }

  #[tokio::test]
  async fn stalled_service_times_out() {
    let l = Localizer::new(Stalling, SHORT);
    let started = std::time::Instant::now();
    assert_eq!(l.to_english("bukhar", Language::Hindi).await, "bukhar");
    assert!(started.elapsed() < Duration::from_secs(5));
  }
}
