//! The inbound-message pipeline.
//!
//! [`Assistant::handle_inbound_message`] is the single entry point transport
//! adapters call: it gates the user behind the language step, then routes the
//! query to the resolver and localizes the reply. Not-found results and
//! translation failures are ordinary replies; only a store failure is
//! returned as an error.

use std::sync::Arc;

use chrono::NaiveDate;
use rand_core::{OsRng, RngCore};
use tracing::{debug, info};

use crate::{
  Result,
  disease::{Disease, DiseaseMatch},
  language::Language,
  normalize::canonical_list,
  resolver::Resolver,
  schedule::{VACCINE_SCHEDULE, is_schedule_request},
  session::SessionRegistry,
  store::KnowledgeStore,
  translate::{Localizer, Translator},
};

/// Closing line of the startup alert.
pub const ALERT_LANGUAGE_PROMPT: &str = "Choose your language: Hindi, Odia, English";

pub struct Assistant<S, T> {
  resolver:  Resolver<S>,
  localizer: Localizer<T>,
  sessions:  SessionRegistry,
}

impl<S: KnowledgeStore, T: Translator> Assistant<S, T> {
  pub fn new(store: Arc<S>, localizer: Localizer<T>) -> Self {
    Self {
      resolver: Resolver::new(store),
      localizer,
      sessions: SessionRegistry::new(),
    }
  }

  pub fn resolver(&self) -> &Resolver<S> { &self.resolver }

  pub fn sessions(&self) -> &SessionRegistry { &self.sessions }

  /// Handle one inbound message from `identity` and produce the reply text.
  ///
  /// Messages from the same identity are processed one at a time; the
  /// session lock is held until the reply is ready.
  pub async fn handle_inbound_message(&self, identity: &str, raw: &str) -> Result<String> {
    let raw = raw.trim();
    let mut session = self.sessions.acquire(identity).await;

    let Some(language) = session.language() else {
      let step = session.select_language(raw);
      info!(identity, ?step, "language step");
      return Ok(step.reply().to_owned());
    };

    debug!(identity, language = language.code(), "answering query");
    self.answer(raw, language).await
  }

  /// Answer a query for a user who reads `language`.
  pub async fn answer(&self, raw: &str, language: Language) -> Result<String> {
    let query = self.localizer.to_english(raw, language).await;

    if is_schedule_request(&query) {
      return Ok(self.localizer.from_english(VACCINE_SCHEDULE, language).await);
    }

    let reply = self.compose(raw, &query).await?;
    Ok(self.localizer.from_english(&reply, language).await)
  }

  /// Build the English reply for an English `query`.
  async fn compose(&self, raw: &str, query: &str) -> Result<String> {
    if query.contains(',') {
      debug!(terms = %canonical_list(query), "multi-symptom query");
      let terms: Vec<&str> = query.split(',').collect();
      let matches = self.resolver.resolve_by_symptoms(&terms).await?;
      return Ok(if matches.is_empty() {
        not_found(raw)
      } else {
        render_matches(&matches)
      });
    }

    if let Some(disease) = self.resolver.resolve_by_name(query).await? {
      return Ok(render_disease(&disease));
    }

    let matches = self.resolver.resolve_by_symptoms(&[query]).await?;
    Ok(if matches.is_empty() {
      not_found(raw)
    } else {
      render_matches(&matches)
    })
  }

  /// Pick one of `date`'s case counts at random and phrase it as an alert
  /// that also invites the reader to choose a language.
  pub async fn startup_alert(&self, date: NaiveDate) -> Result<String> {
    let alerts = self.resolver.today_alerts("", date).await?;
    if alerts.is_empty() {
      return Ok("No disease data found for today.".to_owned());
    }
    let pick = &alerts[OsRng.next_u32() as usize % alerts.len()];
    Ok(format!("{}\n\n{ALERT_LANGUAGE_PROMPT}", pick.headline()))
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn not_found(raw: &str) -> String { format!("No data found for '{raw}'.") }

fn render_disease(d: &Disease) -> String {
  format!(
    "{}\nSymptoms: {}\nPrevention: {}",
    d.label,
    d.symptom_labels().join(", "),
    d.distinct_preventions().join(", ")
  )
}

fn render_matches(matches: &[DiseaseMatch]) -> String {
  let mut msg = String::from("Possible diseases:");
  for m in matches {
    msg.push_str(&format!(
      "\n- {}: Symptoms [{}], Prevention [{}]",
      m.disease.label,
      m.disease.symptom_labels().join(", "),
      m.disease.distinct_preventions().join(", ")
    ));
  }
  msg
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use chrono::Local;

  use super::*;
  use crate::{
    Error,
    language::LANGUAGE_PROMPT,
    session::SessionState,
    store::fakes::MemoryStore,
    translate::fakes::{Failing, Tagging},
  };

  fn today() -> NaiveDate { Local::now().date_naive() }

  fn store() -> MemoryStore {
    MemoryStore::default()
      .with(
        "fever",
        &["high temperature", "sweating", "chills"],
        &["Stay hydrated", "Rest well"],
      )
      .with("covid", &["cough", "fever"], &["Wear mask"])
      .with("malaria", &["fever", "chills"], &["Use mosquito nets"])
      .with_cases("covid", 85, today())
      .with_cases("malaria", 64, today())
  }

  fn assistant<T: Translator>(translator: T) -> Assistant<MemoryStore, T> {
    Assistant::new(
      Arc::new(store()),
      Localizer::new(translator, Duration::from_millis(100)),
    )
  }

  #[tokio::test]
  async fn first_message_without_language_reprompts() {
    let a = assistant(Failing);
    let reply = a.handle_inbound_message("+911", "fever").await.unwrap();
    assert_eq!(reply, LANGUAGE_PROMPT);
    assert_eq!(a.sessions().state("+911").await, Some(SessionState::AwaitingLanguage));
  }

  #[tokio::test]
  async fn language_choice_is_acknowledged() {
    let a = assistant(Failing);
    let reply = a.handle_inbound_message("+911", "I pick Odia").await.unwrap();
    assert_eq!(reply, Language::Odia.acknowledgement());
    assert_eq!(
      a.sessions().state("+911").await,
      Some(SessionState::Ready(Language::Odia))
    );
  }

  #[tokio::test]
  async fn disease_name_renders_paragraph() {
    let a = assistant(Failing);
    a.handle_inbound_message("+911", "english").await.unwrap();
    let reply = a.handle_inbound_message("+911", "Fever").await.unwrap();
    assert_eq!(
      reply,
      "fever\nSymptoms: chills, high temperature, sweating\nPrevention: Stay hydrated, Rest well"
    );
  }

  #[tokio::test]
  async fn unknown_name_falls_back_to_symptoms() {
    let a = assistant(Failing);
    let reply = a.answer("chills", Language::English).await.unwrap();
    assert!(reply.starts_with("Possible diseases:"), "{reply}");
    assert!(reply.contains("- fever: Symptoms [chills]"), "{reply}");
    assert!(reply.contains("- malaria: Symptoms [chills]"), "{reply}");
  }

  #[tokio::test]
  async fn comma_query_ranks_by_matches() {
    let a = assistant(Failing);
    let reply = a.answer("fever, cough", Language::English).await.unwrap();
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines[0], "Possible diseases:");
    assert!(lines[1].starts_with("- covid: Symptoms [cough, fever]"), "{reply}");
    assert!(lines[2].starts_with("- malaria:"), "{reply}");
  }

  #[tokio::test]
  async fn nothing_found_echoes_query() {
    let a = assistant(Failing);
    let reply = a.answer("Zika", Language::English).await.unwrap();
    assert_eq!(reply, "No data found for 'Zika'.");
    let reply = a.answer(" , ", Language::English).await.unwrap();
    assert_eq!(reply, "No data found for ' , '.");
    let reply = a.answer("", Language::English).await.unwrap();
    assert_eq!(reply, "No data found for ''.");
  }

  #[tokio::test]
  async fn schedule_is_translated_when_possible() {
    let a = assistant(Tagging);
    let reply = a.answer("vaccine schedule", Language::Hindi).await.unwrap();
    assert_eq!(reply, format!("[hi] {VACCINE_SCHEDULE}"));
  }

  #[tokio::test]
  async fn schedule_falls_back_to_english() {
    let a = assistant(Failing);
    a.handle_inbound_message("+911", "hindi").await.unwrap();
    let reply = a.handle_inbound_message("+911", "vaccine schedule").await.unwrap();
    assert_eq!(reply, VACCINE_SCHEDULE);
  }

  #[tokio::test]
  async fn replies_are_translated_for_non_english() {
    let a = assistant(Tagging);
    let reply = a.answer("covid", Language::Odia).await.unwrap();
    assert!(reply.starts_with("[or] covid\nSymptoms:"), "{reply}");
  }

  #[tokio::test]
  async fn alert_word_is_an_ordinary_query() {
    let a = assistant(Failing);
    let reply = a.answer("chills, alert", Language::English).await.unwrap();
    assert!(reply.starts_with("Possible diseases:"), "{reply}");
    assert!(reply.contains("- fever: Symptoms [chills]"), "{reply}");

    let reply = a.answer("fever alert", Language::English).await.unwrap();
    assert_eq!(reply, "No data found for 'fever alert'.");
  }

  #[tokio::test]
  async fn startup_alert_picks_a_disease() {
    let a = assistant(Failing);
    let alert = a.startup_alert(today()).await.unwrap();
    assert!(alert.starts_with("Disease Alert: Today "), "{alert}");
    assert!(alert.ends_with(ALERT_LANGUAGE_PROMPT));

    let none = a.startup_alert(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).await.unwrap();
    assert_eq!(none, "No disease data found for today.");
  }

  #[tokio::test]
  async fn store_outage_is_fatal_for_queries_only() {
    let store = MemoryStore { down: true, ..store() };
    let a = Assistant::new(Arc::new(store), Localizer::new(Failing, Duration::from_millis(100)));

    // The language step never touches the store.
    assert!(a.handle_inbound_message("+911", "english").await.is_ok());
    assert!(matches!(
      a.handle_inbound_message("+911", "fever").await,
      Err(Error::Store(_))
    ));
  }
}
