//! Per-user conversation state.
//!
//! A session starts out waiting for a language choice and, once a language is
//! picked, stays ready for the rest of the process lifetime. Sessions live in
//! a [`SessionRegistry`] keyed by user identity (e.g. a phone number); each
//! one sits behind its own async mutex so messages from the same identity are
//! handled strictly one at a time while different identities proceed in
//! parallel.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::OwnedMutexGuard;

use crate::language::{LANGUAGE_PROMPT, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
  #[default]
  AwaitingLanguage,
  Ready(Language),
}

/// Outcome of offering text to a session that has no language yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageStep {
  Selected(Language),
  Reprompt,
}

impl LanguageStep {
  pub fn reply(self) -> &'static str {
    match self {
      Self::Selected(lang) => lang.acknowledgement(),
      Self::Reprompt => LANGUAGE_PROMPT,
    }
  }
}

#[derive(Debug, Default)]
pub struct Session {
  state: SessionState,
}

impl Session {
  pub fn state(&self) -> SessionState { self.state }

  pub fn language(&self) -> Option<Language> {
    match self.state {
      SessionState::Ready(lang) => Some(lang),
      SessionState::AwaitingLanguage => None,
    }
  }

  /// Apply the language-selection step to raw inbound text.
  ///
  /// Only meaningful while awaiting a language; a ready session is left
  /// untouched and reports its current language.
  pub fn select_language(&mut self, text: &str) -> LanguageStep {
    if let SessionState::Ready(lang) = self.state {
      return LanguageStep::Selected(lang);
    }
    match Language::detect(text) {
      Some(lang) => {
        self.state = SessionState::Ready(lang);
        LanguageStep::Selected(lang)
      }
      None => LanguageStep::Reprompt,
    }
  }
}

/// Exclusive access to one identity's session.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// All live sessions, keyed by user identity.
#[derive(Default)]
pub struct SessionRegistry {
  sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionRegistry {
  pub fn new() -> Self { Self::default() }

  /// Lock the session for `identity`, creating it on first contact.
  ///
  /// Hold the guard for the whole read-modify-write and reply pipeline; a
  /// second message from the same identity waits here until it is dropped.
  pub async fn acquire(&self, identity: &str) -> SessionGuard {
    let slot = {
      let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
      Arc::clone(sessions.entry(identity.to_owned()).or_default())
    };
    slot.lock_owned().await
  }

  /// Current state for `identity`, if it has ever been seen.
  pub async fn state(&self, identity: &str) -> Option<SessionState> {
    let slot = {
      let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
      sessions.get(identity).cloned()
    }?;
    Some(slot.lock().await.state())
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[test]
  fn fresh_session_awaits_language() {
    let s = Session::default();
    assert_eq!(s.state(), SessionState::AwaitingLanguage);
    assert_eq!(s.language(), None);
  }

  #[test]
  fn picking_odia_makes_session_ready() {
    let mut s = Session::default();
    assert_eq!(s.select_language("I pick Odia"), LanguageStep::Selected(Language::Odia));
    assert_eq!(s.state(), SessionState::Ready(Language::Odia));
  }

  #[test]
  fn anything_else_reprompts() {
    let mut s = Session::default();
    let step = s.select_language("fever");
    assert_eq!(step, LanguageStep::Reprompt);
    assert_eq!(step.reply(), LANGUAGE_PROMPT);
    assert_eq!(s.state(), SessionState::AwaitingLanguage);
  }

  #[test]
  fn ready_session_never_changes_language() {
    let mut s = Session::default();
    s.select_language("english");
    assert_eq!(s.select_language("hindi"), LanguageStep::Selected(Language::English));
    assert_eq!(s.language(), Some(Language::English));
  }

  #[tokio::test]
  async fn registry_creates_sessions_lazily() {
    let reg = SessionRegistry::new();
    assert!(reg.is_empty());
    assert_eq!(reg.state("+911").await, None);

    reg.acquire("+911").await.select_language("hindi");
    assert_eq!(reg.state("+911").await, Some(SessionState::Ready(Language::Hindi)));
    assert_eq!(reg.state("+912").await, None);
    assert_eq!(reg.len(), 1);
  }

  #[tokio::test]
  async fn same_identity_is_serialized() {
    let reg = Arc::new(SessionRegistry::new());
    let guard = reg.acquire("+911").await;

    let waiter = {
      let reg = Arc::clone(&reg);
      tokio::spawn(async move { reg.acquire("+911").await.language() })
    };

    // The second acquire cannot finish while the first guard is held.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    // Other identities are not blocked.
    let other = tokio::time::timeout(Duration::from_secs(1), reg.acquire("+912")).await;
    assert!(other.is_ok());

    let mut guard = guard;
    guard.select_language("odia");
    drop(guard);

    assert_eq!(waiter.await.unwrap(), Some(Language::Odia));
  }
}
