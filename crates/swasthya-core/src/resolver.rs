//! Query resolution against a [`KnowledgeStore`].
//!
//! Both entry points normalize their input before it reaches the store; a
//! query that normalizes to nothing resolves to nothing without touching the
//! store.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  disease::{CaseAlert, Disease, DiseaseMatch},
  normalize::normalize,
  store::KnowledgeStore,
};

pub struct Resolver<S> {
  store: Arc<S>,
}

impl<S> Clone for Resolver<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: KnowledgeStore> Resolver<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Look a disease up by (part of) its name.
  pub async fn resolve_by_name(&self, query: &str) -> Result<Option<Disease>> {
    let pattern = normalize(query);
    if pattern.is_empty() {
      return Ok(None);
    }
    self
      .store
      .find_disease_by_partial_name(&pattern)
      .await
      .map_err(Error::store)
  }

  /// Rank diseases by how many distinct symptoms match any of `terms`.
  ///
  /// Results are ordered by match count, highest first; equal counts keep the
  /// store's seeding order. Empty or blank terms are ignored, and a query with
  /// no usable terms yields an empty list.
  pub async fn resolve_by_symptoms<T: AsRef<str>>(
    &self,
    terms: &[T],
  ) -> Result<Vec<DiseaseMatch>> {
    let mut normalized: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
      let t = normalize(term.as_ref());
      if !t.is_empty() && !normalized.contains(&t) {
        normalized.push(t);
      }
    }
    if normalized.is_empty() {
      return Ok(Vec::new());
    }

    let mut matches = self
      .store
      .find_diseases_by_symptom_terms(&normalized)
      .await
      .map_err(Error::store)?;

    matches.retain(|m| m.match_count >= 1);
    // Stable: ties stay in the order the store produced them.
    matches.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    Ok(matches)
  }

  /// Case counts for `date` among diseases whose name contains `query`.
  /// A blank query covers every disease.
  pub async fn today_alerts(
    &self,
    query: &str,
    date: NaiveDate,
  ) -> Result<Vec<CaseAlert>> {
    let pattern = normalize(query);
    self
      .store
      .find_today_case_alert(&pattern, date)
      .await
      .map_err(Error::store)
  }
}
