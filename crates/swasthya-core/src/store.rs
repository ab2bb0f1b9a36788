//! The `KnowledgeStore` trait.
//!
//! Implemented by storage backends (e.g. `swasthya-store-sqlite`). The core
//! only ever reads through it; seeding is a backend-specific administrative
//! operation that completes before serving begins.
//!
//! "Partial match" below means case-insensitive substring match against the
//! canonical normalized names. Callers pass already-normalized patterns.

use std::future::Future;

use chrono::NaiveDate;

use crate::disease::{CaseAlert, Disease, DiseaseMatch};

/// Read-only access to diseases, symptoms, preventions and case counts.
///
/// Implementations must support concurrent reads; all methods return `Send`
/// futures so the trait can be used from a multi-threaded runtime.
pub trait KnowledgeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// First disease (in seeding order) whose name contains `pattern`, with
  /// all its symptoms and preventions.
  fn find_disease_by_partial_name<'a>(
    &'a self,
    pattern: &'a str,
  ) -> impl Future<Output = Result<Option<Disease>, Self::Error>> + Send + 'a;

  /// Diseases linked to at least one symptom whose name contains any of
  /// `terms`, with the matched symptoms only.
  ///
  /// Ordered by `match_count` descending, ties in seeding order.
  fn find_diseases_by_symptom_terms<'a>(
    &'a self,
    terms: &'a [String],
  ) -> impl Future<Output = Result<Vec<DiseaseMatch>, Self::Error>> + Send + 'a;

  /// Case counts recorded on `date` for diseases whose name contains
  /// `pattern`. An empty pattern matches every disease.
  fn find_today_case_alert<'a>(
    &'a self,
    pattern: &'a str,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<CaseAlert>, Self::Error>> + Send + 'a;

  /// Every disease name, aliases included, in seeding order.
  fn list_all_disease_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
