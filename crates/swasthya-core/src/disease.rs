//! Typed aggregates returned by the knowledge store.
//!
//! A disease is keyed by its canonical normalized `name`; `label` keeps the
//! spelling it was seeded with so replies read naturally ("chills", not
//! "chill").

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::dedup_labels;

/// A symptom linked to a disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
  /// Canonical normalized name; unique across the store.
  pub name:  String,
  pub label: String,
}

/// Aggregate view of one disease: its symptoms and prevention advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
  pub name:        String,
  pub label:       String,
  pub symptoms:    Vec<Symptom>,
  /// Advice texts in insertion order.
  pub preventions: Vec<String>,
}

impl Disease {
  /// Symptom labels, de-duplicated by canonical token and ordered by it.
  pub fn symptom_labels(&self) -> Vec<&str> {
    dedup_labels(self.symptoms.iter().map(|s| s.label.as_str()))
  }

  /// Prevention texts with exact duplicates removed, first occurrence kept.
  pub fn distinct_preventions(&self) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(self.preventions.len());
    for p in &self.preventions {
      if !seen.contains(&p.as_str()) {
        seen.push(p);
      }
    }
    seen
  }
}

/// A disease found through its symptoms.
///
/// `disease.symptoms` holds only the symptoms that matched the query terms;
/// `match_count` is the number of distinct matched symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseMatch {
  pub disease:     Disease,
  pub match_count: u32,
}

/// Reported case count for one disease on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAlert {
  pub disease: String,
  pub label:   String,
  pub cases:   u32,
  pub date:    NaiveDate,
}

impl CaseAlert {
  pub fn headline(&self) -> String {
    format!(
      "Disease Alert: Today {} has {} reported cases.",
      self.label, self.cases
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn symptom(label: &str) -> Symptom {
    Symptom { name: crate::normalize::normalize(label), label: label.into() }
  }

  #[test]
  fn symptom_labels_collapse_variants() {
    let d = Disease {
      name:        "measle".into(),
      label:       "measles".into(),
      symptoms:    vec![symptom("rash"), symptom("red eye"), symptom("red eyes")],
      preventions: vec![],
    };
    assert_eq!(d.symptom_labels(), vec!["rash", "red eye"]);
  }

  #[test]
  fn preventions_keep_insertion_order() {
    let d = Disease {
      name:        "fever".into(),
      label:       "fever".into(),
      symptoms:    vec![],
      preventions: vec!["Rest well".into(), "Stay hydrated".into(), "Rest well".into()],
    };
    assert_eq!(d.distinct_preventions(), vec!["Rest well", "Stay hydrated"]);
  }
}
