//! The seeding routine: dataset description and the SQL that loads it.
//!
//! Seeding drops and recreates every table, then loads the dataset inside a
//! single transaction. It is an administrative step and must finish before
//! the store serves queries.
//!
//! Aliases are materialized by duplication: each alias becomes a disease of
//! its own holding a copy of the canonical disease's symptom links,
//! preventions and case counts as they stand at seed time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use swasthya_core::normalize::normalize;

use crate::{
  Error, Result,
  encode::{encode_count, encode_date},
};

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// One disease as written in a dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseSeed {
  pub name:        String,
  pub symptoms:    Vec<String>,
  #[serde(default)]
  pub preventions: Vec<String>,
  /// Case count recorded for the seed date.
  #[serde(default)]
  pub cases:       u32,
}

/// Everything the seeding routine loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
  pub diseases:         Vec<DiseaseSeed>,
  /// Canonical disease name to alternative names ("tuberculosis" -> "tb").
  #[serde(default)]
  pub aliases:          BTreeMap<String, Vec<String>>,
  /// Symptom to curated variants linked alongside it.
  #[serde(default)]
  pub symptom_variants: BTreeMap<String, Vec<String>>,
}

impl Dataset {
  pub fn from_json(json: &str) -> Result<Self> {
    let dataset: Self = serde_json::from_str(json)?;
    dataset.validate()?;
    Ok(dataset)
  }

  /// Reject names that normalize to nothing and aliases of unknown diseases.
  pub fn validate(&self) -> Result<()> {
    for d in &self.diseases {
      if normalize(&d.name).is_empty() {
        return Err(Error::InvalidDataset("disease with an empty name".into()));
      }
      if let Some(s) = d.symptoms.iter().find(|s| normalize(s).is_empty()) {
        return Err(Error::InvalidDataset(format!(
          "empty symptom {s:?} for disease {:?}",
          d.name
        )));
      }
    }
    for (canonical, aliases) in &self.aliases {
      let key = normalize(canonical);
      if !self.diseases.iter().any(|d| normalize(&d.name) == key) {
        return Err(Error::InvalidDataset(format!(
          "alias target {canonical:?} is not a disease"
        )));
      }
      if aliases.iter().any(|a| normalize(a).is_empty()) {
        return Err(Error::InvalidDataset(format!("empty alias for {canonical:?}")));
      }
    }
    Ok(())
  }

  /// Aliases of `disease`, matched on the normalized name.
  fn aliases_of(&self, disease: &str) -> impl Iterator<Item = &str> {
    let key = normalize(disease);
    self
      .aliases
      .iter()
      .filter(move |(canonical, _)| normalize(canonical) == key)
      .flat_map(|(_, aliases)| aliases.iter().map(String::as_str))
  }

  /// The symptom itself plus its curated variants, as `(name, label)` pairs
  /// de-duplicated on name.
  fn symptom_variants_of<'a>(&'a self, symptom: &'a str) -> Vec<(String, &'a str)> {
    let base = normalize(symptom);
    let mut variants = vec![(base.clone(), symptom.trim())];
    for (key, extra) in &self.symptom_variants {
      if normalize(key) != base {
        continue;
      }
      for v in extra {
        let name = normalize(v);
        if !name.is_empty() && !variants.iter().any(|(n, _)| *n == name) {
          variants.push((name, v.trim()));
        }
      }
    }
    variants
  }

  /// The reference dataset shipped with the assistant.
  pub fn builtin() -> Self {
    const DISEASES: &[(&str, &[&str], &[&str], u32)] = &[
      (
        "fever",
        &["high temperature", "sweating", "chills"],
        &["Stay hydrated", "Rest well", "Take paracetamol if needed"],
        120,
      ),
      (
        "covid",
        &["cough", "fever", "loss of taste or smell"],
        &["Wear mask", "Sanitize hands", "Get vaccinated"],
        85,
      ),
      (
        "malaria",
        &["fever", "chills", "sweating"],
        &["Use mosquito nets", "Avoid stagnant water", "Take preventive medication"],
        64,
      ),
      (
        "dengue",
        &["rash", "fever", "joint pain"],
        &["Avoid mosquito bites", "Wear full sleeves", "Use repellents"],
        42,
      ),
      (
        "typhoid",
        &["abdominal pain", "fever", "headache"],
        &["Drink clean water", "Wash fruits/vegetables", "Vaccination"],
        32,
      ),
      (
        "tuberculosis",
        &["chronic cough", "weight loss", "fever"],
        &["Vaccination (BCG)", "Good ventilation", "Avoid contact with TB patients"],
        28,
      ),
      (
        "asthma",
        &["shortness of breath", "wheezing", "coughing"],
        &["Avoid allergens", "Take inhalers", "Exercise regularly"],
        50,
      ),
      (
        "pneumonia",
        &["chest pain", "fever", "cough with phlegm"],
        &["Vaccination", "Avoid smoking", "Seek early treatment"],
        23,
      ),
      (
        "cholera",
        &["diarrhea", "vomiting", "dehydration"],
        &["Drink safe water", "Proper sanitation", "Oral rehydration"],
        14,
      ),
      (
        "hepatitis",
        &["jaundice", "fatigue", "loss of appetite"],
        &["Vaccination", "Drink clean water", "Wash hands"],
        19,
      ),
      (
        "chickenpox",
        &["rash", "fever", "itching"],
        &["Vaccination", "Avoid contact with infected", "Keep skin clean"],
        16,
      ),
      (
        "measles",
        &["rash", "fever", "red eye"],
        &["MMR vaccine", "Avoid contact with infected", "Maintain hygiene"],
        10,
      ),
      (
        "polio",
        &["muscle weakness", "paralysis", "fever"],
        &["Polio vaccine", "Good hygiene"],
        3,
      ),
      (
        "influenza",
        &["fever", "body ache", "cough"],
        &["Flu shot", "Maintain hygiene", "Rest"],
        90,
      ),
      (
        "hypertension",
        &["headache", "dizziness", "chest pain"],
        &["Eat healthy", "Exercise regularly", "Reduce salt intake"],
        110,
      ),
    ];

    const ALIASES: &[(&str, &[&str])] = &[
      ("tuberculosis", &["tb"]),
      ("influenza", &["flu"]),
      ("hypertension", &["high blood pressure"]),
    ];

    const VARIANTS: &[(&str, &[&str])] = &[
      ("red eye", &["red eyes"]),
      ("chronic cough", &["cough"]),
      ("body ache", &["body aches"]),
      ("coughing", &["cough"]),
    ];

    fn owned(items: &[&str]) -> Vec<String> {
      items.iter().map(|s| (*s).to_owned()).collect()
    }

    Self {
      diseases:         DISEASES
        .iter()
        .map(|(name, symptoms, preventions, cases)| DiseaseSeed {
          name:        (*name).to_owned(),
          symptoms:    owned(symptoms),
          preventions: owned(preventions),
          cases:       *cases,
        })
        .collect(),
      aliases:          ALIASES
        .iter()
        .map(|(k, v)| ((*k).to_owned(), owned(v)))
        .collect(),
      symptom_variants: VARIANTS
        .iter()
        .map(|(k, v)| ((*k).to_owned(), owned(v)))
        .collect(),
    }
  }
}

/// Row counts after a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
  pub diseases:    u32,
  pub symptoms:    u32,
  pub links:       u32,
  pub preventions: u32,
  pub cases:       u32,
}

// ─── SQL ─────────────────────────────────────────────────────────────────────

/// Load `dataset` into freshly created tables. Runs inside the caller's
/// transaction.
pub(crate) fn load(
  conn: &Connection,
  dataset: &Dataset,
  date: NaiveDate,
) -> rusqlite::Result<()> {
  let date_str = encode_date(date);

  for seed in &dataset.diseases {
    let disease_id = insert_disease(conn, &seed.name)?;

    for symptom in &seed.symptoms {
      for (name, label) in dataset.symptom_variants_of(symptom) {
        let symptom_id = insert_symptom(conn, &name, label)?;
        conn.execute(
          "INSERT OR IGNORE INTO disease_symptoms (disease_id, symptom_id) VALUES (?1, ?2)",
          params![disease_id, symptom_id],
        )?;
      }
    }

    for prevention in &seed.preventions {
      conn.execute(
        "INSERT INTO preventions (disease_id, prevention_text) VALUES (?1, ?2)",
        params![disease_id, prevention.trim()],
      )?;
    }

    conn.execute(
      "INSERT INTO cases (disease_id, case_date, num_cases) VALUES (?1, ?2, ?3)",
      params![disease_id, date_str, encode_count(seed.cases)],
    )?;

    for alias in dataset.aliases_of(&seed.name) {
      let alias_id = insert_disease(conn, alias)?;
      copy_disease(conn, disease_id, alias_id)?;
    }
  }

  Ok(())
}

pub(crate) fn report(conn: &Connection) -> rusqlite::Result<SeedReport> {
  let count = |table: &str| -> rusqlite::Result<u32> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
  };
  Ok(SeedReport {
    diseases:    count("diseases")?,
    symptoms:    count("symptoms")?,
    links:       count("disease_symptoms")?,
    preventions: count("preventions")?,
    cases:       count("cases")?,
  })
}

/// Insert a disease unless its normalized name exists; return its id.
fn insert_disease(conn: &Connection, label: &str) -> rusqlite::Result<i64> {
  let name = normalize(label);
  conn.execute(
    "INSERT OR IGNORE INTO diseases (name, label) VALUES (?1, ?2)",
    params![name, label.trim()],
  )?;
  conn.query_row(
    "SELECT disease_id FROM diseases WHERE name = ?1",
    params![name],
    |r| r.get(0),
  )
}

fn insert_symptom(conn: &Connection, name: &str, label: &str) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT OR IGNORE INTO symptoms (name, label) VALUES (?1, ?2)",
    params![name, label],
  )?;
  conn.query_row(
    "SELECT symptom_id FROM symptoms WHERE name = ?1",
    params![name],
    |r| r.get(0),
  )
}

/// Copy links, preventions and case counts from one disease to another.
fn copy_disease(conn: &Connection, from: i64, to: i64) -> rusqlite::Result<()> {
  if from == to {
    return Ok(());
  }
  conn.execute(
    "INSERT OR IGNORE INTO disease_symptoms (disease_id, symptom_id)
     SELECT ?1, symptom_id FROM disease_symptoms WHERE disease_id = ?2",
    params![to, from],
  )?;
  conn.execute(
    "INSERT INTO preventions (disease_id, prevention_text)
     SELECT ?1, prevention_text FROM preventions WHERE disease_id = ?2
     ORDER BY prevention_id",
    params![to, from],
  )?;
  conn.execute(
    "INSERT INTO cases (disease_id, case_date, num_cases)
     SELECT ?1, case_date, num_cases FROM cases WHERE disease_id = ?2
     ORDER BY case_id",
    params![to, from],
  )?;
  Ok(())
}
