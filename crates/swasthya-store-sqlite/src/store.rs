//! [`SqliteStore`], the SQLite implementation of [`KnowledgeStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};
use swasthya_core::{
  disease::{CaseAlert, Disease, DiseaseMatch, Symptom},
  store::KnowledgeStore,
};

use crate::{
  Error, Result,
  encode::{RawCaseAlert, contains_pattern, encode_date},
  schema::{PRAGMAS, RESET, TABLES},
  seed::{self, Dataset, SeedReport},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A knowledge store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Queries from
/// concurrent callers are queued onto the connection's worker thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Replace the store's contents with `dataset`, recording its case counts
  /// under `date`.
  ///
  /// Everything happens in one transaction: on failure the previous contents
  /// survive untouched.
  pub async fn seed(&self, dataset: Dataset, date: NaiveDate) -> Result<SeedReport> {
    dataset.validate()?;

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(RESET)?;
        tx.execute_batch(TABLES)?;
        seed::load(&tx, &dataset, date)?;
        let report = seed::report(&tx)?;
        tx.commit()?;
        Ok(report)
      })
      .await?;

    tracing::info!(
      diseases = report.diseases,
      symptoms = report.symptoms,
      links = report.links,
      %date,
      "knowledge store seeded"
    );
    Ok(report)
  }

  /// True when no disease has been seeded yet.
  pub async fn is_empty(&self) -> Result<bool> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM diseases", [], |r| r.get(0))?))
      .await?;
    Ok(count == 0)
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn symptoms_of(conn: &Connection, disease_id: i64) -> rusqlite::Result<Vec<Symptom>> {
  let mut stmt = conn.prepare(
    "SELECT s.name, s.label
     FROM disease_symptoms ds
     JOIN symptoms s ON s.symptom_id = ds.symptom_id
     WHERE ds.disease_id = ?1
     ORDER BY s.symptom_id",
  )?;
  stmt
    .query_map(params![disease_id], |row| {
      Ok(Symptom { name: row.get(0)?, label: row.get(1)? })
    })?
    .collect()
}

fn preventions_of(conn: &Connection, disease_id: i64) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT prevention_text FROM preventions WHERE disease_id = ?1 ORDER BY prevention_id",
  )?;
  stmt.query_map(params![disease_id], |row| row.get(0))?.collect()
}

/// `s.name LIKE ?1 ESCAPE '\' OR s.name LIKE ?2 ESCAPE '\' …`
fn symptom_like_clauses(n: usize) -> String {
  (1..=n)
    .map(|i| format!("s.name LIKE ?{i} ESCAPE '\\'"))
    .collect::<Vec<_>>()
    .join(" OR ")
}

// ─── KnowledgeStore impl ─────────────────────────────────────────────────────

impl KnowledgeStore for SqliteStore {
  type Error = Error;

  async fn find_disease_by_partial_name(&self, pattern: &str) -> Result<Option<Disease>> {
    let like = contains_pattern(pattern);

    let disease = self
      .conn
      .call(move |conn| {
        let head: Option<(i64, String, String)> = conn
          .query_row(
            "SELECT disease_id, name, label FROM diseases
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY disease_id
             LIMIT 1",
            params![like],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
          )
          .optional()?;

        let Some((id, name, label)) = head else {
          return Ok(None);
        };

        Ok(Some(Disease {
          name,
          label,
          symptoms: symptoms_of(conn, id)?,
          preventions: preventions_of(conn, id)?,
        }))
      })
      .await?;

    Ok(disease)
  }

  async fn find_diseases_by_symptom_terms(&self, terms: &[String]) -> Result<Vec<DiseaseMatch>> {
    if terms.is_empty() {
      return Ok(Vec::new());
    }
    let patterns: Vec<String> = terms.iter().map(|t| contains_pattern(t)).collect();

    let mut matches = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT d.disease_id, d.name, d.label, s.name, s.label
           FROM diseases d
           JOIN disease_symptoms ds ON ds.disease_id = d.disease_id
           JOIN symptoms s          ON s.symptom_id  = ds.symptom_id
           WHERE {}
           ORDER BY d.disease_id, s.symptom_id",
          symptom_like_clauses(patterns.len())
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(patterns.iter()), |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, String>(2)?,
              Symptom { name: row.get(3)?, label: row.get(4)? },
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Rows arrive grouped by disease, in seeding order.
        let mut grouped: Vec<(i64, Disease)> = Vec::new();
        for (id, name, label, symptom) in rows {
          if let Some((last, disease)) = grouped.last_mut()
            && *last == id
          {
            disease.symptoms.push(symptom);
            continue;
          }
          grouped.push((id, Disease {
            name,
            label,
            symptoms: vec![symptom],
            preventions: Vec::new(),
          }));
        }

        let mut matches = Vec::with_capacity(grouped.len());
        for (id, mut disease) in grouped {
          disease.preventions = preventions_of(conn, id)?;
          matches.push(DiseaseMatch {
            match_count: disease.symptoms.len() as u32,
            disease,
          });
        }
        Ok(matches)
      })
      .await?;

    matches.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    Ok(matches)
  }

  async fn find_today_case_alert(&self, pattern: &str, date: NaiveDate) -> Result<Vec<CaseAlert>> {
    let like = contains_pattern(pattern);
    let date_str = encode_date(date);

    let raws: Vec<RawCaseAlert> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT d.name, d.label, c.num_cases, c.case_date
           FROM cases c
           JOIN diseases d ON d.disease_id = c.disease_id
           WHERE d.name LIKE ?1 ESCAPE '\\' AND c.case_date = ?2
           ORDER BY d.disease_id, c.case_id",
        )?;
        let rows = stmt
          .query_map(params![like, date_str], |row| {
            Ok(RawCaseAlert {
              disease: row.get(0)?,
              label:   row.get(1)?,
              cases:   row.get(2)?,
              date:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCaseAlert::into_alert).collect()
  }

  async fn list_all_disease_names(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM diseases ORDER BY disease_id")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }
}
