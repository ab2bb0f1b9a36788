//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 calendar dates (`YYYY-MM-DD`). Partial-match
//! patterns are escaped so user text never acts as a `LIKE` wildcard.

use chrono::NaiveDate;
use swasthya_core::disease::CaseAlert;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Escape character used in every `LIKE … ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Build a "contains" pattern for `LIKE ?n ESCAPE '\'`.
pub fn contains_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | LIKE_ESCAPE) {
      pattern.push(LIKE_ESCAPE);
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(n: u32) -> i64 { i64::from(n) }

pub fn decode_count(n: i64) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::Corrupt(format!("case count out of range: {n}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `cases` row joined with its disease, before decoding.
pub struct RawCaseAlert {
  pub disease: String,
  pub label:   String,
  pub cases:   i64,
  pub date:    String,
}

impl RawCaseAlert {
  pub fn into_alert(self) -> Result<CaseAlert> {
    Ok(CaseAlert {
      disease: self.disease,
      label:   self.label,
      cases:   decode_count(self.cases)?,
      date:    decode_date(&self.date)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("fever"), "%fever%");
    assert_eq!(contains_pattern("50%_x"), "%50\\%\\_x%");
    assert_eq!(contains_pattern(""), "%%");
  }

  #[test]
  fn negative_counts_are_rejected() {
    assert!(decode_count(-1).is_err());
    assert_eq!(decode_count(42).unwrap(), 42);
  }

  #[test]
  fn bad_dates_are_rejected() {
    assert!(decode_date("18/10/2026").is_err());
  }
}
