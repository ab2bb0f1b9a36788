//! Text normalization shared by seeding and query resolution.
//!
//! Both sides of every partial match go through [`normalize`], so "Bodies",
//! "body " and "body" all land on the same canonical token.

use std::collections::BTreeMap;

/// Map a word or phrase to its canonical token.
///
/// Lower-cases and trims the input, then folds plurals: a trailing `ies`
/// becomes `y`, otherwise a single trailing `s` is dropped unless the word
/// ends in `ss`. Total and idempotent.
pub fn normalize(word: &str) -> String {
  let w = word.trim().to_lowercase();

  if let Some(stem) = w.strip_suffix("ies") {
    return format!("{stem}y");
  }
  if !w.ends_with('s') || w.ends_with("ss") {
    return w;
  }

  let stem = &w[..w.len() - 1];
  let trimmed = stem.trim_end();
  if trimmed.len() == stem.len() {
    stem.to_owned()
  } else {
    // "flu s" leaves "flu ", which is itself a candidate for folding.
    normalize(trimmed)
  }
}

/// Split comma-separated input into normalized terms, dropping empty ones.
/// Order is preserved and duplicates are kept.
pub fn split_terms(text: &str) -> Vec<String> {
  text
    .split(',')
    .map(normalize)
    .filter(|t| !t.is_empty())
    .collect()
}

/// Render comma-separated input as a sorted, unique, comma-joined list of
/// canonical tokens, for logging a multi-symptom query.
///
/// Replies list symptoms through [`dedup_labels`] instead, which applies the
/// same ordering but shows the seeded spelling ("chills", not "chill").
pub fn canonical_list(text: &str) -> String {
  let mut terms = split_terms(text);
  terms.sort();
  terms.dedup();
  terms.join(", ")
}

/// De-duplicate display labels by their canonical token.
///
/// The result is ordered by token; when several labels share a token the first
/// one seen wins.
pub fn dedup_labels<'a, I>(labels: I) -> Vec<&'a str>
where
  I: IntoIterator<Item = &'a str>,
{
  let mut by_key: BTreeMap<String, &'a str> = BTreeMap::new();
  for label in labels {
    let key = normalize(label);
    if key.is_empty() {
      continue;
    }
    by_key.entry(key).or_insert(label);
  }
  by_key.into_values().collect()
}
