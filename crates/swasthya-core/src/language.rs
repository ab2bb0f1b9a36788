//! The fixed set of conversation languages.

/// A language a user can pick for their session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
  English,
  Hindi,
  Odia,
}

impl Language {
  /// ISO 639-1 code, as understood by the translation service.
  pub fn code(self) -> &'static str {
    match self {
      Self::English => "en",
      Self::Hindi => "hi",
      Self::Odia => "or",
    }
  }

  pub fn is_english(self) -> bool { self == Self::English }

  /// Detect a language choice in free text.
  ///
  /// Matches the English names case-insensitively and the native-script
  /// spellings in their common variants. English wins over Hindi, Hindi over
  /// Odia, when several appear.
  pub fn detect(text: &str) -> Option<Self> {
    let text = text.to_lowercase();
    if text.contains("english") {
      Some(Self::English)
    } else if text.contains("hindi") || HINDI_NATIVE.iter().any(|s| text.contains(s)) {
      Some(Self::Hindi)
    } else if text.contains("odia") || ODIA_NATIVE.iter().any(|s| text.contains(s)) {
      Some(Self::Odia)
    } else {
      None
    }
  }

  /// Reply sent when the user picks this language.
  pub fn acknowledgement(self) -> &'static str {
    match self {
      Self::English => "You selected English.",
      Self::Hindi => "आपने हिंदी चुना है।",
      Self::Odia => "ଆପଣ ଓଡ଼ିଆ ବାଛିଛନ୍ତି",
    }
  }
}

/// Prompt listing the three options; sent until a language is chosen.
pub const LANGUAGE_PROMPT: &str =
  "Please reply with Hindi(हिन्दी), Odia(ଓଡ଼ିଆ), or English.";

// Anusvara and halant spellings.
const HINDI_NATIVE: &[&str] = &["हिंदी", "हिन्दी"];

// DDA + nukta, and the precomposed RRA.
const ODIA_NATIVE: &[&str] = &["ଓଡ଼ିଆ", "ଓଡିଆ", "\u{0B13}\u{0B5C}\u{0B3F}\u{0B06}"];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_english_names() {
    assert_eq!(Language::detect("English please"), Some(Language::English));
    assert_eq!(Language::detect("I pick Odia"), Some(Language::Odia));
    assert_eq!(Language::detect("HINDI"), Some(Language::Hindi));
  }

  #[test]
  fn detects_native_spellings() {
    assert_eq!(Language::detect("हिंदी"), Some(Language::Hindi));
    assert_eq!(Language::detect("हिन्दी में"), Some(Language::Hindi));
    assert_eq!(Language::detect("ଓଡ଼ିଆ"), Some(Language::Odia));
  }

  #[test]
  fn no_language_in_text() {
    assert_eq!(Language::detect("fever"), None);
    assert_eq!(Language::detect(""), None);
  }
}
