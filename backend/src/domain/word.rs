//! Vocabulary word records and their enrichment payload.
//!
//! A [`WordRecord`] belongs to one user and carries the generated enrichment
//! for one word. Records are addressed by a surrogate [`RecordKey`] and carry
//! a `version` stamp so mutations can detect concurrent changes. Their row
//! position in storage is never part of their identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum word length in characters.
pub const WORD_MAX: usize = 64;
/// Number of synonyms and example sentences requested per word.
pub const LIST_FIELD_LEN: usize = 3;

/// Validation errors for [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordValidationError {
    #[error("word must not be empty")]
    Empty,
    #[error("word must be at most {max} characters")]
    TooLong { max: usize },
}

/// A vocabulary word submitted by a learner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Validate and construct a [`Word`]. Surrounding whitespace is removed.
    ///
    /// # Examples
    /// ```
    /// use vocab_backend::domain::Word;
    ///
    /// assert_eq!(Word::new(" resilient ").expect("valid").as_ref(), "resilient");
    /// assert!(Word::new("   ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, WordValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WordValidationError::Empty);
        }
        if trimmed.chars().count() > WORD_MAX {
            return Err(WordValidationError::TooLong { max: WORD_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.0
    }
}

impl TryFrom<String> for Word {
    type Error = WordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable surrogate key of a word record, independent of its storage row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(Uuid);

impl RecordKey {
    /// Mint a fresh key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a key from its textual form.
    ///
    /// # Errors
    /// Returns the UUID parse error for malformed input.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-field record of whether the completion service produced a value.
///
/// `false` means the field was requested but came back blank, or was never
/// requested at all (legacy rows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldCompleteness {
    pub pronunciation: bool,
    pub definition: bool,
    pub synonyms: bool,
    pub examples: bool,
}

impl FieldCompleteness {
    /// True when every field was produced.
    pub fn is_complete(&self) -> bool {
        self.pronunciation && self.definition && self.synonyms && self.examples
    }

    /// Field-wise union.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            pronunciation: self.pronunciation || other.pronunciation,
            definition: self.definition || other.definition,
            synonyms: self.synonyms || other.synonyms,
            examples: self.examples || other.examples,
        }
    }
}

/// Generated auxiliary fields for one word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub pronunciation: String,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub examples: Vec<String>,
}

impl Enrichment {
    /// Derive completeness flags from the populated fields.
    pub fn completeness(&self) -> FieldCompleteness {
        FieldCompleteness {
            pronunciation: !self.pronunciation.is_empty(),
            definition: !self.definition.is_empty(),
            synonyms: !self.synonyms.is_empty(),
            examples: !self.examples.is_empty(),
        }
    }

    /// True when every field holds a value.
    pub fn is_complete(&self) -> bool {
        self.completeness().is_complete()
    }

    /// Keep populated fields from `self` and fill blanks from `fresh`.
    #[must_use]
    pub fn fill_blanks_from(self, fresh: Self) -> Self {
        fn pick<T: Default + PartialEq>(current: T, fresh: T) -> T {
            if current == T::default() { fresh } else { current }
        }
        Self {
            pronunciation: pick(self.pronunciation, fresh.pronunciation),
            definition: pick(self.definition, fresh.definition),
            synonyms: pick(self.synonyms, fresh.synonyms),
            examples: pick(self.examples, fresh.examples),
        }
    }
}

/// A stored vocabulary record.
///
/// `key` is `None` and `version` is `0` for legacy rows written before keys
/// existed; backfill assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub key: Option<RecordKey>,
    pub user_id: UserId,
    pub word: String,
    pub enrichment: Enrichment,
    pub completeness: FieldCompleteness,
    pub version: u64,
}

impl WordRecord {
    /// Build a freshly enriched record with a new key at version 1.
    pub fn new(user_id: UserId, word: &Word, enrichment: Enrichment) -> Self {
        let completeness = enrichment.completeness();
        Self {
            key: Some(RecordKey::generate()),
            user_id,
            word: word.as_ref().to_owned(),
            enrichment,
            completeness,
            version: 1,
        }
    }

    /// True when every enrichment field is populated.
    pub fn is_complete(&self) -> bool {
        self.enrichment.is_complete()
    }
}

/// Render a list as 1-indexed numbered lines for display.
///
/// # Examples
/// ```
/// use vocab_backend::domain::numbered_text;
///
/// let items = vec!["tough".to_owned(), "hardy".to_owned()];
/// assert_eq!(numbered_text(&items), "1. tough\n2. hardy");
/// ```
pub fn numbered_text(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{}. {item}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode a list for a scalar storage cell. Empty lists encode as `""`.
pub fn encode_list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    serde_json::to_string(items).unwrap_or_default()
}

/// Decode a list from a scalar storage cell.
///
/// Cells written by this service hold JSON arrays and decode exactly. Older
/// cells hold numbered display text; when every line carries an `N. ` prefix
/// the prefixes are stripped, otherwise the whole cell becomes one item.
pub fn decode_list(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
        return items;
    }
    let lines: Vec<&str> = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let stripped: Option<Vec<String>> = lines
        .iter()
        .map(|line| strip_number_prefix(line).map(str::to_owned))
        .collect();
    stripped.unwrap_or_else(|| vec![trimmed.to_owned()])
}

fn strip_number_prefix(line: &str) -> Option<&str> {
    let (number, rest) = line.split_once(". ")?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(rest.trim())
}
