//! Core types for the catalog engine.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Section key used when a name has no alphabetic first character.
pub const FALLBACK_SECTION_KEY: &str = "?";

/// Identifier of a catalog record.
///
/// The identifier is the record's symbol, so it stays stable across edits
/// only as long as the symbol itself is unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Creates a record ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the record ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Label of a section (the uppercased first letter of its records' names).
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(pub String);

impl SectionKey {
    /// Creates a section key from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The shared bucket for empty names and names starting with a non-letter.
    pub fn fallback() -> Self {
        Self(FALLBACK_SECTION_KEY.to_string())
    }

    /// Derives the section key for a record name.
    ///
    /// Uppercasing can expand a character (`ß` becomes `SS`); only the first
    /// character of the expansion is kept.
    pub fn for_name(name: &str) -> Self {
        match name.chars().next() {
            Some(first) if first.is_alphabetic() => first
                .to_uppercase()
                .next()
                .map(|c| Self(c.to_string()))
                .unwrap_or_else(Self::fallback),
            _ => Self::fallback(),
        }
    }

    /// Returns the section key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SectionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A catalog entry.
///
/// Equality and hashing consider the identity only: two records with the
/// same symbol are the same record, whatever their other fields say.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub usage: String,
}

impl Record {
    /// Creates a record from its four fields.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            description: description.into(),
            usage: usage.into(),
        }
    }

    /// Returns the record's identity.
    pub fn id(&self) -> RecordId {
        RecordId(self.symbol.clone())
    }

    /// Returns the key of the section this record is grouped under.
    pub fn section_key(&self) -> SectionKey {
        SectionKey::for_name(&self.name)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

/// A rendered position: section index and item index within that section.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ItemPosition {
    pub section: usize,
    pub item: usize,
}

impl ItemPosition {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Where an edit session started from.
///
/// Editors hand the store a finished record together with this flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditOrigin {
    /// The editor was opened to create a new record.
    New,
    /// The editor was opened on an existing record with this identity.
    Existing(RecordId),
}
