use std::collections::BTreeSet;
use std::str::Utf8Error;

use indexmap::IndexMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Part label used when a section carries no part-of-speech marker.
pub const DEFAULT_PART: &str = "_";

/// One record of the source table: headword, payload blob, secondary text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub word: String,
    pub payload: Vec<u8>,
    pub secondary: String,
}

impl RawRow {
    pub fn new(word: impl Into<String>, payload: impl Into<Vec<u8>>, secondary: impl Into<String>) -> Self {
        RawRow {
            word: word.into(),
            payload: payload.into(),
            secondary: secondary.into(),
        }
    }
}

/// Example text -> translation. An example without translation maps to "".
pub type ExampleMap = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub meanings: IndexMap<String, ExampleMap>,
    #[serde(default)]
    pub phrases: IndexMap<String, String>,
}

impl Part {
    /// Returns the examples of a meaning, creating an empty slot on first use.
    pub fn meaning_mut(&mut self, meaning: &str) -> &mut ExampleMap {
        self.meanings.entry(meaning.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parts: IndexMap<String, Part>,
}

impl Entry {
    /// Returns the part for `label`, inserting an empty one if it's new.
    /// An existing label keeps its position and content.
    pub fn part_mut(&mut self, label: &str) -> &mut Part {
        self.parts.entry(label.to_string()).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pronunciation.is_none() && self.parts.is_empty()
    }
}

/// Base headword -> set of inflected spellings pointing to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InflectionIndex(IndexMap<String, BTreeSet<String>>);

impl InflectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `word` was not yet registered under `base`.
    pub fn register(&mut self, base: &str, word: &str) -> bool {
        self.0.entry(base.to_string()).or_default().insert(word.to_string())
    }

    pub fn get(&self, base: &str) -> Option<&BTreeSet<String>> {
        self.0.get(base)
    }

    pub fn contains(&self, base: &str, word: &str) -> bool {
        self.0.get(base).is_some_and(|words| words.contains(word))
    }

    /// Set union per base.
    pub fn merge(&mut self, other: InflectionIndex) {
        for (base, words) in other.0 {
            self.0.entry(base).or_default().extend(words);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, BTreeSet<String>> {
        self.0.iter()
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid UTF-8 text: {0}")]
    Encoding(#[from] Utf8Error),

    #[error("gzip decompression failed: {0}")]
    Compression(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyPayload,
    /// The secondary field was flagged as an inflection but had no base form left.
    InvalidInflectionBase,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmptyPayload => "empty payload",
            SkipReason::InvalidInflectionBase => "empty inflection base",
        }
    }
}

/// What a single row turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Parsed(Entry),
    Inflection { base: String, word: String },
    Skip(SkipReason),
}
