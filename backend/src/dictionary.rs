use indexmap::IndexMap;
use serde::Serialize;

use crate::entry_builder::build;
use crate::types::{DecodeError, Entry, EntryOutcome, InflectionIndex, RawRow, SkipReason};

/// Accumulated extraction result: entries by headword and the inflection index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dictionary {
    pub entries: IndexMap<String, Entry>,
    pub inflections: InflectionIndex,
}

/// What happened to one row.
#[derive(Debug)]
pub enum RowStatus {
    Entry,
    Inflection,
    Skipped(SkipReason),
    Failed(DecodeError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub entries: usize,
    pub inflections: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl IngestStats {
    pub fn record(&mut self, status: &RowStatus) {
        self.rows += 1;
        match status {
            RowStatus::Entry => self.entries += 1,
            RowStatus::Inflection => self.inflections += 1,
            RowStatus::Skipped(_) => self.skipped += 1,
            RowStatus::Failed(_) => self.failed += 1,
        }
    }

    pub fn add(&mut self, other: &IngestStats) {
        self.rows += other.rows;
        self.entries += other.entries;
        self.inflections += other.inflections;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the outcome for `word`. An entry replaces an earlier entry of
    /// the same word.
    pub fn apply(&mut self, word: &str, outcome: EntryOutcome) -> RowStatus {
        match outcome {
            EntryOutcome::Parsed(entry) => {
                self.entries.insert(word.to_string(), entry);
                RowStatus::Entry
            }
            EntryOutcome::Inflection { base, word: inflected } => {
                self.inflections.register(&base, &inflected);
                RowStatus::Inflection
            }
            EntryOutcome::Skip(reason) => RowStatus::Skipped(reason),
        }
    }

    /// Build and commit one row. Never aborts: a row that fails to decode is
    /// reported and left out.
    pub fn ingest(&mut self, row: &RawRow) -> RowStatus {
        match build(&row.word, &row.payload, &row.secondary) {
            Ok(outcome) => {
                let status = self.apply(&row.word, outcome);
                match &status {
                    RowStatus::Skipped(reason) => {
                        tracing::debug!("Skipped '{}': {}", row.word, reason.as_str());
                    }
                    _ => tracing::debug!("{}", row.word),
                }
                status
            }
            Err(e) => {
                tracing::warn!("Failed to decode '{}': {}", row.word, e);
                RowStatus::Failed(e)
            }
        }
    }

    pub fn ingest_all<I>(&mut self, rows: I) -> IngestStats
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut stats = IngestStats::default();
        for row in rows {
            let status = self.ingest(&row);
            stats.record(&status);
        }
        stats
    }

    /// Merge the result of another run into this one.
    ///
    /// Entries of `other` win for words present in both, inflection sets are
    /// joined.
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
        self.inflections.merge(other.inflections);
    }

    pub fn entry(&self, word: &str) -> Option<&Entry> {
        self.entries.get(word)
    }
}
