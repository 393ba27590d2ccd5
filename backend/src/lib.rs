pub mod types;
pub mod helpers;
pub mod payload;
pub mod markup;
pub mod classifier;
pub mod entry_builder;
pub mod dictionary;
pub mod export;
pub mod logger;

pub use types::{DecodeError, Entry, EntryOutcome, InflectionIndex, Part, RawRow, SkipReason};
pub use dictionary::{Dictionary, IngestStats, RowStatus};
pub use entry_builder::build;
