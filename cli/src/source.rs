use std::path::Path;

use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Binary, Nullable, Text};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use tflat_backend::RawRow;

/// Table of the TFlat database holding the dictionary records.
pub const DEFAULT_TABLE: &str = "av";

lazy_static! {
    static ref RE_SQL_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SourceError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
    #[error("Database path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

#[derive(QueryableByName, Debug)]
struct AvRow {
    #[diesel(sql_type = Nullable<Text>)]
    word: Option<String>,
    #[diesel(sql_type = Nullable<Binary>)]
    payload: Option<Vec<u8>>,
    #[diesel(sql_type = Nullable<Text>)]
    secondary: Option<String>,
}

impl AvRow {
    fn into_raw_row(self) -> Option<RawRow> {
        let word = self.word?;
        Some(RawRow {
            word,
            payload: self.payload.unwrap_or_default(),
            secondary: self.secondary.unwrap_or_default(),
        })
    }
}

pub fn validate_table_name(table: &str) -> Result<(), SourceError> {
    if RE_SQL_IDENTIFIER.is_match(table) {
        Ok(())
    } else {
        Err(SourceError::InvalidTableName(table.to_string()))
    }
}

pub fn establish_connection(db_path: &Path) -> Result<SqliteConnection> {
    let database_url = db_path
        .to_str()
        .ok_or_else(|| SourceError::NonUtf8Path(db_path.to_string_lossy().to_string()))?;

    SqliteConnection::establish(database_url)
        .with_context(|| format!("Failed to open database: {}", database_url))
}

/// Read `(word, av, mean)` rows from `table`, in rowid order.
///
/// NULL payloads and NULL secondary fields are read as empty. Rows without a
/// word are left out.
pub fn read_rows(conn: &mut SqliteConnection, table: &str, limit: Option<usize>) -> Result<Vec<RawRow>> {
    validate_table_name(table)?;

    let query = format!(
        "SELECT word, av AS payload, mean AS secondary FROM {} ORDER BY rowid LIMIT ?",
        table
    );
    // LIMIT -1 means no limit in SQLite.
    let limit = limit.map(|n| n as i64).unwrap_or(-1);

    let rows: Vec<AvRow> = sql_query(&query)
        .bind::<BigInt, _>(limit)
        .load::<AvRow>(conn)
        .with_context(|| format!("Failed to read rows from table '{}'", table))?;

    let total = rows.len();
    let raw_rows: Vec<RawRow> = rows.into_iter().filter_map(AvRow::into_raw_row).collect();

    if raw_rows.len() < total {
        tracing::warn!("Ignored {} rows without a word", total - raw_rows.len());
    }

    Ok(raw_rows)
}
