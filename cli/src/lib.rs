pub mod source;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};

use tflat_backend::export::write_json_file;
use tflat_backend::logger::format_duration;
use tflat_backend::{Dictionary, IngestStats, RawRow};

/// Settings of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub db_path: PathBuf,
    pub output: PathBuf,
    pub table: String,
    pub limit: Option<usize>,
    pub jobs: usize,
    pub pretty: bool,
}

/// Process rows, on `jobs` worker threads when more than one.
///
/// Rows are split into contiguous chunks and the per-chunk results are merged
/// in chunk order, so the result is the same as a sequential run.
pub fn extract(rows: Vec<RawRow>, jobs: usize) -> Result<(Dictionary, IngestStats)> {
    if jobs <= 1 || rows.len() < 2 {
        let mut dict = Dictionary::new();
        let stats = dict.ingest_all(rows);
        return Ok((dict, stats));
    }

    let chunk_size = rows.len().div_ceil(jobs);

    let results: Vec<Result<(Dictionary, IngestStats)>> = std::thread::scope(|scope| {
        let handles: Vec<_> = rows
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut dict = Dictionary::new();
                    let stats = dict.ingest_all(chunk.iter().cloned());
                    (dict, stats)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow!("Extraction worker panicked")))
            .collect()
    });

    let mut dict = Dictionary::new();
    let mut stats = IngestStats::default();
    for result in results {
        let (part, part_stats) = result?;
        dict.merge(part);
        stats.add(&part_stats);
    }

    Ok((dict, stats))
}

/// Read the database, extract all rows and write the JSON output.
pub fn run(options: &ExtractOptions) -> Result<IngestStats> {
    let start = Instant::now();

    let mut conn = source::establish_connection(&options.db_path)?;
    let rows = source::read_rows(&mut conn, &options.table, options.limit)?;
    tracing::info!("Read {} rows from {}", rows.len(), options.db_path.display());

    let (dict, stats) = extract(rows, options.jobs)?;

    write_json_file(&dict, &options.output, options.pretty)?;

    tracing::info!(
        "Wrote {} entries and {} inflection bases to {}",
        dict.entries.len(),
        dict.inflections.len(),
        options.output.display()
    );
    tracing::info!(
        "Rows: {}, entries: {}, inflections: {}, skipped: {}, failed: {} ({})",
        stats.rows,
        stats.entries,
        stats.inflections,
        stats.skipped,
        stats.failed,
        format_duration(start.elapsed())
    );

    Ok(stats)
}
