use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use dotenvy::dotenv;

use tflat_backend::logger::{init_tracing, Level};
use tflat_cli::source::DEFAULT_TABLE;
use tflat_cli::{run, ExtractOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract TFlat dictionary entries to JSON", long_about = None)]
struct Cli {
    /// Path to the TFlat SQLite database
    #[arg(value_name = "DB_PATH", env = "TFLAT_DB_PATH")]
    db_path: PathBuf,

    /// Where to write the JSON output
    #[arg(short, long, value_name = "FILE", env = "TFLAT_OUTPUT", default_value = "output.json")]
    output: PathBuf,

    /// Table holding the (word, av, mean) records
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Only process the first N rows
    #[arg(long)]
    limit: Option<usize>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Write JSON without indentation
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log level: silent, error, warn, info, debug
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() {
    // Load .env before parsing, so clap sees its values through `env = ...`.
    let dotenv_loaded = dotenv().is_ok();

    let cli = Cli::parse();

    let level = match Level::from_str(&cli.log_level) {
        Some(level) => level,
        None => {
            eprintln!("Error: Unknown log level: {}", cli.log_level);
            exit(1);
        }
    };
    init_tracing(level);

    if !dotenv_loaded {
        tracing::debug!("No .env file found");
    }

    if !cli.db_path.is_file() {
        eprintln!("Error: \"{}\" is not a valid file!", cli.db_path.display());
        exit(1);
    }

    let options = ExtractOptions {
        db_path: cli.db_path,
        output: cli.output,
        table: cli.table,
        limit: cli.limit,
        jobs: cli.jobs.max(1),
        pretty: !cli.compact,
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}
