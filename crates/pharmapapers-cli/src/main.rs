//! Command line interface for finding PubMed papers with industry-affiliated authors.
//!
//! The tool searches PubMed, fetches the matching records and prints a CSV report of the
//! papers that have at least one author affiliated with a pharmaceutical or biotech
//! company.
//!
//! # Usage
//!
//! ```bash
//! # Print the report to the console
//! get-papers-list "cancer immunotherapy"
//!
//! # Save the report, fetching at most 500 papers
//! get-papers-list "crispr AND 2023[dp]" --max-results 500 --file crispr.csv
//!
//! # Show debug logs and full error traces
//! get-papers-list "mrna vaccine" --debug
//! ```
//!
//! Logs go to stderr, so the report on stdout can be piped or redirected as is.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  io::{self, Write},
  path::PathBuf,
  process::ExitCode,
};

use clap::Parser;
use console::style;
use pharmapapers::{error::PharmaError, export, Config, PharmaPapers};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod find;
pub mod interaction;

use crate::{error::*, find::*, interaction::*};

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
  name = "get-papers-list",
  author,
  version,
  about = "Find PubMed papers with authors affiliated with pharmaceutical or biotech companies."
)]
pub struct Cli {
  /// PubMed search query, using the full PubMed query syntax
  query: String,

  /// Print debug information, including full error traces
  #[arg(short, long)]
  debug: bool,

  /// File path to save results to (prints to the console when not provided)
  #[arg(short, long)]
  file: Option<PathBuf>,

  /// Maximum number of results to fetch
  #[arg(short, long, default_value_t = 100)]
  max_results: usize,

  /// Path to a TOML configuration file. Defaults to the platform config directory when a
  /// file exists there.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Contact email sent to NCBI with every request, overriding the configuration
  #[arg(long)]
  email: Option<String>,
}

/// Configures the logging system.
///
/// Logs are written to stderr. Without `--debug` only warnings and errors are shown; with
/// it, debug output from this tool and the library is enabled too. `RUST_LOG` overrides
/// both.
fn setup_logging(debug: bool) {
  let filter = if debug { "pharmapapers=debug,get_papers_list=debug,warn" } else { "warn" };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_file(debug)
    .with_line_number(debug)
    .with_target(true)
    .init();
}

/// Entry point for the `get-papers-list` binary.
///
/// Exits with status 0 on success, including when nothing matched the query, and with
/// status 1 on any failure.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.debug);

  match find(&cli, &cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      // Nothing better to do if stderr itself is gone.
      let _ = cli.reply(ResponseContent::Error(&e));
      ExitCode::FAILURE
    },
  }
}
