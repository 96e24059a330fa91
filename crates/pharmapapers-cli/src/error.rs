//! Errors surfaced by the command line tool.

use thiserror::Error;

use super::*;

/// Result type alias for the CLI.
pub type Result<T> = core::result::Result<T, CliError>;

/// Failures reported at the command line boundary.
#[derive(Error, Debug)]
pub enum CliError {
  /// Searching, fetching, exporting or loading configuration failed.
  #[error(transparent)]
  Pharma(#[from] PharmaError),

  /// Writing to the console failed.
  #[error(transparent)]
  Io(#[from] io::Error),
}
