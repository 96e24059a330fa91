//! Console output for the CLI.
//!
//! The report itself goes to stdout untouched; status messages go to stdout with a
//! prefix, errors go to stderr.

use std::error::Error as _;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for each line of an error's cause chain
pub static CAUSE_PREFIX: &str = "  └─ ";

/// Things the CLI tells the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// The CSV report, printed verbatim
  Report(&'a str),
  /// A completed action
  Success(&'a str),
  /// A neutral status message
  Info(&'a str),
  /// A failure, printed to stderr
  Error(&'a CliError),
}

/// Output sink for [`ResponseContent`].
pub trait UserInteraction {
  /// Whether debug output (full error traces) is enabled.
  fn debug(&self) -> bool;

  /// Shows `content` to the user.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn debug(&self) -> bool { self.debug }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match content {
      ResponseContent::Report(report) => write!(stdout, "{report}")?,
      ResponseContent::Success(message) =>
        writeln!(stdout, "{} {}", style(SUCCESS_PREFIX).green(), message)?,
      ResponseContent::Info(message) =>
        writeln!(stdout, "{} {}", style(INFO_PREFIX).blue(), message)?,
      ResponseContent::Error(error) => {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{} Error: {}", style(ERROR_PREFIX).red(), error)?;
        if self.debug() {
          writeln!(stderr, "{error:#?}")?;
          let mut source = error.source();
          while let Some(cause) = source {
            writeln!(stderr, "{}{}", style(CAUSE_PREFIX).dim(), cause)?;
            source = cause.source();
          }
        }
      },
    }
    Ok(())
  }
}
