//! Error types for the pharmapapers library.
//!
//! Classification and aggregation never fail; errors only come from the edges of the
//! system:
//! - Network and API errors while talking to PubMed
//! - Decoding of the search response
//! - Writing the CSV report
//! - Loading configuration
//!
//! # Examples
//!
//! ```
//! use pharmapapers::{error::PharmaError, Config};
//!
//! let result = Config::default().with_chunk_size(0).validate();
//! match result {
//!   Err(PharmaError::Config(msg)) => println!("Bad configuration: {msg}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Success!"),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`pharmapapers`](crate) crate.
pub type Result<T> = core::result::Result<T, PharmaError>;

/// Errors that can occur when searching, fetching or exporting papers.
#[derive(Error, Debug)]
pub enum PharmaError {
  /// A network request failed.
  ///
  /// This covers unreachable hosts, timeouts, TLS failures and HTTP error statuses returned
  /// by the E-utilities endpoints.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The search response was not the JSON document PubMed normally returns.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Writing the CSV report failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A file system operation failed.
  ///
  /// This occurs when reading a configuration file or writing the report.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A configuration file was not valid TOML or had fields of the wrong type.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configured base URL could not be parsed or joined with an endpoint.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// PubMed answered with something other than what the client expects.
  #[error("API error: {0}")]
  ApiError(String),

  /// The configuration is invalid.
  #[error("{0}")]
  Config(String),
}
