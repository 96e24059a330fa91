//! Find PubMed papers with authors affiliated with pharmaceutical and biotech companies.
//!
//! `pharmapapers` queries PubMed, retrieves paper metadata and keeps only the papers with at
//! least one author whose affiliation belongs to a company rather than an academic or
//! governmental institution. It provides:
//!
//! - A PubMed E-utilities client (search + chunked fetch)
//! - A rule-based affiliation classifier and company name extractor
//! - Aggregation of papers into flat report rows
//! - CSV export to a string or a file
//!
//! # Getting Started
//!
//! ```no_run
//! use pharmapapers::{export, Config, PharmaPapers};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let finder = PharmaPapers::new(Config::load()?)?;
//!
//!   // Search, fetch and keep only industry-affiliated papers
//!   let Some(rows) = finder.find("cancer immunotherapy", 50).await? else {
//!     println!("No matches");
//!     return Ok(());
//!   };
//!
//!   // Print the report as CSV
//!   if let Some(csv) = export::export(&rows, None)? {
//!     println!("{csv}");
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: Paper and author records as parsed from PubMed
//! - [`classifier`]: Industry vs academic affiliation rules
//! - [`processor`]: Aggregation of papers into [`processor::ReportRow`]s
//! - [`export`]: CSV serialization of report rows
//! - [`pubmed`]: The PubMed E-utilities client and XML parser
//! - [`configuration`]: Client configuration loaded from TOML
//! - [`error`]: The crate's error type

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fs,
  path::{Path, PathBuf},
  time::Duration,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod classifier;
pub mod configuration;
pub mod error;
pub mod export;
pub mod paper;
pub mod processor;
pub mod pubmed;

pub use crate::configuration::Config;
use crate::{
  error::*,
  paper::{Author, Paper},
  processor::{PaperProcessor, ReportRow},
  pubmed::PubMedClient,
};

/// High level entry point tying the PubMed client to the paper processor.
///
/// A single [`PharmaPapers::find`] call runs the whole pipeline: search for PMIDs, fetch the
/// records in chunks and keep the papers with industry-affiliated authors.
#[derive(Debug, Clone)]
pub struct PharmaPapers {
  /// Client used to talk to PubMed.
  client:    PubMedClient,
  /// Processor folding papers into report rows.
  processor: PaperProcessor,
}

impl PharmaPapers {
  /// Creates a new pipeline from a validated [`Config`].
  pub fn new(config: Config) -> Result<Self> {
    Ok(Self { client: PubMedClient::new(config)?, processor: PaperProcessor::new() })
  }

  /// The underlying PubMed client.
  pub fn client(&self) -> &PubMedClient { &self.client }

  /// The processor folding fetched papers into report rows.
  pub fn processor(&self) -> &PaperProcessor { &self.processor }

  /// Searches PubMed for `query` and returns the report rows for papers with at least one
  /// industry-affiliated author, in search order.
  ///
  /// Returns `None` when the search matches no PMIDs at all, and `Some` of a possibly empty
  /// vector when papers were fetched but none had an industry-affiliated author.
  pub async fn find(&self, query: &str, max_results: usize) -> Result<Option<Vec<ReportRow>>> {
    let pmids = self.client.search(query, max_results).await?;
    if pmids.is_empty() {
      info!("No papers found for query {query:?}");
      return Ok(None);
    }

    let papers = self.client.fetch_details(&pmids).await?;
    Ok(Some(self.processor.process_papers(&papers)))
  }
}

/// Common types for ergonomic imports.
///
/// ```
/// use pharmapapers::prelude::*;
///
/// assert!(is_industry_affiliation("Acme Pharmaceuticals Inc"));
/// ```
pub mod prelude {
  pub use crate::{
    classifier::{extract_company_name, is_industry_affiliation},
    error::{PharmaError, Result},
    paper::{Author, Paper},
    processor::{process_papers, PaperProcessor, ReportRow},
    Config, PharmaPapers,
  };
}
