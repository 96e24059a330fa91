//! Aggregation of papers into report rows.
//!
//! Every affiliation of every author is run through
//! [`is_industry_affiliation`](crate::classifier::is_industry_affiliation). Papers with at
//! least one industry-affiliated author become a [`ReportRow`]; all other papers are
//! dropped.
//!
//! Two behaviours of the aggregation are kept on purpose because they shape the output:
//!
//! - An author listed with several industry affiliations appears once per affiliation in
//!   [`ReportRow::authors`].
//! - The first corresponding author with an email supplies
//!   [`ReportRow::corresponding_email`]; later ones never replace it.

use super::*;
use crate::classifier::{extract_company_name, is_industry_affiliation};

/// Separator used when joining author and company names into a single field.
pub const LIST_SEPARATOR: &str = "; ";

/// One output record summarizing a paper's industry-affiliated authors and companies.
///
/// Field names serialize to the report's column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
  /// PubMed identifier
  #[serde(rename = "PubmedID")]
  pub pubmed_id:           String,
  /// Paper title
  #[serde(rename = "Title")]
  pub title:               String,
  /// Free-form publication date
  #[serde(rename = "Publication Date")]
  pub publication_date:    String,
  /// Industry-affiliated author names joined with [`LIST_SEPARATOR`], first-encountered
  /// order
  #[serde(rename = "Non-academic Author(s)")]
  pub authors:             String,
  /// Distinct company names joined with [`LIST_SEPARATOR`], insertion order
  #[serde(rename = "Company Affiliation(s)")]
  pub companies:           String,
  /// Email of the first corresponding author, empty when none
  #[serde(rename = "Corresponding Author Email")]
  pub corresponding_email: String,
}

/// Folds papers into [`ReportRow`]s, logging every paper that qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaperProcessor;

impl PaperProcessor {
  /// Creates a new processor.
  pub fn new() -> Self { Self }

  /// Processes `papers` in order. See [`process_papers`].
  pub fn process_papers(&self, papers: &[Paper]) -> Vec<ReportRow> {
    let rows: Vec<ReportRow> = papers
      .iter()
      .filter_map(|paper| {
        let row = process_paper(paper)?;
        debug!("Found paper with industry affiliations: {:?} ({})", paper.title, paper.pmid);
        Some(row)
      })
      .collect();

    info!("{} of {} papers have industry-affiliated authors", rows.len(), papers.len());
    rows
  }
}

/// Returns one [`ReportRow`] per paper with at least one industry-affiliated author,
/// preserving the relative order of `papers`.
///
/// Papers may come from several fetch chunks concatenated together; the result only
/// depends on the order of the slice.
///
/// # Examples
///
/// ```
/// use pharmapapers::{
///   paper::{Author, Paper},
///   processor::process_papers,
/// };
///
/// let p1 = Paper::new("1")
///   .with_author(Author::new("Ada Smith").with_affiliation("Novartis Pharmaceuticals AG, Basel"));
/// let p2 = Paper::new("2").with_author(Author::new("Bo Chen").with_affiliation("Harvard Medical School"));
///
/// let rows = process_papers(&[p1, p2]);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].companies, "Novartis Pharmaceuticals AG");
/// ```
pub fn process_papers(papers: &[Paper]) -> Vec<ReportRow> {
  papers.iter().filter_map(process_paper).collect()
}

/// Builds the row for a single paper, or `None` when no author is industry-affiliated.
fn process_paper(paper: &Paper) -> Option<ReportRow> {
  let mut authors: Vec<&str> = Vec::new();
  let mut companies: Vec<String> = Vec::new();
  let mut corresponding_email: Option<&str> = None;

  for author in &paper.authors {
    for affiliation in author.affiliations.iter().filter(|a| is_industry_affiliation(a)) {
      authors.push(author.name.as_str());
      let company = extract_company_name(affiliation);
      if !company.is_empty() && !companies.contains(&company) {
        companies.push(company);
      }
    }

    if corresponding_email.is_none() && author.is_corresponding && !author.email.is_empty() {
      corresponding_email = Some(author.email.as_str());
    }
  }

  if authors.is_empty() {
    return None;
  }

  Some(ReportRow {
    pubmed_id:           paper.pmid.clone(),
    title:               paper.title.clone(),
    publication_date:    paper.publication_date.clone(),
    authors:             authors.join(LIST_SEPARATOR),
    companies:           companies.join(LIST_SEPARATOR),
    corresponding_email: corresponding_email.unwrap_or_default().to_string(),
  })
}
