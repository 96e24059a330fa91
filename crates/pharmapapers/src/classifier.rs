//! Rule-based classification of author affiliations.
//!
//! An affiliation is *industry* when it looks like a for-profit pharmaceutical or biotech
//! company rather than a university, hospital, foundation or government body. The rules
//! are plain substring checks over the lower-cased text, applied in a fixed order:
//!
//! 1. Any academic indicator rejects the affiliation outright, whatever else it contains.
//! 2. An industry domain term together with a company entity indicator accepts it.
//! 3. Otherwise the affiliation is accepted only if it *ends* with a company suffix such as
//!    `Inc.` or `GmbH`.
//!
//! Matching is substring based, so `"international"` counts as `"national"` and `"USA"`
//! ends with the `"sa"` suffix. Both are accepted consequences of the rule set.
//!
//! # Examples
//!
//! ```
//! use pharmapapers::classifier::{extract_company_name, is_industry_affiliation};
//!
//! assert!(is_industry_affiliation("Novartis Pharmaceuticals AG, Basel"));
//! assert!(!is_industry_affiliation("Harvard Medical School"));
//! assert_eq!(extract_company_name("Novartis Pharmaceuticals AG, Basel"), "Novartis Pharmaceuticals AG");
//! ```

use super::*;

/// Terms marking an academic, nonprofit or governmental institution.
pub static ACADEMIC_TERMS: &[&str] = &[
  "university",
  "college",
  "institute",
  "school",
  "academy",
  "hospital",
  "clinic",
  "medical center",
  "research center",
  "foundation",
  "laboratory",
  "national",
  "federal",
  "ministry",
  "department",
];

/// Terms marking the pharmaceutical and biotech domain.
pub static INDUSTRY_TERMS: &[&str] = &[
  "pharma",
  "pharmaceutical",
  "biotech",
  "therapeutics",
  "bioscience",
  "laboratories",
  "biologics",
  "biopharma",
  "medicines",
  "biotherapeutics",
  "biosystems",
  "drug",
  "health",
  "medical",
  "diagnostics",
  "genomics",
];

/// Substrings marking a legal company entity. Most carry a leading space so that they only
/// match at the start of a word.
pub static ENTITY_INDICATORS: &[&str] =
  &[" inc", " corp", " co.", " ltd", " llc", "company", " sa", " ag", " gmbh"];

lazy_static! {
  /// Company suffix at the very end of an affiliation, optionally followed by a period.
  static ref COMPANY_SUFFIX: Regex =
    Regex::new(r"(?:inc|corp|co\.|ltd|llc|gmbh|sa|ag|pty)\.?$").unwrap();
}

/// Returns whether `affiliation` looks like a pharmaceutical or biotech company.
///
/// Academic indicators take precedence over every industry signal, so
/// `"University Hospital Inc."` is not an industry affiliation. An industry domain term
/// alone is not enough either: it must come with an entity indicator, or the text must end
/// in a company suffix.
///
/// This function is total: every input, including the empty string, maps to a boolean.
///
/// # Examples
///
/// ```
/// use pharmapapers::classifier::is_industry_affiliation;
///
/// assert!(is_industry_affiliation("Acme Pharmaceuticals Inc"));
/// assert!(!is_industry_affiliation("Acme Pharmaceuticals"));
/// assert!(is_industry_affiliation("Acme Corp"));
/// assert!(!is_industry_affiliation("University Hospital Inc."));
/// ```
pub fn is_industry_affiliation(affiliation: &str) -> bool {
  if affiliation.is_empty() {
    return false;
  }

  let lower = affiliation.to_lowercase();

  if let Some(term) = ACADEMIC_TERMS.iter().find(|term| lower.contains(*term)) {
    trace!("Affiliation {affiliation:?} rejected by academic term {term:?}");
    return false;
  }

  let has_entity = ENTITY_INDICATORS.iter().any(|indicator| lower.contains(indicator));
  if has_entity && INDUSTRY_TERMS.iter().any(|term| lower.contains(term)) {
    return true;
  }

  COMPANY_SUFFIX.is_match(lower.trim())
}

/// Extracts a company name from an affiliation string.
///
/// Takes everything before the first `,` or `(` and trims it. Without either delimiter the
/// whole trimmed text is returned. Affiliations naming the same company with different
/// trailing details can still extract to different names; this is a heuristic, not entity
/// resolution.
///
/// # Examples
///
/// ```
/// use pharmapapers::classifier::extract_company_name;
///
/// assert_eq!(extract_company_name("Pfizer Inc, New York, USA"), "Pfizer Inc");
/// assert_eq!(extract_company_name("Genentech (South San Francisco)"), "Genentech");
/// assert_eq!(extract_company_name(""), "");
/// ```
pub fn extract_company_name(affiliation: &str) -> String {
  let head = match affiliation.find([',', '(']) {
    // A leading delimiter leaves nothing to take, keep the whole text instead.
    Some(0) | None => affiliation,
    Some(end) => &affiliation[..end],
  };
  head.trim().to_string()
}
