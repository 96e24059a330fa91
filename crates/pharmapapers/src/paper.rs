//! Paper and author records as retrieved from PubMed.
//!
//! These are plain data records: the PubMed parser builds them, the
//! [`processor`](crate::processor) reads them. Missing fields in the source records are
//! represented by empty strings and empty lists rather than `Option`s, so a partially
//! broken record still flows through the pipeline.
//!
//! # Examples
//!
//! ```
//! use pharmapapers::paper::{Author, Paper};
//!
//! let paper = Paper::new("12345678")
//!   .with_title("Kinase inhibitors in practice")
//!   .with_publication_date("15 Mar 2023")
//!   .with_author(Author::new("Jane Doe").with_affiliation("Acme Pharmaceuticals Inc, Boston"));
//!
//! assert_eq!(paper.authors.len(), 1);
//! ```

use super::*;

/// A single PubMed article.
///
/// A paper owns its authors exclusively; author order is the order PubMed lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
  /// PubMed identifier (PMID)
  pub pmid:             String,
  /// Article title, with inline markup flattened
  pub title:            String,
  /// Free-form publication date: empty, `"2023"`, `"Mar 2023"` or `"15 Mar 2023"`
  pub publication_date: String,
  /// Authors in listing order
  pub authors:          Vec<Author>,
}

/// An author of a [`Paper`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Display name, e.g. `"Jane Doe"` or a collective name
  pub name:             String,
  /// Affiliation strings in listing order, possibly empty
  pub affiliations:     Vec<String>,
  /// Whether the record marks this author as a corresponding author
  pub is_corresponding: bool,
  /// Contact email, empty when unknown
  pub email:            String,
}

impl Paper {
  /// Creates an empty paper with the given PMID.
  pub fn new(pmid: impl Into<String>) -> Self { Self { pmid: pmid.into(), ..Default::default() } }

  /// Sets the title.
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  /// Sets the publication date.
  pub fn with_publication_date(mut self, date: impl Into<String>) -> Self {
    self.publication_date = date.into();
    self
  }

  /// Appends an author.
  pub fn with_author(mut self, author: Author) -> Self {
    self.authors.push(author);
    self
  }
}

impl Author {
  /// Creates an author with no affiliations and no email.
  pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), ..Default::default() } }

  /// Appends an affiliation.
  pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
    self.affiliations.push(affiliation.into());
    self
  }

  /// Marks the author as corresponding with the given email.
  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = email.into();
    self.is_corresponding = true;
    self
  }
}
