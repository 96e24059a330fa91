//! Parser for PubMed EFetch XML.
//!
//! Turns a `PubmedArticleSet` document into [`Paper`]s. Records are read leniently: a
//! missing title or date becomes an empty string, an author without any name is dropped
//! and an article without a PMID is skipped. A document that is not well-formed XML,
//! including one cut off before its closing tags, yields no papers at all.

use quick_xml::{
  errors::IllFormedError,
  events::{BytesStart, Event},
  Reader,
};

use super::*;

/// Result type of the internal XML walkers.
type XmlResult<T> = core::result::Result<T, quick_xml::Error>;

lazy_static! {
  /// Email addresses embedded in affiliation text, e.g. "Electronic address: a@b.com".
  static ref EMAIL: Regex = Regex::new(r"([a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+)").unwrap();
}

/// Parses an EFetch XML document into papers, in document order.
///
/// Malformed XML is logged at debug level and produces an empty vector, so one bad chunk
/// never fails a whole batch.
///
/// # Examples
///
/// ```
/// use pharmapapers::pubmed::parse_papers;
///
/// let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
///   <PMID Version="1">123</PMID>
///   <Article><ArticleTitle>A title</ArticleTitle></Article>
/// </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
///
/// let papers = parse_papers(xml);
/// assert_eq!(papers[0].pmid, "123");
/// assert_eq!(papers[0].title, "A title");
/// ```
pub fn parse_papers(xml: &str) -> Vec<Paper> {
  match parse_article_set(xml) {
    Ok(papers) => {
      if papers.is_empty() {
        debug!("No papers were parsed from the XML response");
      }
      papers
    },
    Err(e) => {
      debug!("Error parsing XML: {e}");
      Vec::new()
    },
  }
}

/// Walks the document and parses every `PubmedArticle`.
fn parse_article_set(xml: &str) -> XmlResult<Vec<Paper>> {
  let mut reader = Reader::from_str(xml);
  let mut papers = Vec::new();
  // Open elements outside of any `PubmedArticle`, e.g. `PubmedArticleSet`.
  let mut open: Vec<Vec<u8>> = Vec::new();
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) if e.name().as_ref() == b"PubmedArticle" =>
        match parse_article(&mut reader)? {
          Some(paper) => papers.push(paper),
          None => debug!("Skipping article without a PMID"),
        },
      Event::Start(e) => open.push(e.name().as_ref().to_vec()),
      Event::End(_) => {
        open.pop();
      },
      Event::Eof => match open.last() {
        Some(name) => return Err(missing_end_tag(name)),
        None => break,
      },
      _ => {},
    }
    buf.clear();
  }

  Ok(papers)
}

/// Parses one `PubmedArticle`, returning `None` when it has no PMID.
///
/// The first `PMID`, `ArticleTitle`, `PubDate` and `AuthorList` found anywhere in the
/// article are used; later ones (comments, corrections, references) are ignored.
fn parse_article(reader: &mut Reader<&[u8]>) -> XmlResult<Option<Paper>> {
  let mut pmid: Option<String> = None;
  let mut title: Option<String> = None;
  let mut publication_date: Option<String> = None;
  let mut authors: Option<Vec<Author>> = None;
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) => match e.name().as_ref() {
        b"PMID" if pmid.is_none() => pmid = Some(read_text(reader, &e)?),
        b"ArticleTitle" if title.is_none() => title = Some(read_text(reader, &e)?),
        b"PubDate" if publication_date.is_none() => publication_date = Some(parse_pub_date(reader)?),
        b"AuthorList" if authors.is_none() => authors = Some(parse_author_list(reader)?),
        _ => {},
      },
      Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
      Event::Eof => return Err(missing_end_tag(b"PubmedArticle")),
      _ => {},
    }
    buf.clear();
  }

  let Some(pmid) = pmid.filter(|pmid| !pmid.is_empty()) else {
    return Ok(None);
  };

  Ok(Some(Paper {
    pmid,
    title: title.unwrap_or_default(),
    publication_date: publication_date.unwrap_or_default(),
    authors: authors.unwrap_or_default(),
  }))
}

/// Parses a `PubDate` into `"Day Month Year"`, `"Month Year"` or `"Year"`.
///
/// A day without a month, or a month without a year, is dropped. Without a `Year` the
/// free-text `MedlineDate` (e.g. `"1998 Dec-1999 Jan"`) is used when present.
fn parse_pub_date(reader: &mut Reader<&[u8]>) -> XmlResult<String> {
  let mut year = String::new();
  let mut month = String::new();
  let mut day = String::new();
  let mut medline_date = String::new();
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) => match e.name().as_ref() {
        b"Year" => year = read_text(reader, &e)?,
        b"Month" => month = read_text(reader, &e)?,
        b"Day" => day = read_text(reader, &e)?,
        b"MedlineDate" => medline_date = read_text(reader, &e)?,
        _ => {},
      },
      Event::End(e) if e.name().as_ref() == b"PubDate" => break,
      Event::Eof => return Err(missing_end_tag(b"PubDate")),
      _ => {},
    }
    buf.clear();
  }

  Ok(match (year.is_empty(), month.is_empty(), day.is_empty()) {
    (true, ..) => medline_date,
    (false, true, _) => year,
    (false, false, true) => format!("{month} {year}"),
    (false, false, false) => format!("{day} {month} {year}"),
  })
}

/// Parses every `Author` of an `AuthorList`, dropping authors without a name.
fn parse_author_list(reader: &mut Reader<&[u8]>) -> XmlResult<Vec<Author>> {
  let mut authors = Vec::new();
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) if e.name().as_ref() == b"Author" =>
        if let Some(author) = parse_author(reader)? {
          authors.push(author);
        } else {
          trace!("Skipping author without a name");
        },
      Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
      Event::Eof => return Err(missing_end_tag(b"AuthorList")),
      _ => {},
    }
    buf.clear();
  }

  Ok(authors)
}

/// Parses one `Author` element.
///
/// Affiliations come from `AffiliationInfo/Affiliation`; the older direct `Affiliation`
/// child is only used when there is none of those. An `Identifier` with
/// `Source="email"` gives the author's email, otherwise the first address found in the
/// affiliation texts does. Either way an email marks the author as corresponding.
fn parse_author(reader: &mut Reader<&[u8]>) -> XmlResult<Option<Author>> {
  let mut last_name = String::new();
  let mut fore_name = String::new();
  let mut initials = String::new();
  let mut collective_name = String::new();
  let mut info_affiliations = Vec::new();
  let mut direct_affiliations = Vec::new();
  let mut email_identifier: Option<String> = None;

  // Open elements below `Author` that were not consumed by `read_text`.
  let mut path: Vec<Vec<u8>> = Vec::new();
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) => {
        let at_top = path.is_empty();
        match e.name().as_ref() {
          b"LastName" if at_top => last_name = read_text(reader, &e)?,
          b"ForeName" if at_top => fore_name = read_text(reader, &e)?,
          b"Initials" if at_top => initials = read_text(reader, &e)?,
          b"CollectiveName" if at_top => collective_name = read_text(reader, &e)?,
          b"Affiliation" => {
            let text = read_text(reader, &e)?;
            let in_info = path.last().is_some_and(|parent| parent.as_slice() == b"AffiliationInfo");
            match (text.is_empty(), in_info, at_top) {
              (true, ..) => {},
              (false, true, _) => info_affiliations.push(text),
              (false, false, true) => direct_affiliations.push(text),
              (false, false, false) => {},
            }
          },
          b"Identifier" => {
            let is_email = e
              .attributes()
              .flatten()
              .any(|attr| attr.key.as_ref() == b"Source" && &*attr.value == b"email");
            let text = read_text(reader, &e)?;
            if is_email && email_identifier.is_none() {
              email_identifier = Some(text);
            }
          },
          name => path.push(name.to_vec()),
        }
      },
      Event::End(e) => {
        if path.pop().is_none() && e.name().as_ref() == b"Author" {
          break;
        }
      },
      Event::Eof => return Err(missing_end_tag(b"Author")),
      _ => {},
    }
    buf.clear();
  }

  let name = match (last_name.is_empty(), fore_name.is_empty(), initials.is_empty()) {
    (false, false, _) => format!("{fore_name} {last_name}"),
    (false, true, false) => format!("{initials} {last_name}"),
    (false, true, true) => last_name,
    (true, ..) if !collective_name.is_empty() => collective_name,
    (true, ..) => return Ok(None),
  };

  let affiliations = if info_affiliations.is_empty() {
    // Only the first direct `Affiliation` counts in the older format.
    direct_affiliations.truncate(1);
    direct_affiliations
  } else {
    info_affiliations
  };

  let email = email_identifier
    .filter(|email| !email.is_empty())
    // `find_email` strips trailing periods, so an address closing a sentence is reported
    // without the dot rather than exactly as matched.
    .or_else(|| affiliations.iter().find_map(|affiliation| find_email(affiliation)))
    .unwrap_or_default();

  Ok(Some(Author { name, affiliations, is_corresponding: !email.is_empty(), email }))
}

/// Finds the first email address in `text`.
///
/// Trailing periods are dropped, since affiliations usually end a sentence with the
/// address.
pub fn find_email(text: &str) -> Option<String> {
  EMAIL
    .captures(text)
    .and_then(|cap| cap.get(1))
    .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Reads the text content of the element opened by `start`, flattening inline markup such
/// as `<i>` or `<sup>`, and trims it.
fn read_text(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<String> {
  let mut text = String::new();
  collect_text(reader, start, &mut text)?;
  Ok(text.trim().to_string())
}

/// Appends all text up to the end tag of `start`.
fn collect_text(reader: &mut Reader<&[u8]>, start: &BytesStart, text: &mut String) -> XmlResult<()> {
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Text(e) => text.push_str(&e.unescape()?),
      Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
      Event::Start(inner) => collect_text(reader, &inner, text)?,
      Event::End(_) => break,
      Event::Eof => return Err(missing_end_tag(start.name().as_ref())),
      _ => {},
    }
    buf.clear();
  }

  Ok(())
}

/// The error for a document that ends while `name` is still open.
fn missing_end_tag(name: &[u8]) -> quick_xml::Error {
  quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(String::from_utf8_lossy(name).into_owned()))
}

/// Convenience for tests and callers holding raw bytes.
pub fn parse_papers_bytes(data: &[u8]) -> Vec<Paper> {
  parse_papers(&String::from_utf8_lossy(data))
}
