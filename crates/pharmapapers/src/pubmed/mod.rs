//! PubMed E-utilities client.
//!
//! Two endpoints are used:
//!
//! - `esearch.fcgi` turns a query into a list of PMIDs (JSON response)
//! - `efetch.fcgi` returns the full records for a list of PMIDs (XML response)
//!
//! Fetches are split into chunks of [`Config::chunk_size`] PMIDs with a fixed pause between
//! consecutive requests to stay within NCBI's rate limits. Requests are sent one at a time.
//!
//! # Examples
//!
//! ```no_run
//! use pharmapapers::{pubmed::PubMedClient, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PubMedClient::new(Config::default().with_email("me@example.com"))?;
//! let pmids = client.search("crispr off-target", 20).await?;
//! let papers = client.fetch_details(&pmids).await?;
//! println!("Fetched {} papers", papers.len());
//! # Ok(())
//! # }
//! ```

use url::Url;

use super::*;

mod parser;

pub use parser::{find_email, parse_papers, parse_papers_bytes};

/// Client for the PubMed search and fetch endpoints.
#[derive(Debug, Clone)]
pub struct PubMedClient {
  /// Validated configuration
  config:   Config,
  /// Parsed base URL the endpoints are resolved against
  base_url: Url,
  /// Shared HTTP client
  http:     reqwest::Client,
}

/// Top level of an ESearch JSON response.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
  /// The search result, absent on some error responses
  #[serde(default)]
  esearchresult: SearchResult,
}

/// The `esearchresult` object of an ESearch response.
#[derive(Debug, Default, Deserialize)]
struct SearchResult {
  /// Total number of matches, as a string
  #[serde(default)]
  count:  Option<String>,
  /// Matching PMIDs in relevance order
  #[serde(default)]
  idlist: Vec<String>,
  /// Error message reported by PubMed
  #[serde(rename = "ERROR", default)]
  error:  Option<String>,
}

impl PubMedClient {
  /// Creates a client from `config`, validating it first.
  pub fn new(config: Config) -> Result<Self> {
    let config = config.validate()?;
    let base_url = config.base_url()?;
    let http = reqwest::Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { config, base_url, http })
  }

  /// The configuration this client was created with.
  pub fn config(&self) -> &Config { &self.config }

  /// Searches PubMed and returns at most `max_results` PMIDs, sorted by relevance.
  pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
    debug!("Searching PubMed for: {query}");
    let url = self.search_url(query, max_results)?;
    trace!("ESearch request: {url}");

    let data = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
    let pmids = parse_search_response(&data)?;

    debug!("Found {} papers", pmids.len());
    Ok(pmids)
  }

  /// Fetches and parses the records for `pmids`, in chunks.
  ///
  /// The result is the concatenation of every chunk's papers, in request order. Records
  /// that cannot be parsed are dropped rather than failing the batch; HTTP errors do fail
  /// it.
  pub async fn fetch_details(&self, pmids: &[String]) -> Result<Vec<Paper>> {
    if pmids.is_empty() {
      return Ok(Vec::new());
    }
    debug!("Fetching details for {} papers", pmids.len());

    let chunks: Vec<&[String]> = pmids.chunks(self.config.chunk_size).collect();
    let mut papers = Vec::with_capacity(pmids.len());

    for (index, chunk) in chunks.iter().enumerate() {
      if index > 0 {
        tokio::time::sleep(self.config.request_pause()).await;
      }

      let url = self.fetch_url(chunk)?;
      trace!("EFetch request {}/{}: {url}", index + 1, chunks.len());

      let data = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
      let parsed = parse_papers_bytes(&data);
      if parsed.len() < chunk.len() {
        debug!("Chunk {} returned {} of {} requested papers", index + 1, parsed.len(), chunk.len());
      }
      papers.extend(parsed);
    }

    Ok(papers)
  }

  /// Builds the ESearch URL for `query`.
  pub fn search_url(&self, query: &str, max_results: usize) -> Result<Url> {
    let mut url = self.base_url.join("esearch.fcgi")?;
    url
      .query_pairs_mut()
      .append_pair("db", "pubmed")
      .append_pair("term", query)
      .append_pair("retmax", &max_results.to_string())
      .append_pair("retmode", "json")
      .append_pair("sort", "relevance");
    self.append_identity(&mut url);
    Ok(url)
  }

  /// Builds the EFetch URL for one chunk of PMIDs.
  pub fn fetch_url(&self, pmids: &[String]) -> Result<Url> {
    let mut url = self.base_url.join("efetch.fcgi")?;
    url
      .query_pairs_mut()
      .append_pair("db", "pubmed")
      .append_pair("id", &pmids.join(","))
      .append_pair("retmode", "xml");
    self.append_identity(&mut url);
    Ok(url)
  }

  /// Appends the tool, email and API key parameters NCBI asks every client to send.
  fn append_identity(&self, url: &mut Url) {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("tool", &self.config.tool).append_pair("email", &self.config.email);
    if let Some(api_key) = &self.config.api_key {
      pairs.append_pair("api_key", api_key);
    }
  }
}

/// Extracts the PMID list from an ESearch JSON response.
///
/// A response without `esearchresult` or `idlist` yields no PMIDs. An `ERROR` message with
/// no PMIDs is returned as [`PharmaError::ApiError`]; next to PMIDs it is only logged.
pub fn parse_search_response(data: &[u8]) -> Result<Vec<String>> {
  let response: SearchResponse = serde_json::from_slice(data)?;
  let result = response.esearchresult;
  if let Some(count) = &result.count {
    trace!("PubMed reports {count} total matches");
  }

  match result.error {
    Some(error) if result.idlist.is_empty() => Err(PharmaError::ApiError(error)),
    Some(error) => {
      warn!("PubMed reported a search error: {error}");
      Ok(result.idlist)
    },
    None => Ok(result.idlist),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> PubMedClient {
    PubMedClient::new(Config::default().with_tool("tests").with_email("tests@example.com")).unwrap()
  }

  #[test]
  fn test_search_url() {
    let url = client().search_url("cancer AND pfizer[ad]", 25).unwrap();
    assert_eq!(
      url.as_str(),
      "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?db=pubmed&term=cancer+AND+pfizer%5Bad%5D\
       &retmax=25&retmode=json&sort=relevance&tool=tests&email=tests%40example.com"
    );
  }

  #[test]
  fn test_fetch_url_with_api_key() {
    let client = PubMedClient::new(Config::default().with_api_key("secret")).unwrap();
    let url = client.fetch_url(&["1".to_string(), "2".to_string()]).unwrap();

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(url.path(), "/entrez/eutils/efetch.fcgi");
    assert!(pairs.contains(&("id".into(), "1,2".into())));
    assert!(pairs.contains(&("retmode".into(), "xml".into())));
    assert!(pairs.contains(&("api_key".into(), "secret".into())));
  }

  #[test]
  fn test_parse_search_response() {
    let json = br#"{"header":{"type":"esearch"},"esearchresult":{"count":"3","retmax":"3","idlist":["3","1","2"]}}"#;
    assert_eq!(parse_search_response(json).unwrap(), vec!["3", "1", "2"]);
  }

  #[test]
  fn test_parse_search_response_without_results() {
    assert!(parse_search_response(b"{}").unwrap().is_empty());

    let json = br#"{"esearchresult":{"count":"0","retmax":"0","idlist":[]}}"#;
    assert!(parse_search_response(json).unwrap().is_empty());
  }

  #[traced_test]
  #[test]
  fn test_parse_search_response_error() {
    let json = br#"{"esearchresult":{"ERROR":"Invalid query"}}"#;
    match parse_search_response(json) {
      Err(PharmaError::ApiError(message)) => assert_eq!(message, "Invalid query"),
      other => panic!("expected an API error, got {other:?}"),
    }

    let json = br#"{"esearchresult":{"idlist":["7"],"ERROR":"Partial results"}}"#;
    assert_eq!(parse_search_response(json).unwrap(), vec!["7"]);
    assert!(logs_contain("Partial results"));
  }

  #[test]
  fn test_parse_search_response_rejects_non_json() {
    assert!(matches!(parse_search_response(b"<html>"), Err(PharmaError::Json(_))));
  }

  #[test]
  fn test_invalid_config_is_rejected() {
    assert!(PubMedClient::new(Config::default().with_chunk_size(0)).is_err());
  }

  #[tokio::test]
  async fn test_fetch_details_without_pmids_sends_nothing() {
    // An unroutable base URL proves no request is made.
    let client = PubMedClient::new(Config::default().with_base_url("http://127.0.0.1:9/")).unwrap();
    assert!(client.fetch_details(&[]).await.unwrap().is_empty());
  }

  #[ignore = "requires network access to NCBI E-utilities"]
  #[traced_test]
  #[tokio::test]
  async fn test_search_and_fetch_live() {
    let client = client();
    let pmids = client.search("pembrolizumab", 3).await.unwrap();
    assert!(!pmids.is_empty());

    let papers = client.fetch_details(&pmids).await.unwrap();
    assert_eq!(papers.len(), pmids.len());
    assert!(papers.iter().all(|paper| !paper.pmid.is_empty()));
  }
}
