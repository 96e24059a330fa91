//! Client tests against a local E-utilities stand-in.
//!
//! The server answers `esearch.fcgi` with a fixed PMID list and `efetch.fcgi` with one
//! article per requested PMID. Odd PMIDs get an industry affiliation, even ones an academic
//! one. Every request's `id` parameter and arrival time is recorded.

use std::{
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use pharmapapers::{prelude::*, pubmed::PubMedClient};
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::TcpListener,
};
use url::Url;

/// `id` parameter and arrival time of each EFetch request, in arrival order.
type Requests = Arc<Mutex<Vec<(String, Instant)>>>;

fn efetch_body(ids: &str) -> String {
  let articles: String = ids
    .split(',')
    .map(|id| {
      let affiliation = match id.parse::<u32>() {
        Ok(n) if n % 2 == 1 => "Acme Therapeutics Inc, Boston, MA.",
        _ => "University of Oslo, Norway.",
      };
      format!(
        "<PubmedArticle><MedlineCitation><PMID>{id}</PMID><Article>\
         <ArticleTitle>Paper {id}</ArticleTitle><AuthorList><Author>\
         <LastName>Author{id}</LastName><AffiliationInfo><Affiliation>{affiliation}</Affiliation>\
         </AffiliationInfo></Author></AuthorList></Article></MedlineCitation></PubmedArticle>"
      )
    })
    .collect();
  format!("<?xml version=\"1.0\"?>\n<PubmedArticleSet>{articles}</PubmedArticleSet>")
}

async fn eutils_stub(search_ids: &'static [&'static str]) -> (String, Requests) {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base_url = format!("http://{}/", listener.local_addr().unwrap());
  let requests = Requests::default();

  let seen = Arc::clone(&requests);
  tokio::spawn(async move {
    loop {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut data = Vec::new();
      let mut buf = [0; 1024];
      while !data.windows(4).any(|window| window == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
          break;
        }
        data.extend_from_slice(&buf[..n]);
      }

      let request = String::from_utf8_lossy(&data).into_owned();
      let target = request.split_whitespace().nth(1).unwrap_or("/");
      let url = Url::parse(&format!("http://stub{target}")).unwrap();

      let body = if url.path().ends_with("esearch.fcgi") {
        let idlist: Vec<String> = search_ids.iter().map(|id| format!("\"{id}\"")).collect();
        format!("{{\"esearchresult\":{{\"idlist\":[{}]}}}}", idlist.join(","))
      } else {
        let ids = url
          .query_pairs()
          .find(|(key, _)| key == "id")
          .map(|(_, value)| value.into_owned())
          .unwrap_or_default();
        seen.lock().unwrap().push((ids.clone(), Instant::now()));
        efetch_body(&ids)
      };

      let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
      );
      socket.write_all(response.as_bytes()).await.unwrap();
    }
  });

  (base_url, requests)
}

fn config(base_url: String) -> Config {
  Config::default().with_base_url(base_url).with_email("tests@example.com")
}

#[tokio::test]
async fn test_fetch_details_in_chunks() {
  let (base_url, requests) = eutils_stub(&[]).await;
  let pause = Duration::from_millis(250);
  let client =
    PubMedClient::new(config(base_url).with_chunk_size(2).with_request_pause(pause)).unwrap();
  let pmids: Vec<String> = (1..=5).map(|id| id.to_string()).collect();

  let papers = client.fetch_details(&pmids).await.unwrap();
  let finished = Instant::now();

  let fetched: Vec<&str> = papers.iter().map(|paper| paper.pmid.as_str()).collect();
  assert_eq!(fetched, vec!["1", "2", "3", "4", "5"]);

  let requests = requests.lock().unwrap();
  let ids: Vec<&str> = requests.iter().map(|(ids, _)| ids.as_str()).collect();
  assert_eq!(ids, vec!["1,2", "3,4", "5"]);

  // Paused before every chunk but the first, and not after the last one.
  for pair in requests.windows(2) {
    assert!(pair[1].1.duration_since(pair[0].1) >= pause);
  }
  assert!(finished.duration_since(requests[2].1) < pause);
}

#[tokio::test]
async fn test_single_chunk_is_not_paused() {
  let (base_url, requests) = eutils_stub(&[]).await;
  let client = PubMedClient::new(
    config(base_url).with_chunk_size(10).with_request_pause(Duration::from_secs(30)),
  )
  .unwrap();
  let pmids: Vec<String> = vec!["8".into(), "9".into()];

  let started = Instant::now();
  assert_eq!(client.fetch_details(&pmids).await.unwrap().len(), 2);
  assert!(started.elapsed() < Duration::from_secs(30));
  assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_keeps_industry_papers() {
  let (base_url, requests) = eutils_stub(&["3", "4", "1"]).await;
  let finder =
    PharmaPapers::new(config(base_url).with_request_pause(Duration::from_millis(0))).unwrap();

  let rows = finder.find("kras", 10).await.unwrap().expect("search returned PMIDs");

  let ids: Vec<&str> = rows.iter().map(|row| row.pubmed_id.as_str()).collect();
  assert_eq!(ids, vec!["3", "1"]);
  assert_eq!(rows[0].authors, "Author3");
  assert_eq!(rows[0].companies, "Acme Therapeutics Inc");
  assert_eq!(rows[0].title, "Paper 3");
  assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_without_matches() {
  let (base_url, requests) = eutils_stub(&[]).await;
  let finder = PharmaPapers::new(config(base_url)).unwrap();

  assert_eq!(finder.find("nothing", 10).await.unwrap(), None);
  assert!(requests.lock().unwrap().is_empty());
}
