//! arXiv Client
//!
//! Queries the public arXiv Atom API for paper metadata:
//! - One GET per search, sorted by relevance (arXiv's definition)
//! - Atom feed parsed with quick-xml into normalized `Paper` records
//!
//! The caller decides what an empty or failed search means; this module
//! only reports it.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";

/// Abstracts are bounded at fetch time; the formatter trims further.
const SUMMARY_MAX_CHARS: usize = 400;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),

    #[error("Unexpected content type from arXiv: {0}")]
    UnexpectedContentType(String),
}

/// Normalized metadata for one academic paper. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Title of the paper
    pub title: String,
    /// Authors in feed order
    pub authors: Vec<String>,
    /// Publication date
    pub published: NaiveDate,
    /// Abstract, whitespace-collapsed and bounded
    pub summary: String,
    /// Link to the PDF (or the abstract page when no PDF link exists)
    pub pdf_url: String,
}

/// Client for the arXiv query endpoint.
#[derive(Clone)]
pub struct ArxivClient {
    http: Client,
    base: String,
}

impl Default for ArxivClient {
    fn default() -> Self {
        let http = Client::builder()
            .user_agent("scholarsynth/0.1")
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base: ARXIV_API_BASE.into(),
        }
    }
}

impl ArxivClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different endpoint (tests use a mock server).
    pub fn with_base(base: &str) -> Self {
        let mut client = Self::default();
        client.base = base.to_string();
        client
    }

    /// Search arXiv for papers relevant to `query`, returning at most
    /// `max_results` records in the feed's relevance order.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>, SearchError> {
        use reqwest::header::{ACCEPT, CONTENT_TYPE};

        let search_query = build_query(query);
        info!(query = %query, max_results, "Searching arXiv");

        let resp = self
            .http
            .get(&self.base)
            .query(&[("search_query", search_query.as_str())])
            .query(&[("start", 0usize), ("max_results", max_results)])
            .query(&[("sortBy", "relevance"), ("sortOrder", "descending")])
            .header(
                ACCEPT,
                "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8",
            )
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        let ctype: String = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!(
                "arXiv API error: HTTP {}",
                status
            )));
        }
        if !(ctype.contains("xml") || ctype.contains("atom")) {
            return Err(SearchError::UnexpectedContentType(ctype));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;
        let papers = parse_atom_feed(&text)?;

        info!(count = papers.len(), "arXiv search completed");
        Ok(papers.into_iter().take(max_results).collect())
    }
}

/// Build an arXiv `search_query` expression: each whitespace token matched
/// against all fields, AND-joined.
fn build_query(q: &str) -> String {
    let q = q.trim();
    if q.is_empty() {
        return "all:*".into();
    }
    let toks: Vec<&str> = q.split_whitespace().collect();
    if toks.len() <= 1 {
        format!("all:{}", toks.first().copied().unwrap_or(q))
    } else {
        toks.into_iter()
            .map(|t| format!("all:{}", t))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

fn clean_summary(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > SUMMARY_MAX_CHARS {
        let mut truncated: String = collapsed.chars().take(SUMMARY_MAX_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        collapsed
    }
}

fn parse_date(ts: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return Some(dt.date_naive());
    }
    let prefix: String = ts.chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

fn parse_atom_feed(xml: &str) -> Result<Vec<Paper>, SearchError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    // arXiv link elements are self-closing; surface them as Start events.
    reader.expand_empty_elements(true);
    let mut buf = Vec::new();
    let mut out: Vec<Paper> = vec![];

    let mut in_entry = false;
    let mut cur_title = String::new();
    let mut cur_published = String::new();
    let mut cur_updated = String::new();
    let mut cur_summary = String::new();
    let mut cur_authors: Vec<String> = vec![];
    let mut cur_html: Option<String> = None;
    let mut cur_pdf: Option<String> = None;
    let mut text_target: Option<&'static str> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name_buf: Vec<u8> = e.name().as_ref().to_vec();
                let raw = name_buf.as_slice();
                let colon = raw.iter().position(|b| *b == b':');
                let name = match colon {
                    Some(ix) => &raw[ix + 1..],
                    None => raw,
                };
                match name {
                    b"entry" => {
                        in_entry = true;
                        cur_title.clear();
                        cur_published.clear();
                        cur_updated.clear();
                        cur_summary.clear();
                        cur_authors.clear();
                        cur_html = None;
                        cur_pdf = None;
                        text_target = None;
                    }
                    b"title" if in_entry => text_target = Some("title"),
                    b"published" if in_entry => text_target = Some("published"),
                    b"updated" if in_entry => text_target = Some("updated"),
                    b"summary" if in_entry => text_target = Some("summary"),
                    b"name" if in_entry => text_target = Some("author"),
                    b"link" if in_entry => {
                        let mut rel: Option<String> = None;
                        let mut href: Option<String> = None;
                        let mut typ: Option<String> = None;
                        let mut title_attr: Option<String> = None;
                        for a in e.attributes().flatten() {
                            let k = a.key.as_ref();
                            let v = String::from_utf8_lossy(&a.value).to_string();
                            match k {
                                b"rel" => rel = Some(v),
                                b"href" => href = Some(v),
                                b"type" => typ = Some(v),
                                b"title" => title_attr = Some(v),
                                _ => {}
                            }
                        }
                        if let Some(h) = href {
                            if rel.as_deref() == Some("alternate") && cur_html.is_none() {
                                cur_html = Some(h);
                            } else if typ.as_deref().unwrap_or("").contains("pdf")
                                && cur_pdf.is_none()
                            {
                                cur_pdf = Some(h);
                            } else if title_attr
                                .as_deref()
                                .map(|s| s.eq_ignore_ascii_case("pdf"))
                                .unwrap_or(false)
                                && cur_pdf.is_none()
                            {
                                cur_pdf = Some(h);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(tag) = text_target.take() {
                    let txt = t.unescape().unwrap_or_default().to_string();
                    match tag {
                        "title" => cur_title = txt,
                        "published" => cur_published = txt,
                        "updated" => cur_updated = txt,
                        "summary" => cur_summary = txt,
                        "author" => cur_authors.push(txt),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let end_name_buf: Vec<u8> = e.name().as_ref().to_vec();
                let raw = end_name_buf.as_slice();
                let colon = raw.iter().position(|b| *b == b':');
                let name = match colon {
                    Some(ix) => &raw[ix + 1..],
                    None => raw,
                };
                if name == b"entry" && in_entry {
                    in_entry = false;

                    // Entries without a title or a parseable date are not
                    // usable in a review; skip them rather than fail the feed.
                    let title = cur_title.trim().to_string();
                    let date_source = if cur_published.is_empty() {
                        &cur_updated
                    } else {
                        &cur_published
                    };
                    if !title.is_empty() {
                        if let Some(published) = parse_date(date_source) {
                            out.push(Paper {
                                title,
                                authors: cur_authors.clone(),
                                published,
                                summary: clean_summary(&cur_summary),
                                pdf_url: cur_pdf
                                    .clone()
                                    .or_else(|| cur_html.clone())
                                    .unwrap_or_else(|| "#".to_string()),
                            });
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SearchError::ParseError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<feed xmlns='http://www.w3.org/2005/Atom'>
  <entry>
    <id>http://arxiv.org/abs/2501.01234v1</id>
    <published>2025-01-15T12:00:00Z</published>
    <updated>2025-01-20T12:00:00Z</updated>
    <title>Mixture-of-Experts Routing</title>
    <summary>We study
routing strategies.</summary>
    <author><name>Doe, J.</name></author>
    <author><name>Smith, A.</name></author>
    <link rel='alternate' type='text/html' href='https://arxiv.org/abs/2501.01234'/>
    <link title='pdf' href='https://arxiv.org/pdf/2501.01234.pdf'/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2501.05678v2</id>
    <published>2024-12-01T08:30:00Z</published>
    <title>Sparse Attention at Scale</title>
    <summary>Second paper.</summary>
    <author><name>Lee, K.</name></author>
    <link rel='alternate' type='text/html' href='https://arxiv.org/abs/2501.05678'/>
  </entry>
</feed>
"#;

    #[test]
    fn parse_basic_feed() {
        let papers = parse_atom_feed(SAMPLE).expect("parse");
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.title, "Mixture-of-Experts Routing");
        assert_eq!(first.authors, vec!["Doe, J.", "Smith, A."]);
        assert_eq!(
            first.published,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert_eq!(first.summary, "We study routing strategies.");
        assert_eq!(first.pdf_url, "https://arxiv.org/pdf/2501.01234.pdf");

        // No pdf link on the second entry; falls back to the abstract page.
        assert_eq!(papers[1].pdf_url, "https://arxiv.org/abs/2501.05678");
    }

    #[test]
    fn parse_empty_feed() {
        let papers =
            parse_atom_feed("<?xml version='1.0'?><feed xmlns='http://www.w3.org/2005/Atom'></feed>")
                .expect("parse");
        assert!(papers.is_empty());
    }

    #[test]
    fn build_query_joins_tokens() {
        assert_eq!(build_query("quantum"), "all:quantum");
        assert_eq!(
            build_query("quantum computing"),
            "all:quantum AND all:computing"
        );
        assert_eq!(build_query("  "), "all:*");
    }

    #[test]
    fn summary_is_collapsed_and_bounded() {
        assert_eq!(clean_summary("a\nb\n  c"), "a b c");

        let long = "x".repeat(500);
        let cleaned = clean_summary(&long);
        assert_eq!(cleaned.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(cleaned.ends_with("..."));

        let exact = "y".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(clean_summary(&exact), exact);
    }

    #[tokio::test]
    async fn search_parses_mocked_feed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/atom+xml; charset=UTF-8")
            .with_body(SAMPLE)
            .create_async()
            .await;

        let client = ArxivClient::with_base(&server.url());
        let papers = client.search("sparse attention", 5).await.unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[1].title, "Sparse Attention at Scale");
    }

    #[tokio::test]
    async fn search_rejects_non_xml_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = ArxivClient::with_base(&server.url());
        let err = client.search("anything", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::UnexpectedContentType(_)));
    }
}
