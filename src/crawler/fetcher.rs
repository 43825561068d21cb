use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::types::PageRecord;

/// Upper bound on extracted keyword seeds per page
const MAX_PAGE_KEYWORDS: usize = 10;

/// Upper bound on level-2 headings considered as keyword seeds
const MAX_H2_KEYWORDS: usize = 5;

/// Maximum description length when falling back to the first paragraph
const MAX_DESCRIPTION_CHARS: usize = 200;

/// A successfully fetched page: its metadata record plus the raw HTML,
/// which the crawler still needs for link extraction
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub record: PageRecord,
    pub html: String,
}

/// Abstraction over page fetching so the crawler can be driven by an
/// in-memory stub in tests
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetches one URL. Every failure mode (network error, non-2xx status,
    /// undecodable body) maps to `None` so the crawler's per-page skip
    /// policy applies uniformly.
    async fn fetch(&self, url: &str) -> Option<FetchedPage>;
}

/// HTTP page fetcher with a fixed timeout and identifying User-Agent
pub struct PageFetcher {
    http: reqwest::Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .expect("HTTP client options should be valid");

        Self { http }
    }
}

#[async_trait]
impl PageFetch for PageFetcher {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::warn!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            ::log::debug!("Skipping {} (status {})", url, response.status());
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                ::log::warn!("Failed to read body of {}: {}", url, e);
                return None;
            }
        };

        let metadata = extract_metadata(&html, url);
        let record = PageRecord {
            url: url.to_string(),
            title: metadata.title,
            description: metadata.description,
            keywords: metadata.keywords,
            last_scanned: Utc::now(),
        };

        Some(FetchedPage { record, html })
    }
}

/// Title, description and keyword seeds pulled out of one HTML document
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// Extracts page metadata from raw HTML.
///
/// Title fallback chain: document title, Open Graph title, first h1, the URL
/// itself. Description: meta description, Open Graph description, first
/// paragraph truncated to 200 characters, empty string. Keyword seeds: the
/// comma-split meta keywords tag, every h1 text and the first 5 h2 texts,
/// deduplicated in first-seen order and capped at 10 entries.
pub fn extract_metadata(html: &str, url: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title = select_text(&doc, "title")
        .or_else(|| select_attr(&doc, r#"meta[property="og:title"]"#, "content"))
        .or_else(|| select_text(&doc, "h1"))
        .unwrap_or_else(|| url.to_string());

    let description = select_attr(&doc, r#"meta[name="description"]"#, "content")
        .or_else(|| select_attr(&doc, r#"meta[property="og:description"]"#, "content"))
        .or_else(|| select_text(&doc, "p").map(|p| p.chars().take(MAX_DESCRIPTION_CHARS).collect()))
        .unwrap_or_default();

    let meta_keywords = select_attr(&doc, r#"meta[name="keywords"]"#, "content").unwrap_or_default();

    let mut keywords: Vec<String> = Vec::new();
    let candidates = meta_keywords
        .split(',')
        .map(|k| k.trim().to_string())
        .chain(select_all_text(&doc, "h1"))
        .chain(select_all_text(&doc, "h2").into_iter().take(MAX_H2_KEYWORDS));

    for candidate in candidates {
        if candidate.is_empty() || keywords.contains(&candidate) {
            continue;
        }
        keywords.push(candidate);
        if keywords.len() == MAX_PAGE_KEYWORDS {
            break;
        }
    }

    PageMetadata {
        title,
        description,
        keywords,
    }
}

/// Trimmed text of the first matching element, if non-empty
fn select_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("selector should be valid");
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Trimmed attribute value of the first matching element, if non-empty
fn select_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("selector should be valid");
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Trimmed non-empty texts of all matching elements
fn select_all_text(doc: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("selector should be valid");
    doc.select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_fallback_chain() {
        let with_title = "<html><head><title> Wooden Chairs </title></head></html>";
        assert_eq!(
            extract_metadata(with_title, "https://a.test/").title,
            "Wooden Chairs"
        );

        let with_og = r#"<head><meta property="og:title" content="OG Title"></head>"#;
        assert_eq!(extract_metadata(with_og, "https://a.test/").title, "OG Title");

        let with_h1 = "<body><h1>Heading Title</h1></body>";
        assert_eq!(
            extract_metadata(with_h1, "https://a.test/").title,
            "Heading Title"
        );

        let bare = "<body><p>no title anywhere</p></body>";
        assert_eq!(extract_metadata(bare, "https://a.test/").title, "https://a.test/");
    }

    #[test]
    fn test_description_sources() {
        let meta = r#"<head><meta name="description" content="Meta description"></head>"#;
        assert_eq!(
            extract_metadata(meta, "https://a.test/").description,
            "Meta description"
        );

        let long_paragraph = format!("<body><p>{}</p></body>", "x".repeat(300));
        let description = extract_metadata(&long_paragraph, "https://a.test/").description;
        assert_eq!(description.chars().count(), 200);

        let empty = "<body><h1>only a heading</h1></body>";
        assert_eq!(extract_metadata(empty, "https://a.test/").description, "");
    }

    #[test]
    fn test_keywords_merged_and_deduplicated() {
        let html = r#"<head><meta name="keywords" content="chairs, wood, chairs"></head>
            <body><h1>Chairs Guide</h1><h2>wood</h2><h2>Finishes</h2></body>"#;

        let keywords = extract_metadata(html, "https://a.test/").keywords;
        assert_eq!(keywords, vec!["chairs", "wood", "Chairs Guide", "Finishes"]);
    }

    #[test]
    fn test_keywords_capped_at_ten() {
        let h2s: String = (0..8).map(|i| format!("<h2>topic {}</h2>", i)).collect();
        let html = format!(
            r#"<head><meta name="keywords" content="a1,a2,a3,a4,a5,a6,a7,a8"></head><body>{}</body>"#,
            h2s
        );

        let keywords = extract_metadata(&html, "https://a.test/").keywords;
        assert_eq!(keywords.len(), 10);
        // Only the first 5 h2 headings are even considered
        assert_eq!(keywords[8], "topic 0");
        assert_eq!(keywords[9], "topic 1");
    }
}
