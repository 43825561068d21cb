use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single internal page discovered by the crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Absolute URL of the page (unique within a crawl)
    pub url: String,

    /// Page title (falls back to the URL when nothing better is found)
    pub title: String,

    /// Meta or first-paragraph description, possibly empty
    pub description: String,

    /// Keyword seeds: meta keywords plus heading texts, deduplicated, at most 10
    pub keywords: Vec<String>,

    /// When the page was fetched
    pub last_scanned: DateTime<Utc>,
}

/// The page index produced by one crawl invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIndex {
    /// Hostname the crawl was restricted to
    pub domain: String,

    /// Collected pages, unique by URL
    pub pages: Vec<PageRecord>,

    /// Number of collected pages (always equals `pages.len()`)
    pub total_pages: usize,

    /// When the crawl completed
    pub last_scanned: DateTime<Utc>,
}

/// Whether a suggested or selected link points inside or outside the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Internal,
    External,
}

/// Intended link type for an extracted keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordType {
    Internal,
    External,
    /// Could benefit from either kind of link; also the catch-all for
    /// unexpected values in collaborator output
    Both,
}

impl Default for KeywordType {
    fn default() -> Self {
        KeywordType::Both
    }
}

impl<'de> Deserialize<'de> for KeywordType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Collaborator output is untrusted; anything unrecognized maps to Both
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "internal" => KeywordType::Internal,
            "external" => KeywordType::External,
            _ => KeywordType::Both,
        })
    }
}

/// A link-worthy keyword phrase returned by the keyword-extraction collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    /// The exact phrase from the article text (1-4 words)
    pub keyword: String,

    #[serde(rename = "type", default)]
    pub link_type: KeywordType,

    /// Brief explanation of why this phrase needs a link
    #[serde(default)]
    pub context: String,

    /// Approximate character position of the first occurrence in the text
    #[serde(default)]
    pub position: u32,
}

/// A keyword together with its ranked internal-link suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordResult {
    pub keyword: String,

    #[serde(rename = "type")]
    pub link_type: KeywordType,

    pub context: String,

    pub position: u32,

    /// At most 5 suggestions, sorted descending by relevance score
    pub suggested_links: Vec<SuggestedLink>,
}

/// A candidate link for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedLink {
    pub url: String,
    pub title: String,
    pub description: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,

    /// Heuristic relevance estimate, always within 0-100
    pub relevance_score: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preferred: Option<bool>,
}

/// An external link sourced from the search provider or the fallback generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub url: String,
    pub title: String,
    pub snippet: String,

    /// Display domain of the result (e.g. "wikipedia.org")
    pub source: String,
}

/// A link the user picked for one keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLink {
    pub keyword: String,
    pub url: String,
    pub title: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,

    /// Visible clickable text, normally equal to the keyword phrase
    pub anchor_text: String,
}

/// SEO grade for a final link set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScore {
    pub overall: u32,
    pub link_density: u32,
    pub anchor_diversity: u32,
    pub internal_external_ratio: u32,
    pub suggestions: Vec<String>,
}

/// Per-user linking preferences held in application state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Domains sorted first in external search results
    #[serde(default)]
    pub preferred_domains: Vec<String>,

    /// Domains filtered out of external search results entirely
    #[serde(default)]
    pub blacklisted_domains: Vec<String>,

    #[serde(default = "default_max_internal_links")]
    pub max_internal_links: usize,

    #[serde(default = "default_max_external_links")]
    pub max_external_links: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            preferred_domains: Vec::new(),
            blacklisted_domains: Vec::new(),
            max_internal_links: default_max_internal_links(),
            max_external_links: default_max_external_links(),
        }
    }
}

/// Default number of internal links to suggest
fn default_max_internal_links() -> usize {
    10
}

/// Default number of external links to suggest
fn default_max_external_links() -> usize {
    5
}
