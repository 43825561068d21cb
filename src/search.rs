//! External-search collaborator.
//!
//! Wraps the Google Custom Search API with per-user domain preferences. When
//! no search engine is configured, or the provider fails or returns nothing,
//! a deterministic fallback generator produces topical links instead, so a
//! keyword search never fails outright.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::types::ExternalLink;

/// External links returned per keyword
const MAX_RESULTS: usize = 5;

/// Results requested from the provider before filtering
const PROVIDER_RESULT_COUNT: &str = "10";

/// Batch search handles at most this many keywords per request
const BATCH_LIMIT: usize = 10;

/// Pause between sequential batch queries, to stay under provider rate limits
const BATCH_DELAY: Duration = Duration::from_millis(200);

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    items: Option<Vec<ProviderItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
    #[serde(rename = "displayLink")]
    pub display_link: String,
}

/// Google Custom Search client with fallback generation
pub struct SearchClient {
    http: reqwest::Client,
    api_key: String,
    engine_id: String,
}

impl SearchClient {
    pub fn new(api_key: &str, engine_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
        }
    }

    /// Searches for up to 5 external links for one keyword, honoring the
    /// blacklist (filtered out) and preferred domains (sorted first)
    pub async fn search(
        &self,
        keyword: &str,
        preferred: &[String],
        blacklisted: &[String],
    ) -> Vec<ExternalLink> {
        if self.engine_id.is_empty() {
            return fallback_links(keyword);
        }

        let items = match self.query_provider(keyword).await {
            Some(items) if !items.is_empty() => items,
            _ => return fallback_links(keyword),
        };

        filter_and_rank(items, preferred, blacklisted)
    }

    /// Sequential batch search over at most 10 keywords, with a short pause
    /// between provider queries
    pub async fn search_batch(
        &self,
        keywords: &[String],
        preferred: &[String],
        blacklisted: &[String],
    ) -> HashMap<String, Vec<ExternalLink>> {
        let mut results = HashMap::new();

        for (i, keyword) in keywords.iter().take(BATCH_LIMIT).enumerate() {
            if i > 0 {
                tokio::time::sleep(BATCH_DELAY).await;
            }
            let links = self.search(keyword, preferred, blacklisted).await;
            results.insert(keyword.clone(), links);
        }

        results
    }

    async fn query_provider(&self, keyword: &str) -> Option<Vec<ProviderItem>> {
        let url = Url::parse_with_params(
            SEARCH_ENDPOINT,
            &[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", keyword),
                ("num", PROVIDER_RESULT_COUNT),
            ],
        )
        .expect("search endpoint should be valid");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::error!("Search provider request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            ::log::error!("Search provider error: {}", response.status());
            return None;
        }

        match response.json::<ProviderResponse>().await {
            Ok(data) => data.items,
            Err(e) => {
                ::log::error!("Failed to parse search provider response: {}", e);
                None
            }
        }
    }
}

/// Drops blacklisted-domain results, moves preferred-domain results to the
/// front (stable, no relevance re-rank) and truncates to 5 links
pub(crate) fn filter_and_rank(
    items: Vec<ProviderItem>,
    preferred: &[String],
    blacklisted: &[String],
) -> Vec<ExternalLink> {
    let mut results: Vec<ProviderItem> = items
        .into_iter()
        .filter(|item| !blacklisted.iter().any(|domain| item.link.contains(domain)))
        .collect();

    results.sort_by_key(|item| !preferred.iter().any(|domain| item.link.contains(domain)));

    results
        .into_iter()
        .take(MAX_RESULTS)
        .map(|item| ExternalLink {
            url: item.link,
            title: item.title,
            snippet: item.snippet,
            source: item.display_link,
        })
        .collect()
}

/// One entry of the fallback rule table: when any trigger word appears in
/// the query, the rule contributes its links
struct FallbackRule {
    triggers: &'static [&'static str],
    build: fn(&str) -> Vec<ExternalLink>,
}

/// Evaluated in order; extend by appending rules
const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        triggers: &[
            "education",
            "learning",
            "montessori",
            "preschool",
            "kindergarten",
            "child",
        ],
        build: education_links,
    },
    FallbackRule {
        triggers: &["safety", "certification", "standard", "regulation"],
        build: safety_links,
    },
];

/// Deterministic topical links for a keyword when no search provider is
/// available: matching rule-table links, a generic encyclopedia link when no
/// rule fired, and always a scholarly-search link last
pub fn fallback_links(query: &str) -> Vec<ExternalLink> {
    let query_lower = query.to_lowercase();
    let mut links = Vec::new();

    for rule in FALLBACK_RULES {
        if rule.triggers.iter().any(|t| query_lower.contains(t)) {
            links.extend((rule.build)(query));
        }
    }

    if links.is_empty() {
        links.push(wikipedia_link(query));
    }

    links.push(ExternalLink {
        url: search_url("https://scholar.google.com/scholar", "q", query),
        title: format!("{} - Google Scholar", query),
        snippet: format!("Academic articles and research about {}.", query),
        source: "scholar.google.com".to_string(),
    });

    links
}

fn education_links(query: &str) -> Vec<ExternalLink> {
    vec![
        wikipedia_link(query),
        ExternalLink {
            url: search_url("https://www.naeyc.org/search", "search", query),
            title: format!("{} - NAEYC", query),
            snippet: format!(
                "Resources about {} from the National Association for the Education of Young Children.",
                query
            ),
            source: "naeyc.org".to_string(),
        },
    ]
}

fn safety_links(_query: &str) -> Vec<ExternalLink> {
    vec![ExternalLink {
        url: "https://www.cpsc.gov/Safety-Education".to_string(),
        title: "Safety Education - CPSC".to_string(),
        snippet: "Consumer Product Safety Commission safety resources and guidelines.".to_string(),
        source: "cpsc.gov".to_string(),
    }]
}

fn wikipedia_link(query: &str) -> ExternalLink {
    let title = query.split_whitespace().collect::<Vec<_>>().join("_");
    let mut url = Url::parse("https://en.wikipedia.org/wiki/").expect("base URL should be valid");
    url.path_segments_mut()
        .expect("base URL has a path")
        .pop_if_empty()
        .push(&title);

    ExternalLink {
        url: url.to_string(),
        title: format!("{} - Wikipedia", query),
        snippet: format!("Learn more about {} on Wikipedia, the free encyclopedia.", query),
        source: "wikipedia.org".to_string(),
    }
}

/// Builds `base?param=query` with proper encoding
fn search_url(base: &str, param: &str, query: &str) -> String {
    Url::parse_with_params(base, &[(param, query)])
        .expect("base URL should be valid")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(link: &str) -> ProviderItem {
        ProviderItem {
            title: format!("title of {}", link),
            link: link.to_string(),
            snippet: "snippet".to_string(),
            display_link: "example.com".to_string(),
        }
    }

    #[test]
    fn test_blacklisted_domains_removed() {
        let items = vec![item("https://spam.test/a"), item("https://ok.test/b")];
        let links = filter_and_rank(items, &[], &["spam.test".to_string()]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://ok.test/b");
    }

    #[test]
    fn test_preferred_domains_sorted_first_stably() {
        let items = vec![
            item("https://a.test/1"),
            item("https://b.test/1"),
            item("https://preferred.test/1"),
            item("https://preferred.test/2"),
        ];
        let links = filter_and_rank(items, &["preferred.test".to_string()], &[]);

        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://preferred.test/1",
                "https://preferred.test/2",
                "https://a.test/1",
                "https://b.test/1",
            ]
        );
    }

    #[test]
    fn test_results_capped_at_five() {
        let items = (0..8).map(|i| item(&format!("https://r.test/{}", i))).collect();
        let links = filter_and_rank(items, &[], &[]);
        assert_eq!(links.len(), 5);
    }

    #[test]
    fn test_fallback_education_rule() {
        let links = fallback_links("montessori education");
        let sources: Vec<&str> = links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, vec!["wikipedia.org", "naeyc.org", "scholar.google.com"]);
        assert!(links[0].url.contains("montessori_education"));
    }

    #[test]
    fn test_fallback_safety_rule() {
        let links = fallback_links("safety regulation");
        let sources: Vec<&str> = links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, vec!["cpsc.gov", "scholar.google.com"]);
    }

    #[test]
    fn test_fallback_rules_combine() {
        // Triggers both the education rule (child) and the safety rule
        let links = fallback_links("child safety");
        let sources: Vec<&str> = links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(
            sources,
            vec!["wikipedia.org", "naeyc.org", "cpsc.gov", "scholar.google.com"]
        );
    }

    #[test]
    fn test_fallback_generic_query() {
        let links = fallback_links("quantum computing");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].source, "wikipedia.org");
        assert_eq!(links[0].url, "https://en.wikipedia.org/wiki/quantum_computing");
        assert_eq!(links[1].source, "scholar.google.com");
        assert_eq!(
            links[1].url,
            "https://scholar.google.com/scholar?q=quantum+computing"
        );
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_links("wooden chairs"), fallback_links("wooden chairs"));
    }
}
