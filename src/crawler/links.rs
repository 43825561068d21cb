use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Non-HTML asset extensions that are never worth crawling
fn asset_regex() -> &'static Regex {
    static ASSET_RE: OnceLock<Regex> = OnceLock::new();
    ASSET_RE.get_or_init(|| {
        Regex::new(r"(?i)\.(jpg|jpeg|png|gif|pdf|zip|css|js)$")
            .expect("asset extension pattern should be valid")
    })
}

/// Extracts crawlable same-domain links from an HTML document.
///
/// Each `href` is resolved against `base_url`; unparseable hrefs are dropped.
/// A resolved URL is kept only when it contains the crawl domain, carries no
/// fragment marker and does not end in a known asset extension. The result is
/// deduplicated preserving first-seen order.
pub fn extract_links(html: &str, base_url: &str, domain: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            ::log::warn!("Cannot resolve links against {}: {}", base_url, e);
            return Vec::new();
        }
    };

    let doc = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").expect("anchor selector should be valid");

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in doc.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let resolved = match base.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => continue,
        };

        if !resolved.contains(domain) {
            continue;
        }
        if resolved.contains('#') {
            continue;
        }
        if asset_regex().is_match(&resolved) {
            continue;
        }

        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    ::log::debug!("Extracted {} links from {}", links.len(), base_url);
    links
}
