use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use url::Url;

use crate::crawler::fetcher::PageFetch;
use crate::crawler::links;
use crate::types::SiteIndex;

/// Errors that abort a crawl before it starts. Per-page failures are never
/// errors; they only shrink the resulting index.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Crawls a site breadth-first starting at `root_url`, collecting at most
/// `max_pages` pages from the root's domain.
///
/// Fetches run strictly one at a time. A URL is fetched at most once; a page
/// that fails to fetch is skipped without enqueueing its children and without
/// counting toward the page cap. The queue never holds duplicate entries.
pub async fn crawl(
    fetcher: &dyn PageFetch,
    root_url: &str,
    max_pages: usize,
) -> Result<SiteIndex, CrawlError> {
    let parsed = Url::parse(root_url).map_err(|_| CrawlError::InvalidUrl(root_url.to_string()))?;
    let domain = parsed
        .host_str()
        .ok_or_else(|| CrawlError::InvalidUrl(root_url.to_string()))?
        .to_string();

    ::log::info!("Starting crawl of {} (max {} pages)", domain, max_pages);

    let mut queue = VecDeque::from([root_url.to_string()]);
    let mut enqueued: HashSet<String> = queue.iter().cloned().collect();
    let mut visited: HashSet<String> = HashSet::new();
    let mut pages = Vec::new();

    while pages.len() < max_pages {
        let Some(current) = queue.pop_front() else {
            break;
        };

        if !visited.insert(current.clone()) {
            continue;
        }

        let Some(fetched) = fetcher.fetch(&current).await else {
            ::log::debug!("Skipping unfetchable page: {}", current);
            continue;
        };

        pages.push(fetched.record);

        if pages.len() < max_pages {
            for link in links::extract_links(&fetched.html, &current, &domain) {
                if !visited.contains(&link) && enqueued.insert(link.clone()) {
                    queue.push_back(link);
                }
            }
        }
    }

    ::log::info!("Crawl of {} complete: {} pages", domain, pages.len());

    Ok(SiteIndex {
        domain,
        total_pages: pages.len(),
        pages,
        last_scanned: Utc::now(),
    })
}
