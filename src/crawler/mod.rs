//! Bounded breadth-first site crawler.
//!
//! [`site::crawl`] walks same-domain links from a root URL, one sequential
//! fetch at a time, until the queue drains or the page cap is reached.

pub mod fetcher;
pub mod links;
pub mod site;

pub use fetcher::{FetchedPage, PageFetch, PageFetcher};
pub use site::{crawl, CrawlError};
