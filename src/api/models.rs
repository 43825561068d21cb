//! Request and response bodies for the HTTP API.
//!
//! The wire format is camelCase JSON with a uniform
//! `{success, data?, error?}` response envelope.

use serde::{Deserialize, Serialize};

use crate::types::{PageRecord, SelectedLink};

/// Uniform response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Success with no payload (used by reset)
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Body of `POST /api/scrape`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: Option<String>,

    /// Page cap for this crawl; the configured default applies when omitted
    pub max_pages: Option<usize>,
}

/// Body of `POST /api/analyze`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub text: Option<String>,

    /// Pages to match against; the most recent crawl's index is used when
    /// omitted
    pub internal_pages: Option<Vec<PageRecord>>,
}

/// Body of `POST /api/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub keyword: Option<String>,

    /// Domain preferences; stored settings apply when omitted
    pub preferred_domains: Option<Vec<String>>,
    pub blacklisted_domains: Option<Vec<String>>,
}

/// Body of `PUT /api/search` (batch)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSearchRequest {
    pub keywords: Option<Vec<String>>,

    pub preferred_domains: Option<Vec<String>>,
    pub blacklisted_domains: Option<Vec<String>>,
}

/// Body of `POST /api/score`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub selected_links: Vec<SelectedLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_request_wire_names() {
        let request: ScrapeRequest =
            serde_json::from_str(r#"{"url": "https://a.test/", "maxPages": 20}"#).unwrap();
        assert_eq!(request.url.as_deref(), Some("https://a.test/"));
        assert_eq!(request.max_pages, Some(20));

        let bare: ScrapeRequest = serde_json::from_str("{}").unwrap();
        assert!(bare.url.is_none());
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let ok = serde_json::to_value(ApiResponse::ok(5)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 5);
        assert!(ok.get("error").is_none());

        let empty = serde_json::to_value(ApiResponse::<()>::empty()).unwrap();
        assert_eq!(empty["success"], true);
        assert!(empty.get("data").is_none());
    }
}
