//! Keyword-extraction collaborator backed by the Gemini API.
//!
//! The LLM is asked for a pure JSON array of keyword objects, but its output
//! is treated as untrusted free text: the first bracketed array found in the
//! response is extracted and validated, and any failure along the way (HTTP,
//! non-success status, missing response fields, unparseable JSON) degrades to
//! an empty keyword list rather than an error.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use thiserror::Error;

use crate::types::Keyword;

/// Article text sent to the LLM is truncated to this many characters
const MAX_ANALYZE_CHARS: usize = 8000;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Instructional prompt; `{text}` is replaced with the (truncated) article
const ANALYZE_PROMPT: &str = r#"Analyze the following English text and identify keywords/phrases that would benefit from hyperlinks. Focus on:
1. Technical terms and concepts
2. Product/service names
3. Industry-specific terminology
4. Proper nouns (companies, places, etc.)
5. Key topics that readers might want to learn more about

For each keyword, determine if it's better suited for:
- "internal": Topics the website might have content about
- "external": General knowledge or authoritative external sources
- "both": Could benefit from either type

Return a JSON array with this exact format (no markdown, just pure JSON):
[
  {
    "keyword": "the exact phrase from the text",
    "type": "internal|external|both",
    "context": "brief explanation of why this needs a link",
    "position": approximate character position in text
  }
]

Text to analyze:
"""
{text}
"""

Important:
- Only return valid JSON, no other text
- Limit to 15 most important keywords
- Keywords should be 1-4 words
- Position should be the approximate character index where this keyword first appears"#;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("request to Gemini failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Abstraction over the LLM call so the analyze path can be exercised with a
/// canned extractor in tests
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Extracts link-worthy keywords from article text. Collaborator
    /// failures of any kind yield an empty list, never an error.
    async fn extract_keywords(&self, text: &str) -> Vec<Keyword>;
}

/// Gemini-backed keyword extractor
pub struct GeminiExtractor {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiExtractor {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }

    /// Sends one prompt to Gemini and returns the raw response text
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.3,
                "maxOutputTokens": 4096,
            },
        });

        let response = self
            .http
            .post(format!("{}?key={}", GEMINI_ENDPOINT, self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        let text = data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(text)
    }
}

#[async_trait]
impl KeywordExtractor for GeminiExtractor {
    async fn extract_keywords(&self, text: &str) -> Vec<Keyword> {
        let truncated: String = text.chars().take(MAX_ANALYZE_CHARS).collect();
        let prompt = ANALYZE_PROMPT.replace("{text}", &truncated);

        match self.generate(&prompt).await {
            Ok(response) => parse_keyword_response(&response),
            Err(e) => {
                ::log::error!("Keyword extraction failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Pattern matching the first bracketed JSON array in free-form LLM output
fn json_array_regex() -> &'static Regex {
    static ARRAY_RE: OnceLock<Regex> = OnceLock::new();
    ARRAY_RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array pattern should be valid"))
}

/// Tolerant extract-then-validate parsing of the LLM response.
///
/// Finds the first bracketed array in the text and deserializes it; returns
/// an empty list when no array is present or it does not validate.
pub fn parse_keyword_response(response: &str) -> Vec<Keyword> {
    let Some(array) = json_array_regex().find(response) else {
        ::log::warn!("No JSON array found in keyword-extraction response");
        return Vec::new();
    };

    match serde_json::from_str(array.as_str()) {
        Ok(keywords) => keywords,
        Err(e) => {
            ::log::warn!("Failed to parse keyword-extraction response: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeywordType;

    #[test]
    fn test_parse_plain_array() {
        let response = r#"[{"keyword": "montessori education", "type": "external",
            "context": "educational method", "position": 42}]"#;

        let keywords = parse_keyword_response(response);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "montessori education");
        assert_eq!(keywords[0].link_type, KeywordType::External);
        assert_eq!(keywords[0].position, 42);
    }

    #[test]
    fn test_parse_array_embedded_in_prose() {
        let response = "Sure! Here are the keywords:\n```json\n[{\"keyword\": \"wooden chairs\", \"type\": \"internal\"}]\n```\nLet me know if you need more.";

        let keywords = parse_keyword_response(response);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "wooden chairs");
        assert_eq!(keywords[0].context, "");
    }

    #[test]
    fn test_non_json_response_is_empty() {
        assert!(parse_keyword_response("I could not process that text.").is_empty());
        assert!(parse_keyword_response("").is_empty());
    }

    #[test]
    fn test_invalid_array_is_empty() {
        assert!(parse_keyword_response("[1, 2, 3]").is_empty());
        assert!(parse_keyword_response("[{\"keyword\": }]").is_empty());
    }
}
