//! Keyword-to-page relevance matcher.
//!
//! Pure synchronous scoring of crawled pages against keyword phrases. The
//! point values are long-standing empirical constants; they are kept exactly
//! as tuned rather than re-derived.

use std::collections::HashMap;

use crate::types::{LinkType, PageRecord, SuggestedLink};

/// Keyword phrase appears verbatim in the page title
const FULL_PHRASE_TITLE: u32 = 60;
/// A keyword word appears in the title
const WORD_TITLE: u32 = 25;
/// A keyword word appears in the URL
const WORD_URL: u32 = 20;
/// A keyword word appears in the description
const WORD_DESCRIPTION: u32 = 15;
/// A page keyword contains, or is contained by, the whole keyword phrase
const PAGE_KEYWORD_PHRASE: u32 = 30;
/// A keyword word appears in a page keyword
const WORD_PAGE_KEYWORD: u32 = 15;

/// Words shorter than this never contribute word-level points
const MIN_WORD_LEN: usize = 3;
/// Pages scoring at or below this are dropped as incidental matches
const INCLUSION_THRESHOLD: u32 = 20;
/// Scores are clamped here, never higher
const MAX_SCORE: u32 = 100;
/// Suggestions per keyword are truncated to this many
const MAX_SUGGESTIONS: usize = 5;

/// Scores every page against every keyword and returns, per keyword, at most
/// 5 suggested internal links sorted descending by relevance. Ties keep the
/// original page order, so identical inputs always yield identical output.
pub fn match_keywords(
    keywords: &[String],
    pages: &[PageRecord],
) -> HashMap<String, Vec<SuggestedLink>> {
    let mut matches = HashMap::new();

    for keyword in keywords {
        let keyword_lower = keyword.to_lowercase();
        let words: Vec<&str> = keyword_lower.split_whitespace().collect();

        let mut suggestions: Vec<SuggestedLink> = Vec::new();

        for page in pages {
            let score = score_page(&keyword_lower, &words, page);
            if score <= INCLUSION_THRESHOLD {
                continue;
            }

            suggestions.push(SuggestedLink {
                url: page.url.clone(),
                title: page.title.clone(),
                description: if page.description.is_empty() {
                    page.url.clone()
                } else {
                    page.description.clone()
                },
                link_type: LinkType::Internal,
                relevance_score: score.min(MAX_SCORE),
                is_preferred: None,
            });
        }

        // Stable sort keeps original page order on equal scores
        suggestions.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        suggestions.truncate(MAX_SUGGESTIONS);

        matches.insert(keyword.clone(), suggestions);
    }

    matches
}

/// Accumulated (unclamped) score of one page for one keyword
fn score_page(keyword_lower: &str, words: &[&str], page: &PageRecord) -> u32 {
    let title_lower = page.title.to_lowercase();
    let url_lower = page.url.to_lowercase();
    let desc_lower = page.description.to_lowercase();

    let mut score = 0;

    if title_lower.contains(keyword_lower) {
        score += FULL_PHRASE_TITLE;
    }

    for word in words {
        if word.chars().count() < MIN_WORD_LEN {
            continue;
        }
        if title_lower.contains(word) {
            score += WORD_TITLE;
        }
        if url_lower.contains(word) {
            score += WORD_URL;
        }
        if desc_lower.contains(word) {
            score += WORD_DESCRIPTION;
        }
    }

    for page_keyword in &page.keywords {
        let pk_lower = page_keyword.to_lowercase();
        if pk_lower.contains(keyword_lower) || keyword_lower.contains(&pk_lower) {
            score += PAGE_KEYWORD_PHRASE;
        }
        for word in words {
            if word.chars().count() >= MIN_WORD_LEN && pk_lower.contains(word) {
                score += WORD_PAGE_KEYWORD;
            }
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn page(url: &str, title: &str, description: &str, keywords: &[&str]) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            last_scanned: Utc::now(),
        }
    }

    fn single(keyword: &str, pages: &[PageRecord]) -> Vec<SuggestedLink> {
        match_keywords(&[keyword.to_string()], pages)
            .remove(keyword)
            .unwrap()
    }

    #[test]
    fn test_full_phrase_title_match_clamped() {
        let pages = vec![page(
            "https://a.test/chairs",
            "Wooden Chairs for Kids",
            "",
            &[],
        )];

        let links = single("wooden chairs", &pages);
        assert_eq!(links.len(), 1);
        // 60 (phrase) + 25 + 25 (words in title) + 20 (word in url) = 130, clamped
        assert_eq!(links[0].relevance_score, 100);
        assert_eq!(links[0].link_type, LinkType::Internal);
    }

    #[test]
    fn test_threshold_excludes_weak_matches() {
        // A single description word match is worth 15, below the cutoff of 20
        let pages = vec![page("https://a.test/p", "Unrelated", "about chairs", &[])];
        assert!(single("chairs stools", &pages).is_empty());
    }

    #[test]
    fn test_short_words_never_score() {
        // "xy" is below the 3-character minimum, so word signals cannot fire
        let pages = vec![page("https://a.test/xy", "xy factor", "xy xy xy", &[])];
        let links = single("xy", &pages);
        // Only the full-phrase title match (60) applies
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].relevance_score, 60);
    }

    #[test]
    fn test_page_keyword_overlap_both_directions() {
        // Page keyword contained by the phrase: 30 + word match 15 = 45
        let contains = vec![page("https://a.test/1", "t", "", &["chairs"])];
        assert_eq!(single("wooden chairs", &contains)[0].relevance_score, 45);

        // Page keyword containing the phrase
        let contained = vec![page("https://a.test/2", "t", "", &["fine wooden chairs"])];
        let links = single("wooden chairs", &contained);
        // 30 (overlap) + 15 + 15 (both words inside the page keyword) = 60
        assert_eq!(links[0].relevance_score, 60);
    }

    #[test]
    fn test_sorted_descending_capped_at_five() {
        let mut pages = vec![page(
            "https://a.test/best",
            "Montessori Toys",
            "montessori toys guide",
            &["montessori toys"],
        )];
        for i in 0..6 {
            pages.push(page(
                &format!("https://a.test/{}", i),
                "Montessori",
                "",
                &[],
            ));
        }

        let links = single("montessori toys", &pages);
        assert_eq!(links.len(), 5);
        assert_eq!(links[0].url, "https://a.test/best");
        for pair in links.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        for link in &links {
            assert!(link.relevance_score > INCLUSION_THRESHOLD);
            assert!(link.relevance_score <= MAX_SCORE);
        }
    }

    #[test]
    fn test_ties_keep_page_order() {
        let pages = vec![
            page("https://a.test/first", "Montessori", "", &[]),
            page("https://a.test/second", "Montessori", "", &[]),
        ];

        let links = single("montessori", &pages);
        assert_eq!(links[0].url, "https://a.test/first");
        assert_eq!(links[1].url, "https://a.test/second");
    }

    #[test]
    fn test_empty_description_falls_back_to_url() {
        let pages = vec![page("https://a.test/montessori", "Montessori", "", &[])];
        let links = single("montessori", &pages);
        assert_eq!(links[0].description, "https://a.test/montessori");
    }

    #[test]
    fn test_idempotent() {
        let pages = vec![
            page("https://a.test/1", "Wooden Chairs", "kids chairs", &["chairs"]),
            page("https://a.test/2", "Tables", "wooden tables", &["wood"]),
        ];
        let keywords = vec!["wooden chairs".to_string(), "tables".to_string()];

        let first = match_keywords(&keywords, &pages);
        let second = match_keywords(&keywords, &pages);
        assert_eq!(first, second);
    }
}
