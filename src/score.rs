//! SEO score calculator for a finished link set.
//!
//! Grades link density, anchor-text diversity and the internal/external link
//! ratio, then combines them with fixed 0.35/0.25/0.40 weights. Advisory
//! suggestion strings accompany every deduction.

use std::collections::HashSet;

use crate::types::{LinkType, SelectedLink, SeoScore};

/// One link per this many words is the lower density bound
const WORDS_PER_LINK_MAX: usize = 500;

/// One link per this many words is the upper density bound
const WORDS_PER_LINK_MIN: usize = 300;

/// Component weights for the overall score
const WEIGHT_DENSITY: f64 = 0.35;
const WEIGHT_DIVERSITY: f64 = 0.25;
const WEIGHT_RATIO: f64 = 0.40;

/// Grades `selected_links` against `text` and returns the component scores,
/// the weighted overall score and any improvement suggestions
pub fn calculate_seo_score(text: &str, selected_links: &[SelectedLink]) -> SeoScore {
    let word_count = text.split_whitespace().count();
    let total_links = selected_links.len();
    let mut suggestions = Vec::new();

    // Link density: ideally one link per 300-500 words
    let ideal_min = word_count / WORDS_PER_LINK_MAX;
    let ideal_max = word_count.div_ceil(WORDS_PER_LINK_MIN);

    let mut link_density: i64 = 100;
    if total_links < ideal_min {
        let missing = (ideal_min - total_links) as i64;
        link_density = (100 - missing * 15).max(50);
        suggestions.push(format!(
            "Consider adding {} more links. Current density is low.",
            missing
        ));
    } else if total_links > ideal_max {
        let excess = (total_links - ideal_max) as i64;
        link_density = (100 - excess * 10).max(40);
        suggestions.push(format!(
            "You have {} more links than recommended. Consider removing some.",
            excess
        ));
    }

    // Anchor text diversity: share of unique anchors
    let anchor_texts: Vec<String> = selected_links
        .iter()
        .map(|link| link.anchor_text.to_lowercase())
        .collect();
    let unique_anchors: HashSet<&String> = anchor_texts.iter().collect();
    let anchor_diversity: i64 = if anchor_texts.is_empty() {
        100
    } else {
        ((unique_anchors.len() as f64 / anchor_texts.len() as f64) * 100.0).round() as i64
    };
    if anchor_diversity < 70 {
        suggestions
            .push("Try to use more diverse anchor texts. Avoid repeating the same phrases.".to_string());
    }

    // Internal/external balance: internal links should slightly outnumber
    let internal_links = selected_links
        .iter()
        .filter(|link| link.link_type == LinkType::Internal)
        .count();

    let mut internal_external_ratio: i64 = 100;
    if total_links > 0 {
        let ratio = internal_links as f64 / total_links as f64;
        if ratio < 0.3 {
            internal_external_ratio = 60;
            suggestions.push("Add more internal links to improve site navigation and SEO.".to_string());
        } else if ratio > 0.8 {
            internal_external_ratio = 70;
            suggestions.push(
                "Consider adding external links to authoritative sources for credibility.".to_string(),
            );
        } else if (0.4..=0.6).contains(&ratio) {
            internal_external_ratio = 100;
        } else {
            internal_external_ratio = 85;
        }
    }

    // Advisory checks that do not affect the numeric score
    let urls: HashSet<&str> = selected_links.iter().map(|link| link.url.as_str()).collect();
    if urls.len() < total_links {
        suggestions.push("Avoid linking to the same URL multiple times.".to_string());
    }

    if anchor_texts
        .iter()
        .any(|anchor| anchor.split_whitespace().count() > 5)
    {
        suggestions
            .push("Some anchor texts are too long. Keep them under 5 words for better UX.".to_string());
    }

    let overall = (link_density as f64 * WEIGHT_DENSITY
        + anchor_diversity as f64 * WEIGHT_DIVERSITY
        + internal_external_ratio as f64 * WEIGHT_RATIO)
        .round() as u32;

    SeoScore {
        overall,
        link_density: link_density as u32,
        anchor_diversity: anchor_diversity as u32,
        internal_external_ratio: internal_external_ratio as u32,
        suggestions,
    }
}
