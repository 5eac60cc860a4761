//! Keyword matching and link deduplication for candidate articles.

use std::collections::HashSet;

use gazette_common::CandidateArticle;

/// RSS keyword rule: a blank keyword passes everything; otherwise the
/// keyword must appear, case-insensitively, in the title or description.
pub fn matches_keyword(keyword: &str, title: &str, description: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return true;
    }
    let needle = keyword.to_lowercase();
    title.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
}

/// Case-insensitive "any keyword" rule. An empty keyword list passes everything.
pub fn matches_any_keyword(keywords: &[String], title: &str, description: &str) -> bool {
    keywords.is_empty() || keywords.iter().any(|k| matches_keyword(k, title, description))
}

/// Case-sensitive "any keyword" rule against raw text, for sources whose
/// results were already filtered upstream.
pub fn contains_any_keyword(keywords: &[String], title: &str, summary: &str) -> bool {
    keywords.is_empty()
        || keywords
            .iter()
            .any(|k| title.contains(k.as_str()) || summary.contains(k.as_str()))
}

/// Drop candidates whose link is in `existing` or already appeared earlier
/// in the batch. Order of the survivors is preserved.
pub fn filter_new_links(
    candidates: Vec<CandidateArticle>,
    existing: &[String],
) -> (Vec<CandidateArticle>, usize) {
    let mut seen: HashSet<String> = existing.iter().cloned().collect();
    let total = candidates.len();
    let fresh: Vec<CandidateArticle> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.original_link.clone()))
        .collect();
    let skipped = total - fresh.len();
    (fresh, skipped)
}
