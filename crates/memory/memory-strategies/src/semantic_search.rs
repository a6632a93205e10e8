//! Lexical similarity search.
//!
//! Scores every message (both authors) by Jaccard similarity between its
//! keyword set and the query's keyword set.

use memory_core::ChatRecord;

use super::keywords::extract_keywords;

/// Jaccard similarity of the keyword sets of `a` and `b`, in `[0, 1]`.
///
/// Blank text scores 0. Two texts that both have no keywords score 1.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let left = extract_keywords(a);
    let right = extract_keywords(b);

    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

/// Ranks positions of `history` by similarity to `query`.
///
/// Zero-similarity messages are excluded. Returns at most `top_k` positions,
/// most similar first; equal similarity is ordered by ascending position.
pub fn search_by_semantic(query: &str, history: &[ChatRecord], top_k: usize) -> Vec<usize> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = history
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.is_blank())
        .map(|(position, record)| (position, calculate_similarity(query, &record.content)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
        .into_iter()
        .take(top_k)
        .map(|(position, _)| position)
        .collect()
}
