//! Shared helpers for retrieval.

/// Rough token cost used while filling the retrieval budget: 1.5 per character plus 10 overhead.
pub fn estimate_retrieval_tokens(content: &str) -> usize {
    (content.chars().count() as f64 * 1.5).ceil() as usize + 10
}
