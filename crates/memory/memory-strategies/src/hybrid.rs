//! Hybrid retrieval: keyword hits and lexical similarity merged over older history.

use std::collections::BTreeSet;

use memory_core::ChatRecord;
use prompt::{ChatMessage, MessageRole};
use tracing::{debug, instrument};

use super::keyword_index::{build_keyword_index, search_by_keywords};
use super::semantic_search::search_by_semantic;
use super::utils::estimate_retrieval_tokens;

/// Retrieves older messages relevant to the current utterance.
///
/// Runs keyword search and similarity search over the history minus its most
/// recent `recent_count` messages, unions both rankings, keeps the newest
/// `max_candidates` positions, and accepts them newest first until the next
/// message would exceed the token budget. Output is chronological.
#[derive(Debug, Clone)]
pub struct HybridRetrievalStrategy {
    keyword_top_k: usize,
    semantic_top_k: usize,
    max_candidates: usize,
}

impl Default for HybridRetrievalStrategy {
    fn default() -> Self {
        Self {
            keyword_top_k: 10,
            semantic_top_k: 10,
            max_candidates: 20,
        }
    }
}

impl HybridRetrievalStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many keyword-search hits enter the merge.
    pub fn with_keyword_top_k(mut self, top_k: usize) -> Self {
        self.keyword_top_k = top_k;
        self
    }

    /// Sets how many similarity-search hits enter the merge.
    pub fn with_semantic_top_k(mut self, top_k: usize) -> Self {
        self.semantic_top_k = top_k;
        self
    }

    /// Caps the merged candidate list.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Returns relevant older messages, oldest first.
    ///
    /// Empty when `query` is blank or `history` has no more than `recent_count` messages.
    #[instrument(skip(self, query, history), fields(history_len = history.len()))]
    pub fn retrieve(
        &self,
        query: &str,
        history: &[ChatRecord],
        max_tokens: usize,
        recent_count: usize,
    ) -> Vec<ChatMessage> {
        if query.trim().is_empty() || history.len() <= recent_count {
            return Vec::new();
        }

        let old = &history[..history.len() - recent_count];
        let index = build_keyword_index(old);
        let keyword_hits = search_by_keywords(query, &index, old, self.keyword_top_k);
        let semantic_hits = search_by_semantic(query, old, self.semantic_top_k);

        let candidates: BTreeSet<usize> = keyword_hits
            .iter()
            .chain(semantic_hits.iter())
            .copied()
            .collect();

        let mut accepted = Vec::new();
        let mut total_tokens = 0usize;
        for position in candidates.iter().rev().take(self.max_candidates) {
            let record = &old[*position];
            if record.is_blank() {
                continue;
            }
            let cost = estimate_retrieval_tokens(&record.content);
            if total_tokens + cost > max_tokens {
                break;
            }
            total_tokens += cost;
            accepted.push(ChatMessage {
                role: MessageRole::from_history_role(record.role),
                content: record.content.clone(),
            });
        }
        accepted.reverse();

        debug!(
            keyword_hits = keyword_hits.len(),
            semantic_hits = semantic_hits.len(),
            candidates = candidates.len(),
            accepted = accepted.len(),
            total_tokens,
            max_tokens,
            "Hybrid retrieval finished"
        );
        accepted
    }
}

/// Hybrid retrieval with the default limits (10 keyword hits, 10 similarity hits, 20 candidates).
pub fn retrieve_relevant_context(
    query: &str,
    history: &[ChatRecord],
    max_tokens: usize,
    recent_count: usize,
) -> Vec<ChatMessage> {
    HybridRetrievalStrategy::default().retrieve(query, history, max_tokens, recent_count)
}
