//! Inverted keyword index and keyword-hit search.
//!
//! Only user-authored messages are indexed: keyword search surfaces what the
//! user said earlier, not what the character replied.

use std::collections::{BTreeMap, HashMap};

use memory_core::{ChatRecord, Role};
use tracing::debug;

use super::keywords::extract_keywords;

/// Mapping from keyword to the ascending positions of the messages containing it.
///
/// Rebuilt per retrieval call over a bounded history slice.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    /// Positions of messages containing `keyword`, ascending.
    pub fn positions(&self, keyword: &str) -> &[usize] {
        self.entries.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the keyword index over the user-authored messages of `history`.
pub fn build_keyword_index(history: &[ChatRecord]) -> KeywordIndex {
    let mut entries: HashMap<String, Vec<usize>> = HashMap::new();

    for (position, record) in history.iter().enumerate() {
        if record.role != Role::User || record.is_blank() {
            continue;
        }
        for keyword in extract_keywords(&record.content) {
            entries.entry(keyword).or_default().push(position);
        }
    }

    debug!(
        indexed_keywords = entries.len(),
        history_len = history.len(),
        "Built keyword index"
    );
    KeywordIndex { entries }
}

/// Ranks indexed positions by the number of query keywords they contain.
///
/// Returns at most `top_k` positions, highest score first; equal scores are
/// ordered by ascending position.
pub fn search_by_keywords(
    query: &str,
    index: &KeywordIndex,
    history: &[ChatRecord],
    top_k: usize,
) -> Vec<usize> {
    if query.trim().is_empty() || history.is_empty() {
        return Vec::new();
    }

    let mut scores: BTreeMap<usize, usize> = BTreeMap::new();
    for keyword in extract_keywords(query) {
        for &position in index.positions(&keyword) {
            *scores.entry(position).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(usize, usize)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(position, _)| position)
        .collect()
}
