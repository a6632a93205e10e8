//! # Lexical Retrieval
//!
//! This crate finds older messages relevant to the current utterance without
//! embeddings or external services.
//!
//! - [`extract_keywords`]: normalized keyword set of a text
//! - [`build_keyword_index`] / [`search_by_keywords`]: inverted index over user-authored messages, scored by keyword hits
//! - [`calculate_similarity`] / [`search_by_semantic`]: Jaccard similarity of keyword sets over all messages
//! - [`HybridRetrievalStrategy`] / [`retrieve_relevant_context`]: union of both rankings, newest first, under a token budget
//!
//! Rankings are deterministic: equal scores are ordered by ascending history position.
//!
//! ## Logging
//!
//! Retrieval emits `tracing` debug logs with candidate counts and the accepted
//! token total so that retrieval behaviour can be inspected in production.
//!
//! ## External Interactions
//!
//! - **memory-core**: reads `ChatRecord` history snapshots
//! - **prompt**: produces `ChatMessage` prompt units

mod hybrid;
mod keyword_index;
mod keywords;
mod semantic_search;
mod utils;

pub use hybrid::{retrieve_relevant_context, HybridRetrievalStrategy};
pub use keyword_index::{build_keyword_index, search_by_keywords, KeywordIndex};
pub use keywords::{extract_keywords, is_dense_char, STOP_WORDS};
pub use semantic_search::{calculate_similarity, search_by_semantic};
pub use utils::estimate_retrieval_tokens;
