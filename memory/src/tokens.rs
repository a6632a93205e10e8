//! Token estimation for prompt budgeting.
//!
//! Estimates are approximate and script-aware: dense scripts (Hangul, kana, CJK
//! ideographs) weigh 1.5 per character, each Latin word 1.3, every other
//! character (digits, punctuation, whitespace) 0.5. The sum is rounded up.
//!
//! A message costs its content estimate plus 2 for the role and 4 for framing.

use memory_strategies::is_dense_char;
use prompt::ChatMessage;
use serde::Serialize;

const DENSE_WEIGHT: f64 = 1.5;
const LATIN_WORD_WEIGHT: f64 = 1.3;
const OTHER_WEIGHT: f64 = 0.5;
const ROLE_OVERHEAD: usize = 2;
const FRAMING_OVERHEAD: usize = 4;

/// Nominal context window of the model.
pub const NOMINAL_CONTEXT_TOKENS: usize = 128_000;

/// Usage rate above which [`TokenUsage::warning`] is set.
const USAGE_WARNING_RATE: f64 = 0.8;

/// Estimates the token count of `text`. Empty text is 0.
pub fn estimate_tokens(text: &str) -> usize {
    let mut dense = 0usize;
    let mut latin_words = 0usize;
    let mut other = 0usize;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            if !in_word {
                latin_words += 1;
                in_word = true;
            }
            continue;
        }
        in_word = false;
        if is_dense_char(c) {
            dense += 1;
        } else {
            other += 1;
        }
    }

    let weighted = dense as f64 * DENSE_WEIGHT
        + latin_words as f64 * LATIN_WORD_WEIGHT
        + other as f64 * OTHER_WEIGHT;
    weighted.ceil() as usize
}

fn message_cost(message: &ChatMessage) -> usize {
    estimate_tokens(&message.content) + ROLE_OVERHEAD + FRAMING_OVERHEAD
}

/// Estimated token count of a whole message list.
pub fn estimate_message_tokens(messages: &[ChatMessage]) -> usize {
    messages.iter().map(message_cost).sum()
}

/// Cuts `messages` down to `max_tokens`.
///
/// A list already within budget is returned unchanged. Otherwise, with
/// `keep_system`, every system message is kept and charged first; the remaining
/// messages are taken newest first while they fit, stopping at the first one
/// that does not. The result lists the system messages in their original order,
/// then the kept messages oldest first.
pub fn truncate_messages(
    messages: &[ChatMessage],
    max_tokens: usize,
    keep_system: bool,
) -> Vec<ChatMessage> {
    if estimate_message_tokens(messages) <= max_tokens {
        return messages.to_vec();
    }

    let (system, rest): (Vec<&ChatMessage>, Vec<&ChatMessage>) = if keep_system {
        messages.iter().partition(|m| m.is_system())
    } else {
        (Vec::new(), messages.iter().collect())
    };

    let mut total: usize = system.iter().map(|m| message_cost(m)).sum();
    let mut kept = Vec::new();
    for message in rest.iter().rev() {
        let cost = message_cost(message);
        if total + cost > max_tokens {
            break;
        }
        total += cost;
        kept.push(*message);
    }
    kept.reverse();

    system.into_iter().chain(kept).cloned().collect()
}

/// `used / max`, capped at 1.
pub fn calculate_usage_rate(used: usize, max: usize) -> f64 {
    if max == 0 {
        return if used == 0 { 0.0 } else { 1.0 };
    }
    (used as f64 / max as f64).min(1.0)
}

/// Token usage of a prompt relative to a context window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenUsage {
    pub used: usize,
    pub max: usize,
    pub usage_rate: f64,
    /// Set when more than 80% of the window is used.
    pub warning: bool,
}

impl TokenUsage {
    pub fn new(used: usize, max: usize) -> Self {
        let usage_rate = calculate_usage_rate(used, max);
        Self {
            used,
            max,
            usage_rate,
            warning: usage_rate > USAGE_WARNING_RATE,
        }
    }

    pub fn from_messages(messages: &[ChatMessage], max: usize) -> Self {
        Self::new(estimate_message_tokens(messages), max)
    }
}

#[cfg(test)]
#[path = "tokens_test.rs"]
mod tokens_test;
