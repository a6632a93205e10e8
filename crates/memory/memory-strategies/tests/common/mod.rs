//! Shared history builders for memory-strategies integration tests.

use memory_core::{ChatRecord, Role};

/// Builds a record with a deterministic id.
#[allow(dead_code)]
pub fn record(position: usize, role: Role, content: &str) -> ChatRecord {
    ChatRecord {
        id: format!("m{}", position),
        role,
        content: content.to_string(),
        time: "12:00".to_string(),
    }
}

/// Builds a history alternating user/assistant, starting with the user.
#[allow(dead_code)]
pub fn alternating(contents: &[&str]) -> Vec<ChatRecord> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            record(i, role, content)
        })
        .collect()
}
