//! Summarization fallback for older messages.

use llm_client::{Credentials, LlmClient};
use prompt::{build_summary_request, ChatMessage};
use tracing::{debug, instrument, warn};

/// Asks the model for a concise summary of `old_messages`.
///
/// Returns an empty string when there is nothing to summarize or the call fails
/// for any reason; failures are logged, never returned.
#[instrument(skip_all, fields(message_count = old_messages.len()))]
pub async fn summarize_messages(
    client: &dyn LlmClient,
    old_messages: &[ChatMessage],
    credentials: &Credentials,
) -> String {
    if old_messages.is_empty() {
        return String::new();
    }

    let request = build_summary_request(old_messages);
    match client.complete(credentials, vec![request]).await {
        Ok(summary) => {
            debug!(summary_len = summary.len(), "Summary received");
            summary
        }
        Err(e) => {
            warn!(error = %e, "Summarization failed, continuing without summary");
            String::new()
        }
    }
}
