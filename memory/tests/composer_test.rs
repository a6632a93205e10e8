//! Context composer behaviour: message order, older-context branch, emotional state, truncation.

mod common;

use common::*;
use llm_client::Credentials;
use memory::{
    estimate_message_tokens, ContextComposer, OlderContext, TurnInput, MAX_CONTEXT_TOKENS,
};
use memory_core::{
    CharacterProfile, ChatRecord, EmotionalContextMap, EmotionalState, Mood, RelationshipLevel,
    Role,
};
use prompt::{build_summary_message, build_system_prompt, ChatMessage, SUMMARY_INSTRUCTION};
use std::sync::Arc;

fn turn<'a>(
    text: &'a str,
    history: &'a [ChatRecord],
    character: &'a CharacterProfile,
    credentials: &'a Credentials,
    emotional_context: &'a EmotionalContextMap,
) -> TurnInput<'a> {
    TurnInput {
        current_text: text,
        history: Some(history),
        conversation_id: &character.id,
        character: Some(character),
        credentials,
        emotional_context,
    }
}

#[tokio::test]
async fn test_twelve_messages_skip_older_branch() {
    let llm = Arc::new(ScriptedLlm::replying("요약"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(12);

    let context = composer
        .compose(
            turn("오늘 날씨 좋다", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;
    let messages = &context.messages;

    assert_eq!(messages.len(), 11);
    assert_eq!(messages[0], ChatMessage::system(build_system_prompt(&character)));
    assert_eq!(
        messages[1],
        ChatMessage::system("[상황] 기분:normal 주제:오늘 날씨 좋다 관계:friend")
    );
    for (i, message) in messages[2..10].iter().enumerate() {
        assert_eq!(message.content, history[4 + i].content);
    }
    assert_eq!(messages[10], ChatMessage::user("오늘 날씨 좋다"));
    assert_eq!(context.metadata.older_context, OlderContext::NotNeeded);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_nine_older_messages_stay_below_threshold() {
    let llm = Arc::new(ScriptedLlm::replying("요약"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(17);

    let context = composer
        .compose(
            turn("커피 마시고 싶다", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;

    assert_eq!(context.metadata.older_context, OlderContext::NotNeeded);
    assert_eq!(context.messages.len(), 2 + 8 + 1);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_retrieval_hit_skips_summarization() {
    let llm = Arc::new(ScriptedLlm::replying("요약"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let mut history = filler_history(18);
    history[2] = record(Role::User, "커피 정말 좋아해");

    let context = composer
        .compose(
            turn("커피 마시러 갈까", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;
    let messages = &context.messages;

    assert_eq!(context.metadata.older_context, OlderContext::Retrieved(1));
    assert_eq!(messages.len(), 2 + 1 + 8 + 1);
    assert_eq!(messages[2], ChatMessage::user("커피 정말 좋아해"));
    assert_eq!(messages[3].content, "filler line 10");
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_summary_used_when_nothing_retrieved() {
    let llm = Arc::new(ScriptedLlm::replying("  사용자는 산책을 좋아함  "));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(18);

    let context = composer
        .compose(
            turn("커피 마시고 싶다", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;
    let messages = &context.messages;

    assert_eq!(context.metadata.older_context, OlderContext::Summarized);
    assert_eq!(messages.len(), 2 + 1 + 8 + 1);
    assert_eq!(messages[2], build_summary_message("사용자는 산책을 좋아함"));
    assert!(messages[2].content.starts_with("[이전 대화 요약]\n사용자는 산책을 좋아함\n\n"));

    assert_eq!(llm.calls(), 1);
    let requests = llm.requests();
    assert_eq!(requests[0].len(), 1);
    let request = &requests[0][0].content;
    assert!(request.starts_with(SUMMARY_INSTRUCTION));
    assert!(request.contains("user: filler line 0"));
    assert!(request.contains("assistant: filler line 9"));
    assert!(!request.contains("filler line 10"));
}

#[tokio::test]
async fn test_summary_failure_is_silent() {
    let llm = Arc::new(ScriptedLlm::failing());
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(18);

    let context = composer
        .compose(
            turn("커피 마시고 싶다", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;

    assert_eq!(context.metadata.older_context, OlderContext::Omitted);
    assert_eq!(context.messages.len(), 2 + 8 + 1);
    assert!(context.messages[2..].iter().all(|m| !m.is_system()));
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_blank_summary_is_skipped() {
    let llm = Arc::new(ScriptedLlm::replying("   \n"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(20);

    let context = composer
        .compose(
            turn("커피 마시고 싶다", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;

    assert_eq!(context.metadata.older_context, OlderContext::Omitted);
    assert_eq!(context.messages.len(), 2 + 8 + 1);
}

#[tokio::test]
async fn test_emotional_state_updated_and_persisted() {
    let composer = ContextComposer::new(Arc::new(ScriptedLlm::failing()));
    let character = character();
    let credentials = credentials();
    let mut emotional_context = EmotionalContextMap::new();
    emotional_context.insert(
        character.id.clone(),
        EmotionalState {
            mood: Mood::Happy,
            last_topic: "여행".to_string(),
            relationship_level: RelationshipLevel::Close,
        },
    );
    let history = filler_history(4);
    let writer = RecordingWriter::default();

    let messages = composer
        .prepare_messages(
            turn("오늘 너무 힘들어", &history, &character, &credentials, &emotional_context),
            Some(&writer),
        )
        .await;

    let writes = writer.writes.lock().unwrap().clone();
    assert_eq!(
        writes,
        vec![(
            character.id.clone(),
            EmotionalState {
                mood: Mood::Caring,
                last_topic: "오늘 너무 힘들어".to_string(),
                relationship_level: RelationshipLevel::Close,
            }
        )]
    );
    assert!(messages[0].content.contains("[중요] 사용자가 지금 힘들어하고 있어."));
    assert_eq!(
        messages[1].content,
        "[상황] 기분:caring 주제:오늘 너무 힘들어 관계:close"
    );
}

#[tokio::test]
async fn test_missing_inputs_yield_nothing() {
    let composer = ContextComposer::new(Arc::new(ScriptedLlm::failing()));
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history = filler_history(4);
    let writer = RecordingWriter::default();

    let mut input = turn("안녕", &history, &character, &credentials, &emotional_context);
    input.character = None;
    assert!(composer.prepare_messages(input, Some(&writer)).await.is_empty());

    let mut input = turn("안녕", &history, &character, &credentials, &emotional_context);
    input.history = None;
    assert!(composer.prepare_messages(input, Some(&writer)).await.is_empty());

    assert!(writer.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_first_turn_and_blank_records() {
    let composer = ContextComposer::new(Arc::new(ScriptedLlm::failing()));
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();

    let empty: Vec<ChatRecord> = Vec::new();
    let messages = composer
        .prepare_messages(turn("안녕", &empty, &character, &credentials, &emotional_context), None)
        .await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2], ChatMessage::user("안녕"));

    let history = vec![
        record(Role::User, "반가워"),
        record(Role::Assistant, "   "),
        record(Role::Assistant, ""),
    ];
    let messages = composer
        .prepare_messages(turn("뭐해", &history, &character, &credentials, &emotional_context), None)
        .await;
    assert_eq!(
        messages[2..],
        [ChatMessage::user("반가워"), ChatMessage::user("뭐해")]
    );
    assert!(messages.iter().all(ChatMessage::is_valid));
}

#[tokio::test]
async fn test_over_budget_prompt_is_truncated() {
    let composer = ContextComposer::new(Arc::new(ScriptedLlm::failing()));
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let history: Vec<ChatRecord> = (0..8)
        .map(|i| record(Role::User, &format!("{}{}", "가".repeat(30_000), i)))
        .collect();

    let context = composer
        .compose(
            turn("안녕", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;
    let messages = &context.messages;

    assert!(context.metadata.truncated);
    assert!(estimate_message_tokens(messages) <= MAX_CONTEXT_TOKENS);
    assert!(messages[0].is_system());
    assert!(messages[1].is_system());
    assert_eq!(messages.last(), Some(&ChatMessage::user("안녕")));
    assert!(messages.len() < 2 + 8 + 1);
    assert_eq!(context.metadata.total_tokens, estimate_message_tokens(messages));
}

/// **Test: Blank records do not shift the recent window away from the retrieval window.**
///
/// **Setup:** 20 records, a coffee line at position 11, the last two records blank.
/// **Action:** Compose for "커피 마시러 갈까".
/// **Expected:** The coffee line is recent (non-blank window), so it appears exactly once
/// and retrieval finds nothing older, falling back to the summary.
#[tokio::test]
async fn test_blank_tail_does_not_duplicate_recent_message() {
    let llm = Arc::new(ScriptedLlm::replying("요약"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let mut history = filler_history(20);
    history[11] = record(Role::User, "커피 정말 좋아해");
    history[18] = record(Role::Assistant, "");
    history[19] = record(Role::User, "  ");

    let context = composer
        .compose(
            turn("커피 마시러 갈까", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;
    let messages = &context.messages;

    let copies = messages
        .iter()
        .filter(|m| m.content == "커피 정말 좋아해")
        .count();
    assert_eq!(copies, 1);
    assert_eq!(context.metadata.older_context, OlderContext::Summarized);
    assert_eq!(messages.len(), 2 + 1 + 8 + 1);
    assert_eq!(messages[3].content, "filler line 10");
    assert_eq!(llm.calls(), 1);
}

/// **Test: A whitespace-only older record is never a retrieval hit.**
///
/// **Setup:** 18 records with position 5 whitespace-only; query has no keywords.
/// **Expected:** Retrieval is empty, so the summary fallback runs.
#[tokio::test]
async fn test_blank_older_record_is_not_retrieved() {
    let llm = Arc::new(ScriptedLlm::replying("요약"));
    let composer = ContextComposer::new(llm.clone());
    let character = character();
    let credentials = credentials();
    let emotional_context = EmotionalContextMap::new();
    let mut history = filler_history(18);
    history[5] = record(Role::Assistant, "   ");
    history.push(record(Role::User, "filler line 18"));

    let context = composer
        .compose(
            turn("ok", &history, &character, &credentials, &emotional_context),
            None,
        )
        .await;

    assert_eq!(context.metadata.older_context, OlderContext::Summarized);
    assert_eq!(llm.calls(), 1);
    assert!(context.messages.iter().all(ChatMessage::is_valid));
}
