//! Integration tests for ChatHandler: history writes, streaming, and failure rendering.

mod common;

use common::{fixture, fixture_without_key, RecordingObserver, StreamingLlm};

use ai_handlers::{TurnOutcome, MSG_MISSING_API_KEY, MSG_NO_RESPONSE};
use llm_client::{LlmError, NoopObserver};
use memory_core::{Mood, Role};

/// **Test: A streamed reply lands in history as one assistant message.**
///
/// **Setup:** Model streams "안녕" + "하세요".
/// **Action:** `send_message("jieun", "안녕!")`.
/// **Expected:** History is [user "안녕!", assistant "안녕하세요"]; observer saw both fragments.
#[tokio::test]
async fn test_streamed_reply_is_stored() {
    let f = fixture(StreamingLlm::fragments(&["안녕", "하세요"])).await;
    let mut observer = RecordingObserver::default();

    let outcome = f
        .handler
        .send_message("jieun", "안녕!", &mut observer)
        .await
        .unwrap();

    let history = f.chats.history("jieun").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "안녕!");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "안녕하세요");

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            message_id: history[1].id.clone(),
            text: "안녕하세요".to_string(),
        }
    );
    assert_eq!(observer.fragments, vec!["안녕", "하세요"]);
    assert_eq!(observer.completed.as_deref(), Some("안녕하세요"));
}

/// **Test: The prompt ends with the current utterance exactly once.**
///
/// **Setup:** One completed turn already in history.
/// **Action:** Second `send_message`.
/// **Expected:** Request starts with the persona system message, contains the
/// earlier turn, and the new text appears only as the final message.
#[tokio::test]
async fn test_prompt_uses_history_snapshot() {
    let f = fixture(StreamingLlm::fragments(&["응!"])).await;
    f.handler
        .send_message("jieun", "첫 인사", &mut NoopObserver)
        .await
        .unwrap();
    f.handler
        .send_message("jieun", "두 번째 말", &mut NoopObserver)
        .await
        .unwrap();

    let requests = f.llm.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1];
    assert!(second[0].is_system());
    assert!(second.iter().any(|m| m.content == "첫 인사"));
    assert_eq!(
        second.iter().filter(|m| m.content == "두 번째 말").count(),
        1
    );
    assert_eq!(second.last().unwrap().content, "두 번째 말");
}

/// **Test: Emotional state is persisted for the conversation.**
#[tokio::test]
async fn test_emotional_state_persisted() {
    let f = fixture(StreamingLlm::fragments(&["괜찮아?"])).await;
    f.handler
        .send_message("jieun", "오늘 너무 힘들어", &mut NoopObserver)
        .await
        .unwrap();

    let state = f.chats.emotional_state("jieun").await.unwrap();
    assert_eq!(state.mood, Mood::Caring);
    assert_eq!(state.last_topic, "오늘 너무 힘들어");
}

/// **Test: Without an API key the notice is appended and the model is not called.**
#[tokio::test]
async fn test_missing_api_key() {
    let f = fixture_without_key(StreamingLlm::fragments(&["unused"]));

    let outcome = f
        .handler
        .send_message("jieun", "안녕", &mut NoopObserver)
        .await
        .unwrap();

    assert_eq!(outcome, TurnOutcome::MissingApiKey);
    let history = f.chats.history("jieun").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, MSG_MISSING_API_KEY);
    assert!(f.llm.requests().is_empty());
}

/// **Test: Blank text and unknown characters are ignored.**
#[tokio::test]
async fn test_skipped_turns() {
    let f = fixture(StreamingLlm::fragments(&["unused"])).await;

    let blank = f
        .handler
        .send_message("jieun", "   ", &mut NoopObserver)
        .await
        .unwrap();
    let unknown = f
        .handler
        .send_message("nobody", "안녕", &mut NoopObserver)
        .await
        .unwrap();

    assert_eq!(blank, TurnOutcome::Skipped);
    assert_eq!(unknown, TurnOutcome::Skipped);
    assert!(f.chats.history("jieun").await.unwrap().is_empty());
    assert!(f.chats.history("nobody").await.unwrap().is_empty());
    assert!(f.llm.requests().is_empty());
}

/// **Test: A rejected request is rendered as one assistant error message.**
///
/// **Setup:** Model answers 401.
/// **Expected:** Failed outcome with status 401; message carries the Korean guidance.
#[tokio::test]
async fn test_rejected_request_rendered() {
    let f = fixture(StreamingLlm::rejecting(401)).await;

    let outcome = f
        .handler
        .send_message("jieun", "안녕", &mut NoopObserver)
        .await
        .unwrap();

    let history = f.chats.history("jieun").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[1].content.starts_with("오류가 발생했습니다:"));
    assert!(history[1].content.contains("401"));
    match outcome {
        TurnOutcome::Failed { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, history[1].content);
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

/// **Test: A mid-stream failure keeps the partial reply and appends the error.**
#[tokio::test]
async fn test_mid_stream_failure_keeps_partial() {
    let llm = StreamingLlm::scripted(|| {
        Ok(vec![
            Ok("부분".to_string()),
            Err(LlmError::Malformed("bad chunk".to_string())),
        ])
    });
    let f = fixture(llm).await;
    let mut observer = RecordingObserver::default();

    let outcome = f
        .handler
        .send_message("jieun", "안녕", &mut observer)
        .await
        .unwrap();

    let history = f.chats.history("jieun").await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].content, "부분");
    assert!(history[2].content.contains("bad chunk"));
    assert!(matches!(outcome, TurnOutcome::Failed { status: None, .. }));
    assert_eq!(observer.errors, 1);
    assert!(observer.completed.is_none());
}

/// **Test: A stream without text appends the no-response fallback.**
#[tokio::test]
async fn test_empty_stream() {
    let f = fixture(StreamingLlm::fragments(&["", ""])).await;

    let outcome = f
        .handler
        .send_message("jieun", "안녕", &mut NoopObserver)
        .await
        .unwrap();

    assert_eq!(outcome, TurnOutcome::NoResponse);
    let history = f.chats.history("jieun").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, MSG_NO_RESPONSE);
}

/// **Test: Preview composes the next prompt without touching history or state.**
#[tokio::test]
async fn test_preview_context_is_read_only() {
    let f = fixture(StreamingLlm::fragments(&["unused"])).await;

    let context = f
        .handler
        .preview_context("jieun", "오늘 너무 힘들어")
        .await
        .unwrap()
        .unwrap();

    assert!(context.messages[0].is_system());
    assert_eq!(context.messages.last().unwrap().content, "오늘 너무 힘들어");
    assert!(f.chats.history("jieun").await.unwrap().is_empty());
    assert!(f.chats.emotional_context().await.unwrap().is_empty());
    assert!(f.llm.requests().is_empty());

    assert!(f
        .handler
        .preview_context("nobody", "안녕")
        .await
        .unwrap()
        .is_none());
}
