//! Chat Scenario Tests
//!
//! Full submit flows through `ChatSession` with a mocked provider, plus one
//! run against a mocked Gemini endpoint.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::API_KEY_ENV;
use crate::core::assistant::{ChatFailure, PanelState, RequestPhase};
use crate::core::llm::{ChatMessage, GoogleProvider, LLMError, LLMProvider, MessageRole};
use crate::core::llm::providers::PLACEHOLDER_API_KEY;
use crate::tests::common::{
    failing, gemini_reply, google_for, open_session, replying, TEST_API_KEY,
};

// =============================================================================
// Initial State
// =============================================================================

#[test]
fn test_starts_with_single_welcome() {
    let session = open_session();
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript()[0].role(), MessageRole::Assistant);
    assert!(session.pending_input().is_empty());
}

// =============================================================================
// Successful Replies
// =============================================================================

#[tokio::test]
async fn test_success_appends_user_then_reply() {
    let provider = replying("List skills by relevance.");
    let mut session = open_session();

    session.update_pending_input("How do I list skills?");
    session.submit(&provider).await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], ChatMessage::user("How do I list skills?"));
    assert_eq!(transcript[2], ChatMessage::assistant("List skills by relevance."));
    assert_eq!(session.panel(), PanelState::Open(RequestPhase::Idle));
}

#[tokio::test]
async fn test_provider_receives_rendered_prompt() {
    let mut provider = crate::core::llm::provider::MockLLMProvider::new();
    provider
        .expect_chat()
        .withf(|request| {
            let prompt = request.messages[0].content();
            prompt.starts_with("You are a helpful assistant for a resume builder application.")
                && prompt.contains("The user is asking: \"Cover letters?\"")
                && prompt.ends_with("Keep your response under 150 words.")
        })
        .times(1)
        .returning(|_| Ok(crate::tests::common::response("Keep it short.")));

    let mut session = open_session();
    session.update_pending_input("Cover letters?");
    session.submit(&provider).await;
    assert_eq!(session.transcript().len(), 3);
}

#[tokio::test]
async fn test_end_to_end_against_mocked_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply("Quantify your impact.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = google_for(&server, Some(TEST_API_KEY));
    let mut session = open_session();
    session.update_pending_input("Any tips?");
    session.submit(&provider).await;

    assert_eq!(
        session.transcript().last(),
        Some(&ChatMessage::assistant("Quantify your impact."))
    );
}

// =============================================================================
// Failures Become Assistant Messages
// =============================================================================

#[rstest]
#[case::unset(None)]
#[case::blank(Some("   "))]
#[case::placeholder(Some(PLACEHOLDER_API_KEY))]
#[tokio::test]
async fn test_missing_credential_explains_setup(#[case] key: Option<&str>) {
    let provider = GoogleProvider::new(
        key.map(str::to_string),
        "gemini-2.5-pro",
        "http://127.0.0.1:9",
        std::time::Duration::from_secs(1),
    )
    .unwrap();

    let mut session = open_session();
    session.update_pending_input("test");
    session.submit(&provider).await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], ChatMessage::user("test"));
    assert_eq!(transcript[2].role(), MessageRole::Assistant);
    assert!(transcript[2].content().contains(API_KEY_ENV));
    assert_eq!(
        transcript[2].content(),
        ChatFailure::CredentialMissing.user_message()
    );
}

#[tokio::test]
async fn test_quota_error_explains_usage() {
    let provider = failing(|| LLMError::ApiError {
        status: 429,
        message: "Resource has been exhausted (e.g. check quota).".to_string(),
    });

    let mut session = open_session();
    session.update_pending_input("test");
    session.submit(&provider).await;

    let last = session.transcript().last().unwrap();
    assert_eq!(last.role(), MessageRole::Assistant);
    assert!(last.content().contains("API quota exceeded"));
    assert!(!session.request_in_flight());
}

#[tokio::test]
async fn test_unknown_error_includes_raw_text() {
    let provider = failing(|| LLMError::InvalidResponse("Missing content".to_string()));

    let mut session = open_session();
    session.update_pending_input("test");
    session.submit(&provider).await;

    let last = session.transcript().last().unwrap().content();
    assert!(last.starts_with("Sorry, I encountered an error."));
    assert!(last.contains("Missing content"));
    assert!(last.ends_with("Please try again."));
}

// =============================================================================
// Single Request In Flight
// =============================================================================

#[tokio::test]
async fn test_second_submit_while_pending_is_ignored() {
    let provider = replying("One answer.");
    let mut session = open_session();

    session.update_pending_input("first");
    let request = session.begin_submit().expect("first submit starts");

    session.update_pending_input("second");
    assert!(session.begin_submit().is_none());

    let outcome = provider
        .chat(request)
        .await
        .map(|r| r.content)
        .map_err(|e| ChatFailure::classify(&e));
    session.finish_submit(outcome);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], ChatMessage::user("first"));
    assert_eq!(transcript[2], ChatMessage::assistant("One answer."));
    // The blocked text stays in the field
    assert_eq!(session.pending_input(), "second");
}

#[tokio::test]
async fn test_blank_input_never_calls_provider() {
    let mut provider = crate::core::llm::provider::MockLLMProvider::new();
    provider.expect_chat().times(0);

    let mut session = open_session();
    for blank in ["", " ", "\t\n", "   \u{3000}"] {
        session.update_pending_input(blank);
        session.submit(&provider).await;
    }
    assert_eq!(session.transcript().len(), 1);
}

// =============================================================================
// Transcript Hook
// =============================================================================

#[tokio::test]
async fn test_hook_sees_each_append_in_order() {
    let seen: Arc<Mutex<Vec<MessageRole>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let provider = replying("Sure.");
    let mut session = open_session();
    session.set_transcript_hook(move |transcript| {
        if let Some(last) = transcript.last() {
            sink.lock().unwrap().push(last.role());
        }
    });

    session.update_pending_input("help");
    session.submit(&provider).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![MessageRole::User, MessageRole::Assistant]
    );
}

#[tokio::test]
async fn test_reply_after_hiding_panel_closes_session() {
    let provider = replying("Later.");
    let mut session = open_session();

    session.update_pending_input("ping");
    let request = session.begin_submit().unwrap();
    session.toggle_panel();
    assert_eq!(session.panel(), PanelState::Backgrounded);

    let content = provider.chat(request).await.unwrap().content;
    session.finish_submit(Ok(content));

    assert_eq!(session.panel(), PanelState::Closed);
    assert_eq!(session.transcript().len(), 3);
}
