//! Property-based tests for the chat session submit lifecycle
//!
//! Tests invariants:
//! - Whitespace-only input leaves transcript, input and guard untouched
//! - Accepted input appends the trimmed user entry, then the reply
//! - Each failure kind appends exactly one assistant entry with its text
//! - The in-flight guard is released after every outcome
//! - Arbitrary toggle/type/submit/land sequences keep user and assistant
//!   turns paired

use proptest::prelude::*;

use crate::config::API_KEY_ENV;
use crate::core::assistant::{ChatFailure, ChatSession, PanelState, RequestPhase};
use crate::core::llm::provider::MockLLMProvider;
use crate::core::llm::{ChatMessage, LLMError, MessageRole};
use crate::tests::common::{open_session, response};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Strings made only of whitespace, including non-ASCII spaces
fn arb_whitespace() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![' ', '\t', '\n', '\r', '\u{a0}', '\u{2003}', '\u{3000}']),
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Text with at least one visible char, possibly padded with whitespace
fn arb_user_text() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-zA-Z0-9éü日本語][a-zA-Z0-9éü日本語 ,.?!'-]{0,60}[ \t]{0,3}"
}

fn arb_reply() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!]{1,80}"
}

/// A provider failure and the kind it must map to
#[derive(Debug, Clone)]
enum FailureCase {
    Missing,
    InvalidKey(String),
    Quota(String),
    Unknown(String),
}

impl FailureCase {
    fn error(&self) -> LLMError {
        match self {
            FailureCase::Missing => LLMError::NotConfigured(API_KEY_ENV.to_string()),
            FailureCase::InvalidKey(noise) => LLMError::ApiError {
                status: 400,
                message: format!("{noise} API_KEY_INVALID {noise}"),
            },
            FailureCase::Quota(noise) => LLMError::ApiError {
                status: 429,
                message: format!("{noise} quota {noise}"),
            },
            FailureCase::Unknown(noise) => LLMError::ApiError {
                status: 500,
                message: noise.clone(),
            },
        }
    }

    fn expected(&self) -> ChatFailure {
        match self {
            FailureCase::Missing => ChatFailure::CredentialMissing,
            FailureCase::InvalidKey(_) => ChatFailure::CredentialInvalid,
            FailureCase::Quota(_) => ChatFailure::QuotaExceeded,
            FailureCase::Unknown(noise) => ChatFailure::Unknown(format!("API error: 500 - {noise}")),
        }
    }
}

fn arb_failure() -> impl Strategy<Value = FailureCase> {
    prop_oneof![
        Just(FailureCase::Missing),
        "[a-z ]{0,20}".prop_map(FailureCase::InvalidKey),
        "[a-z ]{0,20}".prop_map(FailureCase::Quota),
        // Digits and punctuation only, so no marker can appear by chance
        "[0-9 :;]{0,30}".prop_map(FailureCase::Unknown),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Toggle,
    Type(String),
    Submit,
    Land(bool),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Toggle),
        prop_oneof![arb_whitespace(), arb_user_text()].prop_map(Op::Type),
        Just(Op::Submit),
        any::<bool>().prop_map(Op::Land),
    ]
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime builds")
        .block_on(future)
}

fn idle(session: &ChatSession) -> bool {
    session.panel() == PanelState::Open(RequestPhase::Idle)
}

// ============================================================================
// Submit lifecycle properties
// ============================================================================

proptest! {
    #[test]
    fn prop_whitespace_input_changes_nothing(input in arb_whitespace()) {
        let mut provider = MockLLMProvider::new();
        provider.expect_chat().times(0);

        let mut session = open_session();
        session.update_pending_input(input.clone());
        block_on(session.submit(&provider));

        prop_assert_eq!(session.transcript().len(), 1);
        prop_assert_eq!(session.pending_input(), input.as_str());
        prop_assert!(!session.request_in_flight());
        prop_assert!(idle(&session));
    }

    #[test]
    fn prop_success_appends_user_then_reply(
        input in arb_user_text(),
        reply in arb_reply(),
    ) {
        let trimmed = input.trim().to_string();
        let expected_in_prompt = format!("\"{trimmed}\"");
        let canned = reply.clone();

        let mut provider = MockLLMProvider::new();
        provider
            .expect_chat()
            .withf(move |request| request.messages[0].content().contains(&expected_in_prompt))
            .times(1)
            .returning(move |_| Ok(response(&canned)));

        let mut session = open_session();
        session.update_pending_input(input);
        block_on(session.submit(&provider));

        let transcript = session.transcript();
        prop_assert_eq!(transcript.len(), 3);
        prop_assert_eq!(&transcript[1], &ChatMessage::user(trimmed));
        prop_assert_eq!(&transcript[2], &ChatMessage::assistant(reply));
        prop_assert!(session.pending_input().is_empty());
        prop_assert!(!session.request_in_flight());
        prop_assert!(idle(&session));
    }

    #[test]
    fn prop_failure_appends_one_assistant_entry(
        input in arb_user_text(),
        case in arb_failure(),
    ) {
        let expected = case.expected();
        let mut provider = MockLLMProvider::new();
        provider
            .expect_chat()
            .times(1)
            .returning(move |_| Err(case.error()));

        let mut session = open_session();
        session.update_pending_input(input.clone());
        block_on(session.submit(&provider));

        let transcript = session.transcript();
        prop_assert_eq!(transcript.len(), 3);
        prop_assert_eq!(&transcript[1], &ChatMessage::user(input.trim()));
        prop_assert_eq!(transcript[2].role(), MessageRole::Assistant);
        let expected_message = expected.user_message();
        prop_assert_eq!(transcript[2].content(), expected_message.as_str());
        prop_assert!(!session.request_in_flight());
        prop_assert!(idle(&session));
    }

    #[test]
    fn prop_operation_sequences_keep_turns_paired(
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut session = open_session();
        let mut users = 0usize;
        let mut replies = 0usize;

        for op in ops {
            match op {
                Op::Toggle => session.toggle_panel(),
                Op::Type(text) => session.update_pending_input(text),
                Op::Submit => {
                    let could = session.can_submit();
                    let was_idle = idle(&session);
                    let started = session.begin_submit().is_some();
                    prop_assert_eq!(started, could);
                    if started {
                        prop_assert!(was_idle);
                        users += 1;
                    }
                }
                Op::Land(ok) => {
                    let in_flight = session.request_in_flight();
                    let outcome = if ok {
                        Ok("reply".to_string())
                    } else {
                        Err(ChatFailure::QuotaExceeded)
                    };
                    let landed = session.finish_submit(outcome);
                    prop_assert_eq!(landed, in_flight);
                    if landed {
                        replies += 1;
                    }
                }
            }

            prop_assert_eq!(session.transcript().len(), 1 + users + replies);
            prop_assert!(users == replies || users == replies + 1);
            prop_assert_eq!(session.request_in_flight(), users > replies);
        }
    }
}
