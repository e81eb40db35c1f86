//! Chat session: transcript, pending input, and the panel/request state
//! machine.
//!
//! ```text
//! Closed ──toggle──▶ Open(Idle) ──submit──▶ Open(Sending)
//!   ▲                   │  ▲                    │    ▲
//!   └──────toggle───────┘  └──────outcome───────┘    │ toggle
//!   ▲                                                ▼
//!   └──────────────outcome─────────────────── Backgrounded
//! ```
//!
//! A send can only start from `Open(Idle)`. Hiding the panel while a reply
//! is outstanding parks the session in `Backgrounded`; the call is never
//! cancelled and its outcome is still appended.

use crate::config::AssistantConfig;
use crate::core::llm::{ChatMessage, ChatRequest, LLMProvider};

use super::failure::ChatFailure;
use super::prompt::PromptTemplate;

/// Whether a reply is outstanding while the panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Sending,
}

/// Visibility and request lifecycle in one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open(RequestPhase),
    /// Hidden while a reply is still outstanding.
    Backgrounded,
}

impl PanelState {
    pub fn is_open(self) -> bool {
        matches!(self, PanelState::Open(_))
    }

    pub fn request_in_flight(self) -> bool {
        matches!(
            self,
            PanelState::Open(RequestPhase::Sending) | PanelState::Backgrounded
        )
    }

    fn toggled(self) -> Self {
        match self {
            PanelState::Closed => PanelState::Open(RequestPhase::Idle),
            PanelState::Open(RequestPhase::Idle) => PanelState::Closed,
            PanelState::Open(RequestPhase::Sending) => PanelState::Backgrounded,
            PanelState::Backgrounded => PanelState::Open(RequestPhase::Sending),
        }
    }

    /// State after the outstanding reply lands. `None` if nothing was
    /// outstanding.
    fn settled(self) -> Option<Self> {
        match self {
            PanelState::Open(RequestPhase::Sending) => Some(PanelState::Open(RequestPhase::Idle)),
            PanelState::Backgrounded => Some(PanelState::Closed),
            PanelState::Closed | PanelState::Open(RequestPhase::Idle) => None,
        }
    }
}

/// Called after every transcript append with the full transcript.
pub type TranscriptHook = Box<dyn FnMut(&[ChatMessage]) + Send>;

pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    pending_input: String,
    panel: PanelState,
    template: PromptTemplate,
    on_transcript_change: Option<TranscriptHook>,
}

impl ChatSession {
    pub fn new(config: &AssistantConfig) -> Self {
        Self::with_template(PromptTemplate::from_config(config), config.welcome.clone())
    }

    pub fn with_template(template: PromptTemplate, welcome: impl Into<String>) -> Self {
        Self {
            transcript: vec![ChatMessage::assistant(welcome)],
            pending_input: String::new(),
            panel: PanelState::Closed,
            template,
            on_transcript_change: None,
        }
    }

    /// Install the post-append hook, replacing any previous one.
    pub fn set_transcript_hook(&mut self, hook: impl FnMut(&[ChatMessage]) + Send + 'static) {
        self.on_transcript_change = Some(Box::new(hook));
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn request_in_flight(&self) -> bool {
        self.panel.request_in_flight()
    }

    pub fn toggle_panel(&mut self) {
        self.panel = self.panel.toggled();
    }

    /// Hide the panel if it is showing.
    pub fn close_panel(&mut self) {
        if self.panel.is_open() {
            self.toggle_panel();
        }
    }

    pub fn update_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// True when `submit` would send something.
    pub fn can_submit(&self) -> bool {
        self.panel == PanelState::Open(RequestPhase::Idle) && !self.pending_input.trim().is_empty()
    }

    /// First half of a submission: record the user turn, clear the input,
    /// enter `Sending`, and hand back the request to run. Returns `None`
    /// (touching nothing) when the input is blank, a reply is outstanding,
    /// or the panel is hidden.
    pub fn begin_submit(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }

        let text = self.pending_input.trim().to_string();
        self.append(ChatMessage::user(text.clone()));
        self.pending_input.clear();
        self.panel = PanelState::Open(RequestPhase::Sending);

        let prompt = self.template.render(&text);
        log::debug!("Submitting prompt ({} chars)", prompt.len());
        Some(ChatRequest::prompt(prompt))
    }

    /// Second half: append the reply or the mapped failure text and leave
    /// the in-flight state. Returns false if nothing was in flight and the
    /// outcome was dropped.
    pub fn finish_submit(&mut self, outcome: Result<String, ChatFailure>) -> bool {
        let Some(next) = self.panel.settled() else {
            log::warn!("Dropping generation outcome with no request in flight");
            return false;
        };

        let reply = match outcome {
            Ok(text) => text,
            Err(failure) => {
                log::warn!("Generation failed ({}): {failure}", failure.kind());
                failure.user_message()
            }
        };
        self.append(ChatMessage::assistant(reply));
        self.panel = next;
        true
    }

    /// Full submission: begin, await exactly one provider call, finish.
    /// A no-op under the same conditions as [`Self::begin_submit`].
    pub async fn submit(&mut self, provider: &dyn LLMProvider) {
        let Some(request) = self.begin_submit() else {
            return;
        };

        let outcome = provider
            .chat(request)
            .await
            .map(|response| response.content)
            .map_err(|e| ChatFailure::classify(&e));

        self.finish_submit(outcome);
    }

    fn append(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        if let Some(hook) = self.on_transcript_change.as_mut() {
            hook(&self.transcript);
        }
    }
}
