use crate::core::assistant::ChatFailure;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for the "thinking" animation.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// The outstanding generation call finished, one way or the other.
    GenerationFinished(Result<String, ChatFailure>),
    /// A message was appended to the transcript.
    TranscriptChanged,
}

/// High-level actions resolved from global keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePanel,
    ClosePanel,
    ShowHelp,
    CloseHelp,
    Quit,
}
