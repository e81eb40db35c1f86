//! Chat session core: transcript, panel/request state machine, prompt
//! framing, and the mapping from generation failures to reply text.

pub mod failure;
pub mod prompt;
pub mod session;

pub use failure::ChatFailure;
pub use prompt::PromptTemplate;
pub use session::{ChatSession, PanelState, RequestPhase};
