/// Resume Assistant - floating AI chat panel (TUI Edition)
///
/// Core library providing the chat session state machine, the Gemini
/// generation client, and the terminal presentation of the panel.

pub mod config;
pub mod core;
pub mod tui;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
