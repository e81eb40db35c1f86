//! Concrete `LLMProvider` implementations.

mod google;

pub use google::{GoogleProvider, DEFAULT_BASE_URL, DEFAULT_MODEL, PLACEHOLDER_API_KEY};
