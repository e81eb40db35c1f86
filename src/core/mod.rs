pub mod assistant;
pub mod llm;
pub mod logging;
