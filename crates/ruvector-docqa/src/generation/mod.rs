//! Answer generation

pub mod generator;
pub mod ollama;
pub mod prompt;

pub use generator::{AnswerGenerator, LlmProvider, OllamaLlm};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
