//! Answer generation over retrieved context

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::error::Result;

use super::ollama::OllamaClient;
use super::prompt::PromptBuilder;

/// Trait for text-generation backends
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (phi3, llama3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete `prompt` within the given output bounds
    async fn generate(&self, prompt: &str, options: &GenerationConfig) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Ollama LLM provider
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
}

impl OllamaLlm {
    /// Create from an existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str, options: &GenerationConfig) -> Result<String> {
        self.client.generate(prompt, options).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.generate_model()
    }
}

/// Builds the QA prompt and runs it through an [`LlmProvider`]
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
    options: GenerationConfig,
}

impl AnswerGenerator {
    /// Create a generator over `llm`
    pub fn new(llm: Arc<dyn LlmProvider>, options: GenerationConfig) -> Self {
        Self { llm, options }
    }

    /// Underlying provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Answer `question` from `context` (best chunk first). An empty
    /// context is valid and still produces an answer.
    pub async fn generate_answer(&self, question: &str, context: &[String]) -> Result<String> {
        let prompt = PromptBuilder::build_qa_prompt(question, context);

        tracing::info!(
            "Generating answer with {} ({} context chunk(s))",
            self.llm.model(),
            context.len()
        );

        let answer = self.llm.generate(&prompt, &self.options).await?;
        Ok(answer.trim().to_string())
    }
}
