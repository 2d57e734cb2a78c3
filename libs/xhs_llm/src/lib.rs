use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

pub mod error;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod writer;

pub use error::{LlmError, Result};
pub use openai::{OpenAIService, OpenAISettings};
pub use parser::{PostDraft, PostParser, TITLE_COUNT};
pub use prompt::{ChatMessage, ChatPromptTemplate, ChatRole, PostPrompt};
pub use writer::{PostWriter, WriterSettings};

#[derive(Debug, Clone)]
pub enum LLMProvider {
    OpenAI(OpenAISettings),
}

#[async_trait]
pub trait LLMService: Send + Sync {
    /// Sends the conversation and returns the text of the first reply.
    async fn execute_chat(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct LLMClientConfig {
    pub timeout: Duration,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
        }
    }
}

pub struct LLMClient {
    service: Box<dyn LLMService>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(provider: LLMProvider, config: Option<LLMClientConfig>) -> Self {
        let service: Box<dyn LLMService> = match provider {
            LLMProvider::OpenAI(settings) => Box::new(OpenAIService::new(settings)),
        };

        Self::with_service(service, config.unwrap_or_default())
    }

    pub fn with_service(service: Box<dyn LLMService>, config: LLMClientConfig) -> Self {
        Self { service, config }
    }

    /// One attempt, bounded by the configured timeout. Failures are returned as-is.
    pub async fn execute_chat(&self, messages: &[ChatMessage]) -> Result<String> {
        match timeout(self.config.timeout, self.service.execute_chat(messages)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("chat completion timed out after {:?}", self.config.timeout);
                Err(LlmError::Timeout(self.config.timeout))
            }
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }
}
