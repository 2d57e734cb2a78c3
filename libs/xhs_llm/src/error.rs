use std::time::Duration;

use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("theme is empty")]
    EmptyTheme,

    #[error("prompt variable `{0}` has no value")]
    MissingVariable(String),

    #[error("output schema failed to compile: {0}")]
    InvalidSchema(String),

    #[error("malformed prompt template: {0}")]
    Template(String),

    #[error("chat completion request failed: {0}")]
    Request(#[from] OpenAIError),

    #[error("chat completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned no content")]
    EmptyResponse,

    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model output does not match the schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("failed to read model output: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl LlmError {
    /// True for errors caused by the caller's input rather than the model or the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, LlmError::MissingApiKey | LlmError::EmptyTheme)
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
