use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{LlmError, Result};
use crate::openai::{OpenAISettings, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::parser::{PostDraft, PostParser};
use crate::prompt::{ChatPromptTemplate, PostPrompt};
use crate::{LLMClient, LLMClientConfig, LLMProvider};

/// Endpoint settings shared by every request. The API key is supplied per call.
#[derive(Debug, Clone)]
pub struct WriterSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: LLMClientConfig::default().timeout,
        }
    }
}

pub struct PostWriter {
    settings: WriterSettings,
    template: ChatPromptTemplate,
    parser: PostParser,
}

impl PostWriter {
    pub fn new(settings: WriterSettings) -> Result<Self> {
        Ok(Self {
            settings,
            template: PostPrompt::template(),
            parser: PostParser::new()?,
        })
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    pub fn parser(&self) -> &PostParser {
        &self.parser
    }

    /// Writes one post about `theme`, authenticating with `api_key`.
    pub async fn generate(&self, theme: &str, api_key: &str) -> Result<PostDraft> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let provider = LLMProvider::OpenAI(OpenAISettings {
            api_key: api_key.trim().to_string(),
            base_url: self.settings.base_url.clone(),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
        });
        let client = LLMClient::new(
            provider,
            Some(LLMClientConfig {
                timeout: self.settings.timeout,
            }),
        );

        self.generate_with_client(&client, theme).await
    }

    pub async fn generate_with_client(&self, client: &LLMClient, theme: &str) -> Result<PostDraft> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(LlmError::EmptyTheme);
        }

        let mut variables = HashMap::new();
        variables.insert(PostPrompt::PARSER_INSTRUCTIONS, self.parser.format_instructions());
        variables.insert(PostPrompt::THEME, theme.to_string());
        let messages = self.template.format_messages(&variables)?;

        tracing::info!(
            model = %self.settings.model,
            theme_chars = theme.chars().count(),
            "requesting post draft"
        );
        let started = Instant::now();
        let output = client.execute_chat(&messages).await?;
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "model replied");

        let draft = self.parser.parse(&output)?;
        tracing::info!(
            content_chars = draft.content.chars().count(),
            "post draft parsed"
        );

        Ok(draft)
    }
}
