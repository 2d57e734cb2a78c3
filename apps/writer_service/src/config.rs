use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use xhs_llm::{openai, WriterSettings};

use crate::error::AppError;

pub const DEFAULT_API_KEY_HELP_URL: &str = "https://openai-hk.com/c/0/b/key";

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub writer: WriterSettings,
    pub api_key_help_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            host: "0.0.0.0".to_string(),
            port: 8000,
            writer: WriterSettings::default(),
            api_key_help_url: DEFAULT_API_KEY_HELP_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match get("APP_ENVIRONMENT").as_deref() {
            None | Some("dev") => Environment::Dev,
            Some(_) => Environment::Prod,
        };

        let timeout_secs: u64 = parse_or(&get, "LLM_TIMEOUT_SECS", defaults.writer.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "LLM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            environment,
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            writer: WriterSettings {
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
                temperature: parse_or(&get, "OPENAI_TEMPERATURE", openai::DEFAULT_TEMPERATURE)?,
                timeout: Duration::from_secs(timeout_secs),
            },
            api_key_help_url: get("API_KEY_HELP_URL").unwrap_or(defaults.api_key_help_url),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address {}:{}: {}", self.host, self.port, e)))
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} has invalid value {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
