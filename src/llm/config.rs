//! Configuration for the LLM provider

use crate::config::{env_parse, ConfigError};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API credential. Absent means every completion fails with an auth error.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL replacing the public Gemini endpoint (e.g. a local proxy)
    pub gateway: Option<String>,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            gateway: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs = env_parse::<u64>(&lookup, "DATACHAT_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key: lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")),
            model: lookup("DATACHAT_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gateway: lookup("LLM_GATEWAY").filter(|g| !g.trim().is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
