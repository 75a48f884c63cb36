//! Settings for reaching the chat-completion service.
//!
//! Values come from command-line flags first, then the process environment
//! (which `main` seeds from `.env`), then defaults.

use crate::error::{EnrichError, Result};
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Explicit overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LlmOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl LlmSettings {
    pub fn from_env(overrides: LlmOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Fails with `MissingCredential` when no non-empty API key is found.
    pub fn resolve<F>(overrides: LlmOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: String| {
            let v = v.trim().to_string();
            (!v.is_empty()).then_some(v)
        };

        let api_key = overrides
            .api_key
            .and_then(non_empty)
            .or_else(|| lookup(API_KEY_VAR).and_then(non_empty))
            .ok_or(EnrichError::MissingCredential)?;

        let model = overrides
            .model
            .and_then(non_empty)
            .or_else(|| lookup(MODEL_VAR).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup(BASE_URL_VAR)
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = overrides.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(EnrichError::Config("timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
