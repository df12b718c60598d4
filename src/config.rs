//! Configuration types for draft generation and the HTTP server.
//!
//! [`DraftConfig`] carries everything the pipeline needs to talk to the LLM
//! and shape the prompt. It is built once at startup and handed to
//! [`crate::draft::DraftPipeline`]; nothing is read from globals at request
//! time.

use crate::error::DraftError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default model identifier used for drafting.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default LLM provider name.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Number of characters kept from each extracted document.
pub const MAX_EXCERPT_CHARS: usize = 2000;

/// Configuration for draft generation.
///
/// Built via [`DraftConfig::builder()`] or using [`DraftConfig::default()`].
///
/// # Example
/// ```rust
/// use rotunda::DraftConfig;
///
/// let config = DraftConfig::builder()
///     .model("gpt-4.1-mini")
///     .max_tokens(1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gpt-4.1-mini");
/// ```
#[derive(Clone)]
pub struct DraftConfig {
    /// LLM provider name (e.g. "openai", "anthropic", "ollama"). Default: "openai".
    pub provider_name: String,

    /// LLM model identifier. Default: "gpt-3.5-turbo".
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Custom system message. If None, uses [`crate::prompts::SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Sampling temperature. None leaves the provider default in place.
    pub temperature: Option<f32>,

    /// Maximum completion tokens. None leaves the provider default in place.
    ///
    /// The prompt already asks for fewer than 500 words, so a cap is only
    /// needed when cost must be bounded hard.
    pub max_tokens: Option<usize>,

    /// Characters kept from each document before prompt assembly. Default: 2000.
    ///
    /// Truncation counts characters, not tokens, and may cut mid-word.
    /// Content past the limit (later pages, budget tables) is never seen by
    /// the model.
    pub max_excerpt_chars: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            provider_name: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
            max_excerpt_chars: MAX_EXCERPT_CHARS,
        }
    }
}

impl fmt::Debug for DraftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftConfig")
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("system_prompt", &self.system_prompt.as_ref().map(|s| s.len()))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_excerpt_chars", &self.max_excerpt_chars)
            .finish()
    }
}

impl DraftConfig {
    /// Create a new builder for `DraftConfig`.
    pub fn builder() -> DraftConfigBuilder {
        DraftConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DraftConfig`].
#[derive(Debug)]
pub struct DraftConfigBuilder {
    config: DraftConfig,
}

impl DraftConfigBuilder {
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn max_excerpt_chars(mut self, n: usize) -> Self {
        self.config.max_excerpt_chars = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DraftConfig, DraftError> {
        let c = &self.config;
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(DraftError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(DraftError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_excerpt_chars == 0 {
            return Err(DraftError::InvalidConfig(
                "Excerpt length must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(DraftError::InvalidConfig("Max tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host. Default: "0.0.0.0".
    pub host: String,
    /// Bind port. Default: 8080.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` string handed to the listener; host names are resolved at bind time.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
