//! LLM interaction: send the drafting prompt to the provider, once.
//!
//! Prompt wording lives in [`crate::prompts`]; this module builds the
//! two-message chat request and maps provider failures into [`DraftError`].
//!
//! There is no retry loop. A failed call surfaces immediately.

use crate::config::DraftConfig;
use crate::error::DraftError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Text and token usage of a single completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftCompletion {
    pub text: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

/// A text-generation backend that turns a prompt into a draft.
#[async_trait]
pub trait DraftModel: Send + Sync {
    /// Model identifier reported in [`crate::draft::DraftOutput`].
    fn model_name(&self) -> &str;

    /// Issue exactly one completion call.
    async fn complete(&self, system: &str, prompt: &str) -> Result<DraftCompletion, DraftError>;
}

/// [`DraftModel`] backed by an `edgequake-llm` provider.
pub struct LlmDraftModel {
    provider: Result<Arc<dyn LLMProvider>, ProviderUnavailable>,
    model: String,
    options: CompletionOptions,
}

/// Why the provider could not be created; replayed on every request.
#[derive(Debug, Clone)]
struct ProviderUnavailable {
    provider: String,
    hint: String,
}

impl LlmDraftModel {
    /// Resolve the provider described by `config`.
    ///
    /// A pre-built provider wins; otherwise the named provider is created
    /// through [`ProviderFactory`], which reads its API key from the
    /// environment. If that fails the model is still returned and every
    /// call reports [`DraftError::ProviderNotConfigured`], so a missing key
    /// fails requests rather than startup.
    pub fn from_config(config: &DraftConfig) -> Self {
        let provider = match config.provider {
            Some(ref provider) => Ok(Arc::clone(provider)),
            None => ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
                .map_err(|e| {
                    warn!(
                        "LLM provider '{}' unavailable: {}",
                        config.provider_name, e
                    );
                    ProviderUnavailable {
                        provider: config.provider_name.clone(),
                        hint: format!("{e}"),
                    }
                }),
        };

        Self {
            provider,
            model: config.model.clone(),
            options: build_options(config),
        }
    }

    /// Whether the provider was created successfully.
    pub fn is_configured(&self) -> bool {
        self.provider.is_ok()
    }
}

#[async_trait]
impl DraftModel for LlmDraftModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<DraftCompletion, DraftError> {
        let provider = self.provider.as_ref().map_err(|e| DraftError::ProviderNotConfigured {
            provider: e.provider.clone(),
            hint: e.hint.clone(),
        })?;

        let messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];

        let start = Instant::now();
        let response = provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| DraftError::LlmApiError {
                message: format!("{}", e),
            })?;

        debug!(
            "Draft: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        if response.content.trim().is_empty() {
            return Err(DraftError::EmptyCompletion {
                model: self.model.clone(),
            });
        }

        Ok(DraftCompletion {
            text: response.content,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
        })
    }
}

/// Build `CompletionOptions` from the draft config.
fn build_options(config: &DraftConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults_leave_provider_in_charge() {
        let opts = build_options(&DraftConfig::default());
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_passes_overrides() {
        let config = DraftConfig::builder()
            .temperature(0.4)
            .max_tokens(900)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.4));
        assert_eq!(opts.max_tokens, Some(900));
    }

    #[tokio::test]
    async fn unavailable_provider_fails_at_call_time() {
        let model = LlmDraftModel {
            provider: Err(ProviderUnavailable {
                provider: "openai".into(),
                hint: "OPENAI_API_KEY not set".into(),
            }),
            model: "gpt-3.5-turbo".into(),
            options: build_options(&DraftConfig::default()),
        };
        assert!(!model.is_configured());
        assert_eq!(model.model_name(), "gpt-3.5-turbo");

        let err = model.complete("sys", "prompt").await.unwrap_err();
        match err {
            DraftError::ProviderNotConfigured { provider, hint } => {
                assert_eq!(provider, "openai");
                assert!(hint.contains("OPENAI_API_KEY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
