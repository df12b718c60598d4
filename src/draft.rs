//! The draft request pipeline: two PDFs in, one draft out.
//!
//! [`DraftPipeline::generate_draft`] is the only entry point with side
//! effects. It extracts both documents first and only then calls the model,
//! so a bad upload never costs an LLM call.

use crate::config::DraftConfig;
use crate::error::DraftError;
use crate::pipeline::extract::{truncate_chars, PdfiumExtractor, TextExtractor};
use crate::pipeline::llm::{DraftModel, LlmDraftModel};
use crate::prompts::{build_grant_prompt, SYSTEM_PROMPT};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Upload field carrying the district document.
pub const DISTRICT_FIELD: &str = "district_doc";

/// Upload field carrying the grant document.
pub const GRANT_FIELD: &str = "grant_doc";

/// The two documents of one draft request.
#[derive(Debug, Clone)]
pub struct UploadPair {
    pub district_doc: Bytes,
    pub grant_doc: Bytes,
}

impl UploadPair {
    pub fn new(district_doc: impl Into<Bytes>, grant_doc: impl Into<Bytes>) -> Self {
        Self {
            district_doc: district_doc.into(),
            grant_doc: grant_doc.into(),
        }
    }

    /// Build a pair from optional parts, naming the first missing field.
    pub fn from_parts(
        district_doc: Option<Bytes>,
        grant_doc: Option<Bytes>,
    ) -> Result<Self, DraftError> {
        let district_doc = district_doc.ok_or_else(|| DraftError::MissingField {
            field: DISTRICT_FIELD.to_string(),
        })?;
        let grant_doc = grant_doc.ok_or_else(|| DraftError::MissingField {
            field: GRANT_FIELD.to_string(),
        })?;
        Ok(Self {
            district_doc,
            grant_doc,
        })
    }

    /// Read both documents from disk.
    pub async fn from_paths(
        district_path: impl AsRef<Path>,
        grant_path: impl AsRef<Path>,
    ) -> Result<Self, DraftError> {
        let district_doc = read_file(district_path.as_ref()).await?;
        let grant_doc = read_file(grant_path.as_ref()).await?;
        Ok(Self::new(district_doc, grant_doc))
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, DraftError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| DraftError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Result of a successful draft request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOutput {
    /// Draft text exactly as returned by the model.
    pub draft: String,
    /// Model identifier the request was sent to.
    pub model: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    /// Characters (not bytes) of the draft text.
    pub draft_chars: usize,
    /// Characters of each excerpt that reached the prompt.
    pub district_chars: usize,
    pub grant_chars: usize,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
}

/// Owns the collaborators and configuration for draft generation.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct DraftPipeline {
    config: DraftConfig,
    extractor: Arc<dyn TextExtractor>,
    model: Arc<dyn DraftModel>,
}

impl DraftPipeline {
    /// Pipeline with pdfium extraction and an `edgequake-llm` provider.
    pub fn new(config: DraftConfig) -> Self {
        let model = Arc::new(LlmDraftModel::from_config(&config));
        Self {
            config,
            extractor: Arc::new(PdfiumExtractor),
            model,
        }
    }

    /// Pipeline with explicit collaborators.
    pub fn with_parts(
        config: DraftConfig,
        extractor: Arc<dyn TextExtractor>,
        model: Arc<dyn DraftModel>,
    ) -> Self {
        Self {
            config,
            extractor,
            model,
        }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// Generate a draft from two uploaded PDFs.
    ///
    /// # Errors
    /// - extraction failures for either document (no LLM call is made)
    /// - provider or API failures from the single LLM call
    pub async fn generate_draft(&self, upload: UploadPair) -> Result<DraftOutput, DraftError> {
        let extract_start = Instant::now();
        let district_text = self
            .extractor
            .extract(DISTRICT_FIELD, upload.district_doc)
            .await?;
        let grant_text = self.extractor.extract(GRANT_FIELD, upload.grant_doc).await?;
        let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

        let limit = self.config.max_excerpt_chars;
        let district_excerpt = truncate_chars(&district_text, limit);
        let grant_excerpt = truncate_chars(&grant_text, limit);
        debug!(
            "Excerpts: district {} chars, grant {} chars",
            district_excerpt.chars().count(),
            grant_excerpt.chars().count()
        );

        let prompt = build_grant_prompt(district_excerpt, grant_excerpt);
        let system = self.config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);

        let llm_start = Instant::now();
        let completion = self.model.complete(system, &prompt).await?;
        let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

        let draft_chars = completion.text.chars().count();
        info!(
            "Draft generated: {} chars, {}ms",
            draft_chars,
            extract_duration_ms + llm_duration_ms
        );

        Ok(DraftOutput {
            draft: completion.text,
            draft_chars,
            model: self.model.model_name().to_string(),
            prompt_tokens: completion.prompt_tokens,
            completion_tokens: completion.completion_tokens,
            district_chars: district_excerpt.chars().count(),
            grant_chars: grant_excerpt.chars().count(),
            extract_duration_ms,
            llm_duration_ms,
        })
    }
}
