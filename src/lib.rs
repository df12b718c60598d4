//! # rotunda
//!
//! Draft grant applications from two PDFs (a district profile and a grant
//! announcement) with a single LLM call.
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /upload (district_doc, grant_doc)
//!  │
//!  ├─ 1. Extract   page text via pdfium (spawn_blocking), pages joined by "\n"
//!  ├─ 2. Truncate  first 2000 characters of each document
//!  ├─ 3. Prompt    fixed six-section grant template
//!  ├─ 4. LLM       exactly one chat completion, no retries
//!  └─ 5. Render    newlines → <br>, wrapped in a styled <div>
//! ```
//!
//! Any failure along the way becomes a 500 response carrying the error text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rotunda::{serve, AppState, DraftConfig, DraftPipeline, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider API key is read from OPENAI_API_KEY
//!     let pipeline = DraftPipeline::new(DraftConfig::default());
//!     let state = AppState::new(pipeline);
//!     serve(&ServerConfig::default(), state, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `rotunda` binary (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod draft;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DraftConfig, DraftConfigBuilder, ServerConfig};
pub use draft::{DraftOutput, DraftPipeline, UploadPair};
pub use error::{DraftError, ErrorKind};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use pipeline::llm::{DraftCompletion, DraftModel, LlmDraftModel};
pub use server::{router, serve, AppState};
