//! Error types for the rotunda library.
//!
//! Every failure of a draft request is a [`DraftError`]. The variants fall
//! into three families that callers may want to tell apart in logs:
//!
//! * **missing field** — the upload did not carry both documents,
//! * **extraction** — a payload could not be read as a PDF,
//! * **external service** — the LLM call failed or returned nothing.
//!
//! [`DraftError::kind`] reports the family. The HTTP boundary does not
//! distinguish them: every error becomes a 500 carrying the `Display` text.

use thiserror::Error;

/// All errors returned by the draft pipeline.
#[derive(Debug, Error)]
pub enum DraftError {
    // ── Request errors ────────────────────────────────────────────────────
    /// A required upload field was not present in the request.
    #[error("Missing required upload field '{field}'")]
    MissingField { field: String },

    /// The multipart body itself could not be read.
    #[error("Failed to read upload: {reason}")]
    MalformedUpload { reason: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The payload does not start with the `%PDF` signature.
    #[error("'{document}' is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { document: String, magic: Vec<u8> },

    /// PDFium refused to load the document.
    #[error("PDF '{document}' could not be parsed: {detail}")]
    CorruptPdf { document: String, detail: String },

    /// Could not bind to a PDFium library.
    #[error(
        "PDF engine unavailable: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install libpdfium system-wide."
    )]
    PdfiumUnavailable(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API call failed.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// The provider answered but the completion was empty.
    #[error("LLM returned an empty draft (model '{model}')")]
    EmptyCompletion { model: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A local input file could not be read (CLI `draft` command).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Server errors ─────────────────────────────────────────────────────
    /// The HTTP listener could not be bound or stopped with an I/O error.
    #[error("Server error on {addr}: {source}")]
    ServerFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DraftError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    Extraction,
    ExternalService,
    Internal,
}

impl DraftError {
    /// The family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DraftError::MissingField { .. } | DraftError::MalformedUpload { .. } => {
                ErrorKind::MissingField
            }
            DraftError::NotAPdf { .. }
            | DraftError::CorruptPdf { .. }
            | DraftError::PdfiumUnavailable(_)
            | DraftError::ReadFailed { .. } => ErrorKind::Extraction,
            DraftError::ProviderNotConfigured { .. }
            | DraftError::LlmApiError { .. }
            | DraftError::EmptyCompletion { .. } => ErrorKind::ExternalService,
            DraftError::ServerFailed { .. }
            | DraftError::InvalidConfig(_)
            | DraftError::Internal(_) => ErrorKind::Internal,
        }
    }
}
