//! Text extraction: turn an uploaded PDF payload into plain text via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which does CPU-bound work
//! behind a global lock. Running it on `spawn_blocking` keeps the Tokio
//! worker threads free to serve other requests while a large PDF is parsed.
//!
//! ## Binding once
//!
//! pdfium keeps global state and can only be bound once per process. The
//! binding is created lazily on the first real extraction and cached in a
//! `OnceLock`, so a server started without the library still boots and only
//! fails the requests that need it. Sharing it across blocking tasks needs
//! the `sync` feature of `pdfium-render`, which serialises every call into
//! the library.

use crate::error::DraftError;
use async_trait::async_trait;
use bytes::Bytes;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Magic bytes every PDF starts with.
const PDF_MAGIC: &[u8; 4] = b"%PDF";

static PDFIUM: OnceLock<Result<Pdfium, String>> = OnceLock::new();

/// Source of plain text for an uploaded document.
///
/// `document` is the upload field name, used only in error messages.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &str, bytes: Bytes) -> Result<String, DraftError>;
}

/// [`TextExtractor`] backed by pdfium.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumExtractor;

#[async_trait]
impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, document: &str, bytes: Bytes) -> Result<String, DraftError> {
        check_magic(document, &bytes)?;

        let name = document.to_string();
        tokio::task::spawn_blocking(move || extract_text_blocking(&name, &bytes))
            .await
            .map_err(|e| DraftError::Internal(format!("Extraction task panicked: {}", e)))?
    }
}

/// Reject payloads that do not carry the PDF signature before touching pdfium.
pub fn check_magic(document: &str, bytes: &[u8]) -> Result<(), DraftError> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(DraftError::NotAPdf {
            document: document.to_string(),
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        });
    }
    Ok(())
}

/// Keep the first `max_chars` characters of `text`.
///
/// Counts `char`s, so multi-byte text is never split inside a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(document: &str, bytes: &[u8]) -> Result<String, DraftError> {
    let pdfium = pdfium()?;

    let pdf = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| DraftError::CorruptPdf {
            document: document.to_string(),
            detail: format!("{:?}", e),
        })?;

    let mut pages_text = Vec::new();
    for (idx, page) in pdf.pages().iter().enumerate() {
        let text = page.text().map_err(|e| DraftError::CorruptPdf {
            document: document.to_string(),
            detail: format!("page {}: {:?}", idx + 1, e),
        })?;
        pages_text.push(text.all());
    }

    let page_count = pages_text.len();
    let text = join_pages(pages_text);
    debug!(
        "{}: extracted {} chars from {} pages",
        document,
        text.chars().count(),
        page_count
    );
    Ok(text)
}

/// Concatenate page texts in document order, one `\n` between pages.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::new();
    for (idx, page) in pages.into_iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&page);
    }
    out
}

/// Bind pdfium on first use.
///
/// `PDFIUM_LIB_PATH` points at an explicit library file; otherwise the
/// system library search path is used.
fn pdfium() -> Result<&'static Pdfium, DraftError> {
    PDFIUM
        .get_or_init(|| {
            let bindings = match std::env::var("PDFIUM_LIB_PATH") {
                Ok(path) if !path.is_empty() => {
                    let path = PathBuf::from(path);
                    info!("Binding pdfium from {}", path.display());
                    Pdfium::bind_to_library(&path)
                        .map_err(|e| format!("{}: {}", path.display(), e))
                }
                _ => {
                    info!("Binding system pdfium library");
                    Pdfium::bind_to_system_library().map_err(|e| e.to_string())
                }
            };
            bindings.map(Pdfium::new)
        })
        .as_ref()
        .map_err(|e| DraftError::PdfiumUnavailable(e.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_accepts_pdf_header() {
        assert!(check_magic("district_doc", b"%PDF-1.7\n%\xe2\xe3").is_ok());
    }

    #[test]
    fn magic_rejects_other_bytes() {
        let err = check_magic("grant_doc", b"PK\x03\x04rest").unwrap_err();
        match err {
            DraftError::NotAPdf { document, magic } => {
                assert_eq!(document, "grant_doc");
                assert_eq!(magic, b"PK\x03\x04".to_vec());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn magic_rejects_short_payload() {
        assert!(check_magic("grant_doc", b"%P").is_err());
        assert!(check_magic("grant_doc", b"").is_err());
    }

    #[test]
    fn truncate_keeps_exact_char_count() {
        let text = "x".repeat(2500);
        assert_eq!(truncate_chars(&text, 2000).chars().count(), 2000);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", 2000), "short");
        assert_eq!(truncate_chars("", 2000), "");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        let cut = truncate_chars(&text, 3);
        assert_eq!(cut, "ééé");
        assert_eq!(cut.len(), 6);
    }

    #[test]
    fn truncate_may_split_words() {
        assert_eq!(truncate_chars("budget overview", 4), "budg");
    }

    #[test]
    fn binding_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pdfium>();
        assert_send_sync::<PdfiumExtractor>();
    }

    #[test]
    fn join_pages_keeps_document_order() {
        let pages = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        assert_eq!(join_pages(pages), "first\nsecond\nthird");
    }

    #[test]
    fn join_single_page_adds_no_separator() {
        assert_eq!(join_pages(vec!["only page".to_string()]), "only page");
    }

    #[test]
    fn join_zero_pages_is_empty() {
        assert_eq!(join_pages(Vec::new()), "");
    }

    #[test]
    fn join_keeps_blank_pages() {
        let pages = vec!["a".to_string(), String::new(), "c".to_string()];
        assert_eq!(join_pages(pages), "a\n\nc");
    }

    #[tokio::test]
    async fn pdfium_extractor_rejects_non_pdf_without_binding() {
        let err = PdfiumExtractor
            .extract("district_doc", Bytes::from_static(b"hello world"))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::NotAPdf { .. }));
    }
}
