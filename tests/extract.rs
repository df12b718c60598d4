//! pdfium-backed extraction tests.
//!
//! These bind the real pdfium library and are skipped unless
//! `PDFIUM_LIB_PATH` points at it.
//!
//! Run with:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test extract -- --nocapture

use bytes::Bytes;
use rotunda::{DraftError, PdfiumExtractor, TextExtractor};

/// Skip this test unless a pdfium library path is configured.
macro_rules! skip_unless_pdfium {
    () => {{
        if std::env::var("PDFIUM_LIB_PATH").map_or(true, |p| p.is_empty()) {
            println!("SKIP — set PDFIUM_LIB_PATH to run pdfium tests");
            return;
        }
    }};
}

// ── Fixture ──────────────────────────────────────────────────────────────────

/// Build a minimal PDF with one Helvetica text line per page.
fn fixture_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    // Object layout: 1 catalog, 2 page tree, 3 font, then (page, content) pairs.
    let page_id = |i: usize| 4 + 2 * i;
    let content_id = |i: usize| 5 + 2 * i;

    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", page_id(i)))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id(i)
        ));
        let stream = format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", idx + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

#[test]
fn fixture_starts_with_pdf_signature() {
    let pdf = fixture_pdf(&["Alpha"]);
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.ends_with(b"%%EOF\n"));
}

// ── pdfium ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_are_joined_in_order() {
    skip_unless_pdfium!();

    let pdf = fixture_pdf(&["Alpha district", "Bravo budget", "Charlie goals"]);
    let text = PdfiumExtractor
        .extract("district_doc", Bytes::from(pdf))
        .await
        .expect("fixture should extract");

    let alpha = text.find("Alpha district").expect("page 1 text");
    let bravo = text.find("Bravo budget").expect("page 2 text");
    let charlie = text.find("Charlie goals").expect("page 3 text");
    assert!(alpha < bravo && bravo < charlie, "got: {text:?}");
    assert!(text[alpha..bravo].contains('\n'), "got: {text:?}");
    assert!(text[bravo..charlie].contains('\n'), "got: {text:?}");
}

#[tokio::test]
async fn single_page_has_no_separator() {
    skip_unless_pdfium!();

    let pdf = fixture_pdf(&["Lonely page"]);
    let text = PdfiumExtractor
        .extract("grant_doc", Bytes::from(pdf))
        .await
        .expect("fixture should extract");
    assert_eq!(text.trim(), "Lonely page");
}

#[tokio::test]
async fn signature_with_garbage_body_is_corrupt() {
    skip_unless_pdfium!();

    let err = PdfiumExtractor
        .extract(
            "grant_doc",
            Bytes::from_static(b"%PDF-1.7\nthis is not really a pdf at all"),
        )
        .await
        .unwrap_err();
    match err {
        DraftError::CorruptPdf { document, .. } => assert_eq!(document, "grant_doc"),
        other => panic!("unexpected error: {other:?}"),
    }
}
