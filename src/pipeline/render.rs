//! HTML fragments returned by the web service.
//!
//! The two static pages are plain strings. Draft and error fragments go
//! through askama templates, which escape the embedded text; each line of
//! the text is emitted separately with `<br>` between lines.

use crate::error::DraftError;
use askama::Template;

/// Shown if the error fragment itself cannot be rendered.
const FALLBACK_ERROR_HTML: &str = "<p style='color:red;'>❌ Error</p>";

#[derive(Template)]
#[template(
    source = "<div style='font-family: Arial, sans-serif; padding: 2rem;'>{% for line in lines %}{% if !loop.first %}<br>{% endif %}{{ line }}{% endfor %}</div>",
    ext = "html"
)]
struct DraftTemplate<'a> {
    lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(
    source = "<p style='color:red;'>❌ Error: {% for line in lines %}{% if !loop.first %}<br>{% endif %}{{ line }}{% endfor %}</p>",
    ext = "html"
)]
struct ErrorTemplate<'a> {
    lines: Vec<&'a str>,
}

/// Welcome fragment served at `GET /`.
pub fn welcome_html() -> &'static str {
    r#"
        <h2>✅ Rotunda AI is Live!</h2>
        <p>Go to <a href="/upload">/upload</a> to submit your documents.</p>
    "#
}

/// Upload form served at `GET /upload`.
pub fn upload_form_html() -> &'static str {
    r#"
        <h2>Grant Draft Generator</h2>
        <form action="/upload" method="post" enctype="multipart/form-data">
            <label>District Document (PDF):</label><br>
            <input type="file" name="district_doc" required><br><br>

            <label>Grant Document (PDF):</label><br>
            <input type="file" name="grant_doc" required><br><br>

            <button type="submit">Generate Draft</button>
        </form>
    "#
}

/// Render a draft: newlines become `<br>`, wrapped in a styled container.
pub fn draft_html(draft: &str) -> Result<String, DraftError> {
    DraftTemplate {
        lines: draft.split('\n').collect(),
    }
    .render()
    .map_err(|e| DraftError::Internal(format!("Failed to render draft: {e}")))
}

/// Render an error message.
pub fn error_html(message: &str) -> String {
    ErrorTemplate {
        lines: message.split('\n').collect(),
    }
    .render()
    .unwrap_or_else(|_| FALLBACK_ERROR_HTML.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_line_breaks() {
        let html = draft_html("line one\nline two").unwrap();
        assert!(html.contains("line one<br>line two"), "got: {html}");
        assert!(!html.contains('\n'));
    }

    #[test]
    fn every_newline_is_replaced() {
        let html = draft_html("a\n\nb\n").unwrap();
        assert!(html.contains("a<br><br>b<br>"));
    }

    #[test]
    fn draft_is_wrapped_in_styled_div() {
        let html = draft_html("x").unwrap();
        assert!(html.starts_with("<div style='font-family: Arial, sans-serif; padding: 2rem;'>"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn markup_in_draft_is_escaped() {
        let html = draft_html("<script>alert(1)</script> & more").unwrap();
        assert!(!html.contains("<script>"), "got: {html}");
        assert!(html.contains("&lt;script&gt;alert(1)"), "got: {html}");
        assert!(html.contains("&amp; more"), "got: {html}");
    }

    #[test]
    fn plain_draft_text_is_unchanged() {
        let html = draft_html("Project Title: Reading Forward").unwrap();
        assert!(html.contains(">Project Title: Reading Forward</div>"), "got: {html}");
    }

    #[test]
    fn markup_in_error_is_escaped() {
        let html = error_html("bad <b>input</b>\nsecond line");
        assert!(html.starts_with("<p style='color:red;'>❌ Error: bad &lt;b&gt;input"));
        assert!(html.contains("<br>second line</p>"), "got: {html}");
    }

    #[test]
    fn error_fragment_carries_message() {
        let html = error_html("LLM API error: quota exceeded");
        assert!(html.contains("color:red"));
        assert!(html.contains("LLM API error: quota exceeded"));
    }

    #[test]
    fn upload_form_has_both_required_fields() {
        let form = upload_form_html();
        assert!(form.contains(r#"name="district_doc" required"#));
        assert!(form.contains(r#"name="grant_doc" required"#));
        assert!(form.contains("multipart/form-data"));
    }

    #[test]
    fn welcome_links_to_upload() {
        assert!(welcome_html().contains(r#"href="/upload""#));
    }
}
