//! Pipeline stages for draft generation.
//!
//! Each submodule implements exactly one step, so each can be tested alone
//! and the two external collaborators (pdfium and the LLM) can be swapped
//! for fakes.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ truncate ──▶ prompt ──▶ llm ──▶ render
//! (bytes)    (pdfium)    (2000 ch)   (template) (1 call) (HTML)
//! ```
//!
//! 1. [`extract`] — PDF bytes to page-joined plain text; runs in
//!    `spawn_blocking` because pdfium is synchronous
//! 2. [`llm`]     — the single outbound completion call
//! 3. [`render`]  — HTML fragments for drafts, errors and the static pages

pub mod extract;
pub mod llm;
pub mod render;
