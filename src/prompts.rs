//! Prompts for grant-draft generation.
//!
//! The template is fixed: the six section labels below must reach the model
//! verbatim on every request. Callers can override the system message via
//! [`crate::config::DraftConfig::system_prompt`]; the user prompt structure
//! is not configurable.

/// System message sent ahead of the drafting prompt.
pub const SYSTEM_PROMPT: &str = "You are a grant-writing assistant.";

/// Section labels the draft is asked to follow, in order.
pub const SECTION_LABELS: [&str; 6] = [
    "Project Title",
    "Executive Summary",
    "Needs Statement",
    "Goals & Objectives",
    "Budget Overview",
    "Sustainability Plan",
];

/// Word limit stated in the prompt.
pub const WORD_LIMIT: usize = 500;

/// Build the user prompt from the two document excerpts.
///
/// Excerpts are inserted as-is; truncation happens before this point.
pub fn build_grant_prompt(district_text: &str, grant_text: &str) -> String {
    format!(
        r#"
You are a grant-writing assistant. Write a short, first-draft grant application using the following information.

---

District Info:
{district_text}

Grant Info:
{grant_text}

---

Use this structure:
1. {title}
2. {summary} (3–5 sentences)
3. {needs}
4. {goals} (3 bullet points)
5. {budget}
6. {sustainability}

Respond professionally and clearly. Keep the total response under {WORD_LIMIT} words.
"#,
        title = SECTION_LABELS[0],
        summary = SECTION_LABELS[1],
        needs = SECTION_LABELS[2],
        goals = SECTION_LABELS[3],
        budget = SECTION_LABELS[4],
        sustainability = SECTION_LABELS[5],
    )
}
