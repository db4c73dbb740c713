// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives reviewer keyboard buttons from an aggregated AI response.
//!
//! The upstream workflow concatenates candidate answers into one text
//! block with provider sections:
//!
//! ```text
//! - 🤖 GPT
//! first candidate answer
//! - 📝 Claude: inline answer
//! - 🌍 Gemini
//! —
//! ```
//!
//! A provider earns an accept button only when its section carries actual
//! content. Sections holding nothing but placeholder dashes are skipped,
//! so the reviewer is never offered an answer that does not exist.

use vouch_core::types::ReviewAction;

/// Characters a workflow emits to mark an empty provider section.
/// Em dash, plain hyphen, and en dash all count.
const PLACEHOLDER_CHARS: [char; 3] = ['\u{2014}', '-', '\u{2013}'];

fn provider_for_label(label: &str) -> Option<ReviewAction> {
    match label {
        "\u{1F916} GPT" | "\u{1F916} Open AI" | "\u{1F916} OpenAI" => Some(ReviewAction::AcceptGpt),
        "\u{1F4DD} Claude" => Some(ReviewAction::AcceptClaude),
        "\u{1F30D} Gemini" => Some(ReviewAction::AcceptGemini),
        "\u{2728} Other" => Some(ReviewAction::AcceptOther),
        _ => None,
    }
}

/// Split a provider line into its label and any inline content.
///
/// A colon wins over an em dash, so `"📝 Claude: — "` keeps the dash as
/// (placeholder) content rather than splitting on it.
fn split_label_and_inline(text: &str) -> (&str, &str) {
    for separator in [':', '\u{2014}'] {
        if let Some((label, rest)) = text.split_once(separator) {
            return (label.trim(), rest.trim());
        }
    }
    (text.trim(), "")
}

/// Whether the content is an actual answer rather than a placeholder.
fn has_meaningful_text(content: &str) -> bool {
    let stripped = content.trim();
    if stripped.is_empty() {
        return false;
    }
    stripped
        .chars()
        .any(|ch| !PLACEHOLDER_CHARS.contains(&ch) && !ch.is_whitespace())
}

fn finalize(
    buttons: &mut Vec<(String, ReviewAction)>,
    current: Option<(String, ReviewAction)>,
    lines: &mut Vec<String>,
) {
    if let Some((label, action)) = current {
        let content = lines.join("\n");
        if has_meaningful_text(&content) {
            buttons.push((label, action));
        }
    }
    lines.clear();
}

/// Return `(label, action)` pairs for every provider whose section in
/// `ai_response` carries a non-placeholder answer, in document order.
pub fn parse_review_buttons(ai_response: &str) -> Vec<(String, ReviewAction)> {
    let mut buttons = Vec::new();
    let mut current: Option<(String, ReviewAction)> = None;
    let mut lines: Vec<String> = Vec::new();

    for raw_line in ai_response.lines() {
        let stripped = raw_line.trim();

        if let Some(candidate) = stripped.strip_prefix("- ") {
            let (label, inline) = split_label_and_inline(candidate.trim());
            let normalized = label.trim_end_matches(':').trim();

            if let Some(action) = provider_for_label(normalized) {
                finalize(&mut buttons, current.take(), &mut lines);
                current = Some((normalized.to_string(), action));
                if !inline.is_empty() {
                    lines.push(inline.to_string());
                }
                continue;
            }
        }

        if current.is_some() && !stripped.is_empty() {
            lines.push(stripped.to_string());
        }
    }

    finalize(&mut buttons, current.take(), &mut lines);
    buttons
}
