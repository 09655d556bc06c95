//! Labeled-section response parsing.
//!
//! The summarization model is asked to answer with labeled sections:
//!
//! ```text
//! SUMMARY:
//! [paragraphs]
//!
//! MOOD: [single line]
//!
//! THEMES: [comma, separated, list]
//!
//! HIGHLIGHTS:
//! - [bulleted lines]
//!
//! LOCATION_INSIGHT: [optional single section]
//! ```
//!
//! Models drift, so parsing is lenient: labels are matched case-insensitively
//! at line starts, the first occurrence of a label wins, and any missing
//! section degrades to an empty/absent field. Parsing never fails.

use crate::types::WeeklySummary;

/// The section labels the parser recognizes, in canonical form.
const LABELS: [&str; 5] = ["SUMMARY:", "MOOD:", "THEMES:", "HIGHLIGHTS:", "LOCATION_INSIGHT:"];

/// Parse a summarizer response into a [`WeeklySummary`].
pub fn parse_summary_response(response: &str) -> WeeklySummary {
    let sections = split_sections(response);

    let summary = sections
        .iter()
        .find(|(label, _)| *label == "SUMMARY:")
        .map(|(_, body)| body.trim().to_string())
        .unwrap_or_default();

    let mood_trend = sections
        .iter()
        .find(|(label, _)| *label == "MOOD:")
        .and_then(|(_, body)| body.lines().next())
        .map(|line| line.trim().to_string())
        .unwrap_or_default();

    let key_themes = sections
        .iter()
        .find(|(label, _)| *label == "THEMES:")
        .and_then(|(_, body)| body.lines().next())
        .map(|line| {
            line.split(',')
                .map(|theme| theme.trim().to_string())
                .filter(|theme| !theme.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let highlights = sections
        .iter()
        .find(|(label, _)| *label == "HIGHLIGHTS:")
        .map(|(_, body)| {
            body.lines()
                .map(str::trim)
                .filter(|line| is_bullet(line))
                .map(strip_bullet)
                .filter(|h| !h.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let location_note = sections
        .iter()
        .find(|(label, _)| *label == "LOCATION_INSIGHT:")
        .map(|(_, body)| body.trim().to_string())
        .filter(|note| !note.is_empty());

    WeeklySummary {
        summary,
        mood_trend,
        key_themes,
        highlights,
        location_note,
    }
}

/// Split the response into (label, body) pairs in order of appearance.
///
/// The body of a section runs until the next recognized label or end of
/// input. Text before the first label is ignored.
fn split_sections(response: &str) -> Vec<(&'static str, String)> {
    let mut sections: Vec<(&'static str, String)> = Vec::new();
    let mut current: Option<(&'static str, String)> = None;

    for line in response.lines() {
        let line = line.trim_start();
        if let Some(label) = match_label(line) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            let rest = line[label.len()..].trim_start();
            current = Some((label, rest.to_string()));
        } else if let Some((_, body)) = current.as_mut() {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(line);
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }

    sections
}

/// Match a recognized label at the start of a (left-trimmed) line,
/// case-insensitively.
///
/// Compares bytes: labels are pure ASCII, and byte comparison stays safe on
/// lines containing multibyte characters at arbitrary positions.
fn match_label(line: &str) -> Option<&'static str> {
    let bytes = line.as_bytes();
    LABELS.iter().copied().find(|label| {
        bytes.len() >= label.len() && bytes[..label.len()].eq_ignore_ascii_case(label.as_bytes())
    })
}

fn is_bullet(line: &str) -> bool {
    if line.starts_with('-') || line.starts_with('*') {
        return true;
    }
    // Numbered list: "1. ..." / "12. ..."
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    !digits.is_empty() && line[digits.len()..].starts_with('.')
}

fn strip_bullet(line: &str) -> String {
    let rest = if let Some(stripped) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        stripped
    } else {
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        line[digits..].trim_start_matches('.')
    };
    rest.trim().to_string()
}
