//! Feedback parser — maps free-form, section-labelled model output onto a fixed
//! `FeedbackRecord` in a single forward pass.
//!
//! Parsing never fails. Any section that cannot be located keeps its default
//! (empty string / empty list); callers treat empty fields as "not determinable".

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::review::sections::{FeedbackField, FieldKind, HeaderStyle, SectionSpec};

/// Structured resume feedback. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub overall_rating: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ats_analysis: String,
    pub formatting_notes: String,
    pub content_notes: String,
    pub grammar_notes: String,
}

impl FeedbackRecord {
    fn scalar_mut(&mut self, field: FeedbackField) -> Option<&mut String> {
        match field {
            FeedbackField::OverallRating => Some(&mut self.overall_rating),
            FeedbackField::Summary => Some(&mut self.summary),
            FeedbackField::AtsAnalysis => Some(&mut self.ats_analysis),
            FeedbackField::FormattingNotes => Some(&mut self.formatting_notes),
            FeedbackField::ContentNotes => Some(&mut self.content_notes),
            FeedbackField::GrammarNotes => Some(&mut self.grammar_notes),
            FeedbackField::Strengths | FeedbackField::Weaknesses => None,
        }
    }

    fn list_mut(&mut self, field: FeedbackField) -> Option<&mut Vec<String>> {
        match field {
            FeedbackField::Strengths => Some(&mut self.strengths),
            FeedbackField::Weaknesses => Some(&mut self.weaknesses),
            _ => None,
        }
    }

    /// Number of fields holding a non-empty value.
    pub fn populated_fields(&self) -> usize {
        let scalars = [
            &self.overall_rating,
            &self.summary,
            &self.ats_analysis,
            &self.formatting_notes,
            &self.content_notes,
            &self.grammar_notes,
        ];
        let lists = [&self.strengths, &self.weaknesses];
        scalars.iter().filter(|s| !s.is_empty()).count()
            + lists.iter().filter(|l| !l.is_empty()).count()
    }
}

/// Characters wrapped around scalar values for emphasis.
const DECORATION: &[char] = &['*', '_', '`'];

/// Separators a model may place between a header and its value.
const SEPARATORS: &[&str] = &[":", "—", "–", "- "];

#[derive(Debug)]
struct HeaderMatch<'a> {
    field: FeedbackField,
    kind: FieldKind,
    /// Raw text following the header delimiter.
    rest: &'a str,
}

/// Stateless parser over an injected `SectionSpec`. Cheap to clone and safe to
/// share across request handlers.
#[derive(Debug, Clone)]
pub struct FeedbackParser {
    spec: Arc<SectionSpec>,
}

impl FeedbackParser {
    pub fn new(spec: Arc<SectionSpec>) -> Self {
        Self { spec }
    }

    pub fn parse(&self, raw_text: &str) -> FeedbackRecord {
        let mut record = FeedbackRecord::default();
        let mut current_list: Option<FeedbackField> = None;

        let normalized = raw_text.replace("\r\n", "\n").replace('\r', "\n");

        for line in normalized
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            if let Some(header) = self.match_header(line) {
                match header.kind {
                    FieldKind::Scalar => {
                        if let Some(slot) = record.scalar_mut(header.field) {
                            *slot = clean_scalar(header.rest).to_string();
                        }
                        current_list = None;
                    }
                    FieldKind::List => current_list = Some(header.field),
                }
                continue;
            }

            // Lines outside a list section, and prose inside one, are dropped.
            let Some(field) = current_list else {
                continue;
            };
            if let Some(item) = strip_bullet(line) {
                if !item.is_empty() {
                    if let Some(list) = record.list_mut(field) {
                        list.push(item.to_string());
                    }
                }
            }
        }

        record
    }

    /// Tests a trimmed line against every section label in priority order.
    fn match_header<'a>(&self, line: &'a str) -> Option<HeaderMatch<'a>> {
        let (body, bold) = self.strip_header_prefix(line)?;

        for section in &self.spec.sections {
            for label in &section.labels {
                let Some(after) = strip_prefix_ignore_case(body, label) else {
                    continue;
                };
                if let Some(rest) = header_delimiter(after, bold) {
                    return Some(HeaderMatch {
                        field: section.field,
                        kind: section.kind(),
                        rest,
                    });
                }
            }
        }
        None
    }

    /// Removes heading, numbering and bold markers from the start of a line.
    /// Returns `None` when the line uses a marker style the spec does not accept.
    fn strip_header_prefix<'a>(&self, line: &'a str) -> Option<(&'a str, bool)> {
        let mut body = line;
        let mut used_marker = false;

        if body.starts_with('#') {
            if !self.spec.accepts(HeaderStyle::Heading) {
                return None;
            }
            body = body.trim_start_matches('#').trim_start();
            used_marker = true;
        }

        if let Some(rest) = strip_numbering(body) {
            if !self.spec.accepts(HeaderStyle::Numbered) {
                return None;
            }
            body = rest;
            used_marker = true;
        }

        let mut bold = false;
        if let Some(rest) = body.strip_prefix("**").or_else(|| body.strip_prefix("__")) {
            if !self.spec.accepts(HeaderStyle::Bold) {
                return None;
            }
            body = rest.trim_start();
            bold = true;
            used_marker = true;

            // "**1. Overall Rating:**"
            if let Some(rest) = strip_numbering(body) {
                if !self.spec.accepts(HeaderStyle::Numbered) {
                    return None;
                }
                body = rest;
            }
        }

        if !used_marker && !self.spec.accepts(HeaderStyle::Plain) {
            return None;
        }
        Some((body, bold))
    }
}

/// Checks what follows a matched label. A header must be followed directly by a
/// colon, a closing bold marker, or nothing at all; anything else is prose.
fn header_delimiter(after: &str, bold: bool) -> Option<&str> {
    let trimmed = after.trim_start();
    if trimmed.is_empty() {
        return Some("");
    }
    if let Some(rest) = trimmed.strip_prefix(':') {
        return Some(rest);
    }
    if bold {
        if let Some(rest) = trimmed
            .strip_prefix("**")
            .or_else(|| trimmed.strip_prefix("__"))
        {
            return Some(rest);
        }
    }
    None
}

/// Trims emphasis markers from both ends and drops a leading separator.
fn clean_scalar(value: &str) -> &str {
    let is_decoration = |c: char| c.is_whitespace() || DECORATION.contains(&c);
    let mut value = value.trim_matches(is_decoration);
    for sep in SEPARATORS {
        if let Some(rest) = value.strip_prefix(sep) {
            value = rest.trim_matches(is_decoration);
            break;
        }
    }
    value
}

/// `"12. text"` or `"3) text"` → `"text"`.
fn strip_numbering(line: &str) -> Option<&str> {
    let digits = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim_start)
}

/// Bullet items start with a hyphen or with digits followed by a period.
/// Horizontal rules (`---`) are not bullets.
fn strip_bullet(line: &str) -> Option<&str> {
    if line.chars().all(|c| c == '-' || c.is_whitespace()) {
        return None;
    }
    if let Some(rest) = line.strip_prefix('-') {
        return Some(rest.trim_start());
    }
    let digits = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim_start)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let offset = chars.next().map(|(i, _)| i).unwrap_or(text.len());
    Some(&text[offset..])
}
