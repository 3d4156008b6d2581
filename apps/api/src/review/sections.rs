//! Section configuration — which header labels the feedback parser recognizes,
//! which marker syntaxes they may be written in, and what kind of field each feeds.
//!
//! A `SectionSpec` is built once at startup (from a preset or a JSON file) and
//! shared immutably behind an `Arc`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Shape of a feedback field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// One string, taken from the header line itself.
    Scalar,
    /// Ordered bullet items collected from the lines after the header.
    List,
}

/// The fields of a `FeedbackRecord` a section can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackField {
    OverallRating,
    Summary,
    Strengths,
    Weaknesses,
    AtsAnalysis,
    FormattingNotes,
    ContentNotes,
    GrammarNotes,
}

impl FeedbackField {
    pub fn kind(self) -> FieldKind {
        match self {
            FeedbackField::Strengths | FeedbackField::Weaknesses => FieldKind::List,
            _ => FieldKind::Scalar,
        }
    }
}

/// Header marker syntaxes a model may use when echoing a section label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// `Label: value`
    Plain,
    /// `1. Label: value` — the numeric prefix is skipped.
    Numbered,
    /// `**Label:** value`, `**Label**: value`, `**Label** value`
    Bold,
    /// `## Label` markdown headings.
    Heading,
}

/// One recognized section: the field it fills and its accepted spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDef {
    pub field: FeedbackField,
    /// Tried in declared order; matching is case-insensitive.
    pub labels: Vec<String>,
}

impl SectionDef {
    pub fn new(field: FeedbackField, labels: &[&str]) -> Self {
        Self {
            field,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.field.kind()
    }
}

/// Ordered set of recognized sections plus the marker styles they may appear in.
///
/// Order is priority: the first section whose label matches a line wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub sections: Vec<SectionDef>,
    #[serde(default = "all_styles")]
    pub styles: Vec<HeaderStyle>,
}

fn all_styles() -> Vec<HeaderStyle> {
    vec![
        HeaderStyle::Plain,
        HeaderStyle::Numbered,
        HeaderStyle::Bold,
        HeaderStyle::Heading,
    ]
}

impl SectionSpec {
    pub fn accepts(&self, style: HeaderStyle) -> bool {
        self.styles.contains(&style)
    }

    /// Tolerant preset covering every header spelling seen across template revisions.
    pub fn standard() -> Self {
        Self {
            sections: vec![
                SectionDef::new(
                    FeedbackField::OverallRating,
                    &["Overall Rating (out of 100)", "Overall Rating"],
                ),
                SectionDef::new(FeedbackField::Summary, &["Summary"]),
                SectionDef::new(FeedbackField::Strengths, &["Strengths"]),
                SectionDef::new(FeedbackField::Weaknesses, &["Weaknesses"]),
                SectionDef::new(
                    FeedbackField::AtsAnalysis,
                    &[
                        "ATS compatibility analysis",
                        "ATS compatibility",
                        "ATS Rate",
                    ],
                ),
                SectionDef::new(
                    FeedbackField::FormattingNotes,
                    &["Formatting and readability", "Formating and readability"],
                ),
                SectionDef::new(FeedbackField::ContentNotes, &["Content and impact"]),
                SectionDef::new(
                    FeedbackField::GrammarNotes,
                    &["Grammar and clarity", "Grammer and clarity"],
                ),
            ],
            styles: all_styles(),
        }
    }

    /// Loads a spec from a JSON file, e.g. when a template revision renames headers.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read section spec '{}'", path.display()))?;
        let spec: SectionSpec = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid section spec JSON in '{}'", path.display()))?;
        if spec.sections.is_empty() {
            anyhow::bail!("Section spec '{}' declares no sections", path.display());
        }
        Ok(spec)
    }
}

impl Default for SectionSpec {
    fn default() -> Self {
        Self::standard()
    }
}
