// Resume review prompt templates.
// Each template revision is paired with the SectionSpec that recognizes the
// headers it asks for; change both together.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::review::sections::{FeedbackField, HeaderStyle, SectionDef, SectionSpec};

pub const REVIEW_SYSTEM: &str = "You are a helpful and professional career advisor.";

/// Original numbered template. Header spellings (including "Formating" and
/// "Grammer") are what models echo back, so the paired spec keeps them.
const CLASSIC_PROMPT_TEMPLATE: &str = r#"
You are a professional career advisor. Analyze the following resume and provide the following structured feedback:

1. **Overall Rating (out of 100)** — Evaluate the overall quality of the resume.
2. **Summary** — A short paragraph in 1 line summarizing the impression of the resume.
3. **Strengths** — What is working well in this resume? (3-5 bullet points)
4. **Weaknesses** — What is not working well in this resume? (3-5 bullet points)
5. **ATS compatibility analysis** — give an ATS match score for this resume, issue and fix? (each one in one line)
6. **Formating and readability** — what is the issue of formating and fix? (each one in one line)
7. **Content and impact** — what is the issue of content and fix? (each one in one line)
8. **Grammer and clarity** - what is issue of grammer and fix? (each one in one line)
Resume:
{resume_text}
"#;

/// Later revision: one `**Label:** value` line per scalar section and an
/// "ATS Rate" label in place of the long ATS heading.
const ATS_RATE_PROMPT_TEMPLATE: &str = r#"
You are a professional career advisor. Analyze the following resume.

Respond using EXACTLY these headers, each at the start of its own line, in this order:

**Overall Rating:** <score>/100
**Summary:** <one line summarizing the impression of the resume>
**Strengths:**
- <3-5 bullet points, one per line, each starting with "- ">
**Weaknesses:**
- <3-5 bullet points, one per line, each starting with "- ">
**ATS Rate:** <ATS match score, main issue and fix, on one line>
**Formatting and readability:** <main formatting issue and fix, on one line>
**Content and impact:** <main content issue and fix, on one line>
**Grammar and clarity:** <main grammar issue and fix, on one line>

Do not add any other headers or closing remarks.

Resume:
{resume_text}
"#;

/// Versioned instruction template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTemplate {
    #[default]
    Classic,
    AtsRate,
}

impl FeedbackTemplate {
    pub fn name(self) -> &'static str {
        match self {
            FeedbackTemplate::Classic => "classic",
            FeedbackTemplate::AtsRate => "ats-rate",
        }
    }

    /// Renders the user prompt. Replaces `{resume_text}`.
    pub fn render(self, resume_text: &str) -> String {
        let template = match self {
            FeedbackTemplate::Classic => CLASSIC_PROMPT_TEMPLATE,
            FeedbackTemplate::AtsRate => ATS_RATE_PROMPT_TEMPLATE,
        };
        template.replace("{resume_text}", resume_text)
    }

    /// The section configuration matching this template's header wording.
    pub fn section_spec(self) -> SectionSpec {
        match self {
            FeedbackTemplate::Classic => SectionSpec::standard(),
            FeedbackTemplate::AtsRate => SectionSpec {
                sections: vec![
                    SectionDef::new(FeedbackField::OverallRating, &["Overall Rating"]),
                    SectionDef::new(FeedbackField::Summary, &["Summary"]),
                    SectionDef::new(FeedbackField::Strengths, &["Strengths"]),
                    SectionDef::new(FeedbackField::Weaknesses, &["Weaknesses"]),
                    SectionDef::new(FeedbackField::AtsAnalysis, &["ATS Rate"]),
                    SectionDef::new(
                        FeedbackField::FormattingNotes,
                        &["Formatting and readability"],
                    ),
                    SectionDef::new(FeedbackField::ContentNotes, &["Content and impact"]),
                    SectionDef::new(FeedbackField::GrammarNotes, &["Grammar and clarity"]),
                ],
                styles: vec![HeaderStyle::Bold, HeaderStyle::Plain],
            },
        }
    }
}

impl FromStr for FeedbackTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "v1" => Ok(FeedbackTemplate::Classic),
            "ats-rate" | "ats_rate" | "v2" => Ok(FeedbackTemplate::AtsRate),
            other => Err(format!(
                "unknown feedback template '{other}' (expected 'classic' or 'ats-rate')"
            )),
        }
    }
}
