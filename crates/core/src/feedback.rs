//! Structured feedback returned by the analysis service.
//!
//! Every field is opaque natural-language text. The client only cares
//! whether a field is present, never what it says.

use serde::{Deserialize, Deserializer, Serialize};

/// The assessment for one submitted answer.
///
/// Fields missing from the wire stay `None` (or empty, for the facial
/// expression lines); nothing is filled in on the client side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    #[serde(default)]
    pub overall_performance: Option<String>,
    #[serde(default)]
    pub filler_feedback: Option<String>,
    #[serde(default)]
    pub relevance_feedback: Option<String>,
    #[serde(default)]
    pub tonality_feedback: Option<String>,
    /// One line per observed expression, in service order. May be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub facial_expression: Vec<String>,
    #[serde(default)]
    pub next_steps: Option<String>,
}

/// One titled block of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSection<'a> {
    pub heading: &'static str,
    pub lines: Vec<&'a str>,
}

pub const HEADING_OVERALL: &str = "Overall Performance";
pub const HEADING_FILLER: &str = "Use of Filler Words";
pub const HEADING_RELEVANCE: &str = "Relevance to the Question Asked";
pub const HEADING_TONALITY: &str = "Tone and Verbal Articulation";
pub const HEADING_FACIAL: &str = "Facial Expressions";
pub const HEADING_NEXT_STEPS: &str = "Next Steps";

impl FeedbackReport {
    /// Whether the report carries an overall verdict.
    ///
    /// The feedback panel is only shown once this is present.
    pub fn has_overall(&self) -> bool {
        self.overall_performance.is_some()
    }

    /// The report as ordered display sections.
    ///
    /// Absent text fields produce a section with no lines, as does an empty
    /// facial expression list.
    pub fn sections(&self) -> Vec<FeedbackSection<'_>> {
        vec![
            FeedbackSection {
                heading: HEADING_OVERALL,
                lines: single(&self.overall_performance),
            },
            FeedbackSection {
                heading: HEADING_FILLER,
                lines: single(&self.filler_feedback),
            },
            FeedbackSection {
                heading: HEADING_RELEVANCE,
                lines: single(&self.relevance_feedback),
            },
            FeedbackSection {
                heading: HEADING_TONALITY,
                lines: single(&self.tonality_feedback),
            },
            FeedbackSection {
                heading: HEADING_FACIAL,
                lines: self.facial_expression.iter().map(String::as_str).collect(),
            },
            FeedbackSection {
                heading: HEADING_NEXT_STEPS,
                lines: single(&self.next_steps),
            },
        ]
    }

    /// Plain-text rendering used by the terminal front end.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for section in self.sections() {
            out.push_str(section.heading);
            out.push_str(":\n");
            for line in section.lines {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

fn single(field: &Option<String>) -> Vec<&str> {
    field.as_deref().into_iter().collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
