//! Positional column mapping for the raw survey export.
//!
//! Raw export headers are not descriptive enough to match on, so each
//! mapped column is addressed by its 0-based position in the header row
//! (the row after the leading title row). Columns not listed here are
//! ignored. Edit this table by hand when the export layout changes; the
//! `mappings` subcommand prints it next to a new export's headers.

use crate::error::Error;
use crate::types::{Result, SurveyMeasure};

const SEL_3_5: &str = "SEL (3-5)";
const SEL_6_12: &str = "SEL (6-12)";
const COMPETENCY_3_5: &str = "Fall 24 Student Competency Survey - Grades 3-5";
const COMPETENCY_6_12: &str = "Fall 24 Student Competency Survey - Grades 6-12";

const fn pair(survey: &'static str, measure: &'static str) -> SurveyMeasure {
    SurveyMeasure { survey, measure }
}

/// Raw column position -> (survey, measure), in output order
const COLUMN_MAPPINGS: &[(usize, SurveyMeasure)] = &[
    (2, pair(SEL_3_5, "Rigorous Expectations")),
    (4, pair(SEL_6_12, "Cultural Awareness and Action")),
    (5, pair(SEL_6_12, "Diversity and Inclusion")),
    (6, pair(SEL_6_12, "Rigorous Expectations")),
    (8, pair(COMPETENCY_3_5, "Challenging Feelings")),
    (9, pair(COMPETENCY_3_5, "Learning Strategies")),
    (10, pair(COMPETENCY_3_5, "Positive Feelings")),
    (11, pair(COMPETENCY_3_5, "Self-Efficacy")),
    (12, pair(COMPETENCY_3_5, "Self-Management")),
    (13, pair(COMPETENCY_3_5, "Sense of Belonging")),
    (14, pair(COMPETENCY_3_5, "Supportive Relationships")),
    (16, pair(COMPETENCY_6_12, "Challenging Feelings")),
    (17, pair(COMPETENCY_6_12, "Emotion Regulation")),
    (18, pair(COMPETENCY_6_12, "Positive Feelings")),
    (19, pair(COMPETENCY_6_12, "Self-Efficacy")),
    (20, pair(COMPETENCY_6_12, "Self-Management")),
    (21, pair(COMPETENCY_6_12, "Sense of Belonging")),
    (22, pair(COMPETENCY_6_12, "Social Awareness")),
];

/// The fixed column mapping table
pub fn column_mappings() -> &'static [(usize, SurveyMeasure)] {
    COLUMN_MAPPINGS
}

/// Fail if any mapped position is past the end of the raw header row
pub fn validate_against(mappings: &[(usize, SurveyMeasure)], headers: &[String]) -> Result<()> {
    let out_of_range: Vec<String> = mappings
        .iter()
        .filter(|(position, _)| *position >= headers.len())
        .map(|(position, _)| position.to_string())
        .collect();

    if out_of_range.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingColumn(format!(
            "raw export has {} columns; mapped position(s) {} not present",
            headers.len(),
            out_of_range.join(", ")
        )))
    }
}

/// A mapping entry paired with the raw header found at its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedColumn {
    pub position: usize,
    pub header: Option<String>,
    pub target: SurveyMeasure,
}

/// Pair each mapping with the header at its position (if any)
pub fn describe(mappings: &[(usize, SurveyMeasure)], headers: &[String]) -> Vec<MappedColumn> {
    mappings
        .iter()
        .map(|(position, target)| MappedColumn {
            position: *position,
            header: headers.get(*position).cloned(),
            target: *target,
        })
        .collect()
}
