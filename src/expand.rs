use tracing::{debug, warn};

use crate::grade_group::GradeGroupResolver;
use crate::inference::{infer_column_kind, is_missing};
use crate::mapping::validate_against;
use crate::normalize::normalize_value;
use crate::row_ids::RowIdAllocator;
use crate::types::{
    BatchLabels, ColumnKind, NewRow, Normalized, Result, SurveyMeasure, Table, NAME_COLUMN,
};

/// Rows produced from the raw export, plus bookkeeping for the run summary
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub rows: Vec<NewRow>,
    /// Distinct (school, year) combinations that received a row id
    pub schools: usize,
    /// Raw rows dropped because the school name was missing
    pub skipped_unnamed: usize,
}

/// Turn each wide raw row into one long-format row per mapped, non-empty cell.
///
/// Output order follows the raw file, and within a raw row the mapping table.
pub fn expand_rows(
    aggregate: &Table,
    raw: &Table,
    mappings: &[(usize, SurveyMeasure)],
    batch: &BatchLabels,
) -> Result<Expansion> {
    let name_col = raw.require_column(NAME_COLUMN)?;
    validate_against(mappings, &raw.headers)?;

    let mut allocator = RowIdAllocator::for_aggregate(aggregate)?;
    let grades = GradeGroupResolver::new(aggregate)?;

    let kinds: Vec<ColumnKind> = mappings
        .iter()
        .map(|(position, _)| infer_column_kind(raw.column_values(*position)))
        .collect();
    for ((position, target), kind) in mappings.iter().zip(&kinds) {
        if *kind == ColumnKind::Text {
            debug!(
                position,
                measure = target.measure,
                "raw column holds text; values kept verbatim"
            );
        }
    }

    if raw.is_empty() {
        warn!("raw export has no data rows");
    }

    let mut expansion = Expansion::default();

    for row in 0..raw.len() {
        let school = raw.cell(row, name_col);
        if is_missing(school) {
            warn!(line = row + 1, "raw row has no school name; skipped");
            expansion.skipped_unnamed += 1;
            continue;
        }

        let row_id = allocator.assign(school, &batch.school_year)?;
        let grade_group = grades.resolve(school);
        if !grades.is_known(school) {
            debug!(school, grade_group, "new school; grade group taken from its name");
        }

        for ((position, target), kind) in mappings.iter().zip(&kinds) {
            let value = match normalize_value(raw.cell(row, *position), *kind) {
                Normalized::Emit(value) => value,
                Normalized::Skip => continue,
            };

            expansion.rows.push(NewRow {
                school_year: batch.school_year.clone(),
                year_gu: batch.year_gu.clone(),
                grade_group: grade_group.to_string(),
                name: school.to_string(),
                survey: target.survey.to_string(),
                measure: target.measure.to_string(),
                value,
                row_id: row_id.clone(),
            });
        }
    }

    expansion.schools = allocator.count();
    Ok(expansion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::ROW_IDS_COLUMN;

    const SURVEY: &str = "SEL (3-5)";

    fn mappings() -> Vec<(usize, SurveyMeasure)> {
        vec![
            (
                2,
                SurveyMeasure {
                    survey: SURVEY,
                    measure: "Rigorous Expectations",
                },
            ),
            (
                1,
                SurveyMeasure {
                    survey: SURVEY,
                    measure: "Sense of Belonging",
                },
            ),
        ]
    }

    fn batch() -> BatchLabels {
        BatchLabels {
            school_year: "2024".to_string(),
            year_gu: "GU-2024".to_string(),
        }
    }

    fn aggregate() -> Table {
        Table::from_rows(
            &["SCHOOL_YEAR", "YEAR_GU", "Grade Group", "Name", "Measure", "Value", "RowIDs"],
            &[
                &["2023", "GU-2023", "K-8", "Lincoln Elementary", "Grit", ".70", "Row1"],
                &["2023", "GU-2023", "Middle", "Hill School", "Grit", ".61", "Row9"],
            ],
        )
    }

    #[test]
    fn test_one_row_per_non_empty_mapped_cell() {
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[
                &["Oak Elementary", "81.4", "77"],
                &["Pine Middle", "", "64.9"],
            ],
        );

        let expansion = expand_rows(&aggregate(), &raw, &mappings(), &batch()).unwrap();
        let rows = &expansion.rows;

        assert_eq!(rows.len(), 3);
        // Mapping-table order within a raw row, not column order
        assert_eq!(rows[0].measure, "Rigorous Expectations");
        assert_eq!(rows[0].value, ".77");
        assert_eq!(rows[1].measure, "Sense of Belonging");
        assert_eq!(rows[1].value, ".81");
        assert_eq!(rows[2].name, "Pine Middle");
        assert_eq!(rows[2].value, ".64");

        assert_eq!(rows[0].row_id, "Row10");
        assert_eq!(rows[1].row_id, "Row10");
        assert_eq!(rows[2].row_id, "Row11");
        assert_eq!(expansion.schools, 2);

        for row in rows {
            assert_eq!(row.school_year, "2024");
            assert_eq!(row.year_gu, "GU-2024");
            assert_eq!(row.survey, SURVEY);
        }
    }

    #[test]
    fn test_repeated_school_shares_row_id() {
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[
                &["Oak Elementary", "81", ""],
                &["Pine Middle", "70", ""],
                &["Oak Elementary", "", "90"],
            ],
        );

        let rows = expand_rows(&aggregate(), &raw, &mappings(), &batch())
            .unwrap()
            .rows;

        let oak: Vec<&str> = rows
            .iter()
            .filter(|r| r.name == "Oak Elementary")
            .map(|r| r.row_id.as_str())
            .collect();
        assert_eq!(oak, vec!["Row10", "Row10"]);

        let pine = rows.iter().find(|r| r.name == "Pine Middle").unwrap();
        assert_eq!(pine.row_id, "Row11");
    }

    #[test]
    fn test_grade_group_prefers_aggregate() {
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[
                &["Lincoln Elementary", "80", ""],
                &["Hill School", "80", ""],
                &["Sample Secondary School", "80", ""],
            ],
        );

        let rows = expand_rows(&aggregate(), &raw, &mappings(), &batch())
            .unwrap()
            .rows;

        assert_eq!(rows[0].grade_group, "K-8");
        assert_eq!(rows[1].grade_group, "Middle");
        assert_eq!(rows[2].grade_group, "High");
    }

    #[test]
    fn test_text_column_values_pass_through() {
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[
                &["Oak Elementary", "n<10", "80"],
                &["Pine Middle", "72", "81"],
            ],
        );

        let rows = expand_rows(&aggregate(), &raw, &mappings(), &batch())
            .unwrap()
            .rows;

        let belonging: Vec<&str> = rows
            .iter()
            .filter(|r| r.measure == "Sense of Belonging")
            .map(|r| r.value.as_str())
            .collect();
        assert_eq!(belonging, vec!["n<10", "72"]);
    }

    #[test]
    fn test_unnamed_rows_are_skipped_without_consuming_ids() {
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[&["", "80", "80"], &["Oak Elementary", "80", ""]],
        );

        let expansion = expand_rows(&aggregate(), &raw, &mappings(), &batch()).unwrap();
        assert_eq!(expansion.skipped_unnamed, 1);
        assert_eq!(expansion.rows.len(), 1);
        assert_eq!(expansion.rows[0].row_id, "Row10");
    }

    #[test]
    fn test_short_records_read_as_missing() {
        let raw = Table::from_rows(&["Name", "Belonging", "Rigor"], &[&["Oak Elementary", "80"]]);

        let rows = expand_rows(&aggregate(), &raw, &mappings(), &batch())
            .unwrap()
            .rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].measure, "Sense of Belonging");
    }

    #[test]
    fn test_raw_without_name_column() {
        let raw = Table::from_rows(&["School", "Belonging", "Rigor"], &[]);
        let result = expand_rows(&aggregate(), &raw, &mappings(), &batch());
        assert!(matches!(result, Err(Error::MissingColumn(_))));
    }

    #[test]
    fn test_raw_narrower_than_mapping() {
        let raw = Table::from_rows(&["Name", "Belonging"], &[]);
        let result = expand_rows(&aggregate(), &raw, &mappings(), &batch());
        assert!(matches!(result, Err(Error::MissingColumn(_))));
    }

    #[test]
    fn test_empty_aggregate_starts_at_row1() {
        let aggregate = Table::from_rows(&["Name", "Grade Group", "Measure", ROW_IDS_COLUMN], &[]);
        let raw = Table::from_rows(
            &["Name", "Belonging", "Rigor"],
            &[&["Oak Elementary", "80", ""]],
        );

        let rows = expand_rows(&aggregate, &raw, &mappings(), &batch())
            .unwrap()
            .rows;
        assert_eq!(rows[0].row_id, "Row1");
        assert_eq!(rows[0].grade_group, "Elementary");
    }
}
