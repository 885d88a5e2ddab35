use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::types::{NewRow, Result, Table};

/// `<base>_<MMDDYYYY>.csv`
pub fn dated_output_path(base: &Path, date: NaiveDate) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(format!("_{}.csv", date.format("%m%d%Y")));
    PathBuf::from(path)
}

/// Write a table as CSV, creating parent directories as needed.
///
/// The file only appears at `path` once it is completely written.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(staged.as_file_mut());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// What a run added, for the console report
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub original_rows: usize,
    pub new_rows: usize,
    pub total_rows: usize,
    /// Grade group -> survey -> measures produced
    pub measures: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    pub output_file: PathBuf,
}

impl MergeSummary {
    pub fn new(original_rows: usize, new_rows: &[NewRow], output_file: PathBuf) -> Self {
        let mut measures: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
        for row in new_rows {
            measures
                .entry(row.grade_group.clone())
                .or_default()
                .entry(row.survey.clone())
                .or_default()
                .insert(row.measure.clone());
        }

        Self {
            original_rows,
            new_rows: new_rows.len(),
            total_rows: original_rows + new_rows.len(),
            measures,
            output_file,
        }
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original number of rows: {}", self.original_rows)?;
        writeln!(f, "New rows added: {}", self.new_rows)?;
        writeln!(f, "Total rows in combined dataset: {}", self.total_rows)?;
        writeln!(f)?;
        writeln!(f, "Measures by grade group and survey type:")?;
        for (grade, surveys) in &self.measures {
            writeln!(f)?;
            writeln!(f, "{}:", grade)?;
            for (survey, measures) in surveys {
                writeln!(f, "  {}:", survey)?;
                for measure in measures {
                    writeln!(f, "    - {}", measure)?;
                }
            }
        }
        writeln!(f)?;
        write!(f, "Saved combined data to: {}", self.output_file.display())
    }
}

/// Write the summary to stdout, as text or pretty JSON
pub fn print_summary(summary: &MergeSummary, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut handle, summary)?;
        writeln!(handle)?;
    } else {
        writeln!(handle, "{}", summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_row(grade: &str, survey: &str, measure: &str) -> NewRow {
        NewRow {
            school_year: "2024".to_string(),
            year_gu: "GU".to_string(),
            grade_group: grade.to_string(),
            name: "School".to_string(),
            survey: survey.to_string(),
            measure: measure.to_string(),
            value: ".5".to_string(),
            row_id: "Row1".to_string(),
        }
    }

    #[test]
    fn test_dated_output_path() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 7).unwrap();
        assert_eq!(
            dated_output_path(Path::new("./output/combined_pano_data"), date),
            PathBuf::from("./output/combined_pano_data_11072024.csv")
        );
        assert_eq!(
            dated_output_path(Path::new("combined"), date),
            PathBuf::from("combined_11072024.csv")
        );
    }

    #[test]
    fn test_write_table_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/combined_01022025.csv");
        let table = Table::from_rows(&["Name", "Value"], &[&["Oak, East", ".85"], &["Pine", ""]]);

        write_table(&table, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Name,Value\n\"Oak, East\",.85\nPine,\n");
    }

    #[test]
    fn test_write_table_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("combined.csv");
        std::fs::write(&path, "stale").unwrap();

        write_table(&Table::from_rows(&["Name"], &[&["Oak"]]), &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Name\nOak\n");
        // No staging files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_summary_groups_and_sorts_measures() {
        let rows = vec![
            new_row("Middle", "SEL (6-12)", "Rigorous Expectations"),
            new_row("Elementary", "SEL (3-5)", "Rigorous Expectations"),
            new_row("Middle", "SEL (6-12)", "Diversity and Inclusion"),
            new_row("Middle", "SEL (6-12)", "Rigorous Expectations"),
        ];

        let summary = MergeSummary::new(10, &rows, PathBuf::from("out.csv"));
        assert_eq!(summary.new_rows, 4);
        assert_eq!(summary.total_rows, 14);

        let text = summary.to_string();
        let elementary = text.find("Elementary:").unwrap();
        let middle = text.find("Middle:").unwrap();
        assert!(elementary < middle);
        assert!(text.contains(
            "  SEL (6-12):\n    - Diversity and Inclusion\n    - Rigorous Expectations\n"
        ));
    }

    #[test]
    fn test_summary_json() {
        let summary = MergeSummary::new(1, &[new_row("High", "S", "M")], PathBuf::from("o.csv"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_rows"], 2);
        assert_eq!(json["measures"]["High"]["S"][0], "M");
    }
}
