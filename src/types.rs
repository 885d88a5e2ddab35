use crate::error::Error;

pub const SCHOOL_YEAR_COLUMN: &str = "SCHOOL_YEAR";
pub const YEAR_GU_COLUMN: &str = "YEAR_GU";
pub const GRADE_GROUP_COLUMN: &str = "Grade Group";
pub const NAME_COLUMN: &str = "Name";
pub const SURVEY_COLUMN: &str = "Survey";
pub const MEASURE_COLUMN: &str = "Measure";
pub const VALUE_COLUMN: &str = "Value";
pub const ROW_IDS_COLUMN: &str = "RowIDs";

/// Column order of every row produced from the raw export
pub const NEW_ROW_COLUMNS: [&str; 8] = [
    SCHOOL_YEAR_COLUMN,
    YEAR_GU_COLUMN,
    GRADE_GROUP_COLUMN,
    NAME_COLUMN,
    SURVEY_COLUMN,
    MEASURE_COLUMN,
    VALUE_COLUMN,
    ROW_IDS_COLUMN,
];

/// Number of non-data rows above the header row in a raw export
pub const RAW_EXPORT_SKIP_ROWS: usize = 1;

/// An in-memory table of text cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from string literals (handy for fixtures)
    #[cfg(test)]
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Like `column_index`, but a missing column is an error
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MissingColumn(format!("'{}'", name)))
    }

    /// Cell text at (row, column); cells past the end of a short record read as empty
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Iterate over one column's cells, top to bottom
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }

    /// Insert a column at `at`, filling every existing row with `default`
    pub fn insert_column(&mut self, at: usize, name: &str, default: &str) {
        let width = self.headers.len();
        self.headers.insert(at, name.to_string());
        for row in &mut self.rows {
            // Pad short records so the new cell lands under its header
            if row.len() < width {
                row.resize(width, String::new());
            }
            row.insert(at, default.to_string());
        }
    }

    /// Append a column at the end, filling every existing row with `default`
    pub fn push_column(&mut self, name: &str, default: &str) {
        let at = self.headers.len();
        self.insert_column(at, name, default);
    }
}

/// A (survey, measure) pair a raw export column maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyMeasure {
    pub survey: &'static str,
    pub measure: &'static str,
}

/// How the cells of a raw column are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-missing value is a finite number
    Numeric,
    /// At least one value is free text; values pass through unchanged
    Text,
}

/// Outcome of normalizing a single raw cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Emit(String),
    Skip,
}

/// Run-wide labels stamped on every new row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLabels {
    pub school_year: String,
    pub year_gu: String,
}

/// One long-format row produced from the raw export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRow {
    pub school_year: String,
    pub year_gu: String,
    pub grade_group: String,
    pub name: String,
    pub survey: String,
    pub measure: String,
    pub value: String,
    pub row_id: String,
}

impl NewRow {
    /// Value for one of `NEW_ROW_COLUMNS`
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            SCHOOL_YEAR_COLUMN => &self.school_year,
            YEAR_GU_COLUMN => &self.year_gu,
            GRADE_GROUP_COLUMN => &self.grade_group,
            NAME_COLUMN => &self.name,
            SURVEY_COLUMN => &self.survey,
            MEASURE_COLUMN => &self.measure,
            VALUE_COLUMN => &self.value,
            ROW_IDS_COLUMN => &self.row_id,
            _ => return None,
        };
        Some(value)
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" => Some(FileFormat::Excel),
            _ => None,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        FileFormat::from_extension(ext).ok_or_else(|| {
            Error::UnsupportedFormat(format!("Unsupported file extension: .{}", ext))
        })
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;
