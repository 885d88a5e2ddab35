use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::Error;
use crate::types::{Result, Table};

use super::{table_from_records, TableReader};

/// Excel file reader (supports .xlsx, .xls, .xlsm, .xlsb).
/// Only the first worksheet is read.
pub struct ExcelReader {
    path: PathBuf,
    skip_rows: usize,
}

impl ExcelReader {
    pub fn new(path: &Path, skip_rows: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            skip_rows,
        }
    }

    /// Convert Excel Data to string representation
    fn data_to_string(dt: &Data) -> String {
        match dt {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(d) => Self::excel_serial_to_date_string(d.as_f64()),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            // Formula errors (#DIV/0! etc.) read as missing
            Data::Error(_) => String::new(),
        }
    }

    /// Convert Excel serial date to ISO date string
    fn excel_serial_to_date_string(serial: f64) -> String {
        // Excel epoch is 1899-12-30 (with the 1900 leap year bug)
        let days = serial as i64;
        chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|base| base.checked_add_signed(chrono::Duration::days(days)))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| serial.to_string())
    }
}

impl TableReader for ExcelReader {
    fn read_table(&mut self) -> Result<Table> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no worksheets", self.path.display()))
            })?
            .map_err(Error::Excel)?;

        // A used range that starts right of column A would shift every position
        let column_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let records: Vec<Vec<String>> = range
            .rows()
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| {
                std::iter::repeat(String::new())
                    .take(column_offset)
                    .chain(row.iter().map(Self::data_to_string))
                    .collect()
            })
            .collect();

        let table = table_from_records(records, self.skip_rows);
        debug!(
            path = %self.path.display(),
            columns = table.headers.len(),
            rows = table.len(),
            "read worksheet"
        );
        Ok(table)
    }
}
