pub mod csv;
pub mod excel;

use std::path::Path;

use crate::types::{FileFormat, Result, Table};

/// Common trait for tabular file readers
pub trait TableReader {
    /// Read the whole file into memory
    fn read_table(&mut self) -> Result<Table>;
}

/// Create a reader for the given file path.
///
/// `skip_rows` leading rows are discarded before the header row.
pub fn create_reader(path: &Path, skip_rows: usize) -> Result<Box<dyn TableReader>> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => Ok(Box::new(csv::CsvReader::new(path, skip_rows))),
        FileFormat::Tsv => Ok(Box::new(csv::CsvReader::new_tsv(path, skip_rows))),
        FileFormat::Excel => Ok(Box::new(excel::ExcelReader::new(path, skip_rows))),
    }
}

/// Read a table from disk, picking the reader by extension
pub fn read_table(path: &Path, skip_rows: usize) -> Result<Table> {
    let mut reader = create_reader(path, skip_rows)?;
    reader.read_table()
}

/// Split rows read without header handling into a `Table`.
///
/// Records shorter than the header row are padded with empty cells so every
/// row can be written back under the same header.
pub(crate) fn table_from_records(
    records: impl IntoIterator<Item = Vec<String>>,
    skip_rows: usize,
) -> Table {
    let mut records = records.into_iter().skip(skip_rows);
    let Some(headers) = records.next() else {
        return Table::default();
    };

    let width = headers.len();
    let rows = records
        .map(|mut row| {
            if row.len() < width {
                row.resize(width, String::new());
            }
            row
        })
        .collect();

    Table { headers, rows }
}
