use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder};
use tracing::debug;

use crate::types::{Result, Table};

use super::{table_from_records, TableReader};

/// CSV/TSV file reader
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
    skip_rows: usize,
}

impl CsvReader {
    /// Create a new CSV reader
    pub fn new(path: &Path, skip_rows: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            delimiter: b',',
            skip_rows,
        }
    }

    /// Create a new TSV reader
    pub fn new_tsv(path: &Path, skip_rows: usize) -> Self {
        Self {
            delimiter: b'\t',
            ..Self::new(path, skip_rows)
        }
    }

    fn create_reader(&self) -> Result<Reader<BufReader<File>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        // Headers are handled by hand so a title row can sit above them
        let csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Ok(csv_reader)
    }
}

impl TableReader for CsvReader {
    fn read_table(&mut self) -> Result<Table> {
        let mut reader = self.create_reader()?;

        let mut records: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|field| field.to_string()).collect());
        }

        let table = table_from_records(records, self.skip_rows);
        debug!(
            path = %self.path.display(),
            columns = table.headers.len(),
            rows = table.len(),
            "read delimited file"
        );
        Ok(table)
    }
}
