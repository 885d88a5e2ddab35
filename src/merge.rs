use tracing::debug;

use crate::types::{NewRow, Result, Table, MEASURE_COLUMN, NEW_ROW_COLUMNS, SURVEY_COLUMN};

/// Make sure the aggregate table has a `Survey` column.
///
/// A missing column is inserted immediately before `Measure`, empty on every
/// existing row.
pub fn ensure_survey_column(table: &mut Table) -> Result<()> {
    if table.has_column(SURVEY_COLUMN) {
        return Ok(());
    }

    let at = table.require_column(MEASURE_COLUMN)?;
    table.insert_column(at, SURVEY_COLUMN, "");
    debug!(position = at, "inserted Survey column");
    Ok(())
}

/// Append new rows after the existing ones.
///
/// New-row columns the table lacks are added at the end (empty on existing
/// rows); table columns a new row does not carry stay empty on that row.
/// Nothing is deduplicated.
pub fn append_rows(table: &mut Table, new_rows: &[NewRow]) {
    if new_rows.is_empty() {
        return;
    }

    for column in NEW_ROW_COLUMNS {
        if !table.has_column(column) {
            table.push_column(column, "");
            debug!(column, "added column carried by new rows");
        }
    }

    let headers = table.headers.clone();
    for row in new_rows {
        let record = headers
            .iter()
            .map(|h| row.field(h).unwrap_or("").to_string())
            .collect();
        table.rows.push(record);
    }
}
