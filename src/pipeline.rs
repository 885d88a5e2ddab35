use chrono::NaiveDate;
use tracing::info;

use crate::config::MergeConfig;
use crate::expand::expand_rows;
use crate::mapping::column_mappings;
use crate::merge::{append_rows, ensure_survey_column};
use crate::output::{dated_output_path, write_table, MergeSummary};
use crate::readers::read_table;
use crate::types::{BatchLabels, NewRow, Result, Table, RAW_EXPORT_SKIP_ROWS};

/// Result of merging in memory, before anything is written
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub combined: Table,
    pub new_rows: Vec<NewRow>,
    pub original_rows: usize,
}

/// Merge a raw export into the aggregate table without touching the filesystem
pub fn merge_tables(aggregate: Table, raw: &Table, batch: &BatchLabels) -> Result<MergeResult> {
    let expansion = expand_rows(&aggregate, raw, column_mappings(), batch)?;
    info!(
        schools = expansion.schools,
        rows = expansion.rows.len(),
        skipped = expansion.skipped_unnamed,
        "expanded raw export"
    );

    let original_rows = aggregate.len();
    let mut combined = aggregate;
    ensure_survey_column(&mut combined)?;
    append_rows(&mut combined, &expansion.rows);

    Ok(MergeResult {
        combined,
        new_rows: expansion.rows,
        original_rows,
    })
}

/// Load both inputs, merge them and write `<output_path>_<MMDDYYYY>.csv`
pub fn combine_survey_data(config: &MergeConfig, date: NaiveDate) -> Result<MergeSummary> {
    info!(path = %config.district_file.display(), "reading aggregate file");
    let aggregate = read_table(&config.district_file, 0)?;

    info!(path = %config.raw_file.display(), "reading raw export");
    let raw = read_table(&config.raw_file, RAW_EXPORT_SKIP_ROWS)?;

    let result = merge_tables(aggregate, &raw, &config.batch)?;

    let output_file = dated_output_path(&config.output_path, date);
    info!(path = %output_file.display(), rows = result.combined.len(), "writing combined data");
    write_table(&result.combined, &output_file)?;

    Ok(MergeSummary::new(
        result.original_rows,
        &result.new_rows,
        output_file,
    ))
}
