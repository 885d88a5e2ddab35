use crate::inference::{is_missing, parse_numeric};
use crate::types::{ColumnKind, Normalized};

/// Convert a raw survey cell into the aggregate dataset's value convention.
///
/// Numeric scores become `.` followed by the integer part (85.9 -> `.85`).
/// The fraction is truncated, never rounded, to match values already in the
/// aggregate file. `parse_numeric` only accepts numbers whose integer part
/// fits in an `i64`, so the cast below never saturates.
pub fn normalize_value(cell: &str, kind: ColumnKind) -> Normalized {
    if is_missing(cell) {
        return Normalized::Skip;
    }

    match kind {
        ColumnKind::Numeric => match parse_numeric(cell) {
            Some(score) => Normalized::Emit(format!(".{}", score.trunc() as i64)),
            None => Normalized::Skip,
        },
        ColumnKind::Text => Normalized::Emit(cell.to_string()),
    }
}
