use crate::types::ColumnKind;

/// Missing value tokens, matched exactly after trimming
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Column kind inference state for one raw column
#[derive(Debug, Clone, Default)]
pub struct ColumnKindInferencer {
    /// Set once a value fails to parse as a number
    saw_text: bool,
}

impl ColumnKindInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for kind inference
    pub fn observe(&mut self, value: &str) {
        if is_missing(value) {
            return;
        }

        if !self.saw_text && parse_numeric(value).is_none() {
            self.saw_text = true;
        }
    }

    /// A column with no values at all reads as numeric (every cell is missing)
    pub fn kind(&self) -> ColumnKind {
        if self.saw_text {
            ColumnKind::Text
        } else {
            ColumnKind::Numeric
        }
    }
}

/// Infer the kind of a whole column
pub fn infer_column_kind<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let mut inferencer = ColumnKindInferencer::new();
    for value in values {
        inferencer.observe(value);
    }
    inferencer.kind()
}

/// Check if a value represents a missing value
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.contains(&trimmed)
}

/// Parse a finite number, ignoring surrounding whitespace.
///
/// Numbers whose integer part does not fit in an `i64` are rejected, so a
/// column holding one is read as text and passes through verbatim.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && fits_i64(n.trunc()))
}

/// `i64::MIN` is exactly representable; `i64::MAX as f64` rounds up to 2^63
fn fits_i64(n: f64) -> bool {
    n >= i64::MIN as f64 && n < i64::MAX as f64
}
