use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;
use crate::types::{Result, Table, ROW_IDS_COLUMN};

static ROW_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Row(\d+)$").unwrap());

/// Number part of a `Row<n>` identifier
pub fn parse_row_number(value: &str) -> Option<u64> {
    ROW_ID_PATTERN
        .captures(value.trim())
        .and_then(|caps| caps[1].parse().ok())
}

pub fn format_row_id(number: u64) -> String {
    format!("Row{}", number)
}

/// One past the highest `Row<n>` in the aggregate table.
///
/// An aggregate table without rows starts numbering at 1. A highest id of
/// `u64::MAX` leaves nothing to number from and is reported as invalid.
pub fn next_row_number(aggregate: &Table) -> Result<u64> {
    let column = aggregate.require_column(ROW_IDS_COLUMN)?;

    // (number, line) of the highest id seen
    let mut max: Option<(u64, usize)> = None;
    for (row, value) in aggregate.column_values(column).enumerate() {
        let number = parse_row_number(value).ok_or_else(|| Error::InvalidRowId {
            line: row + 1,
            value: value.to_string(),
        })?;
        if max.map_or(true, |(m, _)| number > m) {
            max = Some((number, row + 1));
        }
    }

    match max {
        None => Ok(1),
        Some((number, line)) => number.checked_add(1).ok_or_else(|| Error::InvalidRowId {
            line,
            value: format_row_id(number),
        }),
    }
}

/// Hands out one `Row<n>` id per (school, year) combination.
/// The same combination always gets the same id.
#[derive(Debug, Clone)]
pub struct RowIdAllocator {
    /// `None` once `Row18446744073709551615` has been handed out
    next: Option<u64>,
    assigned: HashMap<(String, String), String>,
}

impl RowIdAllocator {
    /// Start allocating at `next`
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: Some(next),
            assigned: HashMap::new(),
        }
    }

    /// Start allocating just above the aggregate table's highest id
    pub fn for_aggregate(aggregate: &Table) -> Result<Self> {
        Ok(Self::starting_at(next_row_number(aggregate)?))
    }

    /// Id for the combination, allocating a fresh one on first sight.
    ///
    /// Fails when the id space above the starting number is used up.
    pub fn assign(&mut self, school: &str, year: &str) -> Result<String> {
        let key = (school.to_string(), year.to_string());
        if let Some(id) = self.assigned.get(&key) {
            return Ok(id.clone());
        }

        let number = self.next.ok_or_else(|| {
            Error::InvalidInput(format!(
                "no row ids left after {} for {} ({})",
                format_row_id(u64::MAX),
                school,
                year
            ))
        })?;
        let id = format_row_id(number);
        self.next = number.checked_add(1);
        self.assigned.insert(key, id.clone());
        Ok(id)
    }

    /// Number of combinations seen so far
    pub fn count(&self) -> usize {
        self.assigned.len()
    }
}
