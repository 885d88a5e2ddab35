use std::collections::HashMap;

use crate::types::{Result, Table, GRADE_GROUP_COLUMN, NAME_COLUMN};

pub const ELEMENTARY: &str = "Elementary";
pub const MIDDLE: &str = "Middle";
pub const HIGH: &str = "High";

/// Grade band from the school name alone.
/// Elementary is checked before Middle; anything else is High.
pub fn classify_by_name(school: &str) -> &'static str {
    if school.contains(ELEMENTARY) {
        ELEMENTARY
    } else if school.contains(MIDDLE) {
        MIDDLE
    } else {
        HIGH
    }
}

/// Resolves a school's grade group, preferring what the aggregate table already says
#[derive(Debug, Clone)]
pub struct GradeGroupResolver<'a> {
    /// School name -> grade group of its first aggregate row
    known: HashMap<&'a str, &'a str>,
}

impl<'a> GradeGroupResolver<'a> {
    pub fn new(aggregate: &'a Table) -> Result<Self> {
        let name_col = aggregate.require_column(NAME_COLUMN)?;
        let grade_col = aggregate.require_column(GRADE_GROUP_COLUMN)?;

        let mut known = HashMap::new();
        for row in 0..aggregate.len() {
            known
                .entry(aggregate.cell(row, name_col))
                .or_insert_with(|| aggregate.cell(row, grade_col));
        }

        Ok(Self { known })
    }

    pub fn resolve(&self, school: &str) -> &'a str {
        self.known
            .get(school)
            .copied()
            .unwrap_or_else(|| classify_by_name(school))
    }

    pub fn is_known(&self, school: &str) -> bool {
        self.known.contains_key(school)
    }
}
