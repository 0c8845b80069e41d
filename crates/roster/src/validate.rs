//! Roster row validation

use crate::record::PersonRecord;
use crate::row::RawRow;
use crate::{Result, RosterError};
use std::fmt;

/// Rows before the first data row: 1-based line numbers plus the header
pub const HEADER_ROWS: usize = 2;

/// Required roster column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Detail,
    Student,
}

impl Field {
    /// Spreadsheet header for the column
    pub fn header(&self) -> &'static str {
        match self {
            Field::Name => "성명",
            Field::Detail => "나이/학년/직책",
            Field::Student => "학생 여부",
        }
    }
}

/// First missing required field of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowError {
    /// Spreadsheet line number (header is line 1)
    pub row: usize,
    pub field: Field,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {} is empty", self.row, self.field.header())
    }
}

fn is_blank(cell: &Option<String>) -> bool {
    cell.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Validate one row; `index` is its 0-based position among data rows
///
/// Checks name, detail, then the student marker, reporting the first blank one.
pub fn validate_row(row: &RawRow, index: usize) -> std::result::Result<PersonRecord, RowError> {
    let line = index + HEADER_ROWS;
    let missing = |field| RowError { row: line, field };

    if is_blank(&row.name) {
        return Err(missing(Field::Name));
    }
    if is_blank(&row.detail) {
        return Err(missing(Field::Detail));
    }
    if is_blank(&row.student) {
        return Err(missing(Field::Student));
    }

    PersonRecord::new(
        row.name.as_deref().unwrap_or_default(),
        row.group.as_deref().unwrap_or_default(),
        row.detail.as_deref().unwrap_or_default(),
        row.is_student(),
    )
    .map_err(|_| missing(Field::Name))
}

/// Validate every row, collecting all failures
///
/// Returns the records only when no row failed.
pub fn validate_rows(rows: &[RawRow]) -> Result<Vec<PersonRecord>> {
    let mut people = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match validate_row(row, index) {
            Ok(person) => people.push(person),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(people)
    } else {
        Err(RosterError::Validation(errors))
    }
}
