//! Roster - attendee records for name tags
//!
//! This crate provides:
//! - The validated [`PersonRecord`] and its [`Category`]
//! - Raw spreadsheet rows as produced by a sheet-to-JSON export
//! - Row validation that reports every bad row before anything renders
//!
//! # Example
//!
//! ```ignore
//! use roster::{parse_rows, validate_rows};
//!
//! let rows = parse_rows(r#"[{"성명": "홍길동", "교회": "", "나이/학년/직책": "5학년", "학생 여부": "T"}]"#)?;
//! let people = validate_rows(&rows)?;
//! assert!(people[0].is_student());
//! ```

mod record;
mod row;
mod validate;

pub use record::{split_by_category, Category, PersonRecord};
pub use row::{parse_rows, RawRow, STUDENT_MARKER};
pub use validate::{validate_row, validate_rows, Field, RowError, HEADER_ROWS};

use thiserror::Error;

/// Errors that can occur during roster processing
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to parse roster: {0}")]
    ParseError(String),

    #[error("Roster has invalid rows:\n{}", format_row_errors(.0))]
    Validation(Vec<RowError>),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

fn format_row_errors(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_rows() {
        let err = RosterError::Validation(vec![
            RowError {
                row: 3,
                field: Field::Name,
            },
            RowError {
                row: 7,
                field: Field::Detail,
            },
        ]);
        let message = err.to_string();
        assert!(message.starts_with("Roster has invalid rows:"));
        assert!(message.contains("row 3: 성명 is empty"));
        assert!(message.contains("row 7: 나이/학년/직책 is empty"));
    }
}
