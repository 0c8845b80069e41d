//! Raw spreadsheet rows

use crate::{Result, RosterError};
use serde::{Deserialize, Deserializer, Serialize};

/// Marker value in the student column that means "student"
pub const STUDENT_MARKER: &str = "T";

/// One roster row, keyed by the spreadsheet header names
///
/// Missing cells are `None`. Numeric and boolean cells are stringified the way
/// a spreadsheet export prints them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "성명", alias = "name", default, deserialize_with = "cell")]
    pub name: Option<String>,

    #[serde(rename = "교회", alias = "group", default, deserialize_with = "cell")]
    pub group: Option<String>,

    #[serde(
        rename = "나이/학년/직책",
        alias = "detail",
        default,
        deserialize_with = "cell"
    )]
    pub detail: Option<String>,

    #[serde(rename = "학생 여부", alias = "student", default, deserialize_with = "cell")]
    pub student: Option<String>,
}

impl RawRow {
    pub fn new(name: &str, group: &str, detail: &str, student: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            group: Some(group.to_string()),
            detail: Some(detail.to_string()),
            student: Some(student.to_string()),
        }
    }

    /// True when the student column holds the marker (after trimming)
    pub fn is_student(&self) -> bool {
        self.student.as_deref().map(str::trim) == Some(STUDENT_MARKER)
    }
}

/// Parse rows from a JSON array
pub fn parse_rows(json: &str) -> Result<Vec<RawRow>> {
    serde_json::from_str(json).map_err(|e| RosterError::ParseError(e.to_string()))
}

fn cell<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(if b { "TRUE" } else { "FALSE" }.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
