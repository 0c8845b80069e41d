//! Generation request schema

use crate::{NametagError, Result};
use roster::{validate_rows, PersonRecord, RawRow};
use serde::{Deserialize, Serialize};

fn default_student_width_mm() -> f64 {
    85.0
}

fn default_non_student_width_mm() -> f64 {
    100.0
}

/// One uploaded background template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Uploaded file name
    #[serde(default)]
    pub name: String,
    /// Data URI (`data:image/png;base64,...`) or bare base64
    #[serde(alias = "dataUri")]
    pub data: String,
}

impl TemplateFile {
    pub fn new(name: &str, data: &str) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_string(),
        }
    }
}

/// Request for one batch of name tags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Roster rows, validated before anything renders
    #[serde(alias = "personRecords", default)]
    pub person_data: Vec<RawRow>,

    /// Templates for non-student (big) tags
    #[serde(alias = "bigTemplates", default)]
    pub big_nametag_files: Vec<TemplateFile>,

    /// Templates for student (small) tags
    #[serde(alias = "smallTemplates", default)]
    pub small_nametag_files: Vec<TemplateFile>,

    /// Pack tags onto A4 sheets instead of one file per person
    #[serde(default)]
    pub use_arranged_layout: bool,

    #[serde(default = "default_student_width_mm")]
    pub student_width_mm: f64,

    #[serde(default = "default_non_student_width_mm")]
    pub non_student_width_mm: f64,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            person_data: Vec::new(),
            big_nametag_files: Vec::new(),
            small_nametag_files: Vec::new(),
            use_arranged_layout: false,
            student_width_mm: default_student_width_mm(),
            non_student_width_mm: default_non_student_width_mm(),
        }
    }
}

impl GenerationRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check request-level preconditions and validate the roster
    ///
    /// At least one template across both pools is required; a category
    /// without templates is skipped later rather than rejected here.
    pub fn people(&self) -> Result<Vec<PersonRecord>> {
        if self.person_data.is_empty() {
            return Err(NametagError::InvalidRequest(
                "No person data provided".to_string(),
            ));
        }
        if self.big_nametag_files.is_empty() && self.small_nametag_files.is_empty() {
            return Err(NametagError::InvalidRequest(
                "No nametag template files provided".to_string(),
            ));
        }
        for (name, width) in [
            ("studentWidthMm", self.student_width_mm),
            ("nonStudentWidthMm", self.non_student_width_mm),
        ] {
            if !width.is_finite() || width <= 0.0 {
                return Err(NametagError::InvalidRequest(format!(
                    "{name} must be positive, got {width}"
                )));
            }
        }

        Ok(validate_rows(&self.person_data)?)
    }
}
