//! Validated attendee records

use crate::{Result, RosterError};

/// Tag category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Small tag
    Student,
    /// Big tag
    NonStudent,
}

impl Category {
    pub fn of(is_student: bool) -> Self {
        if is_student {
            Category::Student
        } else {
            Category::NonStudent
        }
    }

    /// Students get the small tag layout
    pub fn is_small(&self) -> bool {
        matches!(self, Category::Student)
    }

    /// File name suffix for individually rendered tags
    pub fn suffix(&self) -> &'static str {
        match self {
            Category::Student => "small",
            Category::NonStudent => "big",
        }
    }
}

/// One attendee
///
/// Only constructible with a non-empty name and detail; all text is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    name: String,
    group: String,
    detail: String,
    is_student: bool,
}

impl PersonRecord {
    pub fn new(name: &str, group: &str, detail: &str, is_student: bool) -> Result<Self> {
        let name = name.trim();
        let detail = detail.trim();
        if name.is_empty() {
            return Err(RosterError::InvalidRecord("name is empty".to_string()));
        }
        if detail.is_empty() {
            return Err(RosterError::InvalidRecord("detail is empty".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            group: group.trim().to_string(),
            detail: detail.to_string(),
            is_student,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group (church) text, empty when absent
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn has_group(&self) -> bool {
        !self.group.is_empty()
    }

    /// Free-form age/grade/role text
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_student(&self) -> bool {
        self.is_student
    }

    pub fn category(&self) -> Category {
        Category::of(self.is_student)
    }
}

/// Split records into (students, non-students), keeping roster order
pub fn split_by_category(people: &[PersonRecord]) -> (Vec<&PersonRecord>, Vec<&PersonRecord>) {
    people.iter().partition(|p| p.is_student())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_trims_fields() {
        let person = PersonRecord::new("  홍길동 ", " 은혜교회 ", " 5학년\n", true).unwrap();
        assert_eq!(person.name(), "홍길동");
        assert_eq!(person.group(), "은혜교회");
        assert_eq!(person.detail(), "5학년");
        assert_eq!(person.category(), Category::Student);
    }

    #[test]
    fn test_blank_group_is_absent() {
        let person = PersonRecord::new("Kim", "   ", "Teacher", false).unwrap();
        assert!(!person.has_group());
        assert_eq!(person.group(), "");
    }

    #[test]
    fn test_required_fields() {
        assert!(PersonRecord::new(" ", "", "Teacher", false).is_err());
        assert!(PersonRecord::new("Kim", "", "", false).is_err());
    }

    #[test]
    fn test_category() {
        assert!(Category::Student.is_small());
        assert!(!Category::NonStudent.is_small());
        assert_eq!(Category::Student.suffix(), "small");
        assert_eq!(Category::NonStudent.suffix(), "big");
    }

    #[test]
    fn test_split_keeps_order() {
        let people = vec![
            PersonRecord::new("A", "", "1", true).unwrap(),
            PersonRecord::new("B", "", "2", false).unwrap(),
            PersonRecord::new("C", "", "3", true).unwrap(),
        ];
        let (students, others) = split_by_category(&people);
        let names: Vec<&str> = students.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name(), "B");
    }
}
