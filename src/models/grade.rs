//! Grade and class models.
//!
//! A grade defines how many weekly hours of each lecture its classes need.
//! A class belongs to exactly one grade and needs its own timetable meeting
//! those hours.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A grade (year level) with per-lecture weekly hour requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    /// Unique grade identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Lecture ID → required weekly hours. Zero entries are ignored.
    #[serde(default)]
    pub required_lectures: BTreeMap<String, u32>,
}

/// A class (group of students) attending one grade's lectures together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Unique class identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Grade this class belongs to.
    #[serde(rename = "grade")]
    pub grade_id: String,
    /// Number of students, used against room capacity.
    #[serde(default)]
    pub size: Option<u32>,
}

impl Grade {
    /// Creates a grade with no requirements.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_lectures: BTreeMap::new(),
        }
    }

    /// Sets the grade name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly hours required for a lecture.
    pub fn with_requirement(mut self, lecture_id: impl Into<String>, hours: u32) -> Self {
        self.required_lectures.insert(lecture_id.into(), hours);
        self
    }

    /// Non-zero requirements in lecture ID order.
    pub fn requirements(&self) -> impl Iterator<Item = (&str, u32)> {
        self.required_lectures
            .iter()
            .filter(|(_, &hours)| hours > 0)
            .map(|(id, &hours)| (id.as_str(), hours))
    }

    /// Total weekly hours across all lectures.
    pub fn total_hours(&self) -> u32 {
        self.requirements().map(|(_, h)| h).sum()
    }
}

impl Class {
    /// Creates a class of the given grade.
    pub fn new(id: impl Into<String>, grade_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            grade_id: grade_id.into(),
            size: None,
        }
    }

    /// Sets the class name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of students.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_requirements_skip_zero() {
        let g = Grade::new("G1")
            .with_requirement("math", 3)
            .with_requirement("art", 0)
            .with_requirement("biology", 2);

        let reqs: Vec<_> = g.requirements().collect();
        assert_eq!(reqs, vec![("biology", 2), ("math", 3)]);
        assert_eq!(g.total_hours(), 5);
    }

    #[test]
    fn test_class_json_uses_grade_key() {
        let c: Class = serde_json::from_str(r#"{"id":"C1","name":"1A","grade":"G1"}"#).unwrap();
        assert_eq!(c.grade_id, "G1");
        assert_eq!(c.size, None);
    }

    #[test]
    fn test_grade_json_camel_case() {
        let g: Grade = serde_json::from_str(
            r#"{"id":"G1","name":"First","requiredLectures":{"math":3,"science":2}}"#,
        )
        .unwrap();
        assert_eq!(g.required_lectures.get("math"), Some(&3));
        assert_eq!(g.total_hours(), 5);
    }
}
