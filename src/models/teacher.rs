//! Teacher model.
//!
//! A teacher holds a set of lecture capabilities and optionally a home room.
//! Teachers with a home room always teach there; teachers without one may
//! use any room large enough for the class.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A teacher that can be assigned to lectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Lecture IDs this teacher can teach. Must be non-empty.
    pub capabilities: BTreeSet<String>,
    /// Home room ID. The form layer stores `""` for "no room".
    #[serde(default, deserialize_with = "empty_as_none")]
    pub assigned_room: Option<String>,
}

impl Teacher {
    /// Creates a teacher with no capabilities and no home room.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capabilities: BTreeSet::new(),
            assigned_room: None,
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a lecture capability.
    pub fn with_capability(mut self, lecture_id: impl Into<String>) -> Self {
        self.capabilities.insert(lecture_id.into());
        self
    }

    /// Sets the home room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.assigned_room = Some(room_id.into());
        self
    }

    /// Whether this teacher can teach the given lecture.
    pub fn can_teach(&self, lecture_id: &str) -> bool {
        self.capabilities.contains(lecture_id)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new("T1")
            .with_name("Ada")
            .with_capability("math")
            .with_capability("physics")
            .with_room("R1");

        assert!(t.can_teach("math"));
        assert!(t.can_teach("physics"));
        assert!(!t.can_teach("art"));
        assert_eq!(t.assigned_room.as_deref(), Some("R1"));
    }

    #[test]
    fn test_empty_assigned_room_is_none() {
        let t: Teacher = serde_json::from_str(
            r#"{"id":"T1","name":"Ada","capabilities":["math"],"assignedRoom":""}"#,
        )
        .unwrap();
        assert_eq!(t.assigned_room, None);
    }

    #[test]
    fn test_missing_assigned_room_is_none() {
        let t: Teacher =
            serde_json::from_str(r#"{"id":"T1","capabilities":["math"]}"#).unwrap();
        assert_eq!(t.assigned_room, None);
        assert_eq!(t.name, "");
    }

    #[test]
    fn test_assigned_room_roundtrip_name() {
        let t = Teacher::new("T1").with_capability("math").with_room("R9");
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"assignedRoom\":\"R9\""));
    }
}
