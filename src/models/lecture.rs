//! Lecture (subject) model.

use serde::{Deserialize, Serialize};

/// A subject that grades require and teachers are capable of teaching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    /// Unique lecture identifier.
    pub id: String,
    /// Human-readable name (e.g., "Math").
    #[serde(default)]
    pub name: String,
}

impl Lecture {
    /// Creates a lecture with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
