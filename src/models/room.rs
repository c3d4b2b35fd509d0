//! Room model.
//!
//! Rooms are the shared, exclusive spaces lectures take place in. A room
//! hosts at most one lecture per time slot and may declare a seating
//! capacity that bounds the size of the class it hosts.

use serde::{Deserialize, Serialize};

/// A room that lectures can be held in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Number of seats. `None` = unbounded.
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Room {
    /// Creates a room with no declared capacity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: None,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Whether a class of the given size fits.
    ///
    /// Returns `true` when either side is unknown: the capacity constraint
    /// only applies when both the room capacity and the class size are present.
    pub fn fits(&self, class_size: Option<u32>) -> bool {
        match (self.capacity, class_size) {
            (Some(capacity), Some(size)) => size <= capacity,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R1").with_name("Lab").with_capacity(24);
        assert_eq!(r.id, "R1");
        assert_eq!(r.name, "Lab");
        assert_eq!(r.capacity, Some(24));
    }

    #[test]
    fn test_room_fits() {
        let lab = Room::new("R1").with_capacity(24);
        assert!(lab.fits(Some(24)));
        assert!(!lab.fits(Some(25)));
        assert!(lab.fits(None));

        let hall = Room::new("R2");
        assert!(hall.fits(Some(500)));
    }

    #[test]
    fn test_room_json_without_capacity() {
        let r: Room = serde_json::from_str(r#"{"id":"1","name":"A"}"#).unwrap();
        assert_eq!(r.capacity, None);
    }
}
