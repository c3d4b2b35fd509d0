//! Scheduling request: the full entity set supplied per solve.
//!
//! The JSON shape matches what the form layer stores, with camelCase keys:
//!
//! ```json
//! {
//!   "lectures": [{ "id": "math", "name": "Math" }],
//!   "rooms": [{ "id": "r1", "name": "Room 1" }],
//!   "teachers": [{ "id": "t1", "name": "Ada", "capabilities": ["math"], "assignedRoom": "r1" }],
//!   "grades": [{ "id": "g1", "name": "First", "requiredLectures": { "math": 3 } }],
//!   "classes": [{ "id": "c1", "name": "1A", "grade": "g1" }]
//! }
//! ```
//!
//! `timeSlots` may be omitted, in which case the default school week
//! (5 days x 10 periods) is used.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Class, Grade, Lecture, Room, Teacher, WeekGrid};

/// Input container for timetabling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Subjects.
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    /// Rooms.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Teachers.
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    /// Grades with weekly hour requirements.
    #[serde(default)]
    pub grades: Vec<Grade>,
    /// Classes to build timetables for.
    #[serde(default)]
    pub classes: Vec<Class>,
    /// Available weekly periods.
    #[serde(default)]
    pub time_slots: WeekGrid,
}

impl ScheduleRequest {
    /// Creates an empty request over the given week.
    pub fn new(time_slots: WeekGrid) -> Self {
        Self {
            time_slots,
            ..Default::default()
        }
    }

    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a lecture.
    pub fn with_lecture(mut self, lecture: Lecture) -> Self {
        self.lectures.push(lecture);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a grade.
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grades.push(grade);
        self
    }

    /// Adds a class.
    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    /// Replaces the week grid.
    pub fn with_time_slots(mut self, time_slots: WeekGrid) -> Self {
        self.time_slots = time_slots;
        self
    }

    /// Looks up a lecture by ID.
    pub fn lecture(&self, id: &str) -> Option<&Lecture> {
        self.lectures.iter().find(|l| l.id == id)
    }

    /// Looks up a room by ID.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Looks up a teacher by ID.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Looks up a grade by ID.
    pub fn grade(&self, id: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.id == id)
    }

    /// Looks up a class by ID.
    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }
}
