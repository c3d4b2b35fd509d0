//! Timetable (solution) model.
//!
//! A timetable is a per-class weekly grid: for every class, the ordered list
//! of time slots it has a lecture in, with the teacher and room for each.
//! Slots without a lecture are simply absent; a timetable need not fill the
//! week.
//!
//! `Timetable::verify` re-checks the hard constraints on any timetable,
//! independent of how it was produced.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::TimeSlot;
use crate::request::ScheduleRequest;

/// A lecture placed at a time slot with a teacher and a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Attending class ID.
    pub class_id: String,
    /// Lecture ID.
    pub lecture_id: String,
    /// Teaching teacher ID.
    pub teacher_id: String,
    /// Room ID.
    pub room_id: String,
    /// Weekly time slot.
    pub slot: TimeSlot,
}

/// One occupied cell of a class's weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Time slot.
    pub slot: TimeSlot,
    /// Lecture ID.
    pub lecture_id: String,
    /// Lecture name (denormalized for display).
    pub lecture_name: String,
    /// Teacher ID.
    pub teacher_id: String,
    /// Teacher name (denormalized for display).
    pub teacher_name: String,
    /// Room ID.
    pub room_id: String,
    /// Room name (denormalized for display).
    pub room_name: String,
}

/// The weekly grid of one class, ordered by time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTimetable {
    /// Class ID.
    pub class_id: String,
    /// Class name.
    pub class_name: String,
    /// Grade the class belongs to.
    pub grade_id: String,
    /// Occupied slots in global slot order.
    pub entries: Vec<TimetableEntry>,
}

/// A complete timetable: one grid per class, ordered by class ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Per-class grids.
    pub classes: Vec<ClassTimetable>,
}

/// A hard-constraint violation found by [`Timetable::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending entity ID (teacher, room, class, or `class/lecture`).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A teacher teaches twice in one slot.
    TeacherDoubleBooked,
    /// A room hosts two lectures in one slot.
    RoomDoubleBooked,
    /// A class attends two lectures in one slot.
    ClassDoubleBooked,
    /// A teacher teaches a lecture outside their capabilities.
    TeacherNotCapable,
    /// A class's weekly hours for a lecture differ from its grade's requirement.
    HoursMismatch,
    /// A class is placed in a room with too few seats.
    CapacityExceeded,
    /// An entry uses a slot that is not part of the week.
    SlotOutsideWeek,
    /// An entry references an entity missing from the request.
    UnknownEntity,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity,
        }
    }

    /// Creates a double-booking violation for a teacher.
    pub fn teacher_double_booked(teacher_id: &str, slot: &TimeSlot) -> Self {
        Self::new(
            ViolationType::TeacherDoubleBooked,
            teacher_id,
            format!("Teacher '{teacher_id}' has two lectures at {slot}"),
            100,
        )
    }

    /// Creates a double-booking violation for a room.
    pub fn room_double_booked(room_id: &str, slot: &TimeSlot) -> Self {
        Self::new(
            ViolationType::RoomDoubleBooked,
            room_id,
            format!("Room '{room_id}' hosts two lectures at {slot}"),
            100,
        )
    }

    /// Creates a double-booking violation for a class.
    pub fn class_double_booked(class_id: &str, slot: &TimeSlot) -> Self {
        Self::new(
            ViolationType::ClassDoubleBooked,
            class_id,
            format!("Class '{class_id}' attends two lectures at {slot}"),
            100,
        )
    }

    /// Creates an hours mismatch violation.
    pub fn hours_mismatch(class_id: &str, lecture_id: &str, required: u32, actual: u32) -> Self {
        Self::new(
            ViolationType::HoursMismatch,
            format!("{class_id}/{lecture_id}"),
            format!(
                "Class '{class_id}' has {actual} weekly hours of '{lecture_id}', grade requires {required}"
            ),
            90,
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid for a class.
    pub fn for_class(&self, class_id: &str) -> Option<&ClassTimetable> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }

    /// All entries taught by a teacher, as `(class_id, entry)` in class order.
    pub fn entries_for_teacher(&self, teacher_id: &str) -> Vec<(&str, &TimetableEntry)> {
        self.classes
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.class_id.as_str(), e)))
            .filter(|(_, e)| e.teacher_id == teacher_id)
            .collect()
    }

    /// All entries held in a room, as `(class_id, entry)` in class order.
    pub fn entries_for_room(&self, room_id: &str) -> Vec<(&str, &TimetableEntry)> {
        self.classes
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.class_id.as_str(), e)))
            .filter(|(_, e)| e.room_id == room_id)
            .collect()
    }

    /// Flattens the grids back into assignments.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.classes
            .iter()
            .flat_map(|c| {
                c.entries.iter().map(move |e| Assignment {
                    class_id: c.class_id.clone(),
                    lecture_id: e.lecture_id.clone(),
                    teacher_id: e.teacher_id.clone(),
                    room_id: e.room_id.clone(),
                    slot: e.slot.clone(),
                })
            })
            .collect()
    }

    /// Total number of occupied class slots.
    pub fn assignment_count(&self) -> usize {
        self.classes.iter().map(|c| c.entries.len()).sum()
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes to indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Checks every hard constraint against the request.
    ///
    /// Checks:
    /// 1. No teacher, room, or class is used twice in one slot
    /// 2. Every teacher is capable of the lecture they teach
    /// 3. Each class has exactly its grade's hours per lecture
    /// 4. Rooms with a capacity fit the class size, when known
    /// 5. Every slot belongs to the request's week grid
    ///
    /// Returns an empty list for a valid timetable.
    pub fn verify(&self, request: &ScheduleRequest) -> Vec<Violation> {
        let mut violations = Vec::new();

        let teachers: HashMap<&str, _> =
            request.teachers.iter().map(|t| (t.id.as_str(), t)).collect();
        let rooms: HashMap<&str, _> = request.rooms.iter().map(|r| (r.id.as_str(), r)).collect();
        let classes: HashMap<&str, _> =
            request.classes.iter().map(|c| (c.id.as_str(), c)).collect();
        let grades: HashMap<&str, _> = request.grades.iter().map(|g| (g.id.as_str(), g)).collect();

        let mut teacher_busy: HashSet<(&str, (u32, u32))> = HashSet::new();
        let mut room_busy: HashSet<(&str, (u32, u32))> = HashSet::new();
        let mut class_busy: HashSet<(&str, (u32, u32))> = HashSet::new();

        for grid in &self.classes {
            let class = classes.get(grid.class_id.as_str());
            if class.is_none() {
                violations.push(Violation::new(
                    ViolationType::UnknownEntity,
                    &grid.class_id,
                    format!("Timetable contains unknown class '{}'", grid.class_id),
                    100,
                ));
            }

            for entry in &grid.entries {
                let key = entry.slot.key();

                if !request.time_slots.contains(&entry.slot) {
                    violations.push(Violation::new(
                        ViolationType::SlotOutsideWeek,
                        &grid.class_id,
                        format!(
                            "Class '{}' is scheduled at {} outside the week",
                            grid.class_id, entry.slot
                        ),
                        100,
                    ));
                }
                if !class_busy.insert((grid.class_id.as_str(), key)) {
                    violations.push(Violation::class_double_booked(&grid.class_id, &entry.slot));
                }
                if !teacher_busy.insert((entry.teacher_id.as_str(), key)) {
                    violations
                        .push(Violation::teacher_double_booked(&entry.teacher_id, &entry.slot));
                }
                if !room_busy.insert((entry.room_id.as_str(), key)) {
                    violations.push(Violation::room_double_booked(&entry.room_id, &entry.slot));
                }

                match teachers.get(entry.teacher_id.as_str()) {
                    Some(teacher) if !teacher.can_teach(&entry.lecture_id) => {
                        violations.push(Violation::new(
                            ViolationType::TeacherNotCapable,
                            &entry.teacher_id,
                            format!(
                                "Teacher '{}' cannot teach '{}'",
                                entry.teacher_id, entry.lecture_id
                            ),
                            100,
                        ));
                    }
                    Some(_) => {}
                    None => violations.push(Violation::new(
                        ViolationType::UnknownEntity,
                        &entry.teacher_id,
                        format!("Timetable references unknown teacher '{}'", entry.teacher_id),
                        100,
                    )),
                }

                match rooms.get(entry.room_id.as_str()) {
                    Some(room) => {
                        let size = class.and_then(|c| c.size);
                        if !room.fits(size) {
                            violations.push(Violation::new(
                                ViolationType::CapacityExceeded,
                                &entry.room_id,
                                format!(
                                    "Room '{}' seats {:?} but class '{}' has {:?} students",
                                    entry.room_id, room.capacity, grid.class_id, size
                                ),
                                90,
                            ));
                        }
                    }
                    None => violations.push(Violation::new(
                        ViolationType::UnknownEntity,
                        &entry.room_id,
                        format!("Timetable references unknown room '{}'", entry.room_id),
                        100,
                    )),
                }
            }
        }

        // Exact weekly hours per (class, lecture)
        for class in &request.classes {
            let mut actual: BTreeMap<&str, u32> = BTreeMap::new();
            if let Some(grid) = self.for_class(&class.id) {
                for entry in &grid.entries {
                    *actual.entry(entry.lecture_id.as_str()).or_insert(0) += 1;
                }
            }

            let required: BTreeMap<&str, u32> = grades
                .get(class.grade_id.as_str())
                .map(|g| g.requirements().collect())
                .unwrap_or_default();

            for (&lecture_id, &hours) in &required {
                let got = actual.get(lecture_id).copied().unwrap_or(0);
                if got != hours {
                    violations.push(Violation::hours_mismatch(&class.id, lecture_id, hours, got));
                }
            }
            for (&lecture_id, &got) in &actual {
                if !required.contains_key(lecture_id) {
                    violations.push(Violation::hours_mismatch(&class.id, lecture_id, 0, got));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Grade, Lecture, Room, Teacher, WeekGrid};

    fn entry(day: u32, period: u32, lecture: &str, teacher: &str, room: &str) -> TimetableEntry {
        TimetableEntry {
            slot: TimeSlot::new(day, period),
            lecture_id: lecture.into(),
            lecture_name: lecture.into(),
            teacher_id: teacher.into(),
            teacher_name: teacher.into(),
            room_id: room.into(),
            room_name: room.into(),
        }
    }

    fn sample_request() -> ScheduleRequest {
        ScheduleRequest::new(WeekGrid::uniform(1, 4))
            .with_lecture(Lecture::new("math", "Math"))
            .with_room(Room::new("R1").with_capacity(30))
            .with_room(Room::new("R2"))
            .with_teacher(Teacher::new("T1").with_capability("math").with_room("R1"))
            .with_teacher(Teacher::new("T2").with_capability("math"))
            .with_grade(Grade::new("G1").with_requirement("math", 2))
            .with_class(Class::new("A", "G1").with_size(25))
            .with_class(Class::new("B", "G1").with_size(25))
    }

    fn sample_timetable() -> Timetable {
        Timetable {
            classes: vec![
                ClassTimetable {
                    class_id: "A".into(),
                    class_name: String::new(),
                    grade_id: "G1".into(),
                    entries: vec![entry(0, 0, "math", "T1", "R1"), entry(0, 1, "math", "T1", "R1")],
                },
                ClassTimetable {
                    class_id: "B".into(),
                    class_name: String::new(),
                    grade_id: "G1".into(),
                    entries: vec![entry(0, 0, "math", "T2", "R2"), entry(0, 2, "math", "T2", "R2")],
                },
            ],
        }
    }

    #[test]
    fn test_valid_timetable_has_no_violations() {
        let v = sample_timetable().verify(&sample_request());
        assert!(v.is_empty(), "{v:?}");
    }

    #[test]
    fn test_detects_teacher_double_booking() {
        let mut t = sample_timetable();
        t.classes[1].entries[0].teacher_id = "T1".into();
        t.classes[1].entries[0].room_id = "R2".into();
        let v = t.verify(&sample_request());
        assert!(v.iter().any(|x| x.violation_type == ViolationType::TeacherDoubleBooked));
    }

    #[test]
    fn test_detects_room_double_booking() {
        let mut t = sample_timetable();
        t.classes[1].entries[0].room_id = "R1".into();
        let v = t.verify(&sample_request());
        assert!(v.iter().any(|x| x.violation_type == ViolationType::RoomDoubleBooked));
    }

    #[test]
    fn test_detects_class_double_booking_and_hours() {
        let mut t = sample_timetable();
        t.classes[0].entries[1].slot = TimeSlot::new(0, 0);
        t.classes[0].entries[1].teacher_id = "T2".into();
        t.classes[0].entries[1].room_id = "R2".into();
        t.classes[1].entries.clear();
        let v = t.verify(&sample_request());
        assert!(v.iter().any(|x| x.violation_type == ViolationType::ClassDoubleBooked));
        assert!(v
            .iter()
            .any(|x| x.violation_type == ViolationType::HoursMismatch && x.entity_id == "B/math"));
    }

    #[test]
    fn test_detects_capacity_and_slot() {
        let request = sample_request().with_class(Class::new("C", "G1").with_size(40));
        let mut t = sample_timetable();
        t.classes.push(ClassTimetable {
            class_id: "C".into(),
            class_name: String::new(),
            grade_id: "G1".into(),
            entries: vec![entry(0, 3, "math", "T1", "R1"), entry(3, 0, "math", "T1", "R1")],
        });
        let v = t.verify(&request);
        assert!(v.iter().any(|x| x.violation_type == ViolationType::CapacityExceeded));
        assert!(v.iter().any(|x| x.violation_type == ViolationType::SlotOutsideWeek));
    }

    #[test]
    fn test_detects_incapable_teacher() {
        let request = sample_request().with_teacher(Teacher::new("T3").with_capability("art"));
        let mut t = sample_timetable();
        t.classes[1].entries[1].teacher_id = "T3".into();
        let v = t.verify(&request);
        assert!(v.iter().any(|x| x.violation_type == ViolationType::TeacherNotCapable));
    }

    #[test]
    fn test_queries() {
        let t = sample_timetable();
        assert_eq!(t.assignment_count(), 4);
        assert_eq!(t.entries_for_teacher("T1").len(), 2);
        assert_eq!(t.entries_for_room("R2").len(), 2);
        assert_eq!(t.assignments()[2].class_id, "B");
        assert!(t.for_class("Z").is_none());
    }
}
