//! Input validation for timetabling requests.
//!
//! Checks referential integrity of the supplied entities before any
//! scheduling work is done. Detects:
//! - Duplicate IDs (per entity kind) and duplicate time slots
//! - Teachers without capabilities
//! - References to unknown lectures, rooms, or grades
//! - An empty week grid
//!
//! All problems are collected and reported together.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::request::ScheduleRequest;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending entity ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// The same `(day, period)` appears twice in the week grid.
    DuplicateTimeSlot,
    /// A teacher has no lecture capabilities.
    NoCapabilities,
    /// A reference points to a lecture that doesn't exist.
    UnknownLecture,
    /// A teacher's home room doesn't exist.
    UnknownRoom,
    /// A class references a grade that doesn't exist.
    UnknownGrade,
    /// The week grid has no slots.
    EmptyWeek,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a timetabling request.
///
/// Checks:
/// 1. No duplicate lecture, room, teacher, grade, or class IDs
/// 2. No duplicate time slots, and at least one slot
/// 3. Every teacher has at least one capability
/// 4. Teacher capabilities and grade requirements reference existing lectures
/// 5. Teacher home rooms reference existing rooms
/// 6. Classes reference existing grades
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &ScheduleRequest) -> ValidationResult {
    let mut errors = Vec::new();

    let lecture_ids = collect_ids(
        request.lectures.iter().map(|l| l.id.as_str()),
        "lecture",
        &mut errors,
    );
    let room_ids = collect_ids(
        request.rooms.iter().map(|r| r.id.as_str()),
        "room",
        &mut errors,
    );
    collect_ids(
        request.teachers.iter().map(|t| t.id.as_str()),
        "teacher",
        &mut errors,
    );
    let grade_ids = collect_ids(request.grades.iter().map(|g| g.id.as_str()), "grade", &mut errors);
    collect_ids(request.classes.iter().map(|c| c.id.as_str()), "class", &mut errors);

    if request.time_slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyWeek,
            "",
            "Week grid has no time slots",
        ));
    }
    // Slots are sorted, so duplicates are adjacent
    for pair in request.time_slots.slots().windows(2) {
        if pair[0] == pair[1] {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTimeSlot,
                format!("{}:{}", pair[0].day, pair[0].period),
                format!("Duplicate time slot: {}", pair[0]),
            ));
        }
    }

    for teacher in &request.teachers {
        if teacher.capabilities.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoCapabilities,
                &teacher.id,
                format!("Teacher '{}' has no capabilities", teacher.id),
            ));
        }
        for lecture in &teacher.capabilities {
            if !lecture_ids.contains(lecture.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownLecture,
                    &teacher.id,
                    format!("Teacher '{}' references unknown lecture '{}'", teacher.id, lecture),
                ));
            }
        }
        if let Some(room) = &teacher.assigned_room {
            if !room_ids.contains(room.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownRoom,
                    &teacher.id,
                    format!("Teacher '{}' references unknown room '{}'", teacher.id, room),
                ));
            }
        }
    }

    for grade in &request.grades {
        for lecture in grade.required_lectures.keys() {
            if !lecture_ids.contains(lecture.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownLecture,
                    &grade.id,
                    format!("Grade '{}' requires unknown lecture '{}'", grade.id, lecture),
                ));
            }
        }
    }

    for class in &request.classes {
        if !grade_ids.contains(class.grade_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownGrade,
                &class.id,
                format!("Class '{}' references unknown grade '{}'", class.id, class.grade_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                id,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Grade, Lecture, Room, Teacher, TimeSlot, WeekGrid};

    fn sample_request() -> ScheduleRequest {
        ScheduleRequest::new(WeekGrid::uniform(5, 2))
            .with_lecture(Lecture::new("math", "Math"))
            .with_lecture(Lecture::new("sci", "Science"))
            .with_room(Room::new("R1"))
            .with_teacher(Teacher::new("T1").with_capability("math").with_room("R1"))
            .with_teacher(Teacher::new("T2").with_capability("sci"))
            .with_grade(Grade::new("G1").with_requirement("math", 3).with_requirement("sci", 2))
            .with_class(Class::new("C1", "G1"))
    }

    fn kinds(request: &ScheduleRequest) -> Vec<ValidationErrorKind> {
        validate_request(request)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_request(&sample_request()).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let req = sample_request()
            .with_room(Room::new("R1"))
            .with_class(Class::new("C1", "G1"));
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::DuplicateId)
                .count(),
            2
        );
        assert!(errors.iter().any(|e| e.message.contains("room")));
    }

    #[test]
    fn test_duplicate_time_slot() {
        let req = sample_request().with_time_slots(WeekGrid::new(vec![
            TimeSlot::new(0, 0),
            TimeSlot::new(0, 1),
            TimeSlot::new(0, 0).with_label("again"),
        ]));
        assert!(kinds(&req).contains(&ValidationErrorKind::DuplicateTimeSlot));
    }

    #[test]
    fn test_empty_week() {
        let req = sample_request().with_time_slots(WeekGrid::new(Vec::new()));
        assert_eq!(kinds(&req), vec![ValidationErrorKind::EmptyWeek]);
    }

    #[test]
    fn test_teacher_without_capabilities() {
        let req = sample_request().with_teacher(Teacher::new("T3"));
        assert_eq!(kinds(&req), vec![ValidationErrorKind::NoCapabilities]);
    }

    #[test]
    fn test_unknown_references() {
        let req = sample_request()
            .with_teacher(Teacher::new("T3").with_capability("art").with_room("R9"))
            .with_grade(Grade::new("G2").with_requirement("music", 1))
            .with_class(Class::new("C2", "G9"));
        let k = kinds(&req);
        assert_eq!(
            k.iter()
                .filter(|&k| *k == ValidationErrorKind::UnknownLecture)
                .count(),
            2
        );
        assert!(k.contains(&ValidationErrorKind::UnknownRoom));
        assert!(k.contains(&ValidationErrorKind::UnknownGrade));
    }
}
