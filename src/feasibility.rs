//! Pre-flight feasibility checks.
//!
//! Cheap necessary (not sufficient) conditions for a timetable to exist,
//! evaluated on the constraint graph before any search:
//!
//! 1. Every demand has at least one eligible teacher/room pair
//! 2. No class needs more weekly hours than the week has slots
//! 3. No teacher is the sole option for more hours than the week has slots
//! 4. No room is the sole option for more hours than the week has slots
//!
//! Every violated check is reported, in a fixed order, so that repeated
//! runs on the same input produce the same report.

use serde::Serialize;
use std::fmt;

use crate::graph::{ConstraintGraph, UnassignableDemand};

/// A single failed pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check")]
pub enum FeasibilityViolation {
    /// A demand has no eligible teacher/room pair.
    UnassignableDemand(UnassignableDemand),
    /// A class needs more hours than there are slots.
    ClassOverloaded {
        /// Class ID.
        class_id: String,
        /// Total weekly hours required.
        required: u64,
        /// Slots in the week.
        available: usize,
    },
    /// A teacher is the only option for more hours than there are slots.
    TeacherOverloaded {
        /// Teacher ID.
        teacher_id: String,
        /// Hours only this teacher can give.
        required: u64,
        /// Slots in the week.
        available: usize,
        /// `class/lecture` of the demands pinned to this teacher.
        demands: Vec<String>,
    },
    /// A room is the only option for more hours than there are slots.
    RoomOverloaded {
        /// Room ID.
        room_id: String,
        /// Hours only this room can host.
        required: u64,
        /// Slots in the week.
        available: usize,
        /// `class/lecture` of the demands pinned to this room.
        demands: Vec<String>,
    },
}

impl fmt::Display for FeasibilityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnassignableDemand(demand) => write!(f, "{demand}"),
            Self::ClassOverloaded {
                class_id,
                required,
                available,
            } => write!(
                f,
                "class '{class_id}' needs {required} weekly hours but the week has {available} slots"
            ),
            Self::TeacherOverloaded {
                teacher_id,
                required,
                available,
                ..
            } => write!(
                f,
                "teacher '{teacher_id}' is the only option for {required} hours but the week has {available} slots"
            ),
            Self::RoomOverloaded {
                room_id,
                required,
                available,
                ..
            } => write!(
                f,
                "room '{room_id}' is the only option for {required} hours but the week has {available} slots"
            ),
        }
    }
}

/// All failed pre-flight checks for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfeasibilityReport {
    /// Violations in check order.
    pub violations: Vec<FeasibilityViolation>,
}

impl InfeasibilityReport {
    /// Whether no check failed.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of failed checks.
    pub fn len(&self) -> usize {
        self.violations.len()
    }
}

impl fmt::Display for InfeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Runs the pre-flight checks on a constraint graph.
///
/// Stateless; holds no data between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeasibilityChecker;

impl FeasibilityChecker {
    /// Creates a checker.
    pub fn new() -> Self {
        Self
    }

    /// Runs every check and collects all violations.
    pub fn report(&self, graph: &ConstraintGraph) -> InfeasibilityReport {
        let available = graph.slots().len();
        let mut violations: Vec<FeasibilityViolation> = graph
            .unassignable()
            .iter()
            .cloned()
            .map(FeasibilityViolation::UnassignableDemand)
            .collect();

        // Per class: total hours vs. slots
        for (class, class_id) in graph.class_ids().iter().enumerate() {
            let required: u64 = graph
                .demands_of_class(class)
                .iter()
                .map(|&d| graph.demands()[d].required as u64)
                .sum();
            if required > available as u64 {
                violations.push(FeasibilityViolation::ClassOverloaded {
                    class_id: class_id.clone(),
                    required,
                    available,
                });
            }
        }

        // Per teacher: hours of demands only they can serve
        for (teacher, teacher_id) in graph.teacher_ids().iter().enumerate() {
            let pinned: Vec<usize> = graph
                .demands_of_teacher(teacher)
                .iter()
                .copied()
                .filter(|&d| graph.demands()[d].sole_teacher() == Some(teacher))
                .collect();
            let required = pinned_hours(graph, &pinned);
            if required > available as u64 {
                violations.push(FeasibilityViolation::TeacherOverloaded {
                    teacher_id: teacher_id.clone(),
                    required,
                    available,
                    demands: demand_labels(graph, &pinned),
                });
            }
        }

        // Per room: hours of demands only it can host
        for (room, room_id) in graph.room_ids().iter().enumerate() {
            let pinned: Vec<usize> = graph
                .demands_of_room(room)
                .iter()
                .copied()
                .filter(|&d| graph.demands()[d].sole_room() == Some(room))
                .collect();
            let required = pinned_hours(graph, &pinned);
            if required > available as u64 {
                violations.push(FeasibilityViolation::RoomOverloaded {
                    room_id: room_id.clone(),
                    required,
                    available,
                    demands: demand_labels(graph, &pinned),
                });
            }
        }

        InfeasibilityReport { violations }
    }

    /// Runs every check, failing with the full report if any fails.
    pub fn check(&self, graph: &ConstraintGraph) -> Result<(), InfeasibilityReport> {
        let report = self.report(graph);
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

fn pinned_hours(graph: &ConstraintGraph, demands: &[usize]) -> u64 {
    demands
        .iter()
        .map(|&d| graph.demands()[d].required as u64)
        .sum()
}

fn demand_labels(graph: &ConstraintGraph, demands: &[usize]) -> Vec<String> {
    demands
        .iter()
        .map(|&d| {
            let demand = &graph.demands()[d];
            format!("{}/{}", demand.class_id, demand.lecture_id)
        })
        .collect()
}
