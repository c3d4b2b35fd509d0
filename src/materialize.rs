//! Assignment set to per-class weekly grids.
//!
//! The solver produces a flat list of [`Assignment`]s; the presentation
//! layer wants one grid per class, ordered by time slot, with display
//! names filled in. Before building the grids, the assignment count of
//! every demand is checked against its required hours. A mismatch means
//! the search produced a wrong result and is reported as
//! [`TimetableError::IncompleteAssignmentSet`].

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TimetableError};
use crate::graph::ConstraintGraph;
use crate::models::{Assignment, ClassTimetable, Timetable, TimetableEntry};
use crate::request::ScheduleRequest;

/// A demand that did not receive exactly its required hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandShortfall {
    /// Class ID.
    pub class_id: String,
    /// Lecture ID.
    pub lecture_id: String,
    /// Required weekly hours (0 for assignments matching no demand).
    pub required: u32,
    /// Hours actually assigned.
    pub assigned: u32,
}

impl fmt::Display for DemandShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class '{}' has {} of {} required hour(s) of '{}'",
            self.class_id, self.assigned, self.required, self.lecture_id
        )
    }
}

/// Builds the per-class timetable from a complete assignment set.
///
/// Every class of the graph gets a grid, including classes with no
/// lectures. Grids are ordered by class ID and entries by time slot.
pub fn materialize(
    request: &ScheduleRequest,
    graph: &ConstraintGraph,
    assignments: &[Assignment],
) -> Result<Timetable> {
    let shortfalls = shortfalls(graph, assignments);
    if !shortfalls.is_empty() {
        return Err(TimetableError::IncompleteAssignmentSet(shortfalls));
    }

    let mut grids: Vec<ClassTimetable> = graph
        .class_ids()
        .iter()
        .map(|class_id| {
            let class = request.class(class_id);
            ClassTimetable {
                class_id: class_id.clone(),
                class_name: class.map(|c| c.name.clone()).unwrap_or_default(),
                grade_id: class.map(|c| c.grade_id.clone()).unwrap_or_default(),
                entries: Vec::new(),
            }
        })
        .collect();
    let grid_index: HashMap<&str, usize> = graph
        .class_ids()
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    for assignment in assignments {
        let Some(&g) = grid_index.get(assignment.class_id.as_str()) else {
            continue;
        };
        grids[g].entries.push(TimetableEntry {
            slot: assignment.slot.clone(),
            lecture_id: assignment.lecture_id.clone(),
            lecture_name: request
                .lecture(&assignment.lecture_id)
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            teacher_id: assignment.teacher_id.clone(),
            teacher_name: request
                .teacher(&assignment.teacher_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            room_id: assignment.room_id.clone(),
            room_name: request
                .room(&assignment.room_id)
                .map(|r| r.name.clone())
                .unwrap_or_default(),
        });
    }

    for grid in &mut grids {
        grid.entries.sort_by(|a, b| a.slot.cmp(&b.slot));
    }

    Ok(Timetable { classes: grids })
}

/// Demands whose assignment count differs from their required hours.
fn shortfalls(graph: &ConstraintGraph, assignments: &[Assignment]) -> Vec<DemandShortfall> {
    let mut counts: HashMap<(&str, &str), u32> = HashMap::new();
    for a in assignments {
        *counts
            .entry((a.class_id.as_str(), a.lecture_id.as_str()))
            .or_insert(0) += 1;
    }

    let mut result = Vec::new();
    for demand in graph.demands() {
        let assigned = counts
            .remove(&(demand.class_id.as_str(), demand.lecture_id.as_str()))
            .unwrap_or(0);
        if assigned != demand.required {
            result.push(DemandShortfall {
                class_id: demand.class_id.clone(),
                lecture_id: demand.lecture_id.clone(),
                required: demand.required,
                assigned,
            });
        }
    }

    // Assignments for no known demand
    let mut extra: Vec<_> = counts.into_iter().collect();
    extra.sort();
    result.extend(extra.into_iter().map(|((class_id, lecture_id), assigned)| {
        DemandShortfall {
            class_id: class_id.to_string(),
            lecture_id: lecture_id.to_string(),
            required: 0,
            assigned,
        }
    }));
    result
}
