//! Solve outcomes and failure diagnostics.

use serde::Serialize;
use std::fmt;

use crate::models::Timetable;

/// Identifies a demand in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandRef {
    /// Class ID.
    pub class_id: String,
    /// Lecture ID.
    pub lecture_id: String,
}

impl fmt::Display for DemandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class_id, self.lecture_id)
    }
}

/// The search space was exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unsatisfiable {
    /// Classes of the component that could not be scheduled.
    pub classes: Vec<String>,
    /// Demand that ran out of candidates at the deepest search level.
    pub demand: Option<DemandRef>,
    /// Placement attempts made before giving up.
    pub nodes: u64,
}

impl fmt::Display for Unsatisfiable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no timetable exists for classes [{}]", self.classes.join(", "))?;
        if let Some(demand) = &self.demand {
            write!(f, "; '{demand}' ran out of candidates")?;
        }
        write!(f, " after {} nodes", self.nodes)
    }
}

/// The search was stopped before it finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interruption {
    /// Why the search stopped.
    pub reason: String,
    /// Placement attempts made.
    pub nodes: u64,
    /// Milliseconds spent.
    pub elapsed_ms: u64,
    /// Lecture hours placed when stopped.
    pub placed: usize,
    /// Lecture hours to place in total.
    pub total: usize,
    /// Demand being placed when stopped.
    pub demand: Option<DemandRef>,
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} nodes in {}ms ({}/{} hours placed",
            self.reason, self.nodes, self.elapsed_ms, self.placed, self.total
        )?;
        if let Some(demand) = &self.demand {
            write!(f, ", at '{demand}'")?;
        }
        f.write_str(")")
    }
}

/// Search statistics of a successful solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    /// Placement attempts.
    pub nodes: u64,
    /// Placements undone.
    pub backtracks: u64,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
    /// Independent components searched.
    pub components: usize,
    /// Lecture hours placed.
    pub assignments: usize,
}

/// A verified timetable with its search statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Per-class weekly grids.
    pub timetable: Timetable,
    /// How the search went.
    pub stats: SolveStats,
}
