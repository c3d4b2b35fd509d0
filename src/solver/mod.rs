//! Timetable solver.
//!
//! [`Scheduler`] runs the full pipeline for a [`ScheduleRequest`]:
//!
//! 1. Validate the configuration and the request
//! 2. Build the [`ConstraintGraph`]
//! 3. Run the [`FeasibilityChecker`]; any violation fails before search
//! 4. Backtracking search per independent component
//! 5. Materialize the per-class grids and verify every hard constraint
//!
//! The search is exact: it either finds a timetable meeting every
//! requirement, proves none exists, or stops on the budget. The same input
//! and configuration always yield the same timetable.
//!
//! # Example
//! ```
//! use u_timetable::models::{Class, Grade, Lecture, Room, Teacher, WeekGrid};
//! use u_timetable::request::ScheduleRequest;
//! use u_timetable::solver::Scheduler;
//!
//! let request = ScheduleRequest::new(WeekGrid::uniform(5, 2))
//!     .with_lecture(Lecture::new("math", "Math"))
//!     .with_room(Room::new("R1"))
//!     .with_teacher(Teacher::new("T1").with_capability("math").with_room("R1"))
//!     .with_grade(Grade::new("G1").with_requirement("math", 3))
//!     .with_class(Class::new("1A", "G1"));
//!
//! let solution = Scheduler::default().solve(&request).unwrap();
//! assert_eq!(solution.timetable.assignment_count(), 3);
//! ```

mod config;
mod engine;
mod monitor;
mod occupancy;
mod result;

pub use config::{ConfigError, SolverConfig};
pub use monitor::{SearchBudget, SearchCommand, TerminationReason};
pub use result::{DemandRef, Interruption, Solution, SolveStats, Unsatisfiable};

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use engine::{ComponentOutcome, ComponentSearch, SearchFailure};

use crate::error::{Result, TimetableError};
use crate::feasibility::FeasibilityChecker;
use crate::graph::{Component, ConstraintGraph};
use crate::materialize::materialize;
use crate::models::Assignment;
use crate::request::ScheduleRequest;
use crate::validation::validate_request;

/// Deterministic timetable scheduler.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SolverConfig,
}

impl Scheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves with the configured budget.
    pub fn solve(&self, request: &ScheduleRequest) -> Result<Solution> {
        self.solve_with_budget(request, SearchBudget::from_config(&self.config))
    }

    /// Solves with the configured budget plus a cancellation flag.
    ///
    /// Setting the flag makes the solve return [`TimetableError::Cancelled`]
    /// at the next search step.
    pub fn solve_with_cancel(
        &self,
        request: &ScheduleRequest,
        cancel: Arc<AtomicBool>,
    ) -> Result<Solution> {
        let budget = SearchBudget::from_config(&self.config).with_cancel(cancel);
        self.solve_with_budget(request, budget)
    }

    /// Solves with a caller-built budget.
    pub fn solve_with_budget(
        &self,
        request: &ScheduleRequest,
        budget: SearchBudget,
    ) -> Result<Solution> {
        self.config.validate()?;
        validate_request(request).map_err(TimetableError::InvalidInput)?;
        let graph = ConstraintGraph::build(request);
        self.solve_graph(request, &graph, budget)
    }

    /// Solves on a prebuilt graph.
    ///
    /// `graph` must have been built from `request`, which is expected to be
    /// valid. The graph is only read, so one graph can serve many solves.
    pub fn solve_graph(
        &self,
        request: &ScheduleRequest,
        graph: &ConstraintGraph,
        budget: SearchBudget,
    ) -> Result<Solution> {
        self.config.validate()?;
        let total = graph.total_units() as usize;

        info!(
            event = "solve_start",
            classes = graph.class_ids().len(),
            demands = graph.demands().len(),
            units = total,
            slots = graph.slots().len(),
            components = graph.components().len(),
            time_limit_ms = ?self.config.time_limit_ms,
        );

        if let Err(report) = FeasibilityChecker::new().check(graph) {
            warn!(event = "infeasible", violations = report.len(), report = %report);
            return Err(TimetableError::Infeasible(report));
        }

        if let SearchCommand::Terminate(reason) = budget.search_command(0) {
            return Err(interrupted(reason, &budget, 0, total, None));
        }

        let results = self.search_components(graph, &budget);

        let mut assignments: Vec<Assignment> = Vec::with_capacity(total);
        let mut nodes = 0;
        let mut backtracks = 0;
        for (component, result) in graph.components().iter().zip(results) {
            match result {
                Ok(outcome) => {
                    nodes += outcome.nodes;
                    backtracks += outcome.backtracks;
                    assignments.extend(outcome.assignments);
                }
                Err(SearchFailure::Interrupted {
                    reason,
                    placed,
                    demand,
                }) => {
                    return Err(interrupted(
                        reason,
                        &budget,
                        assignments.len() + placed,
                        total,
                        demand,
                    ));
                }
                Err(SearchFailure::Exhausted { demand, nodes }) => {
                    let detail = Unsatisfiable {
                        classes: class_ids(graph, component),
                        demand,
                        nodes,
                    };
                    warn!(event = "unsatisfiable", detail = %detail);
                    return Err(TimetableError::Unsatisfiable(detail));
                }
            }
        }

        let timetable = materialize(request, graph, &assignments)?;
        let violations = timetable.verify(request);
        if !violations.is_empty() {
            error!(event = "invariant_violation", count = violations.len());
            return Err(TimetableError::InvariantViolation(violations));
        }

        let stats = SolveStats {
            nodes,
            backtracks,
            elapsed_ms: budget.elapsed_ms(),
            components: graph.components().len(),
            assignments: assignments.len(),
        };
        info!(
            event = "solve_end",
            assignments = stats.assignments,
            nodes = stats.nodes,
            backtracks = stats.backtracks,
            duration_ms = stats.elapsed_ms,
        );

        Ok(Solution { timetable, stats })
    }

    /// Searches components in order, stopping at the first failure.
    fn search_components(
        &self,
        graph: &ConstraintGraph,
        budget: &SearchBudget,
    ) -> Vec<std::result::Result<ComponentOutcome, SearchFailure>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel_components && graph.components().len() > 1 {
            return graph
                .components()
                .par_iter()
                .enumerate()
                .map(|(i, component)| self.search_component(graph, i, component, budget))
                .collect();
        }

        let mut results = Vec::with_capacity(graph.components().len());
        for (i, component) in graph.components().iter().enumerate() {
            let result = self.search_component(graph, i, component, budget);
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    fn search_component(
        &self,
        graph: &ConstraintGraph,
        index: usize,
        component: &Component,
        budget: &SearchBudget,
    ) -> std::result::Result<ComponentOutcome, SearchFailure> {
        let search = ComponentSearch::new(graph, component, &self.config);
        debug!(
            event = "component_start",
            component = index,
            demands = component.demands.len(),
            units = search.unit_count(),
        );
        let result = search.run(budget);
        match &result {
            Ok(outcome) => debug!(
                event = "component_end",
                component = index,
                nodes = outcome.nodes,
                backtracks = outcome.backtracks,
            ),
            Err(failure) => debug!(
                event = "component_failed",
                component = index,
                failure = ?failure
            ),
        }
        result
    }
}

fn interrupted(
    reason: TerminationReason,
    budget: &SearchBudget,
    placed: usize,
    total: usize,
    demand: Option<DemandRef>,
) -> TimetableError {
    let detail = Interruption {
        reason: reason.to_string(),
        nodes: budget.nodes(),
        elapsed_ms: budget.elapsed_ms(),
        placed,
        total,
        demand,
    };
    warn!(event = "solve_interrupted", detail = %detail);
    match reason {
        TerminationReason::Cancelled => TimetableError::Cancelled(detail),
        TerminationReason::TimeLimit | TerminationReason::NodeLimit => {
            TimetableError::SolverTimeout(detail)
        }
    }
}

fn class_ids(graph: &ConstraintGraph, component: &Component) -> Vec<String> {
    component
        .classes
        .iter()
        .map(|&c| graph.class_ids()[c].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Grade, Lecture, Room, Teacher, WeekGrid};
    use std::sync::atomic::Ordering;

    fn school() -> ScheduleRequest {
        ScheduleRequest::new(WeekGrid::uniform(5, 4))
            .with_lecture(Lecture::new("math", "Math"))
            .with_lecture(Lecture::new("sci", "Science"))
            .with_lecture(Lecture::new("eng", "English"))
            .with_room(Room::new("R1"))
            .with_room(Room::new("R2"))
            .with_room(Room::new("R3"))
            .with_teacher(Teacher::new("T1").with_capability("math").with_room("R1"))
            .with_teacher(Teacher::new("T2").with_capability("sci").with_room("R2"))
            .with_teacher(Teacher::new("T3").with_capability("eng"))
            .with_grade(
                Grade::new("G1")
                    .with_requirement("math", 4)
                    .with_requirement("sci", 3)
                    .with_requirement("eng", 2),
            )
            .with_class(Class::new("1A", "G1"))
            .with_class(Class::new("1B", "G1"))
    }

    #[test]
    fn test_solve_school() {
        let solution = Scheduler::default().solve(&school()).unwrap();
        assert_eq!(solution.timetable.assignment_count(), 18);
        assert_eq!(solution.stats.assignments, 18);
        assert!(solution.timetable.verify(&school()).is_empty());
    }

    #[test]
    fn test_invalid_input() {
        let request = school().with_class(Class::new("1C", "missing"));
        match Scheduler::default().solve(&request) {
            Err(TimetableError::InvalidInput(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config() {
        let scheduler = Scheduler::new(SolverConfig::default().with_clock_check_interval(3));
        assert!(matches!(
            scheduler.solve(&school()),
            Err(TimetableError::Config(_))
        ));
    }

    #[test]
    fn test_zero_budget() {
        let scheduler = Scheduler::new(SolverConfig::default().with_time_limit_ms(0));
        match scheduler.solve(&school()) {
            Err(TimetableError::SolverTimeout(detail)) => {
                assert_eq!(detail.placed, 0);
                assert_eq!(detail.total, 18);
            }
            other => panic!("expected SolverTimeout, got {other:?}"),
        }

        let scheduler = Scheduler::new(SolverConfig::default().with_node_limit(0));
        assert!(matches!(
            scheduler.solve(&school()),
            Err(TimetableError::SolverTimeout(_))
        ));
    }

    #[test]
    fn test_cancelled() {
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        match Scheduler::default().solve_with_cancel(&school(), flag) {
            Err(err @ TimetableError::Cancelled(_)) => assert!(err.is_retryable()),
            other => panic!("expected Cancelled, got {other:?}"),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        // Two interchangeable teachers give four teacher-slots for six
        // lessons, yet no single teacher, room, or class is overloaded.
        let request = ScheduleRequest::new(WeekGrid::uniform(1, 2))
            .with_lecture(Lecture::new("x", "X"))
            .with_lecture(Lecture::new("y", "Y"))
            .with_room(Room::new("R1"))
            .with_room(Room::new("R2"))
            .with_teacher(
                Teacher::new("T1")
                    .with_capability("x")
                    .with_capability("y")
                    .with_room("R1"),
            )
            .with_teacher(
                Teacher::new("T2")
                    .with_capability("x")
                    .with_capability("y")
                    .with_room("R2"),
            )
            .with_grade(Grade::new("G").with_requirement("x", 1).with_requirement("y", 1))
            .with_class(Class::new("A", "G"))
            .with_class(Class::new("B", "G"))
            .with_class(Class::new("C", "G"));
        assert!(FeasibilityChecker::new()
            .check(&ConstraintGraph::build(&request))
            .is_ok());

        let err = Scheduler::default().solve(&request).unwrap_err();
        assert!(!err.is_retryable());
        match err {
            TimetableError::Unsatisfiable(detail) => {
                assert_eq!(detail.classes, vec!["A", "B", "C"]);
                assert_eq!(
                    detail.demand,
                    Some(DemandRef {
                        class_id: "B".into(),
                        lecture_id: "y".into(),
                    })
                );
                assert_eq!(detail.nodes, 44);
                assert!(detail.to_string().contains("'B/y'"));
            }
            other => panic!("expected Unsatisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_solve_graph_reuse() {
        let request = school();
        let graph = ConstraintGraph::build(&request);
        let scheduler = Scheduler::default();
        let a = scheduler
            .solve_graph(&request, &graph, SearchBudget::unlimited())
            .unwrap();
        let b = scheduler
            .solve_graph(&request, &graph, SearchBudget::unlimited())
            .unwrap();
        assert_eq!(a.timetable, b.timetable);
    }
}
