//! Error types for timetabling.
//!
//! Failures are ordered by where they arise in the pipeline:
//! input validation, constraint graph construction, feasibility pre-checks,
//! search, and materialization. Every payload is `Serialize` so a caller can
//! forward it as a structured diagnostic.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use thiserror::Error;

use crate::feasibility::InfeasibilityReport;
use crate::graph::UnassignableDemand;
use crate::materialize::DemandShortfall;
use crate::models::Violation;
use crate::solver::{ConfigError, Interruption, Unsatisfiable};
use crate::validation::ValidationError;

/// Main error type for timetabling operations.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The request is structurally invalid (duplicate or dangling IDs)
    #[error("Invalid input: {}", join(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A requirement no teacher/room combination can ever satisfy
    #[error("Unassignable demand: {}", join(.0))]
    UnassignableDemand(Vec<UnassignableDemand>),

    /// Pre-flight capacity checks failed; no search was attempted
    #[error("Infeasible: {0}")]
    Infeasible(InfeasibilityReport),

    /// The search space was exhausted without a solution
    #[error("Unsatisfiable: {0}")]
    Unsatisfiable(Unsatisfiable),

    /// The time or node budget ran out
    #[error("Solver timeout: {0}")]
    SolverTimeout(Interruption),

    /// The caller cancelled the solve
    #[error("Solver was cancelled: {0}")]
    Cancelled(Interruption),

    /// Internal error: a demand did not receive exactly its required hours
    #[error("Incomplete assignment set: {}", join(.0))]
    IncompleteAssignmentSet(Vec<DemandShortfall>),

    /// Internal error: a produced timetable failed verification
    #[error("Invariant violation: {}", join(.0))]
    InvariantViolation(Vec<Violation>),

    /// Invalid solver configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for timetabling operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

impl TimetableError {
    /// Short machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::UnassignableDemand(_) => "UnassignableDemand",
            Self::Infeasible(_) => "InfeasibilityReport",
            Self::Unsatisfiable(_) => "Unsatisfiable",
            Self::SolverTimeout(_) => "SolverTimeout",
            Self::Cancelled(_) => "Cancelled",
            Self::IncompleteAssignmentSet(_) => "IncompleteAssignmentSet",
            Self::InvariantViolation(_) => "InvariantViolation",
            Self::Config(_) => "Config",
            Self::Json(_) => "Json",
        }
    }

    /// Whether retrying with a larger budget or relaxed preferences may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SolverTimeout(_) | Self::Cancelled(_))
    }

    /// Whether this error indicates a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::IncompleteAssignmentSet(_) | Self::InvariantViolation(_)
        )
    }

    /// Structured diagnostic for the presentation layer.
    ///
    /// `{ "kind": ..., "message": ..., "detail": ... }`
    pub fn diagnostic(&self) -> Value {
        let detail = match self {
            Self::InvalidInput(errors) => to_value(errors),
            Self::UnassignableDemand(demands) => to_value(demands),
            Self::Infeasible(report) => to_value(report),
            Self::Unsatisfiable(detail) => to_value(detail),
            Self::SolverTimeout(detail) | Self::Cancelled(detail) => to_value(detail),
            Self::IncompleteAssignmentSet(shortfalls) => to_value(shortfalls),
            Self::InvariantViolation(violations) => to_value(violations),
            Self::Config(_) | Self::Json(_) => Value::Null,
        };
        json!({
            "kind": self.kind(),
            "message": self.to_string(),
            "detail": detail,
        })
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_input_message_lists_all() {
        let err = TimetableError::InvalidInput(vec![
            ValidationError {
                kind: ValidationErrorKind::DuplicateId,
                entity_id: "R1".into(),
                message: "Duplicate room ID: R1".into(),
            },
            ValidationError {
                kind: ValidationErrorKind::UnknownGrade,
                entity_id: "C1".into(),
                message: "Class 'C1' references unknown grade 'G9'".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Duplicate room ID: R1; Class 'C1'"), "{msg}");
        assert!(!err.is_retryable());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_diagnostic_shape() {
        let err = TimetableError::SolverTimeout(Interruption {
            reason: "time limit reached".into(),
            nodes: 0,
            elapsed_ms: 0,
            placed: 0,
            total: 5,
            demand: None,
        });
        let d = err.diagnostic();
        assert_eq!(d["kind"], "SolverTimeout");
        assert_eq!(d["detail"]["total"], 5);
        assert!(err.is_retryable());
    }
}
