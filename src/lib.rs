//! School timetabling for the U-Engine ecosystem.
//!
//! Turns a school's lectures, rooms, teachers, grades, and classes into a
//! weekly timetable in which no teacher, room, or class is double-booked,
//! every teacher is capable of what they teach, and every class receives
//! exactly its grade's required hours per lecture.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Lecture`, `Room`, `Teacher`, `Grade`,
//!   `Class`, `TimeSlot`, `WeekGrid`, `Timetable`
//! - **`request`**: `ScheduleRequest`, the per-solve input and its JSON form
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling references)
//! - **`graph`**: Demands, eligible teacher/room pairs, independent components
//! - **`feasibility`**: Necessary-condition pre-checks with full reports
//! - **`solver`**: Backtracking search with forward checking, budgets, cancellation
//! - **`materialize`**: Assignment set to per-class weekly grids
//! - **`kpi`**: Quality metrics of a finished timetable
//!
//! # Pipeline
//!
//! ```text
//! ScheduleRequest → validate → ConstraintGraph → FeasibilityChecker
//!                 → ComponentSearch (per component) → materialize → verify
//! ```
//!
//! # Example
//! ```
//! use u_timetable::prelude::*;
//!
//! let request = ScheduleRequest::new(WeekGrid::uniform(5, 2))
//!     .with_lecture(Lecture::new("math", "Math"))
//!     .with_lecture(Lecture::new("sci", "Science"))
//!     .with_room(Room::new("R1"))
//!     .with_room(Room::new("R2"))
//!     .with_teacher(Teacher::new("T1").with_capability("math").with_room("R1"))
//!     .with_teacher(Teacher::new("T2").with_capability("sci").with_room("R2"))
//!     .with_grade(Grade::new("G1").with_requirement("math", 3).with_requirement("sci", 2))
//!     .with_class(Class::new("1A", "G1"));
//!
//! let solution = Scheduler::default().solve(&request).unwrap();
//! assert_eq!(solution.timetable.assignment_count(), 5);
//! assert!(solution.timetable.verify(&request).is_empty());
//! ```
//!
//! # Features
//!
//! - `parallel`: search independent components on the rayon thread pool
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

pub mod error;
pub mod feasibility;
pub mod graph;
pub mod kpi;
pub mod materialize;
pub mod models;
pub mod request;
pub mod solver;
pub mod validation;

pub use error::{Result, TimetableError};

/// Common imports.
pub mod prelude {
    pub use crate::error::{Result, TimetableError};
    pub use crate::feasibility::{FeasibilityChecker, InfeasibilityReport};
    pub use crate::graph::ConstraintGraph;
    pub use crate::kpi::TimetableKpi;
    pub use crate::models::{
        Class, Grade, Lecture, Room, Teacher, TimeSlot, Timetable, WeekGrid,
    };
    pub use crate::request::ScheduleRequest;
    pub use crate::solver::{Scheduler, SearchBudget, Solution, SolverConfig};
}
