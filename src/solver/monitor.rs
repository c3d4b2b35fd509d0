//! Search budget: time limit, node limit, and cancellation.
//!
//! The engine asks the budget for a [`SearchCommand`] before every search
//! step. Cancellation and the node limit are checked on every step; the
//! wall clock is sampled only when `(steps & clock_check_mask) == 0`, which
//! always includes the first step, so a zero time limit stops the search
//! before any placement is made.
//!
//! A budget is cheap to clone. Clones share the node counter and the
//! cancellation flag, so independent components searched in parallel draw
//! from one budget.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::SolverConfig;

/// Why the search was stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The wall-clock budget or caller deadline passed.
    TimeLimit,
    /// The node budget was used up.
    NodeLimit,
    /// The caller raised the cancellation flag.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeLimit => write!(f, "time limit reached"),
            Self::NodeLimit => write!(f, "node limit reached"),
            Self::Cancelled => write!(f, "cancelled by caller"),
        }
    }
}

/// What the search loop does after a budget check.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    /// Keep searching.
    #[default]
    Continue,
    /// Stop and report the reason.
    Terminate(TerminationReason),
}

impl fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Shared limits for one solve.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    start: Instant,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    nodes: Arc<AtomicU64>,
    cancel: Option<Arc<AtomicBool>>,
    clock_check_mask: u64,
}

impl SearchBudget {
    /// An unbounded budget starting now.
    pub fn unlimited() -> Self {
        Self {
            start: Instant::now(),
            deadline: None,
            node_limit: None,
            nodes: Arc::new(AtomicU64::new(0)),
            cancel: None,
            clock_check_mask: 0xFF,
        }
    }

    /// A budget from the configured time and node limits, starting now.
    pub fn from_config(config: &SolverConfig) -> Self {
        let mut budget = Self::unlimited();
        budget.clock_check_mask = config.clock_check_interval.saturating_sub(1);
        budget.node_limit = config.node_limit;
        if let Some(ms) = config.time_limit_ms {
            budget.deadline = Some(budget.start + Duration::from_millis(ms));
        }
        budget
    }

    /// Adds a caller deadline; the earlier of the two deadlines applies.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Adds a cancellation flag checked on every step.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Overrides the node limit.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    /// Records one placement attempt.
    #[inline]
    pub fn on_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    /// Placement attempts so far, across all clones.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Milliseconds since the budget started.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Decides whether the search may take another step.
    ///
    /// `steps` is the caller's local step counter.
    #[inline]
    pub fn search_command(&self, steps: u64) -> SearchCommand {
        if let Some(cancel) = &self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return SearchCommand::Terminate(TerminationReason::Cancelled);
            }
        }
        if let Some(limit) = self.node_limit {
            if self.nodes() >= limit {
                return SearchCommand::Terminate(TerminationReason::NodeLimit);
            }
        }
        if let Some(deadline) = self.deadline {
            if (steps & self.clock_check_mask) == 0 && Instant::now() >= deadline {
                return SearchCommand::Terminate(TerminationReason::TimeLimit);
            }
        }
        SearchCommand::Continue
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}
