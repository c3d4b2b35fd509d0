//! Backtracking search over one independent component.
//!
//! Each demand expands into `required` units; units are searched in the
//! graph's demand order, one decision frame per unit. A frame holds the
//! unit's ordered candidates and a cursor, so the search is an explicit
//! stack and every iteration is one budget check plus at most one
//! placement attempt.
//!
//! # Pruning
//! - Units of a demand take strictly increasing slots, so the `k!`
//!   orderings of interchangeable units are explored once.
//! - Forward checking (when enabled): after a placement, every unfinished
//!   demand sharing its class, teacher, or room must still have enough
//!   placeable slots, and the class must still have enough free slots for
//!   all of its remaining hours.
//!
//! # Reference
//! Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//! Constraint Satisfaction Problems"

use super::monitor::{SearchBudget, SearchCommand, TerminationReason};
use super::occupancy::Occupancy;
use super::result::DemandRef;
use super::SolverConfig;
use crate::graph::{Component, ConstraintGraph, EligiblePair};
use crate::models::Assignment;

/// A placement option: slot index plus pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    slot: usize,
    pair: EligiblePair,
}

/// One decision level of the search.
#[derive(Debug)]
struct Frame {
    /// Index into the unit list.
    unit: usize,
    candidates: Vec<Candidate>,
    cursor: usize,
    /// Candidate currently placed at this level.
    placed: Option<Candidate>,
}

/// A fully assigned component.
#[derive(Debug, Clone)]
pub(crate) struct ComponentOutcome {
    pub assignments: Vec<Assignment>,
    pub nodes: u64,
    pub backtracks: u64,
}

/// Why a component search ended without a result.
#[derive(Debug, Clone)]
pub(crate) enum SearchFailure {
    /// The budget stopped the search.
    Interrupted {
        reason: TerminationReason,
        placed: usize,
        demand: Option<DemandRef>,
    },
    /// Every candidate was tried at the root.
    Exhausted {
        demand: Option<DemandRef>,
        nodes: u64,
    },
}

/// Search state for a single component.
pub(crate) struct ComponentSearch<'a> {
    graph: &'a ConstraintGraph,
    config: &'a SolverConfig,
    occupancy: Occupancy,
    /// Demand index per unit; units of one demand are contiguous.
    units: Vec<usize>,
    /// Units placed so far, per demand.
    done: Vec<u32>,
    nodes: u64,
    backtracks: u64,
}

impl<'a> ComponentSearch<'a> {
    pub(crate) fn new(
        graph: &'a ConstraintGraph,
        component: &Component,
        config: &'a SolverConfig,
    ) -> Self {
        let units = component
            .demands
            .iter()
            .flat_map(|&d| std::iter::repeat(d).take(graph.demands()[d].required as usize))
            .collect();
        Self {
            graph,
            config,
            occupancy: Occupancy::new(graph),
            units,
            done: vec![0; graph.demands().len()],
            nodes: 0,
            backtracks: 0,
        }
    }

    /// Number of units (lecture hours) to place.
    pub(crate) fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Runs the search to completion, exhaustion, or interruption.
    pub(crate) fn run(mut self, budget: &SearchBudget) -> Result<ComponentOutcome, SearchFailure> {
        if self.units.is_empty() {
            return Ok(self.outcome(&[]));
        }

        let mut stack: Vec<Frame> = Vec::with_capacity(self.units.len());
        let first = self.frame(0, None);
        stack.push(first);

        // Deepest level at which a demand ran out of candidates
        let mut deepest: Option<(usize, usize)> = None;
        let mut steps: u64 = 0;

        loop {
            if let SearchCommand::Terminate(reason) = budget.search_command(steps) {
                let placed = stack.iter().filter(|f| f.placed.is_some()).count();
                let demand = stack.last().map(|f| self.demand_ref(self.units[f.unit]));
                return Err(SearchFailure::Interrupted {
                    reason,
                    placed,
                    demand,
                });
            }
            steps += 1;

            let depth = stack.len() - 1;
            let unit = stack[depth].unit;
            let demand = self.units[unit];

            if let Some(previous) = stack[depth].placed.take() {
                self.release(demand, previous);
                self.backtracks += 1;
            }

            let frame = &mut stack[depth];
            if frame.cursor == frame.candidates.len() {
                if deepest.map_or(true, |(level, _)| depth > level) {
                    deepest = Some((depth, demand));
                }
                stack.pop();
                if stack.is_empty() {
                    return Err(SearchFailure::Exhausted {
                        demand: deepest.map(|(_, d)| self.demand_ref(d)),
                        nodes: self.nodes,
                    });
                }
                continue;
            }

            let candidate = frame.candidates[frame.cursor];
            frame.cursor += 1;
            frame.placed = Some(candidate);

            self.nodes += 1;
            budget.on_node();
            self.place(demand, candidate);

            if self.config.forward_checking && !self.forward_check(demand, candidate) {
                continue;
            }

            if stack.len() == self.units.len() {
                let placements: Vec<(usize, Candidate)> = stack
                    .iter()
                    .filter_map(|f| f.placed.map(|c| (self.units[f.unit], c)))
                    .collect();
                return Ok(self.outcome(&placements));
            }

            let next = self.frame(unit + 1, Some((demand, candidate.slot)));
            stack.push(next);
        }
    }

    /// Builds the frame for `unit`. `previous` is the demand and slot placed
    /// by the frame below, if any.
    fn frame(&self, unit: usize, previous: Option<(usize, usize)>) -> Frame {
        let d = self.units[unit];
        let min_slot = match previous {
            Some((prev_demand, slot)) if prev_demand == d => slot + 1,
            _ => 0,
        };
        Frame {
            unit,
            candidates: self.candidates(d, min_slot),
            cursor: 0,
            placed: None,
        }
    }

    /// Ordered candidates for the next unit of demand `d`.
    fn candidates(&self, d: usize, min_slot: usize) -> Vec<Candidate> {
        let demand = &self.graph.demands()[d];
        let slot_count = self.graph.slots().len();
        let occ = &self.occupancy;

        // Free slots left per pair (most-constrained-first)
        let pair_free: Vec<usize> = demand
            .pairs
            .iter()
            .map(|&pair| {
                (min_slot..slot_count)
                    .filter(|&s| occ.class_free(demand.class, s) && occ.pair_free(pair, s))
                    .count()
            })
            .collect();

        let mut keyed: Vec<((u32, u32, usize, usize, usize), Candidate)> = Vec::new();
        for slot in min_slot..slot_count {
            if !occ.class_free(demand.class, slot) {
                continue;
            }
            let day = self.graph.slot_day(slot);
            for (p, &pair) in demand.pairs.iter().enumerate() {
                if !occ.pair_free(pair, slot) {
                    continue;
                }
                let key = if self.config.prefer_even_distribution {
                    (
                        occ.demand_day_load(d, day),
                        occ.class_day_load(demand.class, day),
                        pair_free[p],
                        slot,
                        p,
                    )
                } else {
                    (0, 0, pair_free[p], slot, p)
                };
                keyed.push((key, Candidate { slot, pair }));
            }
        }
        keyed.sort_unstable_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    fn place(&mut self, d: usize, c: Candidate) {
        let class = self.graph.demands()[d].class;
        let day = self.graph.slot_day(c.slot);
        self.occupancy.place(d, class, c.pair, c.slot, day);
        self.done[d] += 1;
    }

    fn release(&mut self, d: usize, c: Candidate) {
        let class = self.graph.demands()[d].class;
        let day = self.graph.slot_day(c.slot);
        self.occupancy.release(d, class, c.pair, c.slot, day);
        self.done[d] -= 1;
    }

    /// Whether every affected demand can still be completed after placing
    /// `c` for demand `d`.
    fn forward_check(&self, d: usize, c: Candidate) -> bool {
        let graph = self.graph;
        let class = graph.demands()[d].class;

        let affected = graph
            .demands_of_class(class)
            .iter()
            .chain(graph.demands_of_teacher(c.pair.teacher))
            .chain(graph.demands_of_room(c.pair.room));

        for &e in affected {
            let remaining = self.remaining(e);
            if remaining == 0 {
                continue;
            }
            // Later units of the current demand must come after `c.slot`
            let min_slot = if e == d { c.slot + 1 } else { 0 };
            if self.placeable_slots(e, min_slot, remaining) < remaining {
                return false;
            }
        }

        let class_remaining: usize = graph
            .demands_of_class(class)
            .iter()
            .map(|&e| self.remaining(e))
            .sum();
        let class_free = (0..graph.slots().len())
            .filter(|&s| self.occupancy.class_free(class, s))
            .count();
        class_remaining <= class_free
    }

    fn remaining(&self, d: usize) -> usize {
        (self.graph.demands()[d].required - self.done[d]) as usize
    }

    /// Slots from `min_slot` where demand `d` still fits, counted up to `enough`.
    fn placeable_slots(&self, d: usize, min_slot: usize, enough: usize) -> usize {
        let demand = &self.graph.demands()[d];
        let mut count = 0;
        for s in min_slot..self.graph.slots().len() {
            if self.occupancy.class_free(demand.class, s)
                && demand.pairs.iter().any(|&p| self.occupancy.pair_free(p, s))
            {
                count += 1;
                if count >= enough {
                    break;
                }
            }
        }
        count
    }

    fn demand_ref(&self, d: usize) -> DemandRef {
        let demand = &self.graph.demands()[d];
        DemandRef {
            class_id: demand.class_id.clone(),
            lecture_id: demand.lecture_id.clone(),
        }
    }

    fn outcome(&self, placements: &[(usize, Candidate)]) -> ComponentOutcome {
        let graph = self.graph;
        let mut assignments: Vec<Assignment> = placements
            .iter()
            .map(|&(d, c)| {
                let demand = &graph.demands()[d];
                Assignment {
                    class_id: demand.class_id.clone(),
                    lecture_id: demand.lecture_id.clone(),
                    teacher_id: graph.teacher_ids()[c.pair.teacher].clone(),
                    room_id: graph.room_ids()[c.pair.room].clone(),
                    slot: graph.slots()[c.slot].clone(),
                }
            })
            .collect();
        assignments.sort_by(|a, b| a.class_id.cmp(&b.class_id).then_with(|| a.slot.cmp(&b.slot)));
        ComponentOutcome {
            assignments,
            nodes: self.nodes,
            backtracks: self.backtracks,
        }
    }
}
