//! Constraint graph: demands and their eligible teacher/room pairs.
//!
//! Translates a [`ScheduleRequest`] into the form the solver works on:
//!
//! - One [`Demand`] per `(class, lecture)` with non-zero weekly hours
//! - Per demand, the [`EligiblePair`]s of teacher and room that may host it
//! - Dense indices for teachers, rooms, classes, and slots
//! - Independent [`Component`]s that share no class, teacher, or room
//!
//! # Eligibility
//! A teacher is eligible for a demand if they can teach its lecture. A room
//! is eligible if it is that teacher's home room, or, for teachers without a
//! home room, any room. In both cases the room must seat the class when
//! capacity and class size are both known.
//!
//! # Ordering
//! Demands are ordered most-constrained first: descending required hours,
//! then class ID, then lecture ID. The order is fixed at construction and
//! drives the search, which makes solves reproducible.
//!
//! The graph is immutable once built and can be shared (e.g., behind an
//! `Arc`) across concurrent solves; each solve keeps its own occupancy state.

mod components;

pub use components::Component;

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{Result, TimetableError};
use crate::models::{Room, TimeSlot};
use crate::request::ScheduleRequest;

/// A teacher/room combination usable for a demand.
///
/// Both fields are dense indices into [`ConstraintGraph::teacher_ids`] and
/// [`ConstraintGraph::room_ids`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EligiblePair {
    /// Teacher index.
    pub teacher: usize,
    /// Room index.
    pub room: usize,
}

/// Weekly hours one class needs of one lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demand {
    /// Class index.
    pub class: usize,
    /// Class ID.
    pub class_id: String,
    /// Lecture ID.
    pub lecture_id: String,
    /// Required weekly hours (always > 0).
    pub required: u32,
    /// Class size, if known.
    pub class_size: Option<u32>,
    /// Eligible teacher/room pairs, ordered by teacher then room.
    pub pairs: Vec<EligiblePair>,
}

impl Demand {
    /// The only teacher that can serve this demand, if there is exactly one.
    pub fn sole_teacher(&self) -> Option<usize> {
        let first = self.pairs.first()?.teacher;
        self.pairs.iter().all(|p| p.teacher == first).then_some(first)
    }

    /// The only room that can host this demand, if there is exactly one.
    pub fn sole_room(&self) -> Option<usize> {
        let first = self.pairs.first()?.room;
        self.pairs.iter().all(|p| p.room == first).then_some(first)
    }

    /// Whether at least one pair is eligible.
    pub fn is_assignable(&self) -> bool {
        !self.pairs.is_empty()
    }
}

/// Why a demand has no eligible pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnassignableReason {
    /// No teacher has the lecture among their capabilities.
    NoCapableTeacher,
    /// Capable teachers exist, but none has a room that seats the class.
    NoSuitableRoom,
}

/// A demand that no teacher/room combination can ever satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignableDemand {
    /// Class ID.
    pub class_id: String,
    /// Lecture ID.
    pub lecture_id: String,
    /// Required weekly hours.
    pub required: u32,
    /// Cause.
    pub reason: UnassignableReason,
}

impl fmt::Display for UnassignableDemand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            UnassignableReason::NoCapableTeacher => write!(
                f,
                "class '{}' needs {} hour(s) of '{}' but no teacher can teach it",
                self.class_id, self.required, self.lecture_id
            ),
            UnassignableReason::NoSuitableRoom => write!(
                f,
                "class '{}' needs {} hour(s) of '{}' but no capable teacher has a room that seats it",
                self.class_id, self.required, self.lecture_id
            ),
        }
    }
}

/// Demands, eligible pairs, and dense indices for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintGraph {
    teacher_ids: Vec<String>,
    room_ids: Vec<String>,
    class_ids: Vec<String>,
    slots: Vec<TimeSlot>,
    slot_day: Vec<usize>,
    day_count: usize,
    demands: Vec<Demand>,
    unassignable: Vec<UnassignableDemand>,
    components: Vec<Component>,
    demands_by_class: Vec<Vec<usize>>,
    demands_by_teacher: Vec<Vec<usize>>,
    demands_by_room: Vec<Vec<usize>>,
}

impl ConstraintGraph {
    /// Builds the graph, keeping unassignable demands for reporting.
    ///
    /// Expects a request that passed [`crate::validation::validate_request`];
    /// dangling references are skipped rather than reported here.
    pub fn build(request: &ScheduleRequest) -> Self {
        let teacher_ids = sorted_ids(request.teachers.iter().map(|t| t.id.as_str()));
        let room_ids = sorted_ids(request.rooms.iter().map(|r| r.id.as_str()));
        let class_ids = sorted_ids(request.classes.iter().map(|c| c.id.as_str()));

        let room_index: HashMap<&str, usize> = index_of(&room_ids);
        let class_index: HashMap<&str, usize> = index_of(&class_ids);

        let mut teachers: Vec<_> = request.teachers.iter().collect();
        teachers.sort_by(|a, b| a.id.cmp(&b.id));
        teachers.dedup_by(|a, b| a.id == b.id);
        let mut rooms: Vec<&Room> = request.rooms.iter().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms.dedup_by(|a, b| a.id == b.id);
        let grades: HashMap<&str, _> = request.grades.iter().map(|g| (g.id.as_str(), g)).collect();

        let mut slots: Vec<TimeSlot> = request.time_slots.slots().to_vec();
        slots.dedup();
        let mut day_index: BTreeMap<u32, usize> = BTreeMap::new();
        for slot in &slots {
            let next = day_index.len();
            day_index.entry(slot.day).or_insert(next);
        }
        let slot_day: Vec<usize> = slots.iter().map(|s| day_index[&s.day]).collect();

        let mut demands = Vec::new();
        let mut unassignable = Vec::new();

        for class_id in &class_ids {
            let Some(class) = request.class(class_id) else {
                continue;
            };
            let Some(grade) = grades.get(class.grade_id.as_str()) else {
                continue;
            };

            for (lecture_id, hours) in grade.requirements() {
                let mut pairs = Vec::new();
                let mut capable = false;

                for (t, teacher) in teachers.iter().enumerate() {
                    if !teacher.can_teach(lecture_id) {
                        continue;
                    }
                    capable = true;
                    match &teacher.assigned_room {
                        Some(home) => {
                            if let Some(&r) = room_index.get(home.as_str()) {
                                if rooms[r].fits(class.size) {
                                    pairs.push(EligiblePair { teacher: t, room: r });
                                }
                            }
                        }
                        None => {
                            for (r, room) in rooms.iter().enumerate() {
                                if room.fits(class.size) {
                                    pairs.push(EligiblePair { teacher: t, room: r });
                                }
                            }
                        }
                    }
                }

                let demand = Demand {
                    class: class_index[class.id.as_str()],
                    class_id: class.id.clone(),
                    lecture_id: lecture_id.to_string(),
                    required: hours,
                    class_size: class.size,
                    pairs,
                };
                if !demand.is_assignable() {
                    unassignable.push(UnassignableDemand {
                        class_id: demand.class_id.clone(),
                        lecture_id: demand.lecture_id.clone(),
                        required: hours,
                        reason: if capable {
                            UnassignableReason::NoSuitableRoom
                        } else {
                            UnassignableReason::NoCapableTeacher
                        },
                    });
                }
                demands.push(demand);
            }
        }

        // Most-constrained first, ties broken lexicographically
        demands.sort_by(|a, b| {
            b.required
                .cmp(&a.required)
                .then_with(|| a.class_id.cmp(&b.class_id))
                .then_with(|| a.lecture_id.cmp(&b.lecture_id))
        });

        let mut demands_by_class = vec![Vec::new(); class_ids.len()];
        let mut demands_by_teacher = vec![Vec::new(); teacher_ids.len()];
        let mut demands_by_room = vec![Vec::new(); room_ids.len()];
        for (d, demand) in demands.iter().enumerate() {
            demands_by_class[demand.class].push(d);
            for pair in &demand.pairs {
                push_unique(&mut demands_by_teacher[pair.teacher], d);
                push_unique(&mut demands_by_room[pair.room], d);
            }
        }

        let components =
            components::partition(&demands, class_ids.len(), teacher_ids.len(), room_ids.len());

        Self {
            teacher_ids,
            room_ids,
            class_ids,
            slots,
            slot_day,
            day_count: day_index.len(),
            demands,
            unassignable,
            components,
            demands_by_class,
            demands_by_teacher,
            demands_by_room,
        }
    }

    /// Builds the graph, failing if any demand has no eligible pair.
    pub fn try_build(request: &ScheduleRequest) -> Result<Self> {
        let graph = Self::build(request);
        if graph.unassignable.is_empty() {
            Ok(graph)
        } else {
            Err(TimetableError::UnassignableDemand(graph.unassignable))
        }
    }

    /// Demands in search order.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Demands with no eligible pair.
    pub fn unassignable(&self) -> &[UnassignableDemand] {
        &self.unassignable
    }

    /// Independent components in order of their first demand.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Time slots in global order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Dense day index of a slot.
    #[inline]
    pub fn slot_day(&self, slot: usize) -> usize {
        self.slot_day[slot]
    }

    /// Number of distinct days in the week grid.
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Teacher IDs by index.
    pub fn teacher_ids(&self) -> &[String] {
        &self.teacher_ids
    }

    /// Room IDs by index.
    pub fn room_ids(&self) -> &[String] {
        &self.room_ids
    }

    /// Class IDs by index.
    pub fn class_ids(&self) -> &[String] {
        &self.class_ids
    }

    /// Demand indices of a class.
    pub fn demands_of_class(&self, class: usize) -> &[usize] {
        &self.demands_by_class[class]
    }

    /// Demand indices a teacher is eligible for.
    pub fn demands_of_teacher(&self, teacher: usize) -> &[usize] {
        &self.demands_by_teacher[teacher]
    }

    /// Demand indices a room is eligible for.
    pub fn demands_of_room(&self, room: usize) -> &[usize] {
        &self.demands_by_room[room]
    }

    /// Total weekly hours across all demands.
    pub fn total_units(&self) -> u64 {
        self.demands.iter().map(|d| d.required as u64).sum()
    }
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut ids: Vec<String> = ids.map(str::to_string).collect();
    ids.sort();
    ids.dedup();
    ids
}

fn index_of(ids: &[String]) -> HashMap<&str, usize> {
    ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect()
}

fn push_unique(list: &mut Vec<usize>, d: usize) {
    if list.last() != Some(&d) {
        list.push(d);
    }
}
