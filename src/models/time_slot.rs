//! Weekly time slot grid.
//!
//! A timetable repeats every week. The week is a caller-supplied, ordered
//! set of lecture periods, each identified by a `(day, period)` pair.
//!
//! # Ordering
//! Slots are totally ordered by day, then period. This global order is the
//! tie-breaker the solver uses whenever two candidate slots are otherwise
//! equally good, which keeps results reproducible.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Period labels of the default school day.
const DEFAULT_PERIODS: [&str; 10] = [
    "08:00-08:45",
    "08:55-09:40",
    "09:50-10:35",
    "10:55-11:40",
    "11:50-12:35",
    "12:45-13:30",
    "13:40-14:25",
    "14:35-15:20",
    "15:30-16:15",
    "16:25-17:10",
];

/// Number of days in the default school week.
const DEFAULT_DAYS: u32 = 5;

/// One weekly lecture period.
///
/// Equality and ordering consider only `(day, period)`; the label is
/// presentation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week (0-based).
    pub day: u32,
    /// Period within the day (0-based).
    pub period: u32,
    /// Display label (e.g., "08:00-08:45").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TimeSlot {
    /// Creates an unlabeled slot.
    pub fn new(day: u32, period: u32) -> Self {
        Self {
            day,
            period,
            label: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The `(day, period)` key.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        (self.day, self.period)
    }
}

impl PartialEq for TimeSlot {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TimeSlot {}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::hash::Hash for TimeSlot {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "day {} period {} ({label})", self.day, self.period),
            None => write!(f, "day {} period {}", self.day, self.period),
        }
    }
}

/// The set of time slots available in a week, sorted in global order.
///
/// Duplicates are kept as given so that input validation can report them;
/// `WeekGrid::slots` is always sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeSlot>", into = "Vec<TimeSlot>")]
pub struct WeekGrid {
    slots: Vec<TimeSlot>,
}

impl WeekGrid {
    /// Creates a grid from arbitrary slots (sorted on construction).
    pub fn new(mut slots: Vec<TimeSlot>) -> Self {
        slots.sort();
        Self { slots }
    }

    /// Creates `days` x `periods` unlabeled slots.
    pub fn uniform(days: u32, periods: u32) -> Self {
        let slots = (0..days)
            .flat_map(|day| (0..periods).map(move |period| TimeSlot::new(day, period)))
            .collect();
        Self { slots }
    }

    /// The default school week: 5 days of 10 labeled 45-minute periods.
    pub fn school_week() -> Self {
        let slots = (0..DEFAULT_DAYS)
            .flat_map(|day| {
                DEFAULT_PERIODS
                    .iter()
                    .enumerate()
                    .map(move |(period, label)| {
                        TimeSlot::new(day, period as u32).with_label(*label)
                    })
            })
            .collect();
        Self { slots }
    }

    /// Slots in global order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the grid contains the given `(day, period)`.
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.slots.binary_search(slot).is_ok()
    }

    /// Distinct days in order.
    pub fn days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.slots.iter().map(|s| s.day).collect();
        days.dedup();
        days
    }
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self::school_week()
    }
}

impl From<Vec<TimeSlot>> for WeekGrid {
    fn from(slots: Vec<TimeSlot>) -> Self {
        Self::new(slots)
    }
}

impl From<WeekGrid> for Vec<TimeSlot> {
    fn from(grid: WeekGrid) -> Self {
        grid.slots
    }
}
