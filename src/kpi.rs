//! Timetable quality metrics (KPIs).
//!
//! Computes indicators of how a finished timetable uses the week. None of
//! them affect validity; they measure the soft goal of spreading each
//! class's lectures evenly across the days.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Assignments | Occupied class slots |
//! | Teacher load | Hours taught per teacher |
//! | Room utilization | Occupied slots / week slots, per room |
//! | Days used | Distinct days with a lecture, per class |
//! | Max daily load | Most lectures on one day, per class |
//! | Daily spread | Mean over classes of max daily load - min daily load |
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use std::collections::{BTreeMap, HashMap};

use crate::models::{Timetable, WeekGrid};

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Total occupied class slots.
    pub assignment_count: usize,
    /// Hours per teacher.
    pub teacher_load: BTreeMap<String, usize>,
    /// Fraction of week slots each room is occupied (0.0..1.0).
    pub room_utilization: BTreeMap<String, f64>,
    /// Mean room utilization over rooms that appear in the timetable.
    pub avg_room_utilization: f64,
    /// Distinct days with at least one lecture, per class.
    pub days_used: BTreeMap<String, usize>,
    /// Most lectures on a single day, per class.
    pub max_daily_load: BTreeMap<String, usize>,
    /// Mean over classes of (busiest day - lightest day), counting every
    /// day of the week. 0.0 means perfectly even.
    pub avg_daily_spread: f64,
}

impl TimetableKpi {
    /// Computes KPIs for a timetable over its week grid.
    pub fn calculate(timetable: &Timetable, week: &WeekGrid) -> Self {
        let days = week.days();
        let slot_count = week.len();

        let mut teacher_load: BTreeMap<String, usize> = BTreeMap::new();
        let mut room_slots: BTreeMap<String, usize> = BTreeMap::new();
        let mut days_used = BTreeMap::new();
        let mut max_daily_load = BTreeMap::new();
        let mut total_spread: f64 = 0.0;

        for class in &timetable.classes {
            let mut per_day: HashMap<u32, usize> = HashMap::new();
            for entry in &class.entries {
                *teacher_load.entry(entry.teacher_id.clone()).or_insert(0) += 1;
                *room_slots.entry(entry.room_id.clone()).or_insert(0) += 1;
                *per_day.entry(entry.slot.day).or_insert(0) += 1;
            }

            let max = per_day.values().copied().max().unwrap_or(0);
            let min = days
                .iter()
                .map(|d| per_day.get(d).copied().unwrap_or(0))
                .min()
                .unwrap_or(0);
            total_spread += (max - min.min(max)) as f64;

            days_used.insert(class.class_id.clone(), per_day.len());
            max_daily_load.insert(class.class_id.clone(), max);
        }

        let room_utilization: BTreeMap<String, f64> = room_slots
            .into_iter()
            .map(|(room, used)| {
                let rate = if slot_count == 0 {
                    0.0
                } else {
                    used as f64 / slot_count as f64
                };
                (room, rate)
            })
            .collect();
        let avg_room_utilization = if room_utilization.is_empty() {
            0.0
        } else {
            room_utilization.values().sum::<f64>() / room_utilization.len() as f64
        };

        let avg_daily_spread = if timetable.classes.is_empty() {
            0.0
        } else {
            total_spread / timetable.classes.len() as f64
        };

        Self {
            assignment_count: timetable.assignment_count(),
            teacher_load,
            room_utilization,
            avg_room_utilization,
            days_used,
            max_daily_load,
            avg_daily_spread,
        }
    }

    /// Whether no class has more than `max_per_day` lectures on one day.
    pub fn within_daily_limit(&self, max_per_day: usize) -> bool {
        self.max_daily_load.values().all(|&load| load <= max_per_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassTimetable, TimeSlot, TimetableEntry};

    fn entry(day: u32, period: u32, teacher: &str, room: &str) -> TimetableEntry {
        TimetableEntry {
            slot: TimeSlot::new(day, period),
            lecture_id: "math".into(),
            lecture_name: String::new(),
            teacher_id: teacher.into(),
            teacher_name: String::new(),
            room_id: room.into(),
            room_name: String::new(),
        }
    }

    fn class(id: &str, entries: Vec<TimetableEntry>) -> ClassTimetable {
        ClassTimetable {
            class_id: id.into(),
            class_name: String::new(),
            grade_id: "G1".into(),
            entries,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let timetable = Timetable {
            classes: vec![
                class(
                    "1A",
                    vec![
                        entry(0, 0, "T1", "R1"),
                        entry(0, 1, "T1", "R1"),
                        entry(1, 0, "T2", "R2"),
                    ],
                ),
                class("1B", vec![entry(0, 2, "T1", "R1")]),
            ],
        };
        let week = WeekGrid::uniform(2, 5);
        let kpi = TimetableKpi::calculate(&timetable, &week);

        assert_eq!(kpi.assignment_count, 4);
        assert_eq!(kpi.teacher_load["T1"], 3);
        assert_eq!(kpi.teacher_load["T2"], 1);
        assert!((kpi.room_utilization["R1"] - 0.3).abs() < 1e-10);
        assert!((kpi.room_utilization["R2"] - 0.1).abs() < 1e-10);
        assert!((kpi.avg_room_utilization - 0.2).abs() < 1e-10);
        assert_eq!(kpi.days_used["1A"], 2);
        assert_eq!(kpi.days_used["1B"], 1);
        assert_eq!(kpi.max_daily_load["1A"], 2);
        // 1A: 2 - 1, 1B: 1 - 0
        assert!((kpi.avg_daily_spread - 1.0).abs() < 1e-10);
        assert!(kpi.within_daily_limit(2));
        assert!(!kpi.within_daily_limit(1));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = TimetableKpi::calculate(&Timetable::new(), &WeekGrid::uniform(5, 10));
        assert_eq!(kpi.assignment_count, 0);
        assert_eq!(kpi.avg_room_utilization, 0.0);
        assert_eq!(kpi.avg_daily_spread, 0.0);
        assert!(kpi.within_daily_limit(0));
    }
}
