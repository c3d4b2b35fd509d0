//! Occupancy tables for constant-time conflict checks.
//!
//! Flat row-major bitmaps of `(entity, slot)` cells for teachers, rooms,
//! and classes, plus per-`(class, day)` and per-`(demand, day)` lecture
//! counts used by the day-spreading preference.

use crate::graph::{ConstraintGraph, EligiblePair};

#[derive(Debug, Clone)]
pub(crate) struct Occupancy {
    slot_count: usize,
    day_count: usize,
    teacher: Vec<bool>,
    room: Vec<bool>,
    class: Vec<bool>,
    class_day: Vec<u32>,
    demand_day: Vec<u32>,
}

impl Occupancy {
    pub(crate) fn new(graph: &ConstraintGraph) -> Self {
        let slot_count = graph.slots().len();
        let day_count = graph.day_count();
        Self {
            slot_count,
            day_count,
            teacher: vec![false; graph.teacher_ids().len() * slot_count],
            room: vec![false; graph.room_ids().len() * slot_count],
            class: vec![false; graph.class_ids().len() * slot_count],
            class_day: vec![0; graph.class_ids().len() * day_count],
            demand_day: vec![0; graph.demands().len() * day_count],
        }
    }

    #[inline]
    pub(crate) fn class_free(&self, class: usize, slot: usize) -> bool {
        !self.class[class * self.slot_count + slot]
    }

    #[inline]
    pub(crate) fn pair_free(&self, pair: EligiblePair, slot: usize) -> bool {
        !self.teacher[pair.teacher * self.slot_count + slot]
            && !self.room[pair.room * self.slot_count + slot]
    }

    #[inline]
    pub(crate) fn class_day_load(&self, class: usize, day: usize) -> u32 {
        self.class_day[class * self.day_count + day]
    }

    #[inline]
    pub(crate) fn demand_day_load(&self, demand: usize, day: usize) -> u32 {
        self.demand_day[demand * self.day_count + day]
    }

    pub(crate) fn place(
        &mut self,
        demand: usize,
        class: usize,
        pair: EligiblePair,
        slot: usize,
        day: usize,
    ) {
        self.set(demand, class, pair, slot, day, true);
    }

    pub(crate) fn release(
        &mut self,
        demand: usize,
        class: usize,
        pair: EligiblePair,
        slot: usize,
        day: usize,
    ) {
        self.set(demand, class, pair, slot, day, false);
    }

    fn set(
        &mut self,
        demand: usize,
        class: usize,
        pair: EligiblePair,
        slot: usize,
        day: usize,
        busy: bool,
    ) {
        self.teacher[pair.teacher * self.slot_count + slot] = busy;
        self.room[pair.room * self.slot_count + slot] = busy;
        self.class[class * self.slot_count + slot] = busy;

        let class_day = &mut self.class_day[class * self.day_count + day];
        let demand_day = &mut self.demand_day[demand * self.day_count + day];
        if busy {
            *class_day += 1;
            *demand_day += 1;
        } else {
            *class_day -= 1;
            *demand_day -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Grade, Lecture, Room, Teacher, WeekGrid};
    use crate::request::ScheduleRequest;

    #[test]
    fn test_place_and_release() {
        let request = ScheduleRequest::new(WeekGrid::uniform(2, 2))
            .with_lecture(Lecture::new("m", "Math"))
            .with_room(Room::new("R1"))
            .with_teacher(Teacher::new("T1").with_capability("m").with_room("R1"))
            .with_grade(Grade::new("G").with_requirement("m", 2))
            .with_class(Class::new("C", "G"));
        let graph = ConstraintGraph::build(&request);
        let pair = graph.demands()[0].pairs[0];
        let mut occ = Occupancy::new(&graph);

        assert!(occ.class_free(0, 2));
        assert!(occ.pair_free(pair, 2));

        occ.place(0, 0, pair, 2, 1);
        assert!(!occ.class_free(0, 2));
        assert!(!occ.pair_free(pair, 2));
        assert!(occ.pair_free(pair, 3));
        assert_eq!(occ.class_day_load(0, 1), 1);
        assert_eq!(occ.demand_day_load(0, 1), 1);
        assert_eq!(occ.class_day_load(0, 0), 0);

        occ.release(0, 0, pair, 2, 1);
        assert!(occ.class_free(0, 2));
        assert!(occ.pair_free(pair, 2));
        assert_eq!(occ.class_day_load(0, 1), 0);
    }
}
