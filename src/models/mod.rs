//! Timetabling domain models.
//!
//! Provides the entities a school supplies (lectures, rooms, teachers,
//! grades, classes), the weekly slot grid, and the timetable produced by
//! the solver.
//!
//! # Domain Mappings
//!
//! | u-timetable | Scheduling term | Role |
//! |-------------|-----------------|------|
//! | Lecture | Activity type | What is taught |
//! | Teacher | Skilled resource | Who teaches, limited by capabilities |
//! | Room | Disjunctive resource | Where, one lecture per slot |
//! | Class | Job | Who attends, one lecture per slot |
//! | Grade | Demand profile | How many weekly hours per lecture |
//! | TimeSlot | Discrete time bucket | When |

mod grade;
mod lecture;
mod room;
mod teacher;
mod time_slot;
mod timetable;

pub use grade::{Class, Grade};
pub use lecture::Lecture;
pub use room::Room;
pub use teacher::Teacher;
pub use time_slot::{TimeSlot, WeekGrid};
pub use timetable::{
    Assignment, ClassTimetable, Timetable, TimetableEntry, Violation, ViolationType,
};
