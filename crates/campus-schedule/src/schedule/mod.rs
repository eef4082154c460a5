//! Timetable data and the read-only query engine built on top of it.
//!
//! The store owns the parsed document for the lifetime of the process; every
//! query borrows from it and never mutates it.

pub mod domain;
mod filter;
pub mod group;
mod query;
pub mod router;
mod store;

pub use domain::{
    CourseEntry, CourseKind, DaySchedule, FacultySchedule, ScheduleDocument, Semester,
    SemesterSchedule, StudyYear, Weekday,
};
pub use filter::{DayView, ScheduleQueryEngine, ScheduleSubtree, SemesterView, YearView};
pub use group::{CohortSubgroup, GroupAssignment, GroupCode, GroupParseError};
pub use query::{ScheduleCriteria, ScheduleQueryError};
pub use router::{schedule_router, ScheduleEnvelope};
pub use store::{ScheduleLoadError, ScheduleStore};
