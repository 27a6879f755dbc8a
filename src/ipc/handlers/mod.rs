pub mod core;
pub mod timetable;
