//! Builds cross-referenced class and teacher timetables from a flat
//! course-assignment sheet and packages them as a zip of HTML documents.

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod error;
pub mod grid;
pub mod index;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod package;
pub mod render;
pub mod source;
pub mod subject;

pub use error::{Result, TimetableError};
