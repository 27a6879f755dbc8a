use crate::grid::ScheduleGrid;
use serde::{Deserialize, Serialize};

/// Identifier substituted for rows that name no teacher.
pub const SENTINEL_TEACHER_ID: &str = "empty";

// Source column positions. Columns 4 and 6..=8 carry data this tool ignores.
const COL_CLASS_ID: usize = 0;
const COL_CLASS_NUMBER: usize = 1;
const COL_DAY: usize = 2;
const COL_PERIOD: usize = 3;
const COL_COURSE: usize = 5;
const COL_TEACHER_ID: usize = 9;
const COL_TEACHER_NAME: usize = 10;

/// One source row, still as text. Numeric fields are parsed by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    pub class_id: String,
    pub class_number_code: String,
    pub day: String,
    pub period: String,
    pub course_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
}

impl RawAssignment {
    /// Picks the used columns out of a source record; missing columns read as empty.
    pub fn from_columns(cols: &[String]) -> Self {
        let col = |i: usize| cols.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        Self {
            class_id: col(COL_CLASS_ID),
            class_number_code: col(COL_CLASS_NUMBER),
            day: col(COL_DAY),
            period: col(COL_PERIOD),
            course_name: col(COL_COURSE),
            teacher_id: col(COL_TEACHER_ID),
            teacher_name: col(COL_TEACHER_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub class_id: String,
    pub class_number_code: i64,
    pub grade: i64,
    pub number: i64,
    /// Participants are teacher identifiers.
    pub grid: ScheduleGrid,
}

impl ClassRecord {
    /// `class_number_code` encodes grade*100 + number.
    pub fn new(class_id: &str, class_number_code: i64) -> Self {
        Self {
            class_id: class_id.to_string(),
            class_number_code,
            grade: class_number_code / 100,
            number: class_number_code % 100,
            grid: ScheduleGrid::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRecord {
    pub teacher_id: String,
    pub name: String,
    /// Participants are class identifiers.
    pub grid: ScheduleGrid,
}

impl TeacherRecord {
    pub fn new(teacher_id: &str, name: &str) -> Self {
        Self {
            teacher_id: teacher_id.to_string(),
            name: name.to_string(),
            grid: ScheduleGrid::new(),
        }
    }

    pub fn sentinel() -> Self {
        Self::new(SENTINEL_TEACHER_ID, "")
    }

    pub fn is_sentinel(&self) -> bool {
        self.teacher_id == SENTINEL_TEACHER_ID
    }
}
