use crate::grid::Slot;
use crate::model::{ClassRecord, RawAssignment, TeacherRecord, SENTINEL_TEACHER_ID};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub type Classes = BTreeMap<String, ClassRecord>;
pub type Teachers = BTreeMap<String, TeacherRecord>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub rows_seen: usize,
    pub rows_ingested: usize,
    pub rows_discarded: usize,
}

/// Why a row was left out. Never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    ClassNumber,
    Day,
    Period,
    OutsideGrid,
}

/// Both views of one assignment set: class -> teachers and teacher -> classes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub classes: Classes,
    pub teachers: Teachers,
    pub stats: AggregateStats,
}

impl Timetable {
    /// Teachers excluding the sentinel.
    pub fn named_teachers(&self) -> impl Iterator<Item = &TeacherRecord> + '_ {
        self.teachers.values().filter(|t| !t.is_sentinel())
    }
}

pub struct Aggregator {
    classes: Classes,
    teachers: Teachers,
    stats: AggregateStats,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        let mut teachers = Teachers::new();
        teachers.insert(SENTINEL_TEACHER_ID.to_string(), TeacherRecord::sentinel());
        Self {
            classes: Classes::new(),
            teachers,
            stats: AggregateStats::default(),
        }
    }

    /// Applies one row to both record families, or rejects it untouched.
    pub fn ingest(&mut self, row: &RawAssignment) -> Result<(), RowRejection> {
        self.stats.rows_seen += 1;
        let outcome = self.apply(row);
        match outcome {
            Ok(()) => self.stats.rows_ingested += 1,
            Err(reason) => {
                self.stats.rows_discarded += 1;
                debug!(
                    class_id = %row.class_id,
                    class_number = %row.class_number_code,
                    day = %row.day,
                    period = %row.period,
                    ?reason,
                    "discarding row"
                );
            }
        }
        outcome
    }

    fn apply(&mut self, row: &RawAssignment) -> Result<(), RowRejection> {
        // Everything is validated before any record is touched.
        let class_number =
            parse_int(&row.class_number_code).ok_or(RowRejection::ClassNumber)?;
        let day = parse_int(&row.day).ok_or(RowRejection::Day)?;
        let period = parse_int(&row.period).ok_or(RowRejection::Period)?;
        let slot = Slot::new(day, period).ok_or(RowRejection::OutsideGrid)?;

        let teacher_id = if row.teacher_id.is_empty() {
            SENTINEL_TEACHER_ID
        } else {
            row.teacher_id.as_str()
        };

        let class = self
            .classes
            .entry(row.class_id.clone())
            .or_insert_with(|| ClassRecord::new(&row.class_id, class_number));
        class.grid.record(slot, &row.course_name, teacher_id);

        let teacher = self
            .teachers
            .entry(teacher_id.to_string())
            .or_insert_with(|| TeacherRecord::new(teacher_id, &row.teacher_name));
        teacher.grid.record(slot, &row.course_name, &row.class_id);

        Ok(())
    }

    pub fn finish(self) -> Timetable {
        info!(
            rows_seen = self.stats.rows_seen,
            rows_ingested = self.stats.rows_ingested,
            rows_discarded = self.stats.rows_discarded,
            classes = self.classes.len(),
            teachers = self.teachers.len() - 1,
            "aggregated timetable"
        );
        Timetable {
            classes: self.classes,
            teachers: self.teachers,
            stats: self.stats,
        }
    }
}

/// Builds class and teacher timetables from rows in input order.
pub fn aggregate<'a, I>(rows: I) -> Timetable
where
    I: IntoIterator<Item = &'a RawAssignment>,
{
    let mut agg = Aggregator::new();
    for row in rows {
        let _ = agg.ingest(row);
    }
    agg.finish()
}

/// Integer cell parser. Spreadsheet exports may render whole numbers as `3.0`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let whole = match s.split_once('.') {
        Some((whole, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => s,
    };
    whole.parse::<i64>().ok()
}
