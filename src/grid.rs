use serde::Serialize;
use std::collections::BTreeMap;

/// School days per week; addressed 1..=DAYS.
pub const DAYS: usize = 6;
/// Highest period index. Slots 0 and 5 are reserved (no teaching) but still
/// addressable, so a row naming them lands in an otherwise unused cell.
pub const PERIODS: usize = 9;
/// Period slots per day, 0..=PERIODS.
pub const PERIOD_SLOTS: usize = PERIODS + 1;

/// Course name -> participant identifiers, kept in non-decreasing order.
pub type Cell = BTreeMap<String, Vec<String>>;

/// A validated (day, period) coordinate inside the grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    pub(crate) day: usize,
    pub(crate) period: usize,
}

impl Slot {
    /// Returns `None` for coordinates outside 1..=DAYS x 0..=PERIODS.
    pub fn new(day: i64, period: i64) -> Option<Slot> {
        let day = usize::try_from(day).ok()?;
        let period = usize::try_from(period).ok()?;
        if !(1..=DAYS).contains(&day) || period >= PERIOD_SLOTS {
            return None;
        }
        Some(Slot { day, period })
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Fixed day x period table of cells. Every cell exists from construction on,
/// so readers never deal with a missing cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScheduleGrid {
    cells: [[Cell; PERIOD_SLOTS]; DAYS],
}

impl Default for ScheduleGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleGrid {
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| Cell::new())),
        }
    }

    pub fn cell(&self, slot: Slot) -> &Cell {
        &self.cells[slot.day - 1][slot.period]
    }

    /// Lookup by raw coordinates; anything outside the shape is `None`.
    pub fn get(&self, day: i64, period: i64) -> Option<&Cell> {
        Slot::new(day, period).map(|slot| self.cell(slot))
    }

    /// Adds `participant` under `course` at `slot`, keeping the list sorted.
    /// An identical participant already present is kept; the new one goes after it.
    pub fn record(&mut self, slot: Slot, course: &str, participant: &str) {
        let list = self.cells[slot.day - 1][slot.period]
            .entry(course.to_string())
            .or_default();
        let at = list.partition_point(|p| p.as_str() <= participant);
        list.insert(at, participant.to_string());
    }

    /// Every cell with its slot, day-major.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(d, row)| {
            row.iter().enumerate().map(move |(p, cell)| {
                (
                    Slot {
                        day: d + 1,
                        period: p,
                    },
                    cell,
                )
            })
        })
    }

    /// Flattened (slot, course, participant) triples.
    pub fn entries(&self) -> impl Iterator<Item = (Slot, &str, &str)> + '_ {
        self.slots().flat_map(|(slot, cell)| {
            cell.iter().flat_map(move |(course, people)| {
                people
                    .iter()
                    .map(move |p| (slot, course.as_str(), p.as_str()))
            })
        })
    }

    pub fn cell_count(&self) -> usize {
        DAYS * PERIOD_SLOTS
    }

    pub fn is_empty(&self) -> bool {
        self.slots().all(|(_, cell)| cell.is_empty())
    }
}
