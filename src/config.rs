use crate::error::{Result, TimetableError};
use crate::grid::{DAYS, PERIOD_SLOTS};
use crate::subject::{SubjectCategory, SubjectClassifier};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON config override.
pub const CONFIG_ENV: &str = "TIMETABLED_CONFIG";

/// Period slots 0..=PERIODS, including the placeholder slot 0.
pub const SLOT_TABLE_LEN: usize = PERIOD_SLOTS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub label: String,
    pub start_time: String,
    pub end_time: String,
}

impl PeriodInfo {
    fn new(label: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            label: label.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.start_time.is_empty() && self.end_time.is_empty()
    }
}

/// Static lookup tables shared by the aggregation, index and render steps.
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimetableConfig {
    /// Index 0 labels grade 1.
    pub grade_labels: Vec<String>,
    /// Column headings for days 1..=DAYS.
    pub day_labels: Vec<String>,
    /// Display info for slots 0..=PERIODS; reserved slots are blank.
    pub periods: Vec<PeriodInfo>,
    /// Teaching ordinal per slot; `None` marks a reserved slot.
    pub slot_ordinals: Vec<Option<u8>>,
    pub subjects: Vec<SubjectCategory>,
}

fn labels(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            grade_labels: labels(&["高一", "高二", "高三"]),
            day_labels: labels(&["一", "二", "三", "四", "五", "六"]),
            periods: vec![
                PeriodInfo::default(),
                PeriodInfo::new("一", "0800", "0850"),
                PeriodInfo::new("二", "0900", "0950"),
                PeriodInfo::new("三", "1010", "1100"),
                PeriodInfo::new("四", "1110", "1200"),
                PeriodInfo::default(),
                PeriodInfo::new("五", "1310", "1400"),
                PeriodInfo::new("六", "1410", "1500"),
                PeriodInfo::new("七", "1510", "1600"),
                PeriodInfo::new("八", "1610", "1700"),
            ],
            slot_ordinals: vec![
                None,
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                None,
                Some(5),
                Some(6),
                Some(7),
                Some(8),
            ],
            subjects: vec![
                SubjectCategory::new("國文科", &['A']),
                SubjectCategory::new("英文科", &['B']),
                SubjectCategory::new("數學科", &['C']),
                SubjectCategory::new("社會科", &['D', 'E', 'F']),
                SubjectCategory::new("自然科", &['G', 'H', 'I']),
                SubjectCategory::new("藝能科", &['J', 'K', 'L']),
                SubjectCategory::new("外聘教師", &[]),
            ],
        }
    }
}

impl TimetableConfig {
    /// Reads `path` as JSON; absent keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.to_string_lossy()))?;
        let cfg: TimetableConfig = serde_json::from_str(&text)
            .with_context(|| format!("config {} is invalid JSON", path.to_string_lossy()))?;
        cfg.validate()
            .with_context(|| format!("config {} rejected", path.to_string_lossy()))?;
        Ok(cfg)
    }

    /// Defaults, or the file named by `TIMETABLED_CONFIG` when set.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Self::load(Path::new(&p)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.periods.len() != SLOT_TABLE_LEN {
            return Err(TimetableError::Config(format!(
                "periods must have {} entries, got {}",
                SLOT_TABLE_LEN,
                self.periods.len()
            )));
        }
        if self.slot_ordinals.len() != SLOT_TABLE_LEN {
            return Err(TimetableError::Config(format!(
                "slotOrdinals must have {} entries, got {}",
                SLOT_TABLE_LEN,
                self.slot_ordinals.len()
            )));
        }
        for (slot, (info, ordinal)) in self.periods.iter().zip(&self.slot_ordinals).enumerate() {
            if info.is_blank() != ordinal.is_none() {
                return Err(TimetableError::Config(format!(
                    "slot {slot}: blank period info must match a reserved ordinal"
                )));
            }
        }
        if self.day_labels.len() != DAYS {
            return Err(TimetableError::Config(format!(
                "dayLabels must have {} entries, got {}",
                DAYS,
                self.day_labels.len()
            )));
        }
        SubjectClassifier::new(&self.subjects)?;
        Ok(())
    }

    pub fn classifier(&self) -> Result<SubjectClassifier> {
        SubjectClassifier::new(&self.subjects)
    }

    pub fn grade_label(&self, grade: i64) -> String {
        usize::try_from(grade - 1)
            .ok()
            .and_then(|i| self.grade_labels.get(i))
            .cloned()
            .unwrap_or_else(|| format!("Grade {grade}"))
    }
}
