use crate::error::{Result, TimetableError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One teacher-index heading and the identifier prefixes routed to it.
/// A category without prefixes is the catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCategory {
    pub label: String,
    #[serde(default)]
    pub prefixes: Vec<char>,
}

impl SubjectCategory {
    pub fn new(label: &str, prefixes: &[char]) -> Self {
        Self {
            label: label.to_string(),
            prefixes: prefixes.to_vec(),
        }
    }
}

/// Routes a teacher identifier to a category by its first character.
#[derive(Debug, Clone)]
pub struct SubjectClassifier {
    categories: Vec<SubjectCategory>,
    routes: HashMap<char, usize>,
    catch_all: usize,
}

impl SubjectClassifier {
    pub fn new(categories: &[SubjectCategory]) -> Result<Self> {
        let mut routes = HashMap::new();
        let mut catch_all = None;
        for (idx, cat) in categories.iter().enumerate() {
            if cat.prefixes.is_empty() {
                if catch_all.replace(idx).is_some() {
                    return Err(TimetableError::Config(
                        "more than one subject category without prefixes".to_string(),
                    ));
                }
                continue;
            }
            for &ch in &cat.prefixes {
                if routes.insert(ch, idx).is_some() {
                    return Err(TimetableError::Config(format!(
                        "prefix {ch:?} routed to more than one subject category"
                    )));
                }
            }
        }
        let catch_all = catch_all.ok_or_else(|| {
            TimetableError::Config("no catch-all subject category".to_string())
        })?;
        Ok(Self {
            categories: categories.to_vec(),
            routes,
            catch_all,
        })
    }

    pub fn categories(&self) -> &[SubjectCategory] {
        &self.categories
    }

    /// Category index for `teacher_id`. Unknown prefixes land in the catch-all.
    pub fn classify(&self, teacher_id: &str) -> usize {
        teacher_id
            .chars()
            .next()
            .and_then(|ch| self.routes.get(&ch).copied())
            .unwrap_or(self.catch_all)
    }
}
