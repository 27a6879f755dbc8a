use crate::aggregate::{Classes, Teachers};
use crate::config::TimetableConfig;
use crate::subject::SubjectClassifier;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub class_id: String,
    pub class_number_code: i64,
    pub number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeGroup {
    pub grade: i64,
    pub label: String,
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherEntry {
    pub teacher_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGroup {
    pub label: String,
    pub prefixes: Vec<char>,
    pub teachers: Vec<TeacherEntry>,
}

/// Classes grouped by grade. Every configured grade gets a group, even when
/// empty; other grades follow in ascending order.
pub fn build_class_index(classes: &Classes, config: &TimetableConfig) -> Vec<GradeGroup> {
    let mut by_grade: BTreeMap<i64, Vec<ClassEntry>> = (1..=config.grade_labels.len() as i64)
        .map(|g| (g, Vec::new()))
        .collect();
    for class in classes.values() {
        by_grade.entry(class.grade).or_default().push(ClassEntry {
            class_id: class.class_id.clone(),
            class_number_code: class.class_number_code,
            number: class.number,
        });
    }

    by_grade
        .into_iter()
        .map(|(grade, mut entries)| {
            entries.sort_by(|a, b| (a.number, &a.class_id).cmp(&(b.number, &b.class_id)));
            GradeGroup {
                grade,
                label: config.grade_label(grade),
                classes: entries,
            }
        })
        .collect()
}

/// Named teachers bucketed into subject categories, ascending by identifier.
pub fn build_teacher_index(teachers: &Teachers, classifier: &SubjectClassifier) -> Vec<SubjectGroup> {
    let mut groups: Vec<SubjectGroup> = classifier
        .categories()
        .iter()
        .map(|c| SubjectGroup {
            label: c.label.clone(),
            prefixes: c.prefixes.clone(),
            teachers: Vec::new(),
        })
        .collect();

    // BTreeMap iteration is already ascending by identifier.
    for teacher in teachers.values().filter(|t| !t.is_sentinel()) {
        if teacher.teacher_id.is_empty() {
            continue;
        }
        let idx = classifier.classify(&teacher.teacher_id);
        groups[idx].teachers.push(TeacherEntry {
            teacher_id: teacher.teacher_id.clone(),
            name: teacher.name.clone(),
        });
    }
    groups
}
