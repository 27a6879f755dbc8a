use crate::aggregate::Timetable;
use crate::config::TimetableConfig;
use crate::error::Result;
use crate::grid::{ScheduleGrid, Slot, DAYS, PERIODS};
use crate::index::{GradeGroup, SubjectGroup};
use crate::model::{ClassRecord, TeacherRecord, SENTINEL_TEACHER_ID};
use crate::package::{class_entry_name, teacher_entry_name, CLASS_INDEX_ENTRY, TEACHER_INDEX_ENTRY};
use handlebars::Handlebars;
use serde::Serialize;

const CLASS_TEMPLATE: &str = "class";
const TEACHER_TEMPLATE: &str = "teacher";
const CLASS_INDEX_TEMPLATE: &str = "class_index";
const TEACHER_INDEX_TEMPLATE: &str = "teacher_index";

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const BREAK_LABEL: &str = "午休";

/// Handlebars registry with the four document templates. Read-only once built.
pub struct Renderer {
    registry: Handlebars<'static>,
}

/// Everything a single conversion shares across its documents.
pub struct DocumentContext<'a> {
    pub config: &'a TimetableConfig,
    pub timetable: &'a Timetable,
    pub updated_at: String,
}

impl<'a> DocumentContext<'a> {
    pub fn new(config: &'a TimetableConfig, timetable: &'a Timetable) -> Self {
        Self {
            config,
            timetable,
            updated_at: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize)]
struct LinkView {
    label: String,
    href: String,
}

#[derive(Serialize)]
struct CourseView {
    name: String,
    links: Vec<LinkView>,
}

#[derive(Serialize)]
struct RowView {
    is_break: bool,
    label: String,
    start_time: String,
    end_time: String,
    cells: Vec<Vec<CourseView>>,
}

#[derive(Serialize)]
struct GridView<'a> {
    title: String,
    subtitle: String,
    updated_at: &'a str,
    days: &'a [String],
    rows: Vec<RowView>,
    class_index: &'static str,
    teacher_index: &'static str,
}

#[derive(Serialize)]
struct ClassIndexView<'a> {
    updated_at: &'a str,
    groups: Vec<ClassIndexGroupView<'a>>,
    teacher_index: &'static str,
}

#[derive(Serialize)]
struct ClassIndexGroupView<'a> {
    label: &'a str,
    classes: Vec<LinkView>,
}

#[derive(Serialize)]
struct TeacherIndexView<'a> {
    updated_at: &'a str,
    groups: Vec<TeacherIndexGroupView<'a>>,
    class_index: &'static str,
}

#[derive(Serialize)]
struct TeacherIndexGroupView<'a> {
    label: &'a str,
    teachers: Vec<LinkView>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(CLASS_TEMPLATE, include_str!("../templates/class.hbs"))?;
        registry
            .register_template_string(TEACHER_TEMPLATE, include_str!("../templates/teacher.hbs"))?;
        registry.register_template_string(
            CLASS_INDEX_TEMPLATE,
            include_str!("../templates/class_index.hbs"),
        )?;
        registry.register_template_string(
            TEACHER_INDEX_TEMPLATE,
            include_str!("../templates/teacher_index.hbs"),
        )?;
        Ok(Self { registry })
    }

    pub fn render_class(&self, doc: &DocumentContext, class: &ClassRecord) -> Result<String> {
        let teachers = &doc.timetable.teachers;
        let rows = grid_rows(doc.config, &class.grid, |teacher_id| {
            if teacher_id == SENTINEL_TEACHER_ID {
                return None;
            }
            let label = teachers
                .get(teacher_id)
                .map(|t| t.name.as_str())
                .filter(|n| !n.is_empty())
                .unwrap_or(teacher_id);
            Some(LinkView {
                label: label.to_string(),
                href: teacher_entry_name(teacher_id),
            })
        });
        let view = GridView {
            title: format!("{} 班級課表", class.class_id),
            subtitle: format!(
                "{} {} 班",
                doc.config.grade_label(class.grade),
                class.number
            ),
            updated_at: &doc.updated_at,
            days: &doc.config.day_labels,
            rows,
            class_index: CLASS_INDEX_ENTRY,
            teacher_index: TEACHER_INDEX_ENTRY,
        };
        Ok(self.registry.render(CLASS_TEMPLATE, &view)?)
    }

    pub fn render_teacher(&self, doc: &DocumentContext, teacher: &TeacherRecord) -> Result<String> {
        let rows = grid_rows(doc.config, &teacher.grid, |class_id| {
            Some(LinkView {
                label: class_id.to_string(),
                href: class_entry_name(class_id),
            })
        });
        let view = GridView {
            title: format!("{} 教師課表", teacher.teacher_id),
            subtitle: teacher.name.clone(),
            updated_at: &doc.updated_at,
            days: &doc.config.day_labels,
            rows,
            class_index: CLASS_INDEX_ENTRY,
            teacher_index: TEACHER_INDEX_ENTRY,
        };
        Ok(self.registry.render(TEACHER_TEMPLATE, &view)?)
    }

    pub fn render_class_index(&self, doc: &DocumentContext, groups: &[GradeGroup]) -> Result<String> {
        let view = ClassIndexView {
            updated_at: &doc.updated_at,
            groups: groups
                .iter()
                .map(|g| ClassIndexGroupView {
                    label: &g.label,
                    classes: g
                        .classes
                        .iter()
                        .map(|c| LinkView {
                            label: c.class_id.clone(),
                            href: class_entry_name(&c.class_id),
                        })
                        .collect(),
                })
                .collect(),
            teacher_index: TEACHER_INDEX_ENTRY,
        };
        Ok(self.registry.render(CLASS_INDEX_TEMPLATE, &view)?)
    }

    pub fn render_teacher_index(
        &self,
        doc: &DocumentContext,
        groups: &[SubjectGroup],
    ) -> Result<String> {
        let view = TeacherIndexView {
            updated_at: &doc.updated_at,
            groups: groups
                .iter()
                .map(|g| TeacherIndexGroupView {
                    label: &g.label,
                    teachers: g
                        .teachers
                        .iter()
                        .map(|t| LinkView {
                            label: if t.name.is_empty() {
                                t.teacher_id.clone()
                            } else {
                                format!("{} {}", t.teacher_id, t.name)
                            },
                            href: teacher_entry_name(&t.teacher_id),
                        })
                        .collect(),
                })
                .collect(),
            class_index: CLASS_INDEX_ENTRY,
        };
        Ok(self.registry.render(TEACHER_INDEX_TEMPLATE, &view)?)
    }
}

/// One table row per period slot, one cell per day.
fn grid_rows<F>(config: &TimetableConfig, grid: &ScheduleGrid, link: F) -> Vec<RowView>
where
    F: Fn(&str) -> Option<LinkView>,
{
    (1..=PERIODS)
        .map(|period| {
            let info = config.periods.get(period).cloned().unwrap_or_default();
            let is_break = config.slot_ordinals.get(period).copied().flatten().is_none();
            let cells: Vec<Vec<CourseView>> = (1..=DAYS)
                .map(|day| {
                    grid.cell(Slot { day, period })
                        .iter()
                        .map(|(course, people)| CourseView {
                            name: course.clone(),
                            links: people.iter().filter_map(|p| link(p.as_str())).collect(),
                        })
                        .collect()
                })
                .collect();
            RowView {
                is_break,
                label: if is_break {
                    BREAK_LABEL.to_string()
                } else {
                    info.label
                },
                start_time: info.start_time,
                end_time: info.end_time,
                cells,
            }
        })
        .collect()
}
