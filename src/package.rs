use crate::aggregate::Timetable;
use crate::error::Result;
use crate::index::{GradeGroup, SubjectGroup};
use crate::render::{DocumentContext, Renderer};
use serde::Serialize;
use std::io::{Cursor, Write};
use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CLASS_INDEX_ENTRY: &str = "_ClassIndex.html";
pub const TEACHER_INDEX_ENTRY: &str = "_TeachIndex.html";
const DOCUMENT_EXT: &str = "HTML";

pub fn class_entry_name(class_id: &str) -> String {
    format!("C{class_id}.{DOCUMENT_EXT}")
}

pub fn teacher_entry_name(teacher_id: &str) -> String {
    format!("T{teacher_id}.{DOCUMENT_EXT}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDocument {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    pub entries: Vec<String>,
    pub skipped: Vec<SkippedDocument>,
}

/// In-memory zip that keeps going when a single document fails.
pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    opts: FileOptions,
    summary: PackageSummary,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            opts: FileOptions::default().compression_method(CompressionMethod::Deflated),
            summary: PackageSummary::default(),
        }
    }

    /// Adds `name` with the rendered body. A render or write failure is logged
    /// and recorded; the archive stays usable.
    pub fn add_document<F>(&mut self, name: &str, render: F)
    where
        F: FnOnce() -> Result<String>,
    {
        let outcome = render().and_then(|body| {
            self.zip.start_file(name, self.opts)?;
            self.zip.write_all(body.as_bytes())?;
            Ok(())
        });
        match outcome {
            Ok(()) => self.summary.entries.push(name.to_string()),
            Err(e) => {
                warn!(document = name, error = %e, "skipping document");
                self.summary.skipped.push(SkippedDocument {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn finish(mut self) -> Result<(Vec<u8>, PackageSummary)> {
        let cursor = self.zip.finish()?;
        Ok((cursor.into_inner(), self.summary))
    }
}

/// Renders every class, every named teacher and both indexes into one zip.
pub fn package_timetable(
    renderer: &Renderer,
    doc: &DocumentContext,
    class_index: &[GradeGroup],
    teacher_index: &[SubjectGroup],
) -> Result<(Vec<u8>, PackageSummary)> {
    let timetable: &Timetable = doc.timetable;
    let mut archive = ArchiveBuilder::new();

    for class in timetable.classes.values() {
        archive.add_document(&class_entry_name(&class.class_id), || {
            renderer.render_class(doc, class)
        });
    }
    for teacher in timetable.named_teachers() {
        archive.add_document(&teacher_entry_name(&teacher.teacher_id), || {
            renderer.render_teacher(doc, teacher)
        });
    }
    archive.add_document(CLASS_INDEX_ENTRY, || {
        renderer.render_class_index(doc, class_index)
    });
    archive.add_document(TEACHER_INDEX_ENTRY, || {
        renderer.render_teacher_index(doc, teacher_index)
    });

    archive.finish()
}
