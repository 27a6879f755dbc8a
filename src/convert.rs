use crate::aggregate::{aggregate, Timetable};
use crate::config::TimetableConfig;
use crate::error::Result;
use crate::index::{build_class_index, build_teacher_index, GradeGroup, SubjectGroup};
use crate::package::{package_timetable, PackageSummary};
use crate::render::{DocumentContext, Renderer};
use crate::source::{read_source, read_source_file, SourceSheet};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertSummary {
    pub source_fingerprint: String,
    pub classes: usize,
    pub teachers: usize,
    pub rows_ingested: usize,
    pub rows_discarded: usize,
    pub documents_written: usize,
    pub documents_skipped: usize,
    pub package: PackageSummary,
}

pub struct Conversion {
    pub archive: Vec<u8>,
    pub summary: ConvertSummary,
}

/// Aggregated sheet plus both index views, without any rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub source_fingerprint: String,
    pub timetable: Timetable,
    pub class_index: Vec<GradeGroup>,
    pub teacher_index: Vec<SubjectGroup>,
}

pub fn preview_sheet(sheet: &SourceSheet, config: &TimetableConfig) -> Result<Preview> {
    let timetable = aggregate(&sheet.rows);
    let class_index = build_class_index(&timetable.classes, config);
    let teacher_index = build_teacher_index(&timetable.teachers, &config.classifier()?);
    Ok(Preview {
        source_fingerprint: sheet.fingerprint.clone(),
        timetable,
        class_index,
        teacher_index,
    })
}

pub fn convert_sheet(
    sheet: &SourceSheet,
    renderer: &Renderer,
    config: &TimetableConfig,
) -> Result<Conversion> {
    let preview = preview_sheet(sheet, config)?;
    let doc = DocumentContext::new(config, &preview.timetable);
    let (archive, package) = package_timetable(
        renderer,
        &doc,
        &preview.class_index,
        &preview.teacher_index,
    )?;

    let stats = preview.timetable.stats;
    let summary = ConvertSummary {
        source_fingerprint: preview.source_fingerprint.clone(),
        classes: preview.timetable.classes.len(),
        teachers: preview.timetable.named_teachers().count(),
        rows_ingested: stats.rows_ingested,
        rows_discarded: stats.rows_discarded,
        documents_written: package.entries.len(),
        documents_skipped: package.skipped.len(),
        package,
    };
    info!(
        classes = summary.classes,
        teachers = summary.teachers,
        documents = summary.documents_written,
        skipped = summary.documents_skipped,
        "conversion finished"
    );
    Ok(Conversion { archive, summary })
}

pub fn convert_bytes(
    bytes: &[u8],
    renderer: &Renderer,
    config: &TimetableConfig,
) -> Result<Conversion> {
    convert_sheet(&read_source(bytes)?, renderer, config)
}

/// Converts `in_path` and writes the archive to `out_path`. The archive is
/// written beside the target first, so a failed write never leaves a torn file.
pub fn convert_file(
    in_path: &Path,
    out_path: &Path,
    renderer: &Renderer,
    config: &TimetableConfig,
) -> Result<ConvertSummary> {
    let sheet = read_source_file(in_path)?;
    let conversion = convert_sheet(&sheet, renderer, config)?;

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    replace_file(out_path, |f| f.write_all(&conversion.archive))?;
    Ok(conversion.summary)
}

/// Fills `<target>.partial` through `fill`, then renames it over `target`.
/// The partial file is removed whenever any step fails.
fn replace_file<F>(target: &Path, fill: F) -> std::io::Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut tmp_name = target.as_os_str().to_owned();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);
    let written = File::create(&tmp_path).and_then(|mut f| {
        fill(&mut f)?;
        f.sync_all()
    });
    let result = written.and_then(|()| std::fs::rename(&tmp_path, target));
    if result.is_err() && tmp_path.is_file() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "timetabled-{name}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = scratch("replace-write");
        let target = dir.join("out.zip");
        let err = replace_file(&target, |f| {
            f.write_all(b"half")?;
            Err(Error::new(ErrorKind::Other, "disk full"))
        })
        .expect_err("write fails");
        assert_eq!(err.to_string(), "disk full");
        assert!(!dir.join("out.zip.partial").exists());
        assert!(!target.exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn failed_rename_leaves_no_partial_file() {
        let dir = scratch("replace-rename");
        let target = dir.join("out.zip");
        std::fs::create_dir_all(target.join("occupied")).expect("block target");
        replace_file(&target, |f| f.write_all(b"zip")).expect_err("rename fails");
        assert!(!dir.join("out.zip.partial").exists());
        assert!(target.is_dir());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn successful_write_replaces_target() {
        let dir = scratch("replace-ok");
        let target = dir.join("out.zip");
        std::fs::write(&target, b"old").expect("seed");
        replace_file(&target, |f| f.write_all(b"new")).expect("replace");
        assert_eq!(std::fs::read(&target).expect("read"), b"new");
        assert!(!dir.join("out.zip.partial").exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
