use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use timetabled::config::TimetableConfig;
use timetabled::convert::{convert_bytes, convert_file};
use timetabled::package::{ArchiveBuilder, CLASS_INDEX_ENTRY, TEACHER_INDEX_ENTRY};
use timetabled::render::Renderer;
use timetabled::TimetableError;

const SHEET: &str = "\
class,code,day,period,x,course,x,x,x,teacher,name
101,101,1,1,,Math,,,,C01,Wang
101,101,1,1,,Math,,,,C02,Lin
101,101,2,6,,English,,,,B01,Chen
205,205,3,2,,Study,,,,,
bad,abc,1,1,,Math,,,,C09,Ghost
";

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect();
    names.sort();
    names
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    let mut out = String::new();
    archive
        .by_name(name)
        .expect("entry present")
        .read_to_string(&mut out)
        .expect("read entry");
    out
}

#[test]
fn archive_holds_every_document_with_reserved_names() {
    let renderer = Renderer::new().expect("templates");
    let cfg = TimetableConfig::default();
    let conv = convert_bytes(SHEET.as_bytes(), &renderer, &cfg).expect("convert");

    assert_eq!(
        entry_names(&conv.archive),
        vec![
            "C101.HTML",
            "C205.HTML",
            "TB01.HTML",
            "TC01.HTML",
            "TC02.HTML",
            "_ClassIndex.html",
            "_TeachIndex.html",
        ]
    );
    assert_eq!(conv.summary.classes, 2);
    assert_eq!(conv.summary.teachers, 3);
    assert_eq!(conv.summary.rows_ingested, 4);
    assert_eq!(conv.summary.rows_discarded, 1);
    assert_eq!(conv.summary.documents_written, 7);
    assert_eq!(conv.summary.documents_skipped, 0);
    assert!(!entry_names(&conv.archive).contains(&"Tempty.HTML".to_string()));
}

#[test]
fn documents_cross_link() {
    let renderer = Renderer::new().expect("templates");
    let cfg = TimetableConfig::default();
    let conv = convert_bytes(SHEET.as_bytes(), &renderer, &cfg).expect("convert");

    let class_doc = read_entry(&conv.archive, "C101.HTML");
    assert!(class_doc.contains("href=\"TC01.HTML\""));
    assert!(class_doc.contains("Wang"));
    assert!(class_doc.contains("English"));
    assert!(class_doc.contains("0800"));
    assert!(class_doc.contains(CLASS_INDEX_ENTRY));

    let study = read_entry(&conv.archive, "C205.HTML");
    assert!(study.contains("Study"));
    assert!(!study.contains("Tempty.HTML"));

    let teacher_doc = read_entry(&conv.archive, "TC02.HTML");
    assert!(teacher_doc.contains("href=\"C101.HTML\""));
    assert!(teacher_doc.contains("Lin"));

    let class_index = read_entry(&conv.archive, CLASS_INDEX_ENTRY);
    assert!(class_index.contains("高一"));
    assert!(class_index.contains("href=\"C205.HTML\""));

    let teacher_index = read_entry(&conv.archive, TEACHER_INDEX_ENTRY);
    assert!(teacher_index.contains("數學科"));
    assert!(teacher_index.contains("href=\"TB01.HTML\""));
    assert!(!teacher_index.contains("Tempty"));
}

#[test]
fn failing_document_is_skipped_not_fatal() {
    let mut archive = ArchiveBuilder::new();
    archive.add_document("ok.html", || Ok("<p>fine</p>".to_string()));
    archive.add_document("broken.html", || {
        Err(TimetableError::SourceFormat("render exploded".to_string()))
    });
    archive.add_document("after.html", || Ok("<p>still here</p>".to_string()));
    let (bytes, summary) = archive.finish().expect("finish");

    assert_eq!(summary.entries, vec!["ok.html", "after.html"]);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name, "broken.html");
    assert!(summary.skipped[0].reason.contains("render exploded"));
    assert_eq!(entry_names(&bytes), vec!["after.html", "ok.html"]);
}

#[test]
fn convert_file_writes_archive_to_disk() {
    let dir = temp_dir("timetabled-convert-file");
    let input = dir.join("sheet.csv");
    std::fs::write(&input, SHEET).expect("write sheet");
    let out = dir.join("nested/out/timetables.zip");

    let renderer = Renderer::new().expect("templates");
    let cfg = TimetableConfig::default();
    let summary = convert_file(&input, &out, &renderer, &cfg).expect("convert file");
    assert_eq!(summary.documents_written, 7);

    let bytes = std::fs::read(&out).expect("read archive");
    assert_eq!(entry_names(&bytes).len(), 7);
    assert!(!dir.join("nested/out/timetables.zip.partial").exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_source_fails_the_conversion() {
    let dir = temp_dir("timetabled-convert-missing");
    let renderer = Renderer::new().expect("templates");
    let cfg = TimetableConfig::default();
    let err = convert_file(&dir.join("absent.csv"), &dir.join("out.zip"), &renderer, &cfg)
        .expect_err("missing source");
    assert_eq!(err.code(), "source_failed");
    assert!(!dir.join("out.zip").exists());
    let _ = std::fs::remove_dir_all(dir);
}
