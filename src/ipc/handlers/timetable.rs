use crate::convert::{convert_file, preview_sheet, Preview};
use crate::ipc::reply::{err, from_timetable_error, ok, Reply};
use crate::ipc::types::{AppState, Request};
use crate::source::read_source_file;
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};

fn path_param(req: &Request, key: &str) -> Result<PathBuf, Reply> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {key}"), None))
}

fn str_param<'a>(req: &'a Request, key: &str) -> Result<&'a str, Reply> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {key}"), None))
}

fn load_preview(state: &AppState, req: &Request) -> Result<Preview, Reply> {
    let in_path = path_param(req, "inPath")?;
    let sheet = read_source_file(&in_path).map_err(|e| {
        err(
            &req.id,
            e.code(),
            e.to_string(),
            Some(json!({ "path": in_path.to_string_lossy() })),
        )
    })?;
    preview_sheet(&sheet, &state.config).map_err(|e| from_timetable_error(&req.id, &e))
}

fn to_json<T: serde::Serialize>(req: &Request, v: &T) -> Reply {
    match serde_json::to_value(v) {
        Ok(v) => ok(&req.id, v),
        Err(e) => err(&req.id, "internal", e.to_string(), None),
    }
}

fn handle_convert(state: &AppState, req: &Request) -> Reply {
    let in_path = match path_param(req, "inPath") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let out_path = match path_param(req, "outPath") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    info!(input = %in_path.display(), output = %out_path.display(), "converting timetable");

    match convert_file(&in_path, &out_path, &state.renderer, &state.config) {
        Ok(summary) => {
            let mut result = match serde_json::to_value(&summary) {
                Ok(v) => v,
                Err(e) => return err(&req.id, "internal", e.to_string(), None),
            };
            result["path"] = json!(out_path.to_string_lossy());
            ok(&req.id, result)
        }
        Err(e) => {
            error!(error = %e, "conversion failed");
            err(
                &req.id,
                e.code(),
                e.to_string(),
                Some(json!({ "inPath": in_path.to_string_lossy() })),
            )
        }
    }
}

fn handle_preview(state: &AppState, req: &Request) -> Reply {
    let preview = match load_preview(state, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    to_json(
        req,
        &json!({
            "sourceFingerprint": preview.source_fingerprint,
            "stats": preview.timetable.stats,
            "classIndex": preview.class_index,
            "teacherIndex": preview.teacher_index,
        }),
    )
}

fn handle_class(state: &AppState, req: &Request) -> Reply {
    let class_id = match str_param(req, "classId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let preview = match load_preview(state, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match preview.timetable.classes.get(class_id) {
        Some(class) => to_json(req, class),
        None => err(
            &req.id,
            "not_found",
            format!("class not found: {class_id}"),
            None,
        ),
    }
}

fn handle_teacher(state: &AppState, req: &Request) -> Reply {
    let teacher_id = match str_param(req, "teacherId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let preview = match load_preview(state, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match preview
        .timetable
        .teachers
        .get(teacher_id)
        .filter(|t| !t.is_sentinel())
    {
        Some(teacher) => to_json(req, teacher),
        None => err(
            &req.id,
            "not_found",
            format!("teacher not found: {teacher_id}"),
            None,
        ),
    }
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<Reply> {
    match req.method.as_str() {
        "timetable.convert" => Some(handle_convert(state, req)),
        "timetable.preview" => Some(handle_preview(state, req)),
        "timetable.class" => Some(handle_class(state, req)),
        "timetable.teacher" => Some(handle_teacher(state, req)),
        _ => None,
    }
}
