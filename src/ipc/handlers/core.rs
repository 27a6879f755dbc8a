use crate::ipc::reply::{ok, Reply};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &AppState, req: &Request) -> Reply {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "gradeLabels": state.config.grade_labels,
            "subjects": state.config.subjects.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
        }),
    )
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<Reply> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
