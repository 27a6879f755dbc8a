use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::reply::{err, Reply};

pub fn handle_request(state: &AppState, req: Request) -> Reply {
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::timetable::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
