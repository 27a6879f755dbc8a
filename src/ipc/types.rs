use crate::config::TimetableConfig;
use crate::render::Renderer;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Process-wide state: built once before the first request, never mutated.
pub struct AppState {
    pub config: TimetableConfig,
    pub renderer: Renderer,
}
