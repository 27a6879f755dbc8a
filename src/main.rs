use anyhow::Context;
use std::io;
use timetabled::config::TimetableConfig;
use timetabled::ipc;
use timetabled::render::Renderer;
use tracing::info;

fn main() -> anyhow::Result<()> {
    timetabled::logging::init();

    let config = TimetableConfig::from_env()?;
    let renderer = Renderer::new().context("failed to load document templates")?;
    let state = ipc::AppState { config, renderer };
    info!(version = env!("CARGO_PKG_VERSION"), "timetabled ready");

    ipc::serve(&state, io::stdin().lock(), io::stdout().lock()).context("stdout closed")?;
    Ok(())
}
