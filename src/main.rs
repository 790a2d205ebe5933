#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::sync::Arc;

mod client;
mod clipboard;
mod config;
mod controller;
mod direction;
mod error;
mod logger;
mod ui;
mod worker;

fn main() -> anyhow::Result<()> {
    // Init logger first
    logger::init();
    tracing::info!("App starting");

    // Config: config.json next to exe; env var overrides the endpoint.
    let mut cfg = config::Config::load();
    cfg.apply_env_override(std::env::var(config::ENDPOINT_ENV).ok());
    tracing::info!("Endpoint: {}", cfg.endpoint);

    let backend = client::HttpBackend::new(&cfg)?;
    let worker = worker::TranslationWorker::spawn(Arc::new(backend))?;

    // Run UI on main thread (blocks)
    if let Err(e) = ui::run(worker) {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
