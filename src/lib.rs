//! Shelf application library
//!
//! Wires the store, the assist backend and the book use cases into HTTP
//! modules and runs the server.

pub mod modules;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shelf_books::BookService;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build the book use cases from settings.
///
/// Runs without an assist backend when no API key is configured.
pub fn book_service(settings: &Settings) -> anyhow::Result<Arc<BookService>> {
    let store = shelf_db::open_book_store(&settings.store).context("failed to open book store")?;

    let assist = shelf_assist::from_settings(&settings.assist)
        .context("failed to create assist backend")?;
    if assist.is_none() {
        tracing::warn!("assist not configured; titles, tags and merges use fallbacks");
    }

    Ok(Arc::new(BookService::new(store, assist)))
}

/// Register and initialize every module.
pub async fn build_registry(
    settings: &Settings,
    service: Arc<BookService>,
) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    let op_timeout = Duration::from_millis(settings.server.request_timeout_ms);
    modules::register_all(&mut registry, service, op_timeout)?;

    registry
        .init_all(&InitCtx { settings })
        .await
        .context("failed to initialize modules")?;
    Ok(registry)
}

/// Serve until shutdown, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let service = book_service(&settings)?;
    let registry = build_registry(&settings, service).await?;

    let served = shelf_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
