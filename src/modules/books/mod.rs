pub mod models;
mod openapi;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use shelf_books::BookService;
use shelf_kernel::{InitCtx, Module};

/// Shared handler state for the books routes
#[derive(Clone)]
pub struct BooksState {
    pub service: Arc<BookService>,
    /// Deadline given to every use case started by a request
    pub op_timeout: Duration,
}

/// Books module: the HTTP surface of the book use cases
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>, op_timeout: Duration) -> Self {
        Self {
            state: BooksState {
                service,
                op_timeout,
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            assist = self.state.service.has_assist(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(service: Arc<BookService>, op_timeout: Duration) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service, op_timeout))
}
