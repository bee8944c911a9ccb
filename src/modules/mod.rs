pub mod books;

use std::sync::Arc;
use std::time::Duration;

use shelf_books::BookService;
use shelf_kernel::ModuleRegistry;

/// Register all project modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    service: Arc<BookService>,
    op_timeout: Duration,
) -> anyhow::Result<()> {
    registry.register(books::create_module(service, op_timeout))?;
    Ok(())
}
