//! Store factory and the in-process book store.

pub mod book_store;
pub mod collection;

use std::sync::Arc;

use shelf_books::BookRepository;
use shelf_kernel::settings::{StoreKind, StoreSettings};

pub use book_store::MemoryBookStore;
pub use collection::Collection;

/// Open the book store selected by `settings`.
pub fn open_book_store(settings: &StoreSettings) -> anyhow::Result<Arc<dyn BookRepository>> {
    match settings.kind {
        StoreKind::Memory => {
            tracing::info!(target: "shelf-db", kind = "memory", "book store opened");
            Ok(Arc::new(MemoryBookStore::new()))
        }
    }
}
