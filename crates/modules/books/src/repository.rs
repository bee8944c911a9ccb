//! Persistence port for books.

use async_trait::async_trait;

use crate::book::{Book, NewBook};
use crate::error::BookResult;

/// Storage contract implemented by an external store.
///
/// Every lookup and mutation is scoped by the owner. A row owned by someone
/// else is reported as [`BookError::NotFound`](crate::BookError::NotFound),
/// exactly like a missing row. Each call must be atomic for the single row it
/// touches; concurrent writers to the same row resolve last-write-wins.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new book, assigning `id`, `created_at` and `updated_at`.
    async fn create(&self, book: NewBook) -> BookResult<Book>;

    /// Fetch a book only if it belongs to `user_id`.
    async fn get_by_id(&self, id: &str, user_id: &str) -> BookResult<Book>;

    /// Books owned by `user_id`, newest first. An empty keyword returns all of
    /// them, otherwise only those matching [`Book::matches_keyword`].
    async fn list_by_owner(&self, user_id: &str, keyword: &str) -> BookResult<Vec<Book>>;

    /// Overwrite the mutable fields of the row matching `(book.id, book.user_id)`
    /// and refresh `book.updated_at` to the stored value.
    async fn update(&self, book: &mut Book) -> BookResult<()>;

    /// Remove the row matching `(id, user_id)`.
    async fn delete(&self, id: &str, user_id: &str) -> BookResult<()>;
}
