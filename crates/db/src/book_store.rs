//! Book persistence over a [`Collection`].

use async_trait::async_trait;
use shelf_books::{Book, BookError, BookRepository, BookResult, NewBook};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::collection::Collection;

/// Source of "now" for row timestamps.
pub type Clock = fn() -> OffsetDateTime;

/// In-process book store. Rows are soft-deleted; ids are UUIDv7 strings.
pub struct MemoryBookStore {
    rows: Collection<Book>,
    clock: Clock,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::with_clock(OffsetDateTime::now_utc)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            rows: Collection::new(),
            clock,
        }
    }

    /// Live (not deleted) rows across all owners.
    pub async fn len(&self) -> usize {
        self.rows.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.is_empty().await
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `now` if it moves forward from `previous`, else the smallest later instant.
fn advance(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    if now > previous {
        now
    } else {
        previous + time::Duration::microseconds(1)
    }
}

#[async_trait]
impl BookRepository for MemoryBookStore {
    async fn create(&self, book: NewBook) -> BookResult<Book> {
        let now = (self.clock)();
        let book = book.into_book(Uuid::now_v7().to_string(), now);

        if !self.rows.insert(book.id.clone(), book.clone()).await {
            return Err(BookError::store(format!("duplicate book id {}", book.id)));
        }
        tracing::debug!(book_id = %book.id, user_id = %book.user_id, "book row inserted");
        Ok(book)
    }

    async fn get_by_id(&self, id: &str, user_id: &str) -> BookResult<Book> {
        self.rows
            .get_if(id, |row| row.user_id == user_id)
            .await
            .ok_or(BookError::NotFound)
    }

    async fn list_by_owner(&self, user_id: &str, keyword: &str) -> BookResult<Vec<Book>> {
        let mut books = self
            .rows
            .scan(|row| row.user_id == user_id && row.matches_keyword(keyword))
            .await;
        books.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(books)
    }

    async fn update(&self, book: &mut Book) -> BookResult<()> {
        let now = (self.clock)();
        let incoming = book.clone();

        let stored = self
            .rows
            .update_if(
                &book.id,
                |row| row.user_id == incoming.user_id,
                |row| {
                    row.title = incoming.title;
                    row.author = incoming.author;
                    row.description = incoming.description;
                    row.content = incoming.content;
                    row.url = incoming.url;
                    row.tags = incoming.tags;
                    row.updated_at = advance(row.updated_at, now);
                },
            )
            .await
            .ok_or(BookError::NotFound)?;

        book.updated_at = stored.updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str, user_id: &str) -> BookResult<()> {
        let now = (self.clock)();
        if self.rows.delete_if(id, now, |row| row.user_id == user_id).await {
            Ok(())
        } else {
            Err(BookError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn draft(user_id: &str, title: &str, content: &str, tags: &[&str]) -> NewBook {
        NewBook {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..NewBook::new(user_id, content)
        }
    }

    fn frozen() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let store = MemoryBookStore::new();
        let book = store.create(draft("u1", "T", "body", &[])).await.unwrap();

        assert!(Uuid::parse_str(&book.id).is_ok());
        assert_eq!(book.created_at, book.updated_at);
        assert_eq!(store.get_by_id(&book.id, "u1").await.unwrap(), book);
    }

    #[tokio::test]
    async fn reads_and_writes_are_owner_scoped() {
        let store = MemoryBookStore::new();
        let mut book = store.create(draft("u1", "T", "body", &[])).await.unwrap();

        assert_eq!(
            store.get_by_id(&book.id, "u2").await.unwrap_err(),
            BookError::NotFound
        );

        let mut stolen = book.clone();
        stolen.user_id = "u2".to_string();
        stolen.title = "mine now".to_string();
        assert_eq!(
            store.update(&mut stolen).await.unwrap_err(),
            BookError::NotFound
        );
        assert_eq!(
            store.delete(&book.id, "u2").await.unwrap_err(),
            BookError::NotFound
        );

        book.title = "Renamed".to_string();
        store.update(&mut book).await.unwrap();
        assert_eq!(store.get_by_id(&book.id, "u1").await.unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn update_strictly_advances_updated_at() {
        let store = MemoryBookStore::with_clock(frozen);
        let mut book = store.create(draft("u1", "T", "body", &[])).await.unwrap();
        let created = book.created_at;

        store.update(&mut book).await.unwrap();
        let first = book.updated_at;
        store.update(&mut book).await.unwrap();

        assert!(first > created);
        assert!(book.updated_at > first);
        let stored = store.get_by_id(&book.id, "u1").await.unwrap();
        assert_eq!(stored.created_at, created);
        assert_eq!(stored.updated_at, book.updated_at);
    }

    #[tokio::test]
    async fn deleted_books_cannot_be_read_or_changed() {
        let store = MemoryBookStore::new();
        let mut book = store.create(draft("u1", "T", "body", &[])).await.unwrap();

        store.delete(&book.id, "u1").await.unwrap();

        assert_eq!(
            store.get_by_id(&book.id, "u1").await.unwrap_err(),
            BookError::NotFound
        );
        assert_eq!(store.update(&mut book).await.unwrap_err(), BookError::NotFound);
        assert_eq!(
            store.delete(&book.id, "u1").await.unwrap_err(),
            BookError::NotFound
        );
        assert!(store.list_by_owner("u1", "").await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn keyword_search_matches_title_content_or_tag_newest_first() {
        let store = MemoryBookStore::new();
        let graphql = store
            .create(draft("u1", "GraphQL Guide", "schema first", &["api"]))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let rest = store
            .create(draft("u1", "REST Guide", "verbs and nouns", &["API"]))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store
            .create(draft("u1", "JS Guide", "closures", &["javascript"]))
            .await
            .unwrap();
        store
            .create(draft("u2", "API elsewhere", "", &["api"]))
            .await
            .unwrap();

        let hits = store.list_by_owner("u1", "api").await.unwrap();
        let ids: Vec<_> = hits.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec![rest.id, graphql.id]);

        let by_content = store.list_by_owner("u1", "CLOSURES").await.unwrap();
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].title, "JS Guide");

        assert_eq!(store.list_by_owner("u1", "").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn equal_creation_times_order_by_id() {
        let store = MemoryBookStore::with_clock(frozen);
        for n in 0..4 {
            store
                .create(draft("u1", &format!("b{n}"), "c", &[]))
                .await
                .unwrap();
        }

        let listed = store.list_by_owner("u1", "").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|b| b.id.clone()).collect();
        let mut expected = ids.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn concurrent_creates_for_different_owners_do_not_interfere() {
        let store = Arc::new(MemoryBookStore::new());
        let mut handles = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let owner = format!("user-{n}");
                store.create(draft(&owner, "T", "body", &[])).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, 16);
        for n in 0..16 {
            let owned = store.list_by_owner(&format!("user-{n}"), "").await.unwrap();
            assert_eq!(owned.len(), 1);
        }
    }
}
