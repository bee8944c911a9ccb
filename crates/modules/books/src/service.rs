//! Book use cases: ownership scoping, enrichment with fallback, and merging.

use std::fmt;
use std::sync::Arc;

use shelf_kernel::CallCtx;
use tracing::{debug, info, warn};

use crate::assist::AssistService;
use crate::book::{normalize_tags, tag_union, Book, BookFields, NewBook};
use crate::error::{BookError, BookResult};
use crate::repository::BookRepository;

/// Title used when none was supplied and none could be generated.
pub const UNTITLED: &str = "Untitled";

/// Title of a merged book when none could be generated.
pub const MERGED_TITLE: &str = "Merged Book";

/// Joins source contents when the assist merge is unavailable.
pub const MERGE_SEPARATOR: &str = "\n\n---\n\n";

/// Characters of content used as a last-resort summary.
const SUMMARY_FALLBACK_CHARS: usize = 300;

/// Where an enriched field value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Caller,
    Assist,
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provenance::Caller => "caller",
            Provenance::Assist => "assist",
            Provenance::Fallback => "fallback",
        })
    }
}

/// Orchestrates the persistence port and the optional assist port.
///
/// Holds no per-call state; both dependencies are shared handles.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookRepository>,
    assist: Option<Arc<dyn AssistService>>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookRepository>, assist: Option<Arc<dyn AssistService>>) -> Self {
        Self { store, assist }
    }

    pub fn has_assist(&self) -> bool {
        self.assist.is_some()
    }

    /// Create a book, generating title and tags when the caller left them empty.
    pub async fn save(&self, ctx: &CallCtx, user_id: &str, fields: BookFields) -> BookResult<Book> {
        require_user(user_id)?;
        if fields.content.is_empty() {
            return Err(BookError::validation("content is required"));
        }

        let draft = ctx.guard(self.enrich_new(user_id, fields)).await?;
        ctx.check()?;

        let book = self.store.create(draft).await?;
        info!(user_id, book_id = %book.id, "book saved");
        Ok(book)
    }

    pub async fn get(&self, ctx: &CallCtx, id: &str, user_id: &str) -> BookResult<Book> {
        require_user(user_id)?;
        require_book(id)?;

        ctx.guard(self.store.get_by_id(id, user_id)).await?
    }

    pub async fn list(&self, ctx: &CallCtx, user_id: &str, keyword: &str) -> BookResult<Vec<Book>> {
        require_user(user_id)?;

        let books = ctx
            .guard(self.store.list_by_owner(user_id, keyword))
            .await??;
        debug!(user_id, keyword, result_count = books.len(), "books listed");
        Ok(books)
    }

    /// Replace every mutable field of an owned book. No enrichment happens here.
    pub async fn update(
        &self,
        ctx: &CallCtx,
        id: &str,
        user_id: &str,
        fields: BookFields,
    ) -> BookResult<Book> {
        require_user(user_id)?;
        require_book(id)?;

        let mut book = ctx.guard(self.store.get_by_id(id, user_id)).await??;
        book.apply(fields);
        ctx.check()?;

        self.store.update(&mut book).await?;
        info!(user_id, book_id = %book.id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, ctx: &CallCtx, id: &str, user_id: &str) -> BookResult<()> {
        require_user(user_id)?;
        require_book(id)?;
        ctx.check()?;

        self.store.delete(id, user_id).await?;
        info!(user_id, book_id = id, "book deleted");
        Ok(())
    }

    /// Consolidate two or more owned books into a new one. Sources are left untouched.
    pub async fn merge(&self, ctx: &CallCtx, user_id: &str, book_ids: &[String]) -> BookResult<Book> {
        require_user(user_id)?;
        if book_ids.len() < 2 {
            return Err(BookError::validation(
                "at least 2 books are required for merging",
            ));
        }
        for id in book_ids {
            require_book(id)?;
        }

        let draft = ctx.guard(self.prepare_merge(user_id, book_ids)).await??;
        ctx.check()?;

        let book = self.store.create(draft).await?;
        info!(
            user_id,
            book_id = %book.id,
            source_count = book_ids.len(),
            "books merged"
        );
        Ok(book)
    }

    /// Summary of an owned book. Falls back to its description, then to the
    /// opening of its content.
    pub async fn summarize(&self, ctx: &CallCtx, id: &str, user_id: &str) -> BookResult<String> {
        require_user(user_id)?;
        require_book(id)?;

        ctx.guard(async {
            let book = self.store.get_by_id(id, user_id).await?;
            Ok::<_, BookError>(self.summary_of(&book).await)
        })
        .await?
    }

    async fn enrich_new(&self, user_id: &str, fields: BookFields) -> NewBook {
        let BookFields {
            title,
            author,
            description,
            content,
            url,
            tags,
        } = fields;

        let (title, title_source) = if title.is_empty() {
            self.generated_title(&content, UNTITLED).await
        } else {
            (title, Provenance::Caller)
        };

        // Any caller-supplied list counts, even one that normalizes to nothing
        let (tags, tags_source) = if tags.is_empty() {
            self.generated_tags(&content).await
        } else {
            (normalize_tags(tags), Provenance::Caller)
        };

        debug!(
            user_id,
            title_source = %title_source,
            tags_source = %tags_source,
            "book enrichment resolved"
        );

        NewBook {
            title,
            author,
            description,
            url,
            tags,
            ..NewBook::new(user_id, content)
        }
    }

    async fn prepare_merge(&self, user_id: &str, book_ids: &[String]) -> BookResult<NewBook> {
        let mut contents = Vec::with_capacity(book_ids.len());
        let mut source_tags = Vec::new();

        for id in book_ids {
            let book = self.store.get_by_id(id, user_id).await.inspect_err(|err| {
                warn!(user_id, book_id = %id, error = %err, "merge source lookup failed");
            })?;
            contents.push(book.content);
            source_tags.extend(book.tags);
        }

        let (content, content_source) = self.merged_content(&contents).await;
        let (title, title_source) = self.generated_title(&content, MERGED_TITLE).await;

        debug!(
            user_id,
            content_source = %content_source,
            title_source = %title_source,
            "merge enrichment resolved"
        );

        Ok(NewBook {
            title,
            tags: tag_union(source_tags),
            ..NewBook::new(user_id, content)
        })
    }

    async fn generated_title(&self, content: &str, fallback: &str) -> (String, Provenance) {
        let Some(assist) = &self.assist else {
            return (fallback.to_string(), Provenance::Fallback);
        };
        match assist.generate_title(content).await {
            Ok(title) => (title, Provenance::Assist),
            Err(err) => {
                warn!(error = %err, "failed to generate title");
                (fallback.to_string(), Provenance::Fallback)
            }
        }
    }

    async fn generated_tags(&self, content: &str) -> (Vec<String>, Provenance) {
        let Some(assist) = &self.assist else {
            return (Vec::new(), Provenance::Fallback);
        };
        match assist.generate_tags(content).await {
            Ok(tags) => (normalize_tags(tags), Provenance::Assist),
            Err(err) => {
                warn!(error = %err, "failed to generate tags");
                (Vec::new(), Provenance::Fallback)
            }
        }
    }

    async fn merged_content(&self, contents: &[String]) -> (String, Provenance) {
        let Some(assist) = &self.assist else {
            return (contents.join(MERGE_SEPARATOR), Provenance::Fallback);
        };
        match assist.merge_contents(contents).await {
            Ok(merged) => (merged, Provenance::Assist),
            Err(err) => {
                warn!(error = %err, "failed to merge contents with assist");
                (contents.join(MERGE_SEPARATOR), Provenance::Fallback)
            }
        }
    }

    async fn summary_of(&self, book: &Book) -> String {
        if let Some(assist) = &self.assist {
            match assist.summarize_content(&book.content).await {
                Ok(summary) => return summary,
                Err(err) => warn!(book_id = %book.id, error = %err, "failed to summarize content"),
            }
        }
        match book.description.as_deref() {
            Some(description) if !description.is_empty() => description.to_string(),
            _ => book.content.chars().take(SUMMARY_FALLBACK_CHARS).collect(),
        }
    }
}

fn require_user(user_id: &str) -> BookResult<()> {
    if user_id.is_empty() {
        return Err(BookError::validation("user ID is required"));
    }
    Ok(())
}

fn require_book(id: &str) -> BookResult<()> {
    if id.is_empty() {
        return Err(BookError::validation("book ID is required"));
    }
    Ok(())
}
