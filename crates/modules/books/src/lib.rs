//! Book records and the use cases that manage them.
//!
//! The [`BookService`] composes a [`BookRepository`] with an optional
//! [`AssistService`]. Assist failures never escape a use case; they are
//! logged and replaced by deterministic fallbacks.

pub mod assist;
pub mod book;
pub mod error;
pub mod repository;
pub mod service;

pub use assist::AssistService;
pub use book::{normalize_tags, tag_union, Book, BookFields, NewBook};
pub use error::{AssistError, BookError, BookResult};
pub use repository::BookRepository;
pub use service::{BookService, Provenance, MERGED_TITLE, MERGE_SEPARATOR, UNTITLED};
