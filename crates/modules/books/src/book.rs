use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored piece of captured text owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, immutable once set
    pub id: String,
    /// Owner, fixed at creation
    pub user_id: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub content: String,
    /// Ordered, no empty entries, no duplicates
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Case-insensitive substring match over title, content and tags.
    /// An empty keyword matches everything.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        if keyword.is_empty() {
            return true;
        }
        let needle = keyword.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }

    /// Overwrite every caller-mutable field.
    pub fn apply(&mut self, fields: BookFields) {
        self.title = fields.title;
        self.author = fields.author;
        self.description = fields.description;
        self.url = fields.url;
        self.content = fields.content;
        self.tags = normalize_tags(fields.tags);
    }
}

/// A book that has not been persisted yet. The store turns it into a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub user_id: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

impl NewBook {
    /// Owner and content fixed, everything else blank.
    pub fn new(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: String::new(),
            author: None,
            description: None,
            url: None,
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Materialize with the identity and timestamp assigned by a store.
    pub fn into_book(self, id: String, now: OffsetDateTime) -> Book {
        Book {
            id,
            user_id: self.user_id,
            title: self.title,
            author: self.author,
            description: self.description,
            url: self.url,
            content: self.content,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied field values for save and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Trim tags, drop blanks and keep the first occurrence of each.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter_map(|tag| {
            let tag = tag.as_ref().trim();
            (!tag.is_empty() && seen.insert(tag.to_string())).then(|| tag.to_string())
        })
        .collect()
}

/// Set union of tags for merged records. Order is not significant, so the
/// result is sorted to keep it deterministic.
pub fn tag_union<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| {
            let tag = tag.as_ref();
            (!tag.is_empty()).then(|| tag.to_string())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
