use serde::{Deserialize, Serialize};

/// Query string for listing books.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive filter over title, content and tags
    #[serde(default)]
    pub keyword: String,
}

/// Request model for merging books.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeBooks {
    /// Ids of the source books, in merge order
    pub book_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksHealth {
    pub status: String,
    /// Whether generated titles, tags and merges are available
    pub assist: bool,
}
