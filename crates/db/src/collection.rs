//! Keyed collection with soft-delete tombstones.

use std::collections::HashMap;

use time::OffsetDateTime;
use tokio::sync::RwLock;

struct Row<T> {
    value: T,
    deleted_at: Option<OffsetDateTime>,
}

impl<T> Row<T> {
    fn live(&self) -> Option<&T> {
        self.deleted_at.is_none().then_some(&self.value)
    }
}

/// A map of string keys to rows. Every operation takes the lock once, so a
/// single-row read-modify-write is atomic.
pub struct Collection<T> {
    rows: RwLock<HashMap<String, Row<T>>>,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Insert under a fresh key. Returns `false` (and changes nothing) if the key is taken,
    /// deleted rows included.
    pub async fn insert(&self, key: String, value: T) -> bool {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&key) {
            return false;
        }
        rows.insert(
            key,
            Row {
                value,
                deleted_at: None,
            },
        );
        true
    }

    /// The live row for `key` if it passes `filter`.
    pub async fn get_if<F>(&self, key: &str, filter: F) -> Option<T>
    where
        F: FnOnce(&T) -> bool,
    {
        let rows = self.rows.read().await;
        rows.get(key)
            .and_then(Row::live)
            .filter(|value| filter(*value))
            .cloned()
    }

    /// Mutate the live row for `key` if it passes `filter`; returns the new value.
    pub async fn update_if<F, U>(&self, key: &str, filter: F, update: U) -> Option<T>
    where
        F: FnOnce(&T) -> bool,
        U: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(key)?;
        if row.deleted_at.is_some() || !filter(&row.value) {
            return None;
        }
        update(&mut row.value);
        Some(row.value.clone())
    }

    /// Tombstone the live row for `key` if it passes `filter`.
    pub async fn delete_if<F>(&self, key: &str, at: OffsetDateTime, filter: F) -> bool
    where
        F: FnOnce(&T) -> bool,
    {
        let mut rows = self.rows.write().await;
        match rows.get_mut(key) {
            Some(row) if row.deleted_at.is_none() && filter(&row.value) => {
                row.deleted_at = Some(at);
                true
            }
            _ => false,
        }
    }

    /// All live rows passing `filter`, in no particular order.
    pub async fn scan<F>(&self, mut filter: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let rows = self.rows.read().await;
        rows.values()
            .filter_map(Row::live)
            .filter(|value| filter(*value))
            .cloned()
            .collect()
    }

    /// Number of live rows.
    pub async fn len(&self) -> usize {
        let rows = self.rows.read().await;
        rows.values().filter(|row| row.deleted_at.is_none()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}
