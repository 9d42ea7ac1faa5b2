use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tokio::sync::Mutex;

use crate::{
    db::store::RatingStore,
    errors::AppError,
    models::rating::{NewRating, RatingRow, StoredTimestamp},
};

#[derive(Debug, Clone)]
struct StoredRating {
    id: i64,
    row: RatingRow,
}

/// In-process store used for tests and local runs without a database.
pub struct MemoryRatingStore {
    rows: Mutex<Vec<StoredRating>>,
    connected: bool,
}

impl Default for MemoryRatingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            connected: true,
        }
    }

    /// A store that behaves like a process whose startup connect failed.
    pub fn disconnected() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            connected: false,
        }
    }

    /// Seeds a row as-is, bypassing validation.
    pub async fn push_row(&self, id: i64, row: RatingRow) {
        self.rows.lock().await.push(StoredRating { id, row });
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn insert(&self, rating: &NewRating) -> Result<i64, AppError> {
        if !self.connected {
            return Err(AppError::NotConnected);
        }

        let mut rows = self.rows.lock().await;
        if rows.iter().any(|stored| stored.id == rating.id) {
            return Err(AppError::DuplicateId(rating.id));
        }

        rows.push(StoredRating {
            id: rating.id,
            row: RatingRow {
                name: rating.name.clone(),
                rating: rating.rating,
                created_at: StoredTimestamp::Temporal(Utc::now()),
            },
        });
        Ok(rating.id)
    }

    async fn fetch_recent(&self, limit: i64) -> Result<Vec<RatingRow>, AppError> {
        if !self.connected {
            return Err(AppError::NotConnected);
        }

        let rows = self.rows.lock().await;
        // Newest insert wins ties; unreadable timestamps sort last.
        let mut recent: Vec<RatingRow> = rows.iter().rev().map(|s| s.row.clone()).collect();
        recent.sort_by_key(|row| Reverse(row.created_at.to_utc()));
        recent.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(recent)
    }
}
