use async_trait::async_trait;

use crate::{
    errors::AppError,
    models::rating::{NewRating, RatingRow},
};

/// Storage capability behind the rating repository.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Whether the store holds a live connection.
    fn is_connected(&self) -> bool;

    /// Writes one rating atomically and returns its id.
    async fn insert(&self, rating: &NewRating) -> Result<i64, AppError>;

    /// Most recent rows first, at most `limit` of them.
    async fn fetch_recent(&self, limit: i64) -> Result<Vec<RatingRow>, AppError>;
}
