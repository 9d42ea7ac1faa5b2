use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    db::store::RatingStore,
    errors::AppError,
    models::rating::{ANONYMOUS_NAME, MAX_RATING, MIN_RATING, NewRating},
};

pub async fn insert_rating(
    name: Option<String>,
    rating: i64,
    store: &dyn RatingStore,
) -> Result<i64, AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 10".into(),
        ));
    }

    let new_rating = NewRating {
        id: generate_rating_id(Utc::now(), &mut rand::rng()),
        name: display_name(name),
        rating: rating as i32,
    };

    let id = store.insert(&new_rating).await?;
    tracing::info!("Rating saved: {} - {}", new_rating.name, new_rating.rating);

    Ok(id)
}

/// Trimmed name, or the anonymous placeholder when there is nothing left.
pub fn display_name(name: Option<String>) -> String {
    match name.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => ANONYMOUS_NAME.to_string(),
    }
}

/// Microseconds since the epoch plus a random offset below one second.
pub fn generate_rating_id<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> i64 {
    now.timestamp_micros() + rng.random_range(0..1_000_000i64)
}
