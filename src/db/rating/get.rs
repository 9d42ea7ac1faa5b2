use chrono::Utc;

use crate::{db::store::RatingStore, errors::AppError, models::rating::Rating};

pub const MAX_RATINGS_LIMIT: i64 = 100;

pub async fn get_ratings(limit: i64, store: &dyn RatingStore) -> Result<Vec<Rating>, AppError> {
    let limit = limit.clamp(0, MAX_RATINGS_LIMIT);
    let rows = store.fetch_recent(limit).await?;

    let now = Utc::now();
    let ratings = rows
        .into_iter()
        .take(limit as usize)
        .map(|row| row.into_rating(now))
        .collect();

    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryRatingStore,
        models::rating::{RatingRow, StoredTimestamp},
    };
    use chrono::{TimeZone, Utc};

    fn row(name: &str, created_at: StoredTimestamp) -> RatingRow {
        RatingRow {
            name: name.into(),
            rating: 5,
            created_at,
        }
    }

    #[tokio::test]
    async fn one_bad_timestamp_does_not_spoil_the_list() {
        let store = MemoryRatingStore::new();
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        store
            .push_row(1, row("temporal", StoredTimestamp::Temporal(dt)))
            .await;
        store
            .push_row(2, row("broken", StoredTimestamp::Unreadable("garbage".into())))
            .await;

        let ratings = get_ratings(100, &store).await.unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].name, "temporal");
        assert_eq!(ratings[0].created_at, "2024-01-02T03:04:05Z");
        assert_eq!(ratings[1].name, "broken");
        assert!(ratings[1].created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn mixed_representations_sort_newest_first() {
        let store = MemoryRatingStore::new();
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        store
            .push_row(1, row("oldest", StoredTimestamp::Temporal(base)))
            .await;
        store
            .push_row(
                2,
                row(
                    "newest",
                    StoredTimestamp::EpochMicros(base.timestamp_micros() + 2_000_000),
                ),
            )
            .await;
        store
            .push_row(
                3,
                row(
                    "middle",
                    StoredTimestamp::EpochSeconds(base.timestamp() as f64 + 1.0),
                ),
            )
            .await;

        let names: Vec<String> = get_ratings(100, &store)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn limit_is_capped() {
        let store = MemoryRatingStore::new();
        for i in 0..120 {
            store
                .push_row(i, row("bulk", StoredTimestamp::EpochMicros(i * 1_000)))
                .await;
        }
        assert_eq!(get_ratings(500, &store).await.unwrap().len(), 100);
        assert_eq!(get_ratings(3, &store).await.unwrap().len(), 3);
        assert!(get_ratings(-1, &store).await.unwrap().is_empty());
    }
}
