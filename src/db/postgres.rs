use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{Column, PgConnection, Row, TypeInfo, postgres::PgRow};

use crate::{
    db::{connection::Database, store::RatingStore},
    errors::AppError,
    models::rating::{NewRating, RatingRow, StoredTimestamp},
};

const INSERT_RATING: &str = "INSERT INTO ratings (id, name, rating, created_at)
    VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
    ON CONFLICT (id) DO NOTHING
    RETURNING id";

const SELECT_BY_ID: &str = "SELECT name, rating FROM ratings WHERE id = $1";

const SELECT_RECENT: &str = "SELECT name, rating, created_at
    FROM ratings
    ORDER BY created_at DESC
    LIMIT $1";

pub struct PgRatingStore {
    db: Database,
}

impl PgRatingStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingStore for PgRatingStore {
    fn is_connected(&self) -> bool {
        self.db.is_connected()
    }

    async fn insert(&self, rating: &NewRating) -> Result<i64, AppError> {
        self.db.pool()?;

        let new = rating.clone();
        let attempts = AtomicU32::new(0);
        let inserted = self
            .db
            .run_in_transaction(move |tx| {
                let retried = attempts.fetch_add(1, Ordering::SeqCst) > 0;
                Box::pin(insert_or_confirm(&mut **tx, new.clone(), retried))
            })
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateId(rating.id)
                }
                _ => AppError::DatabaseError(format!("Failed to save rating: {}", e)),
            })?;

        inserted.ok_or(AppError::DuplicateId(rating.id))
    }

    async fn fetch_recent(&self, limit: i64) -> Result<Vec<RatingRow>, AppError> {
        self.db.pool()?;

        let rows = self
            .db
            .run_in_transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(SELECT_RECENT)
                        .bind(limit)
                        .fetch_all(&mut **tx)
                        .await
                })
            })
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch ratings: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<RatingRow, sqlx::Error> {
                Ok(RatingRow {
                    name: row.try_get("name")?,
                    rating: row.try_get("rating")?,
                    created_at: decode_created_at(row),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| AppError::DatabaseError(format!("Failed to decode rating row: {}", e)))
    }
}

/// Inserts `rating`. On a retried attempt a conflicting row that matches is
/// taken as our own earlier write whose commit acknowledgement was lost.
async fn insert_or_confirm(
    conn: &mut PgConnection,
    rating: NewRating,
    retried: bool,
) -> Result<Option<i64>, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, i64>(INSERT_RATING)
        .bind(rating.id)
        .bind(&rating.name)
        .bind(rating.rating)
        .fetch_optional(&mut *conn)
        .await?;
    if inserted.is_some() || !retried {
        return Ok(inserted);
    }

    let existing = sqlx::query_as::<_, (String, i32)>(SELECT_BY_ID)
        .bind(rating.id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(confirm_existing(&rating, existing))
}

fn confirm_existing(rating: &NewRating, existing: Option<(String, i32)>) -> Option<i64> {
    existing
        .filter(|(name, score)| *name == rating.name && *score == rating.rating)
        .map(|_| rating.id)
}

/// Reads `created_at` in whatever shape the column has.
fn decode_created_at(row: &PgRow) -> StoredTimestamp {
    let type_name = match row.try_column("created_at") {
        Ok(column) => column.type_info().name().to_string(),
        Err(e) => return StoredTimestamp::Unreadable(e.to_string()),
    };

    let decoded = match type_name.as_str() {
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>("created_at")
            .map(|v| v.map(StoredTimestamp::Temporal)),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>("created_at")
            .map(|v| v.map(|dt| StoredTimestamp::Temporal(dt.and_utc()))),
        "INT8" => row
            .try_get::<Option<i64>, _>("created_at")
            .map(|v| v.map(StoredTimestamp::EpochMicros)),
        "INT4" => row
            .try_get::<Option<i32>, _>("created_at")
            .map(|v| v.map(|n| StoredTimestamp::EpochMicros(n.into()))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>("created_at")
            .map(|v| v.map(StoredTimestamp::EpochSeconds)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>("created_at")
            .map(|v| v.map(|n| StoredTimestamp::EpochSeconds(n.into()))),
        other => return StoredTimestamp::Unreadable(format!("unsupported column type {other}")),
    };

    match decoded {
        Ok(Some(ts)) => ts,
        Ok(None) => StoredTimestamp::Unreadable("NULL".into()),
        Err(e) => StoredTimestamp::Unreadable(e.to_string()),
    }
}
