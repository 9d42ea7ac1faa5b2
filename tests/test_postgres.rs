//! Runs against a live Postgres. Point `DATABASE_ENDPOINT`/`DATABASE_NAME` at a
//! scratch database and run `cargo test -- --ignored`.
use chrono::{DateTime, Utc};
use ratings_backend::{
    config::Config,
    db::{
        RatingStore, connection::Database, get_ratings, insert_rating, postgres::PgRatingStore,
    },
    models::rating::NewRating,
};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS ratings (
    id         BIGINT PRIMARY KEY,
    name       TEXT NOT NULL,
    rating     INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

async fn create_test_store() -> PgRatingStore {
    let config = Config::from_env();
    let database = Database::connect(&config).await;
    let pool = database
        .pool()
        .expect("DATABASE_ENDPOINT must point at a reachable Postgres");
    sqlx::query(CREATE_TABLE).execute(pool).await.unwrap();
    PgRatingStore::new(database)
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn test_adversarial_name_round_trips_through_postgres() {
    let store = create_test_store().await;
    assert!(store.is_connected());

    let marker = Utc::now().timestamp_micros();
    let name = format!(r#"Robert{marker}"); DROP TABLE ratings;--'"#);

    let id = insert_rating(Some(name.clone()), 8, &store).await.unwrap();
    assert!(id > 0);

    let ratings = get_ratings(100, &store).await.unwrap();
    let saved = ratings
        .iter()
        .find(|r| r.name == name)
        .expect("inserted rating should be listed");
    assert_eq!(saved.rating, 8);

    let created_at = DateTime::parse_from_rfc3339(&saved.created_at).unwrap();
    assert!((Utc::now() - created_at.with_timezone(&Utc)).num_minutes().abs() < 5);
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn test_reused_id_is_reported_as_duplicate() {
    let store = create_test_store().await;

    let rating = NewRating {
        id: Utc::now().timestamp_micros(),
        name: "Ann".into(),
        rating: 4,
    };
    assert_eq!(store.insert(&rating).await.unwrap(), rating.id);

    let err = store.insert(&rating).await.unwrap_err();
    assert!(matches!(
        err,
        ratings_backend::errors::AppError::DuplicateId(id) if id == rating.id
    ));
}
