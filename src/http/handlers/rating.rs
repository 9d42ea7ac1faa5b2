use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::{
    db::rating::{MAX_RATINGS_LIMIT, get_ratings, insert_rating},
    errors::AppError,
    http::{envelope::ResponseEnvelope, response::create_response},
    models::rating::{MAX_RATING, MIN_RATING},
    state::AppState,
};

const RATING_OUT_OF_RANGE: &str = "Rating must be between 1 and 10";
const RATING_NOT_A_NUMBER: &str = "Rating must be a number between 1 and 10";

#[derive(Debug, PartialEq)]
pub struct RatePayload {
    pub name: Option<String>,
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: i64,
}

/// Parses a submit-rating body. A missing rating counts as 0 and is
/// rejected as out of range.
pub fn parse_rate_body(body: Option<&str>) -> Result<RatePayload, AppError> {
    let raw = body.map(str::trim).filter(|b| !b.is_empty()).unwrap_or("{}");

    let value: Value = serde_json::from_str(raw).map_err(|e| {
        tracing::warn!("Validation error: {}", e);
        AppError::Validation(RATING_NOT_A_NUMBER.into())
    })?;
    let Some(object) = value.as_object() else {
        return Err(AppError::Validation(RATING_NOT_A_NUMBER.into()));
    };

    let name = match object.get("name") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => return Err(AppError::Validation("Name must be a string".into())),
    };

    let rating = match object.get("rating") {
        None => 0,
        Some(value) => parse_rating(value)?,
    };

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(RATING_OUT_OF_RANGE.into()));
    }

    Ok(RatePayload { name, rating })
}

fn parse_rating(value: &Value) -> Result<i64, AppError> {
    let not_a_number = || AppError::Validation(RATING_NOT_A_NUMBER.into());

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                // Above i64::MAX, so certainly out of range.
                Ok(i64::MAX)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
                    .ok_or_else(not_a_number)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| not_a_number()),
        _ => Err(not_a_number()),
    }
}

pub async fn rate_handler(
    state: &AppState,
    body: Option<&str>,
) -> Result<ResponseEnvelope, AppError> {
    let payload = parse_rate_body(body)?;
    let id = insert_rating(payload.name, payload.rating, state.store.as_ref()).await?;

    Ok(create_response(
        &RateResponse {
            success: true,
            message: "Rating saved",
            id,
        },
        StatusCode::OK,
    ))
}

pub async fn get_ratings_handler(state: &AppState) -> Result<ResponseEnvelope, AppError> {
    let ratings = get_ratings(MAX_RATINGS_LIMIT, state.store.as_ref()).await?;
    tracing::debug!("Fetched {} ratings", ratings.len());

    Ok(create_response(&ratings, StatusCode::OK))
}
