use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;

use crate::{errors::AppError, http::envelope::ResponseEnvelope};

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    backend_id: &'a str,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

/// Serializes `payload` as the JSON body. Non-ASCII text is written as-is.
pub fn create_response<T: Serialize>(payload: &T, status: StatusCode) -> ResponseEnvelope {
    match serde_json::to_string(payload) {
        Ok(body) => ResponseEnvelope {
            status_code: status.as_u16(),
            headers: default_headers(),
            body,
        },
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            ResponseEnvelope {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                headers: default_headers(),
                body: r#"{"error":"Server error: serialization failed"}"#.to_string(),
            }
        }
    }
}

pub fn error_response(message: &str, status: StatusCode, backend_id: &str) -> ResponseEnvelope {
    create_response(
        &ErrorBody {
            error: message,
            backend_id,
        },
        status,
    )
}

pub fn app_error_response(err: &AppError, backend_id: &str) -> ResponseEnvelope {
    let (status, message) = err.to_response();
    error_response(&message, status, backend_id)
}
