use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::{
    http::{envelope::ResponseEnvelope, response::create_response},
    models::rating::format_timestamp,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse<'a> {
    pub status: &'a str,
    pub backend_id: &'a str,
    /// Whether the startup connect succeeded. The name is part of the wire contract.
    pub ydb_connected: bool,
    pub timestamp: String,
}

pub fn health_handler(state: &AppState) -> ResponseEnvelope {
    create_response(
        &HealthResponse {
            status: "healthy",
            backend_id: &state.backend_id,
            ydb_connected: state.store.is_connected(),
            timestamp: format_timestamp(Utc::now()),
        },
        StatusCode::OK,
    )
}
