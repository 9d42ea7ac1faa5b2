use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::{
    http::{envelope::ResponseEnvelope, response::create_response},
    models::rating::format_timestamp,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct VersionResponse<'a> {
    pub version: &'a str,
    pub backend_id: &'a str,
    pub timestamp: String,
}

pub fn version_handler(state: &AppState) -> ResponseEnvelope {
    create_response(
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            backend_id: &state.backend_id,
            timestamp: format_timestamp(Utc::now()),
        },
        StatusCode::OK,
    )
}
