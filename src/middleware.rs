use std::time::Duration;

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

// Browser preflights are answered here; the envelope adds the allow-origin
// header to actual responses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}
