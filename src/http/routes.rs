use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};

use crate::{
    http::{envelope::RequestEnvelope, router::dispatch},
    state::AppState,
};

/// Every path goes through the envelope router, so route matching stays
/// identical to a direct serverless invocation.
pub fn create_http_routes(state: AppState) -> Router {
    Router::new().fallback(envelope_handler).with_state(state)
}

async fn envelope_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = RequestEnvelope {
        http_method: method.as_str().to_string(),
        path: uri.path().to_string(),
        body: body_text(&body),
    };

    dispatch(&state, request).await.into_response()
}

/// Request body as text. Invalid UTF-8 is replaced lossily so the router
/// still produces a JSON error for it.
fn body_text(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    match String::from_utf8(body.to_vec()) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("Request body is not valid UTF-8: {}", e);
            Some(String::from_utf8_lossy(body).into_owned())
        }
    }
}
