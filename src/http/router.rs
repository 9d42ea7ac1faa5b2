use crate::{
    errors::AppError,
    http::{
        envelope::{RequestEnvelope, ResponseEnvelope},
        handlers::{get_ratings_handler, health_handler, rate_handler, version_handler},
        response::app_error_response,
    },
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Version,
    Health,
    Rate,
    Ratings,
}

/// Matches on the literal path; no trailing-slash or query handling.
pub fn resolve(method: &str, path: &str) -> Result<Route, AppError> {
    if path == "/api/version" || path.ends_with("/version") {
        return Ok(Route::Version);
    }
    if path == "/health" {
        return Ok(Route::Health);
    }

    let (route, allowed) = match path {
        "/api/rate" => (Route::Rate, "POST"),
        "/api/ratings" => (Route::Ratings, "GET"),
        _ => return Err(AppError::NotFound),
    };

    if method == allowed {
        Ok(route)
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

/// Handles one request. Every failure becomes an error envelope.
pub async fn dispatch(state: &AppState, request: RequestEnvelope) -> ResponseEnvelope {
    tracing::info!("Request: {} {}", request.http_method, request.path);

    let result = match resolve(&request.http_method, &request.path) {
        Ok(Route::Version) => Ok(version_handler(state)),
        Ok(Route::Health) => Ok(health_handler(state)),
        Ok(Route::Rate) => rate_handler(state, request.body.as_deref()).await,
        Ok(Route::Ratings) => get_ratings_handler(state).await,
        Err(err) => Err(err),
    };

    result.unwrap_or_else(|err| {
        match &err {
            AppError::Validation(msg) => tracing::warn!("Validation error: {}", msg),
            AppError::NotFound | AppError::MethodNotAllowed => tracing::info!(
                "{} for {} {}",
                err,
                request.http_method,
                request.path
            ),
            _ => tracing::error!(
                "Error handling {} {}: {}",
                request.http_method,
                request.path,
                err
            ),
        }
        app_error_response(&err, &state.backend_id)
    })
}
