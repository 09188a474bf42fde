//! CORS layers built on tower-http.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Any origin, method and header. Development only.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// The methods and headers the blog API uses, for the given origins.
///
/// Origins that fail to parse as header values are skipped. An empty list
/// falls back to [`permissive`].
pub fn default(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(PREFLIGHT_MAX_AGE)
}
