//! Router assembly and HTTP middleware

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Access log under the `http_access` target
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        "{} {} {} {}ms",
        method,
        uri,
        response.status(),
        started.elapsed().as_millis()
    );

    response
}

/// All API routes, before state and middleware
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        // Customer
        .merge(crate::api::menu::router())
        // Catalog admin
        .merge(crate::api::categories::router())
        .merge(crate::api::dishes::router())
        .merge(crate::api::featured_blocks::router())
        .merge(crate::api::daily_special::router())
        // Service
        .merge(crate::api::tables::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::order_items::router())
        .merge(crate::api::kitchen::router())
}

/// Complete application: routes, staff auth, CORS, compression, access log
pub fn build_app(state: ServerState) -> Router {
    routes()
        // require_auth skips public routes itself
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
