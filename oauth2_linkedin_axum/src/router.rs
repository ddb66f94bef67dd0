//! Routers exposing an authentication strategy over HTTP

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use oauth2_linkedin::{AuthStrategy, LinkedInStrategy};

use super::handlers::{begin_auth, callback, failure};

/// Create a router for the LinkedIn sign-in endpoints
///
/// Mount it under `O2L_ROUTE_PREFIX`. The endpoints will be available at:
/// - {O2L_ROUTE_PREFIX}/linkedin
/// - {O2L_ROUTE_PREFIX}/linkedin/callback
/// - {O2L_ROUTE_PREFIX}/failure
pub fn linkedin_router(strategy: LinkedInStrategy) -> Router {
    linkedin_router_no_trace(strategy).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(true),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `linkedin_router()` but without the HTTP tracing middleware.
pub fn linkedin_router_no_trace(strategy: LinkedInStrategy) -> Router {
    strategy_router(Arc::new(strategy))
}

/// Router for any strategy, with routes named after [`AuthStrategy::name`]
pub fn strategy_router(strategy: Arc<dyn AuthStrategy>) -> Router {
    let name = strategy.name();
    Router::new()
        .route(&format!("/{name}"), get(begin_auth))
        .route(&format!("/{name}/callback"), get(callback))
        .route("/failure", get(failure))
        .with_state(strategy)
}
