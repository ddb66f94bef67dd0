use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use oauth2_linkedin::{AuthStrategy, BeginAuthParams, CallbackParams, O2L_ROUTE_PREFIX};

use super::error::IntoResponseError;

pub(super) type SharedStrategy = Arc<dyn AuthStrategy>;

/// Send the browser to the provider's consent page
pub(super) async fn begin_auth(
    State(strategy): State<SharedStrategy>,
    Query(params): Query<BeginAuthParams>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let response = strategy.on_begin_auth(&params).await.into_response_error()?;

    tracing::debug!("Redirecting to {} authorization endpoint", strategy.name());
    Ok((response.headers, Redirect::to(&response.auth_url)))
}

/// Handle the provider redirect.
///
/// Success answers with the normalized result as JSON. Any failure redirects
/// to the failure page carrying the failure kind. The state cookie is cleared
/// either way.
pub(super) async fn callback(
    State(strategy): State<SharedStrategy>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Response {
    let outcome = strategy.on_callback(&params, &headers).await;
    let result = strategy.auth_result(&outcome.session);

    let response = match result {
        Some(result) => {
            tracing::info!("{} sign-in succeeded for uid {}", result.provider, result.uid);
            (outcome.headers, Json(result)).into_response()
        }
        None => {
            let kind = outcome
                .session
                .errors()
                .first()
                .map(|failure| failure.kind.clone())
                .unwrap_or_else(|| "unknown".to_string());
            tracing::info!("{} sign-in failed: {}", strategy.name(), kind);

            let location = failure_location(&kind, strategy.name());
            (outcome.headers, Redirect::to(&location)).into_response()
        }
    };

    strategy.on_cleanup(outcome.session);
    response
}

fn failure_location(kind: &str, strategy: &str) -> String {
    format!(
        "{}/failure?message={}&strategy={}",
        O2L_ROUTE_PREFIX.as_str(),
        urlencoding::encode(kind),
        urlencoding::encode(strategy)
    )
}

#[derive(Debug, Deserialize)]
pub(super) struct FailureParams {
    message: Option<String>,
    strategy: Option<String>,
}

pub(super) async fn failure(Query(params): Query<FailureParams>) -> (StatusCode, String) {
    let message = params
        .message
        .unwrap_or_else(|| "Authentication failed".to_string());

    let body = match params.strategy {
        Some(strategy) => format!("{strategy} authentication failed: {message}"),
        None => format!("Authentication failed: {message}"),
    };
    (StatusCode::UNAUTHORIZED, body)
}
