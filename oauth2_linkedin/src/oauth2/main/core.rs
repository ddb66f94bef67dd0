use headers::{Cookie, HeaderMapExt};
use http::header::HeaderMap;
use subtle::ConstantTimeEq;

use crate::oauth2::config::{LinkedInConfig, OAUTH2_STATE_COOKIE_NAME};
use crate::oauth2::errors::{CallbackError, OAuth2Error};
use crate::oauth2::types::{
    AuthSession, BeginAuthParams, BeginAuthResponse, CallbackOutcome, CallbackParams,
};
use crate::utils::{gen_random_string, header_delete_cookie, header_set_cookie};

use super::linkedin::{exchange_code_for_token, fetch_email, fetch_profile};

const STATE_TOKEN_BYTES: usize = 32;

/// Build the authorization redirect and the cookie that remembers the state.
pub(crate) fn prepare_auth_request(
    config: &LinkedInConfig,
    params: &BeginAuthParams,
) -> Result<BeginAuthResponse, OAuth2Error> {
    let state = match params.state.as_deref().filter(|s| !s.is_empty()) {
        Some(state) if is_cookie_value(state) => state.to_string(),
        Some(_) => {
            tracing::warn!("Supplied state is not a valid cookie value, generating one");
            gen_random_string(STATE_TOKEN_BYTES)?
        }
        None => gen_random_string(STATE_TOKEN_BYTES)?,
    };
    let scope = params
        .scope
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(config.scope.as_str());

    let auth_url = format!(
        "{}?scope={}&state={}&redirect_uri={}&response_type=code&client_id={}",
        config.auth_url,
        urlencoding::encode(scope),
        urlencoding::encode(&state),
        urlencoding::encode(&config.callback_url),
        urlencoding::encode(&config.client_id),
    );
    tracing::debug!("Auth URL: {}", auth_url);

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        OAUTH2_STATE_COOKIE_NAME,
        &state,
        config.state_cookie_max_age,
    )?;

    Ok(BeginAuthResponse { auth_url, headers })
}

/// Run the callback pipeline.
///
/// Never fails: errors are recorded on the returned session. The state cookie
/// is cleared on every path.
pub(crate) async fn handle_callback(
    client: &reqwest::Client,
    config: &LinkedInConfig,
    params: &CallbackParams,
    request_headers: &HeaderMap,
) -> CallbackOutcome {
    let cookie_state = state_from_cookie(request_headers);
    let session = AuthSession::new(params.state.clone());

    let session = match process_callback(
        client,
        config,
        params,
        cookie_state.as_deref(),
        session.clone(),
    )
    .await
    {
        Ok(session) => {
            tracing::info!("LinkedIn callback succeeded");
            session
        }
        Err(e) => {
            tracing::warn!("LinkedIn callback failed: {} ({})", e.kind(), e);
            session.with_failure(e)
        }
    };

    let mut headers = HeaderMap::new();
    if let Err(e) = header_delete_cookie(&mut headers, OAUTH2_STATE_COOKIE_NAME) {
        tracing::error!("Failed to clear state cookie: {}", e);
    }

    CallbackOutcome { headers, session }
}

async fn process_callback(
    client: &reqwest::Client,
    config: &LinkedInConfig,
    params: &CallbackParams,
    cookie_state: Option<&str>,
    session: AuthSession,
) -> Result<AuthSession, CallbackError> {
    provider_error_checks(params)?;

    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(CallbackError::MissingCode)?;

    csrf_checks(cookie_state, params.state.as_deref())?;

    let token = exchange_code_for_token(client, config, code).await?;
    let access_token = token.access_token.clone();
    let session = session.with_token(token);

    let raw_profile = fetch_profile(client, config, &access_token).await?;
    let session = session.with_profile(raw_profile);

    let email = fetch_email(client, config, &access_token).await?;

    Ok(session.with_email(email))
}

/// The provider redirects back with `error` when the user denies access.
fn provider_error_checks(params: &CallbackParams) -> Result<(), CallbackError> {
    match params.error.as_deref().filter(|e| !e.is_empty()) {
        Some(error) => Err(CallbackError::Provider {
            error: error.to_string(),
            description: params
                .error_description
                .clone()
                .or_else(|| params.error_reason.clone())
                .unwrap_or_else(|| error.to_string()),
        }),
        None => Ok(()),
    }
}

fn csrf_checks(cookie_state: Option<&str>, param_state: Option<&str>) -> Result<(), CallbackError> {
    match (cookie_state, param_state) {
        (Some(stored), Some(received))
            if !stored.is_empty() && bool::from(stored.as_bytes().ct_eq(received.as_bytes())) =>
        {
            Ok(())
        }
        _ => {
            tracing::error!(
                "State mismatch: cookie present: {}, param present: {}",
                cookie_state.is_some(),
                param_state.is_some()
            );
            Err(CallbackError::CsrfMismatch)
        }
    }
}

/// RFC 6265 cookie-octets only: no whitespace, quotes, commas, semicolons or backslashes.
fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

fn state_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookies| cookies.get(OAUTH2_STATE_COOKIE_NAME).map(str::to_string))
}
