use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::oauth2::config::LinkedInConfig;
use crate::oauth2::errors::CallbackError;
use crate::oauth2::types::{TokenResponse, TokenSet};

use super::extract::extract_email;

const DEFAULT_TOKEN_ERROR: &str = "token_error";
const DEFAULT_TOKEN_ERROR_DESCRIPTION: &str = "No access token in token response";

pub(super) async fn exchange_code_for_token(
    client: &reqwest::Client,
    config: &LinkedInConfig,
    code: &str,
) -> Result<TokenSet, CallbackError> {
    let response = client
        .post(config.token_url.as_str())
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.callback_url.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| CallbackError::OAuth2(e.to_string()))?;

    let status = response.status();
    tracing::debug!("Token exchange response status: {}", status);

    let response_body = response
        .text()
        .await
        .map_err(|e| CallbackError::OAuth2(e.to_string()))?;

    let raw: Value = serde_json::from_str(&response_body).map_err(|e| {
        if status.is_success() {
            CallbackError::OAuth2(format!("Failed to parse token response: {e}"))
        } else {
            CallbackError::OAuth2(status.to_string())
        }
    })?;
    let token_response: TokenResponse = serde_json::from_value(raw.clone())
        .map_err(|e| CallbackError::OAuth2(format!("Failed to parse token response: {e}")))?;

    token_set_from_response(status, token_response, raw)
}

fn token_set_from_response(
    status: StatusCode,
    token_response: TokenResponse,
    raw: Value,
) -> Result<TokenSet, CallbackError> {
    let TokenResponse {
        access_token,
        expires_in,
        refresh_token,
        error,
        error_description,
    } = token_response;

    match access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => Ok(TokenSet {
            access_token,
            refresh_token,
            expires_at: expires_in
                .and_then(Duration::try_seconds)
                .and_then(|d| Utc::now().checked_add_signed(d)),
            raw,
        }),
        None if error.is_none() && !status.is_success() => {
            tracing::error!("Token endpoint returned {}", status);
            Err(CallbackError::OAuth2(status.to_string()))
        }
        None => {
            tracing::error!("No access token received: {:?}", error);
            Err(CallbackError::Provider {
                error: error.unwrap_or_else(|| DEFAULT_TOKEN_ERROR.to_string()),
                description: error_description
                    .unwrap_or_else(|| DEFAULT_TOKEN_ERROR_DESCRIPTION.to_string()),
            })
        }
    }
}

/// Fetch the member profile and return the raw JSON body
pub(super) async fn fetch_profile(
    client: &reqwest::Client,
    config: &LinkedInConfig,
    access_token: &str,
) -> Result<Value, CallbackError> {
    let body = get_resource(client, &config.profile_url(), access_token).await?;
    serde_json::from_str(&body)
        .map_err(|e| CallbackError::OAuth2(format!("Failed to parse profile: {e}")))
}

/// Fetch the member handles and extract the email address
pub(super) async fn fetch_email(
    client: &reqwest::Client,
    config: &LinkedInConfig,
    access_token: &str,
) -> Result<Option<String>, CallbackError> {
    let body = get_resource(client, &config.email_url(), access_token).await?;
    let raw: Value = serde_json::from_str(&body)
        .map_err(|e| CallbackError::OAuth2(format!("Failed to parse member handles: {e}")))?;
    Ok(extract_email(&raw))
}

async fn get_resource(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<String, CallbackError> {
    // `Url` leaves the projection's parentheses and punctuation untouched.
    let url = Url::parse(url).map_err(|e| CallbackError::OAuth2(e.to_string()))?;
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| CallbackError::OAuth2(e.to_string()))?;

    check_resource_status(response.status())?;

    response
        .text()
        .await
        .map_err(|e| CallbackError::OAuth2(e.to_string()))
}

fn check_resource_status(status: StatusCode) -> Result<(), CallbackError> {
    match status.as_u16() {
        401 => {
            tracing::error!("Access token rejected by LinkedIn");
            Err(CallbackError::Unauthorized)
        }
        200..=399 => Ok(()),
        _ => {
            tracing::error!("LinkedIn API returned {}", status);
            Err(CallbackError::OAuth2(status.to_string()))
        }
    }
}
