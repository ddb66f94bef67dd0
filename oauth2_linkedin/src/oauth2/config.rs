use std::env;

use crate::config::O2L_ROUTE_PREFIX;

use super::errors::OAuth2Error;

pub const LINKEDIN_AUTH_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
pub const LINKEDIN_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
pub const LINKEDIN_API_URL: &str = "https://api.linkedin.com";

pub const DEFAULT_SCOPE: &str = "r_liteprofile r_emailaddress";
pub const DEFAULT_UID_FIELD: &str = "id";

// "__Host-" prefix makes the cookie host-only; it requires Secure and Path=/.
pub const OAUTH2_STATE_COOKIE_NAME: &str = "__Host-LinkedInState";

const DEFAULT_STATE_COOKIE_MAX_AGE: u64 = 600;

// Projections are sent verbatim: LinkedIn rejects percent-encoded parentheses.
pub(crate) const PROFILE_PATH: &str = "/v2/me?projection=(id,localizedFirstName,localizedLastName,profilePicture(displayImage~:playableStreams))";
pub(crate) const EMAIL_PATH: &str =
    "/v2/clientAwareMemberHandles?q=members&projection=(elements*(primary,type,handle~))";

/// Settings for the LinkedIn strategy.
///
/// Build one with [`LinkedInConfig::new`] and the `with_*` setters, or load it
/// from the environment with [`LinkedInConfig::from_env`].
#[derive(Debug, Clone)]
pub struct LinkedInConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI sent both in the authorization request and the token exchange
    pub callback_url: String,
    /// Scope used when the begin-auth request doesn't carry one
    pub scope: String,
    /// Profile field that provides the uid
    pub uid_field: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub state_cookie_max_age: u64,
}

impl LinkedInConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            scope: DEFAULT_SCOPE.to_string(),
            uid_field: DEFAULT_UID_FIELD.to_string(),
            auth_url: LINKEDIN_AUTH_URL.to_string(),
            token_url: LINKEDIN_TOKEN_URL.to_string(),
            api_url: LINKEDIN_API_URL.to_string(),
            state_cookie_max_age: DEFAULT_STATE_COOKIE_MAX_AGE,
        }
    }

    /// Load the configuration from environment variables.
    ///
    /// `OAUTH2_LINKEDIN_CLIENT_ID`, `OAUTH2_LINKEDIN_CLIENT_SECRET` and `ORIGIN`
    /// are required. The callback URL is `ORIGIN` + route prefix + `/linkedin/callback`.
    /// Endpoint URLs, scope, uid field and cookie max age can be overridden.
    pub fn from_env() -> Result<Self, OAuth2Error> {
        let client_id = required_var("OAUTH2_LINKEDIN_CLIENT_ID")?;
        let client_secret = required_var("OAUTH2_LINKEDIN_CLIENT_SECRET")?;
        let origin = required_var("ORIGIN")?;

        let callback_url = format!(
            "{}{}/linkedin/callback",
            origin.trim_end_matches('/'),
            O2L_ROUTE_PREFIX.as_str()
        );

        let mut config = Self::new(client_id, client_secret, callback_url);

        if let Ok(scope) = env::var("OAUTH2_LINKEDIN_SCOPE") {
            config.scope = scope;
        }
        if let Ok(uid_field) = env::var("OAUTH2_LINKEDIN_UID_FIELD") {
            config.uid_field = uid_field;
        }
        if let Ok(url) = env::var("OAUTH2_LINKEDIN_AUTH_URL") {
            tracing::debug!("Using OAUTH2_LINKEDIN_AUTH_URL from environment: {}", url);
            config.auth_url = url;
        }
        if let Ok(url) = env::var("OAUTH2_LINKEDIN_TOKEN_URL") {
            tracing::debug!("Using OAUTH2_LINKEDIN_TOKEN_URL from environment: {}", url);
            config.token_url = url;
        }
        if let Ok(url) = env::var("OAUTH2_LINKEDIN_API_URL") {
            tracing::debug!("Using OAUTH2_LINKEDIN_API_URL from environment: {}", url);
            config.api_url = url;
        }
        config.state_cookie_max_age = env::var("OAUTH2_STATE_COOKIE_MAX_AGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_STATE_COOKIE_MAX_AGE);

        Ok(config)
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_uid_field(mut self, uid_field: impl Into<String>) -> Self {
        self.uid_field = uid_field.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_state_cookie_max_age(mut self, seconds: u64) -> Self {
        self.state_cookie_max_age = seconds;
        self
    }

    pub(crate) fn profile_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), PROFILE_PATH)
    }

    pub(crate) fn email_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), EMAIL_PATH)
    }
}

fn required_var(name: &str) -> Result<String, OAuth2Error> {
    env::var(name).map_err(|_| OAuth2Error::Config(format!("{name} must be set")))
}
