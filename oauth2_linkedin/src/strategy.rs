//! The strategy interface a host authentication layer drives, and the LinkedIn implementation.

use std::time::Duration;

use async_trait::async_trait;
use http::HeaderMap;

use crate::oauth2::{
    self, AuthInfo, AuthResult, AuthSession, BeginAuthParams, BeginAuthResponse, CallbackOutcome,
    CallbackParams, Credentials, Extra, LinkedInConfig, OAuth2Error,
};

/// Lifecycle hooks and accessors of an authentication strategy.
///
/// The host calls [`on_begin_auth`](AuthStrategy::on_begin_auth) to start the
/// flow, [`on_callback`](AuthStrategy::on_callback) when the provider redirects
/// back, reads the accessors from the returned session, and finally hands the
/// session to [`on_cleanup`](AuthStrategy::on_cleanup).
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Provider name, also used as the route segment
    fn name(&self) -> &'static str;

    async fn on_begin_auth(&self, params: &BeginAuthParams)
    -> Result<BeginAuthResponse, OAuth2Error>;

    async fn on_callback(&self, params: &CallbackParams, headers: &HeaderMap) -> CallbackOutcome;

    fn on_cleanup(&self, session: AuthSession) {
        drop(session);
    }

    fn uid(&self, session: &AuthSession) -> Option<String>;

    fn info(&self, session: &AuthSession) -> AuthInfo;

    fn credentials(&self, session: &AuthSession) -> Option<Credentials>;

    fn extra(&self, session: &AuthSession) -> Extra;

    /// The combined result, or `None` when the callback recorded a failure
    fn auth_result(&self, session: &AuthSession) -> Option<AuthResult> {
        if !session.errors().is_empty() {
            return None;
        }
        Some(AuthResult {
            provider: self.name().to_string(),
            uid: self.uid(session)?,
            info: self.info(session),
            credentials: self.credentials(session)?,
            extra: self.extra(session),
        })
    }
}

/// LinkedIn sign-in via the OAuth2 authorization code grant
#[derive(Debug, Clone)]
pub struct LinkedInStrategy {
    config: LinkedInConfig,
    client: reqwest::Client,
}

impl LinkedInStrategy {
    pub fn new(config: LinkedInConfig) -> Result<Self, OAuth2Error> {
        let client = get_client()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LinkedInConfig {
        &self.config
    }
}

/// HTTP client for the back-channel calls.
///
/// - `timeout`: 30 seconds so a stalled provider can't hang the request.
/// - `pool_idle_timeout`: 90 seconds (the reqwest default).
/// - `pool_max_idle_per_host`: 32 idle connections per host.
fn get_client() -> Result<reqwest::Client, OAuth2Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| OAuth2Error::HttpClient(e.to_string()))
}

#[async_trait]
impl AuthStrategy for LinkedInStrategy {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    async fn on_begin_auth(
        &self,
        params: &BeginAuthParams,
    ) -> Result<BeginAuthResponse, OAuth2Error> {
        oauth2::prepare_auth_request(&self.config, params)
    }

    #[tracing::instrument(skip_all)]
    async fn on_callback(&self, params: &CallbackParams, headers: &HeaderMap) -> CallbackOutcome {
        oauth2::handle_callback(&self.client, &self.config, params, headers).await
    }

    fn on_cleanup(&self, session: AuthSession) {
        tracing::debug!(
            "Discarding LinkedIn session ({} failures)",
            session.errors().len()
        );
    }

    fn uid(&self, session: &AuthSession) -> Option<String> {
        oauth2::uid(session, &self.config.uid_field)
    }

    fn info(&self, session: &AuthSession) -> AuthInfo {
        oauth2::info(session)
    }

    fn credentials(&self, session: &AuthSession) -> Option<Credentials> {
        oauth2::credentials(session)
    }

    fn extra(&self, session: &AuthSession) -> Extra {
        oauth2::extra(session)
    }
}
