//! oauth2_linkedin - LinkedIn OAuth2 authentication strategy
//!
//! This crate implements the authorization code flow against LinkedIn and
//! normalizes the member profile and email address into an [`AuthResult`].
//! It is framework agnostic: a host drives it through the [`AuthStrategy`] hooks.

mod config;
mod oauth2;
mod strategy;
mod utils;

pub use config::O2L_ROUTE_PREFIX;

pub use oauth2::{
    AuthFailure, AuthInfo, AuthResult, AuthSession, BeginAuthParams, BeginAuthResponse,
    CallbackError, CallbackOutcome, CallbackParams, Credentials, DEFAULT_SCOPE, DEFAULT_UID_FIELD,
    Extra, LINKEDIN_API_URL, LINKEDIN_AUTH_URL, LINKEDIN_TOKEN_URL, LinkedInConfig,
    OAUTH2_STATE_COOKIE_NAME, OAuth2Error, TokenSet,
};

pub use strategy::{AuthStrategy, LinkedInStrategy};

pub use utils::UtilError;
