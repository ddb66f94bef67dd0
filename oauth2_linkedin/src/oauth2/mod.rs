mod config;
mod errors;
mod main;
mod types;

pub use config::{
    DEFAULT_SCOPE, DEFAULT_UID_FIELD, LINKEDIN_API_URL, LINKEDIN_AUTH_URL, LINKEDIN_TOKEN_URL,
    LinkedInConfig, OAUTH2_STATE_COOKIE_NAME,
};
pub use errors::{AuthFailure, CallbackError, OAuth2Error};
pub use types::{
    AuthInfo, AuthResult, AuthSession, BeginAuthParams, BeginAuthResponse, CallbackOutcome,
    CallbackParams, Credentials, Extra, TokenSet,
};

pub(crate) use main::{credentials, extra, handle_callback, info, prepare_auth_request, uid};
