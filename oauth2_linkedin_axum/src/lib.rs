mod error;
mod handlers;
mod router;

pub use error::IntoResponseError;
pub use router::{linkedin_router, linkedin_router_no_trace, strategy_router};

// Re-export the core types a host needs to build and consume the strategy
pub use oauth2_linkedin::{
    AuthFailure, AuthResult, AuthStrategy, LinkedInConfig, LinkedInStrategy, O2L_ROUTE_PREFIX,
    OAuth2Error,
};
