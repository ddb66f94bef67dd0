//! Central configuration for the oauth2_linkedin crate

use std::sync::LazyLock;

/// Route prefix under which the strategy endpoints are mounted
///
/// Used to build the default callback URL and by framework integrations.
/// Default: "/auth"
pub static O2L_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("O2L_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string()));

