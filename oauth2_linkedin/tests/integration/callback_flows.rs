use axum::http::StatusCode;
use http::{HeaderMap, header::SET_COOKIE};
use oauth2_linkedin::{AuthStrategy, BeginAuthParams, CallbackParams, OAUTH2_STATE_COOKIE_NAME};

use crate::common::{
    MockBehavior, MockLinkedIn, TEST_ACCESS_TOKEN, TEST_CODE, TEST_EMAIL, TEST_MEMBER_ID,
    mock_linkedin::profile_body, state_cookie_headers, strategy_for,
};

const STATE: &str = "state-from-begin-auth";

fn callback_params(code: Option<&str>, state: Option<&str>) -> CallbackParams {
    CallbackParams {
        code: code.map(str::to_string),
        state: state.map(str::to_string),
        ..Default::default()
    }
}

fn assert_state_cookie_cleared(headers: &HeaderMap) {
    let cookies: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie"))
        .collect();
    assert_eq!(cookies.len(), 1, "state cookie must be cleared exactly once");
    assert!(cookies[0].starts_with(&format!("{OAUTH2_STATE_COOKIE_NAME}=;")));
    assert!(cookies[0].contains("Max-Age=0"));
}

/// Valid code and matching state produce a complete auth result
#[tokio::test]
async fn test_callback_success_end_to_end() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    assert!(
        outcome.session.errors().is_empty(),
        "unexpected failures: {:?}",
        outcome.session.errors()
    );

    let result = strategy
        .auth_result(&outcome.session)
        .expect("successful callback yields a result");

    assert_eq!(result.provider, "linkedin");
    assert_eq!(result.uid, TEST_MEMBER_ID);
    assert_eq!(result.info.email.as_deref(), Some(TEST_EMAIL));
    assert_eq!(result.info.first_name.as_deref(), Some("Jane"));
    assert_eq!(result.info.last_name.as_deref(), Some("Doe"));
    assert_eq!(result.info.name.as_deref(), Some("Jane Doe"));
    assert_eq!(
        result.info.image_url.as_deref(),
        Some("https://media.licdn.com/800_800.jpg")
    );
    assert_eq!(result.credentials.token, TEST_ACCESS_TOKEN);
    assert!(result.credentials.expires);
    assert!(result.credentials.expires_at.is_some());
    assert!(result.credentials.refresh_token.is_none());
    assert_eq!(result.extra.raw_profile, profile_body());
    assert_eq!(result.extra.raw_token["access_token"], TEST_ACCESS_TOKEN);

    assert_eq!(mock.token_hits(), 1);
    assert_eq!(mock.profile_hits(), 1);
    assert_eq!(mock.email_hits(), 1);

    // Projections must reach the provider without percent-encoding
    assert_eq!(
        mock.profile_query().as_deref(),
        Some(
            "projection=(id,localizedFirstName,localizedLastName,profilePicture(displayImage~:playableStreams))"
        )
    );
    assert_eq!(
        mock.email_query().as_deref(),
        Some("q=members&projection=(elements*(primary,type,handle~))")
    );

    strategy.on_cleanup(outcome.session);
}

#[tokio::test]
async fn test_callback_missing_code() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(&callback_params(None, Some(STATE)), &state_cookie_headers(STATE))
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "missing_code");
    assert_eq!(errors[0].message, "No code received");
    assert!(strategy.auth_result(&outcome.session).is_none());

    assert_eq!(mock.token_hits(), 0);
    assert_eq!(mock.profile_hits(), 0);
    assert_eq!(mock.email_hits(), 0);
}

#[tokio::test]
async fn test_callback_state_mismatch_never_fetches() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some("forged-state")),
            &state_cookie_headers(STATE),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "csrf");
    assert_eq!(errors[0].message, "CSRF token mismatch");

    assert_eq!(mock.profile_hits(), 0);
    assert_eq!(mock.email_hits(), 0);
}

#[tokio::test]
async fn test_callback_without_state_cookie() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &HeaderMap::new(),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    assert_eq!(outcome.session.errors()[0].kind, "csrf");
    assert_eq!(mock.profile_hits(), 0);
}

/// A rejected code surfaces the provider's own error fields
#[tokio::test]
async fn test_callback_token_exchange_rejected() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some("expired-code"), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "invalid_request");
    assert!(errors[0].message.starts_with("Unable to retrieve access token"));

    assert_eq!(mock.token_hits(), 1);
    assert_eq!(mock.profile_hits(), 0);
    assert_eq!(mock.email_hits(), 0);
}

#[tokio::test]
async fn test_callback_profile_unauthorized_skips_email() {
    let mock = MockLinkedIn::start(MockBehavior {
        profile_status: StatusCode::UNAUTHORIZED,
        ..Default::default()
    })
    .await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "token");
    assert_eq!(errors[0].message, "unauthorized");

    assert_eq!(mock.profile_hits(), 1);
    assert_eq!(mock.email_hits(), 0);
}

#[tokio::test]
async fn test_callback_profile_server_error() {
    let mock = MockLinkedIn::start(MockBehavior {
        profile_status: StatusCode::SERVICE_UNAVAILABLE,
        ..Default::default()
    })
    .await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "OAuth2");
    assert_eq!(errors[0].message, "503 Service Unavailable");
    assert_eq!(mock.email_hits(), 0);
}

#[tokio::test]
async fn test_callback_email_unauthorized() {
    let mock = MockLinkedIn::start(MockBehavior {
        email_status: StatusCode::UNAUTHORIZED,
        ..Default::default()
    })
    .await;
    let strategy = strategy_for(&mock, None);

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    assert_state_cookie_cleared(&outcome.headers);
    let errors = outcome.session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "token");
    assert_eq!(mock.email_hits(), 1);
    assert!(strategy.auth_result(&outcome.session).is_none());
}

/// A begin request may widen the configured scope; the email step still runs
#[tokio::test]
async fn test_callback_fetches_email_after_scope_override() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, Some("r_liteprofile"));

    let begin = strategy
        .on_begin_auth(&BeginAuthParams {
            scope: Some("r_liteprofile r_emailaddress".to_string()),
            state: Some(STATE.to_string()),
        })
        .await
        .expect("begin auth should succeed");
    assert!(begin.auth_url.contains("scope=r_liteprofile%20r_emailaddress&"));

    let outcome = strategy
        .on_callback(
            &callback_params(Some(TEST_CODE), Some(STATE)),
            &state_cookie_headers(STATE),
        )
        .await;

    let result = strategy
        .auth_result(&outcome.session)
        .expect("callback should succeed");
    assert_eq!(result.uid, TEST_MEMBER_ID);
    assert_eq!(result.info.email.as_deref(), Some(TEST_EMAIL));

    assert_eq!(mock.profile_hits(), 1);
    assert_eq!(mock.email_hits(), 1);
}
