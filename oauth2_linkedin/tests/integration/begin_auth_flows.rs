use http::header::SET_COOKIE;
use oauth2_linkedin::{AuthStrategy, BeginAuthParams, CallbackParams, OAUTH2_STATE_COOKIE_NAME};
use url::Url;

use crate::common::{
    MockBehavior, MockLinkedIn, TEST_CALLBACK_URL, TEST_CLIENT_ID, TEST_CODE, TEST_MEMBER_ID,
    state_cookie_headers, strategy_for,
};

/// Pull the state value out of the Set-Cookie header
fn state_from_set_cookie(headers: &http::HeaderMap) -> String {
    let cookie = headers
        .get(SET_COOKIE)
        .expect("begin auth sets the state cookie")
        .to_str()
        .expect("ascii cookie");
    let pair = cookie.split(';').next().expect("cookie has a name=value pair");
    let (name, value) = pair.split_once('=').expect("cookie pair has '='");
    assert_eq!(name, OAUTH2_STATE_COOKIE_NAME);
    value.to_string()
}

#[tokio::test]
async fn test_begin_auth_redirect_carries_state_and_redirect_uri() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let response = strategy
        .on_begin_auth(&BeginAuthParams::default())
        .await
        .expect("begin auth should succeed");

    let url = Url::parse(&response.auth_url).expect("auth url parses");
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };

    let cookie_state = state_from_set_cookie(&response.headers);
    assert_eq!(param("state").as_deref(), Some(cookie_state.as_str()));
    assert_eq!(param("redirect_uri").as_deref(), Some(TEST_CALLBACK_URL));
    assert_eq!(param("client_id").as_deref(), Some(TEST_CLIENT_ID));
    assert_eq!(param("response_type").as_deref(), Some("code"));
    assert_eq!(
        param("scope").as_deref(),
        Some("r_liteprofile r_emailaddress")
    );

    // Nothing is sent to the provider until the callback
    assert_eq!(mock.token_hits(), 0);
}

/// The state handed out by begin auth is accepted by the callback
#[tokio::test]
async fn test_begin_auth_then_callback_round_trip() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let begin = strategy
        .on_begin_auth(&BeginAuthParams::default())
        .await
        .expect("begin auth should succeed");
    let state = state_from_set_cookie(&begin.headers);

    let params = CallbackParams {
        code: Some(TEST_CODE.to_string()),
        state: Some(state.clone()),
        ..Default::default()
    };
    let outcome = strategy
        .on_callback(&params, &state_cookie_headers(&state))
        .await;

    assert_eq!(outcome.session.state(), Some(state.as_str()));
    let result = strategy
        .auth_result(&outcome.session)
        .expect("round trip succeeds");
    assert_eq!(result.uid, TEST_MEMBER_ID);
}

/// A second begin auth issues a fresh state; the old one no longer matches its cookie
#[tokio::test]
async fn test_stale_state_is_rejected() {
    let mock = MockLinkedIn::start(MockBehavior::default()).await;
    let strategy = strategy_for(&mock, None);

    let first = strategy
        .on_begin_auth(&BeginAuthParams::default())
        .await
        .unwrap();
    let second = strategy
        .on_begin_auth(&BeginAuthParams::default())
        .await
        .unwrap();

    let params = CallbackParams {
        code: Some(TEST_CODE.to_string()),
        state: Some(state_from_set_cookie(&first.headers)),
        ..Default::default()
    };
    let outcome = strategy
        .on_callback(
            &params,
            &state_cookie_headers(&state_from_set_cookie(&second.headers)),
        )
        .await;

    assert_eq!(outcome.session.errors()[0].kind, "csrf");
    assert_eq!(mock.token_hits(), 0);
}
