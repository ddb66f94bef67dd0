use serde_json::Value;

use crate::oauth2::types::{AuthInfo, AuthSession, Credentials, Extra};

use super::extract::{decode_profile, select_profile_image};

pub(crate) fn uid(session: &AuthSession, uid_field: &str) -> Option<String> {
    match session.raw_profile()?.get(uid_field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn info(session: &AuthSession) -> AuthInfo {
    let Some(raw_profile) = session.raw_profile() else {
        return AuthInfo {
            email: session.raw_email().map(str::to_string),
            ..Default::default()
        };
    };

    let profile = decode_profile(raw_profile);
    let image_url = profile
        .profile_picture
        .as_ref()
        .and_then(select_profile_image);

    let name = [
        profile.localized_first_name.as_deref(),
        profile.localized_last_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    AuthInfo {
        email: session.raw_email().map(str::to_string),
        first_name: profile.localized_first_name,
        last_name: profile.localized_last_name,
        name: (!name.is_empty()).then_some(name),
        image_url,
    }
}

pub(crate) fn credentials(session: &AuthSession) -> Option<Credentials> {
    let token = session.token()?;
    Some(Credentials {
        token: token.access_token.clone(),
        refresh_token: token.refresh_token.clone(),
        expires: token.expires_at.is_some(),
        expires_at: token.expires_at,
    })
}

pub(crate) fn extra(session: &AuthSession) -> Extra {
    Extra {
        raw_token: session
            .token()
            .map(|t| t.raw.clone())
            .unwrap_or(Value::Null),
        raw_profile: session.raw_profile().cloned().unwrap_or(Value::Null),
    }
}
