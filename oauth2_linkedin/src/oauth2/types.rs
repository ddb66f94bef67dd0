use chrono::{DateTime, Utc};
use http::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::errors::{AuthFailure, CallbackError};

/// Query parameters of the begin-auth request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeginAuthParams {
    pub scope: Option<String>,
    pub state: Option<String>,
}

/// Query parameters LinkedIn sends back to the callback URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub error_reason: Option<String>,
}

/// Where to send the browser, and the cookie to set on the way out
#[derive(Debug)]
pub struct BeginAuthResponse {
    pub auth_url: String,
    pub headers: HeaderMap,
}

/// Result of the callback hook.
///
/// `headers` always carries exactly one `Set-Cookie` that clears the state cookie.
#[derive(Debug)]
pub struct CallbackOutcome {
    pub headers: HeaderMap,
    pub session: AuthSession,
}

/// Access token and the metadata that came with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub raw: Value,
}

/// Request-scoped record threaded through the callback pipeline.
///
/// Each step consumes the record and returns an updated one.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    state: Option<String>,
    token: Option<TokenSet>,
    raw_profile: Option<Value>,
    raw_email: Option<String>,
    errors: Vec<AuthFailure>,
}

impl AuthSession {
    pub(crate) fn new(state: Option<String>) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub(crate) fn with_token(self, token: TokenSet) -> Self {
        Self {
            token: Some(token),
            ..self
        }
    }

    pub(crate) fn with_profile(self, raw_profile: Value) -> Self {
        Self {
            raw_profile: Some(raw_profile),
            ..self
        }
    }

    pub(crate) fn with_email(self, raw_email: Option<String>) -> Self {
        Self { raw_email, ..self }
    }

    pub(crate) fn with_failure(mut self, err: CallbackError) -> Self {
        self.errors.push(err.into());
        self
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn token(&self) -> Option<&TokenSet> {
        self.token.as_ref()
    }

    pub fn raw_profile(&self) -> Option<&Value> {
        self.raw_profile.as_ref()
    }

    pub fn raw_email(&self) -> Option<&str> {
        self.raw_email.as_deref()
    }

    pub fn errors(&self) -> &[AuthFailure] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.token.is_some() && self.raw_profile.is_some()
    }
}

/// The normalized shape every strategy hands to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResult {
    pub provider: String,
    pub uid: String,
    pub info: AuthInfo,
    pub credentials: Credentials,
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthInfo {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub token: String,
    pub refresh_token: Option<String>,
    pub expires: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extra {
    pub raw_token: Value,
    pub raw_profile: Value,
}

// Provider response schemas. Every field is optional so that a missing key
// decodes to `None` instead of failing the whole response. Profile and handle
// fields are decoded one by one: a malformed field or list element only
// loses itself.

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: Option<String>,
    pub(super) expires_in: Option<i64>,
    pub(super) refresh_token: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

/// Decode a field on its own; a value of the wrong type reads as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a list element by element, skipping the ones that don't fit
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LinkedInProfile {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) localized_first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) localized_last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) profile_picture: Option<ProfilePicture>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProfilePicture {
    #[serde(rename = "displayImage~", default, deserialize_with = "lenient")]
    pub(super) display_image: Option<DisplayImage>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DisplayImage {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(super) elements: Vec<ImageElement>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ImageElement {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) data: Option<ImageData>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(super) identifiers: Vec<ImageIdentifier>,
}

impl ImageElement {
    /// Reported storage width; missing or non-integer metadata counts as zero
    pub(super) fn width(&self) -> u64 {
        self.data
            .as_ref()
            .and_then(|d| d.still_image.as_ref())
            .and_then(|s| s.storage_size.as_ref())
            .and_then(|s| s.width)
            .unwrap_or(0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ImageData {
    #[serde(
        rename = "com.linkedin.digitalmedia.mediaartifact.StillImage",
        default,
        deserialize_with = "lenient"
    )]
    pub(super) still_image: Option<StillImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StillImage {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) storage_size: Option<StorageSize>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StorageSize {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) width: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ImageIdentifier {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) identifier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MemberHandles {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub(super) elements: Vec<HandleElement>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct HandleElement {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub(super) handle_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) primary: Option<bool>,
    /// Usually a URN string; some responses inline the handle object here
    #[serde(default)]
    pub(super) handle: Option<Value>,
    #[serde(rename = "handle~", default, deserialize_with = "lenient")]
    pub(super) handle_detail: Option<HandleDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HandleDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) email_address: Option<String>,
}

impl HandleElement {
    pub(super) fn is_email(&self) -> bool {
        self.handle_type.as_deref() == Some("EMAIL")
    }

    pub(super) fn is_primary(&self) -> bool {
        self.primary == Some(true)
    }

    pub(super) fn email_address(&self) -> Option<String> {
        if let Some(detail) = &self.handle_detail {
            return detail.email_address.clone();
        }
        self.handle
            .as_ref()
            .filter(|h| h.is_object())
            .and_then(|h| serde_json::from_value::<HandleDetail>(h.clone()).ok())
            .and_then(|d| d.email_address)
    }
}
