use serde_json::Value;

use crate::oauth2::types::{
    HandleElement, ImageElement, LinkedInProfile, MemberHandles, ProfilePicture,
};

/// Decode the parts of the raw profile we normalize.
///
/// Each field is decoded independently; only a body that isn't a JSON object
/// yields empty fields.
pub(super) fn decode_profile(raw_profile: &Value) -> LinkedInProfile {
    serde_json::from_value(raw_profile.clone()).unwrap_or_else(|e| {
        tracing::warn!("Unexpected profile shape: {}", e);
        LinkedInProfile::default()
    })
}

/// URL of the largest profile image.
///
/// Picks the element with the greatest storage width (first one wins on a tie)
/// and returns its first identifier.
pub(super) fn select_profile_image(picture: &ProfilePicture) -> Option<String> {
    let elements = &picture.display_image.as_ref()?.elements;

    let largest = elements
        .iter()
        .fold(None::<&ImageElement>, |best, element| match best {
            Some(b) if element.width() <= b.width() => Some(b),
            _ => Some(element),
        })?;

    largest.identifiers.first()?.identifier.clone()
}

/// Email address from the member handles response.
///
/// Only `EMAIL` handles count. With several, the one flagged `primary` wins,
/// otherwise the first in list order.
pub(super) fn select_primary_email(handles: &MemberHandles) -> Option<String> {
    let emails: Vec<&HandleElement> = handles.elements.iter().filter(|e| e.is_email()).collect();

    let chosen = match emails.as_slice() {
        [] => None,
        [only] => Some(*only),
        many => many.iter().find(|e| e.is_primary()).or(many.first()).copied(),
    };

    chosen.and_then(HandleElement::email_address)
}

/// Decode the member handles body and extract the email from it
pub(super) fn extract_email(raw_handles: &Value) -> Option<String> {
    match serde_json::from_value::<MemberHandles>(raw_handles.clone()) {
        Ok(handles) => select_primary_email(&handles),
        Err(e) => {
            tracing::warn!("Unexpected member handles shape: {}", e);
            None
        }
    }
}
