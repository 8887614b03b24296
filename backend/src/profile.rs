use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::session::is_valid_profile;

/// Browser profile a page belongs to.
///
/// Taken from the `profile` query parameter. Pages that do not send one get a
/// freshly generated id, which the client is expected to keep and send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse the profile from a raw query string
    pub fn from_query(query: Option<&str>) -> Result<Self, StatusCode> {
        let requested = query
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .and_then(|params| {
                params
                    .into_iter()
                    .find(|(k, _)| k == "profile")
                    .map(|(_, v)| v)
            });

        match requested {
            None => Ok(Self::generate()),
            Some(profile) if is_valid_profile(&profile) => Ok(Self(profile)),
            Some(profile) => {
                tracing::warn!("Rejected invalid profile id: {:?}", profile);
                Err(StatusCode::BAD_REQUEST)
            }
        }
    }
}

/// Extractor for the requesting page's profile
impl<S> FromRequestParts<S> for ProfileId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_query(parts.uri.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_query() {
        let profile = ProfileId::from_query(Some("profile=abc-123&x=1")).unwrap();
        assert_eq!(profile, ProfileId("abc-123".to_string()));
    }

    #[test]
    fn test_missing_profile_is_generated() {
        let first = ProfileId::from_query(None).unwrap();
        let second = ProfileId::from_query(Some("other=1")).unwrap();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first.0).is_ok());
    }

    #[test]
    fn test_invalid_profile_rejected() {
        assert_eq!(
            ProfileId::from_query(Some("profile=a%20b")),
            Err(StatusCode::BAD_REQUEST)
        );
    }
}
