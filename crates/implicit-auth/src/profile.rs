//! Post-authorization profile lookup
//!
//! A freshly prompted token carries no subject identity. The session
//! manager resolves it with one follow-up call to the provider's profile
//! endpoint, requesting exactly the `id` field. The response is decoded
//! into a typed struct; a missing or empty id is a typed error, never a
//! credential with a null subject.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::debug;

use crate::error::ProfileError;

/// The one field the core needs from the profile endpoint.
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    id: String,
}

/// Resolves the stable subject id behind an access token.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn ProfileLookup>`).
pub trait ProfileLookup: Send + Sync {
    fn fetch_subject_id<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProfileError>> + Send + 'a>>;
}

/// Profile lookup against the provider's graph endpoint.
///
/// Issues `GET {endpoint}?fields=id&access_token=…` and decodes the
/// typed response.
pub struct GraphProfile {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphProfile {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

impl ProfileLookup for GraphProfile {
    fn fetch_subject_id<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProfileError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[("fields", "id"), ("access_token", access_token)])
                .send()
                .await
                .map_err(|e| ProfileError::Http(format!("profile request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<no body>"));
                return Err(ProfileError::Provider(format!("{status}: {body}")));
            }

            let body = response
                .text()
                .await
                .map_err(|e| ProfileError::Http(format!("reading profile response: {e}")))?;
            let id = parse_profile_body(&body)?;
            debug!(subject_id = %id, "resolved subject id");
            Ok(id)
        })
    }
}

/// Decode a profile response body into the subject id.
fn parse_profile_body(body: &str) -> Result<String, ProfileError> {
    let profile: ProfileResponse = serde_json::from_str(body)
        .map_err(|e| ProfileError::Malformed(format!("invalid profile response: {e}")))?;
    if profile.id.is_empty() {
        return Err(ProfileError::Malformed(
            "profile response carries no id".into(),
        ));
    }
    Ok(profile.id)
}
