//! Implicit-flow redirect plumbing
//!
//! Builds the provider authorization URL and parses the callback the
//! provider redirects back to. In the implicit flow the token material
//! arrives in the URL *fragment* (`#access_token=...&expires_in=...`);
//! a refusal arrives as `error`/`error_reason` parameters instead. The
//! `state` value round-trips unchanged so the UI layer can reject
//! callbacks it did not initiate.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

use crate::PromptError;

/// Generate a cryptographically random CSRF state parameter.
///
/// Produces a 32-byte random value encoded as URL-safe base64 (no
/// padding). The prompter sends it in the login URL and must see the
/// same value come back in the callback.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the full authorization URL for the implicit flow.
///
/// `response_type=token` asks the provider to return the access token
/// directly in the callback fragment. `scope` is included only when
/// permissions were requested, as a comma-delimited list; the provider
/// falls back to its default grants otherwise.
pub fn build_login_url(
    authorize_endpoint: &str,
    app_id: &str,
    redirect_uri: &str,
    display: &str,
    state: &str,
    permissions: &[String],
) -> String {
    let mut url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=token&display={}&state={}",
        authorize_endpoint,
        app_id,
        urlencoded(redirect_uri),
        display,
        state,
    );
    if !permissions.is_empty() {
        url.push_str("&scope=");
        url.push_str(&urlencoded(&permissions.join(",")));
    }
    url
}

/// Minimal URL encoding for parameter values.
/// Only encodes characters that would break URL parameter parsing.
fn urlencoded(s: &str) -> String {
    s.replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
        .replace(',', "%2C")
}

/// Token material extracted from a successful callback.
///
/// `expires_in` is a delta in seconds from the time the callback was
/// received. The prompter converts it to an absolute unix millisecond
/// timestamp when building the `AuthResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFields {
    pub access_token: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
    /// CSRF state echoed back by the provider, if present
    pub state: Option<String>,
}

/// Parse the callback URL the provider redirected back to.
///
/// A refusal (`error=` in the query or fragment) maps to `Cancelled`
/// when the provider reports the user denied the dialog, `Denied`
/// otherwise. A callback with neither an error nor an `access_token`
/// is malformed.
pub fn parse_callback_fragment(callback_url: &str) -> crate::Result<CallbackFields> {
    // Error parameters may appear in the query (refusals) while token
    // material only ever appears in the fragment; scan both.
    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some((_, rest)) = callback_url.split_once('?') {
        let query = rest.split('#').next().unwrap_or(rest);
        collect_params(query, &mut params);
    }
    if let Some((_, fragment)) = callback_url.split_once('#') {
        collect_params(fragment, &mut params);
    }

    if let Some(error) = lookup(&params, "error") {
        let reason = lookup(&params, "error_reason").unwrap_or("");
        if reason == "user_denied" {
            return Err(PromptError::Cancelled);
        }
        let description = lookup(&params, "error_description").unwrap_or(error);
        return Err(PromptError::Denied(description.replace('+', " ")));
    }

    let access_token = lookup(&params, "access_token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PromptError::Callback("callback carries no access_token".into()))?;

    let expires_in = lookup(&params, "expires_in")
        .ok_or_else(|| PromptError::Callback("callback carries no expires_in".into()))?
        .parse::<u64>()
        .map_err(|e| PromptError::Callback(format!("invalid expires_in: {e}")))?;

    Ok(CallbackFields {
        access_token: access_token.to_string(),
        expires_in,
        state: lookup(&params, "state").map(str::to_string),
    })
}

fn collect_params<'a>(raw: &'a str, out: &mut Vec<(&'a str, &'a str)>) {
    for pair in raw.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            out.push((key, value));
        }
    }
}

fn lookup<'a>(params: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORIZE: &str = "https://provider.example/dialog/oauth";
    const REDIRECT: &str = "https://provider.example/connect/login_success.html";

    #[test]
    fn state_is_url_safe_base64() {
        let state = generate_state();
        // 32 bytes → 43 base64url chars (no padding)
        assert_eq!(state.len(), 43);
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "state must be URL-safe base64 (no padding): {state}"
        );
    }

    #[test]
    fn states_are_unique() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn login_url_contains_required_params() {
        let url = build_login_url(
            AUTHORIZE,
            "app-123",
            REDIRECT,
            "popup",
            "state-abc",
            &["email".into(), "public_profile".into()],
        );

        assert!(url.starts_with(AUTHORIZE));
        assert!(url.contains("client_id=app-123"));
        assert!(url.contains("response_type=token"));
        assert!(url.contains("display=popup"));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("scope=email%2Cpublic_profile"));
    }

    #[test]
    fn login_url_omits_scope_when_no_permissions() {
        let url = build_login_url(AUTHORIZE, "app-123", REDIRECT, "touch", "s", &[]);
        assert!(!url.contains("scope="), "unexpected scope in: {url}");
        assert!(url.contains("display=touch"));
    }

    #[test]
    fn parses_token_fragment() {
        let url = format!("{REDIRECT}#access_token=at_xyz&expires_in=5183999&state=s1");
        let fields = parse_callback_fragment(&url).unwrap();
        assert_eq!(fields.access_token, "at_xyz");
        assert_eq!(fields.expires_in, 5183999);
        assert_eq!(fields.state.as_deref(), Some("s1"));
    }

    #[test]
    fn parses_fragment_after_query() {
        let url = format!("{REDIRECT}?junk=1#access_token=at&expires_in=60");
        let fields = parse_callback_fragment(&url).unwrap();
        assert_eq!(fields.access_token, "at");
        assert_eq!(fields.state, None);
    }

    #[test]
    fn user_denied_maps_to_cancelled() {
        let url = format!(
            "{REDIRECT}?error=access_denied&error_reason=user_denied&error_description=denied"
        );
        let err = parse_callback_fragment(&url).unwrap_err();
        assert!(matches!(err, PromptError::Cancelled));
    }

    #[test]
    fn provider_error_maps_to_denied_with_description() {
        let url = format!("{REDIRECT}?error=server_error&error_description=try+again+later");
        let err = parse_callback_fragment(&url).unwrap_err();
        match err {
            PromptError::Denied(description) => assert_eq!(description, "try again later"),
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn missing_token_is_malformed() {
        let url = format!("{REDIRECT}#expires_in=3600");
        let err = parse_callback_fragment(&url).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
    }

    #[test]
    fn missing_expires_is_malformed() {
        let url = format!("{REDIRECT}#access_token=at");
        let err = parse_callback_fragment(&url).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
    }

    #[test]
    fn non_numeric_expires_is_malformed() {
        let url = format!("{REDIRECT}#access_token=at&expires_in=soon");
        let err = parse_callback_fragment(&url).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
    }

    #[test]
    fn empty_token_is_malformed() {
        let url = format!("{REDIRECT}#access_token=&expires_in=3600");
        let err = parse_callback_fragment(&url).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
    }
}
