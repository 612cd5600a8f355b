//! Session headers derived from the credential bundle

use crate::credentials::CredentialBundle;
use crate::error::{CleanerError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Create bearer token header value
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Cookie header carrying the session cookies the API checks.
pub fn session_cookie(bundle: &CredentialBundle) -> String {
    match &bundle.auth_token {
        Some(auth_token) => format!("ct0={}; auth_token={}", bundle.ct0, auth_token),
        None => format!("ct0={}", bundle.ct0),
    }
}

/// Headers sent with every API request.
pub fn session_headers(bundle: &CredentialBundle, user_agent: &str) -> Result<HeaderMap> {
    let pairs: [(&'static str, String); 14] = [
        ("accept", "*/*".to_string()),
        ("accept-language", "en-US,en;q=0.9".to_string()),
        ("authorization", bearer_token(&bundle.bearer_token)),
        ("cookie", session_cookie(bundle)),
        ("origin", "https://x.com".to_string()),
        ("referer", "https://x.com/".to_string()),
        ("sec-fetch-dest", "empty".to_string()),
        ("sec-fetch-mode", "cors".to_string()),
        ("sec-fetch-site", "same-site".to_string()),
        ("user-agent", user_agent.to_string()),
        ("x-csrf-token", bundle.csrf_token.clone()),
        ("x-twitter-active-user", "yes".to_string()),
        ("x-twitter-auth-type", "OAuth2Session".to_string()),
        ("x-twitter-client-language", "en".to_string()),
    ];

    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let mut value = HeaderValue::from_str(&value).map_err(|_| {
            CleanerError::Config(format!("Value for header '{}' contains invalid characters", name))
        })?;
        if matches!(name, "authorization" | "cookie" | "x-csrf-token") {
            value.set_sensitive(true);
        }
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}
