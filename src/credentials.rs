//! Credential bundle shared between the extractor and the cleaner client

use crate::error::{CleanerError, Result};
use crate::utils::{FileUtils, StringUtils};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Public bearer token the x.com web client sends with every API call.
pub const DEFAULT_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// Default file name the extractor writes and the client looks for.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default file name for `--create-config`.
pub const SAMPLE_CONFIG_FILE: &str = "config_sample.json";

/// Tokens needed to authenticate against the private API.
///
/// `csrf_token` and `ct0` always hold the same value; the API reads it from
/// the `x-csrf-token` header and from the `ct0` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialBundle {
    pub bearer_token: String,
    pub csrf_token: String,
    pub ct0: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// On-disk shape, lenient so hand-edited files still load.
#[derive(Debug, Deserialize)]
struct StoredBundle {
    bearer_token: Option<String>,
    csrf_token: Option<String>,
    ct0: Option<String>,
    auth_token: Option<String>,
}

impl CredentialBundle {
    /// Build a bundle from a CSRF value, using the default bearer token.
    pub fn new(ct0: impl Into<String>, auth_token: Option<String>) -> Self {
        let ct0 = ct0.into();
        Self {
            bearer_token: DEFAULT_BEARER_TOKEN.to_string(),
            csrf_token: ct0.clone(),
            ct0,
            auth_token,
        }
    }

    /// Replace the bearer token; blank input keeps the current one.
    pub fn with_bearer_token(mut self, bearer_token: Option<&str>) -> Self {
        if let Some(token) = bearer_token.map(str::trim).filter(|t| !t.is_empty()) {
            self.bearer_token = strip_bearer_prefix(token).to_string();
        }
        self
    }

    /// Check the invariants the API relies on.
    pub fn validate(&self) -> Result<()> {
        if self.ct0.trim().is_empty() {
            return Err(CleanerError::MissingCredential(
                "ct0 is empty".to_string(),
            ));
        }
        if self.csrf_token != self.ct0 {
            return Err(CleanerError::Config(
                "csrf_token and ct0 must hold the same value".to_string(),
            ));
        }
        if self.bearer_token.trim().is_empty() {
            return Err(CleanerError::Config("bearer_token is empty".to_string()));
        }
        Ok(())
    }

    /// Load and validate a bundle from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        FileUtils::check_file_readable(path)?;
        let data = fs::read_to_string(path)?;
        let bundle = Self::from_json(&data)?;
        log::info!(
            "Loaded credentials from {} (ct0 {})",
            path.display(),
            StringUtils::mask_secret(&bundle.ct0)
        );
        Ok(bundle)
    }

    /// Parse and validate a bundle from its JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        let stored: StoredBundle = serde_json::from_str(data)?;
        let csrf_token = non_empty(stored.csrf_token);
        let ct0 = non_empty(stored.ct0);
        let (csrf_token, ct0) = match (csrf_token, ct0) {
            (Some(csrf), Some(ct0)) => (csrf, ct0),
            (Some(value), None) | (None, Some(value)) => (value.clone(), value),
            (None, None) => {
                return Err(CleanerError::MissingCredential(
                    "config has neither ct0 nor csrf_token".to_string(),
                ))
            }
        };
        let bundle = CredentialBundle {
            bearer_token: non_empty(stored.bearer_token)
                .map(|token| strip_bearer_prefix(&token).to_string())
                .unwrap_or_else(|| DEFAULT_BEARER_TOKEN.to_string()),
            csrf_token,
            ct0,
            auth_token: non_empty(stored.auth_token),
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Pretty JSON, the format written to `config.json`.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the bundle to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_pretty_json()?;
        fs::write(path, format!("{}\n", json)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                CleanerError::PermissionDenied(format!("Cannot write {:?}: {}", path, e))
            } else {
                CleanerError::Io(e)
            }
        })
    }
}

/// Placeholder bundle written by `--create-config`.
pub fn sample_config() -> serde_json::Value {
    serde_json::json!({
        "bearer_token": DEFAULT_BEARER_TOKEN,
        "csrf_token": "YOUR_CSRF_TOKEN_HERE",
        "ct0": "YOUR_CT0_VALUE_FROM_COOKIES",
        "auth_token": "YOUR_AUTH_TOKEN_FROM_COOKIES"
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_bearer_prefix(token: &str) -> &str {
    token.strip_prefix("Bearer ").unwrap_or(token).trim()
}

#[cfg(test)]
mod tests {
    use super::{CredentialBundle, DEFAULT_BEARER_TOKEN};
    use crate::error::CleanerError;
    use tempfile::tempdir;

    #[test]
    fn new_duplicates_ct0_into_csrf_token() {
        let bundle = CredentialBundle::new("abc123", None);
        assert_eq!(bundle.csrf_token, "abc123");
        assert_eq!(bundle.ct0, "abc123");
        assert_eq!(bundle.bearer_token, DEFAULT_BEARER_TOKEN);
        bundle.validate().expect("valid bundle");
    }

    #[test]
    fn serialization_omits_missing_auth_token() {
        let bundle = CredentialBundle::new("abc123", None);
        let value = serde_json::to_value(&bundle).expect("json");
        assert!(value.get("auth_token").is_none());
        assert_eq!(value["ct0"], "abc123");
    }

    #[test]
    fn from_json_fills_defaults() {
        let bundle = CredentialBundle::from_json(r#"{"ct0": "token"}"#).expect("bundle");
        assert_eq!(bundle.csrf_token, "token");
        assert_eq!(bundle.bearer_token, DEFAULT_BEARER_TOKEN);
        assert_eq!(bundle.auth_token, None);
    }

    #[test]
    fn from_json_strips_bearer_prefix() {
        let bundle =
            CredentialBundle::from_json(r#"{"bearer_token": "Bearer AAAA", "csrf_token": "t"}"#)
                .expect("bundle");
        assert_eq!(bundle.bearer_token, "AAAA");
        assert_eq!(bundle.ct0, "t");
    }

    #[test]
    fn from_json_rejects_mismatched_csrf_values() {
        let err = CredentialBundle::from_json(r#"{"csrf_token": "a", "ct0": "b"}"#)
            .expect_err("mismatch");
        assert!(matches!(err, CleanerError::Config(_)));
    }

    #[test]
    fn from_json_requires_ct0() {
        let err = CredentialBundle::from_json(r#"{"auth_token": "x", "ct0": "  "}"#)
            .expect_err("missing");
        assert!(matches!(err, CleanerError::MissingCredential(_)));
    }

    #[test]
    fn save_then_load_keeps_bundle() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let bundle = CredentialBundle::new("abc", Some("secret".to_string()));
        bundle.save(&path).expect("save");
        assert_eq!(CredentialBundle::load(&path).expect("load"), bundle);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().expect("tempdir");
        let err = CredentialBundle::load(&dir.path().join("nope.json")).expect_err("missing");
        assert!(matches!(err, CleanerError::FileNotFound(_)));
    }
}
