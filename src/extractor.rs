//! Token extraction
//!
//! Turns a cookie string into a [`CredentialBundle`], writes it as
//! `config.json` and hands a copy to the clipboard. The cookie store and the
//! clipboard are injected so this runs the same against a real browser
//! profile, a pasted string, or a test double.

use crate::browser::CookieSource;
use crate::credentials::CredentialBundle;
use crate::error::{CleanerError, Result};
use crate::utils::StringUtils;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Whether the `auth_token` cookie is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// `auth_token` is captured when present.
    #[default]
    Tolerant,
    /// Extraction fails without `auth_token`.
    Strict,
}

/// Destination for the best-effort clipboard copy.
pub trait ClipboardSink {
    /// Returns `Ok(false)` when the sink deliberately copied nothing.
    fn copy(&mut self, text: &str) -> Result<bool>;
}

/// The desktop clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<bool> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| CleanerError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| CleanerError::Clipboard(e.to_string()))?;
        Ok(true)
    }
}

/// Sink used with `--no-clipboard`.
#[derive(Debug, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn copy(&mut self, _text: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Split a `document.cookie` style string into name/value pairs.
///
/// Entries are separated by `;` and split on the first `=`. Entries without a
/// name are skipped; a repeated name keeps its last value.
pub fn parse_cookie_string(cookies: &str) -> HashMap<String, String> {
    cookies
        .split(';')
        .filter_map(|entry| {
            let (name, value) = entry.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Build a bundle from cookies.
pub fn bundle_from_cookies(cookies: &str, mode: ExtractMode) -> Result<CredentialBundle> {
    let mut parsed = parse_cookie_string(cookies);
    let ct0 = parsed
        .remove("ct0")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            CleanerError::MissingCredential(
                "ct0 cookie not found; make sure you are logged in to x.com".to_string(),
            )
        })?;
    let auth_token = parsed.remove("auth_token").filter(|value| !value.is_empty());

    if mode == ExtractMode::Strict && auth_token.is_none() {
        return Err(CleanerError::MissingCredential(
            "auth_token cookie not found; make sure you are logged in to x.com".to_string(),
        ));
    }

    Ok(CredentialBundle::new(ct0, auth_token))
}

/// What a successful extraction produced.
#[derive(Debug)]
pub struct ExtractReport {
    pub bundle: CredentialBundle,
    pub path: PathBuf,
    pub copied_to_clipboard: bool,
}

/// Reads cookies, writes the bundle and copies it to the clipboard.
pub struct TokenExtractor<'a> {
    source: &'a dyn CookieSource,
    clipboard: &'a mut dyn ClipboardSink,
    mode: ExtractMode,
    bearer_token: Option<String>,
}

impl<'a> TokenExtractor<'a> {
    pub fn new(source: &'a dyn CookieSource, clipboard: &'a mut dyn ClipboardSink) -> Self {
        Self {
            source,
            clipboard,
            mode: ExtractMode::default(),
            bearer_token: None,
        }
    }

    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn bearer_token(mut self, bearer_token: Option<String>) -> Self {
        self.bearer_token = bearer_token;
        self
    }

    /// Build the bundle without touching the file system.
    pub fn extract(&self) -> Result<CredentialBundle> {
        log::debug!("Reading cookies from {}", self.source.describe());
        let cookies = self.source.cookie_string()?;
        let bundle = bundle_from_cookies(&cookies, self.mode)?
            .with_bearer_token(self.bearer_token.as_deref());
        log::info!(
            "Extracted ct0 {}{}",
            StringUtils::mask_secret(&bundle.ct0),
            if bundle.auth_token.is_some() {
                " and auth_token"
            } else {
                " (no auth_token)"
            }
        );
        Ok(bundle)
    }

    /// Extract, save to `output` and copy the JSON to the clipboard.
    ///
    /// Nothing is written when extraction fails. A failed clipboard copy is
    /// logged and does not change the result.
    pub fn export(mut self, output: &Path) -> Result<ExtractReport> {
        let bundle = self.extract()?;
        bundle.save(output)?;
        log::info!("Saved tokens to {}", output.display());

        let json = bundle.to_pretty_json()?;
        let copied_to_clipboard = match self.clipboard.copy(&json) {
            Ok(copied) => copied,
            Err(err) => {
                log::warn!("Could not copy tokens to the clipboard: {}", err);
                false
            }
        };

        Ok(ExtractReport {
            bundle,
            path: output.to_path_buf(),
            copied_to_clipboard,
        })
    }
}
