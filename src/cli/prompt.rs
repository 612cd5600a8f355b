//! Manual token entry

use crate::credentials::{CredentialBundle, DEFAULT_BEARER_TOKEN};
use crate::error::{CleanerError, Result};
use crate::utils::StringUtils;
use std::io::{BufRead, Write};

/// Ask for the tokens on `input`, echoing prompts to `out`.
///
/// An empty bearer token keeps the web client default; an empty ct0 reuses
/// the CSRF token; an empty auth token is left out.
pub fn read_manual_credentials<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<CredentialBundle> {
    writeln!(out, "Manual token input")?;
    writeln!(out, "Press Enter to accept the default where one is shown.")?;

    let bearer_token = ask(input, out, "Bearer token [web client default]: ")?;
    let csrf_token = ask(input, out, "CSRF token (x-csrf-token header or ct0 cookie): ")?;
    let ct0 = ask(input, out, "ct0 cookie [same as CSRF token]: ")?;
    let auth_token = ask(input, out, "auth_token cookie [optional]: ")?;

    let csrf_token = match (csrf_token.is_empty(), ct0.is_empty()) {
        (true, true) => {
            return Err(CleanerError::MissingCredential(
                "a CSRF token (ct0) is required".to_string(),
            ))
        }
        (true, false) => ct0.clone(),
        _ => csrf_token,
    };
    if !ct0.is_empty() && ct0 != csrf_token {
        return Err(CleanerError::Config(
            "ct0 and the CSRF token must be the same value".to_string(),
        ));
    }
    if ct0.is_empty() {
        writeln!(
            out,
            "Using the CSRF token for ct0: {}",
            StringUtils::mask_secret(&csrf_token)
        )?;
    }

    let bundle = CredentialBundle::new(csrf_token, Some(auth_token).filter(|t| !t.is_empty()))
        .with_bearer_token(Some(bearer_token.as_str()).filter(|t| !t.is_empty()));
    if bundle.bearer_token != DEFAULT_BEARER_TOKEN {
        log::debug!("Using a custom bearer token");
    }
    bundle.validate()?;
    Ok(bundle)
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
