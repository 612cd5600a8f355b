use crate::error::CleanerError;
use fluent_templates::fluent_bundle::FluentValue;
use fluent_templates::{static_loader, Loader};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "locales",
        fallback_language: "en-US",
    };
}

pub fn localize_error(err: &CleanerError) -> String {
    let langid = resolve_language();
    match err {
        CleanerError::Http(detail) => {
            message_with_detail(&langid, "error-http", &detail.to_string())
        }
        CleanerError::MissingCredential(detail) => {
            message_with_detail(&langid, "error-missing-credential", detail)
        }
        CleanerError::Clipboard(detail) => message_with_detail(&langid, "error-clipboard", detail),
        CleanerError::AuthenticationFailed { status, detail } => {
            let mut args = HashMap::new();
            args.insert("status", FluentValue::from(*status));
            args.insert("detail", FluentValue::from(detail.as_str()));
            LOCALES.lookup_with_args(&langid, "error-auth", &args)
        }
        CleanerError::RateLimited { retry_after } => match retry_after {
            Some(seconds) => {
                let mut args = HashMap::new();
                args.insert("seconds", FluentValue::from(*seconds));
                LOCALES.lookup_with_args(&langid, "error-rate-limited-for", &args)
            }
            None => LOCALES.lookup(&langid, "error-rate-limited"),
        },
        CleanerError::Api { status, body } => {
            let mut args = HashMap::new();
            args.insert("status", FluentValue::from(*status));
            args.insert("detail", FluentValue::from(body.as_str()));
            LOCALES.lookup_with_args(&langid, "error-api", &args)
        }
        CleanerError::UnexpectedResponse(detail) => {
            message_with_detail(&langid, "error-unexpected-response", detail)
        }
        CleanerError::BrowserCookie(detail) => {
            message_with_detail(&langid, "error-browser-cookie", detail)
        }
        CleanerError::InvalidUrl(detail) => {
            message_with_detail(&langid, "error-invalid-url", detail)
        }
        CleanerError::Io(detail) => message_with_detail(&langid, "error-io", &detail.to_string()),
        CleanerError::Json(detail) => {
            message_with_detail(&langid, "error-json", &detail.to_string())
        }
        CleanerError::Config(detail) => message_with_detail(&langid, "error-config", detail),
        CleanerError::PermissionDenied(detail) => {
            message_with_detail(&langid, "error-permission-denied", detail)
        }
        CleanerError::FileNotFound(detail) => {
            message_with_detail(&langid, "error-file-not-found", detail)
        }
        CleanerError::Unsupported(detail) => {
            message_with_detail(&langid, "error-unsupported", detail)
        }
    }
}

/// Next step the operator should take, if there is a useful one.
pub fn remediation(err: &CleanerError) -> Option<String> {
    let key = match err {
        CleanerError::MissingCredential(_) => "hint-log-in",
        CleanerError::AuthenticationFailed { .. } => "hint-re-extract",
        CleanerError::RateLimited { .. } => "hint-wait",
        CleanerError::FileNotFound(_) => "hint-create-config",
        CleanerError::Clipboard(_) => "hint-clipboard",
        CleanerError::BrowserCookie(_) => "hint-browser-cookie",
        _ => return None,
    };
    Some(LOCALES.lookup(&resolve_language(), key))
}

fn message_with_detail(langid: &LanguageIdentifier, key: &str, detail: &str) -> String {
    let mut args = HashMap::new();
    args.insert("detail", FluentValue::from(detail));
    LOCALES.lookup_with_args(langid, key, &args)
}

fn resolve_language() -> LanguageIdentifier {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(key) {
            if let Some(lang) = normalize_lang(value) {
                if let Ok(langid) = lang.parse::<LanguageIdentifier>() {
                    return langid;
                }
            }
        }
    }
    "en-US".parse().expect("valid fallback language")
}

fn normalize_lang(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "C" || value == "POSIX" {
        return None;
    }
    let value = value.split('.').next().unwrap_or(value);
    let value = value.replace('_', "-");
    Some(value)
}
