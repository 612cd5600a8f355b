//! HTTP response classification

use crate::error::{CleanerError, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

const MAX_BODY_EXCERPT: usize = 300;

/// Pass successful responses through, map the rest onto the error taxonomy.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &headers, &body))
}

pub fn classify_failure(status: StatusCode, headers: &HeaderMap, body: &str) -> CleanerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CleanerError::AuthenticationFailed {
            status: status.as_u16(),
            detail: api_error_message(body).unwrap_or_else(|| excerpt(body)),
        },
        StatusCode::TOO_MANY_REQUESTS => CleanerError::RateLimited {
            retry_after: retry_after_secs(headers, unix_now()),
        },
        _ => CleanerError::Api {
            status: status.as_u16(),
            body: excerpt(body),
        },
    }
}

/// Seconds until the API accepts requests again, if it said so.
pub fn retry_after_secs(headers: &HeaderMap, now: u64) -> Option<u64> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };
    if let Some(seconds) = header("retry-after") {
        return Some(seconds);
    }
    header("x-rate-limit-reset").map(|reset| reset.saturating_sub(now))
}

/// First `errors[].message` of an API error document.
fn api_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("errors")?
        .as_array()?
        .iter()
        .find_map(|e| e.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_BODY_EXCERPT).collect();
    format!("{}...", cut)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{classify_failure, retry_after_secs};
    use crate::error::CleanerError;
    use reqwest::header::{HeaderMap, HeaderValue};
    use reqwest::StatusCode;

    #[test]
    fn unauthorized_uses_api_error_message() {
        let body = r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, &HeaderMap::new(), body);
        match err {
            CleanerError::AuthenticationFailed { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Could not authenticate you.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn forbidden_counts_as_authentication_failure() {
        let err = classify_failure(StatusCode::FORBIDDEN, &HeaderMap::new(), "csrf mismatch");
        assert!(matches!(
            err,
            CleanerError::AuthenticationFailed { status: 403, .. }
        ));
    }

    #[test]
    fn rate_limit_reads_reset_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-reset", HeaderValue::from_static("1000900"));
        assert_eq!(retry_after_secs(&headers, 1_000_000), Some(900));

        headers.insert("retry-after", HeaderValue::from_static("60"));
        assert_eq!(retry_after_secs(&headers, 1_000_000), Some(60));

        assert_eq!(retry_after_secs(&HeaderMap::new(), 0), None);
    }

    #[test]
    fn other_failures_keep_a_body_excerpt() {
        let body = "x".repeat(1000);
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new(), &body);
        match err {
            CleanerError::Api { status, body } => {
                assert_eq!(status, 500);
                assert!(body.len() < 400);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
