use crate::error::CleanerError;

pub fn exit_code_for_error(err: &CleanerError) -> i32 {
    match err {
        CleanerError::Config(_) | CleanerError::InvalidUrl(_) => 2,
        CleanerError::MissingCredential(_) => 3,
        CleanerError::Unsupported(_) => 4,
        CleanerError::AuthenticationFailed { .. } => 5,
        CleanerError::RateLimited { .. } => 6,
        CleanerError::Api { .. } => 7,
        CleanerError::Http(err) => http_exit_code(err),
        CleanerError::UnexpectedResponse(_) => 8,
        CleanerError::Io(_) | CleanerError::Clipboard(_) => 23,
        CleanerError::Json(_) => 26,
        CleanerError::PermissionDenied(_) | CleanerError::FileNotFound(_) => 37,
        CleanerError::BrowserCookie(_) => 43,
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_decode() {
        return 8;
    }
    7
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::CleanerError;

    #[test]
    fn exit_code_maps_missing_credential() {
        let err = CleanerError::MissingCredential("ct0".to_string());
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_separates_auth_and_rate_limit() {
        let auth = CleanerError::AuthenticationFailed {
            status: 401,
            detail: "expired".to_string(),
        };
        let limited = CleanerError::RateLimited { retry_after: None };
        assert_eq!(exit_code_for_error(&auth), 5);
        assert_eq!(exit_code_for_error(&limited), 6);
    }
}
