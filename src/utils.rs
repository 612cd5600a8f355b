//! Utility functions and helpers

use crate::error::{CleanerError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate an API base URL; only http and https are accepted.
    pub fn validate_base_url(input: &str) -> Result<Url> {
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        let url = Url::parse(&url_str)
            .map_err(|e| CleanerError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CleanerError::InvalidUrl(format!(
                "Unsupported scheme '{}' in '{}'",
                other, input
            ))),
        }
    }

    /// Join an API path onto a base URL that may carry its own path prefix.
    pub fn join_path(base: &Url, path: &str) -> Result<Url> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| CleanerError::InvalidUrl(format!("Cannot join '{}': {}", path, e)))
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if path == "~" || path.starts_with("~/") {
            if let Some(home_dir) = dirs::home_dir() {
                Ok(home_dir.join(path.trim_start_matches('~').trim_start_matches('/')))
            } else {
                Err(CleanerError::Config(
                    "Cannot determine home directory".to_string(),
                ))
            }
        } else {
            Ok(PathBuf::from(path))
        }
    }

    /// Check if file exists and is readable
    pub fn check_file_readable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CleanerError::FileNotFound(format!(
                "File not found: {:?}",
                path
            )));
        }

        if !path.is_file() {
            return Err(CleanerError::Config(format!(
                "Path is not a file: {:?}",
                path
            )));
        }

        std::fs::File::open(path).map_err(|e| {
            CleanerError::PermissionDenied(format!("Cannot read file {:?}: {}", path, e))
        })?;

        Ok(())
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(CleanerError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part.parse().map_err(|_| {
            CleanerError::Config(format!("Invalid timeout number: '{}'", number_part))
        })?;

        let seconds = number.checked_mul(suffix).ok_or_else(|| {
            CleanerError::Config(format!("Timeout too large: '{}'", input))
        })?;
        Ok(std::time::Duration::from_secs(seconds))
    }

    /// Shorten a secret for log output, keeping only a short prefix.
    pub fn mask_secret(secret: &str) -> String {
        const VISIBLE: usize = 6;
        let count = secret.chars().count();
        if count <= VISIBLE {
            return "*".repeat(count);
        }
        let prefix: String = secret.chars().take(VISIBLE).collect();
        format!("{}...({} chars)", prefix, count)
    }
}
