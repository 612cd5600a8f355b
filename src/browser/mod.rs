//! Cookie sources for token extraction
//!
//! A cookie source yields the site's cookies in `document.cookie` form
//! (`name=value; name=value`). The extractor only ever sees that string, so
//! a literal string and the local Firefox cookie store are interchangeable.

use crate::error::{CleanerError, Result};
use std::io::Read;
use std::path::Path;

pub mod firefox;

/// Hosts whose cookies carry the session, in priority order.
pub const SITE_DOMAINS: [&str; 2] = ["x.com", "twitter.com"];

/// Represents a browser cookie
#[derive(Debug, Clone)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub expires: Option<i64>,
}

/// Anything that can hand over the site's cookies as one string.
pub trait CookieSource {
    fn cookie_string(&self) -> Result<String>;

    /// Short label for log output.
    fn describe(&self) -> String;
}

/// Cookies supplied verbatim, e.g. pasted from the browser's dev tools.
#[derive(Debug, Clone)]
pub struct RawCookies {
    cookies: String,
}

impl RawCookies {
    pub fn new(cookies: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
        }
    }

    /// Read the whole cookie string from a reader (stdin for `--cookies -`).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut cookies = String::new();
        reader.read_to_string(&mut cookies)?;
        Ok(Self::new(cookies.trim().to_string()))
    }
}

impl CookieSource for RawCookies {
    fn cookie_string(&self) -> Result<String> {
        Ok(self.cookies.clone())
    }

    fn describe(&self) -> String {
        "cookie string".to_string()
    }
}

/// Browsers that can be named in `--cookies-from-browser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browser {
    Firefox,
}

/// Parsed `BROWSER[:PROFILE][::CONTAINER]` argument.
#[derive(Debug, Clone)]
pub struct BrowserCookieConfig {
    pub browser: Browser,
    pub profile: Option<String>,
    pub container: Option<String>,
}

impl BrowserCookieConfig {
    pub fn parse(input: &str) -> Result<Self> {
        let (browser_part, container) = match input.split_once("::") {
            Some((browser, container)) => (browser, Some(container.to_string())),
            None => (input, None),
        };
        let (browser_str, profile) = match browser_part.split_once(':') {
            Some((browser, profile)) => (browser, Some(profile.to_string())),
            None => (browser_part, None),
        };

        let browser = match browser_str.to_lowercase().as_str() {
            "firefox" => Browser::Firefox,
            "chrome" | "chromium" | "edge" | "brave" | "opera" | "vivaldi" | "safari" => {
                return Err(CleanerError::Unsupported(format!(
                    "{} keeps its cookies encrypted; pass them with --cookies instead",
                    browser_str
                )))
            }
            _ => {
                return Err(CleanerError::Config(format!(
                    "Unknown browser: {}",
                    browser_str
                )))
            }
        };

        Ok(BrowserCookieConfig {
            browser,
            profile: profile.filter(|p| !p.is_empty()),
            container: container.filter(|c| !c.is_empty()),
        })
    }

    /// Cookie source for the configured browser.
    pub fn into_source(self) -> Box<dyn CookieSource> {
        match self.browser {
            Browser::Firefox => Box::new(firefox::FirefoxCookies::new(self)),
        }
    }
}

/// Convert cookies to HTTP header format
pub fn cookies_to_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Whether `host` (as stored by the browser, maybe with a leading dot)
/// belongs to `domain`.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_start_matches('.');
    host == domain || host.ends_with(&format!(".{}", domain))
}

pub(crate) fn map_cookie_io_error(
    context: &str,
    path: &Path,
    err: std::io::Error,
) -> CleanerError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        return CleanerError::PermissionDenied(format!("{} {:?}: {}", context, path, err));
    }
    CleanerError::BrowserCookie(format!("{} {:?}: {}", context, path, err))
}

#[cfg(test)]
mod tests {
    use super::{
        cookies_to_header, host_matches, Browser, BrowserCookieConfig, Cookie, CookieSource,
        RawCookies,
    };
    use crate::error::CleanerError;

    fn cookie(name: &str, value: &str) -> Cookie {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: ".x.com".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: false,
            expires: None,
        }
    }

    #[test]
    fn parse_browser_with_profile_and_container() {
        let cfg = BrowserCookieConfig::parse("firefox:default-release::Personal").expect("parse");
        assert_eq!(cfg.browser, Browser::Firefox);
        assert_eq!(cfg.profile.as_deref(), Some("default-release"));
        assert_eq!(cfg.container.as_deref(), Some("Personal"));

        let cfg = BrowserCookieConfig::parse("Firefox").expect("parse");
        assert!(cfg.profile.is_none());
        assert!(cfg.container.is_none());
    }

    #[test]
    fn parse_rejects_encrypted_and_unknown_browsers() {
        let err = BrowserCookieConfig::parse("chrome").expect_err("chrome");
        assert!(matches!(err, CleanerError::Unsupported(_)));
        let err = BrowserCookieConfig::parse("netscape").expect_err("unknown");
        assert!(matches!(err, CleanerError::Config(_)));
    }

    #[test]
    fn raw_cookies_trim_reader_input() {
        let source = RawCookies::from_reader("ct0=abc; auth_token=x\n".as_bytes()).expect("read");
        assert_eq!(source.cookie_string().expect("cookies"), "ct0=abc; auth_token=x");
    }

    #[test]
    fn cookies_to_header_joins_pairs() {
        let header = cookies_to_header(&[cookie("ct0", "abc"), cookie("auth_token", "xyz")]);
        assert_eq!(header, "ct0=abc; auth_token=xyz");
    }

    #[test]
    fn host_matches_subdomains_only() {
        assert!(host_matches(".x.com", "x.com"));
        assert!(host_matches("api.x.com", "x.com"));
        assert!(!host_matches("box.com", "x.com"));
        assert!(!host_matches("x.com.evil", "x.com"));
    }
}
