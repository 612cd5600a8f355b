//! Firefox cookie store reader
//!
//! Firefox keeps cookies unencrypted in `cookies.sqlite`, so the session
//! cookies can be read directly. The database is locked while the browser
//! runs; it is copied to a temp dir before opening.

use crate::browser::{
    cookies_to_header, host_matches, map_cookie_io_error, BrowserCookieConfig, Cookie,
    CookieSource, SITE_DOMAINS,
};
use crate::error::{CleanerError, Result};
use crate::utils::FileUtils;
use rusqlite::{Connection, Row};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

const MAX_SUPPORTED_DB_SCHEMA_VERSION: i64 = 17;

/// Cookie source backed by a Firefox profile.
#[derive(Debug, Clone)]
pub struct FirefoxCookies {
    config: BrowserCookieConfig,
}

impl FirefoxCookies {
    pub fn new(config: BrowserCookieConfig) -> Self {
        Self { config }
    }

    /// All unexpired cookies for the site, from the most specific domain that
    /// has any.
    pub fn site_cookies(&self) -> Result<Vec<Cookie>> {
        let search_roots = firefox_search_roots(self.config.profile.as_deref())?;
        let cookie_db = newest_path(find_cookie_dbs(&search_roots)).ok_or_else(|| {
            CleanerError::FileNotFound("Firefox cookies database not found".to_string())
        })?;
        log::debug!("Using Firefox cookie database {}", cookie_db.display());

        let cookies = read_cookie_db(&cookie_db, self.config.container.as_deref())?;
        let now = unix_now();
        let live: Vec<Cookie> = cookies
            .into_iter()
            .filter(|c| c.expires.map_or(true, |expires| expires > now))
            .collect();

        for domain in SITE_DOMAINS {
            let matching: Vec<Cookie> = live
                .iter()
                .filter(|c| host_matches(&c.domain, domain))
                .cloned()
                .collect();
            if !matching.is_empty() {
                log::info!("Found {} Firefox cookies for {}", matching.len(), domain);
                return Ok(matching);
            }
        }

        Err(CleanerError::MissingCredential(
            "no x.com cookies in the Firefox profile".to_string(),
        ))
    }
}

impl CookieSource for FirefoxCookies {
    fn cookie_string(&self) -> Result<String> {
        Ok(cookies_to_header(&self.site_cookies()?))
    }

    fn describe(&self) -> String {
        match &self.config.profile {
            Some(profile) => format!("Firefox profile {}", profile),
            None => "Firefox".to_string(),
        }
    }
}

/// Read every cookie row from a Firefox cookie database.
pub fn read_cookie_db(cookie_db: &Path, container: Option<&str>) -> Result<Vec<Cookie>> {
    let temp_dir = tempdir()
        .map_err(|e| CleanerError::BrowserCookie(format!("Failed to create temp dir: {}", e)))?;
    let temp_db = temp_dir.path().join("firefox-cookies.sqlite");
    fs::copy(cookie_db, &temp_db)
        .map_err(|e| map_cookie_io_error("Failed to copy cookies DB", cookie_db, e))?;

    let conn = Connection::open(&temp_db)
        .map_err(|e| CleanerError::BrowserCookie(format!("Failed to open cookies DB: {}", e)))?;
    let schema_version = read_schema_version(&conn);
    if schema_version > MAX_SUPPORTED_DB_SCHEMA_VERSION {
        log::warn!(
            "Firefox cookie DB schema version {} may be unsupported",
            schema_version
        );
    }

    let columns = cookie_columns(&conn)?;
    let container_filter = resolve_container(cookie_db, container)?;
    let query = format!(
        "SELECT host, name, value, path, {}, {}, {} FROM moz_cookies{}",
        columns.expiry,
        columns.secure,
        columns.http_only,
        container_filter.where_clause()
    );

    let mut stmt = conn.prepare(&query).map_err(|e| {
        CleanerError::BrowserCookie(format!("Failed to prepare Firefox query: {}", e))
    })?;
    let mut rows = stmt
        .query(rusqlite::params_from_iter(container_filter.params()))
        .map_err(|e| {
            CleanerError::BrowserCookie(format!("Failed to query Firefox cookies: {}", e))
        })?;

    let mut cookies = Vec::new();
    while let Some(row) = rows.next().map_err(|e| {
        CleanerError::BrowserCookie(format!("Failed to read Firefox cookie row: {}", e))
    })? {
        cookies.push(row_to_cookie(row, schema_version)?);
    }
    Ok(cookies)
}

fn firefox_search_roots(profile: Option<&str>) -> Result<Vec<PathBuf>> {
    if let Some(profile) = profile {
        if is_path_like(profile) {
            return Ok(vec![FileUtils::expand_path(profile)?]);
        }
        return Ok(default_profile_roots()?
            .into_iter()
            .map(|root| root.join(profile))
            .collect());
    }
    default_profile_roots()
}

#[cfg(target_os = "macos")]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    Ok(vec![home_dir()?.join("Library/Application Support/Firefox/Profiles")])
}

#[cfg(target_os = "windows")]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    let appdata = dirs::config_dir()
        .ok_or_else(|| CleanerError::Config("Cannot determine APPDATA directory".to_string()))?;
    Ok(vec![appdata.join("Mozilla").join("Firefox").join("Profiles")])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    let home = home_dir()?;
    Ok(vec![
        home.join(".mozilla/firefox"),
        home.join("snap/firefox/common/.mozilla/firefox"),
        home.join(".var/app/org.mozilla.firefox/.mozilla/firefox"),
    ])
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| CleanerError::Config("Cannot determine home directory".to_string()))
}

fn is_path_like(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.starts_with('~')
}

fn find_cookie_dbs(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for root in roots {
        if root.is_file() && root.ends_with("cookies.sqlite") {
            results.push(root.clone());
            continue;
        }
        if root.exists() {
            results.extend(find_files(root, "cookies.sqlite"));
        }
    }
    results
}

fn find_files(root: &Path, filename: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.file_name().and_then(|name| name.to_str()) == Some(filename) {
                matches.push(path);
            }
        }
    }
    matches
}

fn newest_path(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths
        .into_iter()
        .filter_map(|path| {
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

fn read_schema_version(conn: &Connection) -> i64 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap_or(0)
}

struct CookieColumns {
    expiry: &'static str,
    secure: &'static str,
    http_only: &'static str,
}

fn cookie_columns(conn: &Connection) -> Result<CookieColumns> {
    let schema_error = |e: rusqlite::Error| {
        CleanerError::BrowserCookie(format!("Failed to read cookie schema: {}", e))
    };
    let mut stmt = conn
        .prepare("PRAGMA table_info(moz_cookies)")
        .map_err(schema_error)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(schema_error)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(schema_error)?;
    if columns.is_empty() {
        return Err(CleanerError::BrowserCookie(
            "moz_cookies table not found".to_string(),
        ));
    }
    let has = |name: &str| columns.iter().any(|c| c == name);

    let expiry = if has("expiry") {
        "expiry"
    } else if has("expires") {
        "expires"
    } else {
        return Err(CleanerError::BrowserCookie(
            "Firefox cookies table missing expiry column".to_string(),
        ));
    };
    let secure = if has("is_secure") { "is_secure" } else { "isSecure" };
    let http_only = if has("isHttpOnly") {
        "isHttpOnly"
    } else if has("is_http_only") {
        "is_http_only"
    } else {
        "0"
    };
    Ok(CookieColumns {
        expiry,
        secure,
        http_only,
    })
}

fn row_to_cookie(row: &Row<'_>, schema_version: i64) -> Result<Cookie> {
    let field = |what: &str, e: rusqlite::Error| {
        CleanerError::BrowserCookie(format!("Failed to read cookie {}: {}", what, e))
    };
    let domain: String = row.get(0).map_err(|e| field("host", e))?;
    let name: String = row.get(1).map_err(|e| field("name", e))?;
    let value: String = row.get(2).map_err(|e| field("value", e))?;
    let path: String = row.get(3).map_err(|e| field("path", e))?;
    let expiry: Option<i64> = row.get(4).map_err(|e| field("expiry", e))?;
    let secure: i64 = row.get(5).map_err(|e| field("secure flag", e))?;
    let http_only: i64 = row.get(6).map_err(|e| field("http-only flag", e))?;

    // Schema 16 switched expiry from seconds to milliseconds.
    let expires = expiry
        .map(|expiry| {
            if schema_version >= 16 {
                expiry / 1000
            } else {
                expiry
            }
        })
        .filter(|seconds| *seconds > 0);

    Ok(Cookie {
        name,
        value,
        domain,
        path,
        secure: secure != 0,
        http_only: http_only != 0,
        expires,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum ContainerFilter {
    Any,
    NoneOnly,
    Specific(i64),
}

impl ContainerFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            ContainerFilter::Any => "",
            ContainerFilter::NoneOnly => " WHERE NOT INSTR(originAttributes, 'userContextId=')",
            ContainerFilter::Specific(_) => {
                " WHERE originAttributes LIKE ? OR originAttributes LIKE ?"
            }
        }
    }

    fn params(&self) -> Vec<String> {
        match self {
            ContainerFilter::Specific(id) => vec![
                format!("%userContextId={}", id),
                format!("%userContextId={}&%", id),
            ],
            _ => Vec::new(),
        }
    }
}

fn resolve_container(cookie_db: &Path, container: Option<&str>) -> Result<ContainerFilter> {
    let container = match container {
        Some(container) => container,
        None => return Ok(ContainerFilter::Any),
    };
    if container == "none" {
        return Ok(ContainerFilter::NoneOnly);
    }

    let containers_path = cookie_db
        .parent()
        .map(|path| path.join("containers.json"))
        .ok_or_else(|| CleanerError::BrowserCookie("Firefox profile path not found".to_string()))?;
    if !containers_path.is_file() {
        return Err(CleanerError::FileNotFound(
            "Firefox containers.json not found".to_string(),
        ));
    }

    let data = fs::read_to_string(&containers_path)
        .map_err(|e| map_cookie_io_error("Failed to read containers.json", &containers_path, e))?;
    let value: Value = serde_json::from_str(&data)?;
    let identities = value
        .get("identities")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    identities
        .iter()
        .find_map(|identity| {
            let name = identity.get("name").and_then(|v| v.as_str());
            let l10n_id = identity.get("l10nID").and_then(|v| v.as_str());
            let matches = name == Some(container) || l10n_matches(container, l10n_id);
            if matches {
                identity.get("userContextId").and_then(|v| v.as_i64())
            } else {
                None
            }
        })
        .map(ContainerFilter::Specific)
        .ok_or_else(|| {
            CleanerError::BrowserCookie(format!("Firefox container '{}' not found", container))
        })
}

fn l10n_matches(container: &str, l10n_id: Option<&str>) -> bool {
    l10n_id
        .and_then(|id| id.strip_prefix("userContext"))
        .and_then(|id| id.strip_suffix(".label"))
        .map_or(false, |label| label == container)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
