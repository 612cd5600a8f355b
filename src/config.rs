//! Configuration management for xclean

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserCookieConfig;
use crate::credentials::DEFAULT_CONFIG_FILE;
use crate::extractor::ExtractMode;

/// Default API host for the private personalization endpoints.
pub const DEFAULT_API_BASE: &str = "https://api.x.com";

/// Browser user agent the web client would send.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Where the cookies for `--extract` come from.
#[derive(Debug, Clone)]
pub enum CookieInput {
    Raw(String),
    Stdin,
    Browser(BrowserCookieConfig),
}

/// Settings for a token extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub cookies: CookieInput,
    pub mode: ExtractMode,
    pub clipboard: bool,
}

/// Where the client gets its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Prompt on the terminal.
    Manual,
    /// Explicit `--config` path.
    File(PathBuf),
    /// `config.json` in the working directory, if present.
    Default,
}

/// The one thing an invocation does.
#[derive(Debug, Clone)]
pub enum Action {
    Clean,
    DryRun,
    CleanDisabled,
    GetInterests,
    AddInterests(PathBuf),
    AddInterestsExample,
    CreateConfig,
    Extract(ExtractConfig),
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub credentials: CredentialSource,
    pub bearer_token: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Output file for the action, falling back to its usual name.
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        let default = match self.action {
            Action::GetInterests => "current_interests.json",
            Action::AddInterestsExample => "interests_example.json",
            Action::CreateConfig => crate::credentials::SAMPLE_CONFIG_FILE,
            _ => DEFAULT_CONFIG_FILE,
        };
        PathBuf::from(default)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            action: Action::Clean,
            credentials: CredentialSource::Default,
            bearer_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output: None,
            verbose: false,
            log_file: None,
        }
    }
}
