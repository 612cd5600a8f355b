//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::browser::BrowserCookieConfig;
use crate::config::{Action, Config, CookieInput, CredentialSource, ExtractConfig};
use crate::error::{CleanerError, Result};
use crate::exit_code::exit_code_for_error;
use crate::extractor::ExtractMode;
use crate::utils::{FileUtils, StringUtils, UrlUtils};
use crate::{i18n, logging};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};

pub mod prompt;
pub mod runner;

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();

    let result = build_config_from_args(&matches).and_then(|config| {
        logging::init(config.verbose, config.log_file.as_deref())?;
        runner::execute(config)
    });
    let code = match result {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            exit_code_for_error(&err)
        }
    };
    std::process::exit(code);
}

fn report_error(err: &CleanerError) {
    log::debug!("{:?}", err);
    eprintln!("xclean: error: {}", i18n::localize_error(err));
    if let Some(hint) = i18n::remediation(err) {
        eprintln!("xclean: hint: {}", hint);
    }
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("xclean")
        .version(crate::VERSION)
        .about("Disable every X feed-personalization interest using your browser session")
        .after_help(
            "Examples:\n  \
             xclean --extract --cookies-from-browser firefox\n  \
             xclean --extract --cookies 'ct0=...; auth_token=...'\n  \
             xclean --dry-run\n  \
             xclean --config config.json\n  \
             xclean --manual\n  \
             xclean --get-interests -o my_interests.json",
        )
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .env("XCLEAN_CONFIG")
            .help("Path to the config file with tokens (default: ./config.json)"))
        .arg(Arg::new("manual")
            .short('m')
            .long("manual")
            .help("Enter tokens manually (takes precedence over --config)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("create-config")
            .long("create-config")
            .help("Create a sample config file")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("dry-run")
            .long("dry-run")
            .help("Show what would be disabled without making changes")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("clean-disabled")
            .long("clean-disabled")
            .help("Clear the disabled interests list (send an empty list)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("get-interests")
            .long("get-interests")
            .help("Save the current interests to a file")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("add-interests")
            .long("add-interests")
            .value_name("FILE")
            .help("Follow the interests listed in a JSON file"))
        .arg(Arg::new("add-interests-example")
            .long("add-interests-example")
            .help("Create an example file for --add-interests")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("extract")
            .long("extract")
            .help("Build config.json from the x.com session cookies")
            .action(ArgAction::SetTrue))
        .group(ArgGroup::new("action")
            .args([
                "create-config",
                "dry-run",
                "clean-disabled",
                "get-interests",
                "add-interests",
                "add-interests-example",
                "extract",
            ])
            .multiple(false))
        .arg(Arg::new("cookies")
            .long("cookies")
            .value_name("STRING|-")
            .help("Cookie string as shown by document.cookie ('-' reads stdin)")
            .requires("extract")
            .conflicts_with("cookies-from-browser"))
        .arg(Arg::new("cookies-from-browser")
            .long("cookies-from-browser")
            .value_name("BROWSER[:PROFILE][::CONTAINER]")
            .help("Read the cookies from a local browser profile (firefox)")
            .requires("extract"))
        .arg(Arg::new("require-auth-token")
            .long("require-auth-token")
            .help("Fail extraction when the auth_token cookie is missing")
            .action(ArgAction::SetTrue)
            .requires("extract"))
        .arg(Arg::new("no-clipboard")
            .long("no-clipboard")
            .help("Do not copy the extracted config to the clipboard")
            .action(ArgAction::SetTrue)
            .requires("extract"))
        .arg(Arg::new("bearer-token")
            .long("bearer-token")
            .value_name("TOKEN")
            .help("Override the web client bearer token"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Output file for --extract, --get-interests and the example/sample writers"))
        .arg(Arg::new("api-base")
            .long("api-base")
            .value_name("URL")
            .env("XCLEAN_API_BASE")
            .help("API base URL")
            .default_value(crate::config::DEFAULT_API_BASE))
        .arg(Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .help("Maximum time for each request")
            .default_value("30"))
        .arg(Arg::new("log-file")
            .long("log-file")
            .value_name("FILE")
            .env("XCLEAN_LOG_FILE")
            .help("Also append log output to FILE"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Verbose output")
            .action(ArgAction::SetTrue))
}

/// Build configuration from command line arguments
pub fn build_config_from_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config {
        action: action_from_args(matches)?,
        verbose: matches.get_flag("verbose"),
        ..Config::default()
    };

    config.credentials = if matches.get_flag("manual") {
        CredentialSource::Manual
    } else if let Some(path) = matches.get_one::<String>("config") {
        CredentialSource::File(FileUtils::expand_path(path)?)
    } else {
        CredentialSource::Default
    };

    config.bearer_token = matches.get_one::<String>("bearer-token").cloned();

    if let Some(output) = matches.get_one::<String>("output") {
        config.output = Some(FileUtils::expand_path(output)?);
    }

    if let Some(api_base) = matches.get_one::<String>("api-base") {
        config.api_base = UrlUtils::validate_base_url(api_base)?.to_string();
    }

    if let Some(timeout_str) = matches.get_one::<String>("timeout") {
        config.timeout = StringUtils::parse_timeout(timeout_str)?;
    }

    if let Some(log_file) = matches.get_one::<String>("log-file") {
        config.log_file = Some(FileUtils::expand_path(log_file)?);
    }

    Ok(config)
}

fn action_from_args(matches: &ArgMatches) -> Result<Action> {
    if matches.get_flag("create-config") {
        return Ok(Action::CreateConfig);
    }
    if matches.get_flag("add-interests-example") {
        return Ok(Action::AddInterestsExample);
    }
    if matches.get_flag("extract") {
        return extract_from_args(matches).map(Action::Extract);
    }
    if matches.get_flag("dry-run") {
        return Ok(Action::DryRun);
    }
    if matches.get_flag("clean-disabled") {
        return Ok(Action::CleanDisabled);
    }
    if matches.get_flag("get-interests") {
        return Ok(Action::GetInterests);
    }
    if let Some(path) = matches.get_one::<String>("add-interests") {
        return Ok(Action::AddInterests(FileUtils::expand_path(path)?));
    }
    Ok(Action::Clean)
}

fn extract_from_args(matches: &ArgMatches) -> Result<ExtractConfig> {
    let cookies = if let Some(cookies) = matches.get_one::<String>("cookies") {
        if cookies == "-" {
            CookieInput::Stdin
        } else {
            CookieInput::Raw(cookies.clone())
        }
    } else if let Some(browser) = matches.get_one::<String>("cookies-from-browser") {
        CookieInput::Browser(BrowserCookieConfig::parse(browser)?)
    } else {
        return Err(CleanerError::Config(
            "--extract needs --cookies or --cookies-from-browser".to_string(),
        ));
    };

    Ok(ExtractConfig {
        cookies,
        mode: if matches.get_flag("require-auth-token") {
            ExtractMode::Strict
        } else {
            ExtractMode::Tolerant
        },
        clipboard: !matches.get_flag("no-clipboard"),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_config_from_args, create_app};
    use crate::config::{Action, CookieInput, CredentialSource};
    use crate::error::CleanerError;
    use crate::extractor::ExtractMode;
    use std::path::PathBuf;

    fn config_for(args: &[&str]) -> crate::error::Result<crate::config::Config> {
        let matches = create_app()
            .try_get_matches_from(std::iter::once("xclean").chain(args.iter().copied()))
            .expect("valid arguments");
        build_config_from_args(&matches)
    }

    #[test]
    fn defaults_to_clean_with_default_config() {
        let config = config_for(&["--api-base", "https://api.x.com"]).expect("config");
        assert!(matches!(config.action, Action::Clean));
        assert_eq!(config.credentials, CredentialSource::Default);
    }

    #[test]
    fn config_flag_selects_file() {
        let config = config_for(&["--config", "tokens.json", "--dry-run"]).expect("config");
        assert!(matches!(config.action, Action::DryRun));
        assert_eq!(
            config.credentials,
            CredentialSource::File(PathBuf::from("tokens.json"))
        );
    }

    #[test]
    fn extract_reads_cookie_options() {
        let config = config_for(&[
            "--extract",
            "--cookies",
            "ct0=abc",
            "--require-auth-token",
            "--no-clipboard",
        ])
        .expect("config");
        match config.action {
            Action::Extract(extract) => {
                assert!(matches!(extract.cookies, CookieInput::Raw(ref s) if s == "ct0=abc"));
                assert_eq!(extract.mode, ExtractMode::Strict);
                assert!(!extract.clipboard);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn extract_without_cookie_source_is_rejected() {
        let err = config_for(&["--extract"]).expect_err("no source");
        assert!(matches!(err, CleanerError::Config(_)));
    }

    #[test]
    fn actions_are_mutually_exclusive() {
        let result = create_app().try_get_matches_from(["xclean", "--dry-run", "--clean-disabled"]);
        assert!(result.is_err());

        let result = create_app().try_get_matches_from(["xclean", "--cookies", "ct0=a"]);
        assert!(result.is_err(), "--cookies requires --extract");
    }

    #[test]
    fn manual_entry_wins_over_config_path() {
        let config = config_for(&["--manual", "--config", "a.json", "--dry-run"]).expect("config");
        assert_eq!(config.credentials, CredentialSource::Manual);
        assert!(matches!(config.action, Action::DryRun));
    }

    #[test]
    fn verbose_and_log_file_reach_config() {
        let config = config_for(&["-v", "--log-file", "run.log", "--dry-run"]).expect("config");
        assert!(config.verbose);
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let err = config_for(&["--timeout", "soon"]).expect_err("timeout");
        assert!(matches!(err, CleanerError::Config(_)));

        let err = config_for(&["--timeout", "99999999999999999h"]).expect_err("overflow");
        assert!(matches!(err, CleanerError::Config(_)));
    }
}
