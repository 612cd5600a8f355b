//! Runs the action selected on the command line

use crate::browser::{CookieSource, RawCookies};
use crate::cli::prompt;
use crate::config::{Action, Config, CookieInput, CredentialSource, ExtractConfig};
use crate::credentials::{sample_config, CredentialBundle, DEFAULT_CONFIG_FILE};
use crate::error::{CleanerError, Result};
use crate::extractor::{ClipboardSink, NoClipboard, SystemClipboard, TokenExtractor};
use crate::http::ApiClient;
use crate::interests::{write_interests_example, InterestCleaner};
use crate::output::{write_json_file, OutputWriter};
use std::io;
use std::path::Path;

/// Execute the configured action to completion.
pub fn execute(config: Config) -> Result<()> {
    let mut out = OutputWriter::stdout();
    match &config.action {
        Action::CreateConfig => {
            let path = config.output_path();
            write_json_file(&path, &sample_config())?;
            out.sample_config_guidance(&path)
        }
        Action::AddInterestsExample => {
            let path = config.output_path();
            write_interests_example(&path)?;
            out.interests_example_guidance(&path)
        }
        Action::Extract(extract) => run_extract(&config, extract, &mut out),
        _ => {
            let bundle = load_credentials(&config)?
                .with_bearer_token(config.bearer_token.as_deref());
            let rt = tokio::runtime::Runtime::new().map_err(|e| {
                CleanerError::Config(format!("Failed to create async runtime: {}", e))
            })?;
            rt.block_on(run_api_action(&config, &bundle, &mut out))
        }
    }
}

fn run_extract<W: io::Write>(
    config: &Config,
    extract: &ExtractConfig,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    let source: Box<dyn CookieSource> = match &extract.cookies {
        CookieInput::Raw(cookies) => Box::new(RawCookies::new(cookies.clone())),
        CookieInput::Stdin => Box::new(RawCookies::from_reader(io::stdin().lock())?),
        CookieInput::Browser(browser) => browser.clone().into_source(),
    };
    let mut clipboard: Box<dyn ClipboardSink> = if extract.clipboard {
        Box::new(SystemClipboard)
    } else {
        Box::new(NoClipboard)
    };

    let report = TokenExtractor::new(source.as_ref(), clipboard.as_mut())
        .mode(extract.mode)
        .bearer_token(config.bearer_token.clone())
        .export(&config.output_path())?;
    out.extract_summary(&report)
}

/// Resolve credentials: prompt, explicit file, or `./config.json`.
pub fn load_credentials(config: &Config) -> Result<CredentialBundle> {
    match &config.credentials {
        CredentialSource::Manual => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            prompt::read_manual_credentials(&mut input, &mut io::stdout())
        }
        CredentialSource::File(path) => CredentialBundle::load(path),
        CredentialSource::Default => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Err(CleanerError::FileNotFound(
                    "no config.json in the current directory and no --config or --manual given"
                        .to_string(),
                ));
            }
            CredentialBundle::load(path)
        }
    }
}

async fn run_api_action<W: io::Write>(
    config: &Config,
    bundle: &CredentialBundle,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    let cleaner = InterestCleaner::new(ApiClient::new(config, bundle)?);
    match &config.action {
        Action::Clean => {
            let plan = cleaner.clean().await?;
            out.clean_summary(&plan)
        }
        Action::DryRun => {
            let plan = cleaner.plan().await?;
            out.dry_run_summary(&plan)
        }
        Action::CleanDisabled => {
            cleaner.clean_disabled().await?;
            out.line("Cleared the disabled interests list.")
        }
        Action::GetInterests => {
            let path = config.output_path();
            let count = cleaner.save_current_interests(&path).await?;
            out.line(&format!("Saved {} interests to {}", count, path.display()))
        }
        Action::AddInterests(path) => {
            let count = cleaner.add_interests(path).await?;
            out.line(&format!("Now following {} interests.", count))
        }
        Action::CreateConfig | Action::AddInterestsExample | Action::Extract(_) => {
            Err(CleanerError::Unsupported(
                "action does not use the API".to_string(),
            ))
        }
    }
}
