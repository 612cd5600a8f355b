//! xclean - disable X feed-personalization interests from the command line
//!
//! The crate has two halves connected by a `config.json` handoff: the
//! [`extractor`] turns session cookies into a [`credentials::CredentialBundle`],
//! and the [`interests`] cleaner uses that bundle to drive the private API
//! through [`http::ApiClient`].

pub mod browser;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exit_code;
pub mod extractor;
pub mod http;
pub mod i18n;
pub mod interests;
pub mod logging;
pub mod output;
pub mod utils;

pub use error::{CleanerError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
