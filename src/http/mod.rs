//! HTTP client for the personalization API
//!
//! Every request carries the session headers built from the credential
//! bundle. Requests are issued one at a time; failures are classified in
//! [`response`] and never retried.

use crate::config::Config;
use crate::credentials::CredentialBundle;
use crate::error::{CleanerError, Result};
use crate::interests::{
    Interest, InterestsResponse, PreferencesResponse, PreferencesUpdate,
};
use crate::utils::UrlUtils;
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use url::Url;

pub mod auth;
pub mod response;

/// Listing of the interests the account currently follows.
pub const TWITTER_INTERESTS_PATH: &str = "1.1/account/personalization/twitter_interests.json";
/// Read and write endpoint for personalization preferences.
pub const P13N_PREFERENCES_PATH: &str = "1.1/account/personalization/p13n_preferences.json";

/// Authenticated client for the interest endpoints.
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the given configuration and credentials
    pub fn new(config: &Config, bundle: &CredentialBundle) -> Result<Self> {
        bundle.validate()?;
        let base = UrlUtils::validate_base_url(&config.api_base)?;
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(auth::session_headers(bundle, &config.user_agent)?)
            .build()
            .map_err(CleanerError::Http)?;

        Ok(Self { client, base })
    }

    /// Raw current-interests document.
    pub async fn current_interests_document(&self) -> Result<Value> {
        self.get_json(TWITTER_INTERESTS_PATH).await
    }

    /// Interests the account currently follows.
    pub async fn current_interests(&self) -> Result<Vec<Interest>> {
        let document = self.current_interests_document().await?;
        let parsed: InterestsResponse = serde_json::from_value(document).map_err(|e| {
            CleanerError::UnexpectedResponse(format!("interest listing: {}", e))
        })?;
        log::info!("Found {} current interests", parsed.interested_in.len());
        Ok(parsed.interested_in)
    }

    /// Identifiers of interests already disabled.
    pub async fn disabled_interests(&self) -> Result<Vec<String>> {
        let document = self.get_json(P13N_PREFERENCES_PATH).await?;
        let parsed: PreferencesResponse = serde_json::from_value(document).map_err(|e| {
            CleanerError::UnexpectedResponse(format!("personalization preferences: {}", e))
        })?;
        let disabled = parsed.interest_preferences.disabled_interests;
        log::info!("Found {} already disabled interests", disabled.len());
        Ok(disabled)
    }

    /// Replace the disabled-interest list.
    pub async fn set_disabled_interests(&self, interest_ids: &[String]) -> Result<()> {
        self.post_preferences(&PreferencesUpdate::disable(interest_ids))
            .await
    }

    /// Follow the given interests, clearing the disabled lists.
    pub async fn follow_interests(&self, interests: &[Interest]) -> Result<()> {
        self.post_preferences(&PreferencesUpdate::follow(interests))
            .await
    }

    async fn post_preferences(&self, update: &PreferencesUpdate<'_>) -> Result<()> {
        let request = self
            .client
            .request(Method::POST, self.endpoint(P13N_PREFERENCES_PATH)?)
            .json(update);
        self.send(request).await?;
        Ok(())
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let request = self.client.request(Method::GET, self.endpoint(path)?);
        let response = self.send(request).await?;
        response.json::<Value>().await.map_err(|e| {
            CleanerError::UnexpectedResponse(format!("{} did not return JSON: {}", path, e))
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = request.build().map_err(CleanerError::Http)?;
        log::debug!("> {} {}", request.method(), request.url().path());
        let response = self.client.execute(request).await?;
        log::debug!("< {}", response.status());
        response::check_status(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        UrlUtils::join_path(&self.base, path)
    }
}
