//! Interest model and the cleaning sequence

use crate::error::{CleanerError, Result};
use crate::http::ApiClient;
use crate::output;
use crate::utils::FileUtils;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A personalization category as the API lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterestsResponse {
    #[serde(default)]
    pub interested_in: Vec<Interest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferencesResponse {
    #[serde(default)]
    pub interest_preferences: InterestPreferences,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InterestPreferences {
    #[serde(default)]
    pub disabled_interests: Vec<String>,
}

/// Body of a preferences POST.
#[derive(Debug, Serialize)]
pub struct PreferencesUpdate<'a> {
    preferences: PreferencesBody<'a>,
}

#[derive(Debug, Serialize)]
struct PreferencesBody<'a> {
    interest_preferences: InterestPreferencesUpdate<'a>,
}

#[derive(Debug, Serialize)]
struct InterestPreferencesUpdate<'a> {
    disabled_interests: &'a [String],
    disabled_partner_interests: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    interested_in: Option<&'a [Interest]>,
}

impl<'a> PreferencesUpdate<'a> {
    pub fn disable(interest_ids: &'a [String]) -> Self {
        Self::new(interest_ids, None)
    }

    pub fn follow(interests: &'a [Interest]) -> Self {
        Self::new(&[], Some(interests))
    }

    fn new(disabled: &'a [String], interested_in: Option<&'a [Interest]>) -> Self {
        PreferencesUpdate {
            preferences: PreferencesBody {
                interest_preferences: InterestPreferencesUpdate {
                    disabled_interests: disabled,
                    disabled_partner_interests: &[],
                    interested_in,
                },
            },
        }
    }
}

/// Union of two identifier lists, first occurrence wins the position.
pub fn merge_interests(current: &[String], disabled: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(current.len() + disabled.len());
    current
        .iter()
        .chain(disabled)
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// What a cleaning run would send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPlan {
    pub current: Vec<String>,
    pub disabled: Vec<String>,
    pub union: Vec<String>,
}

impl CleanPlan {
    pub fn new(current: Vec<String>, disabled: Vec<String>) -> Self {
        let union = merge_interests(&current, &disabled);
        Self {
            current,
            disabled,
            union,
        }
    }

    /// Interests the run disables that were not disabled before.
    pub fn newly_disabled(&self) -> usize {
        let disabled: HashSet<&str> = self.disabled.iter().map(String::as_str).collect();
        self.union
            .iter()
            .filter(|id| !disabled.contains(id.as_str()))
            .count()
    }
}

/// File format for `--add-interests`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterestsFile {
    #[serde(default)]
    pub interests: Vec<Interest>,
}

/// Read the interests to follow from a JSON file.
pub fn load_interests_file(path: &Path) -> Result<Vec<Interest>> {
    FileUtils::check_file_readable(path)?;
    let data = std::fs::read_to_string(path)?;
    let file: InterestsFile = serde_json::from_str(&data)?;
    if file.interests.is_empty() {
        return Err(CleanerError::Config(format!(
            "No interests found in {}",
            path.display()
        )));
    }
    Ok(file.interests)
}

/// Write a one-entry example for `--add-interests`.
pub fn write_interests_example(path: &Path) -> Result<()> {
    let example = InterestsFile {
        interests: vec![Interest {
            id: "DAALDAABDAABCgABEiA7xGgVAAEAAAsAAwAAAAdGYWNlQXBwAgAEAAgABQAAAAEAAA==".to_string(),
            display_name: Some("FaceApp".to_string()),
        }],
    };
    output::write_json_file(path, &example)
}

/// Runs the fixed request sequences against the API.
pub struct InterestCleaner {
    client: ApiClient,
}

impl InterestCleaner {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch both lists and compute the union. Read-only.
    pub async fn plan(&self) -> Result<CleanPlan> {
        let current = self
            .client
            .current_interests()
            .await?
            .into_iter()
            .map(|interest| interest.id)
            .collect();
        let disabled = self.client.disabled_interests().await?;
        let plan = CleanPlan::new(current, disabled);
        log::info!("Total unique interests to disable: {}", plan.union.len());
        Ok(plan)
    }

    /// Disable every current and previously disabled interest.
    pub async fn clean(&self) -> Result<CleanPlan> {
        log::info!("Starting interest cleaning");
        let plan = self.plan().await?;
        if plan.union.is_empty() {
            log::info!("No interests to disable");
            return Ok(plan);
        }
        self.client.set_disabled_interests(&plan.union).await?;
        log::info!("Disabled {} interests", plan.union.len());
        Ok(plan)
    }

    /// Empty the disabled list, re-enabling everything disabled before.
    pub async fn clean_disabled(&self) -> Result<()> {
        self.client.set_disabled_interests(&[]).await?;
        log::info!("Cleared the disabled interests list");
        Ok(())
    }

    /// Save the raw current-interests document; returns how many it lists.
    pub async fn save_current_interests(&self, path: &Path) -> Result<usize> {
        let document = self.client.current_interests_document().await?;
        output::write_json_file(path, &document)?;
        let count = document
            .get("interested_in")
            .and_then(|v| v.as_array())
            .map_or(0, Vec::len);
        log::info!("Saved {} interests to {}", count, path.display());
        Ok(count)
    }

    /// Follow the interests listed in `path`; returns the new follow count.
    pub async fn add_interests(&self, path: &Path) -> Result<usize> {
        let interests = load_interests_file(path)?;
        log::info!("Adding {} interests from {}", interests.len(), path.display());
        self.client.follow_interests(&interests).await?;
        let now_following = self.client.current_interests().await?.len();
        log::info!("Now following {} interests", now_following);
        Ok(now_following)
    }
}
