//! Connector configuration handed to the repository at initialization

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{ConnectorError, Result};

/// Dropbox connection and filtering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropboxConfig {
    /// Path to the Dropbox credential JSON file
    #[serde(default)]
    pub credential_file: Option<PathBuf>,

    /// Team member IDs to index; empty means every member
    #[serde(default)]
    pub team_member_ids: Vec<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth endpoint used to refresh short-lived access tokens
    #[serde(default = "default_oauth_token_url")]
    pub oauth_token_url: String,

    /// Members requested per list call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api.dropboxapi.com".to_string()
}

fn default_oauth_token_url() -> String {
    "https://api.dropbox.com/oauth2/token".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for DropboxConfig {
    fn default() -> Self {
        Self {
            credential_file: None,
            team_member_ids: Vec::new(),
            api_base_url: default_api_base_url(),
            oauth_token_url: default_oauth_token_url(),
            page_size: default_page_size(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl DropboxConfig {
    /// Check required settings and return the credential file path
    pub fn validate(&self) -> Result<&PathBuf> {
        let credential_file = self
            .credential_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ConnectorError::config("dropbox.credential_file is required"))?;

        // The members API rejects limits outside 1..=1000
        if !(1..=1000).contains(&self.page_size) {
            return Err(ConnectorError::config(format!(
                "dropbox.page_size must be between 1 and 1000, got {}",
                self.page_size
            )));
        }

        Ok(credential_file)
    }

    /// Trimmed, de-duplicated allow-list of team member IDs
    pub fn allow_list(&self) -> HashSet<String> {
        self.team_member_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Everything the host passes to a repository on `init`
#[derive(Debug, Clone, Default)]
pub struct RepositoryContext {
    pub dropbox: DropboxConfig,
}

impl RepositoryContext {
    pub fn new(dropbox: DropboxConfig) -> Self {
        Self { dropbox }
    }
}
