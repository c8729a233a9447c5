//! Runner configuration

use anyhow::{Context, Result};
use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::Deserialize;

use dropsearch_core::DropboxConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dropbox: DropboxConfig,
    #[serde(default)]
    pub traversal: TraversalSettings,
}

#[derive(Debug, Deserialize)]
pub struct TraversalSettings {
    #[serde(default = "default_resolve_pushed_items")]
    pub resolve_pushed_items: bool,
    /// Seconds between traversals; unset runs a single traversal
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

fn default_resolve_pushed_items() -> bool {
    true
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            resolve_pushed_items: default_resolve_pushed_items(),
            interval_secs: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            // Load from config file if present
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with DROPSEARCH__ prefix
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Apply defaults, deserialize and validate
    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .set_default("dropbox.api_base_url", "https://api.dropboxapi.com")?
            .set_default("dropbox.page_size", 100)?
            .set_default("dropbox.max_retries", 3)?
            .set_default("dropbox.retry_delay_ms", 1000)?
            .set_default("traversal.resolve_pushed_items", true)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings
            .dropbox
            .validate()
            .context("Invalid Dropbox configuration")?;

        if settings.traversal.interval_secs == Some(0) {
            anyhow::bail!("traversal.interval_secs must be greater than zero");
        }

        Ok(settings)
    }
}

pub(crate) fn environment() -> Environment {
    Environment::with_prefix("DROPSEARCH")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("dropbox.team_member_ids")
}
