//! Builds authenticated Dropbox clients from connector configuration

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

use dropsearch_core::{DropboxConfig, ProviderError, ProviderResult, TeamClient, TeamClientFactory};

use crate::credential::{DropboxCredential, TokenSource};
use crate::http::HttpClient;
use crate::team::DropboxTeamClient;

/// Factory for [`DropboxTeamClient`]s backed by a credential file
#[derive(Debug, Clone, Copy, Default)]
pub struct DropboxClientFactory;

impl DropboxClientFactory {
    pub fn new() -> Self {
        Self
    }

    /// Build the concrete team client
    pub async fn build(&self, config: &DropboxConfig) -> ProviderResult<DropboxTeamClient> {
        let credential_file = config
            .credential_file
            .as_deref()
            .ok_or_else(|| ProviderError::credential("No credential file configured"))?;

        let credential = DropboxCredential::from_file(credential_file).await?;
        let http_client = HttpClient::new(config.max_retries, config.retry_delay_ms)?;
        let tokens = Arc::new(TokenSource::new(
            http_client.clone(),
            config.oauth_token_url.clone(),
            credential,
        ));

        Ok(DropboxTeamClient::new(
            http_client,
            tokens,
            config.api_base_url.clone(),
            config.page_size,
        ))
    }
}

#[async_trait]
impl TeamClientFactory for DropboxClientFactory {
    #[instrument(skip(self, config))]
    async fn team_client(&self, config: &DropboxConfig) -> ProviderResult<Arc<dyn TeamClient>> {
        let client = self.build(config).await?;
        info!("Dropbox team client ready ({})", config.api_base_url);
        Ok(Arc::new(client))
    }
}
