//! Dropbox credential file and access token management

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use dropsearch_core::{ProviderError, ProviderResult};

use crate::http::HttpClient;

/// Tokens are refreshed this long before they expire
const REFRESH_MARGIN_SECS: i64 = 300;

/// Credential file as written by the Dropbox SDK credential writers
#[derive(Clone, Deserialize)]
pub struct DropboxCredential {
    pub access_token: String,
    /// Expiry as epoch milliseconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
    #[serde(default)]
    pub app_secret: Option<String>,
}

impl fmt::Debug for DropboxCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxCredential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("app_key", &self.app_key)
            .finish_non_exhaustive()
    }
}

impl DropboxCredential {
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let credential: Self = serde_json::from_str(json)
            .map_err(|e| ProviderError::credential(format!("Invalid credential file: {}", e)))?;

        if credential.access_token.trim().is_empty() {
            return Err(ProviderError::credential("Credential file has an empty access_token"));
        }

        Ok(credential)
    }

    pub async fn from_file(path: &Path) -> ProviderResult<Self> {
        debug!("Reading Dropbox credential from {}", path.display());

        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            ProviderError::credential(format!(
                "Failed to read credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&json)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(DateTime::from_timestamp_millis)
    }

    fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.app_key.is_some()
    }

    /// Whether the access token expires within the refresh margin and can be renewed
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                self.can_refresh() && expires_at - Duration::seconds(REFRESH_MARGIN_SECS) <= now
            }
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Hands out a current access token, refreshing it when close to expiry
pub struct TokenSource {
    http_client: HttpClient,
    token_url: String,
    credential: RwLock<DropboxCredential>,
}

impl TokenSource {
    pub fn new(
        http_client: HttpClient,
        token_url: impl Into<String>,
        credential: DropboxCredential,
    ) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            credential: RwLock::new(credential),
        }
    }

    pub async fn access_token(&self) -> ProviderResult<String> {
        {
            let credential = self.credential.read().await;
            if !credential.needs_refresh(Utc::now()) {
                return Ok(credential.access_token.clone());
            }
        }

        let mut credential = self.credential.write().await;
        // Another task may have refreshed while we waited for the lock
        if credential.needs_refresh(Utc::now()) {
            self.refresh(&mut credential).await?;
        }

        Ok(credential.access_token.clone())
    }

    #[instrument(skip(self, credential))]
    async fn refresh(&self, credential: &mut DropboxCredential) -> ProviderResult<()> {
        let (Some(refresh_token), Some(app_key)) =
            (credential.refresh_token.clone(), credential.app_key.clone())
        else {
            return Err(ProviderError::credential(
                "Refresh requires refresh_token and app_key",
            ));
        };

        let mut params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token),
            ("client_id", app_key),
        ];
        if let Some(secret) = &credential.app_secret {
            params.push(("client_secret", secret.clone()));
        }

        let response = self
            .http_client
            .execute_with_retry(self.http_client.inner().post(&self.token_url).form(&params))
            .await?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            ProviderError::invalid_response(format!("Failed to parse token response: {}", e))
        })?;

        credential.access_token = token.access_token;
        credential.expires_at = token
            .expires_in
            .map(|secs| (Utc::now() + Duration::seconds(secs)).timestamp_millis());

        info!("Refreshed Dropbox access token");
        Ok(())
    }
}
