//! Core traits for the dropsearch connector

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::{DropboxConfig, RepositoryContext},
    error::{ProviderResult, Result},
    item::{ApiOperation, Checkpoint, CheckpointBatch, Item, PushItem},
    team::TeamMember,
};

// =============================================================================
// Provider Traits
// =============================================================================

/// Team-scoped access to the storage provider
#[async_trait]
pub trait TeamClient: Send + Sync {
    /// List every member of the team, following pagination to the end
    async fn list_members(&self) -> ProviderResult<Vec<TeamMember>>;

    /// Client acting on behalf of a single team member
    fn as_member(&self, team_member_id: &str) -> Arc<dyn MemberClient>;
}

/// Member-scoped access to the storage provider
pub trait MemberClient: Send + Sync {
    fn team_member_id(&self) -> &str;
}

/// Builds authenticated team clients from connector configuration
#[async_trait]
pub trait TeamClientFactory: Send + Sync {
    async fn team_client(&self, config: &DropboxConfig) -> ProviderResult<Arc<dyn TeamClient>>;
}

// =============================================================================
// Index Host Traits
// =============================================================================

/// Hooks an indexing host invokes on a connector
///
/// Hooks the connector does not implement return
/// [`ConnectorError::Unsupported`](crate::ConnectorError::Unsupported).
#[async_trait]
pub trait Repository: Send + Sync {
    /// Connect to the provider and read configuration
    async fn init(&mut self, context: &RepositoryContext) -> Result<()>;

    /// Enumerate the IDs of every item to push to the indexing queue
    async fn get_ids(&self, checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch>;

    /// Enumerate items changed since the checkpoint
    async fn get_changes(&self, checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch>;

    /// Resolve a polled item into the operation to apply to the index
    async fn get_doc(&self, item: &Item) -> Result<ApiOperation>;

    /// Enumerate every document with its content
    async fn get_all_docs(&self, checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch>;

    /// Whether the item still exists in the provider
    async fn exists(&self, item: &Item) -> Result<bool>;

    /// Release provider resources
    async fn close(&mut self);
}

/// Operations the indexing host exposes to a traversal
#[async_trait]
pub trait IndexingService: Send + Sync {
    async fn push_item(&self, name: &str, item: &PushItem) -> Result<()>;

    async fn delete_item(&self, name: &str) -> Result<()>;
}
