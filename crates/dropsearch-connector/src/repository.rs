//! Repository implementation for indexing Dropbox team members

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use dropsearch_core::{
    ApiOperation, Checkpoint, CheckpointBatch, ConnectorError, Item, PushItem,
    PushItems, Reference, Repository, RepositoryContext, Result, TeamClient, TeamClientFactory,
};

/// State established by `init`, read-only afterwards
struct RepositoryState {
    team_client: Arc<dyn TeamClient>,
    /// Team member IDs to process; empty means every member
    team_member_ids: HashSet<String>,
}

impl RepositoryState {
    fn is_selected(&self, team_member_id: &str) -> bool {
        self.team_member_ids.is_empty() || self.team_member_ids.contains(team_member_id)
    }
}

/// Connector hooks for a Dropbox team
///
/// Every team member is pushed to the indexing queue as a [`Reference`]
/// payload keyed by display name. Queued items are later polled and handed
/// back through [`Repository::get_doc`].
pub struct DropboxRepository {
    factory: Arc<dyn TeamClientFactory>,
    state: Option<RepositoryState>,
}

impl DropboxRepository {
    pub fn new(factory: Arc<dyn TeamClientFactory>) -> Self {
        Self {
            factory,
            state: None,
        }
    }

    fn state(&self) -> Result<&RepositoryState> {
        self.state.as_ref().ok_or(ConnectorError::NotInitialized)
    }
}

#[async_trait]
impl Repository for DropboxRepository {
    /// Initializes the Dropbox team client and the member allow-list.
    #[instrument(skip(self, context))]
    async fn init(&mut self, context: &RepositoryContext) -> Result<()> {
        let config = &context.dropbox;
        config.validate()?;

        let team_member_ids = config.allow_list();
        let team_client = self
            .factory
            .team_client(config)
            .await
            .map_err(|e| ConnectorError::repository("Failed to create Dropbox team client", e))?;

        info!(
            "Dropbox repository initialized ({} team members selected)",
            if team_member_ids.is_empty() {
                "all".to_string()
            } else {
                team_member_ids.len().to_string()
            }
        );

        self.state = Some(RepositoryState {
            team_client,
            team_member_ids,
        });
        Ok(())
    }

    /// Pushes one item per selected team member.
    ///
    /// A provider failure aborts the whole call; no partial batch is returned.
    #[instrument(skip(self, checkpoint))]
    async fn get_ids(&self, checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch> {
        debug!("Entering get_ids");
        let state = self.state()?;

        let members = state
            .team_client
            .list_members()
            .await
            .map_err(|e| ConnectorError::repository("Failed to get user IDs", e))?;

        let total = members.len();
        let mut push_items = PushItems::new();

        for member in members {
            if !state.is_selected(&member.team_member_id) {
                continue;
            }

            let payload = Reference::member(member.team_member_id).encode_payload()?;
            push_items.add_push_item(member.display_name, PushItem::default().encode_payload(&payload));
        }

        info!("Pushing {} of {} team members", push_items.len(), total);

        Ok(CheckpointBatch::new(vec![push_items.into()]).with_checkpoint(checkpoint.cloned()))
    }

    async fn get_changes(&self, _checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch> {
        Err(ConnectorError::unsupported("get_changes"))
    }

    /// Resolves a polled item.
    ///
    /// Items whose payload cannot be decoded, or decodes to an invalid
    /// reference, are deleted from the index.
    #[instrument(skip(self, item), fields(item = %item.name))]
    async fn get_doc(&self, item: &Item) -> Result<ApiOperation> {
        let state = self.state()?;

        let reference = match item
            .decode_payload()
            .and_then(|payload| Reference::decode_payload(&payload))
        {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Invalid Dropbox payload on item {}: {}", item.name, e);
                return Ok(ApiOperation::delete_item(&item.name));
            }
        };

        if !reference.is_valid() {
            warn!("Invalid Dropbox reference {} on item {}", reference, item.name);
            return Ok(ApiOperation::delete_item(&item.name));
        }

        // Member is the only kind that passes validation
        let member_client = state.team_client.as_member(reference.id());
        debug!("Resolving member {}", member_client.team_member_id());

        // Member documents have no defined content yet
        Err(ConnectorError::unsupported("get_doc(member)"))
    }

    async fn get_all_docs(&self, _checkpoint: Option<&Checkpoint>) -> Result<CheckpointBatch> {
        Err(ConnectorError::unsupported("get_all_docs"))
    }

    async fn exists(&self, _item: &Item) -> Result<bool> {
        Err(ConnectorError::unsupported("exists"))
    }

    async fn close(&mut self) {
        debug!("Closing Dropbox repository");
    }
}
