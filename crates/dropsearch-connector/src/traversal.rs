//! Listing traversal - drives repository hooks against an indexing service
//!
//! A traversal:
//! - enumerates item IDs through `get_ids` and pushes each one
//! - optionally resolves every pushed item back through `get_doc`
//! - applies the resulting delete instructions
//! - reports what happened, item by item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use dropsearch_core::{
    ApiOperation, Checkpoint, IndexingService, Item, PushItem, Repository, Result,
};

/// Traversal behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalOptions {
    /// Resolve each pushed item through `get_doc` right after pushing it
    pub resolve_pushed_items: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            resolve_pushed_items: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalStatus {
    Success,
    PartialSuccess,
    Failed,
}

/// A per-item failure that did not abort the traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalError {
    pub item_name: Option<String>,
    pub error_type: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of a traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalReport {
    pub status: TraversalStatus,
    pub items_pushed: u32,
    pub items_deleted: u32,
    /// Items whose resolution the repository does not support
    pub items_unresolved: u32,
    pub errors: Vec<TraversalError>,
    pub checkpoint: Option<Checkpoint>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TraversalReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            status: TraversalStatus::Success,
            items_pushed: 0,
            items_deleted: 0,
            items_unresolved: 0,
            errors: vec![],
            checkpoint: None,
            started_at,
            completed_at: started_at,
            duration_ms: 0,
        }
    }

    fn record_error(&mut self, item_name: &str, error_type: &str, message: String) {
        self.errors.push(TraversalError {
            item_name: Some(item_name.to_string()),
            error_type: error_type.to_string(),
            message,
            timestamp: Utc::now(),
        });
    }
}

/// Runs one listing traversal of a repository
pub struct ListingTraversal<'a, R, I>
where
    R: Repository + ?Sized,
    I: IndexingService + ?Sized,
{
    repository: &'a R,
    indexing: &'a I,
    options: TraversalOptions,
}

impl<'a, R, I> ListingTraversal<'a, R, I>
where
    R: Repository + ?Sized,
    I: IndexingService + ?Sized,
{
    pub fn new(repository: &'a R, indexing: &'a I, options: TraversalOptions) -> Self {
        Self {
            repository,
            indexing,
            options,
        }
    }

    /// Run the traversal from `checkpoint`
    ///
    /// Fails only when enumeration itself fails; per-item failures are
    /// collected in the report.
    #[instrument(skip(self, checkpoint))]
    pub async fn run(&self, checkpoint: Option<&Checkpoint>) -> Result<TraversalReport> {
        let mut report = TraversalReport::new(Utc::now());
        info!("Starting listing traversal");

        let batch = self.repository.get_ids(checkpoint).await?;

        for operation in &batch.operations {
            match operation {
                ApiOperation::PushItems(push_items) => {
                    for (name, push_item) in push_items.items() {
                        self.push(name, push_item, &mut report).await;
                    }
                }
                ApiOperation::DeleteItem(delete) => {
                    self.delete(&delete.name, &mut report).await;
                }
            }
        }

        report.checkpoint = batch.checkpoint;
        report.completed_at = Utc::now();
        report.duration_ms = elapsed_ms(report.started_at, report.completed_at);

        if !report.errors.is_empty() {
            report.status = if report.items_pushed + report.items_deleted == 0 {
                TraversalStatus::Failed
            } else {
                TraversalStatus::PartialSuccess
            };
        }

        if report.items_unresolved > 0 {
            warn!(
                "{} items could not be resolved: member document resolution is not supported",
                report.items_unresolved
            );
        }

        info!(
            "Traversal completed: {} pushed, {} deleted, {} unresolved, {} errors",
            report.items_pushed,
            report.items_deleted,
            report.items_unresolved,
            report.errors.len()
        );

        Ok(report)
    }

    async fn push(&self, name: &str, push_item: &PushItem, report: &mut TraversalReport) {
        if let Err(e) = self.indexing.push_item(name, push_item).await {
            report.record_error(name, "push_failed", e.to_string());
            return;
        }
        report.items_pushed += 1;

        if self.options.resolve_pushed_items {
            self.resolve(&Item::from_push(name, push_item), report).await;
        }
    }

    async fn delete(&self, name: &str, report: &mut TraversalReport) {
        match self.indexing.delete_item(name).await {
            Ok(()) => report.items_deleted += 1,
            Err(e) => report.record_error(name, "delete_failed", e.to_string()),
        }
    }

    async fn resolve(&self, item: &Item, report: &mut TraversalReport) {
        match self.repository.get_doc(item).await {
            Ok(ApiOperation::DeleteItem(delete)) => {
                self.delete(&delete.name, report).await;
            }
            Ok(ApiOperation::PushItems(push_items)) => {
                // Re-pushed items are not resolved again
                for (name, push_item) in push_items.items() {
                    match self.indexing.push_item(name, push_item).await {
                        Ok(()) => report.items_pushed += 1,
                        Err(e) => report.record_error(name, "push_failed", e.to_string()),
                    }
                }
            }
            Err(e) if e.is_unsupported() => {
                debug!("Item {} left unresolved: {}", item.name, e);
                report.items_unresolved += 1;
            }
            Err(e) => {
                warn!("Failed to resolve item {}: {}", item.name, e);
                report.record_error(&item.name, "resolve_failed", e.to_string());
            }
        }
    }
}

/// Milliseconds between two wall-clock readings, zero if the clock went backwards
pub(crate) fn elapsed_ms(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> u64 {
    u64::try_from((completed_at - started_at).num_milliseconds()).unwrap_or(0)
}
