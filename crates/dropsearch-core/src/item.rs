//! Index host item and operation model
//!
//! These mirror the shapes the indexing host exchanges with a connector:
//! queued items with an opaque payload, the operations a connector hands back,
//! and the checkpoint token threaded between traversals.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// An item as stored in, and polled from, the indexing queue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item name within the data source
    pub name: String,
    /// Base64-encoded opaque payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(STANDARD.encode(payload));
        self
    }

    /// Build the item the host would hand back after a push
    pub fn from_push(name: impl Into<String>, push_item: &PushItem) -> Self {
        Self {
            name: name.into(),
            payload: push_item.payload.clone(),
            queue: push_item.queue.clone(),
            version: None,
        }
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>, DecodeError> {
        let encoded = self.payload.as_deref().ok_or(DecodeError::MissingPayload)?;
        Ok(STANDARD.decode(encoded)?)
    }
}

/// Request to place an item on the indexing queue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

impl PushItem {
    pub fn encode_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(STANDARD.encode(payload));
        self
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>, DecodeError> {
        let encoded = self.payload.as_deref().ok_or(DecodeError::MissingPayload)?;
        Ok(STANDARD.decode(encoded)?)
    }
}

/// Ordered batch of push requests keyed by item name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushItems {
    items: Vec<(String, PushItem)>,
}

impl PushItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_push_item(&mut self, name: impl Into<String>, item: PushItem) {
        self.items.push((name.into(), item));
    }

    pub fn items(&self) -> &[(String, PushItem)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Request to remove an item from the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub name: String,
}

/// Operation returned by a connector hook for the host to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ApiOperation {
    PushItems(PushItems),
    DeleteItem(DeleteItem),
}

impl ApiOperation {
    pub fn delete_item(name: impl Into<String>) -> Self {
        Self::DeleteItem(DeleteItem { name: name.into() })
    }
}

impl From<PushItems> for ApiOperation {
    fn from(items: PushItems) -> Self {
        Self::PushItems(items)
    }
}

/// Opaque resume token owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(Vec<u8>);

impl Checkpoint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Operations for one traversal step plus the checkpoint to resume from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckpointBatch {
    pub operations: Vec<ApiOperation>,
    pub checkpoint: Option<Checkpoint>,
    pub has_more_data: bool,
}

impl CheckpointBatch {
    pub fn new(operations: Vec<ApiOperation>) -> Self {
        Self {
            operations,
            checkpoint: None,
            has_more_data: false,
        }
    }

    pub fn with_checkpoint(mut self, checkpoint: Option<Checkpoint>) -> Self {
        self.checkpoint = checkpoint;
        self
    }
}
