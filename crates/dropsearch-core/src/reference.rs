//! Item references carried as opaque payloads through the indexing queue
//!
//! A [`Reference`] names the provider entity an indexed item stands for. It is
//! serialized into the payload of every pushed item and decoded again when
//! the host hands the item back for resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConnectorError, DecodeError, Result};

/// Kind of provider object a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    /// A team member account
    Member,
    /// A tag this connector does not know; kept verbatim for logging
    Unrecognized(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Member => "member",
            Self::Unrecognized(tag) => tag,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Default for ObjectKind {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for ObjectKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "member" => Self::Member,
            _ => Self::Unrecognized(tag),
        }
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Member => "member".to_string(),
            ObjectKind::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged (kind, identifier) pair embedded in a queued index item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "objectType", default)]
    object_type: ObjectKind,
    #[serde(default)]
    id: String,
}

impl Reference {
    /// An `Unrecognized` tag naming a known kind is normalized to that kind
    pub fn new(object_type: ObjectKind, id: impl Into<String>) -> Self {
        Self {
            object_type: ObjectKind::from(String::from(object_type)),
            id: id.into(),
        }
    }

    /// Reference to a team member by its stable team member ID
    pub fn member(team_member_id: impl Into<String>) -> Self {
        Self::new(ObjectKind::Member, team_member_id)
    }

    pub fn object_type(&self) -> &ObjectKind {
        &self.object_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A reference is valid iff its kind is recognized and its ID is non-empty
    pub fn is_valid(&self) -> bool {
        self.object_type.is_recognized() && !self.id.is_empty()
    }

    /// Serialize into the opaque payload attached to a pushed item
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            ConnectorError::internal_error(format!("Failed to encode reference {}: {}", self, e))
        })
    }

    /// Parse a payload produced by [`Reference::encode_payload`]
    ///
    /// Unknown kind tags and empty or absent IDs still decode; callers check
    /// [`Reference::is_valid`]. Anything that is not a reference object fails.
    pub fn decode_payload(payload: &[u8]) -> std::result::Result<Self, DecodeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.id)
    }
}
