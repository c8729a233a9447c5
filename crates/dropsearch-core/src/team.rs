//! Team member model shared by provider clients and the connector

use serde::{Deserialize, Serialize};

/// Membership status of a team account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Invited,
    Suspended,
    Removed,
    Other,
}

impl MemberStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "active" => Self::Active,
            "invited" => Self::Invited,
            "suspended" => Self::Suspended,
            "removed" => Self::Removed,
            _ => Self::Other,
        }
    }
}

/// A member account of the provider team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Stable team member ID (e.g. `dbmid:...`)
    pub team_member_id: String,
    /// Provider-wide account ID, absent for invited members
    pub account_id: Option<String>,
    pub email: String,
    pub display_name: String,
    pub status: MemberStatus,
}
