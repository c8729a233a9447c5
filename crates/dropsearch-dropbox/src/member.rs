//! Member-scoped Dropbox client

use dropsearch_core::MemberClient;

/// Dropbox client acting as a single team member
///
/// Member-scoped routes are called with the team token plus the
/// `Dropbox-API-Select-User` header set to [`MemberClient::team_member_id`].
#[derive(Debug, Clone)]
pub struct DropboxMemberClient {
    team_member_id: String,
}

impl DropboxMemberClient {
    pub(crate) fn new(team_member_id: impl Into<String>) -> Self {
        Self {
            team_member_id: team_member_id.into(),
        }
    }
}

impl MemberClient for DropboxMemberClient {
    fn team_member_id(&self) -> &str {
        &self.team_member_id
    }
}
