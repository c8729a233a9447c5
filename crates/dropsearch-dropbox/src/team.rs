//! Dropbox Business team client
//!
//! Lists team members through the `team/members/list_v2` route and hands out
//! member-scoped clients for per-member access.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use dropsearch_core::{
    MemberClient, MemberStatus, ProviderError, ProviderResult, TeamClient, TeamMember,
};

use crate::credential::TokenSource;
use crate::http::{collect_all_pages, HttpClient, Page};
use crate::member::DropboxMemberClient;

/// Dropbox team-scoped client
pub struct DropboxTeamClient {
    http_client: HttpClient,
    tokens: Arc<TokenSource>,
    api_base: String,
    page_size: u32,
}

impl DropboxTeamClient {
    pub fn new(
        http_client: HttpClient,
        tokens: Arc<TokenSource>,
        api_base: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            http_client,
            tokens,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            page_size,
        }
    }

    /// Call a team RPC route with a JSON body
    async fn rpc<B, T>(&self, route: &str, body: &B) -> ProviderResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/2/{}", self.api_base, route);

        let response = self
            .http_client
            .execute_with_retry(self.http_client.inner().post(&url).bearer_auth(token).json(body))
            .await?;

        response.json().await.map_err(|e| {
            ProviderError::invalid_response(format!("Failed to parse {} response: {}", route, e))
        })
    }

    async fn list_members_page(&self, cursor: Option<String>) -> ProviderResult<Page<TeamMember>> {
        let result: MembersListResult = match cursor {
            None => {
                let request = MembersListArg {
                    limit: self.page_size,
                    include_removed: false,
                };
                self.rpc("team/members/list_v2", &request).await?
            }
            Some(cursor) => {
                debug!("Continuing member listing");
                self.rpc("team/members/list/continue_v2", &MembersListContinueArg { cursor })
                    .await?
            }
        };

        Ok(result.into_page())
    }
}

#[async_trait]
impl TeamClient for DropboxTeamClient {
    #[instrument(skip(self))]
    async fn list_members(&self) -> ProviderResult<Vec<TeamMember>> {
        info!("Listing Dropbox team members");

        let members = collect_all_pages(|cursor| self.list_members_page(cursor)).await?;

        info!("Fetched {} members from Dropbox", members.len());
        Ok(members)
    }

    fn as_member(&self, team_member_id: &str) -> Arc<dyn MemberClient> {
        Arc::new(DropboxMemberClient::new(team_member_id))
    }
}

// =============================================================================
// Dropbox API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct MembersListArg {
    limit: u32,
    include_removed: bool,
}

#[derive(Debug, Serialize)]
struct MembersListContinueArg {
    cursor: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MembersListResult {
    members: Vec<TeamMemberInfo>,
    #[serde(default)]
    cursor: Option<String>,
    has_more: bool,
}

impl MembersListResult {
    pub(crate) fn into_page(self) -> Page<TeamMember> {
        Page {
            items: self.members.into_iter().map(|m| m.profile.into()).collect(),
            cursor: self.cursor,
            has_more: self.has_more,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TeamMemberInfo {
    profile: TeamMemberProfile,
}

#[derive(Debug, Deserialize)]
struct TeamMemberProfile {
    team_member_id: String,
    #[serde(default)]
    account_id: Option<String>,
    email: String,
    status: Tagged,
    name: MemberName,
}

#[derive(Debug, Deserialize)]
struct Tagged {
    #[serde(rename = ".tag")]
    tag: String,
}

#[derive(Debug, Deserialize)]
struct MemberName {
    display_name: String,
}

impl From<TeamMemberProfile> for TeamMember {
    fn from(profile: TeamMemberProfile) -> Self {
        TeamMember {
            team_member_id: profile.team_member_id,
            account_id: profile.account_id,
            email: profile.email,
            display_name: profile.name.display_name,
            status: MemberStatus::from_tag(&profile.status.tag),
        }
    }
}
