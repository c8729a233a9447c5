//! Dropsearch Dropbox - Dropbox Business team API client
//!
//! This crate provides:
//! - Credential file loading with access token refresh
//! - An HTTP client with retry and Dropbox error decoding
//! - Paginated team member listing via `team/members/list_v2`
//! - Member-scoped clients using the `Dropbox-API-Select-User` header
//!
//! [`DropboxClientFactory`] ties these together behind the
//! `TeamClientFactory` trait from `dropsearch-core`.

pub mod credential;
pub mod factory;
pub mod http;
pub mod member;
pub mod team;


pub use credential::{DropboxCredential, TokenSource};
pub use factory::DropboxClientFactory;
pub use http::HttpClient;
pub use member::DropboxMemberClient;
pub use team::DropboxTeamClient;
