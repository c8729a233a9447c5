//! Dropsearch Connector - Dropbox team members as enterprise search items
//!
//! The connector is built around two pieces:
//! - `DropboxRepository`: the hooks an indexing host calls (enumerate member
//!   IDs, resolve queued items, and the unsupported change/full-listing hooks)
//! - `ListingTraversal`: drives an initialized repository against an
//!   `IndexingService`, pushing every enumerated item and resolving it back

pub mod repository;
pub mod traversal;


pub use repository::DropboxRepository;
pub use traversal::{ListingTraversal, TraversalOptions, TraversalReport, TraversalStatus};

pub use dropsearch_core::*;
