//! Dropsearch Core - Domain types and traits for the Dropbox search connector

pub mod config;
pub mod error;
pub mod item;
pub mod reference;
pub mod team;
pub mod traits;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::*;
pub use item::*;
pub use reference::*;
pub use team::*;
pub use traits::*;
