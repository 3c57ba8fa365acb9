//! Library entry for ui-core-sync exposing the sync pipeline and bootstrap logic for integration tests.

pub mod bootstrap;
pub mod config;
pub mod devserver;
pub mod error;
pub mod install;
pub mod manifest;
pub mod pipeline;
pub mod revision;

pub use error::{Result, SyncError};
