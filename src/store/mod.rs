//! Member record stores
//!
//! The core only ever needs an immutable snapshot of all members plus the
//! occasional lookup by identity. Stores hand out owned snapshots so callers
//! can index and build against them without holding the store.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::InMemoryStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::member::Member;

/// Errors raised while fetching member records
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file could not be read
    #[error("failed to read member records from {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a member document
    #[error("failed to parse member records from {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Source of member snapshots
pub trait MemberStore {
    /// All member records, in store order.
    fn fetch_all(&self) -> Result<Vec<Member>, StoreError>;

    /// First member carrying identity `id`.
    fn fetch_by_id(&self, id: &str) -> Result<Option<Member>, StoreError> {
        let id = id.trim();
        Ok(self
            .fetch_all()?
            .into_iter()
            .find(|member| member.id.trim() == id))
    }
}
