use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{MemberStore, StoreError};
use crate::member::Member;

/// Accepted file shapes: a bare array, or an object holding the array.
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberDocument {
    List(Vec<Member>),
    Wrapped {
        #[serde(alias = "users")]
        members: Vec<Member>,
    },
}

impl MemberDocument {
    fn into_members(self) -> Vec<Member> {
        match self {
            MemberDocument::List(members) | MemberDocument::Wrapped { members } => members,
        }
    }
}

/// Store reading a JSON document on every fetch
///
/// Each call returns a fresh snapshot, so edits to the file are picked up by
/// the next build.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store over the file at `path`. Nothing is read until the first fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a member document from a string.
    pub fn parse(path: &Path, contents: &str) -> Result<Vec<Member>, StoreError> {
        serde_json::from_str::<MemberDocument>(contents)
            .map(MemberDocument::into_members)
            .map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl MemberStore for JsonFileStore {
    fn fetch_all(&self) -> Result<Vec<Member>, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let members = Self::parse(&self.path, &contents)?;
        debug!(path = %self.path.display(), members = members.len(), "loaded member snapshot");
        Ok(members)
    }
}
