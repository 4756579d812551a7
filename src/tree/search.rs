//! Member search within a (sub)tree
//!
//! Depth-first pre-order, first match wins. A node matches when its name or
//! referral code contains the query, ignoring case.

use std::str::FromStr;

use super::NetworkMember;
use crate::member::fold;
use crate::NetworkError;

/// Validated, case-folded search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    folded: String,
}

impl SearchQuery {
    /// Fold `raw`; blank queries are rejected with [`NetworkError::EmptyQuery`].
    pub fn new(raw: &str) -> Result<Self, NetworkError> {
        let folded = fold(raw);
        if folded.is_empty() {
            return Err(NetworkError::EmptyQuery);
        }
        Ok(Self { folded })
    }

    /// Folded query text.
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive substring match on name or referral code.
    pub fn matches(&self, node: &NetworkMember) -> bool {
        node.name.to_lowercase().contains(&self.folded)
            || node.referral_code.to_lowercase().contains(&self.folded)
    }
}

impl FromStr for SearchQuery {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// First node under `root` (inclusive) matching `query`, in pre-order.
///
/// `Ok(None)` means no member matched. The only error is an empty query,
/// reported before the tree is touched.
pub fn find<'a>(
    root: &'a NetworkMember,
    query: &str,
) -> Result<Option<&'a NetworkMember>, NetworkError> {
    let query = SearchQuery::new(query)?;
    Ok(find_with(root, &query))
}

/// [`find`] with an already validated query.
pub fn find_with<'a>(root: &'a NetworkMember, query: &SearchQuery) -> Option<&'a NetworkMember> {
    root.iter().find(|node| query.matches(node))
}

/// Every matching node under `root`, in pre-order.
pub fn find_all<'a>(
    root: &'a NetworkMember,
    query: &str,
) -> Result<Vec<&'a NetworkMember>, NetworkError> {
    let query = SearchQuery::new(query)?;
    Ok(root.iter().filter(|node| query.matches(node)).collect())
}

/// Node with identity `id` under `root` (exact match).
pub fn find_by_id<'a>(root: &'a NetworkMember, id: &str) -> Option<&'a NetworkMember> {
    let id = id.trim();
    root.iter().find(|node| node.id == id)
}

/// Chain of nodes from `root` down to the node with identity `id`.
pub fn path_to<'a>(root: &'a NetworkMember, id: &str) -> Option<Vec<&'a NetworkMember>> {
    let id = id.trim();
    let mut path: Vec<&NetworkMember> = Vec::new();
    for visit in root.walk() {
        // Pre-order: everything deeper than this visit belongs to a finished subtree.
        path.truncate(visit.depth);
        path.push(visit.node);
        if visit.node.id == id {
            return Some(path);
        }
    }
    None
}
