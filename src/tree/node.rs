//! Tree node of the placement tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traversal::{PreOrder, Visit};
use crate::member::Member;

/// Placed member with its placed children
///
/// Ephemeral: built from a member snapshot, never mutated in place.
/// `children` holds at most the configured fan-out, first entry = left leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMember {
    /// Identity (unique within one tree).
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Referral code, empty when the member has none.
    #[serde(default)]
    pub referral_code: String,

    /// Registration timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    /// Activity flag.
    #[serde(default)]
    pub active: bool,

    /// Placed children in placement order. A missing key and an empty list
    /// both mean "no children".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NetworkMember>,

    /// Profile image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl NetworkMember {
    /// Childless node with just an identity and a name.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            referral_code: String::new(),
            joined_at: None,
            active: true,
            children: Vec::new(),
            avatar: None,
        }
    }

    /// Node for `member` with the given placed children.
    pub fn from_member(member: &Member, children: Vec<NetworkMember>) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            referral_code: member.referral_code().to_string(),
            joined_at: member.joined_at,
            active: member.active,
            children,
            avatar: member.avatar.clone(),
        }
    }

    /// No placed children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a navigator may drill into this node.
    #[inline]
    pub fn is_navigable(&self) -> bool {
        !self.is_leaf()
    }

    /// First placed child.
    pub fn left(&self) -> Option<&NetworkMember> {
        self.children.first()
    }

    /// Second placed child.
    pub fn right(&self) -> Option<&NetworkMember> {
        self.children.get(1)
    }

    /// Pre-order walk with depth and sibling position.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }

    /// Pre-order iterator over the nodes of this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkMember> + '_ {
        self.walk().map(|visit| visit.node)
    }

    /// Nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Nodes below this one.
    pub fn downline_count(&self) -> usize {
        self.node_count() - 1
    }

    /// Childless nodes in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|node| node.is_leaf()).count()
    }

    /// Edges on the longest root-to-leaf path (0 for a lone node).
    pub fn depth(&self) -> usize {
        self.walk().map(|visit| visit.depth).max().unwrap_or(0)
    }

    /// Sizes of the left and right legs (0 for an absent leg).
    pub fn leg_sizes(&self) -> (usize, usize) {
        let size = |leg: Option<&NetworkMember>| leg.map_or(0, NetworkMember::node_count);
        (size(self.left()), size(self.right()))
    }

    /// Structural fingerprint: pre-order identities and child counts.
    ///
    /// Equal trees hash equal; used to tell whether persisted navigation
    /// state still belongs to a rebuilt tree.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for Visit { node, .. } in self.walk() {
            hasher.update(&(node.id.len() as u64).to_le_bytes());
            hasher.update(node.id.as_bytes());
            hasher.update(&(node.children.len() as u64).to_le_bytes());
        }
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NetworkMember {
        let mut root = NetworkMember::named("1", "John");
        let mut jane = NetworkMember::named("2", "Jane");
        jane.children.push(NetworkMember::named("4", "Lee"));
        root.children = vec![jane, NetworkMember::named("3", "Mike")];
        root
    }

    #[test]
    fn test_metrics() {
        let tree = sample();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.downline_count(), 3);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leg_sizes(), (2, 1));
        assert_eq!(tree.left().map(|n| n.id.as_str()), Some("2"));
        assert_eq!(tree.right().map(|n| n.id.as_str()), Some("3"));
    }

    #[test]
    fn test_lone_node() {
        let node = NetworkMember::named("x", "X");
        assert!(node.is_leaf());
        assert!(!node.is_navigable());
        assert_eq!(node.depth(), 0);
        assert_eq!(node.leg_sizes(), (0, 0));
    }

    #[test]
    fn test_fingerprint_tracks_structure() {
        let tree = sample();
        assert_eq!(tree.fingerprint(), sample().fingerprint());

        let mut moved = sample();
        let lee = moved.children[0].children.remove(0);
        moved.children[1].children.push(lee);
        assert_ne!(tree.fingerprint(), moved.fingerprint());
    }

    #[test]
    fn test_missing_children_key_is_empty() {
        let json = r#"{"id": "9", "name": "Solo", "referralCode": "S9", "active": true}"#;
        let node: NetworkMember = serde_json::from_str(json).unwrap();
        assert!(node.is_leaf());

        let with_empty: NetworkMember =
            serde_json::from_str(r#"{"id": "9", "name": "Solo", "children": []}"#).unwrap();
        assert!(with_empty.is_leaf());
    }
}
