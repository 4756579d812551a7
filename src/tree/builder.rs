//! Placement tree construction
//!
//! Children of a member are the first `max_children` unclaimed records of
//! its downline, in snapshot order. Each identity is claimed at most once
//! (the root is claimed up front), which keeps the tree acyclic and free of
//! duplicates even when sponsor data loops back on itself.

use bitvec::prelude::*;
use tracing::debug;

use super::NetworkMember;
use crate::index::MemberIndex;
use crate::member::Member;
use crate::{NetworkConfig, NetworkError};

/// Build the binary placement tree under `root` with the default configuration.
///
/// `root` is expected to be part of `members`; if it is not, the result is
/// still rooted at `root` with whatever downline the snapshot holds for it.
pub fn build_tree(root: &Member, members: &[Member]) -> NetworkMember {
    TreeBuilder::default().build(root, members)
}

/// Tree builder with a validated configuration
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    config: NetworkConfig,
}

/// Expansion record for one placed member.
struct Frame<'a> {
    member: &'a Member,
    children: Vec<usize>,
}

impl TreeBuilder {
    /// Create a builder, rejecting invalid configurations.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Index `members` and build the tree under `root`.
    pub fn build(&self, root: &Member, members: &[Member]) -> NetworkMember {
        let index = MemberIndex::new(members, self.config.sponsor_matching);
        self.build_indexed(root, &index)
    }

    /// Build the tree under `root` from an existing index.
    pub fn build_indexed<'a>(&self, root: &'a Member, index: &MemberIndex<'a>) -> NetworkMember {
        let max_children = self.config.max_children;
        let mut claimed = bitvec![0; index.slot_count()];
        if let Some(slot) = index.slot_of_id(&root.id) {
            claimed.set(slot, true);
        }

        // Phase 1: pre-order expansion with an explicit stack. A node claims
        // all of its children before any of them is expanded, exactly as a
        // recursive build would.
        let mut frames = vec![Frame {
            member: root,
            children: Vec::new(),
        }];
        let mut stack = vec![0usize];

        while let Some(frame_idx) = stack.pop() {
            let member = frames[frame_idx].member;
            let mut children = Vec::with_capacity(max_children);

            for position in index.downline(member) {
                if children.len() == max_children {
                    break;
                }
                let slot = index.slot_of(position);
                if claimed[slot] {
                    debug!(
                        sponsor = %member.id,
                        member = %index.member(position).id,
                        "skipping already placed member"
                    );
                    continue;
                }
                claimed.set(slot, true);
                frames.push(Frame {
                    member: index.member(position),
                    children: Vec::new(),
                });
                children.push(frames.len() - 1);
            }

            stack.extend(children.iter().rev().copied());
            frames[frame_idx].children = children;
        }

        // Phase 2: children always sit after their parent in `frames`, so a
        // reverse sweep assembles every subtree before its parent needs it.
        let placed = frames.len();
        let mut built: Vec<Option<NetworkMember>> = std::iter::repeat_with(|| None)
            .take(placed)
            .collect();
        for (frame_idx, frame) in frames.iter().enumerate().rev() {
            let children = frame
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[frame_idx] = Some(NetworkMember::from_member(frame.member, children));
        }

        debug!(
            root = %root.id,
            members = index.len(),
            placed,
            "built placement tree"
        );

        built
            .swap_remove(0)
            .unwrap_or_else(|| NetworkMember::from_member(root, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SponsorMatching;

    fn ids(nodes: &[NetworkMember]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn test_third_referral_is_not_placed() {
        let members = vec![
            Member::new("1", "John").with_referral_code("J1"),
            Member::new("2", "Jane").with_referral_code("J2").with_sponsor("J1"),
            Member::new("3", "Mike").with_referral_code("J3").with_sponsor("1"),
            Member::new("4", "Third").with_referral_code("J4").with_sponsor("1"),
        ];
        let tree = build_tree(&members[0], &members);
        assert_eq!(ids(&tree.children), vec!["2", "3"]);
        assert!(tree.children.iter().all(NetworkMember::is_leaf));
    }

    #[test]
    fn test_wider_fan_out() {
        let members = vec![
            Member::new("1", "Root").with_referral_code("R"),
            Member::new("2", "A").with_sponsor("R"),
            Member::new("3", "B").with_sponsor("R"),
            Member::new("4", "C").with_sponsor("R"),
        ];
        let builder = TreeBuilder::new(NetworkConfig {
            max_children: 3,
            ..NetworkConfig::default()
        })
        .unwrap();
        let tree = builder.build(&members[0], &members);
        assert_eq!(ids(&tree.children), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = NetworkConfig {
            max_children: 0,
            ..NetworkConfig::default()
        };
        assert!(TreeBuilder::new(config).is_err());
    }

    #[test]
    fn test_cycle_through_root_terminates() {
        let members = vec![
            Member::new("1", "A").with_sponsor("2"),
            Member::new("2", "B").with_sponsor("1"),
        ];
        let tree = build_tree(&members[0], &members);
        assert_eq!(tree.node_count(), 2);
        assert_eq!(ids(&tree.children), vec!["2"]);
        assert!(tree.children[0].is_leaf());
    }

    #[test]
    fn test_colliding_codes_claimed_once() {
        // "x" is referenced by both the root's code and Kid's identity.
        let members = vec![
            Member::new("r", "Root").with_referral_code("X"),
            Member::new("x", "Kid").with_sponsor("r"),
            Member::new("y", "Grandkid").with_sponsor("x"),
        ];
        let tree = build_tree(&members[0], &members);
        // Root: code "x" claims Grandkid, identity "r" claims Kid.
        assert_eq!(ids(&tree.children), vec!["x", "y"]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_root_missing_from_snapshot() {
        let members = vec![Member::new("2", "Orphan").with_sponsor("ghost")];
        let ghost = Member::new("ghost", "Ghost");
        let tree = build_tree(&ghost, &members);
        assert_eq!(ids(&tree.children), vec!["2"]);

        let nobody = Member::new("nobody", "Nobody");
        assert!(build_tree(&nobody, &members).is_leaf());
    }

    #[test]
    fn test_referral_code_only_policy() {
        let members = vec![
            Member::new("1", "John").with_referral_code("J1"),
            Member::new("2", "Jane").with_sponsor("j1"),
            Member::new("3", "Mike").with_sponsor("1"),
        ];
        let builder =
            TreeBuilder::new(NetworkConfig::with_matching(SponsorMatching::ReferralCode)).unwrap();
        let tree = builder.build(&members[0], &members);
        assert_eq!(ids(&tree.children), vec!["2"]);
    }

    #[test]
    fn test_long_chain_builds_without_recursion() {
        let mut members = vec![Member::new("0", "m0")];
        for i in 1..1_500 {
            members.push(Member::new(i.to_string(), format!("m{i}")).with_sponsor((i - 1).to_string()));
        }
        let tree = build_tree(&members[0], &members);
        assert_eq!(tree.node_count(), 1_500);
        assert_eq!(tree.depth(), 1_499);
    }
}
