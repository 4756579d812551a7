//! Sponsor index over a flat member snapshot
//!
//! The snapshot is treated as an arena: members are addressed by their
//! position in the slice, and every distinct identity gets a dense slot so
//! visited/claimed sets can be plain bit vectors.
//!
//! Downline lookup honours the dual-key convention found in real data: a
//! record's sponsor reference may hold the sponsor's identity or the
//! sponsor's referral code. Which of the two are honoured is decided by
//! [`SponsorMatching`].

use std::collections::HashMap;

use crate::member::{fold, Member};
use crate::SponsorMatching;

/// Arena + identity index + sponsor index over one member snapshot
#[derive(Debug, Clone)]
pub struct MemberIndex<'a> {
    members: &'a [Member],

    /// Identity slot for each record position.
    slot_of: Vec<usize>,

    /// Trimmed identity -> slot.
    slots: HashMap<&'a str, usize>,

    /// Number of distinct slots handed out.
    slot_count: usize,

    /// Folded sponsor reference -> record positions, in encounter order.
    sponsors: HashMap<String, Vec<usize>>,

    matching: SponsorMatching,
}

impl<'a> MemberIndex<'a> {
    /// Index a snapshot. O(n).
    pub fn new(members: &'a [Member], matching: SponsorMatching) -> Self {
        let mut slot_of = Vec::with_capacity(members.len());
        let mut slots: HashMap<&'a str, usize> = HashMap::with_capacity(members.len());
        let mut slot_count = 0;
        let mut sponsors: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, member) in members.iter().enumerate() {
            let id = member.id.trim();
            let slot = if id.is_empty() {
                // Records without identity never alias each other.
                slot_count += 1;
                slot_count - 1
            } else {
                *slots.entry(id).or_insert_with(|| {
                    slot_count += 1;
                    slot_count - 1
                })
            };
            slot_of.push(slot);

            if let Some(sponsor) = member.sponsor() {
                sponsors.entry(fold(sponsor)).or_default().push(position);
            }
        }

        Self {
            members,
            slot_of,
            slots,
            slot_count,
            sponsors,
            matching,
        }
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of distinct identities (size of a visited set).
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Matching policy this index was built with.
    pub fn matching(&self) -> SponsorMatching {
        self.matching
    }

    /// Record at `position`.
    pub fn member(&self, position: usize) -> &'a Member {
        &self.members[position]
    }

    /// Identity slot of the record at `position`.
    pub fn slot_of(&self, position: usize) -> usize {
        self.slot_of[position]
    }

    /// Identity slot for `id`, if some record carries it.
    pub fn slot_of_id(&self, id: &str) -> Option<usize> {
        self.slots.get(id.trim()).copied()
    }

    /// First record carrying identity `id`.
    pub fn find(&self, id: &str) -> Option<&'a Member> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        self.members.iter().find(|member| member.id.trim() == id)
    }

    /// Positions of the records `member` directly sponsors, in encounter order.
    ///
    /// A record sponsors `member`'s downline when its sponsor reference
    /// equals `member`'s identity exactly, or `member`'s referral code
    /// case-insensitively (subject to the matching policy). Records carrying
    /// `member`'s own identity are never part of its downline.
    pub fn downline(&self, member: &Member) -> Vec<usize> {
        let mut positions = Vec::new();

        if self.matching.matches_referral_code() {
            if let Some(found) = member
                .placement_key()
                .and_then(|key| self.sponsors.get(&key))
            {
                positions.extend_from_slice(found);
            }
        }

        if self.matching.matches_identity() {
            if let Some(found) = member
                .identity_key()
                .and_then(|key| self.sponsors.get(&key))
            {
                positions.extend(found.iter().copied().filter(|&position| {
                    self.members[position]
                        .sponsor()
                        .is_some_and(|sponsor| member.is_identified_by(sponsor))
                }));
            }
        }

        positions.sort_unstable();
        positions.dedup();
        positions.retain(|&position| !self.is_same_identity(member, position));
        positions
    }

    fn is_same_identity(&self, member: &Member, position: usize) -> bool {
        member.is_identified_by(&self.members[position].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Member> {
        vec![
            Member::new("1", "John").with_referral_code("J1"),
            Member::new("2", "Jane").with_referral_code("J2").with_sponsor("j1"),
            Member::new("3", "Mike").with_referral_code("J3").with_sponsor("1"),
            Member::new("4", "Lee").with_referral_code("J4").with_sponsor("J2"),
        ]
    }

    #[test]
    fn test_downline_dual_key_in_encounter_order() {
        let members = sample();
        let index = MemberIndex::new(&members, SponsorMatching::Dual);
        assert_eq!(index.downline(&members[0]), vec![1, 2]);
        assert_eq!(index.downline(&members[1]), vec![3]);
        assert!(index.downline(&members[3]).is_empty());
    }

    #[test]
    fn test_single_key_policies() {
        let members = sample();
        let by_code = MemberIndex::new(&members, SponsorMatching::ReferralCode);
        assert_eq!(by_code.downline(&members[0]), vec![1]);

        let by_id = MemberIndex::new(&members, SponsorMatching::Identity);
        assert_eq!(by_id.downline(&members[0]), vec![2]);
    }

    #[test]
    fn test_identity_match_is_case_sensitive() {
        let members = vec![
            Member::new("abc", "Root"),
            Member::new("x", "Child").with_sponsor("ABC"),
        ];
        let index = MemberIndex::new(&members, SponsorMatching::Identity);
        assert!(index.downline(&members[0]).is_empty());
    }

    #[test]
    fn test_code_equal_to_identity_is_not_duplicated() {
        let members = vec![
            Member::new("a1", "Root").with_referral_code("A1"),
            Member::new("b", "Child").with_sponsor("a1"),
        ];
        let index = MemberIndex::new(&members, SponsorMatching::Dual);
        assert_eq!(index.downline(&members[0]), vec![1]);
    }

    #[test]
    fn test_self_sponsorship_excluded() {
        let members = vec![Member::new("1", "Loop").with_referral_code("L").with_sponsor("L")];
        let index = MemberIndex::new(&members, SponsorMatching::Dual);
        assert!(index.downline(&members[0]).is_empty());
    }

    #[test]
    fn test_duplicate_identities_share_slot() {
        let members = vec![
            Member::new("1", "A"),
            Member::new("1", "A again"),
            Member::new("", "anon"),
            Member::new("", "anon 2"),
        ];
        let index = MemberIndex::new(&members, SponsorMatching::Dual);
        assert_eq!(index.slot_of(0), index.slot_of(1));
        assert_ne!(index.slot_of(2), index.slot_of(3));
        assert_eq!(index.slot_count(), 3);
        assert_eq!(index.slot_of_id(" 1 "), Some(0));
        assert!(index.find("").is_none());
    }

    #[test]
    fn test_empty_code_never_matches() {
        let members = vec![
            Member::new("1", "No code"),
            Member::new("2", "No sponsor"),
        ];
        let index = MemberIndex::new(&members, SponsorMatching::ReferralCode);
        assert!(index.downline(&members[0]).is_empty());
    }
}
