//! Network statistics over the flat member snapshot
//!
//! Counts come from the sponsor relation itself, not from the placement
//! tree: a member with five referrals has five direct referrals even though
//! only two of them are placed under it.
//!
//! Team size walks the downline with a visited set over identity slots, so
//! sponsor cycles in the data cannot make it loop. Every identity counts at
//! most once and the member itself never counts.

use bitvec::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::index::MemberIndex;
use crate::member::Member;
use crate::SponsorMatching;

/// Direct referrals of `member` under dual-key matching.
pub fn direct_referral_count(member: &Member, members: &[Member]) -> usize {
    StatsCalculator::new(members, SponsorMatching::Dual).direct_referral_count(member)
}

/// Recursive downline size of `member` (excluding itself) under dual-key matching.
pub fn team_size(member: &Member, members: &[Member]) -> usize {
    StatsCalculator::new(members, SponsorMatching::Dual).team_size(member)
}

/// Summary shown on a member's dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// Members sponsored directly.
    pub direct_referrals: usize,

    /// Whole downline, each identity once.
    pub team_size: usize,

    /// Active members of the downline.
    pub active_team: usize,
}

/// Statistics calculator over one indexed snapshot
#[derive(Debug, Clone)]
pub struct StatsCalculator<'a> {
    index: MemberIndex<'a>,
}

impl<'a> StatsCalculator<'a> {
    /// Index `members` under `matching`.
    pub fn new(members: &'a [Member], matching: SponsorMatching) -> Self {
        Self {
            index: MemberIndex::new(members, matching),
        }
    }

    /// Reuse an existing index.
    pub fn from_index(index: MemberIndex<'a>) -> Self {
        Self { index }
    }

    /// Underlying index.
    pub fn index(&self) -> &MemberIndex<'a> {
        &self.index
    }

    /// Members whose sponsor reference names `member`.
    pub fn direct_referral_count(&self, member: &Member) -> usize {
        self.index.downline(member).len()
    }

    /// Size of `member`'s whole downline.
    pub fn team_size(&self, member: &Member) -> usize {
        let mut size = 0;
        self.walk_team(member, |_| size += 1);
        size
    }

    /// Direct referrals, team size and active team in one go.
    pub fn stats(&self, member: &Member) -> NetworkStats {
        let mut stats = NetworkStats {
            direct_referrals: self.direct_referral_count(member),
            ..NetworkStats::default()
        };
        self.walk_team(member, |downline_member| {
            stats.team_size += 1;
            if downline_member.active {
                stats.active_team += 1;
            }
        });
        stats
    }

    /// Visit every downline member of `member` exactly once.
    fn walk_team<F>(&self, member: &Member, mut visit: F)
    where
        F: FnMut(&'a Member),
    {
        let mut visited = bitvec![0; self.index.slot_count()];
        if let Some(slot) = self.index.slot_of_id(&member.id) {
            visited.set(slot, true);
        }

        let mut pending: Vec<&Member> = vec![member];
        while let Some(current) = pending.pop() {
            for position in self.index.downline(current) {
                let slot = self.index.slot_of(position);
                if visited[slot] {
                    debug!(
                        sponsor = %current.id,
                        member = %self.index.member(position).id,
                        "already counted; sponsor cycle or duplicate identity"
                    );
                    continue;
                }
                visited.set(slot, true);
                let downline_member = self.index.member(position);
                visit(downline_member);
                pending.push(downline_member);
            }
        }
    }
}
