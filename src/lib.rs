//! # Referral network trees
//!
//! Builds the sponsor/downline placement tree of a referral network from a
//! flat list of member records, and answers the questions asked of it.
//!
//! ## Components
//!
//! 1. **Member records**: flat, read-only input fetched from a [`MemberStore`]
//! 2. **Tree builder**: bounded fan-out placement tree rooted at one member
//! 3. **Navigator**: drill-down cursor with a LIFO history stack
//! 4. **Search**: first pre-order match on name or referral code
//! 5. **Statistics**: direct referrals and cycle-guarded team size
//!
//! Every operation except the [`Navigator`] is a pure function of an
//! immutable member snapshot.
//!
//! ## Usage Example
//!
//! ```
//! use referral_network::{build_tree, find, team_size, Member};
//!
//! let members = vec![
//!     Member::new("1", "John").with_referral_code("J1"),
//!     Member::new("2", "Jane").with_referral_code("J2").with_sponsor("J1"),
//!     Member::new("3", "Mike").with_referral_code("J3").with_sponsor("1"),
//! ];
//!
//! let tree = build_tree(&members[0], &members);
//! assert_eq!(tree.children.len(), 2);
//!
//! let jane = find(&tree, "JANE").unwrap().unwrap();
//! assert_eq!(jane.id, "2");
//! assert_eq!(team_size(&members[0], &members), 2);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod index; // Sponsor index over the flat member arena
pub mod member; // Member records and key folding
pub mod stats; // Direct referral and team size statistics
pub mod store; // Member record stores
pub mod tree; // Placement tree, navigation and search

// Re-exports for convenience
pub use index::MemberIndex;
pub use member::Member;
pub use stats::{direct_referral_count, team_size, NetworkStats, StatsCalculator};
pub use store::{InMemoryStore, JsonFileStore, MemberStore, StoreError};
pub use tree::{
    build_tree, find, find_all, find_by_id, path_to, Navigator, NavigatorState, NetworkMember,
    SearchQuery, TreeBuilder,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of children placed under one member in the observed policy.
pub const MAX_CHILDREN: usize = 2;

/// Which field of a sponsor a downline member's sponsor reference is matched against.
///
/// Records in the wild use both conventions, so [`SponsorMatching::Dual`] is the default.
/// The single-key policies exist for owners who have settled which one is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SponsorMatching {
    /// Sponsor reference equals the sponsor's identity or (case-folded) referral code.
    #[default]
    Dual,
    /// Sponsor reference equals the sponsor's referral code (case-folded).
    ReferralCode,
    /// Sponsor reference equals the sponsor's identity.
    Identity,
}

impl SponsorMatching {
    /// Whether referral-code references are honoured.
    pub fn matches_referral_code(self) -> bool {
        matches!(self, SponsorMatching::Dual | SponsorMatching::ReferralCode)
    }

    /// Whether identity references are honoured.
    pub fn matches_identity(self) -> bool {
        matches!(self, SponsorMatching::Dual | SponsorMatching::Identity)
    }
}

impl fmt::Display for SponsorMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SponsorMatching::Dual => "dual",
            SponsorMatching::ReferralCode => "referral-code",
            SponsorMatching::Identity => "identity",
        };
        f.write_str(name)
    }
}

impl FromStr for SponsorMatching {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dual" => Ok(SponsorMatching::Dual),
            "referral-code" | "referral_code" | "code" => Ok(SponsorMatching::ReferralCode),
            "identity" | "id" => Ok(SponsorMatching::Identity),
            other => Err(NetworkError::InvalidConfiguration(format!(
                "unknown sponsor matching policy '{other}'"
            ))),
        }
    }
}

/// Configuration parameters for tree construction and statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Children placed under one member (binary placement: 2)
    pub max_children: usize,

    /// Sponsor reference matching policy
    pub sponsor_matching: SponsorMatching,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_children: MAX_CHILDREN,
            sponsor_matching: SponsorMatching::Dual,
        }
    }
}

impl NetworkConfig {
    /// Binary placement with the given matching policy.
    pub fn with_matching(sponsor_matching: SponsorMatching) -> Self {
        Self {
            sponsor_matching,
            ..Self::default()
        }
    }

    /// Reject configurations that cannot place anyone.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.max_children == 0 {
            return Err(NetworkError::InvalidConfiguration(
                "max_children must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors surfaced by the referral network core
///
/// Malformed member data is never an error; it is absorbed by defaulting.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Search query was empty after trimming whitespace
    #[error("search query is empty")]
    EmptyQuery,

    /// Configuration rejected by [`NetworkConfig::validate`]
    #[error("invalid network configuration: {0}")]
    InvalidConfiguration(String),

    /// Member record store failed to produce a snapshot
    #[error(transparent)]
    Store(#[from] StoreError),
}
