//! Referral placement tree
//!
//! The tree is derived, never stored: it is rebuilt from a flat member
//! snapshot on every request and never mutated in place.
//!
//! Placement is positional. The first child of a node is its left leg and
//! the second its right leg; no side is recorded on the node itself.

mod builder;
mod navigator;
mod node;
mod search;
mod traversal;

pub use builder::{build_tree, TreeBuilder};
pub use navigator::{Navigator, NavigatorState};
pub use node::NetworkMember;
pub use search::{find, find_all, find_by_id, find_with, path_to, SearchQuery};
pub use traversal::{PreOrder, Visit};

/// Label for a child position: `L`/`R` under binary placement, `#n` beyond.
pub fn leg_label(position: usize) -> String {
    match position {
        0 => "L".to_string(),
        1 => "R".to_string(),
        n => format!("#{}", n + 1),
    }
}
