//! Drill-down cursor over a built tree
//!
//! Holds borrowed nodes only: the tree outlives the navigator and is never
//! copied. History is a strict LIFO stack of previously shown roots.
//!
//! A navigator belongs to one session. Persist it between requests with
//! [`Navigator::state`] and [`Navigator::restore`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::search::find_by_id;
use super::NetworkMember;

/// Stateful cursor: current root plus the roots it was reached through
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    root: &'a NetworkMember,
    current: &'a NetworkMember,
    history: Vec<&'a NetworkMember>,
}

/// Serialisable navigator position
///
/// Identities rather than nodes, plus the fingerprint of the tree they were
/// taken from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorState {
    /// Hex fingerprint of the tree the state was taken on.
    pub fingerprint: String,

    /// Identities of the history stack, oldest first.
    pub history: Vec<String>,

    /// Identity of the current root.
    pub current: String,
}

impl<'a> Navigator<'a> {
    /// Cursor at `root` with empty history.
    pub fn new(root: &'a NetworkMember) -> Self {
        Self {
            root,
            current: root,
            history: Vec::new(),
        }
    }

    /// Node currently shown as root.
    pub fn current(&self) -> &'a NetworkMember {
        self.current
    }

    /// Root of the full tree.
    pub fn root(&self) -> &'a NetworkMember {
        self.root
    }

    /// Previously shown roots, oldest first.
    pub fn history(&self) -> &[&'a NetworkMember] {
        &self.history
    }

    /// Number of `ascend` steps available.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Whether `ascend` would move.
    pub fn can_ascend(&self) -> bool {
        !self.history.is_empty()
    }

    /// History followed by the current root.
    pub fn breadcrumbs(&self) -> impl Iterator<Item = &'a NetworkMember> + '_ {
        self.history.iter().copied().chain(std::iter::once(self.current))
    }

    /// Show `target` as root, remembering the current one.
    ///
    /// Childless nodes are not navigable: the call is a no-op and returns `false`.
    pub fn descend(&mut self, target: &'a NetworkMember) -> bool {
        if !target.is_navigable() {
            trace!(target = %target.id, "descend rejected: leaf");
            return false;
        }
        trace!(from = %self.current.id, to = %target.id, "descend");
        self.history.push(self.current);
        self.current = target;
        true
    }

    /// Descend to the node with identity `id` inside the current subtree.
    pub fn descend_to(&mut self, id: &str) -> bool {
        match find_by_id(self.current, id) {
            Some(target) => self.descend(target),
            None => false,
        }
    }

    /// Return to the previous root. No-op on empty history.
    pub fn ascend(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                trace!(from = %self.current.id, to = %previous.id, "ascend");
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Clear history and show `original_root`.
    pub fn reset(&mut self, original_root: &'a NetworkMember) {
        self.root = original_root;
        self.current = original_root;
        self.history.clear();
    }

    /// Snapshot of the position for persistence.
    pub fn state(&self) -> NavigatorState {
        NavigatorState {
            fingerprint: self.root.fingerprint().to_hex().to_string(),
            history: self.history.iter().map(|node| node.id.clone()).collect(),
            current: self.current.id.clone(),
        }
    }

    /// Rebuild a navigator over `root` from a persisted state.
    ///
    /// Falls back to a fresh navigator at `root` when the state was taken on
    /// a different tree or any identity no longer resolves.
    pub fn restore(root: &'a NetworkMember, state: &NavigatorState) -> Self {
        let fresh = Self::new(root);
        if state.fingerprint != root.fingerprint().to_hex().as_str() {
            trace!("navigator state belongs to another tree; resetting");
            return fresh;
        }

        let resolve = |id: &String| find_by_id(root, id);
        let history: Option<Vec<_>> = state.history.iter().map(resolve).collect();
        match (history, resolve(&state.current)) {
            (Some(history), Some(current)) => Self {
                root,
                current,
                history,
            },
            _ => fresh,
        }
    }
}
