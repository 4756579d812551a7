//! Stack-based pre-order traversal
//!
//! Explicit stack instead of recursion: depth of a referral chain is
//! bounded only by the member count, so the call stack is not an option.

use super::NetworkMember;

/// One step of a pre-order walk
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Distance from the walk's starting node (0 for the start).
    pub depth: usize,

    /// Index among siblings (0 = left leg, 1 = right leg; 0 for the start).
    pub position: usize,

    /// Node being visited.
    pub node: &'a NetworkMember,
}

/// Pre-order iterator: a node is yielded before its children, children in stored order.
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> PreOrder<'a> {
    /// Start a walk at `root`.
    pub fn new(root: &'a NetworkMember) -> Self {
        Self {
            stack: vec![Visit {
                depth: 0,
                position: 0,
                node: root,
            }],
        }
    }

    /// Number of pending visits.
    pub fn pending(&self) -> usize {
        self.stack.len()
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        let depth = visit.depth + 1;
        // Reverse push so the first child is popped next.
        self.stack.extend(
            visit
                .node
                .children
                .iter()
                .enumerate()
                .rev()
                .map(|(position, node)| Visit {
                    depth,
                    position,
                    node,
                }),
        );
        Some(visit)
    }
}
