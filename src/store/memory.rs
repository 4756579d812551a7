use std::collections::HashMap;

use super::{MemberStore, StoreError};
use crate::member::Member;

/// Store backed by an owned vector with an identity lookup table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    members: Vec<Member>,
    by_id: HashMap<String, usize>,
}

impl InMemoryStore {
    /// Create a store over `members`. The first record wins for duplicate identities.
    pub fn new(members: Vec<Member>) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            let id = member.id.trim();
            if !id.is_empty() {
                by_id.entry(id.to_string()).or_insert(position);
            }
        }
        Self { members, by_id }
    }

    /// Borrow the records without copying.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Member> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl MemberStore for InMemoryStore {
    fn fetch_all(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.members.clone())
    }

    fn fetch_by_id(&self, id: &str) -> Result<Option<Member>, StoreError> {
        Ok(self
            .by_id
            .get(id.trim())
            .map(|&position| self.members[position].clone()))
    }
}
