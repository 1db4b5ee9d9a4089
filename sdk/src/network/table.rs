//! Node table.
//!
//! Maps node account ids to transport addresses. The table is read-mostly:
//! the client hands the dispatcher a snapshot per call, and only
//! `Client::set_network` ever replaces it.

use std::collections::BTreeMap;

use crate::ids::AccountId;

/// One submission target, resolved from the table for a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeTarget {
    pub account_id: AccountId,
    pub address: String,
}

/// Known nodes, ordered by account id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    nodes: BTreeMap<AccountId, String>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, account_id: AccountId, address: impl Into<String>) -> Option<String> {
        self.nodes.insert(account_id, address.into())
    }

    pub fn remove(&mut self, account_id: &AccountId) -> Option<String> {
        self.nodes.remove(account_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn address_of(&self, account_id: &AccountId) -> Option<&str> {
        self.nodes.get(account_id).map(String::as_str)
    }

    pub fn target(&self, account_id: &AccountId) -> Option<NodeTarget> {
        self.address_of(account_id).map(|address| NodeTarget {
            account_id: *account_id,
            address: address.to_string(),
        })
    }

    pub fn node_ids(&self) -> Vec<AccountId> {
        self.nodes.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &str)> {
        self.nodes.iter().map(|(id, address)| (id, address.as_str()))
    }

    /// Picks up to `max` nodes (0 = all) by rotating the ordered table to
    /// start at `seed % len`.
    ///
    /// Same table + same seed always yields the same list, so re-freezing a
    /// transaction with the same id lands on the same nodes, while different
    /// transactions spread their first attempt across the network.
    pub fn node_ids_for(&self, seed: u64, max: usize) -> Vec<AccountId> {
        let ids = self.node_ids();
        if ids.is_empty() {
            return ids;
        }
        let count = if max == 0 { ids.len() } else { max.min(ids.len()) };
        let start = (seed % ids.len() as u64) as usize;

        ids.iter().cycle().skip(start).take(count).copied().collect()
    }
}

impl<A: Into<String>> FromIterator<(AccountId, A)> for Network {
    fn from_iter<T: IntoIterator<Item = (AccountId, A)>>(iter: T) -> Self {
        Self {
            nodes: iter
                .into_iter()
                .map(|(id, address)| (id, address.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_nodes() -> Network {
        (3..=5u64)
            .map(|n| (AccountId::from(n), format!("node{n}:50211")))
            .collect()
    }

    #[test]
    fn lookup_by_account() {
        let network = three_nodes();
        assert_eq!(network.len(), 3);
        assert_eq!(network.address_of(&AccountId::from(4)), Some("node4:50211"));
        assert!(network.target(&AccountId::from(99)).is_none());
    }

    #[test]
    fn selection_rotates_by_seed() {
        let network = three_nodes();
        let ids = |nums: &[u64]| nums.iter().map(|n| AccountId::from(*n)).collect::<Vec<_>>();

        assert_eq!(network.node_ids_for(0, 0), ids(&[3, 4, 5]));
        assert_eq!(network.node_ids_for(1, 0), ids(&[4, 5, 3]));
        assert_eq!(network.node_ids_for(5, 2), ids(&[5, 3]));
    }

    #[test]
    fn selection_is_deterministic() {
        let network = three_nodes();
        assert_eq!(network.node_ids_for(42, 2), network.node_ids_for(42, 2));
    }

    #[test]
    fn selection_caps_at_table_size() {
        assert_eq!(three_nodes().node_ids_for(7, 10).len(), 3);
        assert!(Network::new().node_ids_for(7, 3).is_empty());
    }
}
