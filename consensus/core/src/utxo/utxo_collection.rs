use std::collections::{hash_map, HashMap};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::tx::{TransactionOutpoint, UtxoEntry};

/// An in-memory mapping of outpoints to the entries they hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UtxoCollection {
    utxos: HashMap<TransactionOutpoint, UtxoEntry>,
}

impl UtxoCollection {
    pub fn new() -> Self {
        Self { utxos: HashMap::new() }
    }

    pub fn contains(&self, outpoint: &TransactionOutpoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Returns true if `outpoint` is present and maps to exactly `entry`
    pub fn contains_with_entry(&self, outpoint: &TransactionOutpoint, entry: &UtxoEntry) -> bool {
        self.utxos.get(outpoint) == Some(entry)
    }

    pub fn get(&self, outpoint: &TransactionOutpoint) -> Option<&UtxoEntry> {
        self.utxos.get(outpoint)
    }

    /// Insert a new UTXO entry (overwrites if exists)
    pub fn insert(&mut self, outpoint: TransactionOutpoint, entry: UtxoEntry) -> Option<UtxoEntry> {
        self.utxos.insert(outpoint, entry)
    }

    pub fn remove(&mut self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry> {
        self.utxos.remove(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, TransactionOutpoint, UtxoEntry> {
        self.utxos.iter()
    }

    /// Sum of all entry amounts
    pub fn total_supply(&self) -> u128 {
        self.utxos.values().map(|e| e.amount as u128).sum()
    }
}

impl<'a> IntoIterator for &'a UtxoCollection {
    type Item = (&'a TransactionOutpoint, &'a UtxoEntry);
    type IntoIter = hash_map::Iter<'a, TransactionOutpoint, UtxoEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.utxos.iter()
    }
}

impl IntoIterator for UtxoCollection {
    type Item = (TransactionOutpoint, UtxoEntry);
    type IntoIter = hash_map::IntoIter<TransactionOutpoint, UtxoEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.utxos.into_iter()
    }
}

impl FromIterator<(TransactionOutpoint, UtxoEntry)> for UtxoCollection {
    fn from_iter<I: IntoIterator<Item = (TransactionOutpoint, UtxoEntry)>>(iter: I) -> Self {
        Self { utxos: iter.into_iter().collect() }
    }
}
