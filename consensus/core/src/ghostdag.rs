use crate::{Hash, ZERO_HASH};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Per-block GHOSTDAG data as consumed by the UTXO and commitment pipeline
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct BlockGhostdagData {
    pub blue_score: u64,
    pub selected_parent: Hash,
    /// Blue mergeset blocks in consensus order. The selected parent is always first.
    pub mergeset_blues: Vec<Hash>,
    pub mergeset_reds: Vec<Hash>,
}

impl BlockGhostdagData {
    pub fn new(blue_score: u64, selected_parent: Hash, mergeset_blues: Vec<Hash>, mergeset_reds: Vec<Hash>) -> Self {
        Self { blue_score, selected_parent, mergeset_blues, mergeset_reds }
    }

    /// Data of the genesis block, which has no selected parent and an empty mergeset
    pub fn genesis() -> Self {
        Self { blue_score: 0, selected_parent: ZERO_HASH, mergeset_blues: Vec::new(), mergeset_reds: Vec::new() }
    }

    /// Returns the mergeset in the order transactions are accepted: blues (selected parent first) then reds
    pub fn consensus_ordered_mergeset(&self) -> impl Iterator<Item = Hash> + '_ {
        self.mergeset_blues.iter().chain(self.mergeset_reds.iter()).copied()
    }

    pub fn mergeset_size(&self) -> usize {
        self.mergeset_blues.len() + self.mergeset_reds.len()
    }
}
