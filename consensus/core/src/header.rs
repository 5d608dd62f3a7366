use crate::{hashing, BlockHashSet, Hash};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Header {
    /// Cached hash
    pub hash: Hash,
    pub version: u16,
    /// Direct DAG parents. Empty only for genesis
    pub parents: Vec<Hash>,
    pub hash_merkle_root: Hash,
    /// MuHash commitment of the UTXO set in the block's selected parent past, after applying its mergeset
    pub utxo_commitment: Hash,
    /// Timestamp is in milliseconds
    pub timestamp: u64,
    pub bits: u32,
    pub nonce: u64,
}

impl Header {
    #[allow(clippy::too_many_arguments)]
    pub fn new_finalized(
        version: u16,
        parents: Vec<Hash>,
        hash_merkle_root: Hash,
        utxo_commitment: Hash,
        timestamp: u64,
        bits: u32,
        nonce: u64,
    ) -> Self {
        let mut header = Self {
            hash: Default::default(), // Temp init before the finalize below
            version,
            parents,
            hash_merkle_root,
            utxo_commitment,
            timestamp,
            bits,
            nonce,
        };
        header.finalize();
        header
    }

    /// Finalizes the header and recomputes the header hash
    pub fn finalize(&mut self) {
        self.hash = hashing::header::hash(self);
    }

    pub fn direct_parents(&self) -> &[Hash] {
        &self.parents
    }

    /// Returns the set of distinct parents
    pub fn parent_set(&self) -> BlockHashSet {
        self.parents.iter().copied().collect()
    }

    pub fn is_genesis(&self) -> bool {
        self.parents.is_empty()
    }
}
