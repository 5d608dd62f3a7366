//! Domain model of the consensus core: transactions, blocks, UTXO entries and
//! diffs, acceptance and GHOSTDAG data, plus the hashing rules every node must
//! agree on byte for byte.

use std::collections::{HashMap, HashSet};

pub mod acceptance_data;
pub mod block;
pub mod config;
pub mod constants;
pub mod errors;
pub mod ghostdag;
pub mod hashing;
pub mod header;
pub mod merkle;
pub mod muhash;
pub mod subnets;
pub mod tx;
pub mod utxo;

pub use jio_hashes::Hash;
pub use jio_muhash::MuHash;

/// The zero hash, used as the selected parent of genesis.
pub const ZERO_HASH: Hash = Hash::zeroed();

pub type BlockHashSet = HashSet<Hash>;
pub type BlockHashMap<V> = HashMap<Hash, V>;
