use crate::{BorshCodec, DbBucket, StagedStore};
use consensus_core::{utxo::UtxoDiff, Hash};

pub const UTXO_DIFFS_BUCKET: DbBucket = DbBucket::new(b"utxo-diffs");

/// Per-block diff turning the UTXO view of the selected parent into the view of the block
pub type UtxoDiffStore = StagedStore<Hash, UtxoDiff, BorshCodec>;

pub fn new_utxo_diff_store() -> UtxoDiffStore {
    StagedStore::new(UTXO_DIFFS_BUCKET, BorshCodec)
}
