use crate::{BincodeCodec, DbBucket, StagedStore};
use consensus_core::{ghostdag::BlockGhostdagData, Hash};

pub const GHOSTDAG_BUCKET: DbBucket = DbBucket::new(b"block-ghostdag-data");

pub type GhostdagStore = StagedStore<Hash, BlockGhostdagData, BincodeCodec>;

pub fn new_ghostdag_store() -> GhostdagStore {
    StagedStore::new(GHOSTDAG_BUCKET, BincodeCodec)
}
