use crate::{BincodeCodec, DbBucket, StagedStore};
use consensus_core::{acceptance_data::AcceptanceData, Hash};

pub const ACCEPTANCE_DATA_BUCKET: DbBucket = DbBucket::new(b"acceptance-data");

pub type AcceptanceDataStore = StagedStore<Hash, AcceptanceData, BincodeCodec>;

pub fn new_acceptance_data_store() -> AcceptanceDataStore {
    StagedStore::new(ACCEPTANCE_DATA_BUCKET, BincodeCodec)
}
