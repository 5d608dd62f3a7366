use crate::{DbBucket, DbError, DbReader, DbResult, DbWriter, StagedStore, StoreCodec};
use consensus_core::Hash;
use jio_muhash::MuHash;

pub const MULTISETS_BUCKET: DbBucket = DbBucket::new(b"multisets");

/// Fixed-width numerator || denominator encoding of a MuHash
#[derive(Debug, Clone, Copy, Default)]
pub struct MuHashCodec;

impl StoreCodec<MuHash> for MuHashCodec {
    fn encode(&self, value: &MuHash) -> DbResult<Vec<u8>> {
        Ok(value.serialize().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> DbResult<MuHash> {
        MuHash::deserialize(bytes).map_err(|err| DbError::Deserialization(err.to_string()))
    }
}

/// UTXO multisets keyed by block hash. Reads always hand out an owned copy, so
/// callers can mutate what they get without touching staged or persisted state.
pub struct MultisetStore {
    inner: StagedStore<Hash, MuHash, MuHashCodec>,
}

impl MultisetStore {
    pub fn new() -> Self {
        Self { inner: StagedStore::new(MULTISETS_BUCKET, MuHashCodec) }
    }

    pub fn stage(&mut self, block_hash: Hash, multiset: MuHash) {
        self.inner.stage(block_hash, multiset);
    }

    pub fn is_staged(&self) -> bool {
        self.inner.is_staged()
    }

    pub fn discard(&mut self) {
        self.inner.discard();
    }

    pub fn commit<W: DbWriter + ?Sized>(&mut self, writer: &mut W) -> DbResult<()> {
        self.inner.commit(writer)
    }

    pub fn get<R: DbReader + ?Sized>(&self, reader: &R, block_hash: &Hash) -> DbResult<MuHash> {
        self.inner.get(reader, block_hash)
    }

    pub fn has<R: DbReader + ?Sized>(&self, reader: &R, block_hash: &Hash) -> DbResult<bool> {
        self.inner.has(reader, block_hash)
    }

    pub fn delete<W: DbWriter + ?Sized>(&mut self, writer: &mut W, block_hash: &Hash) -> DbResult<()> {
        self.inner.delete(writer, block_hash)
    }
}

impl Default for MultisetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueDb, MemoryDb};

    #[test]
    fn test_multiset_persists_by_value() {
        let db = MemoryDb::new();
        let mut store = MultisetStore::new();
        let block = Hash::from_u64_word(1);

        let mut multiset = MuHash::new();
        multiset.add_element(b"utxo");
        let digest = multiset.finalize();
        store.stage(block, multiset);

        let mut tx = db.begin();
        store.commit(tx.as_mut()).unwrap();
        tx.commit().unwrap();

        let mut working = store.get(&db, &block).unwrap();
        assert_eq!(working.finalize(), digest);
        working.add_element(b"another");
        assert_eq!(store.get(&db, &block).unwrap().finalize(), digest, "persisted multiset is untouched");
    }

    #[test]
    fn test_corrupt_multiset_bytes() {
        let db = MemoryDb::new();
        let mut tx = db.begin();
        tx.put(MULTISETS_BUCKET.key(Hash::from_u64_word(2)), vec![1, 2, 3]).unwrap();
        tx.commit().unwrap();
        let store = MultisetStore::new();
        assert!(matches!(store.get(&db, &Hash::from_u64_word(2)), Err(DbError::Deserialization(_))));
    }
}
