//! Staged write-through stores.
//!
//! A [`StagedStore`] owns an in-memory buffer of pending writes for one entity
//! type and layers it over the shared persistent key-value space. Reads issued
//! through the store see staged values first. Staged values reach storage only
//! when [`StagedStore::commit`] writes them into a caller supplied transaction,
//! so several stores can land their writes in one atomic batch.
//!
//! The buffer has no internal synchronization. Mutating calls take `&mut self`,
//! which leaves it to the owner (the consensus storage lock) to serialize them.

use std::collections::HashMap;
use std::hash::Hash as StdHash;
use std::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};
use consensus_core::{tx::TransactionOutpoint, Hash};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use crate::{DbBucket, DbError, DbKey, DbReader, DbResult, DbWriter};

/// Turns store values into bytes and back
pub trait StoreCodec<V> {
    fn encode(&self, value: &V) -> DbResult<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> DbResult<V>;
}

/// serde + bincode
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl<V: Serialize + DeserializeOwned> StoreCodec<V> for BincodeCodec {
    fn encode(&self, value: &V) -> DbResult<Vec<u8>> {
        bincode::serialize(value).map_err(|err| DbError::Serialization(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> DbResult<V> {
        bincode::deserialize(bytes).map_err(|err| DbError::Deserialization(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BorshCodec;

impl<V: BorshSerialize + BorshDeserialize> StoreCodec<V> for BorshCodec {
    fn encode(&self, value: &V) -> DbResult<Vec<u8>> {
        borsh::to_vec(value).map_err(|err| DbError::Serialization(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> DbResult<V> {
        borsh::from_slice(bytes).map_err(|err| DbError::Deserialization(err.to_string()))
    }
}

/// Entity keys a store can be addressed by
pub trait StoreKey: Clone + Eq + StdHash {
    fn key_bytes(&self) -> Vec<u8>;
}

impl StoreKey for Hash {
    fn key_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl StoreKey for TransactionOutpoint {
    fn key_bytes(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(36);
        key.extend_from_slice(self.transaction_id.as_bytes());
        key.extend_from_slice(&self.index.to_le_bytes());
        key
    }
}

/// Singleton stores use the bucket itself as their only key
impl StoreKey for () {
    fn key_bytes(&self) -> Vec<u8> {
        Vec::new()
    }
}

pub struct StagedStore<K, V, C> {
    bucket: DbBucket,
    codec: C,
    staging: HashMap<K, V>,
    _marker: PhantomData<fn() -> V>,
}

impl<K, V, C> StagedStore<K, V, C>
where
    K: StoreKey,
    V: Clone,
    C: StoreCodec<V>,
{
    pub fn new(bucket: DbBucket, codec: C) -> Self {
        Self { bucket, codec, staging: HashMap::new(), _marker: PhantomData }
    }

    pub fn bucket(&self) -> DbBucket {
        self.bucket
    }

    fn db_key(&self, key: &K) -> DbKey {
        self.bucket.key(key.key_bytes())
    }

    /// Inserts or overwrites `value` under `key` in the staging buffer
    pub fn stage(&mut self, key: K, value: V) {
        self.staging.insert(key, value);
    }

    /// True iff something is waiting to be committed
    pub fn is_staged(&self) -> bool {
        !self.staging.is_empty()
    }

    pub fn staged(&self, key: &K) -> Option<&V> {
        self.staging.get(key)
    }

    /// Drops a single staged value, returning it
    pub fn unstage(&mut self, key: &K) -> Option<V> {
        self.staging.remove(key)
    }

    pub fn staged_len(&self) -> usize {
        self.staging.len()
    }

    pub fn discard(&mut self) {
        self.staging.clear();
    }

    /// Writes every staged value into `writer` and clears the buffer. On failure the
    /// buffer is left intact and the error is returned as is. Rolling back writes
    /// already issued is the job of the transaction `writer` belongs to.
    pub fn commit<W: DbWriter + ?Sized>(&mut self, writer: &mut W) -> DbResult<()> {
        for (key, value) in self.staging.iter() {
            let bytes = self.codec.encode(value)?;
            writer.put(self.db_key(key), bytes)?;
        }
        trace!("committed {} staged entries to bucket {:?}", self.staging.len(), self.bucket);
        self.staging.clear();
        Ok(())
    }

    /// Returns the staged value for `key`, or the persisted one
    pub fn get<R: DbReader + ?Sized>(&self, reader: &R, key: &K) -> DbResult<V> {
        if let Some(value) = self.staging.get(key) {
            return Ok(value.clone());
        }
        let bytes = reader.get(&self.db_key(key))?;
        self.codec.decode(&bytes)
    }

    pub fn has<R: DbReader + ?Sized>(&self, reader: &R, key: &K) -> DbResult<bool> {
        if self.staging.contains_key(key) {
            return Ok(true);
        }
        reader.has(&self.db_key(key))
    }

    /// Point-wise [`Self::get`] preserving the order of `keys`. Fails on the first miss.
    pub fn get_many<R: DbReader + ?Sized>(&self, reader: &R, keys: &[K]) -> DbResult<Vec<V>> {
        keys.iter().map(|key| self.get(reader, key)).collect()
    }

    /// A staged key is only dropped from the buffer since it never reached storage.
    /// Otherwise a delete is issued through `writer`.
    pub fn delete<W: DbWriter + ?Sized>(&mut self, writer: &mut W, key: &K) -> DbResult<()> {
        if self.staging.remove(key).is_some() {
            return Ok(());
        }
        writer.delete(&self.db_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueDb, MemoryDb};

    const BUCKET: DbBucket = DbBucket::new(b"test-values");

    type TestStore = StagedStore<Hash, String, BincodeCodec>;

    fn store() -> TestStore {
        StagedStore::new(BUCKET, BincodeCodec)
    }

    fn h(i: u64) -> Hash {
        Hash::from_u64_word(i)
    }

    /// Writer counting calls, forwarding nothing
    #[derive(Default)]
    struct CountingWriter {
        puts: usize,
        deletes: usize,
    }

    impl DbWriter for CountingWriter {
        fn put(&mut self, _key: DbKey, _value: Vec<u8>) -> DbResult<()> {
            self.puts += 1;
            Ok(())
        }

        fn delete(&mut self, _key: &DbKey) -> DbResult<()> {
            self.deletes += 1;
            Ok(())
        }
    }

    /// Writer failing on the first put
    struct FailingWriter;

    impl DbWriter for FailingWriter {
        fn put(&mut self, key: DbKey, _value: Vec<u8>) -> DbResult<()> {
            Err(DbError::Serialization(format!("refusing {key}")))
        }

        fn delete(&mut self, _key: &DbKey) -> DbResult<()> {
            Ok(())
        }
    }

    fn persist(db: &MemoryDb, store: &mut TestStore, key: Hash, value: &str) {
        store.stage(key, value.to_string());
        let mut tx = db.begin();
        store.commit(tx.as_mut()).unwrap();
        tx.commit().unwrap();
    }

    #[test]
    fn test_staged_value_shadows_persisted_value() {
        let db = MemoryDb::new();
        let mut store = store();
        persist(&db, &mut store, h(1), "persisted");

        store.stage(h(1), "staged".to_string());
        assert_eq!(store.get(&db, &h(1)).unwrap(), "staged");

        store.discard();
        assert_eq!(store.get(&db, &h(1)).unwrap(), "persisted");
    }

    #[test]
    fn test_commit_clears_staging() {
        let db = MemoryDb::new();
        let mut store = store();
        assert!(!store.is_staged());
        store.stage(h(1), "a".to_string());
        store.stage(h(2), "b".to_string());
        store.stage(h(2), "b2".to_string());
        assert!(store.is_staged());
        assert_eq!(store.staged_len(), 2);

        let mut tx = db.begin();
        store.commit(tx.as_mut()).unwrap();
        assert!(!store.is_staged());
        assert!(db.is_empty(), "nothing lands before the outer transaction commits");
        tx.commit().unwrap();

        assert_eq!(store.get(&db, &h(2)).unwrap(), "b2");
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_discard_leaves_storage_untouched() {
        let db = MemoryDb::new();
        let mut store = store();
        persist(&db, &mut store, h(1), "one");
        let before = db.snapshot();

        store.stage(h(1), "changed".to_string());
        store.stage(h(9), "new".to_string());
        store.discard();
        let mut tx = db.begin();
        store.commit(tx.as_mut()).unwrap();
        tx.commit().unwrap();

        assert_eq!(db.snapshot(), before);
    }

    #[test]
    fn test_failed_commit_keeps_buffer() {
        let mut store = store();
        store.stage(h(1), "a".to_string());
        let err = store.commit(&mut FailingWriter).unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
        assert!(store.is_staged());
        assert_eq!(store.staged(&h(1)).map(String::as_str), Some("a"));
    }

    #[test]
    fn test_get_missing_key_is_not_found() {
        let db = MemoryDb::new();
        let store = store();
        assert!(store.get(&db, &h(404)).unwrap_err().is_not_found());
        assert!(!store.has(&db, &h(404)).unwrap());
    }

    #[test]
    fn test_malformed_bytes_fail_deserialization() {
        let db = MemoryDb::new();
        let mut tx = db.begin();
        tx.put(BUCKET.key(h(5).key_bytes()), vec![0xff]).unwrap();
        tx.commit().unwrap();

        let store = store();
        assert!(matches!(store.get(&db, &h(5)), Err(DbError::Deserialization(_))));
    }

    #[test]
    fn test_has_and_get_many() {
        let db = MemoryDb::new();
        let mut store = store();
        persist(&db, &mut store, h(1), "one");
        store.stage(h(2), "two".to_string());

        assert!(store.has(&db, &h(1)).unwrap());
        assert!(store.has(&db, &h(2)).unwrap());
        assert_eq!(store.get_many(&db, &[h(2), h(1)]).unwrap(), vec!["two".to_string(), "one".to_string()]);
        assert!(store.get_many(&db, &[h(1), h(3), h(2)]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_of_staged_key_skips_storage() {
        let mut store = store();
        store.stage(h(1), "a".to_string());
        let mut writer = CountingWriter::default();

        store.delete(&mut writer, &h(1)).unwrap();
        assert_eq!(writer.deletes, 0);
        assert!(!store.is_staged());

        store.delete(&mut writer, &h(1)).unwrap();
        assert_eq!(writer.deletes, 1);
    }

    #[test]
    fn test_delete_persisted_key() {
        let db = MemoryDb::new();
        let mut store = store();
        persist(&db, &mut store, h(1), "one");

        let mut tx = db.begin();
        store.delete(tx.as_mut(), &h(1)).unwrap();
        tx.commit().unwrap();
        assert!(!store.has(&db, &h(1)).unwrap());
    }

    #[test]
    fn test_outpoint_keys_are_distinct() {
        let a = TransactionOutpoint::new(h(1), 0);
        let b = TransactionOutpoint::new(h(1), 1);
        assert_ne!(a.key_bytes(), b.key_bytes());
        assert_eq!(a.key_bytes().len(), 36);
    }
}
