use crate::access::{DbReader, DbTransaction, DbWriter, KeyValueDb};
use crate::errors::{DbError, DbResult};
use crate::key::DbKey;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A volatile engine keeping every key in an ordered map
#[derive(Default)]
pub struct MemoryDb {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current committed content
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.map.read().clone()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl DbReader for MemoryDb {
    fn get(&self, key: &DbKey) -> DbResult<Vec<u8>> {
        self.map.read().get(key.as_bytes()).cloned().ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    fn has(&self, key: &DbKey) -> DbResult<bool> {
        Ok(self.map.read().contains_key(key.as_bytes()))
    }
}

impl KeyValueDb for MemoryDb {
    fn begin(&self) -> Box<dyn DbTransaction + '_> {
        Box::new(MemoryTransaction { db: self, ops: Vec::new() })
    }
}

enum WriteOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

pub struct MemoryTransaction<'a> {
    db: &'a MemoryDb,
    ops: Vec<WriteOp>,
}

impl DbWriter for MemoryTransaction<'_> {
    fn put(&mut self, key: DbKey, value: Vec<u8>) -> DbResult<()> {
        self.ops.push(WriteOp::Put(key.into_bytes(), value));
        Ok(())
    }

    fn delete(&mut self, key: &DbKey) -> DbResult<()> {
        self.ops.push(WriteOp::Delete(key.as_bytes().to_vec()));
        Ok(())
    }
}

impl DbTransaction for MemoryTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        let Self { db, ops } = *self;
        // A single write guard makes the whole batch visible at once
        let mut map = db.map.write();
        for op in ops {
            match op {
                WriteOp::Put(key, value) => {
                    map.insert(key, value);
                }
                WriteOp::Delete(key) => {
                    map.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::DbBucket;

    const BUCKET: DbBucket = DbBucket::new(b"mem");

    #[test]
    fn test_writes_apply_in_order_on_commit() {
        let db = MemoryDb::new();
        let mut tx = db.begin();
        tx.put(BUCKET.key([1u8]), vec![1]).unwrap();
        tx.delete(&BUCKET.key([1u8])).unwrap();
        tx.put(BUCKET.key([2u8]), vec![2]).unwrap();
        assert!(db.is_empty());
        tx.commit().unwrap();

        assert!(!db.has(&BUCKET.key([1u8])).unwrap());
        assert_eq!(db.get(&BUCKET.key([2u8])).unwrap(), vec![2]);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_dropped_transaction_is_rolled_back() {
        let db = MemoryDb::new();
        let before = db.snapshot();
        {
            let mut tx = db.begin();
            tx.put(BUCKET.key([3u8]), vec![3]).unwrap();
        }
        assert_eq!(db.snapshot(), before);
        assert!(db.get(&BUCKET.key([3u8])).unwrap_err().is_not_found());
    }
}
