use crate::{DbKey, DbResult};

/// Read access to committed data
pub trait DbReader {
    /// Fails with `DbError::NotFound` when `key` is absent
    fn get(&self, key: &DbKey) -> DbResult<Vec<u8>>;

    fn has(&self, key: &DbKey) -> DbResult<bool>;
}

/// Buffered write access. Writes become visible only when the owning transaction commits.
pub trait DbWriter {
    fn put(&mut self, key: DbKey, value: Vec<u8>) -> DbResult<()>;

    fn delete(&mut self, key: &DbKey) -> DbResult<()>;
}

/// An all-or-nothing group of writes. Dropping it without calling `commit` discards every write.
pub trait DbTransaction: DbWriter {
    fn commit(self: Box<Self>) -> DbResult<()>;
}

/// A storage engine consensus can run on
pub trait KeyValueDb: DbReader + Send + Sync {
    fn begin(&self) -> Box<dyn DbTransaction + '_>;
}
