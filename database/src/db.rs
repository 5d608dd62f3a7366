use crate::access::{DbReader, DbTransaction, DbWriter, KeyValueDb};
use crate::errors::{DbError, DbResult};
use crate::key::DbKey;
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column family holding every consensus bucket
pub const CF_CONSENSUS: &str = "consensus";

pub struct Database {
    db: Arc<DB>,
    is_closed: Arc<RwLock<bool>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(10000);
        opts.set_keep_log_file_num(10);
        opts.set_max_background_jobs(4);
        opts.set_bytes_per_sync(1048576);
        opts.increase_parallelism(4);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_write_buffer_size(64 * 1024 * 1024);
        opts.set_max_write_buffer_number(3);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(CF_CONSENSUS, Options::default())];
        let db = DB::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)?;
        debug!("opened database at {}", path.as_ref().display());
        Ok(Self { db: Arc::new(db), is_closed: Arc::new(RwLock::new(false)) })
    }

    fn check_closed(&self) -> DbResult<()> {
        if *self.is_closed.read() {
            return Err(DbError::DatabaseClosed);
        }
        Ok(())
    }

    fn cf_handle(&self) -> DbResult<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_CONSENSUS).ok_or_else(|| DbError::ColumnFamilyNotFound(CF_CONSENSUS.to_string()))
    }

    pub fn close(&self) {
        *self.is_closed.write() = true;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), is_closed: self.is_closed.clone() }
    }
}

impl DbReader for Database {
    fn get(&self, key: &DbKey) -> DbResult<Vec<u8>> {
        self.check_closed()?;
        let cf = self.cf_handle()?;
        self.db.get_cf(cf, key)?.ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    fn has(&self, key: &DbKey) -> DbResult<bool> {
        self.check_closed()?;
        let cf = self.cf_handle()?;
        Ok(self.db.get_pinned_cf(cf, key)?.is_some())
    }
}

impl KeyValueDb for Database {
    fn begin(&self) -> Box<dyn DbTransaction + '_> {
        Box::new(RocksTransaction { db: self, batch: WriteBatch::default() })
    }
}

/// Writes accumulate in a `WriteBatch` applied atomically on commit
pub struct RocksTransaction<'a> {
    db: &'a Database,
    batch: WriteBatch,
}

impl DbWriter for RocksTransaction<'_> {
    fn put(&mut self, key: DbKey, value: Vec<u8>) -> DbResult<()> {
        self.db.check_closed()?;
        let cf = self.db.cf_handle()?;
        self.batch.put_cf(cf, key, value);
        Ok(())
    }

    fn delete(&mut self, key: &DbKey) -> DbResult<()> {
        self.db.check_closed()?;
        let cf = self.db.cf_handle()?;
        self.batch.delete_cf(cf, key);
        Ok(())
    }
}

impl DbTransaction for RocksTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        let Self { db, batch } = *self;
        db.check_closed()?;
        let len = batch.len();
        db.db.write(batch)?;
        debug!("committed write batch with {len} operations");
        Ok(())
    }
}
