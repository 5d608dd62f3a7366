use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    #[error("Database is closed")]
    DatabaseClosed,
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

pub trait StoreResultExtensions<T> {
    /// Maps `NotFound` to `Ok(None)` and keeps every other error
    fn optional(self) -> DbResult<Option<T>>;
}

impl<T> StoreResultExtensions<T> for DbResult<T> {
    fn optional(self) -> DbResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(DbError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
