pub mod access;
pub mod db;
pub mod errors;
pub mod key;
pub mod memory;
pub mod staging;
pub mod stores;

pub use access::{DbReader, DbTransaction, DbWriter, KeyValueDb};
pub use db::Database;
pub use errors::{DbError, DbResult, StoreResultExtensions};
pub use key::{DbBucket, DbKey};
pub use memory::MemoryDb;
pub use staging::{BincodeCodec, BorshCodec, StagedStore, StoreCodec, StoreKey};
