use crate::{BorshCodec, DbBucket, DbReader, DbResult, DbWriter, StagedStore};
use consensus_core::block::Block;
use consensus_core::Hash;

pub const BLOCKS_BUCKET: DbBucket = DbBucket::new(b"blocks");

/// Full blocks keyed by block hash
pub struct BlockStore {
    inner: StagedStore<Hash, Block, BorshCodec>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self { inner: StagedStore::new(BLOCKS_BUCKET, BorshCodec) }
    }

    pub fn stage(&mut self, block: Block) {
        self.inner.stage(block.hash(), block);
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

    pub fn block<R: DbReader + ?Sized>(&self, reader: &R, hash: &Hash) -> DbResult<Block> {
        self.inner.get(reader, hash)
    }

    pub fn has_block<R: DbReader + ?Sized>(&self, reader: &R, hash: &Hash) -> DbResult<bool> {
        self.inner.has(reader, hash)
    }

    pub fn blocks<R: DbReader + ?Sized>(&self, reader: &R, hashes: &[Hash]) -> DbResult<Vec<Block>> {
        self.inner.get_many(reader, hashes)
    }

    pub fn delete<W: DbWriter + ?Sized>(&mut self, writer: &mut W, hash: &Hash) -> DbResult<()> {
        self.inner.delete(writer, hash)
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueDb, MemoryDb};
    use consensus_core::config::genesis::GENESIS;

    #[test]
    fn test_block_store_lifecycle() {
        let db = MemoryDb::new();
        let mut store = BlockStore::new();
        let genesis = GENESIS.build();
        let hash = genesis.hash();

        store.stage(genesis.clone());
        assert!(store.has_block(&db, &hash).unwrap());
        assert!(db.is_empty());

        let mut tx = db.begin();
        store.commit(tx.as_mut()).unwrap();
        tx.commit().unwrap();
        assert!(!store.is_staged());

        let reopened = BlockStore::new();
        assert_eq!(reopened.block(&db, &hash).unwrap(), genesis);
        assert_eq!(reopened.blocks(&db, &[hash, hash]).unwrap().len(), 2);
    }
}
