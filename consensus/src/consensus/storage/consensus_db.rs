//! Consensus storage
//!
//! Groups every staged store consensus writes to over one shared key-value
//! engine, and commits them together.

use database::stores::{
    new_acceptance_data_store, new_ghostdag_store, new_utxo_diff_store, AcceptanceDataStore, BlockStore, GhostdagStore,
    MultisetStore, UtxoDiffStore, UtxoSetStore, VirtualStateStore,
};
use database::{DbResult, KeyValueDb};
use std::sync::Arc;
use tracing::trace;

pub struct ConsensusStorage {
    pub db: Arc<dyn KeyValueDb>,
    pub block_store: BlockStore,
    pub ghostdag_store: GhostdagStore,
    pub multiset_store: MultisetStore,
    pub utxo_diff_store: UtxoDiffStore,
    pub acceptance_data_store: AcceptanceDataStore,
    pub virtual_state_store: VirtualStateStore,
    pub utxo_set_store: UtxoSetStore,
}

impl ConsensusStorage {
    pub fn new(db: Arc<dyn KeyValueDb>) -> Self {
        Self {
            db,
            block_store: BlockStore::new(),
            ghostdag_store: new_ghostdag_store(),
            multiset_store: MultisetStore::new(),
            utxo_diff_store: new_utxo_diff_store(),
            acceptance_data_store: new_acceptance_data_store(),
            virtual_state_store: VirtualStateStore::new(),
            utxo_set_store: UtxoSetStore::new(),
        }
    }

    /// Shorthand for the committed-data reader stores read through
    pub fn reader(&self) -> &dyn KeyValueDb {
        self.db.as_ref()
    }

    pub fn is_staged(&self) -> bool {
        self.block_store.is_staged()
            || self.ghostdag_store.is_staged()
            || self.multiset_store.is_staged()
            || self.utxo_diff_store.is_staged()
            || self.acceptance_data_store.is_staged()
            || self.virtual_state_store.is_staged()
            || self.utxo_set_store.is_staged()
    }

    pub fn discard_all(&mut self) {
        self.block_store.discard();
        self.ghostdag_store.discard();
        self.multiset_store.discard();
        self.utxo_diff_store.discard();
        self.acceptance_data_store.discard();
        self.virtual_state_store.discard();
        self.utxo_set_store.discard();
    }

    /// Writes all staged data in one outer transaction. Either every store lands or none does.
    pub fn commit_all(&mut self) -> DbResult<()> {
        let db = self.db.clone();
        let mut tx = db.begin();
        self.block_store.commit(tx.as_mut())?;
        self.ghostdag_store.commit(tx.as_mut())?;
        self.multiset_store.commit(tx.as_mut())?;
        self.utxo_diff_store.commit(tx.as_mut())?;
        self.acceptance_data_store.commit(tx.as_mut())?;
        self.virtual_state_store.commit(tx.as_mut())?;
        self.utxo_set_store.commit(tx.as_mut())?;
        tx.commit()?;
        trace!("committed consensus storage");
        Ok(())
    }
}
