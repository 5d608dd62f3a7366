//! UTXO state management
//!
//! The committed UTXO set store always holds the UTXO set of the virtual
//! block. The set as seen by any other chain block is reached by composing
//! stored per-block diffs along selected-parent chains.

pub mod acceptance;
pub mod multisets;
pub mod utxo_view;

use std::sync::Arc;

use consensus_core::tx::{TransactionOutpoint, UtxoEntry};
use consensus_core::utxo::UtxoDiff;
use consensus_core::Hash;
use database::stores::VirtualState;
use parking_lot::RwLock;
use tracing::trace;

use crate::consensus::api::ConsensusStateManager;
use crate::consensus::storage::ConsensusStorage;
use crate::consensus::validation::TransactionRulesValidator;
use crate::errors::ConsensusResult;

pub use utxo_view::{DiffUtxoView, UtxoView, VirtualUtxoView};

pub struct StateManager {
    storage: Arc<RwLock<ConsensusStorage>>,
    transaction_validator: TransactionRulesValidator,
}

impl StateManager {
    pub fn new(storage: Arc<RwLock<ConsensusStorage>>, transaction_validator: TransactionRulesValidator) -> Self {
        Self { storage, transaction_validator }
    }

    /// Returns the diff leading from the virtual UTXO set to the UTXO set of `target`.
    ///
    /// Walks down the selected chain of the current virtual and the selected chain of
    /// `target` until they meet, undoing diffs on the way down and replaying them on
    /// the way up.
    pub fn restore_past_utxo(&self, storage: &ConsensusStorage, virtual_state: &VirtualState, target: Hash) -> ConsensusResult<UtxoDiff> {
        let reader = storage.reader();
        let mut diff = virtual_state.utxo_diff.reversed();
        let mut down = virtual_state.ghostdag_data.selected_parent;
        let mut up = target;
        let mut down_score = storage.ghostdag_store.get(reader, &down)?.blue_score;
        let mut up_score = storage.ghostdag_store.get(reader, &up)?.blue_score;
        let mut up_chain = Vec::new();

        while down != up {
            if down_score >= up_score {
                diff.with_diff_in_place(&storage.utxo_diff_store.get(reader, &down)?.reversed())?;
                down = storage.ghostdag_store.get(reader, &down)?.selected_parent;
                down_score = storage.ghostdag_store.get(reader, &down)?.blue_score;
            } else {
                up_chain.push(up);
                up = storage.ghostdag_store.get(reader, &up)?.selected_parent;
                up_score = storage.ghostdag_store.get(reader, &up)?.blue_score;
            }
        }

        for block in up_chain.iter().rev() {
            diff.with_diff_in_place(&storage.utxo_diff_store.get(reader, block)?)?;
        }
        trace!("restored utxo view of {} through common ancestor {} ({} blocks up)", target, down, up_chain.len());
        Ok(diff)
    }

    /// Looks up `outpoint` in the committed virtual UTXO set
    pub fn virtual_utxo(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
        let storage = self.storage.read();
        let view = VirtualUtxoView::new(&storage);
        view.get(outpoint)
    }
}

impl ConsensusStateManager for StateManager {
    fn utxo_by_outpoint(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
        self.virtual_utxo(outpoint)
    }
}
