//! Virtual processor for consensus
//!
//! Computes the UTXO state of new blocks and keeps the virtual block, the
//! block merging every current tip, up to date.

use std::sync::Arc;

use consensus_core::acceptance_data::AcceptanceData;
use consensus_core::ghostdag::BlockGhostdagData;
use consensus_core::utxo::UtxoDiff;
use consensus_core::{Hash, MuHash};
use database::stores::VirtualState;
use tracing::debug;

use crate::consensus::ghostdag::GhostdagManager;
use crate::consensus::storage::ConsensusStorage;
use crate::errors::ConsensusResult;
use crate::process::state_manager::{DiffUtxoView, StateManager, VirtualUtxoView};

/// What accepting a mergeset on top of its selected parent produces
pub struct UtxoState {
    pub acceptance_data: AcceptanceData,
    /// Diff from the UTXO set of the selected parent
    pub utxo_diff: UtxoDiff,
    pub multiset: MuHash,
    /// Diff from the virtual UTXO set to the UTXO set of the selected parent
    pub selected_parent_diff: UtxoDiff,
}

pub struct VirtualProcessor {
    ghostdag_manager: GhostdagManager,
    state_manager: Arc<StateManager>,
    max_block_parents: usize,
}

impl VirtualProcessor {
    pub fn new(ghostdag_manager: GhostdagManager, state_manager: Arc<StateManager>, max_block_parents: usize) -> Self {
        Self { ghostdag_manager, state_manager, max_block_parents }
    }

    /// Accepts the mergeset described by `ghostdag_data` over the UTXO set of its selected parent
    pub fn calculate_utxo_state(
        &self,
        storage: &ConsensusStorage,
        virtual_state: &VirtualState,
        ghostdag_data: &BlockGhostdagData,
    ) -> ConsensusResult<UtxoState> {
        let selected_parent_diff = self.state_manager.restore_past_utxo(storage, virtual_state, ghostdag_data.selected_parent)?;
        let virtual_view = VirtualUtxoView::new(storage);
        let selected_parent_view = DiffUtxoView::new(&virtual_view, &selected_parent_diff);

        let (acceptance_data, utxo_diff) =
            self.state_manager.calculate_acceptance_data(storage, ghostdag_data, &selected_parent_view)?;
        let multiset = self.state_manager.calculate_multiset(storage, &acceptance_data, ghostdag_data, &selected_parent_view)?;
        Ok(UtxoState { acceptance_data, utxo_diff, multiset, selected_parent_diff })
    }

    /// Tips after `new_block` joins the DAG, as referenced by its parents
    pub fn next_tips(&self, previous: &VirtualState, new_block: Hash, new_block_parents: &[Hash]) -> Vec<Hash> {
        let mut tips = previous.tips.iter().copied().filter(|tip| !new_block_parents.contains(tip)).collect::<Vec<_>>();
        tips.push(new_block);
        tips
    }

    /// The best `max_block_parents` tips, best first
    pub fn pick_virtual_parents(&self, storage: &ConsensusStorage, tips: &[Hash]) -> ConsensusResult<Vec<Hash>> {
        let mut parents = self.ghostdag_manager.sort_by_blue_score_desc(storage, tips)?;
        parents.truncate(self.max_block_parents);
        Ok(parents)
    }

    /// Stages the virtual state following the addition of `new_block`, along with the
    /// matching change to the virtual UTXO set
    pub fn update_virtual(
        &self,
        storage: &mut ConsensusStorage,
        previous: &VirtualState,
        new_block: Hash,
        new_block_parents: &[Hash],
    ) -> ConsensusResult<VirtualState> {
        let tips = self.next_tips(previous, new_block, new_block_parents);
        let parents = self.pick_virtual_parents(storage, &tips)?;
        let ghostdag_data = self.ghostdag_manager.ghostdag(storage, &parents)?;
        let state = self.calculate_utxo_state(storage, previous, &ghostdag_data)?;

        let virtual_utxo_change = state.selected_parent_diff.with_diff(&state.utxo_diff)?;
        storage.utxo_set_store.stage_diff(&virtual_utxo_change);

        let virtual_state = VirtualState {
            tips,
            parents,
            ghostdag_data,
            utxo_diff: state.utxo_diff,
            utxo_commitment: state.multiset.finalize(),
        };
        debug!(
            "virtual updated: {} tips, selected parent {}, blue score {}",
            virtual_state.tips.len(),
            virtual_state.ghostdag_data.selected_parent,
            virtual_state.ghostdag_data.blue_score
        );
        storage.virtual_state_store.stage(virtual_state.clone());
        Ok(virtual_state)
    }
}
