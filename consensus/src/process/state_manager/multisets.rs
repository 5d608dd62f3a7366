//! UTXO commitment calculation
//!
//! A block's multiset is its selected parent's multiset with the accepted
//! transactions of its mergeset replayed on top: spent entries removed,
//! created entries added. The digest of the result is the block's UTXO
//! commitment.

use consensus_core::acceptance_data::AcceptanceData;
use consensus_core::ghostdag::BlockGhostdagData;
use consensus_core::muhash::MuHashExtensions;
use consensus_core::tx::{TransactionOutpoint, UtxoEntry, COINBASE_TRANSACTION_INDEX};
use consensus_core::utxo::UtxoDiff;
use consensus_core::MuHash;
use tracing::trace;

use super::utxo_view::{DiffUtxoView, UtxoView};
use super::StateManager;
use crate::consensus::storage::ConsensusStorage;
use crate::errors::{ConsensusError, ConsensusResult};

impl StateManager {
    /// `selected_parent_view` must be the UTXO set the selected parent's multiset commits to.
    /// Every removal is checked against it.
    pub fn calculate_multiset<V: UtxoView + ?Sized>(
        &self,
        storage: &ConsensusStorage,
        acceptance_data: &AcceptanceData,
        ghostdag_data: &BlockGhostdagData,
        selected_parent_view: &V,
    ) -> ConsensusResult<MuHash> {
        let selected_parent = ghostdag_data.selected_parent;
        let mut multiset = storage.multiset_store.get(storage.reader(), &selected_parent)?;
        let mut replayed = UtxoDiff::default();

        for block_acceptance in acceptance_data.iter() {
            for (i, tx_acceptance) in block_acceptance.transaction_acceptance_data.iter().enumerate() {
                if !tx_acceptance.is_accepted {
                    continue;
                }
                let tx = &tx_acceptance.transaction;
                let is_coinbase = i == COINBASE_TRANSACTION_INDEX;

                let spent_entries = &tx_acceptance.transaction_input_utxo_entries;
                if spent_entries.len() != tx.inputs.len() {
                    let outpoint = tx
                        .inputs
                        .get(spent_entries.len())
                        .map(|input| input.previous_outpoint)
                        .unwrap_or_else(|| TransactionOutpoint::new(tx.id(), 0));
                    return Err(ConsensusError::MultisetIntegrity {
                        outpoint,
                        reason: format!("{} spent entries for {} inputs", spent_entries.len(), tx.inputs.len()),
                    });
                }

                for (input, entry) in tx.inputs.iter().zip(tx_acceptance.transaction_input_utxo_entries.iter()) {
                    let outpoint = input.previous_outpoint;
                    Self::check_removal(&DiffUtxoView::new(selected_parent_view, &replayed), &outpoint, entry)?;
                    replayed.remove_entry(outpoint, entry.clone())?;
                    multiset.remove_utxo(&outpoint, entry);
                }

                let tx_id = tx.id();
                for (index, output) in tx.outputs.iter().enumerate() {
                    let outpoint = TransactionOutpoint::new(tx_id, index as u32);
                    let entry =
                        UtxoEntry::new(output.value, output.script_public_key.clone(), ghostdag_data.blue_score, is_coinbase);
                    multiset.add_utxo(&outpoint, &entry);
                    replayed.add_entry(outpoint, entry)?;
                }
            }
        }

        trace!("multiset on top of {}: {} added, {} removed", selected_parent, replayed.add.len(), replayed.remove.len());
        Ok(multiset)
    }

    fn check_removal<V: UtxoView + ?Sized>(view: &V, outpoint: &TransactionOutpoint, entry: &UtxoEntry) -> ConsensusResult<()> {
        match view.get(outpoint)? {
            Some(found) if &found == entry => Ok(()),
            Some(_) => Err(ConsensusError::MultisetIntegrity {
                outpoint: *outpoint,
                reason: "spent entry differs from the one in the utxo set".to_string(),
            }),
            None => Err(ConsensusError::MultisetIntegrity {
                outpoint: *outpoint,
                reason: "spent entry is not in the utxo set".to_string(),
            }),
        }
    }
}
