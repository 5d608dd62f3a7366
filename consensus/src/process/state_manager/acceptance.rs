//! Acceptance of mergeset transactions
//!
//! Every block in a mergeset has its transactions replayed over the UTXO view
//! of the selected parent. A transaction is accepted when it can be applied
//! to that view plus whatever was accepted before it.

use consensus_core::acceptance_data::{AcceptanceData, BlockAcceptanceData, TransactionAcceptanceData};
use consensus_core::errors::{TxResult, TxRuleError};
use consensus_core::ghostdag::BlockGhostdagData;
use consensus_core::tx::{PopulatedTransaction, Transaction, TransactionOutpoint, UtxoEntry, COINBASE_TRANSACTION_INDEX};
use consensus_core::utxo::UtxoDiff;
use tracing::{debug, trace};

use super::utxo_view::{DiffUtxoView, UtxoView};
use super::StateManager;
use crate::consensus::storage::ConsensusStorage;
use crate::errors::ConsensusResult;

impl StateManager {
    /// Returns the acceptance data of a block with `ghostdag_data`, along with the diff
    /// its accepted transactions apply to `selected_parent_view`
    pub fn calculate_acceptance_data<V: UtxoView + ?Sized>(
        &self,
        storage: &ConsensusStorage,
        ghostdag_data: &BlockGhostdagData,
        selected_parent_view: &V,
    ) -> ConsensusResult<(AcceptanceData, UtxoDiff)> {
        let mut diff = UtxoDiff::default();
        let mut acceptance_data = Vec::with_capacity(ghostdag_data.mergeset_size());

        for merged in ghostdag_data.consensus_ordered_mergeset() {
            let block = storage.block_store.block(storage.reader(), &merged)?;
            let mut tx_acceptance = Vec::with_capacity(block.transactions.len());

            for (i, tx) in block.transactions.into_iter().enumerate() {
                let is_coinbase = i == COINBASE_TRANSACTION_INDEX;
                let outcome = {
                    let view = DiffUtxoView::new(selected_parent_view, &diff);
                    self.try_accept(&view, &tx, is_coinbase, ghostdag_data.blue_score)?
                };
                match outcome {
                    Ok((entries, fee)) => {
                        diff.add_transaction(&tx, &entries, ghostdag_data.blue_score, is_coinbase)?;
                        tx_acceptance.push(TransactionAcceptanceData::accepted(tx, fee, entries));
                    }
                    Err(err) => {
                        debug!("transaction {} of block {} not accepted: {}", tx.id(), merged, err);
                        tx_acceptance.push(TransactionAcceptanceData::rejected(tx));
                    }
                }
            }
            acceptance_data.push(BlockAcceptanceData::new(merged, tx_acceptance));
        }

        trace!("mergeset of {} blocks yields {} additions and {} removals", acceptance_data.len(), diff.add.len(), diff.remove.len());
        Ok((acceptance_data, diff))
    }

    /// The outer result carries storage faults, the inner one the reason a transaction is not accepted
    fn try_accept<V: UtxoView + ?Sized>(
        &self,
        view: &V,
        tx: &Transaction,
        is_coinbase: bool,
        pov_blue_score: u64,
    ) -> ConsensusResult<TxResult<(Vec<UtxoEntry>, u64)>> {
        // A second copy of an output already in the set would collide with it
        let tx_id = tx.id();
        for index in 0..tx.outputs.len() {
            let outpoint = TransactionOutpoint::new(tx_id, index as u32);
            if view.get(&outpoint)?.is_some() {
                return Ok(Err(TxRuleError::OutputAlreadyExists(outpoint)));
            }
        }

        if is_coinbase {
            return Ok(Ok((Vec::new(), 0)));
        }

        let mut entries = Vec::with_capacity(tx.inputs.len());
        let mut missing = Vec::new();
        for input in tx.inputs.iter() {
            match view.get(&input.previous_outpoint)? {
                Some(entry) => entries.push(entry),
                None => missing.push(input.previous_outpoint),
            }
        }
        if !missing.is_empty() {
            return Ok(Err(TxRuleError::MissingTxOutpoints(missing)));
        }

        let populated = PopulatedTransaction::new(tx, entries);
        let validated = self
            .transaction_validator
            .check_coinbase_maturity(&populated, pov_blue_score)
            .and_then(|_| self.transaction_validator.validate_populated_transaction_and_get_fee(&populated));
        Ok(validated.map(|fee| (populated.entries, fee)))
    }
}
