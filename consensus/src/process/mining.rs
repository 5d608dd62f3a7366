//! Block templates
//!
//! A template extends the virtual block: it points at the virtual parents, pays
//! the virtual blue score in its coinbase and carries the commitment of the
//! virtual UTXO view, which is exactly what its own insertion will compute.

use std::time::{SystemTime, UNIX_EPOCH};

use consensus_core::block::{Block, TransactionSelector};
use consensus_core::header::Header;
use consensus_core::merkle::calc_hash_merkle_root;
use consensus_core::tx::ScriptPublicKey;
use database::stores::VirtualState;
use tracing::debug;

use super::coinbase::CoinbaseManager;

pub struct BlockTemplateBuilder {
    coinbase_manager: CoinbaseManager,
    max_block_transactions: usize,
    block_version: u16,
    bits: u32,
}

impl BlockTemplateBuilder {
    pub fn new(coinbase_manager: CoinbaseManager, max_block_transactions: usize, block_version: u16, bits: u32) -> Self {
        Self { coinbase_manager, max_block_transactions, block_version, bits }
    }

    /// `parents_timestamp` is the latest timestamp among the virtual parents
    pub fn build_block_template(
        &self,
        virtual_state: &VirtualState,
        parents_timestamp: u64,
        coinbase_script: &ScriptPublicKey,
        coinbase_extra_data: &[u8],
        transaction_selector: &mut dyn TransactionSelector,
    ) -> Block {
        let blue_score = virtual_state.ghostdag_data.blue_score;
        let coinbase = self.coinbase_manager.expected_coinbase_transaction(blue_score, coinbase_script, coinbase_extra_data);

        let mut transactions = vec![coinbase];
        let mut selected = transaction_selector.select_transactions();
        selected.truncate(self.max_block_transactions.saturating_sub(1));
        transactions.extend(selected);

        let timestamp = unix_now().max(parents_timestamp + 1);
        let header = Header::new_finalized(
            self.block_version,
            virtual_state.parents.clone(),
            calc_hash_merkle_root(transactions.iter()),
            virtual_state.utxo_commitment,
            timestamp,
            self.bits,
            0,
        );
        debug!("built template {} with {} transactions at blue score {}", header.hash, transactions.len(), blue_score);
        Block::new(header, transactions)
    }
}

/// Milliseconds since the unix epoch
fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}
