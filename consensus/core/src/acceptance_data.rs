use crate::{
    tx::{Transaction, UtxoEntry},
    Hash,
};
use serde::{Deserialize, Serialize};

/// Acceptance results of a block's mergeset, one entry per mergeset block in consensus order
pub type AcceptanceData = Vec<BlockAcceptanceData>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAcceptanceData {
    pub block_hash: Hash,
    /// One entry per transaction of `block_hash`, in block order
    pub transaction_acceptance_data: Vec<TransactionAcceptanceData>,
}

impl BlockAcceptanceData {
    pub fn new(block_hash: Hash, transaction_acceptance_data: Vec<TransactionAcceptanceData>) -> Self {
        Self { block_hash, transaction_acceptance_data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAcceptanceData {
    pub transaction: Transaction,
    pub fee: u64,
    pub is_accepted: bool,
    /// Entries spent by the transaction inputs, in input order. Empty when not accepted
    pub transaction_input_utxo_entries: Vec<UtxoEntry>,
}

impl TransactionAcceptanceData {
    pub fn accepted(transaction: Transaction, fee: u64, transaction_input_utxo_entries: Vec<UtxoEntry>) -> Self {
        Self { transaction, fee, is_accepted: true, transaction_input_utxo_entries }
    }

    pub fn rejected(transaction: Transaction) -> Self {
        Self { transaction, fee: 0, is_accepted: false, transaction_input_utxo_entries: Vec::new() }
    }
}
