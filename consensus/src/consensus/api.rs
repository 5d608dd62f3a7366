//! Collaborators the [`Consensus`](super::Consensus) facade delegates to

use consensus_core::{
    block::{Block, TransactionSelector},
    tx::{ScriptPublicKey, Transaction, TransactionOutpoint, UtxoEntry},
};

use crate::errors::ConsensusResult;

pub trait BlockProcessor: Send + Sync {
    /// Assembles a block template on top of the current virtual state. The result is a proposal and is not validated.
    fn build_block(
        &self,
        coinbase_script: &ScriptPublicKey,
        coinbase_extra_data: &[u8],
        transaction_selector: &mut dyn TransactionSelector,
    ) -> ConsensusResult<Block>;

    /// Validates `block` and applies its effects. A failure leaves committed state untouched.
    fn validate_and_insert_block(&self, block: Block) -> ConsensusResult<()>;
}

pub trait ConsensusStateManager: Send + Sync {
    /// Looks `outpoint` up in the virtual UTXO set
    fn utxo_by_outpoint(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>>;
}

pub trait TransactionValidator: Send + Sync {
    /// Validates `transaction` against the entries it spends (in input order) and returns its fee
    fn validate_transaction_and_calculate_fee(&self, transaction: &Transaction, utxo_entries: &[UtxoEntry]) -> ConsensusResult<u64>;
}
