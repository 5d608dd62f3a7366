//! Block validation for consensus
//!
//! Checks a block can pass without looking at the DAG: structure, coinbase
//! placement, merkle root and per-transaction isolation rules.

use std::collections::HashSet;

use consensus_core::block::Block;
use consensus_core::errors::{BlockProcessResult, RuleError};
use consensus_core::header::Header;
use consensus_core::tx::COINBASE_TRANSACTION_INDEX;

use super::transaction_validator::TransactionRulesValidator;

/// Block validator for consensus rules
#[derive(Debug, Clone)]
pub struct BlockValidator {
    block_version: u16,
    max_block_parents: usize,
    max_block_transactions: usize,
    transaction_validator: TransactionRulesValidator,
}

impl BlockValidator {
    pub fn new(
        block_version: u16,
        max_block_parents: usize,
        max_block_transactions: usize,
        transaction_validator: TransactionRulesValidator,
    ) -> Self {
        Self { block_version, max_block_parents, max_block_transactions, transaction_validator }
    }

    pub fn validate_block_in_isolation(&self, block: &Block) -> BlockProcessResult<()> {
        self.validate_header_in_isolation(&block.header)?;
        self.validate_transactions_layout(block)?;
        self.validate_transactions_in_isolation(block)?;
        self.validate_merkle_root(block)?;
        self.validate_no_duplicate_transactions(block)
    }

    fn validate_header_in_isolation(&self, header: &Header) -> BlockProcessResult<()> {
        if header.version != self.block_version {
            return Err(RuleError::WrongBlockVersion(header.version, self.block_version));
        }
        if header.parents.is_empty() {
            return Err(RuleError::NoParents);
        }
        if header.parents.len() > self.max_block_parents {
            return Err(RuleError::TooManyParents(header.parents.len(), self.max_block_parents));
        }
        let mut seen = HashSet::with_capacity(header.parents.len());
        for parent in header.parents.iter() {
            if !seen.insert(*parent) {
                return Err(RuleError::DuplicateParent(*parent));
            }
        }
        Ok(())
    }

    fn validate_transactions_layout(&self, block: &Block) -> BlockProcessResult<()> {
        let Some(coinbase) = block.coinbase() else {
            return Err(RuleError::NoTransactions);
        };
        if block.transactions.len() > self.max_block_transactions {
            return Err(RuleError::TooManyTransactions(block.transactions.len(), self.max_block_transactions));
        }
        if !coinbase.is_coinbase() {
            return Err(RuleError::FirstTxNotCoinbase);
        }
        if let Some(i) = block.transactions.iter().skip(COINBASE_TRANSACTION_INDEX + 1).position(|tx| tx.is_coinbase()) {
            return Err(RuleError::MultipleCoinbases(i + 1));
        }
        Ok(())
    }

    fn validate_transactions_in_isolation(&self, block: &Block) -> BlockProcessResult<()> {
        for (i, tx) in block.transactions.iter().enumerate() {
            self.transaction_validator
                .validate_tx_in_isolation(tx)
                .map_err(|err| RuleError::TxInIsolationValidationFailed(i, err))?;
        }
        Ok(())
    }

    fn validate_merkle_root(&self, block: &Block) -> BlockProcessResult<()> {
        let calculated = block.calc_hash_merkle_root();
        if calculated != block.header.hash_merkle_root {
            return Err(RuleError::BadMerkleRoot(block.header.hash_merkle_root, calculated));
        }
        Ok(())
    }

    fn validate_no_duplicate_transactions(&self, block: &Block) -> BlockProcessResult<()> {
        let mut ids = HashSet::with_capacity(block.transactions.len());
        for tx in block.transactions.iter() {
            if !ids.insert(tx.id()) {
                return Err(RuleError::DuplicateTransactions(tx.id()));
            }
        }
        Ok(())
    }

    /// A block must be younger than every one of its parents
    pub fn check_timestamp_after_parents(&self, header: &Header, parent_headers: &[&Header]) -> BlockProcessResult<()> {
        let latest = parent_headers.iter().map(|h| h.timestamp).max().unwrap_or(0);
        if header.timestamp <= latest {
            return Err(RuleError::TimestampNotAfterParents(header.timestamp, latest));
        }
        Ok(())
    }
}
