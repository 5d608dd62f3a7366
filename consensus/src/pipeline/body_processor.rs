//! Body processor for consensus
//!
//! Validates the transactions of a block, alone and against its GHOSTDAG data.

use consensus_core::block::Block;
use consensus_core::errors::{BlockProcessResult, RuleError};

use crate::consensus::validation::BlockValidator;
use crate::process::coinbase::CoinbaseManager;

pub struct BodyProcessor {
    block_validator: BlockValidator,
    coinbase_manager: CoinbaseManager,
}

impl BodyProcessor {
    pub fn new(block_validator: BlockValidator, coinbase_manager: CoinbaseManager) -> Self {
        Self { block_validator, coinbase_manager }
    }

    pub fn validate_body_in_isolation(&self, block: &Block) -> BlockProcessResult<()> {
        self.block_validator.validate_block_in_isolation(block)
    }

    /// The coinbase must commit to the blue score GHOSTDAG assigned to the block
    pub fn validate_body_in_context(&self, block: &Block, blue_score: u64) -> BlockProcessResult<()> {
        let coinbase = block.coinbase().ok_or(RuleError::NoTransactions)?;
        self.coinbase_manager.validate_coinbase(coinbase, blue_score)
    }
}
