//! Consensus facade
//!
//! [`Consensus`] exposes the four operations external callers may invoke and
//! hands each one to a single collaborator, adding nothing of its own.

pub mod api;
pub mod ghostdag;
pub mod storage;
pub mod types;
pub mod validation;

use std::sync::Arc;

use consensus_core::block::{Block, TransactionSelector};
use consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutpoint, UtxoEntry};
use database::KeyValueDb;
use parking_lot::RwLock;

use crate::errors::ConsensusResult;
use crate::pipeline::{BodyProcessor, DagBlockProcessor, HeaderProcessor, VirtualProcessor};
use crate::process::{BlockTemplateBuilder, CoinbaseManager, StateManager};
use api::{BlockProcessor, ConsensusStateManager, TransactionValidator};
use ghostdag::GhostdagManager;
use storage::ConsensusStorage;
use types::ConsensusConfig;
use validation::{BlockValidator, TransactionRulesValidator};

pub struct Consensus {
    block_processor: Arc<dyn BlockProcessor>,
    state_manager: Arc<dyn ConsensusStateManager>,
    transaction_validator: Arc<dyn TransactionValidator>,
}

impl Consensus {
    /// Wires the consensus over `db`. A fresh database is initialized with the configured genesis.
    pub fn new(db: Arc<dyn KeyValueDb>, config: ConsensusConfig) -> ConsensusResult<Self> {
        let storage = Arc::new(RwLock::new(ConsensusStorage::new(db)));

        let transaction_validator = TransactionRulesValidator::new(config.coinbase_maturity);
        let block_validator = BlockValidator::new(
            config.block_version,
            config.max_block_parents,
            config.max_block_transactions,
            transaction_validator.clone(),
        );
        let coinbase_manager = CoinbaseManager::new(config.block_subsidy);
        let ghostdag_manager = GhostdagManager::new();
        let state_manager = Arc::new(StateManager::new(storage.clone(), transaction_validator.clone()));

        let block_processor = DagBlockProcessor::new(
            storage,
            HeaderProcessor::new(block_validator.clone(), ghostdag_manager),
            BodyProcessor::new(block_validator, coinbase_manager.clone()),
            VirtualProcessor::new(ghostdag_manager, state_manager.clone(), config.max_block_parents),
            BlockTemplateBuilder::new(coinbase_manager, config.max_block_transactions, config.block_version, config.genesis_bits),
        );
        block_processor.init(config.genesis().build())?;

        Ok(Self::from_parts(Arc::new(block_processor), state_manager, Arc::new(transaction_validator)))
    }

    pub fn from_parts(
        block_processor: Arc<dyn BlockProcessor>,
        state_manager: Arc<dyn ConsensusStateManager>,
        transaction_validator: Arc<dyn TransactionValidator>,
    ) -> Self {
        Self { block_processor, state_manager, transaction_validator }
    }

    /// Assembles a block template over the current virtual state. The template is not validated.
    pub fn build_block(
        &self,
        coinbase_script: &ScriptPublicKey,
        coinbase_extra_data: &[u8],
        transaction_selector: &mut dyn TransactionSelector,
    ) -> ConsensusResult<Block> {
        self.block_processor.build_block(coinbase_script, coinbase_extra_data, transaction_selector)
    }

    pub fn validate_and_insert_block(&self, block: Block) -> ConsensusResult<()> {
        self.block_processor.validate_and_insert_block(block)
    }

    /// `Ok(None)` when the outpoint is not in the virtual UTXO set
    pub fn utxo_by_outpoint(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
        self.state_manager.utxo_by_outpoint(outpoint)
    }

    /// Read-only: nothing is stored
    pub fn validate_transaction_and_calculate_fee(&self, transaction: &Transaction, utxo_entries: &[UtxoEntry]) -> ConsensusResult<u64> {
        self.transaction_validator.validate_transaction_and_calculate_fee(transaction, utxo_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::block::StaticTransactionSelector;
    use consensus_core::config::genesis::GENESIS;
    use consensus_core::errors::{RuleError, TxRuleError};
    use consensus_core::Hash;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Calls(Mutex<Vec<&'static str>>);

    impl Calls {
        fn push(&self, call: &'static str) {
            self.0.lock().push(call);
        }
    }

    struct MockBlockProcessor(Arc<Calls>);

    impl BlockProcessor for MockBlockProcessor {
        fn build_block(&self, _: &ScriptPublicKey, _: &[u8], selector: &mut dyn TransactionSelector) -> ConsensusResult<Block> {
            self.0.push("build_block");
            let mut block = GENESIS.build();
            block.transactions.extend(selector.select_transactions());
            Ok(block)
        }

        fn validate_and_insert_block(&self, _: Block) -> ConsensusResult<()> {
            self.0.push("validate_and_insert_block");
            Err(RuleError::NoParents.into())
        }
    }

    struct MockStateManager(Arc<Calls>);

    impl ConsensusStateManager for MockStateManager {
        fn utxo_by_outpoint(&self, _: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
            self.0.push("utxo_by_outpoint");
            Ok(None)
        }
    }

    struct MockTransactionValidator(Arc<Calls>);

    impl TransactionValidator for MockTransactionValidator {
        fn validate_transaction_and_calculate_fee(&self, _: &Transaction, entries: &[UtxoEntry]) -> ConsensusResult<u64> {
            self.0.push("validate_transaction_and_calculate_fee");
            if entries.is_empty() {
                return Err(TxRuleError::NoTxInputs.into());
            }
            Ok(entries.len() as u64)
        }
    }

    #[test]
    fn test_each_operation_reaches_exactly_one_collaborator() {
        let calls = Arc::new(Calls::default());
        let consensus = Consensus::from_parts(
            Arc::new(MockBlockProcessor(calls.clone())),
            Arc::new(MockStateManager(calls.clone())),
            Arc::new(MockTransactionValidator(calls.clone())),
        );

        let block = consensus
            .build_block(&ScriptPublicKey::default(), &[], &mut StaticTransactionSelector::new(vec![Transaction::default()]))
            .unwrap();
        assert_eq!(block.transactions.len(), 2);

        let err = consensus.validate_and_insert_block(block).unwrap_err();
        assert_eq!(err.as_rule_error(), Some(&RuleError::NoParents));

        let outpoint = TransactionOutpoint::new(Hash::from_u64_word(1), 0);
        assert_eq!(consensus.utxo_by_outpoint(&outpoint).unwrap(), None);

        let entry = UtxoEntry::new(1, ScriptPublicKey::default(), 0, false);
        assert_eq!(consensus.validate_transaction_and_calculate_fee(&Transaction::default(), &[entry.clone(), entry]).unwrap(), 2);
        assert!(matches!(
            consensus.validate_transaction_and_calculate_fee(&Transaction::default(), &[]),
            Err(crate::errors::ConsensusError::Tx(TxRuleError::NoTxInputs))
        ));

        assert_eq!(
            *calls.0.lock(),
            vec![
                "build_block",
                "validate_and_insert_block",
                "utxo_by_outpoint",
                "validate_transaction_and_calculate_fee",
                "validate_transaction_and_calculate_fee"
            ]
        );
    }
}
