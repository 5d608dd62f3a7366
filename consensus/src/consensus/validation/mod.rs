//! Validation module for consensus
//!
//! Context-free block and transaction rules. Rules that need the DAG or the
//! UTXO set live with the block processor and the state manager.

pub mod block_validator;
pub mod transaction_validator;

pub use block_validator::BlockValidator;
pub use transaction_validator::TransactionRulesValidator;
