//! Processes backing the consensus pipeline: coinbase rules, block templates
//! and UTXO state management.

pub mod coinbase;
pub mod mining;
pub mod state_manager;

pub use coinbase::CoinbaseManager;
pub use mining::BlockTemplateBuilder;
pub use state_manager::StateManager;
