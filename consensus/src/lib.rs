//! Consensus library for the BlockDAG
//!
//! Validates blocks into a DAG, maintains the virtual UTXO set together with
//! a MuHash commitment per block, and exposes the [`Consensus`] facade.

pub mod consensus;
pub mod errors;
pub mod pipeline;
pub mod process;

pub use consensus::api::{BlockProcessor, ConsensusStateManager, TransactionValidator};
pub use consensus::storage::ConsensusStorage;
pub use consensus::types::{ConfigError, ConsensusConfig};
pub use consensus::Consensus;
pub use consensus_core::Hash;
pub use errors::{ConsensusError, ConsensusResult};
