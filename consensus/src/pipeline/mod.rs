//! Block processing pipeline for consensus
//!
//! Header checks, body checks and the virtual UTXO update, driven by the
//! block processor.

pub mod block_processor;
pub mod body_processor;
pub mod header_processor;
pub mod virtual_processor;

pub use block_processor::DagBlockProcessor;
pub use body_processor::BodyProcessor;
pub use header_processor::HeaderProcessor;
pub use virtual_processor::{UtxoState, VirtualProcessor};
