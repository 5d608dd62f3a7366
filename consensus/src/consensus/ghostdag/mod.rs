//! GHOSTDAG collaborator
//!
//! Produces the per-block data the UTXO pipeline consumes: selected parent,
//! blue score and a deterministic mergeset order.

pub mod manager;

pub use manager::GhostdagManager;
