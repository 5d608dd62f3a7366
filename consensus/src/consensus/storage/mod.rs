pub mod consensus_db;

pub use consensus_db::ConsensusStorage;
