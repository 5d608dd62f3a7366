//! Header processor for consensus
//!
//! Checks a header against the DAG it extends and computes its GHOSTDAG data.

use consensus_core::errors::RuleError;
use consensus_core::ghostdag::BlockGhostdagData;
use consensus_core::header::Header;
use consensus_core::Hash;

use crate::consensus::ghostdag::GhostdagManager;
use crate::consensus::storage::ConsensusStorage;
use crate::consensus::validation::BlockValidator;
use crate::errors::ConsensusResult;

pub struct HeaderProcessor {
    block_validator: BlockValidator,
    ghostdag_manager: GhostdagManager,
}

impl HeaderProcessor {
    pub fn new(block_validator: BlockValidator, ghostdag_manager: GhostdagManager) -> Self {
        Self { block_validator, ghostdag_manager }
    }

    /// Every parent must already be in the DAG. Returns the GHOSTDAG data of the header.
    pub fn process_header(&self, storage: &ConsensusStorage, header: &Header) -> ConsensusResult<BlockGhostdagData> {
        self.check_parents_exist(storage, header)?;

        let parents = storage.block_store.blocks(storage.reader(), &header.parents)?;
        let parent_headers = parents.iter().map(|block| &block.header).collect::<Vec<_>>();
        self.block_validator.check_timestamp_after_parents(header, &parent_headers)?;

        self.ghostdag_manager.ghostdag(storage, &header.parents)
    }

    fn check_parents_exist(&self, storage: &ConsensusStorage, header: &Header) -> ConsensusResult<()> {
        let mut missing: Vec<Hash> = Vec::new();
        for parent in header.parents.iter() {
            if !storage.block_store.has_block(storage.reader(), parent)? {
                missing.push(*parent);
            }
        }
        if !missing.is_empty() {
            return Err(RuleError::MissingParents(missing).into());
        }
        Ok(())
    }
}
