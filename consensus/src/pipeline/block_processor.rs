//! Block processor for consensus
//!
//! Orchestrates header, body and virtual processing of a block under the
//! consensus write lock. Every store is staged while the block is processed
//! and the stores are committed together once it is fully accepted. Any
//! failure discards all staged data, leaving committed state untouched.

use std::sync::Arc;

use consensus_core::acceptance_data::AcceptanceData;
use consensus_core::block::{Block, TransactionSelector};
use consensus_core::errors::RuleError;
use consensus_core::ghostdag::BlockGhostdagData;
use consensus_core::tx::ScriptPublicKey;
use consensus_core::utxo::UtxoDiff;
use consensus_core::MuHash;
use database::stores::VirtualState;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::body_processor::BodyProcessor;
use super::header_processor::HeaderProcessor;
use super::virtual_processor::VirtualProcessor;
use crate::consensus::api;
use crate::consensus::storage::ConsensusStorage;
use crate::errors::ConsensusResult;
use crate::process::mining::BlockTemplateBuilder;

pub struct DagBlockProcessor {
    storage: Arc<RwLock<ConsensusStorage>>,
    header_processor: HeaderProcessor,
    body_processor: BodyProcessor,
    virtual_processor: VirtualProcessor,
    template_builder: BlockTemplateBuilder,
}

impl DagBlockProcessor {
    pub fn new(
        storage: Arc<RwLock<ConsensusStorage>>,
        header_processor: HeaderProcessor,
        body_processor: BodyProcessor,
        virtual_processor: VirtualProcessor,
        template_builder: BlockTemplateBuilder,
    ) -> Self {
        Self { storage, header_processor, body_processor, virtual_processor, template_builder }
    }

    /// Inserts `genesis` and the initial virtual state into an empty database.
    /// A database that already holds a virtual state is left as is.
    pub fn init(&self, genesis: Block) -> ConsensusResult<()> {
        let mut storage = self.storage.write();
        if storage.virtual_state_store.exists(storage.reader())? {
            debug!("reusing existing consensus state");
            return Ok(());
        }

        let result = self.insert_genesis(&mut storage, genesis);
        if result.is_err() {
            storage.discard_all();
        }
        result
    }

    fn insert_genesis(&self, storage: &mut ConsensusStorage, genesis: Block) -> ConsensusResult<()> {
        let hash = genesis.hash();
        storage.block_store.stage(genesis);
        storage.ghostdag_store.stage(hash, BlockGhostdagData::genesis());
        storage.multiset_store.stage(hash, MuHash::new());
        storage.utxo_diff_store.stage(hash, UtxoDiff::default());
        storage.acceptance_data_store.stage(hash, AcceptanceData::new());

        // Genesis is the selected parent of a virtual block with an empty UTXO set
        let initial = VirtualState {
            tips: Vec::new(),
            parents: vec![hash],
            ghostdag_data: BlockGhostdagData::new(0, hash, vec![hash], Vec::new()),
            utxo_diff: UtxoDiff::default(),
            utxo_commitment: MuHash::new().finalize(),
        };
        self.virtual_processor.update_virtual(storage, &initial, hash, &[])?;
        storage.commit_all()?;
        info!("initialized consensus with genesis {}", hash);
        Ok(())
    }

    fn insert_block(&self, storage: &mut ConsensusStorage, block: Block) -> ConsensusResult<()> {
        let hash = block.hash();
        if storage.block_store.has_block(storage.reader(), &hash)? {
            return Err(RuleError::DuplicateBlock(hash).into());
        }

        self.body_processor.validate_body_in_isolation(&block)?;
        let ghostdag_data = self.header_processor.process_header(storage, &block.header)?;
        self.body_processor.validate_body_in_context(&block, ghostdag_data.blue_score)?;

        let virtual_state = storage.virtual_state_store.get(storage.reader())?;
        let utxo_state = self.virtual_processor.calculate_utxo_state(storage, &virtual_state, &ghostdag_data)?;
        let commitment = utxo_state.multiset.finalize();
        if commitment != block.header.utxo_commitment {
            return Err(RuleError::BadUtxoCommitment(hash, block.header.utxo_commitment, commitment).into());
        }
        debug!("block {} accepts {} mergeset blocks at blue score {}", hash, utxo_state.acceptance_data.len(), ghostdag_data.blue_score);

        let parents = block.header.parents.clone();
        storage.block_store.stage(block);
        storage.ghostdag_store.stage(hash, ghostdag_data);
        storage.multiset_store.stage(hash, utxo_state.multiset);
        storage.utxo_diff_store.stage(hash, utxo_state.utxo_diff);
        storage.acceptance_data_store.stage(hash, utxo_state.acceptance_data);

        self.virtual_processor.update_virtual(storage, &virtual_state, hash, &parents)?;
        storage.commit_all()?;
        Ok(())
    }
}

impl api::BlockProcessor for DagBlockProcessor {
    fn build_block(
        &self,
        coinbase_script: &ScriptPublicKey,
        coinbase_extra_data: &[u8],
        transaction_selector: &mut dyn TransactionSelector,
    ) -> ConsensusResult<Block> {
        let storage = self.storage.read();
        let virtual_state = storage.virtual_state_store.get(storage.reader())?;
        let parents = storage.block_store.blocks(storage.reader(), &virtual_state.parents)?;
        let parents_timestamp = parents.iter().map(|block| block.header.timestamp).max().unwrap_or_default();
        Ok(self.template_builder.build_block_template(
            &virtual_state,
            parents_timestamp,
            coinbase_script,
            coinbase_extra_data,
            transaction_selector,
        ))
    }

    fn validate_and_insert_block(&self, block: Block) -> ConsensusResult<()> {
        let hash = block.hash();
        let mut storage = self.storage.write();
        match self.insert_block(&mut storage, block) {
            Ok(()) => {
                info!("accepted block {}", hash);
                Ok(())
            }
            Err(err) => {
                storage.discard_all();
                warn!("rejected block {}: {}", hash, err);
                Err(err)
            }
        }
    }
}
