use crate::{BincodeCodec, DbBucket, DbReader, DbResult, DbWriter, StagedStore};
use consensus_core::{ghostdag::BlockGhostdagData, utxo::UtxoDiff, Hash};
use serde::{Deserialize, Serialize};

pub const VIRTUAL_STATE_BUCKET: DbBucket = DbBucket::new(b"virtual-state");

/// State of the virtual block, the hypothetical block merging every current tip
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualState {
    /// Blocks without children
    pub tips: Vec<Hash>,
    /// The tips the virtual block points at, best first
    pub parents: Vec<Hash>,
    pub ghostdag_data: BlockGhostdagData,
    /// Diff from the UTXO view of the virtual selected parent to the virtual UTXO set
    pub utxo_diff: UtxoDiff,
    /// Commitment of the UTXO view of the virtual block, carried by new block templates
    pub utxo_commitment: Hash,
}

pub struct VirtualStateStore {
    inner: StagedStore<(), VirtualState, BincodeCodec>,
}

impl VirtualStateStore {
    pub fn new() -> Self {
        Self { inner: StagedStore::new(VIRTUAL_STATE_BUCKET, BincodeCodec) }
    }

    pub fn stage(&mut self, state: VirtualState) {
        self.inner.stage((), state);
    }

    pub fn is_staged(&self) -> bool {
        self.inner.is_staged()
    }

    pub fn discard(&mut self) {
        self.inner.discard();
    }

    pub fn commit<W: DbWriter + ?Sized>(&mut self, writer: &mut W) -> DbResult<()> {
        self.inner.commit(writer)
    }

    pub fn get<R: DbReader + ?Sized>(&self, reader: &R) -> DbResult<VirtualState> {
        self.inner.get(reader, &())
    }

    pub fn exists<R: DbReader + ?Sized>(&self, reader: &R) -> DbResult<bool> {
        self.inner.has(reader, &())
    }
}

impl Default for VirtualStateStore {
    fn default() -> Self {
        Self::new()
    }
}
