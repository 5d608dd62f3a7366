use std::collections::HashSet;

use crate::{BincodeCodec, DbBucket, DbError, DbReader, DbResult, DbWriter, StagedStore, StoreKey};
use consensus_core::{
    tx::{TransactionOutpoint, UtxoEntry},
    utxo::UtxoDiff,
};
use tracing::trace;

pub const VIRTUAL_UTXO_SET_BUCKET: DbBucket = DbBucket::new(b"virtual-utxo-set");

/// The UTXO set of the virtual block, keyed by outpoint. Besides staged entries it
/// stages removals, so applying a diff lands in the same outer transaction as
/// every other store.
pub struct UtxoSetStore {
    additions: StagedStore<TransactionOutpoint, UtxoEntry, BincodeCodec>,
    removals: HashSet<TransactionOutpoint>,
}

impl UtxoSetStore {
    pub fn new() -> Self {
        Self { additions: StagedStore::new(VIRTUAL_UTXO_SET_BUCKET, BincodeCodec), removals: HashSet::new() }
    }

    /// Stages the effect of `diff`: removals first, then additions
    pub fn stage_diff(&mut self, diff: &UtxoDiff) {
        for (outpoint, _) in diff.remove.iter() {
            self.additions.unstage(outpoint);
            self.removals.insert(*outpoint);
        }
        for (outpoint, entry) in diff.add.iter() {
            self.additions.stage(*outpoint, entry.clone());
        }
        trace!("staged utxo diff with {} additions and {} removals", diff.add.len(), diff.remove.len());
    }

    pub fn is_staged(&self) -> bool {
        self.additions.is_staged() || !self.removals.is_empty()
    }

    pub fn discard(&mut self) {
        self.additions.discard();
        self.removals.clear();
    }

    /// Issues deletes for staged removals, then puts for staged additions
    pub fn commit<W: DbWriter + ?Sized>(&mut self, writer: &mut W) -> DbResult<()> {
        for outpoint in self.removals.iter() {
            writer.delete(&VIRTUAL_UTXO_SET_BUCKET.key(outpoint.key_bytes()))?;
        }
        self.additions.commit(writer)?;
        self.removals.clear();
        Ok(())
    }

    pub fn get<R: DbReader + ?Sized>(&self, reader: &R, outpoint: &TransactionOutpoint) -> DbResult<UtxoEntry> {
        if let Some(entry) = self.additions.staged(outpoint) {
            return Ok(entry.clone());
        }
        if self.removals.contains(outpoint) {
            return Err(DbError::NotFound(format!("{outpoint} is staged for removal")));
        }
        self.additions.get(reader, outpoint)
    }

    pub fn has<R: DbReader + ?Sized>(&self, reader: &R, outpoint: &TransactionOutpoint) -> DbResult<bool> {
        if self.additions.staged(outpoint).is_some() {
            return Ok(true);
        }
        if self.removals.contains(outpoint) {
            return Ok(false);
        }
        self.additions.has(reader, outpoint)
    }
}

impl Default for UtxoSetStore {
    fn default() -> Self {
        Self::new()
    }
}
