use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::{UtxoAlgebraError, UtxoCollection, UtxoResult};
use crate::tx::{Transaction, TransactionOutpoint, UtxoEntry};

/// Changes to a UTXO set: applying the diff removes every entry of `remove` and then
/// inserts every entry of `add`. An outpoint may appear in both sides when an entry
/// is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UtxoDiff {
    pub add: UtxoCollection,
    pub remove: UtxoCollection,
}

impl UtxoDiff {
    pub fn new(add: UtxoCollection, remove: UtxoCollection) -> Self {
        Self { add, remove }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Records the creation of `outpoint`
    pub fn add_entry(&mut self, outpoint: TransactionOutpoint, entry: UtxoEntry) -> UtxoResult<()> {
        if self.add.contains(&outpoint) {
            return Err(UtxoAlgebraError::DoubleAddition(outpoint));
        }
        if self.remove.contains_with_entry(&outpoint, &entry) {
            self.remove.remove(&outpoint);
        } else {
            self.add.insert(outpoint, entry);
        }
        Ok(())
    }

    /// Records the spending of `outpoint`
    pub fn remove_entry(&mut self, outpoint: TransactionOutpoint, entry: UtxoEntry) -> UtxoResult<()> {
        if self.add.contains_with_entry(&outpoint, &entry) {
            self.add.remove(&outpoint);
        } else if self.add.contains(&outpoint) {
            return Err(UtxoAlgebraError::MismatchedEntry(outpoint));
        } else if self.remove.contains(&outpoint) {
            return Err(UtxoAlgebraError::DoubleRemoval(outpoint));
        } else {
            self.remove.insert(outpoint, entry);
        }
        Ok(())
    }

    /// Composes `other` on top of self, so that applying the result equals applying self then `other`
    pub fn with_diff_in_place(&mut self, other: &UtxoDiff) -> UtxoResult<()> {
        for (outpoint, entry) in other.remove.iter() {
            self.remove_entry(*outpoint, entry.clone())?;
        }
        for (outpoint, entry) in other.add.iter() {
            self.add_entry(*outpoint, entry.clone())?;
        }
        Ok(())
    }

    pub fn with_diff(&self, other: &UtxoDiff) -> UtxoResult<UtxoDiff> {
        let mut clone = self.clone();
        clone.with_diff_in_place(other)?;
        Ok(clone)
    }

    /// Returns the diff undoing self
    pub fn reversed(&self) -> UtxoDiff {
        Self { add: self.remove.clone(), remove: self.add.clone() }
    }

    /// Spends the inputs of `tx` (with `entries` in input order) and creates its outputs
    /// stamped with `block_blue_score`
    pub fn add_transaction(&mut self, tx: &Transaction, entries: &[UtxoEntry], block_blue_score: u64, is_coinbase: bool) -> UtxoResult<()> {
        for (input, entry) in tx.inputs.iter().zip(entries.iter()) {
            self.remove_entry(input.previous_outpoint, entry.clone())?;
        }

        let tx_id = tx.id();
        for (index, output) in tx.outputs.iter().enumerate() {
            let outpoint = TransactionOutpoint::new(tx_id, index as u32);
            let entry = UtxoEntry::new(output.value, output.script_public_key.clone(), block_blue_score, is_coinbase);
            self.add_entry(outpoint, entry)?;
        }
        Ok(())
    }
}
