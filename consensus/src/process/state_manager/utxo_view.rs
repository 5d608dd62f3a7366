//! Read-only views of UTXO sets

use consensus_core::tx::{TransactionOutpoint, UtxoEntry};
use consensus_core::utxo::UtxoDiff;
use database::StoreResultExtensions;

use crate::consensus::storage::ConsensusStorage;
use crate::errors::ConsensusResult;

pub trait UtxoView {
    /// `Ok(None)` when the outpoint is not part of the set
    fn get(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>>;
}

/// The virtual UTXO set as held by the UTXO set store, staged changes included
pub struct VirtualUtxoView<'a> {
    storage: &'a ConsensusStorage,
}

impl<'a> VirtualUtxoView<'a> {
    pub fn new(storage: &'a ConsensusStorage) -> Self {
        Self { storage }
    }
}

impl UtxoView for VirtualUtxoView<'_> {
    fn get(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
        Ok(self.storage.utxo_set_store.get(self.storage.reader(), outpoint).optional()?)
    }
}

/// `base` with `diff` applied on top
pub struct DiffUtxoView<'a, V: ?Sized> {
    base: &'a V,
    diff: &'a UtxoDiff,
}

impl<'a, V: UtxoView + ?Sized> DiffUtxoView<'a, V> {
    pub fn new(base: &'a V, diff: &'a UtxoDiff) -> Self {
        Self { base, diff }
    }
}

impl<V: UtxoView + ?Sized> UtxoView for DiffUtxoView<'_, V> {
    fn get(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
        if let Some(entry) = self.diff.add.get(outpoint) {
            return Ok(Some(entry.clone()));
        }
        if self.diff.remove.contains(outpoint) {
            return Ok(None);
        }
        self.base.get(outpoint)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use consensus_core::tx::ScriptPublicKey;
    use consensus_core::utxo::UtxoCollection;
    use consensus_core::Hash;

    /// In-memory view for tests
    pub struct CollectionView(pub UtxoCollection);

    impl UtxoView for CollectionView {
        fn get(&self, outpoint: &TransactionOutpoint) -> ConsensusResult<Option<UtxoEntry>> {
            Ok(self.0.get(outpoint).cloned())
        }
    }

    fn outpoint(i: u64) -> TransactionOutpoint {
        TransactionOutpoint::new(Hash::from_u64_word(i), 0)
    }

    fn entry(amount: u64) -> UtxoEntry {
        UtxoEntry::new(amount, ScriptPublicKey::from_vec(0, vec![0x51]), 0, false)
    }

    #[test]
    fn test_diff_shadows_base() {
        let base = CollectionView([(outpoint(1), entry(1)), (outpoint(2), entry(2))].into_iter().collect());
        let mut diff = UtxoDiff::default();
        diff.remove_entry(outpoint(1), entry(1)).unwrap();
        diff.remove_entry(outpoint(2), entry(2)).unwrap();
        diff.add_entry(outpoint(2), entry(20)).unwrap();
        diff.add_entry(outpoint(3), entry(3)).unwrap();

        let view = DiffUtxoView::new(&base, &diff);
        assert_eq!(view.get(&outpoint(1)).unwrap(), None);
        assert_eq!(view.get(&outpoint(2)).unwrap(), Some(entry(20)));
        assert_eq!(view.get(&outpoint(3)).unwrap(), Some(entry(3)));
        assert_eq!(view.get(&outpoint(4)).unwrap(), None);
    }
}
