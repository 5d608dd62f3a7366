use crate::{tx::Transaction, Hash, ZERO_HASH};
use jio_hashes::{Hasher, HasherBase, MerkleBranchHash};

/// Computes the merkle root over the ids of `transactions`, in block order.
pub fn calc_hash_merkle_root<'a>(transactions: impl ExactSizeIterator<Item = &'a Transaction>) -> Hash {
    calc_merkle_root(transactions.map(|tx| tx.id()))
}

/// Folds leaves pairwise level by level. An odd node is paired with itself and an
/// empty leaf list yields the zero hash.
pub fn calc_merkle_root(hashes: impl ExactSizeIterator<Item = Hash>) -> Hash {
    if hashes.len() == 0 {
        return ZERO_HASH;
    }

    let mut level: Vec<Hash> = hashes.collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|chunk| {
                let left = chunk[0];
                let right = if chunk.len() == 2 { chunk[1] } else { left };
                merkle_hash(left, right)
            })
            .collect();
    }
    level[0]
}

fn merkle_hash(left: Hash, right: Hash) -> Hash {
    let mut hasher = MerkleBranchHash::new();
    hasher.update(left).update(right);
    hasher.finalize()
}
