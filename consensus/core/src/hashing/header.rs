use super::HasherExtensions;
use crate::header::Header;
use crate::Hash;
use jio_hashes::{BlockHash, Hasher, HasherBase};

/// Returns the header hash. The cached `hash` field itself is excluded.
pub fn hash(header: &Header) -> Hash {
    let mut hasher = BlockHash::new();
    hasher.write_u16(header.version).write_len(header.parents.len());
    for parent in header.parents.iter() {
        hasher.update(parent);
    }
    hasher
        .update(header.hash_merkle_root)
        .update(header.utxo_commitment)
        .write_u64(header.timestamp)
        .write_u32(header.bits)
        .write_u64(header.nonce);
    hasher.finalize()
}
