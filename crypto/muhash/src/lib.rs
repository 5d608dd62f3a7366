//! MuHash3072 multiset accumulator for UTXO set commitments.
//!
//! Elements are mapped to integers modulo the prime `2^3072 - 1103717`. Adding an
//! element multiplies it into the numerator, removing multiplies it into the
//! denominator, so the final value only depends on the multiset of operations and
//! never on their order.

use std::sync::OnceLock;

use jio_hashes::{Hash, Hasher, HasherBase, MuHashElementHash, MuHashFinalizeHash};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

/// Byte width of a single 3072-bit number.
pub const ELEMENT_BYTE_SIZE: usize = 384;

/// Byte width of a serialized accumulator (numerator followed by denominator).
pub const SERIALIZED_MUHASH_SIZE: usize = ELEMENT_BYTE_SIZE * 2;

const PRIME_DIFF: u32 = 1103717;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MuHashError {
    #[error("expected {SERIALIZED_MUHASH_SIZE} bytes, got {0}")]
    InvalidLength(usize),

    #[error("serialized {0} is not reduced modulo the field prime")]
    Overflow(&'static str),

    #[error("serialized {0} is zero")]
    Zero(&'static str),
}

fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| (BigUint::one() << 3072) - BigUint::from(PRIME_DIFF))
}

/// Maps arbitrary bytes to a field element: a domain separated digest expanded to
/// 384 bytes with the blake3 XOF.
fn data_to_num3072(data: &[u8]) -> BigUint {
    let digest = MuHashElementHash::hash(data);
    let mut expanded = [0u8; ELEMENT_BYTE_SIZE];
    blake3::Hasher::new().update(digest.as_bytes()).finalize_xof().fill(&mut expanded);
    reduce_to_element(&expanded)
}

/// Elements must be invertible, so a residue of zero is taken as one
fn reduce_to_element(bytes: &[u8; ELEMENT_BYTE_SIZE]) -> BigUint {
    let value = BigUint::from_bytes_le(bytes) % modulus();
    if value.is_zero() {
        BigUint::one()
    } else {
        value
    }
}

fn to_fixed_le(value: &BigUint) -> [u8; ELEMENT_BYTE_SIZE] {
    let mut out = [0u8; ELEMENT_BYTE_SIZE];
    let bytes = value.to_bytes_le();
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

#[derive(Clone, Debug)]
pub struct MuHash {
    numerator: BigUint,
    denominator: BigUint,
}

impl MuHash {
    /// The accumulator of the empty set.
    pub fn new() -> Self {
        Self { numerator: BigUint::one(), denominator: BigUint::one() }
    }

    pub fn add_element(&mut self, data: &[u8]) {
        self.numerator = (&self.numerator * data_to_num3072(data)) % modulus();
    }

    pub fn remove_element(&mut self, data: &[u8]) {
        self.denominator = (&self.denominator * data_to_num3072(data)) % modulus();
    }

    /// Merges the elements of `other` into `self`.
    pub fn combine(&mut self, other: &MuHash) {
        self.numerator = (&self.numerator * &other.numerator) % modulus();
        self.denominator = (&self.denominator * &other.denominator) % modulus();
    }

    /// Folds the denominator into the numerator. Does not change the represented set.
    pub fn normalize(&mut self) {
        if self.denominator.is_one() {
            return;
        }
        self.numerator = self.value();
        self.denominator = BigUint::one();
    }

    fn value(&self) -> BigUint {
        let p = modulus();
        let inverse = self.denominator.modpow(&(p - 2u32), p);
        (&self.numerator * inverse) % p
    }

    /// The 32-byte digest committing to the accumulated multiset.
    pub fn finalize(&self) -> Hash {
        let mut hasher = MuHashFinalizeHash::new();
        hasher.update(to_fixed_le(&self.value()));
        hasher.finalize()
    }

    pub fn serialize(&self) -> [u8; SERIALIZED_MUHASH_SIZE] {
        let mut out = [0u8; SERIALIZED_MUHASH_SIZE];
        out[..ELEMENT_BYTE_SIZE].copy_from_slice(&to_fixed_le(&self.numerator));
        out[ELEMENT_BYTE_SIZE..].copy_from_slice(&to_fixed_le(&self.denominator));
        out
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, MuHashError> {
        if bytes.len() != SERIALIZED_MUHASH_SIZE {
            return Err(MuHashError::InvalidLength(bytes.len()));
        }
        let numerator = Self::read_element(&bytes[..ELEMENT_BYTE_SIZE], "numerator")?;
        let denominator = Self::read_element(&bytes[ELEMENT_BYTE_SIZE..], "denominator")?;
        Ok(Self { numerator, denominator })
    }

    fn read_element(bytes: &[u8], name: &'static str) -> Result<BigUint, MuHashError> {
        let value = BigUint::from_bytes_le(bytes);
        if &value >= modulus() {
            return Err(MuHashError::Overflow(name));
        }
        if value.is_zero() {
            return Err(MuHashError::Zero(name));
        }
        Ok(value)
    }
}

impl Default for MuHash {
    fn default() -> Self {
        Self::new()
    }
}

/// Two accumulators are equal when they represent the same multiset, regardless of
/// whether they have been normalized.
impl PartialEq for MuHash {
    fn eq(&self, other: &Self) -> bool {
        let p = modulus();
        (&self.numerator * &other.denominator) % p == (&other.numerator * &self.denominator) % p
    }
}

impl Eq for MuHash {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, SeedableRng};

    fn element(i: u8) -> Vec<u8> {
        vec![i; 40]
    }

    #[test]
    fn test_zero_residue_maps_to_one() {
        assert_eq!(reduce_to_element(&to_fixed_le(modulus())), BigUint::one());
        assert_eq!(reduce_to_element(&[0u8; ELEMENT_BYTE_SIZE]), BigUint::one());

        let mut two = [0u8; ELEMENT_BYTE_SIZE];
        two[0] = 2;
        assert_eq!(reduce_to_element(&two), BigUint::from(2u8));
    }

    #[test]
    fn test_empty_set_is_stable() {
        assert_eq!(MuHash::new().finalize(), MuHash::default().finalize());
        assert_eq!(MuHash::new(), MuHash::default());
    }

    #[test]
    fn test_add_then_remove_restores_empty() {
        let mut set = MuHash::new();
        set.add_element(&element(1));
        assert_ne!(set.finalize(), MuHash::new().finalize());
        set.remove_element(&element(1));
        assert_eq!(set.finalize(), MuHash::new().finalize());
        assert_eq!(set, MuHash::new());
    }

    #[test]
    fn test_order_independence() {
        #[derive(Clone, Copy)]
        enum Op {
            Add(u8),
            Remove(u8),
        }
        let mut ops = vec![Op::Add(1), Op::Add(2), Op::Add(3), Op::Remove(2), Op::Add(4), Op::Remove(9)];
        let apply = |ops: &[Op]| {
            let mut set = MuHash::new();
            for op in ops {
                match *op {
                    Op::Add(i) => set.add_element(&element(i)),
                    Op::Remove(i) => set.remove_element(&element(i)),
                }
            }
            set.finalize()
        };
        let expected = apply(&ops);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            ops.shuffle(&mut rng);
            assert_eq!(apply(&ops), expected);
        }
    }

    #[test]
    fn test_combine_matches_sequential_adds() {
        let mut left = MuHash::new();
        left.add_element(&element(1));
        let mut right = MuHash::new();
        right.add_element(&element(2));
        right.remove_element(&element(3));
        left.combine(&right);

        let mut sequential = MuHash::new();
        sequential.remove_element(&element(3));
        sequential.add_element(&element(2));
        sequential.add_element(&element(1));
        assert_eq!(left.finalize(), sequential.finalize());
    }

    #[test]
    fn test_normalize_keeps_digest() {
        let mut set = MuHash::new();
        set.add_element(&element(5));
        set.remove_element(&element(6));
        let before = set.finalize();
        set.normalize();
        assert_eq!(set.finalize(), before);
        assert_eq!(set.serialize()[ELEMENT_BYTE_SIZE], 1);
    }

    #[test]
    fn test_serialization() {
        let mut set = MuHash::new();
        set.add_element(&element(1));
        set.remove_element(&element(2));
        let restored = MuHash::deserialize(&set.serialize()).unwrap();
        assert_eq!(restored.finalize(), set.finalize());

        assert_eq!(MuHash::deserialize(&[0u8; 10]), Err(MuHashError::InvalidLength(10)));
        assert_eq!(MuHash::deserialize(&[0u8; SERIALIZED_MUHASH_SIZE]), Err(MuHashError::Zero("numerator")));
        assert_eq!(MuHash::deserialize(&[0xffu8; SERIALIZED_MUHASH_SIZE]), Err(MuHashError::Overflow("numerator")));
    }
}
