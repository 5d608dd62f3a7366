pub mod hashers;

pub use hashers::{BlockHash, Hasher, HasherBase, MerkleBranchHash, MuHashElementHash, MuHashFinalizeHash, TransactionID};

use std::fmt;
use std::hash::Hash as StdHash;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub const HASH_SIZE: usize = 32;

/// A 32-byte hash used for block hashes, transaction ids and UTXO commitments.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub const fn zeroed() -> Self {
        Self([0u8; HASH_SIZE])
    }

    /// Constructs a hash from four little-endian u64s (used in tests)
    pub const fn from_le_u64(parts: [u64; 4]) -> Self {
        let mut bytes = [0u8; HASH_SIZE];
        let mut i = 0;
        while i < 4 {
            let le = parts[i].to_le_bytes();
            let mut j = 0;
            while j < 8 {
                bytes[i * 8 + j] = le[j];
                j += 1;
            }
            i += 1;
        }
        Self(bytes)
    }

    pub const fn from_u64_word(word: u64) -> Self {
        Self::from_le_u64([word, 0, 0, 0])
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, std::array::TryFromSliceError> {
        let array: [u8; HASH_SIZE] = slice.try_into()?;
        Ok(Self(array))
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Hash> for [u8; HASH_SIZE] {
    fn from(h: Hash) -> Self {
        h.0
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(slice)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl StdHash for Hash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}
