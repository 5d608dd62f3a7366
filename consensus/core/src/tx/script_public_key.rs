use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::io::{Read, Write};

/// Size of the underlying script vector of a script.
pub const SCRIPT_VECTOR_SIZE: usize = 36;

/// Used as the underlying type for script public key data, optimized for the common p2pk script size (34).
pub type ScriptVec = SmallVec<[u8; SCRIPT_VECTOR_SIZE]>;

/// Represents the ScriptPublicKey Version
pub type ScriptPublicKeyVersion = u16;

/// Alias the `smallvec!` macro to ease maintenance
pub use smallvec::smallvec as scriptvec;

/// Locking script of an output. Scripts are opaque to consensus here and are
/// only carried, hashed and committed.
#[derive(Default, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptPublicKey {
    pub version: ScriptPublicKeyVersion,
    script: ScriptVec, // Kept private to preserve read-only semantics
}

impl std::fmt::Debug for ScriptPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPublicKey").field("version", &self.version).field("script", &hex::encode(&self.script)).finish()
    }
}

impl std::fmt::Display for ScriptPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.script))
    }
}

impl ScriptPublicKey {
    pub fn new(version: ScriptPublicKeyVersion, script: ScriptVec) -> Self {
        Self { version, script }
    }

    pub fn from_vec(version: ScriptPublicKeyVersion, script: Vec<u8>) -> Self {
        Self { version, script: ScriptVec::from_vec(script) }
    }

    pub fn from_hex<T: AsRef<[u8]>>(version: ScriptPublicKeyVersion, hex: T) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex)?;
        Ok(Self::from_vec(version, bytes))
    }

    pub fn version(&self) -> ScriptPublicKeyVersion {
        self.version
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }
}

impl BorshSerialize for ScriptPublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        BorshSerialize::serialize(&self.version, writer)?;
        // Vectors are length prefixed, so write the inner slice the same way
        BorshSerialize::serialize(self.script.as_slice(), writer)
    }
}

impl BorshDeserialize for ScriptPublicKey {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let version: ScriptPublicKeyVersion = BorshDeserialize::deserialize_reader(reader)?;
        let script: Vec<u8> = BorshDeserialize::deserialize_reader(reader)?;
        Ok(Self::from_vec(version, script))
    }
}
