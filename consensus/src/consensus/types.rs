//! Consensus configuration

use consensus_core::config::genesis::{GenesisBlock, GENESIS};
use consensus_core::constants::{
    BLOCK_VERSION, DEFAULT_BLOCK_SUBSIDY, DEFAULT_COINBASE_MATURITY, DEFAULT_MAX_BLOCK_PARENTS, DEFAULT_MAX_BLOCK_TRANSACTIONS,
    GENESIS_BLOCK_TIMESTAMP, MIN_DIFFICULTY_BITS,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Consensus parameters. Missing TOML keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Maximum number of parents per block, and of virtual parents
    pub max_block_parents: usize,
    /// Blue score distance before a coinbase output may be spent
    pub coinbase_maturity: u64,
    /// Amount (in sompi) each coinbase may pay out
    pub block_subsidy: u64,
    /// Maximum number of transactions per block, coinbase included
    pub max_block_transactions: usize,
    pub genesis_timestamp: u64,
    pub genesis_bits: u32,
    pub block_version: u16,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            max_block_parents: DEFAULT_MAX_BLOCK_PARENTS,
            coinbase_maturity: DEFAULT_COINBASE_MATURITY,
            block_subsidy: DEFAULT_BLOCK_SUBSIDY,
            max_block_transactions: DEFAULT_MAX_BLOCK_TRANSACTIONS,
            genesis_timestamp: GENESIS_BLOCK_TIMESTAMP,
            genesis_bits: MIN_DIFFICULTY_BITS,
            block_version: BLOCK_VERSION,
        }
    }
}

impl ConsensusConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_toml_str(&fs::read_to_string(path)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// The genesis block these parameters describe
    pub fn genesis(&self) -> GenesisBlock {
        GenesisBlock {
            version: self.block_version,
            timestamp: self.genesis_timestamp,
            bits: self.genesis_bits,
            nonce: 0,
            coinbase_payload: GENESIS.coinbase_payload,
        }
    }
}
