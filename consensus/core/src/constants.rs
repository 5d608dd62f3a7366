/// Current block version
pub const BLOCK_VERSION: u16 = 1;

/// Current transaction version
pub const TX_VERSION: u16 = 1;

/// Number of sompi in one jio
pub const SOMPI_PER_JIO: u64 = 100_000_000;

/// Upper bound on any single amount and on the sum of a transaction's outputs
pub const MAX_SOMPI: u64 = 21_000_000_000 * SOMPI_PER_JIO;

/// Default reward paid by each block's coinbase
pub const DEFAULT_BLOCK_SUBSIDY: u64 = 50 * SOMPI_PER_JIO;

/// Default number of blue score units a coinbase output must wait before being spent
pub const DEFAULT_COINBASE_MATURITY: u64 = 100;

/// Default cap on the number of parents a block may reference
pub const DEFAULT_MAX_BLOCK_PARENTS: usize = 10;

/// Default cap on the number of transactions (coinbase included) in a block
pub const DEFAULT_MAX_BLOCK_TRANSACTIONS: usize = 1_000;

/// Genesis block timestamp in milliseconds
pub const GENESIS_BLOCK_TIMESTAMP: u64 = 1699545600000;

/// Minimum difficulty bits (maximum target)
pub const MIN_DIFFICULTY_BITS: u32 = 0x1f00_ffff;
