use thiserror::Error;

use crate::{tx::TransactionOutpoint, Hash};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("block {0} is already known")]
    DuplicateBlock(Hash),

    #[error("wrong block version: got {0} but expected {1}")]
    WrongBlockVersion(u16, u16),

    #[error("block has no parents")]
    NoParents,

    #[error("block has too many parents: got {0} when the limit is {1}")]
    TooManyParents(usize, usize),

    #[error("block references parent {0} more than once")]
    DuplicateParent(Hash),

    #[error("block has missing parents: {0:?}")]
    MissingParents(Vec<Hash>),

    #[error("block has no transactions")]
    NoTransactions,

    #[error("block has too many transactions: got {0} when the limit is {1}")]
    TooManyTransactions(usize, usize),

    #[error("first transaction in block is not a coinbase")]
    FirstTxNotCoinbase,

    #[error("block has a second coinbase at index {0}")]
    MultipleCoinbases(usize),

    #[error("block contains duplicate transaction {0}")]
    DuplicateTransactions(Hash),

    #[error("wrong hash merkle root: got {0} but expected {1}")]
    BadMerkleRoot(Hash, Hash),

    #[error("transaction at index {0} failed isolation checks: {1}")]
    TxInIsolationValidationFailed(usize, TxRuleError),

    #[error("coinbase payload is too short: {0} bytes")]
    BadCoinbasePayloadLength(usize),

    #[error("coinbase payload blue score {0} does not match the expected {1}")]
    BadCoinbasePayloadBlueScore(u64, u64),

    #[error("coinbase pays {0} sompi which exceeds the subsidy of {1}")]
    CoinbaseOverpays(u64, u64),

    #[error("block {0} has wrong UTXO commitment: got {1} but expected {2}")]
    BadUtxoCommitment(Hash, Hash, Hash),

    #[error("block timestamp {0} is not after the latest parent timestamp {1}")]
    TimestampNotAfterParents(u64, u64),
}

pub type BlockProcessResult<T> = std::result::Result<T, RuleError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRuleError {
    #[error("unknown transaction version {0}")]
    UnknownTxVersion(u16),

    #[error("transaction has no inputs")]
    NoTxInputs,

    #[error("transaction has no outputs")]
    NoTxOutputs,

    #[error("coinbase transaction has {0} inputs")]
    CoinbaseHasInputs(usize),

    #[error("transaction input #{0} is not the only one referencing {1}")]
    TxDuplicateInputs(usize, TransactionOutpoint),

    #[error("transaction output #{0} has zero value")]
    TxOutZero(usize),

    #[error("transaction output #{0} value {1} is higher than the max allowed value")]
    TxOutTooHigh(usize, u64),

    #[error("total output value is higher than the max allowed value")]
    OutputsValueOverflow,

    #[error("total input value is higher than the max allowed value")]
    InputsValueOverflow,

    #[error("expected {0} utxo entries but got {1}")]
    MismatchedUtxoEntriesCount(usize, usize),

    #[error("outpoints corresponding to some transaction inputs are missing from the current utxo context: {0:?}")]
    MissingTxOutpoints(Vec<TransactionOutpoint>),

    #[error("input #{0} spends coinbase outpoint {1} which is not yet mature")]
    ImmatureCoinbaseSpend(usize, TransactionOutpoint),

    #[error("insufficient funds: total input amount {0} is lower than total output amount {1}")]
    InsufficientFunds(u64, u64),

    #[error("transaction output {0} is already in the utxo set")]
    OutputAlreadyExists(TransactionOutpoint),
}

pub type TxResult<T> = std::result::Result<T, TxRuleError>;
