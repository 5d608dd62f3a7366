use crate::tx::TransactionOutpoint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtxoAlgebraError {
    #[error("outpoint {0} both in self.add and in other.add")]
    DoubleAddition(TransactionOutpoint),

    #[error("outpoint {0} both in self.remove and in other.remove")]
    DoubleRemoval(TransactionOutpoint),

    #[error("outpoint {0} is removed with an entry different from the one added")]
    MismatchedEntry(TransactionOutpoint),
}

pub type UtxoResult<T> = std::result::Result<T, UtxoAlgebraError>;
