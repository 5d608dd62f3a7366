use consensus_core::{
    errors::{RuleError, TxRuleError},
    tx::TransactionOutpoint,
    utxo::UtxoAlgebraError,
};
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Tx(#[from] TxRuleError),

    #[error(transparent)]
    UtxoAlgebra(#[from] UtxoAlgebraError),

    #[error("multiset integrity violated at outpoint {outpoint}: {reason}")]
    MultisetIntegrity { outpoint: TransactionOutpoint, reason: String },
}

pub type ConsensusResult<T> = std::result::Result<T, ConsensusError>;

impl ConsensusError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConsensusError::Db(err) if err.is_not_found())
    }

    /// Returns the block rule violation, if that is what this error is
    pub fn as_rule_error(&self) -> Option<&RuleError> {
        match self {
            ConsensusError::Rule(err) => Some(err),
            _ => None,
        }
    }
}
