use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{header::Header, merkle, tx::Transaction, Hash};

/// Complete block structure including header and transactions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Block {
    pub header: Header,
    /// The coinbase transaction comes first
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions }
    }

    pub fn hash(&self) -> Hash {
        self.header.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }

    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    /// Merkle root over the ids of the transactions the block actually carries
    pub fn calc_hash_merkle_root(&self) -> Hash {
        merkle::calc_hash_merkle_root(self.transactions.iter())
    }
}

/// Supplies the non-coinbase transactions of a block template
pub trait TransactionSelector {
    /// Returns the transactions to include, in block order
    fn select_transactions(&mut self) -> Vec<Transaction>;
}

impl<F> TransactionSelector for F
where
    F: FnMut() -> Vec<Transaction>,
{
    fn select_transactions(&mut self) -> Vec<Transaction> {
        self()
    }
}

/// Selector over a fixed list of transactions, handed out once
#[derive(Debug, Clone, Default)]
pub struct StaticTransactionSelector {
    transactions: Vec<Transaction>,
}

impl StaticTransactionSelector {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl TransactionSelector for StaticTransactionSelector {
    fn select_transactions(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }
}
