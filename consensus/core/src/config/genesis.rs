use crate::{
    block::Block,
    constants::{BLOCK_VERSION, GENESIS_BLOCK_TIMESTAMP, MIN_DIFFICULTY_BITS, TX_VERSION},
    header::Header,
    merkle,
    subnets::SUBNETWORK_ID_COINBASE,
    tx::Transaction,
};
use jio_muhash::MuHash;

/// The constants uniquely representing the genesis block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisBlock {
    pub version: u16,
    pub timestamp: u64,
    pub bits: u32,
    pub nonce: u64,
    pub coinbase_payload: &'static [u8],
}

impl GenesisBlock {
    /// The genesis coinbase creates no outputs, so the UTXO set starts empty
    pub fn build_genesis_transactions(&self) -> Vec<Transaction> {
        vec![Transaction::new(TX_VERSION, Vec::new(), Vec::new(), 0, SUBNETWORK_ID_COINBASE, 0, self.coinbase_payload.to_vec())]
    }

    pub fn build(&self) -> Block {
        let transactions = self.build_genesis_transactions();
        let hash_merkle_root = merkle::calc_hash_merkle_root(transactions.iter());
        let header = Header::new_finalized(
            self.version,
            Vec::new(),
            hash_merkle_root,
            MuHash::new().finalize(),
            self.timestamp,
            self.bits,
            self.nonce,
        );
        Block::new(header, transactions)
    }
}

impl From<&GenesisBlock> for Block {
    fn from(genesis: &GenesisBlock) -> Self {
        genesis.build()
    }
}

pub const GENESIS: GenesisBlock = GenesisBlock {
    version: BLOCK_VERSION,
    timestamp: GENESIS_BLOCK_TIMESTAMP,
    bits: MIN_DIFFICULTY_BITS,
    nonce: 0,
    coinbase_payload: &[
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // Blue score
        0x6a, 0x69, 0x6f, 0x20, 0x67, 0x65, 0x6e, 0x65, 0x73, 0x69, 0x73, // "jio genesis"
    ],
};
