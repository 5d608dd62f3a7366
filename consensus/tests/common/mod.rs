#![allow(dead_code)]

use std::sync::Arc;

use consensus::{Consensus, ConsensusConfig};
use consensus_core::block::{Block, StaticTransactionSelector};
use consensus_core::header::Header;
use consensus_core::muhash::MuHashExtensions;
use consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutpoint, UtxoEntry};
use consensus_core::{Hash, MuHash};
use consensus::process::CoinbaseManager;
use database::MemoryDb;
use tracing_subscriber::EnvFilter;

pub const SUBSIDY: u64 = 1000;
pub const MATURITY: u64 = 2;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

pub fn test_config() -> ConsensusConfig {
    ConsensusConfig { block_subsidy: SUBSIDY, coinbase_maturity: MATURITY, ..Default::default() }
}

pub fn miner_script() -> ScriptPublicKey {
    ScriptPublicKey::from_vec(0, vec![0x51])
}

pub fn new_consensus(config: ConsensusConfig) -> (Consensus, Arc<MemoryDb>) {
    init_tracing();
    let db = Arc::new(MemoryDb::new());
    let consensus = Consensus::new(db.clone(), config).unwrap();
    (consensus, db)
}

/// Builds a template over the virtual carrying `txs` and inserts it
pub fn mine(consensus: &Consensus, extra_data: &[u8], txs: Vec<Transaction>) -> Block {
    let block = consensus.build_block(&miner_script(), extra_data, &mut StaticTransactionSelector::new(txs)).unwrap();
    consensus.validate_and_insert_block(block.clone()).unwrap();
    block
}

pub fn coinbase_outpoint(block: &Block) -> TransactionOutpoint {
    TransactionOutpoint::new(block.transactions[0].id(), 0)
}

/// Recomputes transaction ids, the merkle root and the block hash after a manual edit
pub fn rehash(block: &mut Block) {
    for tx in block.transactions.iter_mut() {
        tx.finalize();
    }
    block.header.hash_merkle_root = block.calc_hash_merkle_root();
    block.header.finalize();
}

/// A coinbase-only block at `blue_score` on top of `parent`, for chains where every
/// block has a single parent. `chain_coinbases` are the coinbases of the chain
/// blocks below it, first block after genesis first. The coinbase of the chain
/// block at blue score `i` is accepted by its child with blue score `i + 1`.
pub fn chain_block(parent: &Block, blue_score: u64, extra_data: &[u8], chain_coinbases: &[Transaction]) -> Block {
    let mut multiset = MuHash::new();
    for (i, coinbase) in chain_coinbases.iter().enumerate() {
        let entry = UtxoEntry::new(SUBSIDY, miner_script(), i as u64 + 2, true);
        multiset.add_utxo(&TransactionOutpoint::new(coinbase.id(), 0), &entry);
    }

    let coinbase = CoinbaseManager::new(SUBSIDY).expected_coinbase_transaction(blue_score, &miner_script(), extra_data);
    let transactions = vec![coinbase];
    let header = Header::new_finalized(
        parent.header.version,
        vec![parent.hash()],
        consensus_core::merkle::calc_hash_merkle_root(transactions.iter()),
        multiset.finalize(),
        parent.header.timestamp + 1,
        parent.header.bits,
        0,
    );
    Block::new(header, transactions)
}

pub fn some_hash(i: u64) -> Hash {
    Hash::from_u64_word(i)
}
