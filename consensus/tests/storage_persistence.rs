mod common;

use std::sync::Arc;

use common::*;
use consensus::Consensus;
use consensus_core::block::StaticTransactionSelector;
use database::Database;
use tempfile::TempDir;

#[test]
fn test_state_survives_reopen() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path();

    let (b1, b2) = {
        let db = Arc::new(Database::open(path).expect("open db"));
        let consensus = Consensus::new(db, test_config()).unwrap();
        let b1 = mine(&consensus, b"", vec![]);
        let b2 = mine(&consensus, b"", vec![]);
        (b1, b2)
    };

    let db = Arc::new(Database::open(path).expect("reopen db"));
    let consensus = Consensus::new(db, test_config()).unwrap();

    assert!(consensus.utxo_by_outpoint(&coinbase_outpoint(&b1)).unwrap().is_some());
    assert!(consensus.utxo_by_outpoint(&coinbase_outpoint(&b2)).unwrap().is_some());

    let template = consensus.build_block(&miner_script(), b"", &mut StaticTransactionSelector::default()).unwrap();
    assert_eq!(template.header.parents, vec![b2.hash()]);
    consensus.validate_and_insert_block(template).unwrap();
}

#[test]
fn test_rejected_block_is_not_persisted() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path();

    let rejected = {
        let db = Arc::new(Database::open(path).expect("open db"));
        let consensus = Consensus::new(db, test_config()).unwrap();
        let mut block = consensus.build_block(&miner_script(), b"", &mut StaticTransactionSelector::default()).unwrap();
        block.header.utxo_commitment = some_hash(9);
        rehash(&mut block);
        assert!(consensus.validate_and_insert_block(block.clone()).is_err());
        block
    };

    let db = Arc::new(Database::open(path).expect("reopen db"));
    let consensus = Consensus::new(db, test_config()).unwrap();
    assert_eq!(consensus.utxo_by_outpoint(&coinbase_outpoint(&rejected)).unwrap(), None);
    let template = consensus.build_block(&miner_script(), b"", &mut StaticTransactionSelector::default()).unwrap();
    assert_eq!(template.header.parents, rejected.header.parents);
}
