//! Coinbase transaction processing
//!
//! A coinbase pays the block subsidy and carries the block's blue score at the
//! head of its payload, which keeps coinbase ids unique across blocks.

use consensus_core::constants::TX_VERSION;
use consensus_core::errors::{BlockProcessResult, RuleError};
use consensus_core::subnets::SUBNETWORK_ID_COINBASE;
use consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutput};

const BLUE_SCORE_SIZE: usize = std::mem::size_of::<u64>();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinbaseData {
    pub blue_score: u64,
    pub extra_data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CoinbaseManager {
    block_subsidy: u64,
}

impl CoinbaseManager {
    pub fn new(block_subsidy: u64) -> Self {
        Self { block_subsidy }
    }

    pub fn block_subsidy(&self) -> u64 {
        self.block_subsidy
    }

    pub fn serialize_coinbase_payload(&self, blue_score: u64, extra_data: &[u8]) -> Vec<u8> {
        let mut payload = Vec::with_capacity(BLUE_SCORE_SIZE + extra_data.len());
        payload.extend_from_slice(&blue_score.to_le_bytes());
        payload.extend_from_slice(extra_data);
        payload
    }

    pub fn deserialize_coinbase_payload(&self, payload: &[u8]) -> BlockProcessResult<CoinbaseData> {
        if payload.len() < BLUE_SCORE_SIZE {
            return Err(RuleError::BadCoinbasePayloadLength(payload.len()));
        }
        let (score_bytes, extra_data) = payload.split_at(BLUE_SCORE_SIZE);
        let mut blue_score = [0u8; BLUE_SCORE_SIZE];
        blue_score.copy_from_slice(score_bytes);
        Ok(CoinbaseData { blue_score: u64::from_le_bytes(blue_score), extra_data: extra_data.to_vec() })
    }

    /// Builds the coinbase of a block with `blue_score`, paying the full subsidy to `script_public_key`
    pub fn expected_coinbase_transaction(&self, blue_score: u64, script_public_key: &ScriptPublicKey, extra_data: &[u8]) -> Transaction {
        let outputs = vec![TransactionOutput::new(self.block_subsidy, script_public_key.clone())];
        let payload = self.serialize_coinbase_payload(blue_score, extra_data);
        Transaction::new(TX_VERSION, Vec::new(), outputs, 0, SUBNETWORK_ID_COINBASE, 0, payload)
    }

    /// Checks the coinbase against the block's GHOSTDAG blue score and the subsidy
    pub fn validate_coinbase(&self, coinbase: &Transaction, blue_score: u64) -> BlockProcessResult<()> {
        let data = self.deserialize_coinbase_payload(&coinbase.payload)?;
        if data.blue_score != blue_score {
            return Err(RuleError::BadCoinbasePayloadBlueScore(data.blue_score, blue_score));
        }
        // Isolation checks already capped the sum at MAX_SOMPI, so it cannot overflow
        let paid = coinbase.outputs.iter().map(|output| output.value).sum::<u64>();
        if paid > self.block_subsidy {
            return Err(RuleError::CoinbaseOverpays(paid, self.block_subsidy));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip_keeps_extra_data() {
        let manager = CoinbaseManager::new(1000);
        let payload = manager.serialize_coinbase_payload(42, b"miner");
        assert_eq!(payload.len(), 13);
        let data = manager.deserialize_coinbase_payload(&payload).unwrap();
        assert_eq!(data, CoinbaseData { blue_score: 42, extra_data: b"miner".to_vec() });
    }

    #[test]
    fn test_short_payload_is_rejected() {
        let manager = CoinbaseManager::new(1000);
        assert_eq!(manager.deserialize_coinbase_payload(&[1, 2, 3]), Err(RuleError::BadCoinbasePayloadLength(3)));
    }

    #[test]
    fn test_validate_coinbase() {
        let manager = CoinbaseManager::new(1000);
        let spk = ScriptPublicKey::from_vec(0, vec![0x51]);
        let coinbase = manager.expected_coinbase_transaction(7, &spk, &[]);
        assert!(coinbase.is_coinbase());
        assert_eq!(manager.validate_coinbase(&coinbase, 7), Ok(()));
        assert_eq!(manager.validate_coinbase(&coinbase, 8), Err(RuleError::BadCoinbasePayloadBlueScore(7, 8)));

        let greedy = CoinbaseManager::new(1001).expected_coinbase_transaction(7, &spk, &[]);
        assert_eq!(manager.validate_coinbase(&greedy, 7), Err(RuleError::CoinbaseOverpays(1001, 1000)));
    }

    #[test]
    fn test_distinct_blue_scores_give_distinct_ids() {
        let manager = CoinbaseManager::new(1000);
        let spk = ScriptPublicKey::from_vec(0, vec![0x51]);
        let a = manager.expected_coinbase_transaction(1, &spk, &[]);
        let b = manager.expected_coinbase_transaction(2, &spk, &[]);
        assert_ne!(a.id(), b.id());
    }
}
