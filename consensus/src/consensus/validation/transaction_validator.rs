//! Transaction validation for consensus
//!
//! Isolation checks look at a transaction alone. Populated checks pair it with
//! the entries its inputs spend and produce the fee.

use std::collections::HashSet;

use consensus_core::constants::{DEFAULT_COINBASE_MATURITY, MAX_SOMPI, TX_VERSION};
use consensus_core::errors::{TxResult, TxRuleError};
use consensus_core::tx::{PopulatedTransaction, Transaction, UtxoEntry};

use crate::consensus::api;
use crate::errors::ConsensusResult;

/// Transaction validator for consensus rules
#[derive(Debug, Clone)]
pub struct TransactionRulesValidator {
    max_money: u64,
    coinbase_maturity: u64,
}

impl TransactionRulesValidator {
    pub fn new(coinbase_maturity: u64) -> Self {
        Self { max_money: MAX_SOMPI, coinbase_maturity }
    }

    pub fn coinbase_maturity(&self) -> u64 {
        self.coinbase_maturity
    }

    /// Context-free checks
    pub fn validate_tx_in_isolation(&self, tx: &Transaction) -> TxResult<()> {
        if tx.version == 0 || tx.version > TX_VERSION {
            return Err(TxRuleError::UnknownTxVersion(tx.version));
        }

        if tx.is_coinbase() {
            if !tx.inputs.is_empty() {
                return Err(TxRuleError::CoinbaseHasInputs(tx.inputs.len()));
            }
            return self.check_output_values(tx, true);
        }

        if tx.inputs.is_empty() {
            return Err(TxRuleError::NoTxInputs);
        }
        if tx.outputs.is_empty() {
            return Err(TxRuleError::NoTxOutputs);
        }
        self.check_output_values(tx, false)?;

        let mut seen = HashSet::with_capacity(tx.inputs.len());
        for (i, input) in tx.inputs.iter().enumerate() {
            if !seen.insert(input.previous_outpoint) {
                return Err(TxRuleError::TxDuplicateInputs(i, input.previous_outpoint));
            }
        }
        Ok(())
    }

    fn check_output_values(&self, tx: &Transaction, allow_zero: bool) -> TxResult<()> {
        let mut total: u64 = 0;
        for (i, output) in tx.outputs.iter().enumerate() {
            if output.value == 0 && !allow_zero {
                return Err(TxRuleError::TxOutZero(i));
            }
            if output.value > self.max_money {
                return Err(TxRuleError::TxOutTooHigh(i, output.value));
            }
            total = total.checked_add(output.value).ok_or(TxRuleError::OutputsValueOverflow)?;
            if total > self.max_money {
                return Err(TxRuleError::OutputsValueOverflow);
            }
        }
        Ok(())
    }

    /// Checks the spent entries against the transaction and returns its fee
    pub fn validate_populated_transaction_and_get_fee(&self, tx: &PopulatedTransaction) -> TxResult<u64> {
        if tx.tx.is_coinbase() {
            return Ok(0);
        }

        let mut total_in: u64 = 0;
        for (_, entry) in tx.populated_inputs() {
            total_in = total_in.checked_add(entry.amount).ok_or(TxRuleError::InputsValueOverflow)?;
            if total_in > self.max_money {
                return Err(TxRuleError::InputsValueOverflow);
            }
        }

        let total_out = tx.tx.total_output_value().ok_or(TxRuleError::OutputsValueOverflow)?;
        if total_in < total_out {
            return Err(TxRuleError::InsufficientFunds(total_in, total_out));
        }
        Ok(total_in - total_out)
    }

    /// Coinbase outputs may be spent only once `coinbase_maturity` blue score has passed
    pub fn check_coinbase_maturity(&self, tx: &PopulatedTransaction, pov_blue_score: u64) -> TxResult<()> {
        for (i, (input, entry)) in tx.populated_inputs().enumerate() {
            if entry.is_coinbase && pov_blue_score.saturating_sub(entry.block_blue_score) < self.coinbase_maturity {
                return Err(TxRuleError::ImmatureCoinbaseSpend(i, input.previous_outpoint));
            }
        }
        Ok(())
    }

    /// Isolation rules, entry count and fee. Does not look at any state.
    pub fn validate_and_calculate_fee(&self, tx: &Transaction, utxo_entries: &[UtxoEntry]) -> TxResult<u64> {
        self.validate_tx_in_isolation(tx)?;
        if tx.inputs.len() != utxo_entries.len() {
            return Err(TxRuleError::MismatchedUtxoEntriesCount(tx.inputs.len(), utxo_entries.len()));
        }
        let populated = PopulatedTransaction::new(tx, utxo_entries.to_vec());
        self.validate_populated_transaction_and_get_fee(&populated)
    }
}

impl Default for TransactionRulesValidator {
    fn default() -> Self {
        Self::new(DEFAULT_COINBASE_MATURITY)
    }
}

impl api::TransactionValidator for TransactionRulesValidator {
    fn validate_transaction_and_calculate_fee(&self, transaction: &Transaction, utxo_entries: &[UtxoEntry]) -> ConsensusResult<u64> {
        Ok(self.validate_and_calculate_fee(transaction, utxo_entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::subnets::{SUBNETWORK_ID_COINBASE, SUBNETWORK_ID_NATIVE};
    use consensus_core::tx::{ScriptPublicKey, TransactionInput, TransactionOutpoint, TransactionOutput};
    use consensus_core::Hash;

    fn outpoint(i: u64) -> TransactionOutpoint {
        TransactionOutpoint::new(Hash::from_u64_word(i), 0)
    }

    fn output(value: u64) -> TransactionOutput {
        TransactionOutput::new(value, ScriptPublicKey::from_vec(0, vec![0x51]))
    }

    fn entry(amount: u64) -> UtxoEntry {
        UtxoEntry::new(amount, ScriptPublicKey::from_vec(0, vec![0x51]), 10, false)
    }

    fn create_test_tx(inputs: Vec<TransactionOutpoint>, outputs: Vec<TransactionOutput>) -> Transaction {
        let inputs = inputs.into_iter().map(|o| TransactionInput::new(o, Vec::new(), 0, 0)).collect();
        Transaction::new(TX_VERSION, inputs, outputs, 0, SUBNETWORK_ID_NATIVE, 0, Vec::new())
    }

    #[test]
    fn test_fee_is_inputs_minus_outputs() {
        let validator = TransactionRulesValidator::default();
        let tx = create_test_tx(vec![outpoint(1), outpoint(2)], vec![output(3000), output(500)]);
        let fee = validator.validate_and_calculate_fee(&tx, &[entry(2000), entry(3000)]).unwrap();
        assert_eq!(fee, 1500);
    }

    #[test]
    fn test_insufficient_funds() {
        let validator = TransactionRulesValidator::default();
        let tx = create_test_tx(vec![outpoint(1)], vec![output(3000)]);
        assert_eq!(validator.validate_and_calculate_fee(&tx, &[entry(2999)]), Err(TxRuleError::InsufficientFunds(2999, 3000)));
    }

    #[test]
    fn test_isolation_rules() {
        let validator = TransactionRulesValidator::default();

        let tx = create_test_tx(vec![], vec![output(1)]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::NoTxInputs));

        let tx = create_test_tx(vec![outpoint(1)], vec![]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::NoTxOutputs));

        let tx = create_test_tx(vec![outpoint(1)], vec![output(5), output(0)]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::TxOutZero(1)));

        let tx = create_test_tx(vec![outpoint(1)], vec![output(MAX_SOMPI + 1)]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::TxOutTooHigh(0, MAX_SOMPI + 1)));

        let tx = create_test_tx(vec![outpoint(1)], vec![output(MAX_SOMPI), output(1)]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::OutputsValueOverflow));

        let tx = create_test_tx(vec![outpoint(1), outpoint(2), outpoint(1)], vec![output(1)]);
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::TxDuplicateInputs(2, outpoint(1))));

        let mut tx = create_test_tx(vec![outpoint(1)], vec![output(1)]);
        tx.version = TX_VERSION + 1;
        tx.finalize();
        assert_eq!(validator.validate_tx_in_isolation(&tx), Err(TxRuleError::UnknownTxVersion(TX_VERSION + 1)));
    }

    #[test]
    fn test_entry_count_must_match_inputs() {
        let validator = TransactionRulesValidator::default();
        let tx = create_test_tx(vec![outpoint(1), outpoint(2)], vec![output(1)]);
        assert_eq!(validator.validate_and_calculate_fee(&tx, &[entry(5)]), Err(TxRuleError::MismatchedUtxoEntriesCount(2, 1)));
    }

    #[test]
    fn test_inputs_overflow() {
        let validator = TransactionRulesValidator::default();
        let tx = create_test_tx(vec![outpoint(1), outpoint(2)], vec![output(1)]);
        let entries = [entry(MAX_SOMPI), entry(1)];
        assert_eq!(validator.validate_and_calculate_fee(&tx, &entries), Err(TxRuleError::InputsValueOverflow));
    }

    #[test]
    fn test_coinbase_has_zero_fee() {
        let validator = TransactionRulesValidator::default();
        let coinbase = Transaction::new(TX_VERSION, vec![], vec![output(50)], 0, SUBNETWORK_ID_COINBASE, 0, vec![0; 8]);
        assert_eq!(validator.validate_and_calculate_fee(&coinbase, &[]), Ok(0));

        let inputs = vec![TransactionInput::new(outpoint(1), Vec::new(), 0, 0)];
        let bad = Transaction::new(TX_VERSION, inputs, vec![output(50)], 0, SUBNETWORK_ID_COINBASE, 0, vec![0; 8]);
        assert_eq!(validator.validate_tx_in_isolation(&bad), Err(TxRuleError::CoinbaseHasInputs(1)));
    }

    #[test]
    fn test_coinbase_maturity() {
        let validator = TransactionRulesValidator::new(10);
        let tx = create_test_tx(vec![outpoint(1)], vec![output(1)]);
        let mut spent = entry(5);
        spent.is_coinbase = true;
        spent.block_blue_score = 100;
        let populated = PopulatedTransaction::new(&tx, vec![spent]);

        assert_eq!(validator.check_coinbase_maturity(&populated, 109), Err(TxRuleError::ImmatureCoinbaseSpend(0, outpoint(1))));
        assert_eq!(validator.check_coinbase_maturity(&populated, 110), Ok(()));
    }
}
