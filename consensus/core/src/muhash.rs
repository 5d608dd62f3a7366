use crate::tx::{TransactionOutpoint, UtxoEntry};
use jio_muhash::MuHash;

/// Multiset operations over UTXO elements
pub trait MuHashExtensions {
    fn add_utxo(&mut self, outpoint: &TransactionOutpoint, entry: &UtxoEntry);
    fn remove_utxo(&mut self, outpoint: &TransactionOutpoint, entry: &UtxoEntry);
    fn from_utxo(outpoint: &TransactionOutpoint, entry: &UtxoEntry) -> Self;
}

impl MuHashExtensions for MuHash {
    fn add_utxo(&mut self, outpoint: &TransactionOutpoint, entry: &UtxoEntry) {
        self.add_element(&serialize_utxo(outpoint, entry));
    }

    fn remove_utxo(&mut self, outpoint: &TransactionOutpoint, entry: &UtxoEntry) {
        self.remove_element(&serialize_utxo(outpoint, entry));
    }

    fn from_utxo(outpoint: &TransactionOutpoint, entry: &UtxoEntry) -> Self {
        let mut muhash = Self::new();
        muhash.add_utxo(outpoint, entry);
        muhash
    }
}

/// Canonical byte encoding of a UTXO element:
/// `txid || index u32 || amount u64 || blue score u64 || is_coinbase u8 || spk version u16 || script len u64 || script`,
/// integers little endian.
pub fn serialize_utxo(outpoint: &TransactionOutpoint, entry: &UtxoEntry) -> Vec<u8> {
    let script = entry.script_public_key.script();
    let mut buf = Vec::with_capacity(32 + 4 + 8 + 8 + 1 + 2 + 8 + script.len());
    buf.extend_from_slice(outpoint.transaction_id.as_bytes());
    buf.extend_from_slice(&outpoint.index.to_le_bytes());
    buf.extend_from_slice(&entry.amount.to_le_bytes());
    buf.extend_from_slice(&entry.block_blue_score.to_le_bytes());
    buf.push(u8::from(entry.is_coinbase));
    buf.extend_from_slice(&entry.script_public_key.version().to_le_bytes());
    buf.extend_from_slice(&(script.len() as u64).to_le_bytes());
    buf.extend_from_slice(script);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tx::ScriptPublicKey, Hash};

    fn utxo(i: u64, amount: u64) -> (TransactionOutpoint, UtxoEntry) {
        (
            TransactionOutpoint::new(Hash::from_u64_word(i), i as u32),
            UtxoEntry::new(amount, ScriptPublicKey::from_vec(0, vec![0x20, i as u8, 0xac]), i * 10, i == 0),
        )
    }

    #[test]
    fn test_serialize_utxo_layout() {
        let (outpoint, entry) = utxo(3, 5000);
        let bytes = serialize_utxo(&outpoint, &entry);
        assert_eq!(bytes.len(), 32 + 4 + 8 + 8 + 1 + 2 + 8 + 3);
        assert_eq!(&bytes[..32], outpoint.transaction_id.as_bytes());
        assert_eq!(&bytes[32..36], &3u32.to_le_bytes());
        assert_eq!(&bytes[36..44], &5000u64.to_le_bytes());
        assert_eq!(&bytes[44..52], &30u64.to_le_bytes());
        assert_eq!(bytes[52], 0);
        assert_eq!(&bytes[53..55], &0u16.to_le_bytes());
        assert_eq!(&bytes[55..63], &3u64.to_le_bytes());
        assert_eq!(&bytes[63..], &[0x20, 3, 0xac]);
    }

    #[test]
    fn test_add_remove_utxos() {
        let mut muhash = MuHash::new();
        let empty = muhash.finalize();
        let (o1, e1) = utxo(1, 100);
        let (o2, e2) = utxo(2, 200);

        muhash.add_utxo(&o1, &e1);
        muhash.add_utxo(&o2, &e2);
        let mut reversed = MuHash::from_utxo(&o2, &e2);
        reversed.add_utxo(&o1, &e1);
        assert_eq!(muhash.finalize(), reversed.finalize());

        muhash.remove_utxo(&o1, &e1);
        assert_eq!(muhash.finalize(), MuHash::from_utxo(&o2, &e2).finalize());
        muhash.remove_utxo(&o2, &e2);
        assert_eq!(muhash.finalize(), empty);
    }

    #[test]
    fn test_entry_fields_are_committed() {
        let (outpoint, entry) = utxo(4, 100);
        let mut coinbase = entry.clone();
        coinbase.is_coinbase = true;
        assert_ne!(MuHash::from_utxo(&outpoint, &entry).finalize(), MuHash::from_utxo(&outpoint, &coinbase).finalize());
    }
}
