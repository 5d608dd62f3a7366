use super::HasherExtensions;
use crate::tx::{Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput};
use jio_hashes::{Hasher, HasherBase, TransactionID};

/// Returns the transaction ID. Every field except the cached id takes part.
pub fn id(tx: &Transaction) -> TransactionId {
    let mut hasher = TransactionID::new();
    write_transaction(&mut hasher, tx);
    hasher.finalize()
}

fn write_transaction<T: HasherBase>(hasher: &mut T, tx: &Transaction) {
    hasher.write_u16(tx.version).write_len(tx.inputs.len());
    for input in tx.inputs.iter() {
        write_input(hasher, input);
    }

    hasher.write_len(tx.outputs.len());
    for output in tx.outputs.iter() {
        write_output(hasher, output);
    }

    hasher.write_u64(tx.lock_time).update(&tx.subnetwork_id).write_u64(tx.gas).write_var_bytes(&tx.payload);
}

#[inline(always)]
fn write_input<T: HasherBase>(hasher: &mut T, input: &TransactionInput) {
    write_outpoint(hasher, &input.previous_outpoint);
    hasher.write_var_bytes(&input.signature_script).write_u64(input.sequence).write_u8(input.sig_op_count);
}

#[inline(always)]
fn write_outpoint<T: HasherBase>(hasher: &mut T, outpoint: &TransactionOutpoint) {
    hasher.update(outpoint.transaction_id).write_u32(outpoint.index);
}

#[inline(always)]
fn write_output<T: HasherBase>(hasher: &mut T, output: &TransactionOutput) {
    hasher
        .write_u64(output.value)
        .write_u16(output.script_public_key.version())
        .write_var_bytes(output.script_public_key.script());
}
