pub mod utxo_collection;
pub mod utxo_diff;
pub mod utxo_error;

pub use utxo_collection::UtxoCollection;
pub use utxo_diff::UtxoDiff;
pub use utxo_error::{UtxoAlgebraError, UtxoResult};
