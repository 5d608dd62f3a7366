pub mod acceptance_data_store;
pub mod block_store;
pub mod ghostdag_store;
pub mod multiset_store;
pub mod utxo_diff_store;
pub mod utxo_set_store;
pub mod virtual_state_store;

pub use acceptance_data_store::{new_acceptance_data_store, AcceptanceDataStore};
pub use block_store::BlockStore;
pub use ghostdag_store::{new_ghostdag_store, GhostdagStore};
pub use multiset_store::{MuHashCodec, MultisetStore};
pub use utxo_diff_store::{new_utxo_diff_store, UtxoDiffStore};
pub use utxo_set_store::UtxoSetStore;
pub use virtual_state_store::{VirtualState, VirtualStateStore};
