//! Rendezvous relay: pairs two connections presenting the same key and
//! forwards bytes between them.

pub mod pending;
pub mod proxy;
pub mod server;
pub mod wire;

pub use pending::{Entry, PendingList};
pub use proxy::{relay_pair, ProxyStats};
pub use server::{start_relay, RelayHandle};
pub use wire::{KeyError, PlayerSlot, RelayKey, INVALID_CONNECTION};
