#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;
mod action;
mod board;
mod cell;
mod common;
mod config;
mod game;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod net;
mod player;
pub mod protocol;
#[cfg(feature = "std")]
pub mod relay;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use action::*;
pub use board::*;
pub use cell::*;
pub use common::*;
pub use config::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use net::{establish, ConnectError, Established, Stage, Strategy};
pub use player::*;
pub use protocol::*;
#[cfg(feature = "std")]
pub use relay::{start_relay, PlayerSlot, RelayHandle, RelayKey};
#[cfg(feature = "std")]
pub use session::{Session, SessionEnd};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Inbound, Transport};
#[cfg(feature = "std")]
pub use ui::{Frontend, NullFrontend, TextFrontend};
