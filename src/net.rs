//! Connection establishment: listen, dial, or meet through a relay.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use crate::config::MAX_KEY_LINE;
use crate::relay::wire::{read_line, PlayerSlot, RelayKey};

/// How to reach the other player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Wait for the peer on `0.0.0.0:port`. Port 0 picks a free port.
    Listen { port: u16 },
    /// Connect to a listening peer.
    Dial { addr: String },
    /// Meet the peer at a relay under a shared key.
    Relay { addr: String, key: RelayKey },
}

/// Progress of [`establish`], published for the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    /// Bound and waiting for the peer to connect.
    Listening(SocketAddr),
    Dialing(SocketAddr),
    SendingKey,
    /// Key sent; waiting for the relay to find a partner.
    WaitingForPeer,
    Connected(PlayerSlot),
}

/// A live connection to the other player.
#[derive(Debug)]
pub struct Established {
    pub stream: TcpStream,
    pub slot: PlayerSlot,
    pub peer: SocketAddr,
}

#[derive(Debug)]
pub enum ConnectError {
    InvalidAddress(String),
    Io(io::Error),
    /// The relay refused the key.
    Rejected(String),
    /// The relay answered with something other than a handshake.
    UnexpectedHandshake(String),
    /// The connection closed before the handshake finished.
    Closed,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::InvalidAddress(a) => write!(f, "invalid address `{}`", a),
            ConnectError::Io(e) => write!(f, "connection failed: {}", e),
            ConnectError::Rejected(reason) => write!(f, "relay rejected the key: {}", reason),
            ConnectError::UnexpectedHandshake(line) => write!(f, "unexpected relay reply `{}`", line),
            ConnectError::Closed => write!(f, "connection closed during handshake"),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConnectError {
    fn from(e: io::Error) -> Self {
        ConnectError::Io(e)
    }
}

/// Parse `host:port`, where host is an IP literal or `localhost`.
pub fn parse_addr(raw: &str) -> Result<SocketAddr, ConnectError> {
    let invalid = || ConnectError::InvalidAddress(raw.to_string());
    let (host, port) = raw.trim().rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;
    let ip = if host.eq_ignore_ascii_case("localhost") {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|_| invalid())?
    };
    Ok(SocketAddr::new(ip, port))
}

/// Run `strategy` to completion, reporting each stage on `stage`.
pub async fn establish(strategy: Strategy, stage: &watch::Sender<Stage>) -> Result<Established, ConnectError> {
    let established = match strategy {
        Strategy::Listen { port } => {
            let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
            stage.send_replace(Stage::Listening(listener.local_addr()?));
            let (stream, peer) = listener.accept().await?;
            log::info!("peer connected from {}", peer);
            Established {
                stream,
                slot: PlayerSlot::One,
                peer,
            }
        }
        Strategy::Dial { addr } => {
            let addr = parse_addr(&addr)?;
            stage.send_replace(Stage::Dialing(addr));
            let stream = TcpStream::connect(addr).await?;
            log::info!("connected to {}", addr);
            Established {
                stream,
                slot: PlayerSlot::Two,
                peer: addr,
            }
        }
        Strategy::Relay { addr, key } => {
            let addr = parse_addr(&addr)?;
            stage.send_replace(Stage::Dialing(addr));
            let mut stream = TcpStream::connect(addr).await?;
            stage.send_replace(Stage::SendingKey);
            stream.write_all(format!("{}\n", key).as_bytes()).await?;
            stage.send_replace(Stage::WaitingForPeer);
            let slot = read_handshake(&mut stream).await?;
            log::info!("relay paired us as player {}", if slot.is_player_1() { 1 } else { 2 });
            Established {
                stream,
                slot,
                peer: addr,
            }
        }
    };
    stage.send_replace(Stage::Connected(established.slot));
    Ok(established)
}

async fn read_handshake(stream: &mut TcpStream) -> Result<PlayerSlot, ConnectError> {
    let line = read_line(stream, MAX_KEY_LINE).await?.ok_or(ConnectError::Closed)?;
    if let Some(slot) = PlayerSlot::from_handshake(&line) {
        return Ok(slot);
    }
    match line.strip_prefix("error:") {
        Some(reason) => Err(ConnectError::Rejected(reason.trim().to_string())),
        None => Err(ConnectError::UnexpectedHandshake(line)),
    }
}
