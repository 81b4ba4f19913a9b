//! Byte forwarding between two paired connections.

use std::io::ErrorKind;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::relay::wire::PlayerSlot;

const BUFFER_SIZE: usize = 1024;

/// Bytes forwarded in each direction by one pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProxyStats {
    pub first_to_second: u64,
    pub second_to_first: u64,
}

/// Acknowledge both sides, then forward bytes until either side closes.
///
/// `first` is the connection that waited and becomes player 1. Both sockets
/// are closed when this returns.
pub async fn relay_pair(
    mut first: TcpStream,
    mut second: TcpStream,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<ProxyStats> {
    first
        .write_all(PlayerSlot::One.handshake_line().as_bytes())
        .await
        .context("acknowledging waiting peer")?;
    second
        .write_all(PlayerSlot::Two.handshake_line().as_bytes())
        .await
        .context("acknowledging matching peer")?;

    let mut stats = ProxyStats::default();
    let (mut r1, mut w1) = first.split();
    let (mut r2, mut w2) = second.split();
    let mut buf1 = [0u8; BUFFER_SIZE];
    let mut buf2 = [0u8; BUFFER_SIZE];

    if *shutdown.borrow() {
        return Ok(stats);
    }
    loop {
        tokio::select! {
            res = r1.read(&mut buf1) => {
                let Some(n) = closed_or(res)? else { break };
                w2.write_all(&buf1[..n]).await.context("forwarding to player 2")?;
                stats.first_to_second += n as u64;
            }
            res = r2.read(&mut buf2) => {
                let Some(n) = closed_or(res)? else { break };
                w1.write_all(&buf2[..n]).await.context("forwarding to player 1")?;
                stats.second_to_first += n as u64;
            }
            _ = shutdown.changed() => break,
        }
    }
    Ok(stats)
}

/// `None` once the reading side is gone, the byte count otherwise.
fn closed_or(res: std::io::Result<usize>) -> anyhow::Result<Option<usize>> {
    match res {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(e) if e.kind() == ErrorKind::ConnectionReset => Ok(None),
        Err(e) => Err(anyhow::anyhow!("Read error: {}", e)),
    }
}
