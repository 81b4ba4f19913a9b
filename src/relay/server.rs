//! Accept loop and per-connection rendezvous.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep, timeout};

use crate::config::{RelayConfig, MAX_KEY_LINE};
use crate::relay::pending::PendingList;
use crate::relay::proxy::relay_pair;
use crate::relay::wire::{read_line, RelayKey, INVALID_CONNECTION};

/// Pause after a failed `accept` so a persistent error (out of descriptors)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// How long a rejected client gets to read the error line before we close.
const REJECT_LINGER: Duration = Duration::from_millis(200);

/// Waiting connections shared by all handler tasks.
pub type SharedPending = Arc<Mutex<PendingList<TcpStream>>>;

fn lock(pending: &SharedPending) -> MutexGuard<'_, PendingList<TcpStream>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running relay. Dropping the handle also stops the relay.
pub struct RelayHandle {
    addr: SocketAddr,
    pending: SharedPending,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connections currently waiting for a partner.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn pending_capacity(&self) -> usize {
        lock(&self.pending).capacity()
    }

    /// Stop accepting, cancel in-flight pairings and close waiting sockets.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            log::warn!("relay accept loop ended abnormally: {}", e);
        }
        lock(&self.pending).clear();
    }
}

/// Bind the relay and start accepting in the background.
pub async fn start_relay(config: RelayConfig) -> anyhow::Result<RelayHandle> {
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding relay to {}", config.bind_addr))?;
    let addr = listener.local_addr()?;
    log::info!("relay listening on {}", addr);

    let pending: SharedPending = Arc::new(Mutex::new(PendingList::new(config.min_capacity)));
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(accept_loop(listener, pending.clone(), shutdown_rx));
    Ok(RelayHandle {
        addr,
        pending,
        shutdown,
        task,
    })
}

async fn accept_loop(listener: TcpListener, pending: SharedPending, mut shutdown: watch::Receiver<bool>) {
    let mut tasks = JoinSet::new();
    loop {
        tokio::select! {
            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    log::info!("accepted {}", peer);
                    tasks.spawn(handle_connection(stream, peer, pending.clone(), shutdown.clone()));
                }
                Err(e) => {
                    log::warn!("accept failed: {}, retrying in {:?}", e, ACCEPT_BACKOFF);
                    sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = res {
                    log::warn!("connection task failed: {}", e);
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    log::info!("relay shutting down, cancelling {} tasks", tasks.len());
    tasks.shutdown().await;
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, pending: SharedPending, shutdown: watch::Receiver<bool>) {
    if let Err(e) = rendezvous(stream, peer, pending, shutdown).await {
        log::warn!("{}: {:#}", peer, e);
    }
}

async fn rendezvous(
    mut stream: TcpStream,
    peer: SocketAddr,
    pending: SharedPending,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let key = match read_line(&mut stream, MAX_KEY_LINE).await {
        Ok(Some(line)) => RelayKey::parse(&line).map_err(|e| log::info!("{}: rejected key: {}", peer, e)).ok(),
        Ok(None) => {
            log::debug!("{} closed before sending a key", peer);
            return Ok(());
        }
        Err(e) => {
            log::info!("{}: unreadable key line: {}", peer, e);
            None
        }
    };
    let Some(key) = key else {
        return reject(stream).await;
    };

    let waiting = loop {
        let candidate = {
            let mut list = lock(&pending);
            match list.take(&key) {
                Some(waiting) => waiting,
                None => {
                    log::info!("{} waiting on key {}", peer, key);
                    list.push(key, stream);
                    return Ok(());
                }
            }
        };
        if still_connected(&candidate).await {
            break candidate;
        }
        log::info!("{}: waiter on key {} has gone, dropping it", peer, key);
    };

    log::info!("{} matched key {}", peer, key);
    let stats = relay_pair(waiting, stream, shutdown).await?;
    log::info!(
        "{}: pairing on key {} closed after {} / {} bytes",
        peer,
        key,
        stats.first_to_second,
        stats.second_to_first
    );
    Ok(())
}

/// Send the error line, then read and discard whatever the client still has
/// in flight so that closing does not reset the connection under the reply.
async fn reject(mut stream: TcpStream) -> anyhow::Result<()> {
    stream
        .write_all(INVALID_CONNECTION.as_bytes())
        .await
        .context("rejecting connection")?;
    let _ = stream.shutdown().await;
    let mut sink = [0u8; 256];
    let _ = timeout(REJECT_LINGER, async {
        while matches!(stream.read(&mut sink).await, Ok(n) if n > 0) {}
    })
    .await;
    Ok(())
}

/// Whether a waiting connection is still open: EOF or an error means the
/// client hung up. Peeking leaves any early bytes in place for the pairing.
async fn still_connected(stream: &TcpStream) -> bool {
    let mut byte = [0u8; 1];
    match timeout(Duration::ZERO, stream.peek(&mut byte)).await {
        Err(_) => true,
        Ok(Ok(0)) | Ok(Err(_)) => false,
        Ok(Ok(_)) => true,
    }
}
