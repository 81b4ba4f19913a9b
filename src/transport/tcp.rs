use std::io::ErrorKind;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use crate::config::{MAX_LINE_LEN, SEND_TIMEOUT};
use crate::protocol::{LineBuffer, Message};
use crate::transport::{Inbound, Transport};

/// Bytes pulled from the socket per `try_read` call.
const READ_CHUNK: usize = 512;

/// Line-framed protocol over a connected TCP stream.
pub struct TcpTransport {
    stream: TcpStream,
    lines: LineBuffer,
    timeout_duration: Duration,
    closed: bool,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, SEND_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self {
            stream,
            lines: LineBuffer::new(),
            timeout_duration,
            closed: false,
        }
    }

    /// Read whatever the socket has buffered without waiting, stopping once a
    /// full line's worth is pending so a peer cannot grow the buffer unchecked.
    fn fill(&mut self) -> anyhow::Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        while !self.closed && self.lines.pending() < MAX_LINE_LEN {
            match self.stream.try_read(&mut chunk) {
                Ok(0) => self.closed = true,
                Ok(n) => self.lines.push(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::ConnectionReset => {
                    return Err(anyhow::anyhow!("Connection reset by peer"));
                }
                Err(e) => return Err(anyhow::anyhow!("Read error: {}", e)),
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: &Message) -> anyhow::Result<()> {
        let line = msg.encode();
        let limit = self.timeout_duration;
        let stream = &mut self.stream;
        let send_op = async move {
            stream.write_all(line.as_bytes()).await.map_err(|e| {
                if e.kind() == ErrorKind::BrokenPipe || e.kind() == ErrorKind::ConnectionReset {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })
        };
        timeout(limit, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", limit))?
    }

    fn drain(&mut self) -> anyhow::Result<Inbound> {
        self.fill()?;
        let mut inbound = Inbound::default();
        while let Some(msg) = self.lines.next_message().context("malformed line from peer")? {
            inbound.messages.push(msg);
        }
        if self.closed && self.lines.pending() > 0 {
            log::debug!("peer closed with {} bytes of an unfinished line", self.lines.pending());
        }
        inbound.closed = self.closed;
        Ok(inbound)
    }
}
