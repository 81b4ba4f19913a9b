use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;

use crate::protocol::Message;
use crate::transport::{Inbound, Transport};

type Queue = Arc<Mutex<VecDeque<String>>>;

/// Pair of connected in-process endpoints carrying encoded lines.
pub struct InMemoryTransport {
    recv_queue: Queue,
    send_queue: Queue,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let q1 = Arc::new(Mutex::new(VecDeque::new()));
        let q2 = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                send_queue: q2.clone(),
            },
            Self {
                recv_queue: q2,
                send_queue: q1,
            },
        )
    }

    /// Push a raw line to the peer, bypassing the encoder.
    pub fn send_raw(&mut self, line: &str) {
        lock(&self.send_queue).push_back(line.to_string());
    }
}

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<String>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: &Message) -> anyhow::Result<()> {
        // The peer holds the only other reference to our send queue.
        if Arc::strong_count(&self.send_queue) == 1 {
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        lock(&self.send_queue).push_back(msg.encode());
        Ok(())
    }

    fn drain(&mut self) -> anyhow::Result<Inbound> {
        let mut inbound = Inbound::default();
        let mut queue = lock(&self.recv_queue);
        while let Some(line) = queue.pop_front() {
            let msg = Message::decode(&line).with_context(|| format!("bad line {:?}", line))?;
            inbound.messages.push(msg);
        }
        inbound.closed = Arc::strong_count(&self.recv_queue) == 1;
        Ok(inbound)
    }
}
