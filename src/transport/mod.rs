use alloc::vec::Vec;

use crate::protocol::Message;

/// Messages collected by one non-blocking drain of a transport.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inbound {
    pub messages: Vec<Message>,
    /// The peer closed its end. Messages read before the close are still
    /// delivered in `messages`.
    pub closed: bool,
}

#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, msg: &Message) -> anyhow::Result<()>;

    /// Collect every complete message available right now without waiting.
    fn drain(&mut self) -> anyhow::Result<Inbound>;
}

pub mod in_memory;
pub mod tcp;
