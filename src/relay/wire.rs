//! Relay handshake lines and rendezvous keys.

use std::fmt;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::KEY_LEN;

/// Sent to a connection whose key line was not a valid key.
pub const INVALID_CONNECTION: &str = "error: invalid connection\n";

/// Which side of the pairing a connection ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn is_player_1(self) -> bool {
        self == PlayerSlot::One
    }

    /// Acknowledgement line the relay writes for this slot.
    pub fn handshake_line(self) -> &'static str {
        match self {
            PlayerSlot::One => "CONNECTED AS 1\n",
            PlayerSlot::Two => "CONNECTED AS 2\n",
        }
    }

    /// Parse an acknowledgement line, newline optional.
    pub fn from_handshake(line: &str) -> Option<Self> {
        match line.trim_end_matches(['\n', '\r']) {
            "CONNECTED AS 1" => Some(PlayerSlot::One),
            "CONNECTED AS 2" => Some(PlayerSlot::Two),
            _ => None,
        }
    }
}

/// A rendezvous key: exactly [`KEY_LEN`] lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelayKey(String);

impl RelayKey {
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let raw = raw.trim_end_matches(['\n', '\r']);
        if let Some(bad) = raw.chars().find(|c| !c.is_ascii_lowercase()) {
            return Err(KeyError::InvalidChar(bad));
        }
        if raw.len() != KEY_LEN {
            return Err(KeyError::WrongLength(raw.len()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RelayKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    WrongLength(usize),
    InvalidChar(char),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::WrongLength(n) => write!(f, "key has {} letters, expected {}", n, KEY_LEN),
            KeyError::InvalidChar(c) => write!(f, "key contains {:?}, only a-z are allowed", c),
        }
    }
}

impl std::error::Error for KeyError {}

/// Read one newline-terminated line a byte at a time.
///
/// Nothing past the newline is consumed, so bytes that follow the handshake
/// stay in the socket for the game. Returns `Ok(None)` on EOF before any byte.
pub async fn read_line<R: AsyncRead + Unpin>(reader: &mut R, max: usize) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte).await? == 0 {
            if line.is_empty() {
                return Ok(None);
            }
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "line cut short"));
        }
        if byte[0] == b'\n' {
            break;
        }
        if line.len() >= max {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line longer than {} bytes", max),
            ));
        }
        line.push(byte[0]);
    }
    String::from_utf8(line)
        .map(Some)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "line is not valid UTF-8"))
}
