//! Text wire protocol spoken between two peers.
//!
//! Every message is one ASCII line: a keyword, a space, then comma-separated
//! arguments. The sender mirrors each x coordinate on the way out, so a
//! decoded message is already in the receiver's own frame.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::common::{mirror_x, Coord, Orientation, Span};
use crate::config::{COLUMN, MAX_LINE_LEN, ROW};

/// Messages exchanged between peers during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Shoot at the receiver's cell.
    Fire(Coord),
    /// The last shot hit a ship that is still afloat.
    Hit(Coord),
    /// The last shot hit open water.
    Miss(Coord),
    /// The last shot sank the whole ship.
    Destroyed(Span),
    /// Sender finished placing ships.
    Ready { turn_factor: bool, max_hp: u32 },
    /// The last shot landed on an already-resolved cell.
    Ignore,
}

impl Message {
    /// Render the message as a wire line, mirroring x coordinates.
    ///
    /// Coordinates must be on the board.
    pub fn encode(&self) -> String {
        match *self {
            Message::Fire(c) => format!("FIRE {},{}\n", mirror_x(c.x), c.y),
            Message::Hit(c) => format!("HIT {},{}\n", mirror_x(c.x), c.y),
            Message::Miss(c) => format!("MISS {},{}\n", mirror_x(c.x), c.y),
            Message::Destroyed(span) => match span.orientation {
                Orientation::Vertical => format!(
                    "DESTROYED v,{},{},{}\n",
                    mirror_x(span.start.x),
                    span.start.y,
                    span.end.y
                ),
                // Mirroring reverses the column order: left end goes first.
                Orientation::Horizontal => format!(
                    "DESTROYED h,{},{},{}\n",
                    mirror_x(span.start.x),
                    mirror_x(span.end.x),
                    span.start.y
                ),
            },
            Message::Ready {
                turn_factor,
                max_hp,
            } => format!("READY {},{}\n", u8::from(turn_factor), max_hp),
            Message::Ignore => String::from("IGNORE\n"),
        }
    }

    /// Parse one line, with or without its trailing newline.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.len() >= MAX_LINE_LEN {
            return Err(ProtocolError::LineTooLong(line.len()));
        }
        let (method, params) = match line.split_once(' ') {
            Some((method, params)) => (method, Some(params)),
            None => (line, None),
        };
        match method {
            "FIRE" => Ok(Message::Fire(coord_args(params)?)),
            "HIT" => Ok(Message::Hit(coord_args(params)?)),
            "MISS" => Ok(Message::Miss(coord_args(params)?)),
            "DESTROYED" => {
                let [dir, a, b, c] = split_args::<4>(params)?;
                let span = match dir {
                    "v" => {
                        let x = column(a)?;
                        let (y1, y2) = (row(b)?, row(c)?);
                        Span {
                            orientation: Orientation::Vertical,
                            start: Coord::new(x, y1.min(y2)),
                            end: Coord::new(x, y1.max(y2)),
                        }
                    }
                    "h" => {
                        let (x1, x2) = (column(a)?, column(b)?);
                        let y = row(c)?;
                        Span {
                            orientation: Orientation::Horizontal,
                            start: Coord::new(x1.min(x2), y),
                            end: Coord::new(x1.max(x2), y),
                        }
                    }
                    other => return Err(ProtocolError::InvalidDirection(String::from(other))),
                };
                Ok(Message::Destroyed(span))
            }
            "READY" => {
                let [factor, hp] = split_args::<2>(params)?;
                let turn_factor = match factor {
                    "0" => false,
                    "1" => true,
                    other => return Err(ProtocolError::InvalidTurnFactor(String::from(other))),
                };
                Ok(Message::Ready {
                    turn_factor,
                    max_hp: number(hp)?,
                })
            }
            "IGNORE" => match params {
                None => Ok(Message::Ignore),
                Some(_) => Err(ProtocolError::ExtraArgument),
            },
            other => Err(ProtocolError::UnknownMessage(String::from(other))),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().trim_end())
    }
}

fn split_args<const N: usize>(params: Option<&str>) -> Result<[&str; N], ProtocolError> {
    let params = params.ok_or(ProtocolError::MissingArgument)?;
    let mut out = [""; N];
    let mut parts = params.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next().ok_or(ProtocolError::MissingArgument)?;
    }
    if parts.next().is_some() {
        return Err(ProtocolError::ExtraArgument);
    }
    Ok(out)
}

fn coord_args(params: Option<&str>) -> Result<Coord, ProtocolError> {
    let [x, y] = split_args::<2>(params)?;
    Ok(Coord::new(column(x)?, row(y)?))
}

fn number<T: FromStr>(field: &str) -> Result<T, ProtocolError> {
    field
        .trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(String::from(field)))
}

fn column(field: &str) -> Result<usize, ProtocolError> {
    let x = number(field)?;
    if x >= COLUMN {
        return Err(ProtocolError::OutOfRange(x));
    }
    Ok(x)
}

fn row(field: &str) -> Result<usize, ProtocolError> {
    let y = number(field)?;
    if y >= ROW {
        return Err(ProtocolError::OutOfRange(y));
    }
    Ok(y)
}

/// Reasons a peer's line could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    UnknownMessage(String),
    MissingArgument,
    ExtraArgument,
    InvalidNumber(String),
    InvalidTurnFactor(String),
    InvalidDirection(String),
    OutOfRange(usize),
    LineTooLong(usize),
    InvalidUtf8,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownMessage(m) => write!(f, "unknown message `{}`", m),
            ProtocolError::MissingArgument => write!(f, "missing argument"),
            ProtocolError::ExtraArgument => write!(f, "unexpected extra argument"),
            ProtocolError::InvalidNumber(s) => write!(f, "`{}` is not a number", s),
            ProtocolError::InvalidTurnFactor(s) => write!(f, "turn factor `{}` is not 0 or 1", s),
            ProtocolError::InvalidDirection(s) => write!(f, "direction `{}` is not h or v", s),
            ProtocolError::OutOfRange(n) => write!(f, "coordinate {} is off the board", n),
            ProtocolError::LineTooLong(n) => {
                write!(f, "line of {} bytes exceeds {} bytes", n, MAX_LINE_LEN)
            }
            ProtocolError::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

/// Reassembles newline-terminated lines from arbitrary stream chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete line without its newline, `Ok(None)` if none is buffered yet.
    pub fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.buf.iter().position(|&b| b == b'\n') {
            Some(idx) => {
                if idx >= MAX_LINE_LEN {
                    return Err(ProtocolError::LineTooLong(idx));
                }
                let line: Vec<u8> = self.buf.drain(..=idx).take(idx).collect();
                String::from_utf8(line)
                    .map(Some)
                    .map_err(|_| ProtocolError::InvalidUtf8)
            }
            None if self.buf.len() >= MAX_LINE_LEN => Err(ProtocolError::LineTooLong(self.buf.len())),
            None => Ok(None),
        }
    }

    /// Next complete message, `Ok(None)` if no full line is buffered yet.
    pub fn next_message(&mut self) -> Result<Option<Message>, ProtocolError> {
        match self.next_line()? {
            Some(line) => Message::decode(&line).map(Some),
            None => Ok(None),
        }
    }

    /// Bytes of a line still waiting for its newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
