//! Common types for broadside: coordinates, spans, shot outcomes and board errors.

use crate::config::{COLUMN, ROW};

/// A cell position. `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns `true` when the coordinate lies on a `COLUMN x ROW` board.
    pub fn in_bounds(&self) -> bool {
        self.x < COLUMN && self.y < ROW
    }

    /// The same cell seen from the opponent's side of the table.
    pub fn mirrored(self) -> Self {
        Self {
            x: mirror_x(self.x),
            y: self.y,
        }
    }

    /// Neighbouring cell in `dir`, or `None` past the board edge.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let next = match dir {
            Direction::Up => Coord::new(self.x, self.y.checked_sub(1)?),
            Direction::Down => Coord::new(self.x, self.y + 1),
            Direction::Left => Coord::new(self.x.checked_sub(1)?, self.y),
            Direction::Right => Coord::new(self.x + 1, self.y),
        };
        next.in_bounds().then_some(next)
    }
}

/// Grid direction, `Up` being towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Column flip applied whenever an x coordinate crosses the wire.
///
/// Callers must pass `x < COLUMN`.
pub const fn mirror_x(x: usize) -> usize {
    COLUMN - x - 1
}

/// Axis a ship lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight run of cells, `start <= end` along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub orientation: Orientation,
    pub start: Coord,
    pub end: Coord,
}

impl Span {
    /// Build a span from two endpoints given in any order.
    ///
    /// Two equal endpoints give a single-cell vertical span.
    pub fn between(a: Coord, b: Coord) -> Result<Self, BoardError> {
        if !a.in_bounds() {
            return Err(BoardError::OutOfBounds(a));
        }
        if !b.in_bounds() {
            return Err(BoardError::OutOfBounds(b));
        }
        if a.x == b.x {
            let (start, end) = if a.y <= b.y { (a, b) } else { (b, a) };
            Ok(Self {
                orientation: Orientation::Vertical,
                start,
                end,
            })
        } else if a.y == b.y {
            let (start, end) = if a.x <= b.x { (a, b) } else { (b, a) };
            Ok(Self {
                orientation: Orientation::Horizontal,
                start,
                end,
            })
        } else {
            Err(BoardError::NotStraight(a, b))
        }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.end.x - self.start.x + 1,
            Orientation::Vertical => self.end.y - self.start.y + 1,
        }
    }

    /// Spans always cover at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cells from `start` to `end`.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let span = *self;
        (0..span.len()).map(move |i| match span.orientation {
            Orientation::Horizontal => Coord::new(span.start.x + i, span.start.y),
            Orientation::Vertical => Coord::new(span.start.x, span.start.y + i),
        })
    }

    pub fn contains(&self, c: Coord) -> bool {
        match self.orientation {
            Orientation::Horizontal => {
                c.y == self.start.y && c.x >= self.start.x && c.x <= self.end.x
            }
            Orientation::Vertical => {
                c.x == self.start.x && c.y >= self.start.y && c.y <= self.end.y
            }
        }
    }
}

/// Result of resolving an incoming shot against the own board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A live ship segment was hit; the ship is still afloat.
    Hit(Coord),
    /// Open water.
    Miss(Coord),
    /// The shot finished off the whole ship.
    Destroyed(Span),
    /// The cell was already resolved.
    Ignore,
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate lies outside the board.
    OutOfBounds(Coord),
    /// Placement endpoints share neither a row nor a column.
    NotStraight(Coord, Coord),
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// No free straight run of the requested length was found.
    UnableToPlaceShip,
    /// A destroyed run has no matching end-cap; the board is corrupt.
    MalformedShip(Coord),
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds(c) => write!(f, "Coordinate ({}, {}) is off the board", c.x, c.y),
            BoardError::NotStraight(a, b) => write!(
                f,
                "Ship endpoints ({}, {}) and ({}, {}) are not in a straight line",
                a.x, a.y, b.x, b.y
            ),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::MalformedShip(c) => {
                write!(f, "Ship run through ({}, {}) has no end-cap", c.x, c.y)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
