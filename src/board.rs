//! Board grid: ship placement, shot resolution and destroyed-ship detection.

use core::fmt;

use rand::Rng;

use crate::cell::{Cell, Part};
use crate::common::{BoardError, Coord, Direction, Orientation, Outcome, Span};
use crate::config::{COLUMN, ROW};

/// Attempts made by [`Board::random_placement`] before giving up.
const PLACEMENT_ATTEMPTS: usize = 100;

/// A `ROW x COLUMN` grid of cells owned by one player.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLUMN]; ROW],
}

impl Board {
    /// The player's own board: open water everywhere.
    pub fn own() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMN]; ROW],
        }
    }

    /// The inferred view of the opponent's board: nothing known yet.
    pub fn enemy() -> Self {
        Self {
            cells: [[Cell::Unknown; COLUMN]; ROW],
        }
    }

    pub fn get(&self, c: Coord) -> Result<Cell, BoardError> {
        if !c.in_bounds() {
            return Err(BoardError::OutOfBounds(c));
        }
        Ok(self.cells[c.y][c.x])
    }

    /// Overwrite a single cell.
    pub fn mark(&mut self, c: Coord, cell: Cell) -> Result<(), BoardError> {
        if !c.in_bounds() {
            return Err(BoardError::OutOfBounds(c));
        }
        self.cells[c.y][c.x] = cell;
        Ok(())
    }

    /// Rows of cells, row 0 first.
    pub fn rows(&self) -> &[[Cell; COLUMN]; ROW] {
        &self.cells
    }

    /// Number of ship segments not yet shot.
    pub fn live_ship_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_live_ship())
            .count()
    }

    /// Place a ship between two endpoints sharing a row or column.
    ///
    /// The board is left untouched when any cell of the span already holds a
    /// live ship. Equal endpoints place a single-cell ship.
    pub fn place_ship(&mut self, a: Coord, b: Coord) -> Result<Span, BoardError> {
        let span = Span::between(a, b)?;
        if span.cells().any(|c| self.cells[c.y][c.x].is_live_ship()) {
            return Err(BoardError::ShipOverlaps);
        }
        let len = span.len();
        for (i, c) in span.cells().enumerate() {
            self.cells[c.y][c.x] = Cell::ship(Part::for_position(span.orientation, i, len));
        }
        Ok(span)
    }

    /// Remove the live ship running through `c`, returning its span.
    pub fn remove_ship(&mut self, c: Coord) -> Option<Span> {
        if !self.get(c).ok()?.is_live_ship() {
            return None;
        }
        let span = self.ship_span(c).ok()?;
        for cell in span.cells() {
            self.cells[cell.y][cell.x] = Cell::Empty;
        }
        Some(span)
    }

    /// Returns a random straight span of `len` cells that overlaps no live ship.
    pub fn random_placement<R: Rng>(&self, rng: &mut R, len: usize) -> Result<Span, BoardError> {
        if len == 0 || (len > COLUMN && len > ROW) {
            return Err(BoardError::UnableToPlaceShip);
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if len <= ROW && (len > COLUMN || rng.random()) {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (COLUMN - len, ROW - 1),
                Orientation::Vertical => (COLUMN - 1, ROW - len),
            };
            let start = Coord::new(rng.random_range(0..=max_x), rng.random_range(0..=max_y));
            let end = match orientation {
                Orientation::Horizontal => Coord::new(start.x + len - 1, start.y),
                Orientation::Vertical => Coord::new(start.x, start.y + len - 1),
            };
            let span = Span::between(start, end)?;
            if !span.cells().any(|c| self.cells[c.y][c.x].is_live_ship()) {
                return Ok(span);
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Resolve an incoming shot at `c`.
    ///
    /// A live segment is flipped to destroyed and the ship checked for
    /// destruction; open water becomes a miss; anything else is ignored.
    pub fn resolve_shot(&mut self, c: Coord) -> Result<Outcome, BoardError> {
        match self.get(c)? {
            Cell::Ship {
                part,
                destroyed: false,
            } => {
                self.cells[c.y][c.x] = Cell::wreck(part);
                match self.destroyed_span(c)? {
                    Some(span) => Ok(Outcome::Destroyed(span)),
                    None => Ok(Outcome::Hit(c)),
                }
            }
            Cell::Empty => {
                self.cells[c.y][c.x] = Cell::Miss;
                Ok(Outcome::Miss(c))
            }
            _ => Ok(Outcome::Ignore),
        }
    }

    /// Paint a reported wreck onto the board, end-caps included.
    pub fn mark_destroyed(&mut self, span: Span) -> Result<(), BoardError> {
        let len = span.len();
        for (i, c) in span.cells().enumerate() {
            self.mark(c, Cell::wreck(Part::for_position(span.orientation, i, len)))?;
        }
        Ok(())
    }

    /// Span of the ship through `c` if every segment of it is destroyed.
    ///
    /// Walks from the destroyed cell towards the opposite end-cap (both ways
    /// for an interior segment). Meeting a live segment means the ship is
    /// still afloat.
    pub fn destroyed_span(&self, c: Coord) -> Result<Option<Span>, BoardError> {
        let part = match self.get(c)? {
            Cell::Ship {
                part,
                destroyed: true,
            } => part,
            _ => return Ok(None),
        };
        let (start, end) = match part {
            Part::Single => (Some(c), Some(c)),
            Part::Top => (Some(c), self.walk(c, Direction::Down, Part::Bottom, true)?),
            Part::Bottom => (self.walk(c, Direction::Up, Part::Top, true)?, Some(c)),
            Part::Left => (Some(c), self.walk(c, Direction::Right, Part::Right, true)?),
            Part::Right => (self.walk(c, Direction::Left, Part::Left, true)?, Some(c)),
            Part::Horizontal => match self.walk(c, Direction::Left, Part::Left, true)? {
                Some(left) => (Some(left), self.walk(c, Direction::Right, Part::Right, true)?),
                None => (None, None),
            },
            Part::Vertical => match self.walk(c, Direction::Up, Part::Top, true)? {
                Some(top) => (Some(top), self.walk(c, Direction::Down, Part::Bottom, true)?),
                None => (None, None),
            },
        };
        match (start, end) {
            (Some(start), Some(end)) => Span::between(start, end).map(Some),
            _ => Ok(None),
        }
    }

    /// Full span of the ship through `c`, destroyed or not.
    fn ship_span(&self, c: Coord) -> Result<Span, BoardError> {
        let part = self.get(c)?.part().ok_or(BoardError::MalformedShip(c))?;
        let malformed = BoardError::MalformedShip(c);
        let (start, end) = match part {
            Part::Single => (c, c),
            Part::Top => (c, self.walk(c, Direction::Down, Part::Bottom, false)?.ok_or(malformed)?),
            Part::Bottom => (self.walk(c, Direction::Up, Part::Top, false)?.ok_or(malformed)?, c),
            Part::Left => (c, self.walk(c, Direction::Right, Part::Right, false)?.ok_or(malformed)?),
            Part::Right => (self.walk(c, Direction::Left, Part::Left, false)?.ok_or(malformed)?, c),
            Part::Horizontal => (
                self.walk(c, Direction::Left, Part::Left, false)?.ok_or(malformed)?,
                self.walk(c, Direction::Right, Part::Right, false)?.ok_or(malformed)?,
            ),
            Part::Vertical => (
                self.walk(c, Direction::Up, Part::Top, false)?.ok_or(malformed)?,
                self.walk(c, Direction::Down, Part::Bottom, false)?.ok_or(malformed)?,
            ),
        };
        Span::between(start, end)
    }

    /// Step from `from` in `dir` until the `cap` end-cap.
    ///
    /// With `stop_at_live` a live segment ends the walk with `Ok(None)`;
    /// only destroyed interior segments are crossed and the cap must be
    /// destroyed too. Anything other than a segment of the same axis is a
    /// corrupt board.
    fn walk(
        &self,
        from: Coord,
        dir: Direction,
        cap: Part,
        stop_at_live: bool,
    ) -> Result<Option<Coord>, BoardError> {
        let interior = match cap {
            Part::Top | Part::Bottom => Part::Vertical,
            _ => Part::Horizontal,
        };
        let mut at = from;
        loop {
            at = at.step(dir).ok_or(BoardError::MalformedShip(from))?;
            match self.cells[at.y][at.x] {
                Cell::Ship {
                    destroyed: false, ..
                } if stop_at_live => return Ok(None),
                Cell::Ship { part, .. } if part == cap => return Ok(Some(at)),
                Cell::Ship { part, .. } if part == interior => continue,
                _ => return Err(BoardError::MalformedShip(from)),
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::own()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in &self.cells {
            write!(f, "  ")?;
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Unknown => '?',
                    Cell::Hit => 'x',
                    Cell::Miss => 'o',
                    Cell::Ship {
                        destroyed: false, ..
                    } => 'S',
                    Cell::Ship { destroyed: true, .. } => '#',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
