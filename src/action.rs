//! Player intents fed into the turn state machine.

use crate::common::{Coord, Direction};

/// Something a player asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor one cell.
    Move(Direction),
    /// Mark a placement endpoint while preparing, fire at the cursor while playing.
    Select,
    /// Finish preparation and announce readiness.
    LockIn,
    /// Drop a half-finished placement.
    Cancel,
    /// Place a ship between two endpoints.
    PlaceShip(Coord, Coord),
    /// Fire at a cell of the enemy board.
    FireAt(Coord),
}

impl Action {
    /// Map a raw key code to an action.
    ///
    /// Both vi keys and WASD move the cursor. Enter selects, space locks in
    /// and ESC cancels.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            b'k' | b'w' => Some(Action::Move(Direction::Up)),
            b'j' | b's' => Some(Action::Move(Direction::Down)),
            b'h' | b'a' => Some(Action::Move(Direction::Left)),
            b'l' | b'd' => Some(Action::Move(Direction::Right)),
            b'\n' | b'\r' => Some(Action::Select),
            b' ' => Some(Action::LockIn),
            0x1b => Some(Action::Cancel),
            _ => None,
        }
    }
}
