//! Cell states shared by the own board and the inferred enemy board.

use crate::common::Orientation;

/// Which piece of a ship a cell holds.
///
/// `Top`/`Bottom`/`Left`/`Right` are end-caps, `Horizontal`/`Vertical` are
/// interior segments and `Single` is a one-cell ship that is both ends at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Part {
    Top,
    Bottom,
    Left,
    Right,
    Horizontal,
    Vertical,
    Single,
}

impl Part {
    /// Part for position `index` of a ship of `len` cells along `orientation`.
    pub fn for_position(orientation: Orientation, index: usize, len: usize) -> Self {
        match (orientation, len, index) {
            (_, 1, _) => Part::Single,
            (Orientation::Vertical, _, 0) => Part::Top,
            (Orientation::Vertical, _, i) if i + 1 == len => Part::Bottom,
            (Orientation::Vertical, _, _) => Part::Vertical,
            (Orientation::Horizontal, _, 0) => Part::Left,
            (Orientation::Horizontal, _, i) if i + 1 == len => Part::Right,
            (Orientation::Horizontal, _, _) => Part::Horizontal,
        }
    }
}

/// State of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    /// Own-board water.
    #[default]
    Empty,
    /// Enemy-board cell nobody has reported on.
    Unknown,
    /// Enemy-board hit on a ship that is still afloat.
    Hit,
    Miss,
    Ship { part: Part, destroyed: bool },
}

impl Cell {
    pub const fn ship(part: Part) -> Self {
        Cell::Ship {
            part,
            destroyed: false,
        }
    }

    pub const fn wreck(part: Part) -> Self {
        Cell::Ship {
            part,
            destroyed: true,
        }
    }

    /// A ship segment that has not been shot yet.
    pub fn is_live_ship(self) -> bool {
        matches!(
            self,
            Cell::Ship {
                destroyed: false,
                ..
            }
        )
    }

    /// A ship segment that has been shot.
    pub fn is_destroyed_ship(self) -> bool {
        matches!(
            self,
            Cell::Ship {
                destroyed: true,
                ..
            }
        )
    }

    /// The ship part, whether destroyed or not.
    pub fn part(self) -> Option<Part> {
        match self {
            Cell::Ship { part, .. } => Some(part),
            _ => None,
        }
    }
}
