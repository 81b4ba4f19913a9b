use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::action::Action;
use crate::board::Board;
use crate::cell::Cell;
use crate::common::{Coord, Direction};
use crate::config::{COLUMN, FLEET, ROW};
use crate::game::{GameStatus, Phase};

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Actions to apply this tick, given the current state of the match.
    ///
    /// Must not block: a player with nothing to do returns an empty list.
    fn next_actions(&mut self, rng: &mut SmallRng, game: &GameStatus) -> Vec<Action>;
}

/// Computer player: lays out [`FLEET`] at random, then hunts around hits.
#[derive(Debug, Default)]
pub struct AutoPlayer;

impl AutoPlayer {
    pub fn new() -> Self {
        Self
    }

    /// Placement actions for a full fleet followed by a lock-in.
    fn lay_out_fleet(rng: &mut SmallRng) -> Vec<Action> {
        let mut scratch = Board::own();
        let mut actions = Vec::with_capacity(FLEET.len() + 1);
        for &len in FLEET.iter() {
            let span = match scratch.random_placement(rng, len) {
                Ok(span) => span,
                Err(e) => {
                    log::warn!("could not place a ship of length {}: {}", len, e);
                    continue;
                }
            };
            if scratch.place_ship(span.start, span.end).is_ok() {
                actions.push(Action::PlaceShip(span.start, span.end));
            }
        }
        actions.push(Action::LockIn);
        actions
    }

    fn choose_target(rng: &mut SmallRng, enemy: &Board) -> Option<Coord> {
        let mut open = Vec::new();
        let mut near_hits = Vec::new();
        for y in 0..ROW {
            for x in 0..COLUMN {
                let c = Coord::new(x, y);
                match enemy.get(c) {
                    Ok(Cell::Unknown) => open.push(c),
                    Ok(Cell::Hit) => {
                        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
                            if let Some(n) = c.step(dir) {
                                if enemy.get(n) == Ok(Cell::Unknown) && !near_hits.contains(&n) {
                                    near_hits.push(n);
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        let pool = if near_hits.is_empty() { open } else { near_hits };
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.random_range(0..pool.len())])
    }
}

impl Player for AutoPlayer {
    fn next_actions(&mut self, rng: &mut SmallRng, game: &GameStatus) -> Vec<Action> {
        match game.phase() {
            Phase::Preparing => Self::lay_out_fleet(rng),
            Phase::Playing if game.my_turn() == Some(true) => {
                Self::choose_target(rng, game.enemy_board())
                    .map(Action::FireAt)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(feature = "std")]
pub use keyboard::KeyboardPlayer;

#[cfg(feature = "std")]
mod keyboard {
    use alloc::vec::Vec;

    use rand::rngs::SmallRng;
    use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

    use super::Player;
    use crate::action::Action;
    use crate::game::GameStatus;

    /// Human player fed with raw key codes from the terminal.
    pub struct KeyboardPlayer {
        keys: UnboundedReceiver<u8>,
        disconnected: bool,
    }

    impl KeyboardPlayer {
        pub fn new(keys: UnboundedReceiver<u8>) -> Self {
            Self {
                keys,
                disconnected: false,
            }
        }
    }

    impl Player for KeyboardPlayer {
        fn next_actions(&mut self, _rng: &mut SmallRng, _game: &GameStatus) -> Vec<Action> {
            let mut actions = Vec::new();
            while !self.disconnected {
                match self.keys.try_recv() {
                    Ok(key) => actions.extend(Action::from_key(key)),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::debug!("keyboard input closed");
                        self.disconnected = true;
                    }
                }
            }
            actions
        }
    }
}
