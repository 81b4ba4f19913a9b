//! Per-match state and the turn state machine.

use core::fmt;

use rand::Rng;

use crate::action::Action;
use crate::board::Board;
use crate::cell::Cell;
use crate::common::{BoardError, Coord, Outcome, Span};
use crate::config::COLUMN;
use crate::protocol::Message;

/// Where the local side of the match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Placing ships; nothing has been announced yet.
    Preparing,
    /// Ready sent; shots are exchanged once both turn factors are known.
    Playing,
    /// One side has no ships left.
    Ended,
}

/// How an ended match went for the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Won,
    Lost,
}

/// Errors raised while driving the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    Board(BoardError),
    /// Ship layout can only change before locking in.
    NotPreparing,
    /// Locking in needs at least one ship on the board.
    NothingPlaced,
}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        GameError::Board(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Board(e) => write!(f, "Board error: {}", e),
            GameError::NotPreparing => write!(f, "Ships are already locked in"),
            GameError::NothingPlaced => write!(f, "No ship has been placed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// Everything one peer knows about the current match.
#[derive(Debug, Clone)]
pub struct GameStatus {
    own: Board,
    enemy: Board,
    cursor: Coord,
    anchor: Option<Coord>,
    self_preparing: bool,
    enemy_preparing: bool,
    self_hp: u32,
    enemy_hp: u32,
    self_max_hp: u32,
    enemy_max_hp: u32,
    self_turn_factor: Option<bool>,
    enemy_turn_factor: Option<bool>,
    is_player_1: bool,
    my_turn: Option<bool>,
    phase: Phase,
}

impl GameStatus {
    /// Fresh match: empty own board, unknown enemy board, no turn factors.
    pub fn new(is_player_1: bool) -> Self {
        Self {
            own: Board::own(),
            enemy: Board::enemy(),
            cursor: Coord::new(0, 0),
            anchor: None,
            self_preparing: true,
            enemy_preparing: true,
            self_hp: 0,
            enemy_hp: 0,
            self_max_hp: 0,
            enemy_max_hp: 0,
            self_turn_factor: None,
            enemy_turn_factor: None,
            is_player_1,
            my_turn: None,
            phase: Phase::Preparing,
        }
    }

    pub fn own_board(&self) -> &Board {
        &self.own
    }

    pub fn enemy_board(&self) -> &Board {
        &self.enemy
    }

    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// First endpoint of a placement in progress.
    pub fn anchor(&self) -> Option<Coord> {
        self.anchor
    }

    pub fn self_preparing(&self) -> bool {
        self.self_preparing
    }

    pub fn enemy_preparing(&self) -> bool {
        self.enemy_preparing
    }

    pub fn self_hp(&self) -> u32 {
        self.self_hp
    }

    pub fn enemy_hp(&self) -> u32 {
        self.enemy_hp
    }

    pub fn self_max_hp(&self) -> u32 {
        self.self_max_hp
    }

    pub fn enemy_max_hp(&self) -> u32 {
        self.enemy_max_hp
    }

    pub fn self_turn_factor(&self) -> Option<bool> {
        self.self_turn_factor
    }

    pub fn enemy_turn_factor(&self) -> Option<bool> {
        self.enemy_turn_factor
    }

    pub fn is_player_1(&self) -> bool {
        self.is_player_1
    }

    /// Whose turn it is; `None` until both turn factors are known.
    pub fn my_turn(&self) -> Option<bool> {
        self.my_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Result of the match once it has ended.
    pub fn verdict(&self) -> Option<Verdict> {
        match self.phase {
            Phase::Ended if self.self_hp == 0 => Some(Verdict::Lost),
            Phase::Ended => Some(Verdict::Won),
            _ => None,
        }
    }

    /// Place a ship on the own board while preparing.
    pub fn place_ship(&mut self, a: Coord, b: Coord) -> Result<Span, GameError> {
        if self.phase != Phase::Preparing {
            return Err(GameError::NotPreparing);
        }
        Ok(self.own.place_ship(a, b)?)
    }

    /// Finish preparation with the given turn factor and return the `READY`
    /// announcement.
    pub fn lock_in(&mut self, turn_factor: bool) -> Result<Message, GameError> {
        if self.phase != Phase::Preparing {
            return Err(GameError::NotPreparing);
        }
        let max_hp = self.own.live_ship_cells() as u32;
        if max_hp == 0 {
            return Err(GameError::NothingPlaced);
        }
        self.self_max_hp = max_hp;
        self.self_hp = max_hp;
        self.self_turn_factor = Some(turn_factor);
        self.self_preparing = false;
        self.anchor = None;
        self.cursor = Coord::new(COLUMN - 1, 0);
        self.phase = Phase::Playing;
        self.update_turn();
        log::debug!("locked in with {} hp, turn factor {}", max_hp, turn_factor);
        Ok(Message::Ready {
            turn_factor,
            max_hp,
        })
    }

    /// Shoot at `target` on the enemy board if it is our turn.
    pub fn fire(&mut self, target: Coord) -> Option<Message> {
        if self.phase != Phase::Playing || self.my_turn != Some(true) || !target.in_bounds() {
            return None;
        }
        self.my_turn = Some(false);
        Some(Message::Fire(target))
    }

    /// Apply a player action, returning the message to send, if any.
    pub fn apply<R: Rng>(&mut self, action: Action, rng: &mut R) -> Result<Option<Message>, GameError> {
        match action {
            Action::Move(dir) => {
                self.cursor = self.cursor.step(dir).unwrap_or(self.cursor);
                Ok(None)
            }
            Action::Select => match self.phase {
                Phase::Preparing => {
                    self.select_endpoint()?;
                    Ok(None)
                }
                Phase::Playing => Ok(self.fire(self.cursor)),
                Phase::Ended => Ok(None),
            },
            Action::LockIn => {
                if self.phase != Phase::Preparing || self.own.live_ship_cells() == 0 {
                    return Ok(None);
                }
                self.lock_in(rng.random()).map(Some)
            }
            Action::Cancel => {
                self.anchor = None;
                Ok(None)
            }
            Action::PlaceShip(a, b) => self.place_ship(a, b).map(|_| None),
            Action::FireAt(target) => Ok(self.fire(target)),
        }
    }

    /// Handle a message from the peer, returning the reply to send, if any.
    pub fn handle(&mut self, msg: Message) -> Result<Option<Message>, GameError> {
        if self.phase == Phase::Ended {
            log::debug!("match over, dropping {}", msg);
            return Ok(None);
        }
        match msg {
            Message::Fire(target) => {
                if self.my_turn != Some(false) {
                    log::warn!("peer fired out of turn at ({}, {}), ignoring", target.x, target.y);
                    return Ok(None);
                }
                self.my_turn = Some(true);
                let reply = match self.own.resolve_shot(target)? {
                    Outcome::Hit(c) => {
                        self.self_hp = self.self_hp.saturating_sub(1);
                        Message::Hit(c)
                    }
                    Outcome::Destroyed(span) => {
                        self.self_hp = self.self_hp.saturating_sub(1);
                        Message::Destroyed(span)
                    }
                    Outcome::Miss(c) => Message::Miss(c),
                    Outcome::Ignore => Message::Ignore,
                };
                if self.self_hp == 0 {
                    self.phase = Phase::Ended;
                }
                Ok(Some(reply))
            }
            Message::Hit(c) | Message::Miss(c) | Message::Destroyed(Span { start: c, .. })
                if self.phase != Phase::Playing =>
            {
                log::warn!("shot report for ({}, {}) before locking in, ignoring", c.x, c.y);
                Ok(None)
            }
            Message::Hit(c) => {
                self.enemy.mark(c, Cell::Hit)?;
                self.enemy_hp = self.enemy_hp.saturating_sub(1);
                self.check_enemy_sunk();
                Ok(None)
            }
            Message::Miss(c) => {
                self.enemy.mark(c, Cell::Miss)?;
                Ok(None)
            }
            Message::Destroyed(span) => {
                self.enemy.mark_destroyed(span)?;
                self.enemy_hp = self.enemy_hp.saturating_sub(1);
                self.check_enemy_sunk();
                Ok(None)
            }
            Message::Ready {
                turn_factor,
                max_hp,
            } => {
                if self.enemy_turn_factor.is_some() {
                    log::warn!("peer announced READY twice, ignoring");
                    return Ok(None);
                }
                self.enemy_turn_factor = Some(turn_factor);
                self.enemy_max_hp = max_hp;
                self.enemy_hp = max_hp;
                self.enemy_preparing = false;
                self.update_turn();
                Ok(None)
            }
            Message::Ignore => Ok(None),
        }
    }

    fn select_endpoint(&mut self) -> Result<(), GameError> {
        let cursor = self.cursor;
        match self.anchor {
            None if self.own.get(cursor)?.is_live_ship() => {
                self.own.remove_ship(cursor);
            }
            None => self.anchor = Some(cursor),
            Some(anchor) if anchor.x == cursor.x || anchor.y == cursor.y => {
                match self.own.place_ship(anchor, cursor) {
                    Ok(_) => self.anchor = None,
                    Err(BoardError::ShipOverlaps) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn update_turn(&mut self) {
        if let (Some(own), Some(enemy)) = (self.self_turn_factor, self.enemy_turn_factor) {
            self.my_turn = Some((own ^ enemy) == self.is_player_1);
        }
    }

    fn check_enemy_sunk(&mut self) {
        if self.enemy_hp == 0 {
            self.phase = Phase::Ended;
        }
    }
}
