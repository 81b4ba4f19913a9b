//! Text rendering and keyboard input for terminal play.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::cell::{Cell, Part};
use crate::common::Coord;
use crate::game::{GameStatus, Phase};
use crate::net::Stage;
use crate::session::SessionEnd;

/// Something that shows the match to a person, or doesn't.
pub trait Frontend: Send {
    fn stage(&mut self, _stage: &Stage) {}

    fn render(&mut self, game: &GameStatus);

    fn finish(&mut self, _end: SessionEnd) {}
}

/// Frontend that shows nothing, for automatic players and tests.
#[derive(Debug, Default)]
pub struct NullFrontend;

impl Frontend for NullFrontend {
    fn render(&mut self, _game: &GameStatus) {}
}

/// Plain-text frontend writing to stdout. Redraws only when the picture changes.
#[derive(Debug, Default)]
pub struct TextFrontend {
    last: String,
}

impl TextFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, text: String) {
        if text == self.last {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes()).and_then(|_| out.flush());
        self.last = text;
    }
}

impl Frontend for TextFrontend {
    fn stage(&mut self, stage: &Stage) {
        let text = match stage {
            Stage::Idle => return,
            Stage::Listening(addr) => format!("Waiting for a player on port {}...\n", addr.port()),
            Stage::Dialing(addr) => format!("Connecting to {}...\n", addr),
            Stage::SendingKey => "Sending key...\n".to_string(),
            Stage::WaitingForPeer => "Waiting for the other player to join...\n".to_string(),
            Stage::Connected(slot) => format!("Connected as player {}.\n", if slot.is_player_1() { 1 } else { 2 }),
        };
        self.emit(text);
    }

    fn render(&mut self, game: &GameStatus) {
        self.emit(render_text(game));
    }

    fn finish(&mut self, end: SessionEnd) {
        let text = match end {
            SessionEnd::Won => "You sank every enemy ship. Victory!\n",
            SessionEnd::Lost => "All your ships were destroyed. Defeat.\n",
            SessionEnd::PeerClosed => "The other player left.\n",
        };
        self.emit(text.to_string());
    }
}

/// Both boards side by side with a status line underneath.
pub fn render_text(game: &GameStatus) -> String {
    let mut out = String::from("\n   YOUR FLEET              ENEMY WATERS\n");
    let own_cursor = (game.phase() == Phase::Preparing).then(|| game.cursor());
    let enemy_cursor = (game.phase() == Phase::Playing).then(|| game.cursor());
    for (y, (own, enemy)) in game
        .own_board()
        .rows()
        .iter()
        .zip(game.enemy_board().rows().iter())
        .enumerate()
    {
        out.push_str(&format!("{:2} ", y));
        push_row(&mut out, own, y, own_cursor, game.anchor());
        out.push_str("    ");
        push_row(&mut out, enemy, y, enemy_cursor, None);
        out.push('\n');
    }
    let status = match game.phase() {
        Phase::Preparing => "Place ships with Enter, lock in with space.".to_string(),
        Phase::Playing => match game.my_turn() {
            None => "Waiting for the other player to get ready...".to_string(),
            Some(true) => format!("Your turn. hp {}/{}, enemy hp {}", game.self_hp(), game.self_max_hp(), game.enemy_hp()),
            Some(false) => format!("Enemy turn. hp {}/{}, enemy hp {}", game.self_hp(), game.self_max_hp(), game.enemy_hp()),
        },
        Phase::Ended => "Match over.".to_string(),
    };
    out.push_str(&status);
    out.push('\n');
    out
}

fn push_row(out: &mut String, row: &[Cell], y: usize, cursor: Option<Coord>, anchor: Option<Coord>) {
    for (x, cell) in row.iter().enumerate() {
        let here = |c: Option<Coord>| c.is_some_and(|c| c.x == x && c.y == y);
        let ch = if here(cursor) {
            '@'
        } else if here(anchor) {
            '+'
        } else {
            cell_char(*cell)
        };
        out.push(ch);
        out.push(' ');
    }
}

fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Unknown => '~',
        Cell::Hit => 'x',
        Cell::Miss => 'o',
        Cell::Ship { destroyed: true, .. } => '#',
        Cell::Ship { part, .. } => match part {
            Part::Top => '^',
            Part::Bottom => 'v',
            Part::Left => '<',
            Part::Right => '>',
            Part::Horizontal => '=',
            Part::Vertical => '|',
            Part::Single => '*',
        },
    }
}

/// Forward stdin to a channel of key codes.
///
/// Each line's characters are sent as keys followed by a newline, so an empty
/// line is a plain Enter.
pub fn spawn_key_reader() -> UnboundedReceiver<u8> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for key in line.bytes().chain(std::iter::once(b'\n')) {
                if tx.send(key).is_err() {
                    return;
                }
            }
        }
    });
    rx
}
