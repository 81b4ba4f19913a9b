//! One peer's side of a match: player input, socket traffic and rendering,
//! driven one tick at a time.

use rand::rngs::SmallRng;
use serde::Serialize;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::game::{GameError, GameStatus, Verdict};
use crate::player::Player;
use crate::protocol::Message;
use crate::transport::Transport;
use crate::ui::Frontend;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionEnd {
    Won,
    Lost,
    /// The peer closed the connection before the match was decided.
    PeerClosed,
}

pub struct Session {
    game: GameStatus,
    player: Box<dyn Player>,
    transport: Box<dyn Transport>,
    frontend: Box<dyn Frontend>,
    rng: SmallRng,
    shots_fired: usize,
}

impl Session {
    pub fn new(
        is_player_1: bool,
        player: Box<dyn Player>,
        transport: Box<dyn Transport>,
        frontend: Box<dyn Frontend>,
        rng: SmallRng,
    ) -> Self {
        Self {
            game: GameStatus::new(is_player_1),
            player,
            transport,
            frontend,
            rng,
            shots_fired: 0,
        }
    }

    pub fn game(&self) -> &GameStatus {
        &self.game
    }

    /// Number of `FIRE` messages this side has sent.
    pub fn shots_fired(&self) -> usize {
        self.shots_fired
    }

    /// Run one tick: apply player actions, then peer messages, then render.
    ///
    /// Returns `Some` once the session is over.
    pub async fn tick(&mut self) -> anyhow::Result<Option<SessionEnd>> {
        for action in self.player.next_actions(&mut self.rng, &self.game) {
            match self.game.apply(action, &mut self.rng) {
                Ok(Some(msg)) => self.send(&msg).await?,
                Ok(None) => {}
                Err(GameError::Board(e)) => {
                    return Err(anyhow::Error::new(e).context("applying player action"))
                }
                Err(e) => log::debug!("action {:?} rejected: {}", action, e),
            }
        }

        let inbound = self.transport.drain()?;
        for msg in inbound.messages {
            log::debug!("<- {}", msg);
            let reply = self
                .game
                .handle(msg)
                .map_err(|e| anyhow::anyhow!("handling {}: {}", msg, e))?;
            if let Some(reply) = reply {
                self.send(&reply).await?;
            }
        }

        self.frontend.render(&self.game);

        let end = match self.game.verdict() {
            Some(Verdict::Won) => Some(SessionEnd::Won),
            Some(Verdict::Lost) => Some(SessionEnd::Lost),
            None if inbound.closed => Some(SessionEnd::PeerClosed),
            None => None,
        };
        Ok(end)
    }

    /// Tick every `period` until the match is decided or the peer leaves.
    pub async fn run(&mut self, period: Duration) -> anyhow::Result<SessionEnd> {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Some(end) = self.tick().await? {
                log::info!("session over: {:?}", end);
                self.frontend.finish(end);
                return Ok(end);
            }
        }
    }

    async fn send(&mut self, msg: &Message) -> anyhow::Result<()> {
        log::debug!("-> {}", msg);
        if matches!(msg, Message::Fire(_)) {
            self.shots_fired += 1;
        }
        self.transport.send(msg).await
    }
}
