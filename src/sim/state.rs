//! World aggregate (deterministic)

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorKind};
use super::actor_bag::ActorBag;
use super::player::Player;
use super::tile_set::TileSet;
use crate::error::SimError;

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Keep playing
    KeepOn,
    Dead,
    /// Scrolled to the end of the level
    Won,
    /// Coin count hit the cap
    ManyCoins,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        *self != Outcome::KeepOn
    }

    /// End-of-game banner
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Dead => "GAME OVER",
            Outcome::Won => "YOU WON",
            Outcome::ManyCoins => "YOU GOT TO THE MILLION COINS",
            Outcome::KeepOn => "Sorry - something wrong happened",
        }
    }
}

/// Everything one level attempt owns
#[derive(Debug, Clone)]
pub struct World {
    pub tiles: TileSet,
    pub actors: ActorBag,
    pub player: Player,
    /// Horizontal camera offset in pixels, never decreases
    pub scroll: i32,
    /// Horizontal intent from the direction keys: -1, 0 or 1
    pub intent: i8,
    /// Scroll offset that wins the level, in pixels
    pub max_scroll: i32,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Ticks played in this attempt
    pub time_ticks: u64,
    /// Latched once terminal
    pub outcome: Outcome,
}

impl World {
    pub fn new(
        tiles: TileSet,
        actors: ActorBag,
        player: Player,
        max_scroll: i32,
        seed: u64,
    ) -> Self {
        Self {
            tiles,
            actors,
            player,
            scroll: 0,
            intent: 0,
            max_scroll,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            outcome: Outcome::KeepOn,
        }
    }

    /// Install a player carried over from a previous attempt at this
    /// level's spawn point
    pub fn substitute_player(&mut self, mut player: Player) {
        player.pos = self.player.pos;
        self.player = player;
    }

    pub fn into_player(self) -> Player {
        self.player
    }

    /// Add an actor produced during play
    ///
    /// Mushrooms pick a walking direction from the world's RNG.
    pub fn spawn(&mut self, kind: ActorKind, pos: DVec2) -> Result<(), SimError> {
        let mut actor = Actor::new(kind, pos);
        if kind == ActorKind::Mushroom {
            actor.set_direction(if self.rng.random_bool(0.5) { 1 } else { -1 });
        }
        log::debug!("spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.actors.push(actor)
    }
}
