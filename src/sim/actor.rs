//! Enemies and pickups
//!
//! Actors integrate their own physics every tick and react to the player
//! through a per-kind behaviour table. Tile contacts only move them around.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, Rect};
use super::player::{Health, Player, bounce_down, snap_down, snap_up};
use crate::consts::*;
use crate::error::SimError;
use crate::renderer::{RenderSink, Sheet, SrcRect};

/// Actor sprite layout
const GOOMBA_SPRITE: (i32, i32) = (0, 16);
const GOOMBA_FRAMES: u32 = 2;
const KOOPA_SPRITE: (i32, i32) = (96, 10);
const KOOPA_FRAMES: u32 = 4;
const SHELL_SPRITE: (i32, i32) = (160, 24);
const MUSHROOM_SPRITE: (i32, i32) = (0, 0);
const FLOWER_SPRITE: (i32, i32) = (0, 32);
const FLOWER_FRAMES: u32 = 4;
const COIN_SPRITE: (i32, i32) = (0, 96);
const FRAME_SHIFT: i32 = 16;

/// Hitbox sizes
const KOOPA_SIZE: (i32, i32) = (15, 22);
const SHELL_SIZE: (i32, i32) = (16, 8);
const DEFAULT_SIZE: (i32, i32) = (16, 16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Goomba,
    Koopa,
    Mushroom,
    Flower,
    /// Collectible coin placed in the level
    Coin,
    /// Short-lived coin popping out of a tile; already paid for
    TempCoin,
}

impl ActorKind {
    pub fn is_enemy(&self) -> bool {
        matches!(self, ActorKind::Goomba | ActorKind::Koopa)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    kind: ActorKind,
    pub pos: DVec2,
    pub vel_y: f64,
    /// Horizontal direction, one of -1, 0 or 1
    dir: i8,
    /// Age in ticks; for a shelled Koopa, ticks spent still
    ticks: u32,
}

impl Actor {
    /// Enemies start walking left, everything else stands still
    pub fn new(kind: ActorKind, pos: DVec2) -> Self {
        let dir = if kind.is_enemy() { -1 } else { 0 };
        Self {
            kind,
            pos,
            vel_y: 0.0,
            dir,
            ticks: 0,
        }
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn direction(&self) -> i8 {
        self.dir
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Force a walking direction, clamped to -1..=1
    pub fn set_direction(&mut self, dir: i8) {
        self.dir = dir.signum();
    }

    pub fn vel_x(&self) -> f64 {
        self.dir as f64 * ACTOR_SPEED
    }

    fn is_shelled(&self) -> bool {
        self.kind == ActorKind::Koopa && self.dir == 0
    }

    fn size(&self) -> (i32, i32) {
        match self.kind {
            ActorKind::Goomba => DEFAULT_SIZE,
            ActorKind::Koopa if self.dir == 0 => SHELL_SIZE,
            ActorKind::Koopa => KOOPA_SIZE,
            _ => DEFAULT_SIZE,
        }
    }

    pub fn width(&self) -> i32 {
        self.size().0
    }

    pub fn height(&self) -> i32 {
        self.size().1
    }

    pub fn rect(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(self.pos.x, self.pos.y, w as f64, h as f64)
    }

    /// Integrate one tick; returns whether the actor's lifetime is over
    pub fn update(&mut self) -> bool {
        self.vel_y -= ACTOR_GRAVITY;
        self.pos.y += self.vel_y;
        self.pos.x += self.vel_x();
        self.ticks = self.ticks.wrapping_add(1);

        if self.is_shelled() && self.ticks >= KOOPA_MAX_STILL {
            log::debug!("koopa at x={:.1} leaves its shell", self.pos.x);
            self.ticks = 0;
            self.dir = 1;
        }

        self.kind == ActorKind::TempCoin && self.ticks > TEMPCOIN_LIFETIME
    }

    /// Push the actor out of the tiles described by `mask`
    ///
    /// Side contacts turn a moving actor away from the wall.
    pub fn correct_on_block_collision(&mut self, mask: Contact) {
        if mask.contains(Contact::TOP) {
            self.vel_y = 0.0;
            self.pos.y = bounce_down(self.pos.y);
        }
        if mask.contains(Contact::BOTTOM) {
            self.vel_y = 0.0;
            self.pos.y = snap_up(self.pos.y);
        }
        if mask.contains(Contact::LEFT) {
            self.pos.x = snap_up(self.pos.x);
            if self.dir != 0 {
                self.dir = 1;
            }
        }
        if mask.contains(Contact::RIGHT) {
            self.pos.x = snap_down(self.pos.x);
            if self.dir != 0 {
                self.dir = -1;
            }
        }
    }

    /// React to touching the player; returns whether the actor is consumed
    ///
    /// `contact` is `classify(actor, player)`, so `BOTTOM` is a stomp.
    pub fn collide_player(
        &mut self,
        player: &mut Player,
        contact: Contact,
    ) -> Result<bool, SimError> {
        let stomp = contact.contains(Contact::BOTTOM);
        match self.kind {
            ActorKind::Goomba => {
                if stomp {
                    return Ok(true);
                }
                hurt(player);
                Ok(false)
            }
            ActorKind::Koopa => {
                if stomp && self.dir == 0 {
                    Ok(true)
                } else if stomp {
                    self.dir = 0;
                    self.ticks = 0;
                    Ok(false)
                } else {
                    hurt(player);
                    Ok(false)
                }
            }
            ActorKind::Mushroom => {
                player.upgrade_to(Health::Big)?;
                Ok(true)
            }
            ActorKind::Flower => {
                player.upgrade_to(Health::Flower)?;
                Ok(true)
            }
            ActorKind::Coin => {
                player.add_coin();
                Ok(true)
            }
            ActorKind::TempCoin => Ok(false),
        }
    }

    fn sprite(&self) -> (Sheet, i32, i32) {
        let frame = |frames: u32| ((self.ticks / ACTOR_ANIM_TICKS) % frames) as i32 * FRAME_SHIFT;
        match self.kind {
            ActorKind::Goomba => (
                Sheet::Enemies,
                GOOMBA_SPRITE.0 + frame(GOOMBA_FRAMES),
                GOOMBA_SPRITE.1,
            ),
            ActorKind::Koopa if self.dir == 0 => (Sheet::Enemies, SHELL_SPRITE.0, SHELL_SPRITE.1),
            ActorKind::Koopa => (
                Sheet::Enemies,
                KOOPA_SPRITE.0 + frame(KOOPA_FRAMES),
                KOOPA_SPRITE.1,
            ),
            ActorKind::Mushroom => (Sheet::Upgrades, MUSHROOM_SPRITE.0, MUSHROOM_SPRITE.1),
            ActorKind::Flower => (
                Sheet::Upgrades,
                FLOWER_SPRITE.0 + frame(FLOWER_FRAMES),
                FLOWER_SPRITE.1,
            ),
            ActorKind::Coin | ActorKind::TempCoin => {
                (Sheet::Upgrades, COIN_SPRITE.0, COIN_SPRITE.1)
            }
        }
    }

    /// Draw relative to `scroll`, mirrored while walking right
    pub fn render(&self, sink: &mut dyn RenderSink, scroll: i32) {
        let (w, h) = self.size();
        let (sheet, sx, sy) = self.sprite();
        sink.place(
            sheet,
            self.pos.x as i32 - scroll,
            sink.height() - self.pos.y as i32 - h,
            SrcRect::new(sx, sy, w, h),
            self.dir == 1,
        );
    }
}

fn hurt(player: &mut Player) {
    if player.vulnerable() {
        player.downgrade();
        log::debug!("player hurt, now {:?}", player.health());
    }
}
