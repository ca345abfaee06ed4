//! Static grid tiles and their hit state machine

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorKind;
use super::collision::Rect;
use super::player::{Health, Player};
use crate::consts::*;
use crate::error::SimError;
use crate::renderer::{RenderSink, Sheet, SrcRect};

/// Sprite of a spent block
const SPENT_SPRITE: (i32, i32) = (3, 0);

/// Tile behaviour when struck from below
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Background decoration, never collides
    Passthrough,
    Opaque,
    /// One coin, then spent
    Coin,
    /// One coin, then gone
    DestroyCoin,
    /// Untouched multi-coin block
    Multicoin,
    /// Multi-coin block that keeps paying until its hit window runs out
    HitMulticoin,
    /// Mushroom or flower depending on the player's health
    Upgrade,
}

/// An actor a hit asks the world to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub kind: ActorKind,
    pub pos: DVec2,
}

/// What a single hit produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitOutcome {
    pub spawn: Option<Spawn>,
    /// The tile must be taken out of the level
    pub remove: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    /// Grid column, counted from the left of the world
    pub x: i32,
    /// Grid row, counted from the bottom of the world
    pub y: i32,
    /// Sprite origin in the tile sheet, in tiles
    sprite: (i32, i32),
    anim_steps: u32,
    /// Ticks rendered; doubles as the multicoin hit window
    ticks: u32,
}

impl Tile {
    /// `anim_steps` frames are laid out horizontally from `sprite`
    pub fn new(
        kind: TileKind,
        x: i32,
        y: i32,
        sprite: (i32, i32),
        anim_steps: u32,
    ) -> Result<Self, SimError> {
        if anim_steps == 0 {
            return Err(SimError::OutOfRange("tile animation steps"));
        }
        Ok(Self {
            kind,
            x,
            y,
            sprite,
            anim_steps,
            ticks: 0,
        })
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn sprite(&self) -> (i32, i32) {
        self.sprite
    }

    pub fn can_pass_through(&self) -> bool {
        self.kind == TileKind::Passthrough
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            (self.x * TILE_SIZE) as f64,
            (self.y * TILE_SIZE) as f64,
            TILE_SIZE_F,
            TILE_SIZE_F,
        )
    }

    /// Where things popping out of this tile appear: resting on its top
    pub fn spawn_point(&self) -> DVec2 {
        DVec2::new(
            (self.x * TILE_SIZE) as f64,
            ((self.y + 1) * TILE_SIZE) as f64,
        )
    }

    /// Animation frame currently shown
    pub fn frame(&self) -> u32 {
        (self.ticks / TILE_ANIM_TICKS) % self.anim_steps
    }

    /// Strike the tile from below
    pub fn hit(&mut self, player: &mut Player) -> HitOutcome {
        match self.kind {
            TileKind::Passthrough | TileKind::Opaque => HitOutcome::default(),
            TileKind::Coin => {
                let outcome = self.pay_coin(player);
                self.make_opaque();
                outcome
            }
            TileKind::DestroyCoin => HitOutcome {
                remove: true,
                ..self.pay_coin(player)
            },
            TileKind::Multicoin => self.first_multicoin_hit(player),
            TileKind::HitMulticoin => self.multicoin_hit(player),
            TileKind::Upgrade => {
                let kind = if player.health() >= Health::Big {
                    ActorKind::Flower
                } else {
                    ActorKind::Mushroom
                };
                self.make_opaque();
                HitOutcome {
                    spawn: Some(Spawn {
                        kind,
                        pos: self.spawn_point(),
                    }),
                    remove: false,
                }
            }
        }
    }

    /// Arm the hit window, then pay out like an already-hit block
    fn first_multicoin_hit(&mut self, player: &mut Player) -> HitOutcome {
        // Small phase that keeps the animation where it was
        self.ticks %= TILE_TICKS_PER_MOVE * TILE_MOVE_FRAMES;
        self.kind = TileKind::HitMulticoin;
        log::debug!("multicoin tile at ({}, {}) armed", self.x, self.y);
        self.multicoin_hit(player)
    }

    fn multicoin_hit(&mut self, player: &mut Player) -> HitOutcome {
        let outcome = self.pay_coin(player);
        if self.ticks >= MULTICOIN_THRESHOLD {
            self.make_opaque();
        }
        outcome
    }

    fn pay_coin(&self, player: &mut Player) -> HitOutcome {
        player.add_coin();
        HitOutcome {
            spawn: Some(Spawn {
                kind: ActorKind::TempCoin,
                pos: self.spawn_point(),
            }),
            remove: false,
        }
    }

    fn make_opaque(&mut self) {
        self.kind = TileKind::Opaque;
        self.sprite = SPENT_SPRITE;
        self.anim_steps = 1;
    }

    /// Advance the animation and draw if horizontally on screen
    ///
    /// Returns whether the tile was inside `[scroll, scroll + width)`.
    pub fn render(&mut self, sink: &mut dyn RenderSink, scroll: i32) -> bool {
        let frame = self.frame() as i32;
        self.ticks = self.ticks.wrapping_add(1);

        if TILE_SIZE * (self.x + 1) <= scroll || TILE_SIZE * self.x >= scroll + sink.width() {
            return false;
        }

        sink.place(
            Sheet::Tiles,
            self.x * TILE_SIZE - scroll,
            sink.height() - (self.y + 1) * TILE_SIZE,
            SrcRect::new(
                TILE_SIZE * (self.sprite.0 + frame),
                TILE_SIZE * self.sprite.1,
                TILE_SIZE,
                TILE_SIZE,
            ),
            false,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSink;

    fn player() -> Player {
        Player::new(DVec2::new(0.0, 0.0), 3)
    }

    fn tile(kind: TileKind) -> Tile {
        Tile::new(kind, 4, 2, (24, 0), 3).unwrap()
    }

    fn spin(t: &mut Tile, ticks: u32) {
        let mut sink = RecordingSink::new(256, 240);
        for _ in 0..ticks {
            t.render(&mut sink, 0);
        }
    }

    #[test]
    fn test_zero_anim_steps_rejected() {
        assert!(matches!(
            Tile::new(TileKind::Opaque, 0, 0, (0, 0), 0),
            Err(SimError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_inert_kinds() {
        for kind in [TileKind::Passthrough, TileKind::Opaque] {
            let mut t = tile(kind);
            let mut p = player();
            let out = t.hit(&mut p);
            assert_eq!(out, HitOutcome::default());
            assert_eq!(t.kind(), kind);
            assert_eq!(p.coins(), 0);
        }
    }

    #[test]
    fn test_coin_pays_once() {
        let mut t = tile(TileKind::Coin);
        let mut p = player();
        let out = t.hit(&mut p);
        assert_eq!(
            out.spawn,
            Some(Spawn {
                kind: ActorKind::TempCoin,
                pos: DVec2::new(64.0, 48.0)
            })
        );
        assert!(!out.remove);
        assert_eq!(t.kind(), TileKind::Opaque);
        assert_eq!(t.sprite(), SPENT_SPRITE);
        assert_eq!(p.coins(), 1);

        assert_eq!(t.hit(&mut p), HitOutcome::default());
        assert_eq!(p.coins(), 1);
    }

    #[test]
    fn test_destroy_coin_is_removed() {
        let mut t = tile(TileKind::DestroyCoin);
        let mut p = player();
        let out = t.hit(&mut p);
        assert!(out.remove);
        assert_eq!(out.spawn.map(|s| s.kind), Some(ActorKind::TempCoin));
        assert_eq!(p.coins(), 1);
    }

    #[test]
    fn test_multicoin_first_hit_pays_immediately() {
        let mut t = tile(TileKind::Multicoin);
        spin(&mut t, 47);
        let mut p = player();
        let out = t.hit(&mut p);
        assert_eq!(t.kind(), TileKind::HitMulticoin);
        assert_eq!(t.ticks(), 47 % 30);
        assert_eq!(out.spawn.map(|s| s.kind), Some(ActorKind::TempCoin));
        assert_eq!(p.coins(), 1);
    }

    #[test]
    fn test_multicoin_exhausts_after_window() {
        let mut t = tile(TileKind::Multicoin);
        let mut p = player();
        t.hit(&mut p);
        t.hit(&mut p);
        assert_eq!(t.kind(), TileKind::HitMulticoin);
        assert_eq!(p.coins(), 2);

        spin(&mut t, MULTICOIN_THRESHOLD);
        let last = t.hit(&mut p);
        assert!(last.spawn.is_some());
        assert_eq!(t.kind(), TileKind::Opaque);
        assert_eq!(p.coins(), 3);

        assert_eq!(t.hit(&mut p), HitOutcome::default());
        assert_eq!(p.coins(), 3);
    }

    #[test]
    fn test_upgrade_picks_by_health() {
        let mut p = player();
        let mut t = tile(TileKind::Upgrade);
        let out = t.hit(&mut p);
        assert_eq!(out.spawn.map(|s| s.kind), Some(ActorKind::Mushroom));
        assert_eq!(t.kind(), TileKind::Opaque);
        assert_eq!(p.coins(), 0);

        p.upgrade_to(Health::Big).unwrap();
        let mut t = tile(TileKind::Upgrade);
        assert_eq!(
            t.hit(&mut p).spawn.map(|s| s.kind),
            Some(ActorKind::Flower)
        );
    }

    #[test]
    fn test_animation_frame_cycles() {
        let mut t = tile(TileKind::Coin);
        assert_eq!(t.frame(), 0);
        spin(&mut t, 3);
        assert_eq!(t.frame(), 1);
        spin(&mut t, 6);
        assert_eq!(t.frame(), 0);
    }

    #[test]
    fn test_render_culls_horizontally() {
        let mut sink = RecordingSink::new(64, 240);
        let mut t = Tile::new(TileKind::Opaque, 5, 0, (0, 0), 1).unwrap();

        assert!(!t.render(&mut sink, 96));
        assert!(!t.render(&mut sink, 16));
        assert!(t.render(&mut sink, 17));
        assert!(t.render(&mut sink, 95));
        // Culled renders still advance the animation
        assert_eq!(t.ticks(), 4);
    }
}
