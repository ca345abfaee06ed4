//! The controlled character
//!
//! Physics integration plus two state machines: an ordered health ladder
//! (Dead < Small < Big < Flower) and a pose (Upright / Jump / Crouch).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, Rect};
use crate::consts::*;
use crate::error::SimError;
use crate::renderer::{RenderSink, Sheet, SrcRect};

/// Player sprite sheet layout
const SPRITE_SMALL_Y: i32 = 34;
const SPRITE_BIG_Y: i32 = 1;
const SPRITE_FLOWER_Y: i32 = 129;
const SPRITE_SHIFT_X: i32 = 17;
const SPRITE_DEAD_X: i32 = 182;
const SPRITE_LOOK_X: i32 = 80;
const SPRITE_JUMP_X: i32 = 165;
const SPRITE_CROUCH_X: i32 = 182;
const SPRITE_WALK_X: i32 = 97;
const SPRITE_WALK_FRAMES: u32 = 3;

/// Health ladder, ordered weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Health {
    Dead = 0,
    Small = 1,
    Big = 2,
    Flower = 3,
}

impl Health {
    /// One step down the ladder, saturating at `Dead`
    pub fn lower(self) -> Self {
        match self {
            Health::Flower => Health::Big,
            Health::Big => Health::Small,
            Health::Small | Health::Dead => Health::Dead,
        }
    }
}

/// Body pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Upright,
    Jump,
    /// Squeezed between a floor and a ceiling
    Crouch,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    pub vel: DVec2,
    health: Health,
    pose: Pose,
    facing_left: bool,
    anim_ticks: u32,
    coins: u32,
    lives: u32,
    /// Ticks since the last downgrade
    vuln_ticks: u32,
}

impl Player {
    /// Standing still, facing right, small and vulnerable
    pub fn new(pos: DVec2, lives: u32) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            health: Health::Small,
            pose: Pose::Upright,
            facing_left: false,
            anim_ticks: 0,
            coins: 0,
            lives,
            vuln_ticks: PLAYER_VULNERABLE_TICKS,
        }
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn height(&self) -> i32 {
        match self.health {
            Health::Dead | Health::Small => PLAYER_SMALL_HEIGHT,
            Health::Big | Health::Flower => PLAYER_BIG_HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            PLAYER_WIDTH as f64,
            self.height() as f64,
        )
    }

    /// Enemy contact may only downgrade once this holds
    pub fn vulnerable(&self) -> bool {
        self.vuln_ticks >= PLAYER_VULNERABLE_TICKS
    }

    /// Integrate one tick as if nothing were around
    pub fn update(&mut self) {
        self.anim_ticks = self.anim_ticks.wrapping_add(1);
        self.vuln_ticks = self.vuln_ticks.saturating_add(1);
        self.vel.y -= PLAYER_GRAVITY;
        self.pos += self.vel;
    }

    /// Accelerate toward `left` or right
    ///
    /// Pushing against the current motion only brakes toward zero this tick.
    pub fn accelerate(&mut self, left: bool) {
        let amount = if self.pose == Pose::Jump && self.vel.y > 0.0 {
            PLAYER_ACCEL_WEAK
        } else {
            PLAYER_ACCEL
        };

        self.vel.x = if left {
            if self.vel.x > 0.0 {
                (self.vel.x - amount).max(0.0)
            } else {
                self.vel.x - amount
            }
        } else if self.vel.x < 0.0 {
            (self.vel.x + amount).min(0.0)
        } else {
            self.vel.x + amount
        };

        self.vel.x = self.vel.x.clamp(-PLAYER_MAX_VELOCITY, PLAYER_MAX_VELOCITY);
    }

    pub fn jump(&mut self) {
        if self.pose != Pose::Jump {
            self.vel.y = PLAYER_JUMP_VELOCITY;
            self.pose = Pose::Jump;
        }
    }

    /// Drop horizontal speed, unless airborne from a jump
    pub fn stop(&mut self) {
        if self.pose != Pose::Jump {
            self.vel.x = 0.0;
        }
    }

    /// Push the player out of the tiles described by `mask`
    pub fn correct_on_collision(&mut self, mask: Contact) {
        if mask.contains(Contact::BOTTOM) {
            self.vel.y = 0.0;
            self.pos.y = snap_up(self.pos.y);
            self.pose = if mask.contains(Contact::TOP) {
                Pose::Crouch
            } else {
                Pose::Upright
            };
        } else if mask.contains(Contact::TOP) {
            self.vel.y = 0.0;
            self.pos.y = bounce_down(self.pos.y);
        }
        if mask.contains(Contact::LEFT) {
            self.vel.x = 0.0;
            self.pos.x = snap_up(self.pos.x);
        }
        if mask.contains(Contact::RIGHT) {
            self.vel.x = 0.0;
            self.pos.x = snap_down(self.pos.x);
        }
    }

    /// One step down the health ladder; restarts the grace period
    pub fn downgrade(&mut self) {
        self.health = self.health.lower();
        self.vuln_ticks = 0;
    }

    /// Raise health to at least `target`
    pub fn upgrade_to(&mut self, target: Health) -> Result<(), SimError> {
        if self.health == Health::Dead {
            return Err(SimError::OutOfRange("upgrade of a dead player"));
        }
        if self.health < target {
            log::debug!("player upgraded {:?} -> {:?}", self.health, target);
            self.health = target;
        }
        Ok(())
    }

    pub fn die(&mut self) {
        self.health = Health::Dead;
    }

    pub fn add_coin(&mut self) {
        self.coins += 1;
        if self.coins % COINS_PER_LIFE == 0 {
            self.lives += 1;
        }
    }

    /// Reset for another attempt
    ///
    /// Position is left untouched. A dead player comes back small with no
    /// coins. Always spends a life; returns whether any remain.
    pub fn restart(&mut self) -> bool {
        self.vel = DVec2::ZERO;
        self.pose = Pose::Upright;
        self.facing_left = false;
        self.anim_ticks = 0;
        self.vuln_ticks = PLAYER_VULNERABLE_TICKS;

        if self.health == Health::Dead {
            self.health = Health::Small;
            self.coins = 0;
        }

        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }

    fn sprite_y(&self) -> i32 {
        match self.health {
            Health::Dead | Health::Small => SPRITE_SMALL_Y,
            Health::Big => SPRITE_BIG_Y,
            Health::Flower => SPRITE_FLOWER_Y,
        }
    }

    fn sprite_x(&self) -> i32 {
        if self.health == Health::Dead {
            SPRITE_DEAD_X
        } else if self.pose == Pose::Jump {
            SPRITE_JUMP_X
        } else if self.pose == Pose::Crouch && self.health != Health::Small {
            SPRITE_CROUCH_X
        } else if self.vel.x == 0.0 {
            SPRITE_LOOK_X
        } else {
            let frame = (self.anim_ticks / PLAYER_ANIM_TICKS) % SPRITE_WALK_FRAMES;
            SPRITE_WALK_X + frame as i32 * SPRITE_SHIFT_X
        }
    }

    /// Draw relative to `scroll`; facing follows the horizontal velocity
    pub fn render(&mut self, sink: &mut dyn RenderSink, scroll: i32) {
        if self.vel.x < 0.0 {
            self.facing_left = true;
        } else if self.vel.x > 0.0 {
            self.facing_left = false;
        }

        let h = self.height();
        sink.place(
            Sheet::Player,
            self.pos.x as i32 - scroll,
            sink.height() - self.pos.y as i32 - h,
            SrcRect::new(self.sprite_x(), self.sprite_y(), PLAYER_WIDTH, h),
            self.facing_left,
        );
    }
}

/// Align to the grid line above `v`
#[inline]
pub(crate) fn snap_up(v: f64) -> f64 {
    (((v + TILE_SIZE_F) as i32) / TILE_SIZE * TILE_SIZE) as f64
}

/// Align to the grid line at or below `v`
#[inline]
pub(crate) fn snap_down(v: f64) -> f64 {
    (((v as i32) / TILE_SIZE) * TILE_SIZE) as f64
}

/// Reflect the overshoot past a ceiling back below it
#[inline]
pub(crate) fn bounce_down(v: f64) -> f64 {
    v - 2.0 * ((v as i32) % TILE_SIZE) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(DVec2::new(32.0, 16.0), 3)
    }

    #[test]
    fn test_new_player_defaults() {
        let p = player();
        assert_eq!(p.health(), Health::Small);
        assert_eq!(p.pose(), Pose::Upright);
        assert!(p.vulnerable());
        assert_eq!(p.coins(), 0);
        assert_eq!(p.height(), PLAYER_SMALL_HEIGHT);
    }

    #[test]
    fn test_update_integrates_gravity() {
        let mut p = player();
        p.vel.x = 1.0;
        p.update();
        assert!((p.vel.y + PLAYER_GRAVITY).abs() < 1e-12);
        assert!((p.pos.y - (16.0 - PLAYER_GRAVITY)).abs() < 1e-12);
        assert!((p.pos.x - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_accelerate_clamps_to_max() {
        let mut p = player();
        for _ in 0..50 {
            p.accelerate(false);
        }
        assert!((p.vel.x - PLAYER_MAX_VELOCITY).abs() < 1e-12);
        for _ in 0..50 {
            p.accelerate(true);
        }
        assert!((p.vel.x + PLAYER_MAX_VELOCITY).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_brakes_without_flipping() {
        let mut p = player();
        p.vel.x = 0.1;
        p.accelerate(true);
        assert_eq!(p.vel.x, 0.0);
        p.accelerate(true);
        assert!((p.vel.x + PLAYER_ACCEL).abs() < 1e-12);

        p.vel.x = -1.0;
        p.accelerate(false);
        assert!((p.vel.x + 1.0 - PLAYER_ACCEL).abs() < 1e-12);
    }

    #[test]
    fn test_weak_control_while_rising() {
        let mut p = player();
        p.jump();
        assert!(p.vel.y > 0.0);
        p.accelerate(false);
        assert!((p.vel.x - PLAYER_ACCEL_WEAK).abs() < 1e-12);

        // Falling through the same jump gets full control back
        p.vel.y = -1.0;
        p.accelerate(false);
        assert!((p.vel.x - PLAYER_ACCEL_WEAK - PLAYER_ACCEL).abs() < 1e-12);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut p = player();
        p.jump();
        assert_eq!(p.pose(), Pose::Jump);
        assert_eq!(p.vel.y, PLAYER_JUMP_VELOCITY);
        p.vel.y = 1.0;
        p.jump();
        assert_eq!(p.vel.y, 1.0);
    }

    #[test]
    fn test_stop_ignored_mid_jump() {
        let mut p = player();
        p.vel.x = 1.5;
        p.jump();
        p.stop();
        assert_eq!(p.vel.x, 1.5);

        p.correct_on_collision(Contact::BOTTOM);
        p.stop();
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_landing_snaps_up_and_stands() {
        let mut p = player();
        p.jump();
        p.pos.y = 13.5;
        p.correct_on_collision(Contact::BOTTOM);
        assert_eq!(p.pos.y, 16.0);
        assert_eq!(p.vel.y, 0.0);
        assert_eq!(p.pose(), Pose::Upright);
    }

    #[test]
    fn test_squeezed_crouches() {
        let mut p = player();
        p.correct_on_collision(Contact::BOTTOM | Contact::TOP);
        assert_eq!(p.pose(), Pose::Crouch);
    }

    #[test]
    fn test_head_bump_pushes_down() {
        let mut p = player();
        p.pos.y = 20.0;
        p.vel.y = 3.0;
        p.correct_on_collision(Contact::TOP);
        assert_eq!(p.vel.y, 0.0);
        assert_eq!(p.pos.y, 12.0);
    }

    #[test]
    fn test_side_contacts_snap_horizontally() {
        let mut p = player();
        p.pos.x = 26.0;
        p.vel.x = -1.0;
        p.correct_on_collision(Contact::LEFT);
        assert_eq!(p.pos.x, 32.0);
        assert_eq!(p.vel.x, 0.0);

        p.pos.x = 38.0;
        p.vel.x = 1.0;
        p.correct_on_collision(Contact::RIGHT);
        assert_eq!(p.pos.x, 32.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_downgrade_resets_grace_period() {
        let mut p = player();
        p.upgrade_to(Health::Flower).unwrap();
        p.downgrade();
        assert_eq!(p.health(), Health::Big);
        assert!(!p.vulnerable());
        for _ in 0..PLAYER_VULNERABLE_TICKS {
            p.update();
        }
        assert!(p.vulnerable());
    }

    #[test]
    fn test_upgrade_never_lowers() {
        let mut p = player();
        p.upgrade_to(Health::Flower).unwrap();
        p.upgrade_to(Health::Big).unwrap();
        assert_eq!(p.health(), Health::Flower);
    }

    #[test]
    fn test_upgrade_dead_is_error() {
        let mut p = player();
        p.die();
        assert!(matches!(
            p.upgrade_to(Health::Big),
            Err(SimError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_hundredth_coin_grants_life() {
        let mut p = player();
        for _ in 0..99 {
            p.add_coin();
        }
        assert_eq!(p.lives(), 3);
        p.add_coin();
        assert_eq!(p.lives(), 4);
        assert_eq!(p.coins(), 100);
    }

    #[test]
    fn test_restart_after_death() {
        let mut p = player();
        p.add_coin();
        p.die();
        let pos = p.pos;
        assert!(p.restart());
        assert_eq!(p.health(), Health::Small);
        assert_eq!(p.coins(), 0);
        assert_eq!(p.lives(), 2);
        assert_eq!(p.pos, pos);
    }

    #[test]
    fn test_restart_alive_keeps_stats() {
        let mut p = Player::new(DVec2::ZERO, 1);
        p.upgrade_to(Health::Big).unwrap();
        p.add_coin();
        p.vel = DVec2::new(1.0, 2.0);
        assert!(!p.restart());
        assert_eq!(p.health(), Health::Big);
        assert_eq!(p.coins(), 1);
        assert_eq!(p.lives(), 0);
        assert_eq!(p.vel, DVec2::ZERO);
    }

    #[test]
    fn test_render_faces_motion() {
        use crate::renderer::{DrawCommand, RecordingSink};

        let mut sink = RecordingSink::new(256, 240);
        let mut p = player();
        p.vel.x = -1.0;
        p.render(&mut sink, 16);
        assert!(p.facing_left());
        match &sink.commands[0] {
            DrawCommand::Place { sheet, x, y, flip, .. } => {
                assert_eq!(*sheet, Sheet::Player);
                assert_eq!(*x, 16);
                assert_eq!(*y, 240 - 16 - 16);
                assert!(*flip);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[derive(Debug, Clone)]
    enum HealthOp {
        Down,
        Up(Health),
    }

    fn health_op() -> impl Strategy<Value = HealthOp> {
        prop_oneof![
            Just(HealthOp::Down),
            prop_oneof![
                Just(Health::Small),
                Just(Health::Big),
                Just(Health::Flower)
            ]
            .prop_map(HealthOp::Up),
        ]
    }

    proptest! {
        #[test]
        fn health_moves_in_declared_direction(ops in proptest::collection::vec(health_op(), 0..40)) {
            let mut p = player();
            for op in ops {
                let before = p.health();
                match op {
                    HealthOp::Down => {
                        p.downgrade();
                        prop_assert!(p.health() <= before);
                    }
                    HealthOp::Up(target) => {
                        let result = p.upgrade_to(target);
                        prop_assert_eq!(result.is_err(), before == Health::Dead);
                        prop_assert!(p.health() >= before);
                    }
                }
                prop_assert!(p.health() >= Health::Dead && p.health() <= Health::Flower);
            }
        }
    }
}
