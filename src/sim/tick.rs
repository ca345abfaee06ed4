//! Per-frame simulation step
//!
//! One call reads input, advances physics, resolves contacts, draws the frame
//! and reports the outcome. The order of the passes is fixed.

use super::actor::ActorKind;
use super::collision::{Contact, classify};
use super::player::Health;
use super::state::{Outcome, World};
use super::tile::Spawn;
use crate::consts::*;
use crate::error::SimError;
use crate::platform::{InputSource, Key, KeyEvent};
use crate::renderer::{BACKGROUND, RenderSink};

/// Advance the world by one frame
///
/// Once an outcome other than `KeepOn` has been returned, later calls return
/// it again without touching the world or the sink.
pub fn tick(
    world: &mut World,
    input: &mut dyn InputSource,
    sink: &mut dyn RenderSink,
) -> Result<Outcome, SimError> {
    if world.outcome.is_terminal() {
        return Ok(world.outcome);
    }
    world.time_ticks += 1;

    apply_input(world, input);
    match world.intent {
        -1 => world.player.accelerate(true),
        0 => world.player.stop(),
        _ => world.player.accelerate(false),
    }
    world.player.update();

    // Camera boundary
    let scroll = world.scroll as f64;
    if world.player.pos.x < scroll {
        world.player.pos.x = scroll;
    }
    let width = sink.width();
    if (world.player.pos.x - scroll) * 2.0 > width as f64 {
        let target = (world.player.pos.x - (width / 2) as f64) as i32;
        world.scroll = world.scroll.max(target);
    }

    if world.player.pos.y + (world.player.height() as f64) < 0.0 {
        log::debug!("player fell out of the world");
        world.player.die();
    }

    update_actors(world, width)?;
    resolve_player_tiles(world)?;
    resolve_player_actors(world)?;
    resolve_actor_tiles(world);

    sink.fill(BACKGROUND);
    world.tiles.render(sink, world.scroll);
    for actor in world.actors.iter() {
        actor.render(sink, world.scroll);
    }
    world.player.render(sink, world.scroll);

    let outcome = if world.player.coins() >= MANY_COINS {
        Outcome::ManyCoins
    } else {
        sink.draw_text(0, 0, &format!("{:06}", world.player.coins()));
        sink.present();
        if world.player.health() == Health::Dead {
            Outcome::Dead
        } else if world.scroll >= world.max_scroll {
            Outcome::Won
        } else {
            Outcome::KeepOn
        }
    };

    if outcome.is_terminal() {
        log::info!(
            "attempt ended {:?} after {} ticks (scroll {}, coins {})",
            outcome,
            world.time_ticks,
            world.scroll,
            world.player.coins()
        );
    }
    world.outcome = outcome;
    Ok(outcome)
}

/// Drain pending key events into the jump trigger and horizontal intent
fn apply_input(world: &mut World, input: &mut dyn InputSource) {
    while let Some(event) = input.poll_event() {
        match event {
            KeyEvent::Down(Key::Up) => world.player.jump(),
            KeyEvent::Down(Key::Left) => world.intent = -1,
            KeyEvent::Down(Key::Right) => world.intent = 1,
            KeyEvent::Up(Key::Left) => {
                world.intent = if input.is_held(Key::Right) { 1 } else { 0 };
            }
            KeyEvent::Up(Key::Right) => {
                world.intent = if input.is_held(Key::Left) { -1 } else { 0 };
            }
            KeyEvent::Up(Key::Up) => {}
        }
    }
}

/// Integrate actors left of the viewport's right edge and drop the ones
/// that expired or left the world
fn update_actors(world: &mut World, width: i32) -> Result<(), SimError> {
    let scroll = world.scroll as f64;
    let right = (world.scroll + width) as f64;
    let mut i = 0;
    while let Some(actor) = world.actors.get_mut(i) {
        if actor.pos.x >= right {
            i += 1;
            continue;
        }
        let expired = actor.update();
        let fallen = actor.pos.y + actor.height() as f64 <= 0.0;
        let behind = actor.pos.x + actor.width() as f64 <= scroll;
        if expired || fallen || behind {
            let gone = world.actors.swap_remove(i)?;
            log::debug!("{:?} removed", gone.kind());
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Player against the tiles in its column window
///
/// Only head bumps strike a tile. The combined mask corrects the player once.
fn resolve_player_tiles(world: &mut World) -> Result<(), SimError> {
    let player_rect = world.player.rect();
    let column = world.player.pos.x as i32 / TILE_SIZE;
    let mut mask = Contact::empty();
    let mut spawns: Vec<Spawn> = Vec::new();

    let tiles = &mut world.tiles;
    let mut cursor = tiles.begin();
    while !tiles.is_end(cursor) && tiles.get(cursor)?.x < column {
        cursor = tiles.advance(cursor);
    }

    while !tiles.is_end(cursor) {
        let tile = tiles.get_mut(cursor)?;
        if tile.x >= column + PLAYER_SCAN_COLUMNS {
            break;
        }
        if tile.can_pass_through() {
            cursor = tiles.advance(cursor);
            continue;
        }

        let contact = classify(&tile.rect(), &player_rect);
        mask |= contact;
        if contact.contains(Contact::TOP) {
            let hit = tile.hit(&mut world.player);
            spawns.extend(hit.spawn);
            if hit.remove {
                log::debug!("tile ({}, {}) destroyed", tile.x, tile.y);
                cursor = tiles.delete(cursor)?;
                continue;
            }
        }
        cursor = tiles.advance(cursor);
    }

    world.player.correct_on_collision(mask);
    for spawn in spawns {
        world.spawn(spawn.kind, spawn.pos)?;
    }
    Ok(())
}

/// Player against every actor; consumed actors are removed
///
/// A dead player still collects coins and meets enemies, but upgrades are
/// left where they are.
fn resolve_player_actors(world: &mut World) -> Result<(), SimError> {
    let player_rect = world.player.rect();
    let mut i = 0;
    while let Some(actor) = world.actors.get_mut(i) {
        let contact = classify(&actor.rect(), &player_rect);
        let upgrade = matches!(actor.kind(), ActorKind::Mushroom | ActorKind::Flower);
        if contact.is_empty() || (upgrade && world.player.health() == Health::Dead) {
            i += 1;
            continue;
        }
        if actor.collide_player(&mut world.player, contact)? {
            let gone = world.actors.swap_remove(i)?;
            log::debug!("{:?} consumed", gone.kind());
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Push actors out of solid tiles; no tile reacts
fn resolve_actor_tiles(world: &mut World) {
    for actor in world.actors.iter_mut() {
        let rect = actor.rect();
        let mut mask = Contact::empty();
        for tile in world.tiles.iter() {
            let left = tile.x * TILE_SIZE;
            // Sorted by column: nothing further right can touch
            if left as f64 >= rect.right() {
                break;
            }
            if ((left + TILE_SIZE) as f64) <= rect.pos.x || tile.can_pass_through() {
                continue;
            }
            mask |= classify(&tile.rect(), &rect);
        }
        if !mask.is_empty() {
            actor.correct_on_block_collision(mask);
        }
    }
}
