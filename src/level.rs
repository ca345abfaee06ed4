//! Text level loader
//!
//! Line oriented. Blank lines and `#` comments are ignored.
//!
//! ```text
//! 2 2 3        # player spawn column, row and lives
//! 200          # scroll offset (in tiles) that wins the level
//! f 0 0 69     # tile records: letter x y [repeat_x [repeat_y]]
//! h 0 1
//! -            # end of tiles
//! g 22 1       # actor records: g goomba, k koopa, c coin
//! ```
//!
//! A tile letter names a declaration: one tile plus an optional chain of
//! extra tiles placed relative to it. Repeats step by the declared
//! structure size.

use std::path::Path;

use glam::DVec2;

use crate::consts::TILE_SIZE;
use crate::error::SimError;
use crate::sim::TileKind::{Coin, DestroyCoin, Multicoin, Opaque, Passthrough as Pass, Upgrade};
use crate::sim::{Actor, ActorBag, ActorKind, Player, Tile, TileKind, TileSet, World};

/// One entry of the declaration tables
#[derive(Debug, Clone, Copy)]
struct Decl {
    kind: TileKind,
    sprite: (i32, i32),
    anim_steps: u32,
    /// Structure size for a head entry, offset from the head for a
    /// continuation entry
    dx: i32,
    dy: i32,
    next: Option<usize>,
}

const fn decl(kind: TileKind, ix: i32, iy: i32, anim_steps: u32, dx: i32, dy: i32, next: i32) -> Decl {
    Decl {
        kind,
        sprite: (ix, iy),
        anim_steps,
        dx,
        dy,
        next: if next < 0 { None } else { Some(next as usize) },
    }
}

/// Empty decoration for unused letters
const BLANK: Decl = decl(Pass, 16, 8, 1, 1, 1, -1);

/// Declarations for letters `a..=z`
const HEADS: [Decl; 26] = [
    decl(Upgrade, 24, 0, 3, 1, 1, -1),    // a: question block with an item
    decl(Pass, 2, 0, 1, 5, 5, 16),        // b: castle
    decl(Coin, 2, 0, 1, 1, 1, -1),        // c: brick with a coin
    decl(DestroyCoin, 2, 0, 1, 1, 1, -1), // d: breakable brick
    decl(Coin, 24, 0, 3, 1, 1, -1),       // e: question block with a coin
    decl(Opaque, 0, 0, 1, 1, 1, -1),      // f: floor
    decl(Multicoin, 2, 0, 1, 1, 1, -1),   // g: brick with many coins
    decl(Pass, 8, 8, 1, 5, 3, 0),         // h: hill
    decl(Pass, 8, 8, 1, 3, 2, 11),        // i: small hill
    BLANK,
    BLANK,
    BLANK,
    decl(Pass, 11, 9, 1, 1, 1, -1), // m: bush, left
    decl(Pass, 12, 9, 1, 1, 1, -1), // n: bush, middle
    decl(Pass, 13, 9, 1, 1, 1, -1), // o: bush, right
    BLANK,
    BLANK,
    BLANK,
    decl(Opaque, 0, 1, 1, 1, 1, -1), // s: stair block
    decl(Opaque, 0, 8, 1, 2, 1, 14), // t: pipe top
    decl(Opaque, 0, 9, 1, 2, 1, 15), // u: pipe body
    BLANK,
    BLANK,
    decl(Pass, 0, 21, 1, 1, 2, 8),  // x: cloud, left
    decl(Pass, 1, 21, 1, 1, 2, 9),  // y: cloud, middle
    decl(Pass, 2, 21, 1, 1, 1, 10), // z: cloud, right
];

/// Continuation pieces chained from `HEADS`
const PIECES: [Decl; 36] = [
    // hill
    decl(Pass, 8, 8, 1, 1, 1, 1),
    decl(Pass, 8, 9, 1, 1, 0, 2),
    decl(Pass, 10, 9, 1, 3, 0, 3),
    decl(Pass, 8, 9, 1, 2, 1, 4),
    decl(Pass, 9, 9, 1, 2, 0, 5),
    decl(Pass, 9, 8, 1, 2, 2, 6),
    decl(Pass, 10, 8, 1, 3, 1, 7),
    decl(Pass, 10, 8, 1, 4, 0, -1),
    // cloud tops
    decl(Pass, 0, 20, 1, 0, 1, -1),
    decl(Pass, 1, 20, 1, 0, 1, -1),
    decl(Pass, 2, 20, 1, 0, 1, -1),
    // small hill
    decl(Pass, 8, 9, 1, 1, 0, 12),
    decl(Pass, 10, 8, 1, 2, 0, 13),
    decl(Pass, 9, 8, 1, 1, 1, -1),
    // pipe right halves
    decl(Opaque, 1, 8, 1, 1, 0, -1),
    decl(Opaque, 1, 9, 1, 1, 0, -1),
    // castle
    decl(Pass, 2, 0, 1, 1, 0, 17),
    decl(Pass, 2, 0, 1, 0, 1, 18),
    decl(Pass, 2, 0, 1, 1, 1, 19),
    decl(Pass, 2, 0, 1, 3, 0, 20),
    decl(Pass, 2, 0, 1, 3, 1, 21),
    decl(Pass, 2, 0, 1, 4, 0, 22),
    decl(Pass, 2, 0, 1, 4, 1, 23),
    decl(Pass, 13, 1, 1, 2, 0, 24),
    decl(Pass, 12, 1, 1, 2, 1, 25),
    decl(Pass, 11, 0, 1, 0, 2, 26),
    decl(Pass, 11, 1, 1, 1, 2, 27),
    decl(Pass, 11, 1, 1, 2, 2, 28),
    decl(Pass, 11, 1, 1, 3, 2, 29),
    decl(Pass, 11, 0, 1, 4, 2, 30),
    decl(Pass, 14, 0, 1, 1, 3, 31),
    decl(Pass, 2, 0, 1, 2, 3, 32),
    decl(Pass, 14, 0, 1, 3, 3, 33),
    decl(Pass, 11, 0, 1, 1, 4, 34),
    decl(Pass, 11, 0, 1, 2, 4, 35),
    decl(Pass, 11, 0, 1, 3, 4, -1),
];

/// Parsed level, ready to become a [`World`]
#[derive(Debug, Clone)]
pub struct Level {
    /// Sorted by column
    pub tiles: TileSet,
    pub actors: ActorBag,
    /// Fresh player at the spawn point
    pub player: Player,
    /// Winning scroll offset, in pixels
    pub max_scroll: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Spawn,
    MaxScroll,
    Tiles,
    Actors,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let level = Self::parse(&text)?;
        log::info!(
            "loaded level {} ({} tiles, {} actors, max scroll {})",
            path.display(),
            level.tiles.len(),
            level.actors.len(),
            level.max_scroll
        );
        Ok(level)
    }

    pub fn parse(text: &str) -> Result<Self, SimError> {
        let mut section = Section::Spawn;
        let mut player = None;
        let mut max_scroll = 0;
        let mut tiles = TileSet::new();
        let mut actors = ActorBag::new();
        let mut last_line = 0;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            last_line = line;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<&str> = content.split_whitespace().collect();

            match section {
                Section::Spawn => {
                    let [x, y, lives] = fields.as_slice() else {
                        return Err(SimError::invalid_input(line, "expected `x y lives`"));
                    };
                    let pos = DVec2::new(
                        (coord(x, line)? * TILE_SIZE) as f64,
                        (coord(y, line)? * TILE_SIZE) as f64,
                    );
                    let lives = lives
                        .parse::<u32>()
                        .map_err(|_| SimError::invalid_input(line, format!("bad lives `{lives}`")))?;
                    player = Some(Player::new(pos, lives));
                    section = Section::MaxScroll;
                }
                Section::MaxScroll => {
                    let [scroll] = fields.as_slice() else {
                        return Err(SimError::invalid_input(line, "expected `max_scroll`"));
                    };
                    max_scroll = coord(scroll, line)? * TILE_SIZE;
                    section = Section::Tiles;
                }
                Section::Tiles if fields == ["-"] => section = Section::Actors,
                Section::Tiles => parse_tile_record(&fields, line, &mut tiles)?,
                Section::Actors => {
                    let [letter, x, y] = fields.as_slice() else {
                        return Err(SimError::invalid_input(line, "expected `kind x y`"));
                    };
                    let kind = match *letter {
                        "g" => ActorKind::Goomba,
                        "k" => ActorKind::Koopa,
                        "c" => ActorKind::Coin,
                        other => {
                            return Err(SimError::invalid_input(
                                line,
                                format!("unknown actor `{other}`"),
                            ));
                        }
                    };
                    let pos = DVec2::new(
                        (coord(x, line)? * TILE_SIZE) as f64,
                        (coord(y, line)? * TILE_SIZE) as f64,
                    );
                    actors.push(Actor::new(kind, pos))?;
                }
            }
        }

        let Some(player) = player else {
            return Err(SimError::invalid_input(last_line, "missing player spawn"));
        };
        if section == Section::MaxScroll {
            return Err(SimError::invalid_input(last_line, "missing max scroll"));
        }

        tiles.sort();
        Ok(Self {
            tiles,
            actors,
            player,
            max_scroll,
        })
    }

    pub fn into_world(self, seed: u64) -> World {
        World::new(self.tiles, self.actors, self.player, self.max_scroll, seed)
    }
}

/// Largest grid coordinate a level may use; pixel arithmetic on it keeps
/// headroom in `i32`
const MAX_CELL: i32 = i32::MAX / TILE_SIZE / 4;

fn int(field: &str, line: usize) -> Result<i32, SimError> {
    field
        .parse()
        .map_err(|_| SimError::invalid_input(line, format!("bad number `{field}`")))
}

/// Grid coordinate, bounded to `MAX_CELL` either way
fn coord(field: &str, line: usize) -> Result<i32, SimError> {
    in_grid(Some(int(field, line)?), line)
}

/// `None` is an overflowed computation
fn in_grid(cell: Option<i32>, line: usize) -> Result<i32, SimError> {
    match cell {
        Some(n) if n.unsigned_abs() <= MAX_CELL as u32 => Ok(n),
        _ => Err(SimError::invalid_input(line, "coordinate out of range")),
    }
}

fn count(field: Option<&&str>, line: usize) -> Result<i32, SimError> {
    match field {
        None => Ok(1),
        Some(f) => match int(f, line)? {
            n if n >= 0 => Ok(n),
            _ => Err(SimError::invalid_input(line, format!("negative repeat `{f}`"))),
        },
    }
}

fn parse_tile_record(fields: &[&str], line: usize, tiles: &mut TileSet) -> Result<(), SimError> {
    if !(3..=5).contains(&fields.len()) {
        return Err(SimError::invalid_input(line, "expected `letter x y [nx [ny]]`"));
    }
    let head = match fields[0].as_bytes() {
        [c @ b'a'..=b'z'] => &HEADS[(c - b'a') as usize],
        _ => {
            return Err(SimError::invalid_input(
                line,
                format!("unknown tile `{}`", fields[0]),
            ));
        }
    };
    let x = coord(fields[1], line)?;
    let y = coord(fields[2], line)?;
    let nx = count(fields.get(3), line)?;
    let ny = count(fields.get(4), line)?;

    // The far corner bounds every repeat
    let step = |origin: i32, size: i32, n: i32| {
        in_grid(
            n.checked_sub(1)
                .and_then(|n| size.checked_mul(n.max(0)))
                .and_then(|d| origin.checked_add(d)),
            line,
        )
    };
    step(x, head.dx, nx)?;
    step(y, head.dy, ny)?;

    for i in 0..nx {
        for j in 0..ny {
            place_structure(head, x + head.dx * i, y + head.dy * j, line, tiles)?;
        }
    }
    Ok(())
}

/// Push a head tile and every piece chained from it
fn place_structure(
    head: &Decl,
    x: i32,
    y: i32,
    line: usize,
    tiles: &mut TileSet,
) -> Result<(), SimError> {
    tiles.push(Tile::new(head.kind, x, y, head.sprite, head.anim_steps)?)?;
    let mut next = head.next;
    while let Some(index) = next {
        let piece = PIECES
            .get(index)
            .ok_or(SimError::OutOfRange("tile declaration chain"))?;
        tiles.push(Tile::new(
            piece.kind,
            in_grid(x.checked_add(piece.dx), line)?,
            in_grid(y.checked_add(piece.dy), line)?,
            piece.sprite,
            piece.anim_steps,
        )?)?;
        next = piece.next;
    }
    Ok(())
}
