//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per rendered frame, no wall clock
//! - Seeded RNG only
//! - Stable tile order (ascending column)
//! - Drawing and input only through the sink and source traits

pub mod actor;
pub mod actor_bag;
pub mod collision;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;
pub mod tile_set;

pub use actor::{Actor, ActorKind};
pub use actor_bag::ActorBag;
pub use collision::{Contact, Rect, classify};
pub use player::{Health, Player, Pose};
pub use state::{Outcome, World};
pub use tick::tick;
pub use tile::{HitOutcome, Spawn, Tile, TileKind};
pub use tile_set::{TileCursor, TileSet};
