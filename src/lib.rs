//! Scroll Runner - simulation core of a side-scrolling tile platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, state machines, frame loop)
//! - `renderer`: Render sink abstraction and a recording sink
//! - `platform`: Input event abstraction
//! - `level`: Text level loader
//! - `session`: Retry flow across attempts
//! - `settings`: Data-driven runtime configuration

pub mod error;
pub mod level;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Side of a grid tile in pixels
    pub const TILE_SIZE: i32 = 16;
    /// Same as `TILE_SIZE`, for continuous-space math
    pub const TILE_SIZE_F: f64 = TILE_SIZE as f64;

    /// Player defaults
    pub const PLAYER_WIDTH: i32 = 16;
    pub const PLAYER_SMALL_HEIGHT: i32 = 16;
    pub const PLAYER_BIG_HEIGHT: i32 = 32;
    pub const PLAYER_GRAVITY: f64 = 0.15;
    /// Horizontal acceleration while grounded or falling
    pub const PLAYER_ACCEL: f64 = 0.2;
    /// Horizontal acceleration while rising through a jump
    pub const PLAYER_ACCEL_WEAK: f64 = 0.02;
    pub const PLAYER_JUMP_VELOCITY: f64 = 4.5;
    pub const PLAYER_MAX_VELOCITY: f64 = 1.8;
    /// Ticks after a downgrade before enemies can hurt the player again
    pub const PLAYER_VULNERABLE_TICKS: u32 = 60;
    pub const PLAYER_ANIM_TICKS: u32 = 5;
    /// A coin count multiple of this grants an extra life
    pub const COINS_PER_LIFE: u32 = 100;

    /// Actor defaults
    pub const ACTOR_GRAVITY: f64 = 0.15;
    pub const ACTOR_SPEED: f64 = 1.2;
    /// Ticks a Koopa stays in its shell before walking again
    pub const KOOPA_MAX_STILL: u32 = 300;
    /// Ticks a TempCoin stays visible
    pub const TEMPCOIN_LIFETIME: u32 = 5;
    pub const ACTOR_ANIM_TICKS: u32 = 3;

    /// Tile animation
    pub const TILE_ANIM_TICKS: u32 = 3;
    pub const TILE_TICKS_PER_MOVE: u32 = 10;
    pub const TILE_MOVE_FRAMES: u32 = 3;
    /// Hit-ticks after which a multicoin tile is exhausted
    pub const MULTICOIN_THRESHOLD: u32 = 300;

    /// Width of the player-vs-tiles scan window, in columns
    pub const PLAYER_SCAN_COLUMNS: i32 = 2;

    /// Coins that end the game outright
    pub const MANY_COINS: u32 = 1_000_000;
}
