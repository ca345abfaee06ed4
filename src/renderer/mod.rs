//! Render sink abstraction
//!
//! The simulation draws through `RenderSink` and never reads anything back.
//! Image loading and caching belong to the sink implementation; the core only
//! names which sheet a sprite comes from.

pub mod recording;

pub use recording::{DrawCommand, RecordingSink};

/// Sprite sheets the simulation draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Tiles,
    Enemies,
    Upgrades,
    Player,
}

impl Sheet {
    /// Bitmap file backing this sheet
    pub fn file_name(&self) -> &'static str {
        match self {
            Sheet::Tiles => "52571.bmp",
            Sheet::Enemies => "52570.bmp",
            Sheet::Upgrades => "52569.bmp",
            Sheet::Player => "50365.bmp",
        }
    }
}

/// Source rectangle inside a sheet, in pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl SrcRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Sky behind the level
pub const BACKGROUND: Color = Color::rgba(128, 128, 255, 255);

/// Drawing surface driven once per frame
///
/// Destination coordinates are screen pixels with a top-left origin.
/// Implementations clip anything that falls outside the viewport.
pub trait RenderSink {
    /// Viewport width in pixels
    fn width(&self) -> i32;
    /// Viewport height in pixels
    fn height(&self) -> i32;
    fn fill(&mut self, color: Color);
    fn place(&mut self, sheet: Sheet, dest_x: i32, dest_y: i32, src: SrcRect, flip: bool);
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
    /// Show the finished frame
    fn present(&mut self) {}
}
