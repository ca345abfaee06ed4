//! Directional overlap classification for axis-aligned rectangles
//!
//! The tricky part of the simulation: one overlap test that also tells which
//! side the contact happened on, biased so that landings register vertically.
//!
//! Coordinates are bottom-up: `y` grows upward and a rectangle's position is
//! its bottom-left corner. A flag names the side of `b` on which `a` lies, so
//! `classify(tile, player) == Contact::BOTTOM` means the tile is under the
//! player (a landing), and `classify(goomba, player) == Contact::BOTTOM` means
//! the player came down on the goomba (a stomp).

use bitflags::bitflags;
use glam::DVec2;

/// Horizontal compression applied before the diagonal split
const SKEW: f64 = 0.75;

bitflags! {
    /// Aggregate contact mask. A single `classify` call yields at most one
    /// flag; callers OR results together across several contacts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Contact: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y + self.size.y
    }
}

/// Classify the overlap of `a` against `b`
///
/// Returns `Contact::empty()` when the rectangles do not overlap. Touching
/// edges are not an overlap.
pub fn classify(a: &Rect, b: &Rect) -> Contact {
    let half = (a.size + b.size) / 2.0;
    let d = a.pos - b.pos + half - b.size;

    if !(d.x < half.x && -d.x < half.x && d.y < half.y && -d.y < half.y) {
        return Contact::empty();
    }

    let dxp = SKEW * d.x - d.y;
    let dyp = SKEW * d.x + d.y;
    match (dxp > 0.0, dyp > 0.0) {
        (true, true) => Contact::RIGHT,
        (true, false) => Contact::BOTTOM,
        (false, true) => Contact::TOP,
        (false, false) => Contact::LEFT,
    }
}
