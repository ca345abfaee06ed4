//! Level tiles ordered by column
//!
//! Tiles are kept sorted by ascending `x` once the level is loaded. Both the
//! render pass and the collision passes stop scanning as soon as they walk
//! past the region they care about, so per-frame cost follows the visible
//! window rather than the level size.
//!
//! Traversal goes through a [`TileCursor`]. Deleting at a cursor hands back a
//! cursor to the element that followed, which is simply the same index.

use std::collections::VecDeque;

use super::tile::Tile;
use crate::consts::TILE_SIZE;
use crate::error::SimError;
use crate::renderer::RenderSink;

/// Position inside a [`TileSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TileCursor(usize);

#[derive(Debug, Clone, Default)]
pub struct TileSet {
    tiles: VecDeque<Tile>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Append at the end
    pub fn push(&mut self, tile: Tile) -> Result<(), SimError> {
        self.tiles.try_reserve(1)?;
        self.tiles.push_back(tile);
        Ok(())
    }

    /// Stable sort by ascending column
    pub fn sort(&mut self) {
        self.tiles.make_contiguous().sort_by_key(|t| t.x);
    }

    pub fn begin(&self) -> TileCursor {
        TileCursor(0)
    }

    pub fn is_end(&self, cursor: TileCursor) -> bool {
        cursor.0 >= self.tiles.len()
    }

    pub fn advance(&self, cursor: TileCursor) -> TileCursor {
        TileCursor(cursor.0 + 1)
    }

    pub fn get(&self, cursor: TileCursor) -> Result<&Tile, SimError> {
        self.tiles
            .get(cursor.0)
            .ok_or(SimError::NullReference("tile cursor past the end"))
    }

    pub fn get_mut(&mut self, cursor: TileCursor) -> Result<&mut Tile, SimError> {
        self.tiles
            .get_mut(cursor.0)
            .ok_or(SimError::NullReference("tile cursor past the end"))
    }

    /// Drop the tile under the cursor; returns the cursor of its successor
    pub fn delete(&mut self, cursor: TileCursor) -> Result<TileCursor, SimError> {
        self.take(cursor).map(|(_, next)| next)
    }

    /// Unlink the tile under the cursor and hand it back
    pub fn take(&mut self, cursor: TileCursor) -> Result<(Tile, TileCursor), SimError> {
        let tile = self
            .tiles
            .remove(cursor.0)
            .ok_or(SimError::NullReference("tile cursor past the end"))?;
        Ok((tile, cursor))
    }

    /// Prune tiles scrolled off the left edge and draw the visible ones
    ///
    /// Returns the number of tiles drawn.
    pub fn render(&mut self, sink: &mut dyn RenderSink, scroll: i32) -> usize {
        while self
            .tiles
            .front()
            .is_some_and(|t| (t.x + 1) * TILE_SIZE <= scroll)
        {
            if let Some(t) = self.tiles.pop_front() {
                log::debug!("tile ({}, {}) scrolled out", t.x, t.y);
            }
        }

        let right = scroll + sink.width();
        let mut drawn = 0;
        for tile in self.tiles.iter_mut() {
            if tile.x * TILE_SIZE >= right {
                break;
            }
            if tile.render(sink, scroll) {
                drawn += 1;
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RecordingSink, Sheet};
    use crate::sim::tile::TileKind;
    use proptest::prelude::*;

    fn tile(x: i32, y: i32) -> Tile {
        Tile::new(TileKind::Opaque, x, y, (0, 0), 1).unwrap()
    }

    fn set(xs: &[i32]) -> TileSet {
        let mut s = TileSet::new();
        for (row, &x) in xs.iter().enumerate() {
            s.push(tile(x, row as i32)).unwrap();
        }
        s
    }

    fn columns(s: &TileSet) -> Vec<(i32, i32)> {
        s.iter().map(|t| (t.x, t.y)).collect()
    }

    #[test]
    fn test_sort_is_stable() {
        let mut s = set(&[3, 1, 3, 0, 1]);
        s.sort();
        assert_eq!(columns(&s), vec![(0, 3), (1, 1), (1, 4), (3, 0), (3, 2)]);
    }

    #[test]
    fn test_delete_while_walking() {
        let mut s = set(&[0, 1, 2, 3]);
        let mut c = s.begin();
        while !s.is_end(c) {
            if s.get(c).unwrap().x % 2 == 1 {
                c = s.delete(c).unwrap();
            } else {
                c = s.advance(c);
            }
        }
        assert_eq!(s.iter().map(|t| t.x).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_take_preserves_payload() {
        let mut s = set(&[5, 6]);
        let (t, c) = s.take(s.begin()).unwrap();
        assert_eq!(t.x, 5);
        assert_eq!(s.get(c).unwrap().x, 6);
    }

    #[test]
    fn test_cursor_past_end_is_null_reference() {
        let mut s = set(&[1]);
        let end = s.advance(s.begin());
        assert!(s.is_end(end));
        assert!(matches!(s.get(end), Err(SimError::NullReference(_))));
        assert!(matches!(s.delete(end), Err(SimError::NullReference(_))));
    }

    #[test]
    fn test_render_prunes_left_and_stops_right() {
        let mut s = set(&[0, 1, 2, 3, 10, 40]);
        s.sort();
        let mut sink = RecordingSink::new(64, 240);

        // Columns 0 and 1 end at or before the scroll offset
        let drawn = s.render(&mut sink, 32);
        assert_eq!(drawn, 2);
        assert_eq!(sink.placed(Sheet::Tiles), 2);
        assert_eq!(s.len(), 4);
        assert_eq!(s.iter().next().map(|t| t.x), Some(2));
    }

    #[test]
    fn test_partially_visible_tile_is_kept() {
        let mut s = set(&[1]);
        let mut sink = RecordingSink::new(64, 240);
        assert_eq!(s.render(&mut sink, 31), 1);
        assert_eq!(s.len(), 1);
    }

    proptest! {
        #[test]
        fn sort_is_idempotent(xs in proptest::collection::vec(0i32..64, 0..40)) {
            let mut once = set(&xs);
            once.sort();
            let mut twice = once.clone();
            twice.sort();
            prop_assert_eq!(columns(&once), columns(&twice));
            prop_assert!(once.iter().zip(once.iter().skip(1)).all(|(a, b)| a.x <= b.x));
        }
    }
}
