//! Tile content buffer
//!
//! A level's tiles live in one flat, fixed-capacity buffer covering the whole
//! `MAX_WIDTH x MAX_HEIGHT` room grid (800x600 tiles). Each tile is a plain
//! integer code. Only the part covered by the active map holds meaningful
//! data.
//!
//! Every accessor is total: coordinates that fall outside the buffer read as
//! `0` and writes to them are ignored.

use vvlevel_core::{MAX_HEIGHT, MAX_WIDTH, SCREEN_HEIGHT_TILES, SCREEN_WIDTH_TILES};

/// Buffer width in tiles
pub const MAP_WIDTH_TILES: i32 = MAX_WIDTH * SCREEN_WIDTH_TILES;

/// Buffer height in tiles
pub const MAP_HEIGHT_TILES: i32 = MAX_HEIGHT * SCREEN_HEIGHT_TILES;

/// Number of tiles in the buffer (800x600)
pub const MAX_TILE_COUNT: usize = (MAP_WIDTH_TILES * MAP_HEIGHT_TILES) as usize;

/// Empty tile value
pub const EMPTY_TILE: i32 = 0;

/// Fixed-capacity tile buffer in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBuffer {
    tiles: Vec<i32>,
}

impl TileBuffer {
    /// Create a buffer of empty tiles
    pub fn new() -> Self {
        Self {
            tiles: vec![EMPTY_TILE; MAX_TILE_COUNT],
        }
    }

    /// Reset every tile to empty
    pub fn clear(&mut self) {
        self.tiles.fill(EMPTY_TILE);
    }

    /// Flat index of tile `(x, y)` in room `(rx, ry)`
    ///
    /// # Returns
    /// `None` when the row `y + ry*30` is outside the buffer height or the
    /// flat index is outside the buffer. `x` may run past the room edge into
    /// the next room; that is how absolute reads are expressed.
    pub fn tile_index(rx: i32, ry: i32, x: i32, y: i32) -> Option<usize> {
        let row = i64::from(y) + i64::from(ry) * i64::from(SCREEN_HEIGHT_TILES);
        if !(0..i64::from(MAP_HEIGHT_TILES)).contains(&row) {
            return None;
        }

        let index = i64::from(x)
            + i64::from(rx) * i64::from(SCREEN_WIDTH_TILES)
            + row * i64::from(MAP_WIDTH_TILES);

        usize::try_from(index).ok().filter(|&i| i < MAX_TILE_COUNT)
    }

    /// Get tile `(x, y)` of room `(rx, ry)`
    #[inline]
    pub fn get(&self, rx: i32, ry: i32, x: i32, y: i32) -> i32 {
        Self::tile_index(rx, ry, x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(EMPTY_TILE)
    }

    /// Set tile `(x, y)` of room `(rx, ry)`
    #[inline]
    pub fn set(&mut self, rx: i32, ry: i32, x: i32, y: i32, tile: i32) {
        if let Some(i) = Self::tile_index(rx, ry, x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Get a tile by map-wide coordinates
    #[inline]
    pub fn get_abs(&self, x: i32, y: i32) -> i32 {
        self.get(0, 0, x, y)
    }

    /// Set a tile by map-wide coordinates
    #[inline]
    pub fn set_abs(&mut self, x: i32, y: i32, tile: i32) {
        self.set(0, 0, x, y, tile);
    }

    /// Get the raw tile data
    #[inline]
    pub fn data(&self) -> &[i32] {
        &self.tiles
    }

    /// Get mutable raw tile data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.tiles
    }
}

impl Default for TileBuffer {
    fn default() -> Self {
        Self::new()
    }
}
