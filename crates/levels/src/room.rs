//! Per-room properties
//!
//! Every cell of the fixed room grid carries one [`RoomProperty`], whether or
//! not it lies inside the level's active `mapwidth x mapheight` area.

use serde::{Deserialize, Serialize};
use vvlevel_core::{SCREEN_HEIGHT_PIXELS, SCREEN_WIDTH_PIXELS};

/// Default platform speed
pub const DEFAULT_PLATV: i32 = 4;

/// Visual and behavioural attributes of one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomProperty {
    /// Tileset (0-5, see [`vvlevel_core::Tileset`])
    pub tileset: i32,

    /// Palette index, valid range depends on the tileset
    pub tilecol: i32,

    /// Room name shown in game
    pub roomname: String,

    /// Warp direction (0 none, 1 horizontal, 2 vertical, 3 both)
    pub warpdir: i32,

    /// Moving platform bounds, pixels
    pub platx1: i32,
    pub platy1: i32,
    pub platx2: i32,
    pub platy2: i32,

    /// Moving platform speed
    pub platv: i32,

    /// Enemy bounds, pixels
    pub enemyx1: i32,
    pub enemyy1: i32,
    pub enemyx2: i32,
    pub enemyy2: i32,

    /// Enemy sprite type
    pub enemytype: i32,

    /// Direct tile placement mode flag
    pub directmode: i32,
}

impl Default for RoomProperty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RoomProperty {
    /// Room with every field at its format default
    pub const DEFAULT: RoomProperty = RoomProperty {
        tileset: 0,
        tilecol: 0,
        roomname: String::new(),
        warpdir: 0,
        platx1: 0,
        platy1: 0,
        platx2: SCREEN_WIDTH_PIXELS,
        platy2: SCREEN_HEIGHT_PIXELS,
        platv: DEFAULT_PLATV,
        enemyx1: 0,
        enemyy1: 0,
        enemyx2: SCREEN_WIDTH_PIXELS,
        enemyy2: SCREEN_HEIGHT_PIXELS,
        enemytype: 0,
        directmode: 0,
    };

    /// Stand-in returned for rooms outside the grid
    ///
    /// Spelled out in full: a `String` field rules out `..DEFAULT` in a const.
    pub const PLACEHOLDER: RoomProperty = RoomProperty {
        tileset: 1,
        tilecol: 0,
        roomname: String::new(),
        warpdir: 0,
        platx1: 0,
        platy1: 0,
        platx2: SCREEN_WIDTH_PIXELS,
        platy2: SCREEN_HEIGHT_PIXELS,
        platv: DEFAULT_PLATV,
        enemyx1: 0,
        enemyy1: 0,
        enemyx2: SCREEN_WIDTH_PIXELS,
        enemyy2: SCREEN_HEIGHT_PIXELS,
        enemytype: 0,
        directmode: 1,
    };

    /// Default room for grid cell `(rx, ry)`
    ///
    /// Grid defaults vary the palette by position so a new level is not a
    /// single colour.
    pub fn for_cell(rx: i32, ry: i32) -> Self {
        Self {
            tilecol: (rx + ry).rem_euclid(32),
            ..Self::DEFAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let room = RoomProperty::default();
        assert_eq!(room.platv, 4);
        assert_eq!((room.platx2, room.platy2), (320, 240));
        assert_eq!((room.enemyx2, room.enemyy2), (320, 240));
        assert!(room.roomname.is_empty());
    }

    #[test]
    fn test_for_cell_tilecol() {
        assert_eq!(RoomProperty::for_cell(0, 0).tilecol, 0);
        assert_eq!(RoomProperty::for_cell(3, 4).tilecol, 7);
        assert_eq!(RoomProperty::for_cell(19, 19).tilecol, 6);
    }

    #[test]
    fn test_placeholder() {
        let room = RoomProperty::PLACEHOLDER;
        assert_eq!(room.tileset, 1);
        assert_eq!(room.directmode, 1);
        assert!(room.roomname.is_empty());

        let default = RoomProperty::default();
        assert_eq!(
            RoomProperty {
                tileset: 0,
                directmode: 0,
                ..room
            },
            default
        );
    }
}
