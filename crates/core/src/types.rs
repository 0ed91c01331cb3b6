//! Core type definitions

use serde::{Deserialize, Serialize};

/// Room grid capacity, in rooms
pub const MAX_WIDTH: i32 = 20;
pub const MAX_HEIGHT: i32 = 20;

/// Number of room slots in the fixed grid
pub const NUM_ROOMS: usize = (MAX_WIDTH * MAX_HEIGHT) as usize;

/// Size of one room, in tiles
pub const SCREEN_WIDTH_TILES: i32 = 40;
pub const SCREEN_HEIGHT_TILES: i32 = 30;

/// Size of one room, in pixels
pub const SCREEN_WIDTH_PIXELS: i32 = 320;
pub const SCREEN_HEIGHT_PIXELS: i32 = 240;

/// Pixels per tile edge
pub const TILE_SIZE: i32 = 8;

/// Current level format revision.
///
/// Revision 2 is the comma-separated `contents` format. Anything below it is
/// treated as the pre-fix legacy layout.
pub const LEVEL_VERSION: i32 = 2;

/// Game-space room coordinates start at 100 for custom levels
pub const GAME_ROOM_ORIGIN: i32 = 100;

/// Visual theme of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tileset {
    SpaceStation = 0,
    Outside = 1,
    Lab = 2,
    WarpZone = 3,
    Ship = 4,
    Tower = 5,
}

impl Tileset {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::SpaceStation),
            1 => Some(Self::Outside),
            2 => Some(Self::Lab),
            3 => Some(Self::WarpZone),
            4 => Some(Self::Ship),
            5 => Some(Self::Tower),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpaceStation => "Space Station",
            Self::Outside => "Outside",
            Self::Lab => "Lab",
            Self::WarpZone => "Warp Zone",
            Self::Ship => "Ship",
            Self::Tower => "Tower",
        }
    }
}
