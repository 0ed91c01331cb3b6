//! Level document model
//!
//! [`CustomLevel`] is the in-memory form of one level file: dimensions,
//! metadata, the fixed room grid, the tile buffer, the entity list and the
//! scripts. It is populated wholesale by the loader and serialized wholesale
//! by the saver; in between, the accessors below serve the rest of the game.

use crate::palette::{self, Rgb};
use crate::room::RoomProperty;
use crate::script::ScriptGroup;
use crate::tiles::TileBuffer;
use serde::{Deserialize, Serialize};
use vvlevel_core::{
    GAME_ROOM_ORIGIN, LEVEL_VERSION, MAX_HEIGHT, MAX_WIDTH, NUM_ROOMS, SCREEN_HEIGHT_TILES,
    SCREEN_WIDTH_TILES, TILE_SIZE,
};

/// Entity type codes the accessors care about
pub mod entity_type {
    pub const TRINKET: i32 = 9;
    pub const WARP_TOKEN: i32 = 13;
    pub const CREWMATE: i32 = 15;
    pub const START_POINT: i32 = 16;
}

/// Default map size of a fresh level, in rooms
pub const DEFAULT_MAP_SIZE: i32 = 5;

/// Placeholder handed out for rooms outside the grid
static PLACEHOLDER_ROOM: RoomProperty = RoomProperty::PLACEHOLDER;

/// A placed object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEntity {
    /// X position (map-wide tiles)
    pub x: i32,

    /// Y position (map-wide tiles)
    pub y: i32,

    /// Type code
    pub t: i32,

    /// Generic parameters, meaning depends on `t`
    pub p1: i32,
    pub p2: i32,
    pub p3: i32,
    pub p4: i32,
    pub p5: i32,
    pub p6: i32,

    /// Associated script name (terminals, script boxes)
    pub scriptname: String,
}

impl CustomEntity {
    /// Create an entity with all parameters zero
    pub fn new(x: i32, y: i32, t: i32) -> Self {
        Self {
            x,
            y,
            t,
            ..Self::default()
        }
    }
}

/// Player spawn derived from the level's start point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPoint {
    /// Pixel position inside the room
    pub x: i32,
    pub y: i32,

    /// Game-space room coordinates (origin 100)
    pub rx: i32,
    pub ry: i32,

    /// Gravity control (0 = floor)
    pub gravity: i32,

    /// Facing direction (1 = right)
    pub dir: i32,
}

/// A single custom level
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLevel {
    /// Format revision
    pub version: i32,

    /// Active map size in rooms
    pub mapwidth: i32,
    pub mapheight: i32,

    pub title: String,
    pub creator: String,

    /// Last modifier, written as `Modified`
    pub modifier: String,

    pub desc1: String,
    pub desc2: String,
    pub desc3: String,
    pub website: String,

    /// Music track index
    pub levmusic: i32,

    /// Use the one-way tile colour table even for custom tilesets
    pub onewaycol_override: bool,

    /// Fixed room grid, `MAX_WIDTH x MAX_HEIGHT`, row-major
    rooms: Vec<RoomProperty>,

    /// Tile content
    pub tiles: TileBuffer,

    /// Placed entities in insertion order
    pub entities: Vec<CustomEntity>,

    /// Named scripts
    pub scripts: ScriptGroup,
}

impl CustomLevel {
    /// Create a blank 5x5 level
    pub fn new() -> Self {
        let mut level = Self {
            version: LEVEL_VERSION,
            mapwidth: DEFAULT_MAP_SIZE,
            mapheight: DEFAULT_MAP_SIZE,
            title: String::new(),
            creator: String::new(),
            modifier: String::new(),
            desc1: String::new(),
            desc2: String::new(),
            desc3: String::new(),
            website: String::new(),
            levmusic: 0,
            onewaycol_override: false,
            rooms: Vec::with_capacity(NUM_ROOMS),
            tiles: TileBuffer::new(),
            entities: Vec::new(),
            scripts: ScriptGroup::new(),
        };
        level.reset();
        level
    }

    /// Reset to a blank 5x5 level
    ///
    /// # Purpose
    /// Brings every field back to its default: metadata, room grid (with
    /// position-derived palettes), tiles, entities and scripts.
    pub fn reset(&mut self) {
        self.version = LEVEL_VERSION;
        self.mapwidth = DEFAULT_MAP_SIZE;
        self.mapheight = DEFAULT_MAP_SIZE;
        self.title = "Untitled Level".into();
        self.creator = "Unknown".into();
        self.modifier.clear();
        self.desc1.clear();
        self.desc2.clear();
        self.desc3.clear();
        self.website.clear();
        self.levmusic = 0;
        self.onewaycol_override = false;

        self.rooms.clear();
        for ry in 0..MAX_HEIGHT {
            for rx in 0..MAX_WIDTH {
                self.rooms.push(RoomProperty::for_cell(rx, ry));
            }
        }

        self.tiles.clear();
        self.entities.clear();
        self.scripts.clear();
    }

    /// Index of room `(rx, ry)` in the grid, if it is inside the grid
    pub fn room_index(rx: i32, ry: i32) -> Option<usize> {
        if (0..MAX_WIDTH).contains(&rx) && (0..MAX_HEIGHT).contains(&ry) {
            Some((rx + ry * MAX_WIDTH) as usize)
        } else {
            None
        }
    }

    /// Properties of room `(rx, ry)`
    ///
    /// Rooms outside the grid read as a placeholder (tileset 1, direct mode
    /// on, no name) so callers can probe any coordinate.
    pub fn room(&self, rx: i32, ry: i32) -> &RoomProperty {
        Self::room_index(rx, ry)
            .and_then(|i| self.rooms.get(i))
            .unwrap_or(&PLACEHOLDER_ROOM)
    }

    /// Mutable properties of room `(rx, ry)`, `None` outside the grid
    pub fn room_mut(&mut self, rx: i32, ry: i32) -> Option<&mut RoomProperty> {
        Self::room_index(rx, ry).and_then(move |i| self.rooms.get_mut(i))
    }

    /// Apply `edit` to room `(rx, ry)`; does nothing outside the grid
    pub fn update_room<F: FnOnce(&mut RoomProperty)>(&mut self, rx: i32, ry: i32, edit: F) {
        if let Some(room) = self.room_mut(rx, ry) {
            edit(room);
        }
    }

    /// The whole room grid, row-major
    pub fn rooms(&self) -> &[RoomProperty] {
        &self.rooms
    }

    /// The whole room grid, mutably
    pub fn rooms_mut(&mut self) -> &mut [RoomProperty] {
        &mut self.rooms
    }

    /// Tile `(x, y)` of room `(rx, ry)`, 0 when out of range
    #[inline]
    pub fn get_tile(&self, rx: i32, ry: i32, x: i32, y: i32) -> i32 {
        self.tiles.get(rx, ry, x, y)
    }

    /// Set tile `(x, y)` of room `(rx, ry)`; ignored when out of range
    #[inline]
    pub fn set_tile(&mut self, rx: i32, ry: i32, x: i32, y: i32, tile: i32) {
        self.tiles.set(rx, ry, x, y, tile);
    }

    /// Tile at map-wide coordinates, 0 when out of range
    #[inline]
    pub fn get_abs_tile(&self, x: i32, y: i32) -> i32 {
        self.tiles.get_abs(x, y)
    }

    /// Whether `(x, y)` lies inside the active map, in tiles
    pub fn in_map(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && i64::from(x) < i64::from(self.mapwidth) * i64::from(SCREEN_WIDTH_TILES)
            && i64::from(y) < i64::from(self.mapheight) * i64::from(SCREEN_HEIGHT_TILES)
    }

    /// Whether the tile at map-wide `(x, y)` lets the player through
    ///
    /// Empty tiles, background tiles (2..80) and tiles from 680 up are free.
    /// Coordinates outside the active map are reported free.
    pub fn abs_free(&self, x: i32, y: i32) -> bool {
        if !self.in_map(x, y) {
            return true;
        }

        let tile = self.get_abs_tile(x, y);
        tile == 0 || (2..80).contains(&tile) || tile >= 680
    }

    /// The 40x30 tiles of one room, row-major
    ///
    /// # Arguments
    /// * `rxi`, `ryi` - Game-space room coordinates (origin 100). Values one
    ///   map-width/height outside the active map wrap around once.
    pub fn room_tiles(&self, rxi: i32, ryi: i32) -> Vec<i32> {
        let mut rx = rxi.wrapping_sub(GAME_ROOM_ORIGIN);
        let mut ry = ryi.wrapping_sub(GAME_ROOM_ORIGIN);
        if rx < 0 {
            rx += self.mapwidth;
        }
        if ry < 0 {
            ry += self.mapheight;
        }
        if rx >= self.mapwidth {
            rx -= self.mapwidth;
        }
        if ry >= self.mapheight {
            ry -= self.mapheight;
        }

        let mut result = Vec::with_capacity((SCREEN_WIDTH_TILES * SCREEN_HEIGHT_TILES) as usize);
        for y in 0..SCREEN_HEIGHT_TILES {
            for x in 0..SCREEN_WIDTH_TILES {
                result.push(self.get_tile(rx, ry, x, y));
            }
        }
        result
    }

    /// Global palette index of `(tileset, tilecol)`
    pub fn level_col(tileset: i32, tilecol: i32) -> i32 {
        palette::level_col(tileset, tilecol)
    }

    /// Colour index of an enemy type
    pub fn enemy_col(enemy_type: i32) -> i32 {
        palette::enemy_col(enemy_type)
    }

    /// One-way platform colour of room `(rx, ry)`
    pub fn oneway_col(&self, rx: i32, ry: i32) -> Rgb {
        let room = self.room(rx, ry);
        palette::oneway_col(room.tileset, room.tilecol)
    }

    /// Warp background of room `(rx, ry)`
    pub fn warp_background(&self, rx: i32, ry: i32) -> i32 {
        let room = self.room(rx, ry);
        palette::warp_background(room.tileset, room.tilecol)
    }

    /// Number of `entity_type` entities before `index`
    ///
    /// Returns 0 when `index` is past the end of the list.
    fn ordinal_of(&self, index: usize, entity_type: i32) -> i32 {
        if index >= self.entities.len() {
            return 0;
        }

        self.entities[..index]
            .iter()
            .filter(|e| e.t == entity_type)
            .count() as i32
    }

    /// Trinket number of the entity at `index`
    pub fn find_trinket(&self, index: usize) -> i32 {
        self.ordinal_of(index, entity_type::TRINKET)
    }

    /// Crewmate number of the entity at `index`
    pub fn find_crewmate(&self, index: usize) -> i32 {
        self.ordinal_of(index, entity_type::CREWMATE)
    }

    /// Warp token number of the entity at `index`
    pub fn find_warp_token(&self, index: usize) -> i32 {
        self.ordinal_of(index, entity_type::WARP_TOKEN)
    }

    fn count_in_map(&self, entity_type: i32) -> usize {
        self.entities
            .iter()
            .filter(|e| e.t == entity_type && self.in_map(e.x, e.y))
            .count()
    }

    /// Trinkets placed inside the active map
    pub fn num_trinkets(&self) -> usize {
        self.count_in_map(entity_type::TRINKET)
    }

    /// Crewmates placed inside the active map
    pub fn num_crewmates(&self) -> usize {
        self.count_in_map(entity_type::CREWMATE)
    }

    /// Spawn point from the first start point entity
    ///
    /// Without a start point the player spawns mid-screen in the top-left
    /// room facing right.
    pub fn find_start_point(&self) -> StartPoint {
        let start = self
            .entities
            .iter()
            .find(|e| e.t == entity_type::START_POINT);

        match start {
            Some(entity) => StartPoint {
                x: (entity.x % SCREEN_WIDTH_TILES) * TILE_SIZE - 4,
                y: (entity.y % SCREEN_HEIGHT_TILES) * TILE_SIZE + 1,
                rx: GAME_ROOM_ORIGIN + entity.x / SCREEN_WIDTH_TILES,
                ry: GAME_ROOM_ORIGIN + entity.y / SCREEN_HEIGHT_TILES,
                gravity: 0,
                dir: 1i32.wrapping_sub(entity.p1),
            },
            None => StartPoint {
                x: 160,
                y: 119,
                rx: GAME_ROOM_ORIGIN,
                ry: GAME_ROOM_ORIGIN,
                gravity: 0,
                dir: 1,
            },
        }
    }
}

impl Default for CustomLevel {
    fn default() -> Self {
        Self::new()
    }
}
