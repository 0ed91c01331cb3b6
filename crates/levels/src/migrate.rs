//! Legacy `platv` layout migration
//!
//! Older saves stored room `platv` values in a table packed by the *active*
//! map width: room `(x, y)` lived at slot `x + y*mapwidth` instead of its
//! grid index `x + y*MAX_WIDTH`. The file format never moved on, so every
//! load of a narrower map unscrambles and every save rescrambles.
//!
//! At full width both layouts coincide and nothing is touched.

use crate::room::{RoomProperty, DEFAULT_PLATV};
use vvlevel_core::{MAX_HEIGHT, MAX_WIDTH, NUM_ROOMS};

/// Whether a map of this width uses the packed `platv` table
pub fn needs_remap(mapwidth: i32) -> bool {
    mapwidth < MAX_WIDTH
}

/// Convert packed `platv` values (as loaded) to grid order
///
/// # Arguments
/// * `rooms` - The full room grid, freshly read from a file
/// * `mapwidth` - Active map width the file was saved with
pub fn unscramble_platv(rooms: &mut [RoomProperty], mapwidth: i32) {
    if !needs_remap(mapwidth) {
        return;
    }

    let old: Vec<i32> = rooms.iter().map(|room| room.platv).collect();

    for y in 0..MAX_HEIGHT {
        for x in 0..MAX_WIDTH {
            let packed = (x + y * mapwidth) as usize;
            let platv = if x < mapwidth {
                old.get(packed).copied().unwrap_or(DEFAULT_PLATV)
            } else {
                DEFAULT_PLATV
            };

            if let Some(room) = rooms.get_mut((x + y * MAX_WIDTH) as usize) {
                room.platv = platv;
            }
        }
    }
}

/// Build the `platv` table to write for each grid slot
///
/// Below full width, active room `(x, y)` goes to slot `x + y*mapwidth` and
/// every other slot holds the default. At full width this is each room's own
/// value.
pub fn rescramble_platv(rooms: &[RoomProperty], mapwidth: i32) -> Vec<i32> {
    if !needs_remap(mapwidth) {
        return rooms.iter().map(|room| room.platv).collect();
    }

    let mut table = vec![DEFAULT_PLATV; NUM_ROOMS];
    for y in 0..MAX_HEIGHT {
        for x in 0..mapwidth.min(MAX_WIDTH) {
            let packed = (x + y * mapwidth) as usize;
            let grid = (x + y * MAX_WIDTH) as usize;
            if let (Some(slot), Some(room)) = (table.get_mut(packed), rooms.get(grid)) {
                *slot = room.platv;
            }
        }
    }
    table
}
