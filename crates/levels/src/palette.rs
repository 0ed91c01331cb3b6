//! Colour lookup tables
//!
//! Pure functions mapping tileset/palette indices and enemy codes to colours.
//! Every function is total: unmapped keys fall back to a fixed default.

use serde::{Deserialize, Serialize};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

/// First global palette slot of each tileset (Space Station .. Ship)
const LEVEL_COL_OFFSETS: [i32; 5] = [0, 32, 40, 46, 52];

/// Flatten `(tileset, tilecol)` into a global palette index
///
/// Tilesets without an entry (Tower, unknown) map to 0.
pub fn level_col(tileset: i32, tilecol: i32) -> i32 {
    usize::try_from(tileset)
        .ok()
        .and_then(|i| LEVEL_COL_OFFSETS.get(i))
        .map(|offset| offset.wrapping_add(tilecol))
        .unwrap_or(0)
}

/// Colour index used for an enemy type
pub fn enemy_col(enemy_type: i32) -> i32 {
    match enemy_type {
        // Red
        3 | 7 | 12 | 23 | 28 | 34 | 42 | 48 | 58 => 6,
        // Green
        5 | 9 | 22 | 25 | 29 | 31 | 38 | 46 | 52 | 53 => 7,
        // Blue
        1 | 6 | 14 | 27 | 33 | 44 | 50 | 57 => 12,
        // Yellow
        4 | 17 | 24 | 30 | 37 | 45 | 51 | 55 => 9,
        // Purple
        2 | 11 | 15 | 19 | 32 | 36 | 49 => 20,
        // Cyan
        8 | 10 | 13 | 18 | 26 | 35 | 41 | 47 | 54 => 11,
        // Pink
        16 | 20 | 39 | 43 | 56 => 8,
        // Orange
        21 | 40 => 17,
        _ => 6,
    }
}

const SPACE_STATION_ONEWAY: [Rgb; 32] = [
    Rgb::new(131, 141, 235),
    Rgb::new(227, 140, 227),
    Rgb::new(242, 126, 151),
    Rgb::new(229, 235, 133),
    Rgb::new(148, 238, 130),
    Rgb::new(140, 165, 227),
    Rgb::new(227, 140, 148),
    Rgb::new(140, 173, 228),
    Rgb::new(142, 235, 137),
    Rgb::new(137, 235, 206),
    Rgb::new(235, 139, 223),
    Rgb::new(238, 130, 138),
    Rgb::new(137, 235, 178),
    Rgb::new(125, 205, 247),
    Rgb::new(190, 137, 235),
    Rgb::new(235, 137, 206),
    Rgb::new(229, 247, 127),
    Rgb::new(127, 200, 247),
    Rgb::new(197, 137, 235),
    Rgb::new(235, 131, 175),
    Rgb::new(242, 210, 123),
    Rgb::new(131, 235, 158),
    Rgb::new(242, 126, 151),
    Rgb::new(219, 243, 123),
    Rgb::new(131, 234, 145),
    Rgb::new(131, 199, 234),
    Rgb::new(141, 131, 234),
    Rgb::new(226, 140, 144),
    Rgb::new(129, 236, 144),
    Rgb::new(235, 231, 131),
    Rgb::new(153, 235, 131),
    Rgb::new(207, 131, 235),
];

const OUTSIDE_ONEWAY: [Rgb; 8] = [
    Rgb::new(57, 86, 140),
    Rgb::new(156, 42, 42),
    Rgb::new(42, 156, 155),
    Rgb::new(125, 36, 162),
    Rgb::new(191, 198, 0),
    Rgb::new(0, 198, 126),
    Rgb::new(224, 110, 177),
    Rgb::new(255, 142, 87),
];

const LAB_ONEWAY: [Rgb; 7] = [
    Rgb::new(0, 165, 206),
    Rgb::new(206, 5, 0),
    Rgb::new(222, 0, 173),
    Rgb::new(27, 67, 255),
    Rgb::new(194, 206, 0),
    Rgb::new(0, 206, 39),
    Rgb::new(0, 165, 206),
];

const WARP_ZONE_ONEWAY: [Rgb; 7] = [
    Rgb::new(113, 178, 197),
    Rgb::new(197, 113, 119),
    Rgb::new(196, 113, 197),
    Rgb::new(149, 113, 197),
    Rgb::new(197, 182, 113),
    Rgb::new(141, 197, 113),
    Rgb::new(109, 109, 109),
];

const SHIP_ONEWAY: [Rgb; 6] = [
    Rgb::new(0, 206, 39),
    Rgb::new(0, 165, 206),
    Rgb::new(194, 206, 0),
    Rgb::new(206, 0, 160),
    Rgb::new(27, 67, 255),
    Rgb::new(206, 5, 0),
];

/// Space Station colour -1 (the grey "no colour" slot)
const SPACE_STATION_GREY: Rgb = Rgb::new(109, 109, 109);

fn lookup<T: Copy>(table: &[T], index: i32) -> Option<T> {
    usize::try_from(index).ok().and_then(|i| table.get(i).copied())
}

/// Colour of one-way platform tiles for a room's `(tileset, tilecol)`
///
/// Unmapped combinations are drawn white.
pub fn oneway_col(tileset: i32, tilecol: i32) -> Rgb {
    let colour = match tileset {
        0 if tilecol == -1 => Some(SPACE_STATION_GREY),
        0 => lookup(&SPACE_STATION_ONEWAY, tilecol),
        1 => lookup(&OUTSIDE_ONEWAY, tilecol),
        2 => lookup(&LAB_ONEWAY, tilecol),
        3 => lookup(&WARP_ZONE_ONEWAY, tilecol),
        4 => lookup(&SHIP_ONEWAY, tilecol),
        _ => None,
    };

    colour.unwrap_or(Rgb::WHITE)
}

const SPACE_STATION_WARP_BG: [i32; 32] = [
    3, 2, 1, 4, 5, 3, 1, 0, 5, 0, 2, 1, 5, 0, 3, 2, 4, 0, 3, 1, 4, 5, 1, 4, 5, 0, 3, 1, 5, 4, 5, 2,
];
const OUTSIDE_WARP_BG: [i32; 8] = [3, 1, 0, 2, 4, 5, 2, 4];
const LAB_WARP_BG: [i32; 7] = [0, 1, 2, 3, 4, 5, 6];
const WARP_ZONE_WARP_BG: [i32; 7] = [0, 1, 2, 3, 4, 5, 6];
const SHIP_WARP_BG: [i32; 7] = [5, 0, 4, 2, 3, 1, 6];

/// Fallback warp background
const DEFAULT_WARP_BG: i32 = 6;

/// Warp background index for a room's `(tileset, tilecol)`
pub fn warp_background(tileset: i32, tilecol: i32) -> i32 {
    let background = match tileset {
        0 => lookup(&SPACE_STATION_WARP_BG, tilecol),
        1 => lookup(&OUTSIDE_WARP_BG, tilecol),
        2 => lookup(&LAB_WARP_BG, tilecol),
        3 => lookup(&WARP_ZONE_WARP_BG, tilecol),
        4 => lookup(&SHIP_WARP_BG, tilecol),
        _ => None,
    };

    background.unwrap_or(DEFAULT_WARP_BG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_col() {
        assert_eq!(level_col(0, 5), 5);
        assert_eq!(level_col(1, 3), 35);
        assert_eq!(level_col(2, 0), 40);
        assert_eq!(level_col(3, 2), 48);
        assert_eq!(level_col(4, 1), 53);
        assert_eq!(level_col(5, 1), 0);
        assert_eq!(level_col(-1, 1), 0);
    }

    #[test]
    fn test_level_col_extreme_tilecol() {
        assert_eq!(level_col(1, i32::MAX), i32::MIN + 31);
        assert_eq!(level_col(0, i32::MIN), i32::MIN);
    }

    #[test]
    fn test_enemy_col() {
        assert_eq!(enemy_col(3), 6);
        assert_eq!(enemy_col(9), 7);
        assert_eq!(enemy_col(1), 12);
        assert_eq!(enemy_col(4), 9);
        assert_eq!(enemy_col(2), 20);
        assert_eq!(enemy_col(13), 11);
        assert_eq!(enemy_col(16), 8);
        assert_eq!(enemy_col(40), 17);
        assert_eq!(enemy_col(0), 6);
        assert_eq!(enemy_col(999), 6);
    }

    #[test]
    fn test_oneway_col() {
        assert_eq!(oneway_col(0, 0), Rgb::new(131, 141, 235));
        assert_eq!(oneway_col(0, -1), Rgb::new(109, 109, 109));
        assert_eq!(oneway_col(1, 7), Rgb::new(255, 142, 87));
        assert_eq!(oneway_col(4, 5), Rgb::new(206, 5, 0));
        assert_eq!(oneway_col(4, 6), Rgb::WHITE);
        assert_eq!(oneway_col(5, 0), Rgb::WHITE);
        assert_eq!(oneway_col(0, 32), Rgb::WHITE);
    }

    #[test]
    fn test_warp_background() {
        assert_eq!(warp_background(0, 0), 3);
        assert_eq!(warp_background(0, 31), 2);
        assert_eq!(warp_background(1, 2), 0);
        assert_eq!(warp_background(4, 0), 5);
        assert_eq!(warp_background(4, 6), 6);
        assert_eq!(warp_background(5, 0), 6);
        assert_eq!(warp_background(0, -3), 6);
    }
}
