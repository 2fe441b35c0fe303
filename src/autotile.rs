//! Coastline tile classification.
//!
//! Maps every cell of a finished biome grid to a tile shape and rotation so
//! a renderer can lay border sprites along the coast. Thirteen canonical 3x3
//! land patterns cover every coastline configuration once corner noise is
//! cleaned; all other orientations are reached by rotating the neighborhood.

use crate::biomes::BiomeColor;
use crate::tilemap::Tilemap;

/// The canonical 3x3 land patterns, index 0 being fully surrounded land.
/// Patterns are probed in order and under four clockwise rotations of the
/// neighborhood.
const COMPOSITIONS: [[[bool; 3]; 3]; 13] = [
    // All sides filled.
    [
        [true, true, true],
        [true, true, true],
        [true, true, true],
    ],
    // One corner missing.
    [
        [true, true, true],
        [true, true, true],
        [true, true, false],
    ],
    // Two close corners missing.
    [
        [true, true, true],
        [true, true, true],
        [false, true, false],
    ],
    // Two far corners missing.
    [
        [false, true, true],
        [true, true, true],
        [true, true, false],
    ],
    // Three corners missing.
    [
        [false, true, true],
        [true, true, true],
        [false, true, false],
    ],
    // One edge missing.
    [
        [false, true, true],
        [false, true, true],
        [false, true, true],
    ],
    // Two close edges missing.
    [
        [true, true, false],
        [true, true, false],
        [false, false, false],
    ],
    // Two far edges missing.
    [
        [false, true, false],
        [false, true, false],
        [false, true, false],
    ],
    // Three edges missing.
    [
        [false, false, false],
        [true, true, false],
        [false, false, false],
    ],
    // One corner and one edge missing, clockwise.
    [
        [false, true, true],
        [false, true, true],
        [false, true, false],
    ],
    // One corner and one edge missing, counter-clockwise.
    [
        [false, true, false],
        [false, true, true],
        [false, true, true],
    ],
    // Two corners and the opposite edge missing.
    [
        [false, true, false],
        [true, true, false],
        [false, true, false],
    ],
    // Two edges and the opposite corner missing.
    [
        [false, false, false],
        [false, true, true],
        [false, true, false],
    ],
];

/// Tile selected for one cell. Partial land tiles are drawn over a sea tile,
/// so `Land` with a non-zero pattern implies a sea backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileChoice {
    Sea,
    Land { pattern: usize, rotation: u8 },
}

/// Land/sea neighborhood around a cell, mirrored so that index `[0][1]` is
/// the neighbor on the +x side. Out-of-bounds counts as sea.
fn neighborhood(map: &Tilemap<BiomeColor>, x: usize, y: usize) -> [[bool; 3]; 3] {
    let mut around = [[false; 3]; 3];
    for dx in -1i32..2 {
        for dy in -1i32..2 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            let land = map.in_bounds(nx, ny) && !map.get(nx as usize, ny as usize).is_sea();
            around[(1 - dx) as usize][(1 - dy) as usize] = land;
        }
    }
    around
}

/// Drop corner land that has no adjacent edge land on either side of it.
/// Lone corners have no tile shape of their own and would otherwise defeat
/// every pattern.
fn clean_corners(around: &mut [[bool; 3]; 3]) {
    if !around[0][1] {
        around[0][0] = false;
        around[0][2] = false;
    }
    if !around[1][0] {
        around[0][0] = false;
        around[2][0] = false;
    }
    if !around[2][1] {
        around[2][0] = false;
        around[2][2] = false;
    }
    if !around[1][2] {
        around[0][2] = false;
        around[2][2] = false;
    }
}

/// Clockwise quarter turn of the 3x3 neighborhood.
fn rotate_cw(matrix: [[bool; 3]; 3]) -> [[bool; 3]; 3] {
    let mut rotated = [[false; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            rotated[i][j] = matrix[2 - j][i];
        }
    }
    rotated
}

/// Match a cleaned neighborhood against the pattern table.
///
/// The fully-filled pattern is tried without rotation; the rest are probed
/// at each of the four rotations, comparing before rotating so rotation 0
/// means the neighborhood as captured.
fn classify(around: [[bool; 3]; 3]) -> Option<(usize, u8)> {
    if around == COMPOSITIONS[0] {
        return Some((0, 0));
    }
    for (i, composition) in COMPOSITIONS.iter().enumerate().skip(1) {
        let mut probe = around;
        for rotation in 0u8..4 {
            if probe == *composition {
                return Some((i, rotation));
            }
            probe = rotate_cw(probe);
        }
    }
    None
}

/// Classify every cell of a biome grid.
///
/// Coastline configurations the pattern table cannot express fall back to
/// the full land tile rather than leaving a hole.
pub fn classify_map(map: &Tilemap<BiomeColor>) -> Tilemap<TileChoice> {
    let mut tiles = Tilemap::new_with(map.width, map.height, TileChoice::Sea);

    for (x, y, color) in map.iter() {
        if color.is_sea() {
            continue;
        }
        let mut around = neighborhood(map, x, y);
        clean_corners(&mut around);
        let choice = match classify(around) {
            Some((pattern, rotation)) => TileChoice::Land { pattern, rotation },
            None => TileChoice::Land { pattern: 0, rotation: 0 },
        };
        tiles.set(x, y, choice);
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAND: BiomeColor = BiomeColor([10, 200, 10, 255]);

    fn island_3x3() -> Tilemap<BiomeColor> {
        let mut map = Tilemap::new_with(3, 3, BiomeColor::SEA);
        for y in 0..3 {
            for x in 0..3 {
                map.set(x, y, LAND);
            }
        }
        map
    }

    #[test]
    fn test_rotate_cw_maps_cells_as_a_quarter_turn() {
        let mut m = [[false; 3]; 3];
        m[1][2] = true;
        let r = rotate_cw(m);
        // r[i][j] takes its value from m[2-j][i].
        assert!(r[2][1]);
        assert!(!r[1][2]);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let mut m = [[false; 3]; 3];
        m[0][0] = true;
        m[1][2] = true;
        let r = rotate_cw(rotate_cw(rotate_cw(rotate_cw(m))));
        assert_eq!(r, m);
    }

    #[test]
    fn test_clean_corners_drops_lone_corner() {
        let mut m = COMPOSITIONS[0];
        m[0][1] = false; // edge gone, both corners on that side must follow
        clean_corners(&mut m);
        assert!(!m[0][0]);
        assert!(!m[0][2]);
    }

    #[test]
    fn test_interior_cell_is_full_tile() {
        let map = Tilemap::new_with(5, 5, LAND);
        let tiles = classify_map(&map);
        assert_eq!(
            *tiles.get(2, 2),
            TileChoice::Land { pattern: 0, rotation: 0 }
        );
    }

    #[test]
    fn test_sea_cell_is_sea_tile() {
        let map = Tilemap::new_with(3, 3, BiomeColor::SEA);
        let tiles = classify_map(&map);
        assert_eq!(*tiles.get(1, 1), TileChoice::Sea);
    }

    #[test]
    fn test_center_of_small_island_matches_a_pattern() {
        // 3x3 island in a sea of out-of-bounds: the center cell sees all
        // eight neighbors as land and is the full tile; an edge cell sees a
        // missing edge and must match one of the partial patterns.
        let map = island_3x3();
        let tiles = classify_map(&map);
        assert_eq!(
            *tiles.get(1, 1),
            TileChoice::Land { pattern: 0, rotation: 0 }
        );
        match *tiles.get(1, 0) {
            TileChoice::Land { pattern, .. } => assert!(pattern > 0),
            TileChoice::Sea => panic!("edge cell classified as sea"),
        }
    }

    #[test]
    fn test_every_land_cell_gets_a_tile() {
        let map = island_3x3();
        let tiles = classify_map(&map);
        for (x, y, choice) in tiles.iter() {
            if !map.get(x, y).is_sea() {
                assert!(matches!(choice, TileChoice::Land { .. }));
            }
        }
    }
}
