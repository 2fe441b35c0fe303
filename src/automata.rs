//! Cellular-automaton smoothing for thresholded noise grids.

use crate::tilemap::Tilemap;

/// Default neighbor-vote threshold: more than this many "wall" votes among
/// the cell and its 8 neighbors turns the cell to sea.
pub const DEFAULT_NEIGHBOUR_LIMIT: u32 = 4;

/// Majority-filter smoothing pass, the classic cave-edge automaton.
///
/// Each iteration works on a snapshot of the previous state (synchronous
/// update): for every cell, count how many of the 9 cells in its 3x3
/// neighborhood fall below `noise_limit`, with out-of-bounds cells counting
/// as walls. More than `DEFAULT_NEIGHBOUR_LIMIT` walls forces the cell to
/// 0.0, otherwise it becomes 1.0.
pub fn apply_cellular_automata(map: &mut Tilemap<f32>, iterations: u32, noise_limit: f32) {
    apply_cellular_automata_with_limit(map, iterations, noise_limit, DEFAULT_NEIGHBOUR_LIMIT);
}

/// Smoothing pass with an explicit wall-vote threshold.
pub fn apply_cellular_automata_with_limit(
    map: &mut Tilemap<f32>,
    iterations: u32,
    noise_limit: f32,
    neighbour_limit: u32,
) {
    let width = map.width;
    let height = map.height;

    for _ in 0..iterations {
        let snapshot = map.clone();

        for y in 0..height {
            for x in 0..width {
                let mut walls = 0u32;

                for j in y as i32 - 1..y as i32 + 2 {
                    for i in x as i32 - 1..x as i32 + 2 {
                        if snapshot.in_bounds(i, j) {
                            if *snapshot.get(i as usize, j as usize) < noise_limit {
                                walls += 1;
                            }
                        } else {
                            walls += 1;
                        }
                    }
                }

                map.set(x, y, if walls > neighbour_limit { 0.0 } else { 1.0 });
            }
        }
    }
}
