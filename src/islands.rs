//! Connectivity analysis over the thresholded land/sea grid.
//!
//! Finds connected landmasses, keeps only the largest one, and reports
//! whether it is big enough for the generation pass to be accepted.

use crate::tilemap::{Tilemap, DIRECTIONS};

/// Minimum fraction of the map (in percent) the retained landmass must cover
/// for a generation pass to count as valid.
pub const MIN_COVERAGE_PERCENT: f32 = 30.0;

/// Extract all 4-connected components of nonzero cells.
///
/// Uses an explicit stack (iterative DFS) so large maps cannot overflow the
/// call stack. Components are discovered in row-major scan order and each
/// component lists its cells in visit order.
pub fn extract_components(map: &Tilemap<f32>) -> Vec<Vec<(usize, usize)>> {
    let width = map.width;
    let height = map.height;

    let mut used = Tilemap::new_with(width, height, false);
    let mut components = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if *used.get(x, y) || *map.get(x, y) == 0.0 {
                continue;
            }

            let mut stack = vec![(x, y)];
            let mut component = Vec::new();
            used.set(x, y, true);

            while let Some((cx, cy)) = stack.pop() {
                component.push((cx, cy));

                for (dx, dy) in DIRECTIONS {
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if !map.in_bounds(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if *used.get(nx, ny) || *map.get(nx, ny) == 0.0 {
                        continue;
                    }
                    used.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }

            components.push(component);
        }
    }

    components
}

/// Zero out every landmass except the largest and return the coverage of the
/// survivor as a percentage of the whole grid. A grid with no land at all
/// reports 0.0 coverage.
pub fn keep_largest(map: &mut Tilemap<f32>) -> f32 {
    let mut components = extract_components(map);
    if components.is_empty() {
        return 0.0;
    }

    components.sort_by(|a, b| b.len().cmp(&a.len()));

    for smaller in components.iter().skip(1) {
        for &(x, y) in smaller {
            map.set(x, y, 0.0);
        }
    }

    components[0].len() as f32 / (map.width * map.height) as f32 * 100.0
}
