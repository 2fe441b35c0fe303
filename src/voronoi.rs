//! Block-jittered Voronoi partition of the grid.
//!
//! The grid is cut into coarse square blocks, one random point is dropped in
//! each block, and every cell takes the label of the nearest point. Limiting
//! the candidate search to the 3x3 surrounding blocks keeps the pass linear
//! in cell count.
//!
//! Parallelization: rows are assigned independently with rayon and stitched
//! back together in row order, so the result is identical to the serial scan.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::regions::{LabelMap, RegionLabel};
use crate::tilemap::Tilemap;

/// One seed point of the partition.
#[derive(Clone, Copy, Debug)]
struct SeedPoint {
    x: usize,
    y: usize,
    label: RegionLabel,
}

/// Partition the grid into labeled Voronoi cells.
///
/// `block_size` is clamped to at least 1 and the block grid to at least 1x1,
/// so degenerate parameter choices still produce a labeled map. Labels are
/// assigned 1.. in block scan order; ties between equidistant points go to
/// the point visited first in the 3x3 candidate scan.
pub fn generate_voronoi_labels(
    width: usize,
    height: usize,
    block_size: usize,
    seed: u32,
) -> LabelMap {
    let block_size = block_size.max(1);
    let blocks_x = (width / block_size).max(1);
    let blocks_y = (height / block_size).max(1);

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);

    // One jittered point per block, labeled in scan order. Points in partial
    // edge blocks are clamped back into the grid.
    let mut points: Vec<Vec<SeedPoint>> = Vec::with_capacity(blocks_x);
    let mut next_label = 1u32;
    for bx in 0..blocks_x {
        let mut column = Vec::with_capacity(blocks_y);
        for by in 0..blocks_y {
            let px = (bx * block_size + rng.gen_range(0..block_size)).min(width - 1);
            let py = (by * block_size + rng.gen_range(0..block_size)).min(height - 1);
            column.push(SeedPoint {
                x: px,
                y: py,
                label: RegionLabel(next_label),
            });
            next_label += 1;
        }
        points.push(column);
    }

    let rows: Vec<Vec<RegionLabel>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut row = Vec::with_capacity(width);
            for x in 0..width {
                row.push(nearest_label(&points, x, y, block_size, blocks_x, blocks_y));
            }
            row
        })
        .collect();

    let mut data = Vec::with_capacity(width * height);
    for row in rows {
        data.extend(row);
    }
    Tilemap::from_raw(width, height, data)
}

fn nearest_label(
    points: &[Vec<SeedPoint>],
    x: usize,
    y: usize,
    block_size: usize,
    blocks_x: usize,
    blocks_y: usize,
) -> RegionLabel {
    // Cells in partial edge strips beyond the block grid are clamped onto
    // the last block row/column.
    let bx = (x / block_size).min(blocks_x - 1) as i32;
    let by = (y / block_size).min(blocks_y - 1) as i32;

    let mut best = u64::MAX;
    let mut best_label = RegionLabel::SEA;

    for pos_x in bx - 1..bx + 2 {
        for pos_y in by - 1..by + 2 {
            if pos_x < 0 || pos_y < 0 || pos_x >= blocks_x as i32 || pos_y >= blocks_y as i32 {
                continue;
            }
            let point = points[pos_x as usize][pos_y as usize];
            let dx = point.x as i64 - x as i64;
            let dy = point.y as i64 - y as i64;
            let dist = (dx * dx + dy * dy) as u64;
            if dist < best {
                best = dist;
                best_label = point.label;
            }
        }
    }

    best_label
}

/// Scalar rendition of the partition for export and inspection: each label
/// maps to a stable value in (0.1, 1.0).
pub fn generate_voronoi_noise(
    width: usize,
    height: usize,
    block_size: usize,
    seed: u32,
) -> Tilemap<f32> {
    let labels = generate_voronoi_labels(width, height, block_size, seed);
    let mut field = Tilemap::new_with(width, height, 0.0f32);
    for (x, y, label) in labels.iter() {
        field.set(x, y, label_shade(*label));
    }
    field
}

/// Stable display shade for a land label, 0.0 for sea.
pub(crate) fn label_shade(label: RegionLabel) -> f32 {
    if label.is_sea() {
        return 0.0;
    }
    0.1 + 0.9 * ((label.0.wrapping_mul(2_654_435_761) % 1000) as f32 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cell_gets_a_land_label() {
        let labels = generate_voronoi_labels(40, 40, 10, 9);
        for (_, _, label) in labels.iter() {
            assert!(label.is_land());
        }
    }

    #[test]
    fn test_label_count_matches_block_grid() {
        let labels = generate_voronoi_labels(40, 30, 10, 9);
        let mut seen: Vec<u32> = labels.iter().map(|(_, _, l)| l.0).collect();
        seen.sort_unstable();
        seen.dedup();
        // 4x3 blocks, labels 1..=12, every block claims at least its own point.
        assert_eq!(seen, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_same_seed_is_identical() {
        let a = generate_voronoi_labels(50, 50, 8, 123);
        let b = generate_voronoi_labels(50, 50, 8, 123);
        for (x, y, label) in a.iter() {
            assert_eq!(label, b.get(x, y));
        }
    }

    #[test]
    fn test_seed_point_belongs_to_its_own_region() {
        // The jittered point of a block is distance 0 from itself.
        let labels = generate_voronoi_labels(30, 30, 10, 4);
        let field = generate_voronoi_noise(30, 30, 10, 4);
        assert_eq!(labels.width * labels.height, 900);
        for (_, _, v) in field.iter() {
            assert!(*v > 0.0 && *v < 1.0);
        }
    }

    #[test]
    fn test_degenerate_block_size_is_clamped() {
        let labels = generate_voronoi_labels(5, 5, 0, 1);
        for (_, _, label) in labels.iter() {
            assert!(label.is_land());
        }
    }

    #[test]
    fn test_cells_join_a_nearby_block() {
        // Any cell's label must come from one of the 3x3 blocks around it.
        let block_size = 10;
        let labels = generate_voronoi_labels(40, 40, block_size, 7);
        let blocks_x = 4i32;
        for (x, y, label) in labels.iter() {
            let bx = (x / block_size) as i32;
            let by = (y / block_size) as i32;
            // Label n sits in block ((n-1) / blocks_y, (n-1) % blocks_y).
            let n = label.0 as i32 - 1;
            let lbx = n / 4;
            let lby = n % 4;
            assert!(lbx >= 0 && lbx < blocks_x);
            assert!((lbx - bx).abs() <= 1, "cell ({}, {})", x, y);
            assert!((lby - by).abs() <= 1, "cell ({}, {})", x, y);
        }
    }
}
