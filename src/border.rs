//! Border randomization between regions.
//!
//! Straight relaxed borders look artificial. This pass runs a miniature
//! Voronoi partition at a fine block size over the existing regions: each
//! fine block contributes one land point carrying that point's current
//! region label, and every land cell re-resolves to the nearest point. Run
//! at decreasing block sizes this ripples the borders without moving them
//! far, because interior points overwhelmingly carry their own region's
//! label.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::regions::{centroid_of, LabelMap, RegionLabel, RegionMap};
use crate::seeds;
use crate::tilemap::Tilemap;

/// One pass of border randomization at the given fine block size.
///
/// The PRNG is derived from the map seed so the pass is reproducible. Blocks
/// whose three random probes and fallback scan find no land contribute no
/// point. Land cells with no point in their 3x3 block neighborhood are
/// resolved afterwards by flooding to the nearest resolved land cell; a cell
/// the flood cannot reach keeps its current label.
///
/// The returned map keeps the original region labels; regions that lose all
/// their cells are dropped.
pub fn apply_voronoi_border(
    labels: &mut LabelMap,
    regions: &RegionMap,
    seed: u32,
    block_size: usize,
) -> RegionMap {
    let block_size = block_size.max(1);
    let width = labels.width;
    let height = labels.height;
    let blocks_x = (width / block_size).max(1);
    let blocks_y = (height / block_size).max(1);

    let mut rng = ChaCha8Rng::seed_from_u64(seeds::border_seed(seed) as u64);

    // One land point per fine block where one exists. The point carries the
    // label it sits on before any reassignment.
    let mut points: Vec<Vec<Option<((usize, usize), RegionLabel)>>> =
        vec![vec![None; blocks_y]; blocks_x];
    for bx in 0..blocks_x {
        for by in 0..blocks_y {
            points[bx][by] = pick_land_point(labels, &mut rng, bx, by, block_size);
        }
    }

    let snapshot = labels.clone();
    let mut resolved = Tilemap::new_with(width, height, false);
    let mut deferred = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if snapshot.get(x, y).is_sea() {
                continue;
            }

            let bx = (x / block_size).min(blocks_x - 1) as i32;
            let by = (y / block_size).min(blocks_y - 1) as i32;

            let mut best = u64::MAX;
            let mut best_label = None;
            for pos_x in bx - 1..bx + 2 {
                for pos_y in by - 1..by + 2 {
                    if pos_x < 0
                        || pos_y < 0
                        || pos_x >= blocks_x as i32
                        || pos_y >= blocks_y as i32
                    {
                        continue;
                    }
                    if let Some(((px, py), label)) = points[pos_x as usize][pos_y as usize] {
                        let dx = px as i64 - x as i64;
                        let dy = py as i64 - y as i64;
                        let dist = (dx * dx + dy * dy) as u64;
                        if dist < best {
                            best = dist;
                            best_label = Some(label);
                        }
                    }
                }
            }

            match best_label {
                Some(label) => {
                    labels.set(x, y, label);
                    resolved.set(x, y, true);
                }
                None => deferred.push((x, y)),
            }
        }
    }

    for &(x, y) in &deferred {
        if let Some(label) = flood_to_resolved(labels, &resolved, x, y) {
            labels.set(x, y, label);
        }
        resolved.set(x, y, true);
    }

    rebuild_regions(labels, regions)
}

/// Pick a land cell inside a fine block: three random probes, then a linear
/// scan, then give up.
fn pick_land_point(
    labels: &LabelMap,
    rng: &mut ChaCha8Rng,
    bx: usize,
    by: usize,
    block_size: usize,
) -> Option<((usize, usize), RegionLabel)> {
    let width = labels.width;
    let height = labels.height;

    for _ in 0..3 {
        let px = (bx * block_size + rng.gen_range(0..block_size)).min(width - 1);
        let py = (by * block_size + rng.gen_range(0..block_size)).min(height - 1);
        let label = *labels.get(px, py);
        if label.is_land() {
            return Some(((px, py), label));
        }
    }

    for x in bx * block_size..((bx + 1) * block_size).min(width) {
        for y in by * block_size..((by + 1) * block_size).min(height) {
            let label = *labels.get(x, y);
            if label.is_land() {
                return Some(((x, y), label));
            }
        }
    }

    None
}

/// Breadth-first search over land cells for the closest already-resolved
/// cell, returning its label.
fn flood_to_resolved(labels: &LabelMap, resolved: &Tilemap<bool>, x: usize, y: usize) -> Option<RegionLabel> {
    let mut visited = Tilemap::new_with(labels.width, labels.height, false);
    let mut queue = VecDeque::new();
    visited.set(x, y, true);
    queue.push_back((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        for (nx, ny) in labels.neighbors(cx, cy) {
            if *visited.get(nx, ny) || labels.get(nx, ny).is_sea() {
                continue;
            }
            if *resolved.get(nx, ny) {
                return Some(*labels.get(nx, ny));
            }
            visited.set(nx, ny, true);
            queue.push_back((nx, ny));
        }
    }

    None
}

/// Regroup cells under the original labels, keeping prior centroids where the
/// region survives.
fn rebuild_regions(labels: &LabelMap, old: &RegionMap) -> RegionMap {
    let mut rebuilt = crate::regions::regions_from_grid(labels);
    for (label, region) in rebuilt.iter_mut() {
        region.centroid = match old.get(label) {
            Some(prior) => prior.centroid,
            None => centroid_of(&region.cells),
        };
    }
    rebuilt
}
