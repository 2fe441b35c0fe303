//! Lloyd relaxation over the labeled partition.
//!
//! One relaxation step gathers each region's cells, recomputes the truncated
//! centroid, and reassigns every land cell to its nearest centroid. The full
//! variant keeps the block-local candidate search of the Voronoi pass; the
//! small variant brute-forces all centroids and is meant for the handful of
//! regions left after merging.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::regions::{centroid_of, LabelMap, RegionLabel, RegionMap};

/// One full relaxation step.
///
/// Centroids are bucketed into the coarse block grid and each cell considers
/// only centroids in the 3x3 surrounding blocks, which is sound as long as
/// regions stay roughly block sized. Cells with no candidate in range keep
/// their current label. Regions that end the step with no cells are dropped
/// from the returned map.
pub fn apply_lloyd_relaxation(labels: &mut LabelMap, block_size: usize) -> RegionMap {
    let block_size = block_size.max(1);
    let width = labels.width;
    let height = labels.height;
    let blocks_x = (width / block_size).max(1);
    let blocks_y = (height / block_size).max(1);

    let centroids = collect_centroids(labels);

    // Bucket centroids by block. Filled in label order, so candidate scans
    // inside one bucket see lower labels first.
    let mut by_block: HashMap<(usize, usize), Vec<((usize, usize), RegionLabel)>> = HashMap::new();
    for (&label, &centroid) in &centroids {
        let bx = (centroid.0 / block_size).min(blocks_x - 1);
        let by = (centroid.1 / block_size).min(blocks_y - 1);
        by_block.entry((bx, by)).or_default().push((centroid, label));
    }

    for y in 0..height {
        for x in 0..width {
            if labels.get(x, y).is_sea() {
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
                    let Some(bucket) = by_block.get(&(pos_x as usize, pos_y as usize)) else {
                        continue;
                    };
                    for &((cx, cy), label) in bucket {
                        let dist = sq_dist((x, y), (cx, cy));
                        if dist < best {
                            best = dist;
                            best_label = Some(label);
                        }
                    }
                }
            }

            if let Some(label) = best_label {
                labels.set(x, y, label);
            }
        }
    }

    crate::regions::regions_from_grid(labels)
}

/// One relaxation step over every centroid, no block locality.
///
/// Used after merging, when regions are few and far larger than a block. The
/// centroid list is taken from `regions` in label order, so equidistant cells
/// resolve to the lowest label.
pub fn apply_small_lloyd_relaxation(labels: &mut LabelMap, regions: &RegionMap) -> RegionMap {
    let centroids: Vec<((usize, usize), RegionLabel)> = regions
        .values()
        .map(|region| (centroid_of(&region.cells), region.label))
        .collect();

    if centroids.is_empty() {
        return RegionMap::new();
    }

    for y in 0..labels.height {
        for x in 0..labels.width {
            if labels.get(x, y).is_sea() {
                continue;
            }

            let mut best = u64::MAX;
            let mut best_label = centroids[0].1;
            for &((cx, cy), label) in &centroids {
                let dist = sq_dist((x, y), (cx, cy));
                if dist < best {
                    best = dist;
                    best_label = label;
                }
            }
            labels.set(x, y, best_label);
        }
    }

    crate::regions::regions_from_grid(labels)
}

fn collect_centroids(labels: &LabelMap) -> BTreeMap<RegionLabel, (usize, usize)> {
    let mut cells: BTreeMap<RegionLabel, Vec<(usize, usize)>> = BTreeMap::new();
    for (x, y, label) in labels.iter() {
        if label.is_land() {
            cells.entry(*label).or_default().push((x, y));
        }
    }
    cells
        .into_iter()
        .map(|(label, members)| (label, centroid_of(&members)))
        .collect()
}

fn sq_dist(a: (usize, usize), b: (usize, usize)) -> u64 {
    let dx = a.0 as i64 - b.0 as i64;
    let dy = a.1 as i64 - b.1 as i64;
    (dx * dx + dy * dy) as u64
}
