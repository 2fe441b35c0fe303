//! Connectivity repair and region count reduction.
//!
//! Relaxation and border randomization can leave a label in several
//! disconnected pieces. `split_regions` gives every extra piece its own
//! label, and `merge_regions` then folds the smallest regions into their
//! neighbors until the target count is reached.

use std::collections::BTreeSet;

use crate::regions::{LabelAllocator, LabelMap, Region, RegionLabel, RegionMap};
use crate::tilemap::Tilemap;

/// Split every region into its 4-connected components.
///
/// Regions are visited in label order and cells in member order; within a
/// region the first component discovered keeps the original label and later
/// components get fresh labels above the current maximum. Centroids are
/// recomputed for every resulting region.
pub fn split_regions(labels: &mut LabelMap, regions: RegionMap) -> RegionMap {
    let mut alloc = LabelAllocator::above(&regions);
    let mut result = RegionMap::new();
    let mut visited = Tilemap::new_with(labels.width, labels.height, false);

    for (label, region) in regions {
        let mut first = true;
        for &(sx, sy) in &region.cells {
            if *visited.get(sx, sy) {
                continue;
            }

            let component = collect_component(labels, &mut visited, sx, sy, label);
            let new_label = if first { label } else { alloc.fresh() };
            first = false;

            for &(x, y) in &component {
                labels.set(x, y, new_label);
            }
            result.insert(new_label, Region::from_cells(new_label, component));
        }
    }

    result
}

/// Flood the 4-connected component of `label` containing `(sx, sy)`.
fn collect_component(
    labels: &LabelMap,
    visited: &mut Tilemap<bool>,
    sx: usize,
    sy: usize,
    label: RegionLabel,
) -> Vec<(usize, usize)> {
    let mut stack = vec![(sx, sy)];
    let mut component = Vec::new();
    visited.set(sx, sy, true);

    while let Some((cx, cy)) = stack.pop() {
        component.push((cx, cy));
        for (nx, ny) in labels.neighbors(cx, cy) {
            if !*visited.get(nx, ny) && *labels.get(nx, ny) == label {
                visited.set(nx, ny, true);
                stack.push((nx, ny));
            }
        }
    }

    component
}

/// Absorb the smallest regions into their neighbors until at most `target`
/// remain.
///
/// Each round picks the smallest region (ties broken by lowest label), finds
/// the labels adjacent to it, and merges it into the smallest of those
/// neighbors. A region with no land neighbors at all (an isolated islet that
/// survived the connectivity filter) stops the loop early rather than
/// spinning forever.
pub fn merge_regions(labels: &mut LabelMap, regions: &mut RegionMap, target: usize) {
    while regions.len() > target {
        let smallest = match regions
            .values()
            .min_by_key(|region| (region.size(), region.label))
        {
            Some(region) => region.label,
            None => break,
        };

        let neighbors = adjacent_labels(labels, &regions[&smallest]);
        let Some(&absorber) = neighbors
            .iter()
            .min_by_key(|&&label| (regions[&label].size(), label))
        else {
            break;
        };

        let absorbed = match regions.remove(&smallest) {
            Some(region) => region,
            None => break,
        };
        for &(x, y) in &absorbed.cells {
            labels.set(x, y, absorber);
        }

        if let Some(region) = regions.get_mut(&absorber) {
            region.cells.extend(absorbed.cells);
            region.centroid = crate::regions::centroid_of(&region.cells);
        }
    }
}

/// Labels of land regions 4-adjacent to `region`, excluding itself.
fn adjacent_labels(labels: &LabelMap, region: &Region) -> BTreeSet<RegionLabel> {
    let mut found = BTreeSet::new();
    for &(x, y) in &region.cells {
        for (nx, ny) in labels.neighbors(x, y) {
            let neighbor = *labels.get(nx, ny);
            if neighbor.is_land() && neighbor != region.label {
                found.insert(neighbor);
            }
        }
    }
    found
}

/// Split then merge down to `target`, the canonical repair sequence after a
/// stage that may fragment labels.
pub fn split_and_merge(labels: &mut LabelMap, regions: RegionMap, target: usize) -> RegionMap {
    let mut regions = split_regions(labels, regions);
    merge_regions(labels, &mut regions, target);
    regions
}
