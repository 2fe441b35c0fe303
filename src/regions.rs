//! Region identity and bookkeeping for the partitioned island.
//!
//! Regions are keyed by an integer label rather than the float "color" the
//! scalar debug fields use for display; labels are exact-comparable and the
//! label-sorted `RegionMap` gives every scan a fixed, reproducible order.

use std::collections::BTreeMap;

use crate::error::GenError;
use crate::tilemap::Tilemap;

/// Region identifier stored per cell. `SEA` (0) marks non-land cells; land
/// labels start at 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionLabel(pub u32);

impl RegionLabel {
    pub const SEA: RegionLabel = RegionLabel(0);

    pub fn is_sea(&self) -> bool {
        self.0 == 0
    }

    pub fn is_land(&self) -> bool {
        self.0 != 0
    }
}

/// Label field over the whole grid.
pub type LabelMap = Tilemap<RegionLabel>;

/// Label-sorted region table. Rebuilt by every pipeline stage that changes
/// membership; iteration order is the deterministic tie-break order.
pub type RegionMap = BTreeMap<RegionLabel, Region>;

/// A single region: its label, its integer centroid, and its member cells.
///
/// Invariant: members are 4-connected through same-label cells. Relaxation
/// and merging may break this transiently; `topology::split_regions` repairs
/// it.
#[derive(Clone, Debug)]
pub struct Region {
    pub label: RegionLabel,
    pub centroid: (usize, usize),
    pub cells: Vec<(usize, usize)>,
}

impl Region {
    /// Build a region from its member cells, computing the truncated-mean
    /// centroid. `cells` must be non-empty.
    pub fn from_cells(label: RegionLabel, cells: Vec<(usize, usize)>) -> Self {
        debug_assert!(!cells.is_empty(), "region {:?} has no cells", label);
        let centroid = centroid_of(&cells);
        Self { label, centroid, cells }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Component-wise truncated mean of a non-empty cell list.
pub fn centroid_of(cells: &[(usize, usize)]) -> (usize, usize) {
    let mut sum_x = 0usize;
    let mut sum_y = 0usize;
    for &(x, y) in cells {
        sum_x += x;
        sum_y += y;
    }
    (sum_x / cells.len(), sum_y / cells.len())
}

/// Hands out labels that are unused by any existing region.
#[derive(Clone, Debug)]
pub struct LabelAllocator {
    next: u32,
}

impl LabelAllocator {
    /// Start allocating above the highest label present in `regions`.
    pub fn above(regions: &RegionMap) -> Self {
        let max = regions.keys().next_back().map(|l| l.0).unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn fresh(&mut self) -> RegionLabel {
        let label = RegionLabel(self.next);
        self.next += 1;
        label
    }
}

/// Group all land cells of a label grid into a region table, row-major cell
/// order within each region.
pub fn regions_from_grid(labels: &LabelMap) -> RegionMap {
    let mut groups: BTreeMap<RegionLabel, Vec<(usize, usize)>> = BTreeMap::new();
    for (x, y, label) in labels.iter() {
        if label.is_land() {
            groups.entry(*label).or_default().push((x, y));
        }
    }
    groups
        .into_iter()
        .map(|(label, cells)| (label, Region::from_cells(label, cells)))
        .collect()
}

/// Debug validator: every region's members must carry its label in the grid,
/// and every labeled land cell must belong to exactly the region holding it.
pub fn check_regions(labels: &LabelMap, regions: &RegionMap) -> Result<(), GenError> {
    let mut covered = Tilemap::new_with(labels.width, labels.height, false);

    for (label, region) in regions {
        if region.cells.is_empty() {
            return Err(GenError::InvariantViolation(format!(
                "region {} has no cells",
                label.0
            )));
        }
        for &(x, y) in &region.cells {
            if labels.get(x, y) != label {
                return Err(GenError::InvariantViolation(format!(
                    "cell ({}, {}) is listed under region {} but labeled {}",
                    x,
                    y,
                    label.0,
                    labels.get(x, y).0
                )));
            }
            if *covered.get(x, y) {
                return Err(GenError::InvariantViolation(format!(
                    "cell ({}, {}) appears in more than one region",
                    x, y
                )));
            }
            covered.set(x, y, true);
        }
    }

    for (x, y, label) in labels.iter() {
        if label.is_land() && !*covered.get(x, y) {
            return Err(GenError::InvariantViolation(format!(
                "labeled cell ({}, {}) belongs to no region",
                x, y
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_truncates() {
        assert_eq!(centroid_of(&[(0, 0), (1, 0), (0, 1)]), (0, 0));
        assert_eq!(centroid_of(&[(2, 2), (4, 4)]), (3, 3));
    }

    #[test]
    fn test_allocator_skips_used_labels() {
        let mut labels = Tilemap::new_with(2, 1, RegionLabel::SEA);
        labels.set(0, 0, RegionLabel(3));
        labels.set(1, 0, RegionLabel(7));
        let regions = regions_from_grid(&labels);
        let mut alloc = LabelAllocator::above(&regions);
        assert_eq!(alloc.fresh(), RegionLabel(8));
        assert_eq!(alloc.fresh(), RegionLabel(9));
    }

    #[test]
    fn test_regions_from_grid_partitions_land() {
        let mut labels = Tilemap::new_with(3, 1, RegionLabel::SEA);
        labels.set(0, 0, RegionLabel(1));
        labels.set(2, 0, RegionLabel(1));
        let regions = regions_from_grid(&labels);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[&RegionLabel(1)].cells, vec![(0, 0), (2, 0)]);
        assert!(check_regions(&labels, &regions).is_ok());
    }

    #[test]
    fn test_check_regions_catches_mislabeled_cell() {
        let mut labels = Tilemap::new_with(2, 1, RegionLabel::SEA);
        labels.set(0, 0, RegionLabel(1));
        labels.set(1, 0, RegionLabel(2));
        let mut regions = regions_from_grid(&labels);
        // Corrupt: move the label-2 cell into region 1's member list.
        let stray = regions.remove(&RegionLabel(2)).unwrap();
        regions
            .get_mut(&RegionLabel(1))
            .unwrap()
            .cells
            .extend(stray.cells);

        assert!(matches!(
            check_regions(&labels, &regions),
            Err(GenError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_check_regions_catches_uncovered_cell() {
        let mut labels = Tilemap::new_with(2, 1, RegionLabel::SEA);
        labels.set(0, 0, RegionLabel(1));
        let regions = RegionMap::new();
        assert!(check_regions(&labels, &regions).is_err());
    }
}
