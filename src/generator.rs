//! The full island generation pipeline.
//!
//! Noise, mask, automaton and connectivity produce a single landmass; the
//! Voronoi partition, relaxation, merging and border randomization carve it
//! into regions; the biome pass colors them. Every stage is seeded from the
//! map seed, so a seed plus a parameter set reproduces the map exactly.

use serde::{Deserialize, Serialize};

use crate::automata::apply_cellular_automata;
use crate::biomes::{self, BiomePolicy};
use crate::border::apply_voronoi_border;
use crate::error::GenError;
use crate::islands::{keep_largest, MIN_COVERAGE_PERCENT};
use crate::mask::radial_mask;
use crate::noise_field::generate_perlin_noise;
use crate::regions::{regions_from_grid, LabelMap, RegionLabel, RegionMap};
use crate::relax::{apply_lloyd_relaxation, apply_small_lloyd_relaxation};
use crate::seeds;
use crate::tilemap::Tilemap;
use crate::topology::split_and_merge;
use crate::voronoi::generate_voronoi_labels;

/// Upper bound on landmass generation attempts before giving up.
pub const MAX_GENERATION_PASSES: u32 = 64;

/// Final number of regions on the island.
pub const MERGE_TARGET_REGIONS: usize = 6;

/// Denominator of the multi-resolution border schedule: the fine block size
/// starts at `width / 15` and divides by 15 until it drops below 4.
const BORDER_STEP_DIVISOR: usize = 15;
const BORDER_MIN_STEP: usize = 4;

/// Everything the pipeline needs. Scale-like parameters are tuned for a
/// 100-wide map and rescale with the actual width.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandParams {
    pub width: usize,
    pub height: usize,
    /// 0 requests a random seed.
    pub seed: u32,
    pub offset: (f64, f64),
    pub noise_limit: f32,
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub block_size: usize,
    pub biome_policy: BiomePolicy,
}

impl Default for IslandParams {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            seed: seeds::RANDOM_SEED,
            offset: (5.46, 54.89),
            noise_limit: 0.061,
            scale: 36.8,
            octaves: 4,
            persistence: -0.5,
            lacunarity: 2.42,
            block_size: 22,
            biome_policy: BiomePolicy::Climate,
        }
    }
}

impl IslandParams {
    /// Noise scale adjusted to the actual map width.
    pub fn resolved_scale(&self) -> f64 {
        self.width as f64 / 100.0 * self.scale
    }

    /// Voronoi block size adjusted to the actual map width, at least 1.
    pub fn resolved_block_size(&self) -> usize {
        ((self.width as f64 / 100.0 * self.block_size as f64) as usize).max(1)
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.width < 10 || self.height < 10 {
            return Err(GenError::Configuration(format!(
                "map dimensions {}x{} are too small, need at least 10x10",
                self.width, self.height
            )));
        }
        if self.octaves == 0 {
            return Err(GenError::Configuration(
                "octaves must be at least 1".to_string(),
            ));
        }
        if self.scale <= 0.0 {
            return Err(GenError::Configuration(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.block_size == 0 {
            return Err(GenError::Configuration(
                "block_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A finished map: the colored grid, the label grid behind it, the region
/// table, the seed that produced the accepted landmass, and how many
/// attempts it took.
#[derive(Clone, Debug)]
pub struct IslandMap {
    pub biomes: Tilemap<biomes::BiomeColor>,
    pub labels: LabelMap,
    pub regions: RegionMap,
    pub seed: u32,
    pub passes: u32,
}

/// Run the whole pipeline.
pub fn generate_island(params: &IslandParams) -> Result<IslandMap, GenError> {
    params.validate()?;

    let (island, seed, passes) = generate_landmass(params)?;
    let (labels, regions) = partition_regions(params, &island, seed);

    let colors = match params.biome_policy {
        BiomePolicy::Random => biomes::assign_random_biomes(&regions, seed),
        BiomePolicy::Climate => {
            biomes::assign_climate_biomes(&regions, params.width, params.height, seed)
        }
    };
    let painted = biomes::paint_biomes(&labels, &colors);

    Ok(IslandMap {
        biomes: painted,
        labels,
        regions,
        seed,
        passes,
    })
}

/// Noise, falloff, automaton and connectivity, retried with fresh seeds
/// until the surviving landmass covers enough of the map.
fn generate_landmass(params: &IslandParams) -> Result<(Tilemap<f32>, u32, u32), GenError> {
    let random_requested = params.seed == seeds::RANDOM_SEED;
    let mut seed = seeds::resolve(params.seed);
    let mask = radial_mask(params.width, params.height);

    for pass in 1..=MAX_GENERATION_PASSES {
        let mut field = generate_perlin_noise(
            params.width,
            params.height,
            seed,
            params.offset,
            params.resolved_scale(),
            params.octaves,
            params.persistence,
            params.lacunarity,
        );

        for y in 0..params.height {
            for x in 0..params.width {
                let damped = *field.get(x, y) * *mask.get(x, y);
                field.set(x, y, damped);
            }
        }

        apply_cellular_automata(&mut field, 1, params.noise_limit);
        let coverage = keep_largest(&mut field);

        if coverage >= MIN_COVERAGE_PERCENT {
            return Ok((field, seed, pass));
        }

        seed = if random_requested {
            seeds::random_seed()
        } else {
            seeds::advance(seed)
        };
    }

    Err(GenError::GenerationFailed {
        passes: MAX_GENERATION_PASSES,
    })
}

/// Partition the accepted landmass into the final regions.
fn partition_regions(
    params: &IslandParams,
    island: &Tilemap<f32>,
    seed: u32,
) -> (LabelMap, RegionMap) {
    let block_size = params.resolved_block_size();

    let mut labels = generate_voronoi_labels(params.width, params.height, block_size, seed);
    for (x, y, v) in island.iter() {
        if *v == 0.0 {
            labels.set(x, y, RegionLabel::SEA);
        }
    }

    // Two full relaxation steps settle the raw partition before the region
    // count comes down.
    apply_lloyd_relaxation(&mut labels, block_size);
    apply_lloyd_relaxation(&mut labels, block_size);
    let regions = regions_from_grid(&labels);

    let regions = split_and_merge(&mut labels, regions, MERGE_TARGET_REGIONS);
    let regions = apply_small_lloyd_relaxation(&mut labels, &regions);
    let regions = split_and_merge(&mut labels, regions, MERGE_TARGET_REGIONS);
    let mut regions = apply_small_lloyd_relaxation(&mut labels, &regions);

    let mut step = params.width / BORDER_STEP_DIVISOR;
    while step >= BORDER_MIN_STEP {
        regions = apply_voronoi_border(&mut labels, &regions, seed, step);
        step /= BORDER_STEP_DIVISOR;
    }

    let regions = split_and_merge(&mut labels, regions, MERGE_TARGET_REGIONS);
    (labels, regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::check_regions;

    /// Parameters that reliably accept on the first pass: a permissive noise
    /// limit and positive persistence keep most of the interior above the
    /// threshold.
    fn easy_params(seed: u32) -> IslandParams {
        IslandParams {
            width: 60,
            height: 60,
            seed,
            noise_limit: 0.05,
            persistence: 0.5,
            ..IslandParams::default()
        }
    }

    #[test]
    fn test_generation_is_deterministic_for_a_fixed_seed() {
        let params = easy_params(17);
        let a = generate_island(&params).unwrap();
        let b = generate_island(&params).unwrap();
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.passes, b.passes);
        for (x, y, label) in a.labels.iter() {
            assert_eq!(label, b.labels.get(x, y));
        }
        for (x, y, color) in a.biomes.iter() {
            assert_eq!(color, b.biomes.get(x, y));
        }
    }

    #[test]
    fn test_generated_map_has_target_region_count() {
        let map = generate_island(&easy_params(17)).unwrap();
        assert_eq!(map.regions.len(), MERGE_TARGET_REGIONS);
        assert!(check_regions(&map.labels, &map.regions).is_ok());
    }

    #[test]
    fn test_landmass_meets_coverage() {
        let map = generate_island(&easy_params(17)).unwrap();
        let land = map.labels.count_where(|l| l.is_land());
        let total = map.labels.width * map.labels.height;
        assert!(land as f32 / total as f32 * 100.0 >= MIN_COVERAGE_PERCENT);
    }

    #[test]
    fn test_sea_cells_are_black_and_land_cells_are_not() {
        let map = generate_island(&easy_params(17)).unwrap();
        for (x, y, label) in map.labels.iter() {
            let color = map.biomes.get(x, y);
            if label.is_sea() {
                assert!(color.is_sea());
            } else {
                assert!(!color.is_sea());
            }
        }
    }

    #[test]
    fn test_random_seed_request_reports_the_seed_used() {
        let map = generate_island(&easy_params(seeds::RANDOM_SEED)).unwrap();
        assert_ne!(map.seed, seeds::RANDOM_SEED);
    }

    #[test]
    fn test_reported_seed_reproduces_the_map() {
        // The reported seed is the one of the accepted pass, so feeding it
        // back must regenerate the identical map on the first pass. Debug
        // exports rendered from the reported seed rely on this.
        let first = generate_island(&easy_params(seeds::RANDOM_SEED)).unwrap();
        let replay = generate_island(&easy_params(first.seed)).unwrap();
        assert_eq!(replay.seed, first.seed);
        assert_eq!(replay.passes, 1);
        for (x, y, label) in first.labels.iter() {
            assert_eq!(label, replay.labels.get(x, y));
        }
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let params = IslandParams {
            width: 3,
            height: 3,
            ..IslandParams::default()
        };
        assert!(matches!(
            generate_island(&params),
            Err(GenError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_octaves() {
        let params = IslandParams {
            octaves: 0,
            ..easy_params(1)
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_json_round_trip() {
        let params = easy_params(42);
        let json = serde_json::to_string(&params).unwrap();
        let back: IslandParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 42);
        assert_eq!(back.width, 60);
        assert_eq!(back.biome_policy, params.biome_policy);
    }
}
