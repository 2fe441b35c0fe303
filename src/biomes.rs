//! Biome assignment for the finished region partition.
//!
//! Two policies: random distinct colors per region for quick inspection, and
//! a climate model that samples a west-to-east temperature gradient and a
//! coherent-noise humidity field at each region's centroid.

use std::collections::BTreeMap;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::noise_field::generate_perlin_noise;
use crate::regions::{RegionLabel, RegionMap};
use crate::tilemap::Tilemap;

/// Seed salt so biome colors draw from a different stream than the terrain.
const BIOME_SEED_SALT: u64 = 0x0B10;

/// Humidity field defaults, tuned for a 100-wide map and rescaled with it.
const HUMIDITY_SCALE_PER_100: f64 = 15.55;
const HUMIDITY_OCTAVES: u32 = 4;
const HUMIDITY_PERSISTENCE: f64 = 0.06;
const HUMIDITY_LACUNARITY: f64 = 1.24;

/// RGBA color painted over a region. Sea is solid black; biome checks only
/// look at the color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeColor(pub [u8; 4]);

impl BiomeColor {
    pub const SEA: BiomeColor = BiomeColor([0, 0, 0, 255]);

    pub fn is_sea(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0
    }
}

/// How regions get their biome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomePolicy {
    /// Distinct random colors, one per region.
    Random,
    /// Temperature and humidity driven biome selection.
    #[default]
    Climate,
}

/// The climate biomes, ordered hot to cold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Desert,
    DarkForest,
    LightForest,
    Taiga,
    Snow,
}

impl Biome {
    pub fn color(&self) -> BiomeColor {
        match self {
            Biome::Desert => BiomeColor([255, 234, 4, 255]),
            Biome::DarkForest => BiomeColor([0, 84, 0, 255]),
            Biome::LightForest => BiomeColor([142, 234, 140, 255]),
            Biome::Taiga => BiomeColor([99, 66, 33, 255]),
            Biome::Snow => BiomeColor([229, 229, 255, 255]),
        }
    }

    /// Select a biome from temperature and humidity, both nominally in
    /// [0, 1]. Hot and dry is desert, hot and wet is dark forest, temperate
    /// is light forest, cool is taiga, anything colder is snow.
    pub fn from_climate(temperature: f32, humidity: f32) -> Biome {
        if temperature >= 0.67 && humidity < 0.4 {
            Biome::Desert
        } else if temperature >= 0.67 {
            Biome::DarkForest
        } else if temperature > 0.33 && humidity > 0.0 && humidity <= 1.0 {
            Biome::LightForest
        } else if temperature > 0.15 && humidity <= 0.6 {
            Biome::Taiga
        } else {
            Biome::Snow
        }
    }
}

/// Assign a distinct random color to every region, in label order so the
/// palette is reproducible. Colors too close to black are redrawn to keep the
/// sea distinguishable.
pub fn assign_random_biomes(regions: &RegionMap, seed: u32) -> BTreeMap<RegionLabel, BiomeColor> {
    let mut rng = ChaCha8Rng::seed_from_u64((seed as u64).wrapping_add(BIOME_SEED_SALT));
    let mut colors = BTreeMap::new();

    for &label in regions.keys() {
        let color = loop {
            let r: f32 = rng.gen();
            let g: f32 = rng.gen();
            let b: f32 = rng.gen();
            if r < 0.1 && g < 0.1 && b < 0.1 {
                continue;
            }
            break BiomeColor([
                (r * 255.0) as u8,
                (g * 255.0) as u8,
                (b * 255.0) as u8,
                255,
            ]);
        };
        colors.insert(label, color);
    }

    colors
}

/// West-to-east temperature gradient: warm on the left edge, cooling towards
/// the right, clamped to [0, 1].
pub fn generate_temperature_mask(width: usize, height: usize) -> Tilemap<f32> {
    let mut mask = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        for x in 0..width {
            let t = x as f32 / width as f32;
            mask.set(x, y, (0.8 - smoothstep01(t)).clamp(0.0, 1.0));
        }
    }
    mask
}

/// Humidity field from low-contrast coherent noise, scale tied to map width.
pub fn generate_humidity_mask(width: usize, height: usize, seed: u32) -> Tilemap<f32> {
    let scale = width as f64 / 100.0 * HUMIDITY_SCALE_PER_100;
    generate_perlin_noise(
        width,
        height,
        seed,
        (0.0, 0.0),
        scale,
        HUMIDITY_OCTAVES,
        HUMIDITY_PERSISTENCE,
        HUMIDITY_LACUNARITY,
    )
}

/// Climate-driven assignment: each region reads temperature and humidity at
/// its centroid and maps them to a biome.
pub fn assign_climate_biomes(
    regions: &RegionMap,
    width: usize,
    height: usize,
    seed: u32,
) -> BTreeMap<RegionLabel, BiomeColor> {
    let temperature = generate_temperature_mask(width, height);
    let humidity = generate_humidity_mask(width, height, seed);

    regions
        .values()
        .map(|region| {
            let (cx, cy) = region.centroid;
            let biome = Biome::from_climate(*temperature.get(cx, cy), *humidity.get(cx, cy));
            (region.label, biome.color())
        })
        .collect()
}

/// Paint the per-region colors onto the grid, sea cells staying black.
pub fn paint_biomes(
    labels: &Tilemap<RegionLabel>,
    colors: &BTreeMap<RegionLabel, BiomeColor>,
) -> Tilemap<BiomeColor> {
    let mut painted = Tilemap::new_with(labels.width, labels.height, BiomeColor::SEA);
    for (x, y, label) in labels.iter() {
        if let Some(&color) = colors.get(label) {
            painted.set(x, y, color);
        }
    }
    painted
}

fn smoothstep01(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{regions_from_grid, RegionLabel};
    use crate::tilemap::Tilemap;

    fn small_regions() -> RegionMap {
        let mut labels = Tilemap::new_with(4, 1, RegionLabel::SEA);
        labels.set(0, 0, RegionLabel(1));
        labels.set(1, 0, RegionLabel(2));
        labels.set(2, 0, RegionLabel(3));
        regions_from_grid(&labels)
    }

    #[test]
    fn test_random_colors_are_reproducible_and_not_sea() {
        let regions = small_regions();
        let a = assign_random_biomes(&regions, 99);
        let b = assign_random_biomes(&regions, 99);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        for color in a.values() {
            assert!(!color.is_sea());
        }
    }

    #[test]
    fn test_climate_thresholds() {
        assert_eq!(Biome::from_climate(0.7, 0.2), Biome::Desert);
        assert_eq!(Biome::from_climate(0.7, 0.5), Biome::DarkForest);
        assert_eq!(Biome::from_climate(0.5, 0.5), Biome::LightForest);
        assert_eq!(Biome::from_climate(0.2, 0.5), Biome::Taiga);
        assert_eq!(Biome::from_climate(0.1, 0.5), Biome::Snow);
        // Cool but saturated air falls through to snow.
        assert_eq!(Biome::from_climate(0.2, 0.7), Biome::Snow);
    }

    #[test]
    fn test_temperature_falls_west_to_east() {
        let mask = generate_temperature_mask(100, 10);
        assert!(*mask.get(0, 5) > *mask.get(50, 5));
        assert!(*mask.get(50, 5) >= *mask.get(99, 5));
        for (_, _, v) in mask.iter() {
            assert!(*v >= 0.0 && *v <= 1.0);
        }
    }

    #[test]
    fn test_paint_covers_land_and_leaves_sea_black() {
        let mut labels = Tilemap::new_with(3, 1, RegionLabel::SEA);
        labels.set(1, 0, RegionLabel(1));
        let regions = regions_from_grid(&labels);
        let colors = assign_random_biomes(&regions, 5);
        let painted = paint_biomes(&labels, &colors);
        assert!(painted.get(0, 0).is_sea());
        assert!(!painted.get(1, 0).is_sea());
        assert!(painted.get(2, 0).is_sea());
    }

    #[test]
    fn test_climate_assignment_is_deterministic() {
        let regions = small_regions();
        let a = assign_climate_biomes(&regions, 40, 40, 13);
        let b = assign_climate_biomes(&regions, 40, 40, 13);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }
}
