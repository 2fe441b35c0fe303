//! Stateful wrapper for inspecting pipeline stages one at a time.
//!
//! The one-shot `generate_island` entry point runs the whole pipeline; a
//! session instead holds the last generated field and lets individual stages
//! be applied to it for interactive parameter tuning.

use crate::automata::apply_cellular_automata;
use crate::error::GenError;
use crate::generator::{generate_island, IslandMap, IslandParams};
use crate::mask::radial_mask;
use crate::noise_field::generate_perlin_noise;
use crate::relax::apply_lloyd_relaxation;
use crate::regions::{LabelMap, RegionMap};
use crate::seeds;
use crate::tilemap::Tilemap;
use crate::voronoi::{generate_voronoi_labels, generate_voronoi_noise};

/// What the session currently holds.
enum CurrentMap {
    None,
    /// A scalar field from the noise or mask generators.
    Scalar(Tilemap<f32>),
    /// A raw Voronoi partition, label grid plus its scalar rendition.
    Voronoi(LabelMap, Tilemap<f32>),
    /// A finished island.
    Island(IslandMap),
}

/// Holds generation parameters and the last produced map.
pub struct MapSession {
    pub params: IslandParams,
    current: CurrentMap,
    seed: u32,
}

impl MapSession {
    pub fn new(params: IslandParams) -> Self {
        let seed = seeds::resolve(params.seed);
        Self {
            params,
            current: CurrentMap::None,
            seed,
        }
    }

    /// Seed the stages run against. Fixed at construction so repeated stage
    /// calls see the same stream.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn generate_perlin_noise(&mut self) -> &Tilemap<f32> {
        let field = generate_perlin_noise(
            self.params.width,
            self.params.height,
            self.seed,
            self.params.offset,
            self.params.resolved_scale(),
            self.params.octaves,
            self.params.persistence,
            self.params.lacunarity,
        );
        self.current = CurrentMap::Scalar(field);
        self.current_scalar()
    }

    pub fn generate_radial_mask(&mut self) -> &Tilemap<f32> {
        self.current = CurrentMap::Scalar(radial_mask(self.params.width, self.params.height));
        self.current_scalar()
    }

    pub fn generate_voronoi(&mut self) -> &Tilemap<f32> {
        let block_size = self.params.resolved_block_size();
        let labels =
            generate_voronoi_labels(self.params.width, self.params.height, block_size, self.seed);
        let field =
            generate_voronoi_noise(self.params.width, self.params.height, block_size, self.seed);
        self.current = CurrentMap::Voronoi(labels, field);
        match &self.current {
            CurrentMap::Voronoi(_, field) => field,
            _ => unreachable!(),
        }
    }

    /// Smooth the held scalar field. Only valid after a noise or mask stage.
    pub fn apply_cellular_automata(&mut self, iterations: u32) -> Result<&Tilemap<f32>, GenError> {
        match &mut self.current {
            CurrentMap::Scalar(field) => {
                apply_cellular_automata(field, iterations, self.params.noise_limit);
                Ok(self.current_scalar())
            }
            _ => Err(GenError::Configuration(
                "cellular automata needs a scalar field, generate noise first".to_string(),
            )),
        }
    }

    /// Relax the held Voronoi partition once. Only valid after a Voronoi
    /// stage.
    pub fn apply_lloyd_relaxation(&mut self) -> Result<RegionMap, GenError> {
        let block_size = self.params.resolved_block_size();
        match &mut self.current {
            CurrentMap::Voronoi(labels, field) => {
                let regions = apply_lloyd_relaxation(labels, block_size);
                for (x, y, label) in labels.clone().iter() {
                    field.set(x, y, crate::voronoi::label_shade(*label));
                }
                Ok(regions)
            }
            _ => Err(GenError::Configuration(
                "relaxation needs a voronoi partition, generate one first".to_string(),
            )),
        }
    }

    /// Run the full pipeline and hold the result.
    pub fn generate_island(&mut self) -> Result<&IslandMap, GenError> {
        let map = generate_island(&self.params)?;
        self.seed = map.seed;
        self.current = CurrentMap::Island(map);
        match &self.current {
            CurrentMap::Island(map) => Ok(map),
            _ => unreachable!(),
        }
    }

    pub fn island(&self) -> Option<&IslandMap> {
        match &self.current {
            CurrentMap::Island(map) => Some(map),
            _ => None,
        }
    }

    fn current_scalar(&self) -> &Tilemap<f32> {
        match &self.current {
            CurrentMap::Scalar(field) => field,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::IslandParams;

    fn params() -> IslandParams {
        IslandParams {
            width: 40,
            height: 40,
            seed: 9,
            ..IslandParams::default()
        }
    }

    #[test]
    fn test_automata_without_noise_is_rejected() {
        let mut session = MapSession::new(params());
        assert!(matches!(
            session.apply_cellular_automata(1),
            Err(GenError::Configuration(_))
        ));
    }

    #[test]
    fn test_automata_after_noise_succeeds() {
        let mut session = MapSession::new(params());
        session.generate_perlin_noise();
        assert!(session.apply_cellular_automata(1).is_ok());
    }

    #[test]
    fn test_relaxation_requires_voronoi() {
        let mut session = MapSession::new(params());
        session.generate_perlin_noise();
        assert!(session.apply_lloyd_relaxation().is_err());

        session.generate_voronoi();
        let regions = session.apply_lloyd_relaxation().unwrap();
        assert!(!regions.is_empty());
    }

    #[test]
    fn test_session_seed_is_stable_for_explicit_seed() {
        let session = MapSession::new(params());
        assert_eq!(session.seed(), 9);
    }

    #[test]
    fn test_island_accessor_tracks_generation() {
        let mut session = MapSession::new(IslandParams {
            width: 60,
            height: 60,
            seed: 17,
            noise_limit: 0.05,
            persistence: 0.5,
            ..IslandParams::default()
        });
        assert!(session.island().is_none());
        session.generate_island().unwrap();
        assert!(session.island().is_some());
    }
}
