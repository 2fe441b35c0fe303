//! Island map generation library
//!
//! Builds a single-landmass island from layered Perlin noise, partitions it
//! into regions with a relaxed Voronoi diagram, randomizes the region
//! borders, and assigns biomes. Re-exports modules for use by binaries and
//! tools.

pub mod automata;
pub mod autotile;
pub mod biomes;
pub mod border;
pub mod error;
pub mod export;
pub mod generator;
pub mod islands;
pub mod mask;
pub mod noise_field;
pub mod regions;
pub mod relax;
pub mod seeds;
pub mod session;
pub mod tilemap;
pub mod topology;
pub mod voronoi;

pub use error::GenError;
pub use generator::{generate_island, IslandMap, IslandParams};
