//! Island county generator
//!
//! Synthesizes an island on a square grid, partitions its land into regions
//! and refines those regions into counties with settlement sites. The same
//! seed always produces the same map.

pub mod coherent;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod island;
pub mod random;
pub mod refine;
pub mod regions;
pub mod session;

pub use config::{IslandParams, MapConfig, RegionParams, SmoothingParams};
pub use error::{GenError, Result};
pub use island::Island;
pub use regions::{County, Region, RegionId, RegionLayout};
pub use session::{generate, GeneratedMap, GenerationSession};
