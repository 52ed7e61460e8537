//! Generation parameters.
//!
//! Every tunable lives here with defaults that reproduce the reference island
//! ("test123" at 1024×1024). All structs deserialize from partial JSON, with
//! missing fields falling back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::regions::RegionId;

/// Shape parameters for island synthesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandParams {
    /// Height/width bias of the dominant blob (2.0 = reference vertical island)
    pub elongation: f64,
    /// Target land fraction; radii scale with its square root (0.35 = reference)
    pub size_fraction: f64,
    /// Amplitude of the angular noise that roughens blob edges
    pub coastline_noise: f64,
    /// Octaves of the continental-scale modulation noise
    pub noise_octaves: u32,
    /// Land components smaller than this (and than 10% of the largest) are dropped
    pub min_island_cells: usize,
    /// Enclosed water bodies smaller than this are filled
    pub max_hole_cells: usize,
}

impl Default for IslandParams {
    fn default() -> Self {
        Self {
            elongation: 2.0,
            size_fraction: 0.35,
            coastline_noise: 0.40,
            noise_octaves: 4,
            min_island_cells: 100,
            max_hole_cells: 50,
        }
    }
}

/// Parameters for region partitioning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Desired number of regions
    pub target_regions: usize,
    /// Seed points placed per target region, to absorb edge/size losses
    pub size_buffer: f64,
    /// Regions with fewer cells are removed
    pub min_region_cells: usize,
    /// Fraction of the sampling stride used as random jitter (0.0-1.0)
    pub seed_jitter: f64,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            target_regions: 7,
            size_buffer: 1.5,
            min_region_cells: 2000,
            seed_jitter: 0.5,
        }
    }
}

impl RegionParams {
    /// Number of seed points to place.
    pub fn points_needed(&self) -> usize {
        (self.target_regions as f64 * self.size_buffer).ceil() as usize
    }
}

/// Border smoothing knobs for refinement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    pub iterations: usize,
    /// Chebyshev radius of the voting window
    pub radius: i64,
    /// Minimum vote share the winning region must hold
    pub threshold: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            iterations: 3,
            radius: 2,
            threshold: 0.5,
        }
    }
}

/// Complete configuration for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Edge length of the square grid
    pub map_size: usize,
    /// Seed string; identical seeds reproduce identical maps
    pub seed: String,
    pub island: IslandParams,
    pub regions: RegionParams,
    pub smoothing: SmoothingParams,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_size: 1024,
            seed: "test123".to_string(),
            island: IslandParams::default(),
            regions: RegionParams::default(),
            smoothing: SmoothingParams::default(),
        }
    }
}

/// Smallest grid that still has an interior below its boundary ring.
pub const MIN_MAP_SIZE: usize = 3;

impl MapConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.map_size < MIN_MAP_SIZE {
            return Err(invalid(format!(
                "map_size must be at least {MIN_MAP_SIZE}, got {}",
                self.map_size
            )));
        }

        let island = &self.island;
        require_positive("island.elongation", island.elongation)?;
        require_positive("island.size_fraction", island.size_fraction)?;
        if !island.coastline_noise.is_finite() || island.coastline_noise < 0.0 {
            return Err(invalid(format!(
                "island.coastline_noise must be a non-negative number, got {}",
                island.coastline_noise
            )));
        }
        if island.noise_octaves == 0 {
            return Err(invalid("island.noise_octaves must be at least 1".to_string()));
        }

        let regions = &self.regions;
        if regions.target_regions == 0 {
            return Err(invalid("regions.target_regions must be positive".to_string()));
        }
        if !regions.size_buffer.is_finite() || regions.size_buffer < 1.0 {
            return Err(invalid(format!(
                "regions.size_buffer must be at least 1.0, got {}",
                regions.size_buffer
            )));
        }
        if !(0.0..=1.0).contains(&regions.seed_jitter) {
            return Err(invalid(format!(
                "regions.seed_jitter must be within [0, 1], got {}",
                regions.seed_jitter
            )));
        }
        if regions.points_needed() >= RegionId::UNASSIGNED.0 as usize {
            return Err(invalid(format!(
                "{} seed points exceed the region id space",
                regions.points_needed()
            )));
        }

        let smoothing = &self.smoothing;
        if smoothing.radius < 1 {
            return Err(invalid(format!(
                "smoothing.radius must be at least 1, got {}",
                smoothing.radius
            )));
        }
        if !(0.0..=1.0).contains(&smoothing.threshold) {
            return Err(invalid(format!(
                "smoothing.threshold must be within [0, 1], got {}",
                smoothing.threshold
            )));
        }

        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn invalid(message: String) -> GenError {
    GenError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MapConfig::default().validate().is_ok());
        assert_eq!(RegionParams::default().points_needed(), 11);
    }

    #[test]
    fn test_rejects_zero_size() {
        let config = MapConfig { map_size: 0, ..MapConfig::default() };
        assert!(matches!(config.validate(), Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_regions() {
        let mut config = MapConfig::default();
        config.regions.target_regions = 0;
        assert!(matches!(config.validate(), Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_nan_shape() {
        let mut config = MapConfig::default();
        config.island.elongation = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "map_size": 256, "regions": { "target_regions": 4 } }"#;
        let config = MapConfig::from_json(json).unwrap();
        assert_eq!(config.map_size, 256);
        assert_eq!(config.regions.target_regions, 4);
        assert_eq!(config.regions.min_region_cells, 2000);
        assert_eq!(config.seed, "test123");
    }

    #[test]
    fn test_smoothing_from_json() {
        let config = MapConfig::from_json(r#"{ "smoothing": { "iterations": 1 } }"#).unwrap();
        assert_eq!(config.smoothing.iterations, 1);
        assert_eq!(config.smoothing.radius, 2);

        let result = MapConfig::from_json(r#"{ "smoothing": { "threshold": 1.5 } }"#);
        assert!(matches!(result, Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_validation_runs() {
        let result = MapConfig::from_json(r#"{ "map_size": 1 }"#);
        assert!(matches!(result, Err(GenError::InvalidConfig(_))));
    }
}
