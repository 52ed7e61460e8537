//! One generation run: configuration, random stream and stage outputs.
//!
//! Stages run in a fixed order. The island is synthesized on construction;
//! partitioning and refinement follow on demand.

use crate::config::MapConfig;
use crate::error::{GenError, Result};
use crate::island::{generate_island, Island};
use crate::random::SeededRng;
use crate::refine::RegionRefiner;
use crate::regions::{self, RegionLayout};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Island,
    Partitioned,
    Refined,
}

/// Owns everything a single map needs. Independent maps need independent sessions.
pub struct GenerationSession {
    config: MapConfig,
    rng: SeededRng,
    island: Island,
    layout: Option<RegionLayout>,
    stage: Stage,
}

impl GenerationSession {
    /// Validate the configuration and synthesize the island.
    pub fn new(config: MapConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = SeededRng::new(&config.seed);
        tracing::info!(
            target: "islandgen::session",
            seed = %config.seed,
            state = rng.initial_state(),
            size = config.map_size,
            "starting generation"
        );

        let island = generate_island(&config, &mut rng);
        Ok(Self {
            config,
            rng,
            island,
            layout: None,
            stage: Stage::Island,
        })
    }

    /// Partition the island into regions. Repeated calls return the existing layout.
    pub fn partition(&mut self) -> Result<&RegionLayout> {
        if self.layout.is_none() {
            let layout = regions::partition(&self.island, &mut self.rng, &self.config.regions)?;
            self.layout = Some(layout);
            self.stage = Stage::Partitioned;
        }
        self.layout.as_ref().ok_or(GenError::StageOrder)
    }

    /// Refine the partition. Fails if `partition` has not run yet.
    pub fn refine(&mut self) -> Result<&RegionLayout> {
        let layout = self.layout.as_mut().ok_or(GenError::StageOrder)?;
        if self.stage == Stage::Partitioned {
            RegionRefiner::new(&self.island, layout)
                .with_smoothing(self.config.smoothing.clone())
                .refine(&mut self.rng)?;
            self.stage = Stage::Refined;
        }
        Ok(layout)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn island(&self) -> &Island {
        &self.island
    }

    /// The current region layout, if partitioning has run.
    pub fn regions(&self) -> Option<&RegionLayout> {
        self.layout.as_ref()
    }

    pub fn is_refined(&self) -> bool {
        self.stage == Stage::Refined
    }

    /// Hand over the finished outputs.
    pub fn into_parts(self) -> (Island, Option<RegionLayout>) {
        (self.island, self.layout)
    }
}

/// A fully generated map.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap {
    pub config: MapConfig,
    pub island: Island,
    pub layout: RegionLayout,
}

/// Run every stage for `config`.
pub fn generate(config: MapConfig) -> Result<GeneratedMap> {
    let mut session = GenerationSession::new(config)?;
    session.partition()?;
    session.refine()?;

    let config = session.config.clone();
    let (island, layout) = session.into_parts();
    let layout = layout.ok_or(GenError::StageOrder)?;
    tracing::info!(
        target: "islandgen::session",
        regions = layout.regions.len(),
        land_cells = island.land_cells,
        "generation complete"
    );
    Ok(GeneratedMap { config, island, layout })
}
