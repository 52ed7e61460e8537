//! Region data model and the discrete Voronoi partitioner.
//!
//! Region ids are dense and 0-based. Every filtering pass compacts them, so a
//! raw id is only meaningful within the stage that produced it.

pub mod partition;
pub mod seeding;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::grid::{extend_bounds, Bounds, Grid, NEIGHBORS_8};
use crate::island::Island;

pub use partition::{assign_nearest, partition};
pub use seeding::SeedPoint;

/// Region identifier; `UNASSIGNED` marks water and unowned land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u16);

impl RegionId {
    pub const UNASSIGNED: RegionId = RegionId(u16::MAX);

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        RegionId(index as u16)
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_assigned() {
            fmt::Display::fmt(&self.0, f)
        } else {
            f.pad("unassigned")
        }
    }
}

/// Administrative data attached to a region by refinement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct County {
    pub name: String,
    /// Settlement site; `None` only for a region left with no cells
    pub settlement: Option<(usize, usize)>,
}

/// One partition of the land.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Region {
    pub id: RegionId,
    /// The seed point this region grew from
    pub seed: SeedPoint,
    pub pixels: usize,
    pub bounds: Option<Bounds>,
    /// Mean member coordinate, rounded half-up
    pub centroid: (usize, usize),
    /// Regions with a member 8-adjacent to one of ours, sorted ascending
    pub neighbors: Vec<RegionId>,
    pub county: Option<County>,
}

impl Region {
    pub fn new(id: RegionId, seed: SeedPoint) -> Self {
        Self {
            id,
            seed,
            pixels: 0,
            bounds: None,
            centroid: (seed.x, seed.y),
            neighbors: Vec::new(),
            county: None,
        }
    }

    fn add_neighbor(&mut self, other: RegionId) {
        if let Err(pos) = self.neighbors.binary_search(&other) {
            self.neighbors.insert(pos, other);
        }
    }
}

/// The region map raster together with its region records.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionLayout {
    pub region_map: Grid<RegionId>,
    pub regions: Vec<Region>,
}

impl RegionLayout {
    pub fn region_at(&self, x: usize, y: usize) -> RegionId {
        *self.region_map.get(x, y)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    fn missing(&self, id: RegionId) -> GenError {
        GenError::InconsistentRegionMap {
            id,
            regions: self.regions.len(),
        }
    }

    /// Cells per region id, failing on ids with no record.
    pub fn pixel_counts(&self) -> Result<Vec<usize>> {
        let mut counts = vec![0usize; self.regions.len()];
        for &id in self.region_map.as_slice() {
            if !id.is_assigned() {
                continue;
            }
            match counts.get_mut(id.index()) {
                Some(count) => *count += 1,
                None => return Err(self.missing(id)),
            }
        }
        Ok(counts)
    }

    /// Drop regions failing `keep`, unassign their cells and renumber the
    /// survivors to a dense range in their original order. Returns the number
    /// of regions removed.
    pub fn retain_regions<F>(&mut self, mut keep: F) -> Result<usize>
    where
        F: FnMut(&Region) -> bool,
    {
        let mut remap = vec![RegionId::UNASSIGNED; self.regions.len()];
        let mut kept = Vec::with_capacity(self.regions.len());
        for region in self.regions.drain(..) {
            if keep(&region) {
                remap[region.id.index()] = RegionId::from_index(kept.len());
                kept.push(region);
            }
        }
        let removed = remap.len() - kept.len();

        for cell in self.region_map.as_mut_slice() {
            if !cell.is_assigned() {
                continue;
            }
            match remap.get(cell.index()) {
                Some(&new_id) => *cell = new_id,
                None => {
                    return Err(GenError::InconsistentRegionMap {
                        id: *cell,
                        regions: remap.len(),
                    })
                }
            }
        }

        for (index, region) in kept.iter_mut().enumerate() {
            region.id = RegionId::from_index(index);
        }
        for region in &mut kept {
            region.neighbors.retain_mut(|n| match remap.get(n.index()) {
                Some(&new_id) if new_id.is_assigned() => {
                    *n = new_id;
                    true
                }
                _ => false,
            });
        }
        self.regions = kept;
        Ok(removed)
    }

    /// Recompute pixel counts, bounds, centroids and neighbor sets in one pass.
    pub fn compute_properties(&mut self) -> Result<()> {
        let size = self.region_map.size();
        let mut sums = vec![(0u64, 0u64); self.regions.len()];

        for region in &mut self.regions {
            region.pixels = 0;
            region.bounds = None;
            region.neighbors.clear();
        }

        for y in 0..size {
            for x in 0..size {
                let id = *self.region_map.get(x, y);
                if !id.is_assigned() {
                    continue;
                }
                if id.index() >= self.regions.len() {
                    return Err(self.missing(id));
                }

                let region = &mut self.regions[id.index()];
                region.pixels += 1;
                extend_bounds(&mut region.bounds, x, y);
                sums[id.index()].0 += x as u64;
                sums[id.index()].1 += y as u64;

                for (dx, dy) in NEIGHBORS_8 {
                    if let Some(&other) = self.region_map.get_signed(x as i64 + dx, y as i64 + dy) {
                        if other.is_assigned() && other != id {
                            region.add_neighbor(other);
                        }
                    }
                }
            }
        }

        for (region, &(sx, sy)) in self.regions.iter_mut().zip(&sums) {
            if region.pixels > 0 {
                region.centroid = (
                    round_half_up(sx as f64 / region.pixels as f64),
                    round_half_up(sy as f64 / region.pixels as f64),
                );
            }
        }

        Ok(())
    }

    /// Check the layout invariants against its island: water is unassigned,
    /// every assigned id has a record, and records are numbered densely.
    pub fn check_consistency(&self, island: &Island) -> Result<()> {
        for (index, region) in self.regions.iter().enumerate() {
            if region.id.index() != index {
                return Err(self.missing(region.id));
            }
        }
        for (x, y, &id) in self.region_map.iter() {
            if !id.is_assigned() {
                continue;
            }
            if id.index() >= self.regions.len() || !island.is_land(x, y) {
                return Err(self.missing(id));
            }
        }
        Ok(())
    }
}

/// Round to the nearest cell, halves toward +∞.
pub fn round_half_up(value: f64) -> usize {
    (value + 0.5).floor().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_from(rows: &[&str], regions: usize) -> RegionLayout {
        let size = rows.len();
        let mut region_map = Grid::new_with(size, RegionId::UNASSIGNED);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some(d) = c.to_digit(10) {
                    region_map.set(x, y, RegionId(d as u16));
                }
            }
        }
        let regions = (0..regions)
            .map(|i| Region::new(RegionId(i as u16), SeedPoint { id: i, x: 0, y: 0 }))
            .collect();
        RegionLayout { region_map, regions }
    }

    #[test]
    fn test_properties() {
        let mut layout = layout_from(&[
            "0011",
            "0011",
            "0022",
            "....",
        ], 3);
        layout.compute_properties().unwrap();

        let r0 = &layout.regions[0];
        assert_eq!(r0.pixels, 6);
        assert_eq!(r0.centroid, (1, 1));
        assert_eq!(r0.neighbors, vec![RegionId(1), RegionId(2)]);
        assert_eq!(r0.bounds, Some(Bounds { min_x: 0, min_y: 0, max_x: 1, max_y: 2 }));

        let r1 = &layout.regions[1];
        assert_eq!(r1.pixels, 4);
        // mean x = 2.5 rounds up
        assert_eq!(r1.centroid, (3, 1));
        assert_eq!(r1.neighbors, vec![RegionId(0), RegionId(2)]);
    }

    #[test]
    fn test_retain_compacts_ids() {
        let mut layout = layout_from(&[
            "0011",
            "0011",
            "2233",
            "2233",
        ], 4);
        layout.compute_properties().unwrap();
        let removed = layout.retain_regions(|r| r.id != RegionId(1)).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(layout.regions.len(), 3);
        assert_eq!(layout.region_at(2, 0), RegionId::UNASSIGNED);
        assert_eq!(layout.region_at(0, 2), RegionId(1));
        assert_eq!(layout.region_at(3, 3), RegionId(2));
        for (i, region) in layout.regions.iter().enumerate() {
            assert_eq!(region.id.index(), i);
        }
        // Old region 3 (now 2) keeps its surviving neighbors, renumbered.
        assert_eq!(layout.regions[2].neighbors, vec![RegionId(0), RegionId(1)]);
    }

    #[test]
    fn test_dangling_id_is_reported() {
        let mut layout = layout_from(&[
            "00",
            "05",
        ], 1);
        assert!(matches!(
            layout.compute_properties(),
            Err(GenError::InconsistentRegionMap { id: RegionId(5), regions: 1 })
        ));
        assert!(layout.pixel_counts().is_err());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(RegionId(4).to_string(), "4");
        assert_eq!(RegionId::UNASSIGNED.to_string(), "unassigned");
    }
}
