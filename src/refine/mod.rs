//! Region refinement: border smoothing, centroid recalculation and county
//! creation with settlement sites.

pub mod naming;
pub mod settlement;
pub mod smoothing;

use crate::config::SmoothingParams;
use crate::error::Result;
use crate::island::Island;
use crate::random::SeededRng;
use crate::regions::{County, RegionLayout};

pub use naming::CountyNamer;

/// Refines a partition in place. The island is read-only; the refiner owns
/// the region map for the duration of the borrow.
pub struct RegionRefiner<'a> {
    island: &'a Island,
    layout: &'a mut RegionLayout,
    smoothing: SmoothingParams,
}

impl<'a> RegionRefiner<'a> {
    pub fn new(island: &'a Island, layout: &'a mut RegionLayout) -> Self {
        Self {
            island,
            layout,
            smoothing: SmoothingParams::default(),
        }
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingParams) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Smooth, recalculate, then create counties.
    pub fn refine(&mut self, rng: &mut SeededRng) -> Result<()> {
        tracing::info!(
            target: "islandgen::refine",
            regions = self.layout.regions.len(),
            "refining regions"
        );
        self.smooth_borders();
        self.recalculate_centroids()?;
        self.create_counties(rng);
        Ok(())
    }

    pub fn smooth_borders(&mut self) {
        smoothing::smooth_borders(self.island, &mut self.layout.region_map, &self.smoothing);
    }

    /// Refresh pixel counts, centroids, bounds and neighbors from the current map.
    pub fn recalculate_centroids(&mut self) -> Result<()> {
        self.layout.compute_properties()
    }

    /// Give every region a name and a settlement site.
    pub fn create_counties(&mut self, rng: &mut SeededRng) {
        let mut namer = CountyNamer::from_stream(rng);
        let map = &self.layout.region_map;

        for region in &mut self.layout.regions {
            let settlement = match settlement::find_site(self.island, map, region) {
                Some(site) => Some(site),
                None => {
                    let fallback = settlement::fallback_site(map, region);
                    tracing::warn!(
                        target: "islandgen::refine",
                        region = %region.id,
                        fallback = ?fallback,
                        "no settlement candidate, using fallback"
                    );
                    fallback
                }
            };

            let name = namer.next_name();
            tracing::debug!(
                target: "islandgen::refine",
                region = %region.id,
                name = %name,
                settlement = ?settlement,
                pixels = region.pixels,
                "county created"
            );
            region.county = Some(County { name, settlement });
        }
    }
}

/// Refine `layout` in place against `island` with default smoothing.
pub fn refine(island: &Island, layout: &mut RegionLayout, rng: &mut SeededRng) -> Result<()> {
    RegionRefiner::new(island, layout).refine(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::regions::{assign_nearest, RegionId, SeedPoint};

    /// Two large regions split by a vertical line on a square island.
    fn two_regions() -> (Island, RegionLayout) {
        let mut mask = Grid::new_with(200, false);
        for y in 20..180 {
            for x in 20..180 {
                mask.set(x, y, true);
            }
        }
        let island = Island::from_mask(mask);
        let points = [SeedPoint { id: 0, x: 60, y: 100 }, SeedPoint { id: 1, x: 140, y: 100 }];
        let mut layout = assign_nearest(&island, &points);
        layout.compute_properties().unwrap();
        (island, layout)
    }

    #[test]
    fn test_refine_places_settlements_in_region() {
        let (island, mut layout) = two_regions();
        refine(&island, &mut layout, &mut SeededRng::new("counties")).unwrap();
        layout.check_consistency(&island).unwrap();

        let mut names = Vec::new();
        for region in &layout.regions {
            let county = region.county.as_ref().unwrap();
            let (x, y) = county.settlement.unwrap();
            assert_eq!(layout.region_at(x, y), region.id);
            assert!(island.is_land(x, y));
            names.push(county.name.clone());
        }
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let (island, mut layout) = two_regions();
        let mut refiner = RegionRefiner::new(&island, &mut layout);
        refiner.smooth_borders();
        refiner.recalculate_centroids().unwrap();
        let once = refiner.layout.clone();
        refiner.recalculate_centroids().unwrap();
        assert_eq!(*refiner.layout, once);
    }

    #[test]
    fn test_refine_deterministic() {
        let (island, mut a) = two_regions();
        let mut b = a.clone();
        refine(&island, &mut a, &mut SeededRng::new("same")).unwrap();
        refine(&island, &mut b, &mut SeededRng::new("same")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_smoothing_params_are_honored() {
        let (island, mut layout) = two_regions();
        // A two-cell sliver of region 1 deep inside region 0.
        layout.region_map.set(60, 100, RegionId(1));
        layout.region_map.set(61, 100, RegionId(1));
        let before = layout.region_map.clone();

        let still = SmoothingParams { iterations: 0, ..SmoothingParams::default() };
        RegionRefiner::new(&island, &mut layout).with_smoothing(still).smooth_borders();
        assert_eq!(layout.region_map, before);

        RegionRefiner::new(&island, &mut layout).smooth_borders();
        assert_eq!(layout.region_at(60, 100), RegionId(0));
        assert_eq!(layout.region_at(61, 100), RegionId(0));
    }

    #[test]
    fn test_refine_without_regions() {
        let island = Island::from_mask(Grid::new_with(16, false));
        let mut layout = RegionLayout {
            region_map: Grid::new_with(16, RegionId::UNASSIGNED),
            regions: Vec::new(),
        };
        refine(&island, &mut layout, &mut SeededRng::new("empty")).unwrap();
        assert!(layout.regions.is_empty());
    }
}
