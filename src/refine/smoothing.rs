//! Majority-vote smoothing of inland region borders.
//!
//! Only interior land cells that sit on a region border and have no water in
//! their 8-neighborhood are ever reassigned, so coastal cells keep the region
//! they had after partitioning.

use crate::config::SmoothingParams;
use crate::grid::{Grid, NEIGHBORS_4};
use crate::island::Island;
use crate::regions::RegionId;

/// Land cells with a 4-neighbor on land in a different region (unassigned counts).
fn is_border_cell(island: &Island, map: &Grid<RegionId>, x: usize, y: usize) -> bool {
    let current = *map.get(x, y);
    NEIGHBORS_4.iter().any(|&(dx, dy)| {
        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
        island.is_land_signed(nx, ny) && map.get_signed(nx, ny) != Some(&current)
    })
}

/// True if any 8-neighbor is water. Off-grid neighbors are ignored.
pub fn is_coastal(island: &Island, x: usize, y: usize) -> bool {
    crate::island::cleanup::has_neighbor(&island.mask, x, y, false)
}

/// Region holding at least `threshold` of the assigned land cells within
/// `radius`. Candidates are considered in first-seen scan order and must beat
/// the running best strictly.
fn majority_vote(
    island: &Island,
    map: &Grid<RegionId>,
    x: usize,
    y: usize,
    radius: i64,
    threshold: f64,
) -> Option<RegionId> {
    let mut counts: Vec<(RegionId, usize)> = Vec::new();
    let mut total = 0usize;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if !island.is_land_signed(nx, ny) {
                continue;
            }
            let Some(&id) = map.get_signed(nx, ny) else {
                continue;
            };
            if !id.is_assigned() {
                continue;
            }
            total += 1;
            match counts.iter_mut().find(|(r, _)| *r == id) {
                Some((_, count)) => *count += 1,
                None => counts.push((id, 1)),
            }
        }
    }

    let mut best = 0;
    let mut winner = None;
    for (id, count) in counts {
        if count > best && count as f64 / total as f64 >= threshold {
            best = count;
            winner = Some(id);
        }
    }
    winner
}

/// One smoothing iteration. Reads `map`, returns the replacement map and the
/// number of cells that changed region.
pub fn smooth_once(
    island: &Island,
    map: &Grid<RegionId>,
    params: &SmoothingParams,
) -> (Grid<RegionId>, usize) {
    let size = map.size();
    let mut next = map.clone();
    let mut changed = 0;

    for y in 1..size.saturating_sub(1) {
        for x in 1..size - 1 {
            if !island.is_land(x, y) {
                continue;
            }
            let current = *map.get(x, y);
            if !current.is_assigned()
                || !is_border_cell(island, map, x, y)
                || is_coastal(island, x, y)
            {
                continue;
            }
            if let Some(vote) = majority_vote(island, map, x, y, params.radius, params.threshold) {
                if vote != current {
                    next.set(x, y, vote);
                    changed += 1;
                }
            }
        }
    }

    (next, changed)
}

/// Reassign interior inland cells with no same-region 4-neighbor to the last
/// differing assigned region among those neighbors.
pub fn cleanup_isolated(island: &Island, map: &Grid<RegionId>) -> (Grid<RegionId>, usize) {
    let size = map.size();
    let mut next = map.clone();
    let mut changed = 0;

    for y in 1..size.saturating_sub(1) {
        for x in 1..size - 1 {
            if !island.is_land(x, y) {
                continue;
            }
            let current = *map.get(x, y);
            if !current.is_assigned() || is_coastal(island, x, y) {
                continue;
            }

            let mut matching = 0;
            let mut other = None;
            for (nx, ny) in map.neighbors_4(x, y) {
                if !island.is_land(nx, ny) {
                    continue;
                }
                let neighbor = *map.get(nx, ny);
                if neighbor == current {
                    matching += 1;
                } else if neighbor.is_assigned() {
                    other = Some(neighbor);
                }
            }

            if let (0, Some(replacement)) = (matching, other) {
                next.set(x, y, replacement);
                changed += 1;
            }
        }
    }

    (next, changed)
}

/// Run every smoothing iteration followed by the cleanup pass.
pub fn smooth_borders(island: &Island, map: &mut Grid<RegionId>, params: &SmoothingParams) {
    for iteration in 0..params.iterations {
        let (next, changed) = smooth_once(island, map, params);
        *map = next;
        tracing::debug!(target: "islandgen::refine", iteration, changed, "border smoothing");
    }
    let (next, changed) = cleanup_isolated(island, map);
    *map = next;
    tracing::debug!(target: "islandgen::refine", changed, "isolated cells cleaned");
}
