//! PNG and JSON export of a generated map.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::config::MapConfig;
use crate::error::Result;
use crate::grid::NEIGHBORS_4;
use crate::island::Island;
use crate::regions::{Region, RegionLayout};

pub const OCEAN_COLOR: [u8; 3] = [0x2E, 0x86, 0xAB];
pub const LAND_COLOR: [u8; 3] = [0x8B, 0x73, 0x55];
const SETTLEMENT_COLOR: [u8; 3] = [255, 255, 255];
const SETTLEMENT_OUTLINE: [u8; 3] = [20, 20, 20];
/// Half-width of the square settlement marker
const MARKER_RADIUS: i64 = 3;

/// Hue step between consecutive regions (golden angle), so neighbors differ.
const HUE_STEP: f32 = 137.508;

/// Hue in degrees, saturation and value in `[0, 1]`, to 8-bit RGB.
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let sector = hue.rem_euclid(360.0) / 60.0;
    let value = value.clamp(0.0, 1.0);
    let chroma = value * saturation.clamp(0.0, 1.0);
    let channel = |offset: f32| {
        let k = (offset + sector) % 6.0;
        let level = value - chroma * k.min(4.0 - k).clamp(0.0, 1.0);
        (level * 255.0).round() as u8
    };
    [channel(5.0), channel(3.0), channel(1.0)]
}

/// Linear mix from `from` (t = 0) to `to` (t = 1).
fn mix(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| {
        let (a, b) = (from[i] as f32, to[i] as f32);
        (a + (b - a) * t).round() as u8
    })
}

/// Distinct color for a region index, tinted toward the land color.
pub fn region_color(index: usize) -> [u8; 3] {
    let hue = (index as f32 * HUE_STEP) % 360.0;
    mix(hsv_to_rgb(hue, 0.55, 0.85), LAND_COLOR, 0.25)
}

/// Render the land mask alone.
pub fn render_island(island: &Island) -> RgbImage {
    let size = island.size as u32;
    ImageBuffer::from_fn(size, size, |x, y| {
        if island.is_land(x as usize, y as usize) {
            Rgb(LAND_COLOR)
        } else {
            Rgb(OCEAN_COLOR)
        }
    })
}

/// Render regions over the island: each region in its own hue, borders
/// between regions darkened, settlements marked.
pub fn render_regions(island: &Island, layout: &RegionLayout) -> RgbImage {
    let mut img = render_island(island);
    let map = &layout.region_map;

    for (x, y, &id) in map.iter() {
        if !id.is_assigned() {
            continue;
        }
        let mut color = region_color(id.index());
        let on_border = NEIGHBORS_4.iter().any(|&(dx, dy)| {
            map.get_signed(x as i64 + dx, y as i64 + dy)
                .is_some_and(|&other| other.is_assigned() && other != id)
        });
        if on_border {
            color = mix(color, [0, 0, 0], 0.45);
        }
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    for region in &layout.regions {
        if let Some((sx, sy)) = region.county.as_ref().and_then(|c| c.settlement) {
            draw_marker(&mut img, sx, sy);
        }
    }

    img
}

fn draw_marker(img: &mut RgbImage, cx: usize, cy: usize) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for dy in -MARKER_RADIUS..=MARKER_RADIUS {
        for dx in -MARKER_RADIUS..=MARKER_RADIUS {
            let (x, y) = (cx as i64 + dx, cy as i64 + dy);
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            let edge = dx.abs() == MARKER_RADIUS || dy.abs() == MARKER_RADIUS;
            let color = if edge { SETTLEMENT_OUTLINE } else { SETTLEMENT_COLOR };
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

/// Export the island, with regions when available, as a PNG.
pub fn export_map_png(island: &Island, layout: Option<&RegionLayout>, path: &Path) -> Result<()> {
    let img = match layout {
        Some(layout) => render_regions(island, layout),
        None => render_island(island),
    };
    img.save(path)?;
    tracing::info!(target: "islandgen::export", path = %path.display(), "map image written");
    Ok(())
}

/// Everything about a map except its rasters.
#[derive(Debug, Serialize)]
pub struct MapMetadata<'a> {
    pub config: &'a MapConfig,
    pub island: &'a Island,
    pub regions: &'a [Region],
}

impl<'a> MapMetadata<'a> {
    pub fn new(
        config: &'a MapConfig,
        island: &'a Island,
        layout: Option<&'a RegionLayout>,
    ) -> Self {
        Self {
            config,
            island,
            regions: layout.map(|l| l.regions.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write island metrics and region records as pretty-printed JSON.
pub fn export_metadata(metadata: &MapMetadata<'_>, path: &Path) -> Result<()> {
    fs::write(path, metadata.to_json()?)?;
    tracing::info!(target: "islandgen::export", path = %path.display(), "metadata written");
    Ok(())
}
