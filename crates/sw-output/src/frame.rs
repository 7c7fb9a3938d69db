//! Grid → RGB frame adapters for the video sink.

use image::{Rgba, RgbaImage};

use sw_sim::Grid3;

use crate::{HashMap, OutputError, OutputResult};

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];

/// Repeating categorical palette.
const PALETTE: [Rgb; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

/// Converts one grid snapshot into an RGBA image of the same size.
pub enum FrameAdapter {
    /// Output channel `c` shows layer `sources[c]` (if any), scaled linearly
    /// from `limits[c]` onto 0–255.
    Channels {
        sources: [Option<usize>; 3],
        limits:  [(f64, f64); 3],
    },
    /// Stable palette colour per positive id, `background` for ids ≤ 0.
    ColorCycle {
        background: Rgb,
        assigned:   HashMap<i64, Rgb>,
        next:       usize,
    },
}

impl FrameAdapter {
    /// `rgb_indices[c]` is the layer shown on output channel `c`.
    pub fn channels(rgb_indices: [usize; 3], limits: [(f64, f64); 3]) -> Self {
        FrameAdapter::Channels { sources: rgb_indices.map(Some), limits }
    }

    pub fn color_cycle(background: Rgb) -> Self {
        FrameAdapter::ColorCycle { background, assigned: HashMap::default(), next: 0 }
    }

    pub fn render(&mut self, grid: &Grid3) -> OutputResult<RgbaImage> {
        let (width, height) = (grid.width() as u32, grid.height() as u32);
        match self {
            FrameAdapter::Channels { sources, limits } => {
                if let Some(&bad) = sources.iter().flatten().find(|&&l| l >= grid.layers()) {
                    return Err(OutputError::Shape(format!(
                        "channel source layer {bad} out of range for {} layers",
                        grid.layers()
                    )));
                }
                Ok(RgbaImage::from_fn(width, height, |x, y| {
                    let mut px = [0u8, 0, 0, 255];
                    for c in 0..3 {
                        if let Some(layer) = sources[c] {
                            px[c] = scale(grid.get(layer, y as usize, x as usize), limits[c]);
                        }
                    }
                    Rgba(px)
                }))
            }
            FrameAdapter::ColorCycle { background, assigned, next } => {
                let mut img = RgbaImage::new(width, height);
                for (x, y, px) in img.enumerate_pixels_mut() {
                    let id = grid.get(0, y as usize, x as usize);
                    let [r, g, b] = if id <= 0 {
                        *background
                    } else {
                        *assigned.entry(id).or_insert_with(|| {
                            let colour = PALETTE[*next % PALETTE.len()];
                            *next += 1;
                            colour
                        })
                    };
                    *px = Rgba([r, g, b, 255]);
                }
                Ok(img)
            }
        }
    }

    /// Colour assigned to `id` so far, if any.
    pub fn color_of(&self, id: i64) -> Option<Rgb> {
        match self {
            FrameAdapter::ColorCycle { assigned, .. } => assigned.get(&id).copied(),
            FrameAdapter::Channels { .. } => None,
        }
    }
}

fn scale(value: i64, (lo, hi): (f64, f64)) -> u8 {
    if hi <= lo {
        return if value as f64 > lo { 255 } else { 0 };
    }
    let t = ((value as f64 - lo) / (hi - lo)).clamp(0.0, 1.0);
    (t * 255.0).round() as u8
}
