use motiv_core::Grid2;
use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Color any cell that never converged to a root. Black keeps the poison
/// set (zero-derivative rays, stragglers) visually distinct from every
/// basin in the builtin palettes.
pub const UNCONVERGED_RGB: [u8; 3] = [0, 0, 0];

/// One color per root, indexed by basin label.
#[derive(Debug, Clone)]
pub struct BasinPalette {
    pub name: &'static str,
    colors: Vec<[u8; 3]>,
}

impl BasinPalette {
    /// Evenly spaced gray levels, light to dark — the quiet, print-friendly
    /// look of the original posters.
    pub fn grayscale(roots: usize) -> Self {
        let colors = (0..roots)
            .map(|k| {
                // Keep away from both extremes so labels never collide with
                // the white background or the unconverged black.
                let level = 220 - (170 * k / roots.max(1)) as i32;
                let level = level.clamp(40, 220) as u8;
                [level, level, level]
            })
            .collect();
        Self {
            name: "grayscale",
            colors,
        }
    }

    /// Evenly spaced hues around the color wheel, one per root.
    pub fn spectrum(roots: usize) -> Self {
        let colors = (0..roots)
            .map(|k| hsv_to_rgb(k as f64 / roots.max(1) as f64, 0.65, 0.85))
            .collect();
        Self {
            name: "spectrum",
            colors,
        }
    }

    pub fn roots(&self) -> usize {
        self.colors.len()
    }

    /// Color for a basin label; 0 and out-of-range labels map to the
    /// unconverged color.
    #[inline]
    pub fn color(&self, label: u32) -> [u8; 3] {
        match label {
            0 => UNCONVERGED_RGB,
            k => self
                .colors
                .get(k as usize - 1)
                .copied()
                .unwrap_or(UNCONVERGED_RGB),
        }
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h6 = (h.fract() * 6.0).clamp(0.0, 6.0);
    let c = v * s;
    let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

/// Map a basin-label grid through a palette into an RGBA image.
///
/// Rows are colored in parallel; the grid is read-only by this point, so
/// the work is embarrassingly parallel.
pub fn colorize_basins(basin: &Grid2<u32>, palette: &BasinPalette) -> crate::Result<RenderBuffer> {
    let (width, height) = (basin.width(), basin.height());
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: width as u32,
            height: height as u32,
        });
    }

    let pixels: Vec<u8> = basin
        .as_slice()
        .par_chunks(width)
        .flat_map_iter(|row| {
            row.iter().flat_map(move |&label| {
                let [r, g, b] = palette.color(label);
                [r, g, b, 255]
            })
        })
        .collect();

    Ok(RenderBuffer {
        width: width as u32,
        height: height as u32,
        pixels,
    })
}

/// Map an iteration-count grid to a grayscale image, white (fast) to black
/// (slow), normalized to the observed maximum — the original's
/// convergence-rate figure.
pub fn colorize_convergence(counts: &Grid2<u32>) -> crate::Result<RenderBuffer> {
    let (width, height) = (counts.width(), counts.height());
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: width as u32,
            height: height as u32,
        });
    }

    let max = counts.as_slice().iter().copied().max().unwrap_or(0).max(1);
    let pixels: Vec<u8> = counts
        .as_slice()
        .par_chunks(width)
        .flat_map_iter(|row| {
            row.iter().flat_map(move |&count| {
                let shade = 255 - (count as u64 * 255 / max as u64) as u8;
                [shade, shade, shade, 255]
            })
        })
        .collect();

    Ok(RenderBuffer {
        width: width as u32,
        height: height as u32,
        pixels,
    })
}
