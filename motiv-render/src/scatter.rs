use motiv_core::{Aabb, Grid2, Point};
use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Fraction of the frame's extent added on every side, so corner points do
/// not sit exactly on the image edge.
pub const DEFAULT_PADDING: f64 = 0.03;

/// Per-hit darkening step. A bin goes fully black after four hits, which at
/// poster-scale point counts reproduces the original's "many tiny black
/// markers" look while still shading sparse regions lighter.
const SHADE_PER_HIT: u32 = 64;

/// Bin a point sequence into a hit-count grid over `frame`.
///
/// Row 0 of the grid is the *top* of the image (maximum y), matching raster
/// orientation. Points outside the frame are ignored.
pub fn bin_points(points: &[Point], frame: Aabb, size: u32) -> Grid2<u32> {
    let mut hits = Grid2::new(size as usize, size as usize, 0u32);
    if size == 0 {
        return hits;
    }
    let last = (size - 1) as f64;
    for p in points {
        let nx = normalize(p.x(), frame.min_x, frame.max_x);
        let ny = normalize(p.y(), frame.min_y, frame.max_y);
        if !(0.0..=1.0).contains(&nx) || !(0.0..=1.0).contains(&ny) {
            continue;
        }
        let col = (nx * last).round() as usize;
        let row = ((1.0 - ny) * last).round() as usize;
        hits.set(col, row, *hits.get(col, row) + 1);
    }
    hits
}

/// Position of `v` within `[lo, hi]` as a fraction. A collapsed interval
/// (degenerate point sets) maps everything to the center.
#[inline]
fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span == 0.0 {
        0.5
    } else {
        (v - lo) / span
    }
}

/// Rasterize a finished chaos-game sequence as a grayscale-on-white
/// scatter image of `size × size` pixels, framed by the triangle's padded
/// bounding box.
pub fn rasterize_scatter(
    points: &[Point],
    bounds: Aabb,
    size: u32,
) -> crate::Result<RenderBuffer> {
    if points.is_empty() {
        return Err(RenderError::EmptyPointSequence);
    }
    if size == 0 {
        return Err(RenderError::InvalidDimensions {
            width: size,
            height: size,
        });
    }

    let frame = bounds.padded(DEFAULT_PADDING);
    let hits = bin_points(points, frame, size);
    let occupied = hits.as_slice().iter().filter(|&&h| h > 0).count();
    debug!(
        points = points.len(),
        size, occupied, "scatter binning complete"
    );

    let mut buffer = RenderBuffer::white(size, size)?;
    for row in 0..size {
        for col in 0..size {
            let count = *hits.get(col as usize, row as usize);
            if count > 0 {
                let shade = 255u32.saturating_sub(count.saturating_mul(SHADE_PER_HIT)) as u8;
                buffer.set_pixel(col, row, [shade, shade, shade, 255]);
            }
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motiv_core::Triangle;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let bounds = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0)).bounding_box();
        assert!(matches!(
            rasterize_scatter(&[], bounds, 64),
            Err(RenderError::EmptyPointSequence)
        ));
    }

    #[test]
    fn single_point_darkens_one_bin() {
        let bounds = Aabb {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        let hits = bin_points(&[p(0.5, 0.5)], bounds, 9);
        assert_eq!(*hits.get(4, 4), 1);
        assert_eq!(hits.as_slice().iter().sum::<u32>(), 1);
    }

    #[test]
    fn raster_orientation_flips_y() {
        let bounds = Aabb {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        // Top of the frame (max y) lands in row 0.
        let hits = bin_points(&[p(0.0, 1.0)], bounds, 8);
        assert_eq!(*hits.get(0, 0), 1);
        // Bottom of the frame lands in the last row.
        let hits = bin_points(&[p(0.0, 0.0)], bounds, 8);
        assert_eq!(*hits.get(0, 7), 1);
    }

    #[test]
    fn repeated_hits_saturate_to_black() {
        let bounds = Aabb {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        let points = vec![p(0.5, 0.5); 100];
        let buffer = rasterize_scatter(&points, bounds, 9).unwrap();
        // Dense bin is fully black; the untouched corner stays white.
        assert_eq!(buffer.pixel(4, 4), [0, 0, 0, 255]);
        assert_eq!(buffer.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn degenerate_frame_does_not_panic() {
        let bounds = Aabb {
            min_x: 1.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 2.0,
        };
        let buffer = rasterize_scatter(&[p(1.0, 1.0)], bounds, 16).unwrap();
        assert_eq!(buffer.width, 16);
    }
}
