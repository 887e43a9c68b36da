//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::buffer::RenderBuffer;

/// Generation parameters embedded in an exported PNG as tEXt chunks, so a
/// finished poster still records how it was made.
#[derive(Debug, Clone)]
pub enum ExportMetadata {
    ChaosGame {
        corners: [(f64, f64); 3],
        iterations: usize,
        seed: Option<u64>,
    },
    NewtonBasins {
        degree: u32,
        x_bounds: (f64, f64),
        y_bounds: (f64, f64),
        resolution: u32,
        max_iterations: u32,
        tolerance: f64,
        layer: &'static str,
    },
}

impl ExportMetadata {
    fn description(&self) -> String {
        match self {
            Self::ChaosGame {
                corners,
                iterations,
                seed,
            } => {
                let mut desc = format!(
                    "Sierpinski chaos game - corners {:?}, {} iterations",
                    corners, iterations
                );
                if let Some(seed) = seed {
                    desc.push_str(&format!(", seed {seed}"));
                }
                desc
            }
            Self::NewtonBasins {
                degree,
                resolution,
                max_iterations,
                tolerance,
                layer,
                ..
            } => format!(
                "Newton {layer} for z^{degree} - 1, {resolution}x{resolution} grid, \
                 max {max_iterations} sweeps, tolerance {tolerance}"
            ),
        }
    }

    fn pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::ChaosGame {
                corners,
                iterations,
                seed,
            } => {
                let mut pairs = vec![
                    ("motiv.Engine".into(), "ChaosGame".into()),
                    ("motiv.Iterations".into(), iterations.to_string()),
                ];
                for (i, (x, y)) in corners.iter().enumerate() {
                    pairs.push((format!("motiv.Corner{}", i + 1), format!("{x} {y}")));
                }
                if let Some(seed) = seed {
                    pairs.push(("motiv.Seed".into(), seed.to_string()));
                }
                pairs
            }
            Self::NewtonBasins {
                degree,
                x_bounds,
                y_bounds,
                resolution,
                max_iterations,
                tolerance,
                layer,
            } => vec![
                ("motiv.Engine".into(), "NewtonBasins".into()),
                ("motiv.Layer".into(), (*layer).into()),
                ("motiv.Degree".into(), degree.to_string()),
                (
                    "motiv.XBounds".into(),
                    format!("{} {}", x_bounds.0, x_bounds.1),
                ),
                (
                    "motiv.YBounds".into(),
                    format!("{} {}", y_bounds.0, y_bounds.1),
                ),
                ("motiv.Resolution".into(), resolution.to_string()),
                ("motiv.MaxIterations".into(), max_iterations.to_string()),
                ("motiv.Tolerance".into(), tolerance.to_string()),
            ],
        }
    }
}

/// Write an RGBA buffer as a PNG file with embedded generation metadata.
///
/// Uses the `png` crate directly to inject custom tEXt chunks readable by
/// exiftool and most image viewers.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "motiv".to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "exported PNG"
    );
    Ok(())
}
