pub mod buffer;
pub mod error;
pub mod export;
pub mod palette;
pub mod scatter;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use palette::{colorize_basins, colorize_convergence, BasinPalette};
pub use scatter::{bin_points, rasterize_scatter};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
