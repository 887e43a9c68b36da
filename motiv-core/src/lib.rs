pub mod chaos;
pub mod complex;
pub mod error;
pub mod grid;
pub mod newton;
pub mod point;

// Re-export primary types for convenience.
pub use chaos::{ChaosGame, CornerPicker, UniformPicker};
pub use complex::Complex;
pub use error::CoreError;
pub use grid::Grid2;
pub use newton::{NewtonBasinSolver, NewtonParams, NewtonPolynomial, RootsOfUnity};
pub use point::{Aabb, Point, Triangle};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
