use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::grid::Grid2;

/// Parameters controlling a basin computation.
///
/// The grid is square: `resolution` samples per axis, inclusive of both
/// bounds. Validation happens here so the solver itself has no failure
/// modes beyond "not computed yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonParams {
    /// Degree of the target polynomial `z^d − 1`.
    pub degree: u32,

    /// Real-axis bounds `(min, max)` of the sampled region.
    pub x_bounds: (f64, f64),

    /// Imaginary-axis bounds `(min, max)` of the sampled region.
    pub y_bounds: (f64, f64),

    /// Samples per axis; the working grid is `resolution × resolution`.
    pub resolution: u32,

    /// Maximum number of Newton sweeps before giving up on stragglers.
    pub max_iterations: u32,

    /// Convergence tolerance ε: a cell converges when `|z_new − z_old| < ε`,
    /// and is matched to a root when within ε of it.
    pub tolerance: f64,
}

impl NewtonParams {
    pub fn new(
        degree: u32,
        x_bounds: (f64, f64),
        y_bounds: (f64, f64),
        resolution: u32,
        max_iterations: u32,
        tolerance: f64,
    ) -> crate::Result<Self> {
        if degree < 1 {
            return Err(CoreError::InvalidArgument {
                reason: format!("polynomial degree must be >= 1, got {degree}"),
            });
        }
        if resolution < 1 {
            return Err(CoreError::InvalidArgument {
                reason: format!("grid resolution must be >= 1, got {resolution}"),
            });
        }
        if tolerance <= 0.0 || !tolerance.is_finite() {
            return Err(CoreError::InvalidArgument {
                reason: format!("tolerance must be positive and finite, got {tolerance}"),
            });
        }
        for (axis, (lo, hi)) in [("x", x_bounds), ("y", y_bounds)] {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(CoreError::InvalidArgument {
                    reason: format!("{axis} bounds must be finite with min < max, got ({lo}, {hi})"),
                });
            }
        }
        Ok(Self {
            degree,
            x_bounds,
            y_bounds,
            resolution,
            max_iterations,
            tolerance,
        })
    }
}

impl Default for NewtonParams {
    /// The classic `z⁴ − 1` picture over `[-2, 2]²`.
    fn default() -> Self {
        Self {
            degree: 4,
            x_bounds: (-2.0, 2.0),
            y_bounds: (-2.0, 2.0),
            resolution: 1000,
            max_iterations: 50,
            tolerance: 1e-6,
        }
    }
}

/// A polynomial with analytically known roots, supplying the ingredients of
/// the Newton update `z ← z − f(z)/f′(z)`.
///
/// Designed for static dispatch: the solver is generic over
/// `P: NewtonPolynomial` so the per-cell update inlines.
pub trait NewtonPolynomial {
    /// `f(z)`.
    fn value(&self, z: Complex) -> Complex;

    /// `f′(z)`. A zero derivative is a valid return — the division in the
    /// update then propagates a non-finite value that never converges.
    fn derivative(&self, z: Complex) -> Complex;

    /// The roots, in the order that defines basin labels `1..=len`.
    fn roots(&self) -> &[Complex];
}

/// The default family `z^d − 1`, whose roots are the d-th roots of unity
/// `e^{2πik/d}`, computed once at construction and never mutated.
#[derive(Debug, Clone)]
pub struct RootsOfUnity {
    degree: u32,
    roots: Vec<Complex>,
}

impl RootsOfUnity {
    pub fn new(degree: u32) -> crate::Result<Self> {
        if degree < 1 {
            return Err(CoreError::InvalidArgument {
                reason: format!("polynomial degree must be >= 1, got {degree}"),
            });
        }
        let roots = (0..degree)
            .map(|k| {
                Complex::from_polar(1.0, 2.0 * std::f64::consts::PI * k as f64 / degree as f64)
            })
            .collect();
        Ok(Self { degree, roots })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }
}

impl NewtonPolynomial for RootsOfUnity {
    #[inline]
    fn value(&self, z: Complex) -> Complex {
        z.powu(self.degree) - Complex::ONE
    }

    #[inline]
    fn derivative(&self, z: Complex) -> Complex {
        z.powu(self.degree - 1) * self.degree as f64
    }

    fn roots(&self) -> &[Complex] {
        &self.roots
    }
}

/// `resolution` evenly spaced samples over `[lo, hi]`, inclusive of both
/// ends. A single sample collapses to `lo`.
fn linspace((lo, hi): (f64, f64), resolution: usize) -> Vec<f64> {
    if resolution == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (resolution - 1) as f64;
    (0..resolution).map(|k| lo + step * k as f64).collect()
}

/// Applies Newton's method to every cell of a complex grid simultaneously
/// and records which root each cell converges to and when.
///
/// Labels are first-convergence-wins: once a cell is assigned a nonzero
/// label it is never overwritten. A cell that converges numerically but
/// matches no root within ε keeps label 0 on every later sweep as well —
/// the reference behavior, preserved deliberately (see the
/// `converged_but_unmatched_cell_stays_unlabeled` test).
#[derive(Debug, Clone)]
pub struct NewtonBasinSolver<P: NewtonPolynomial = RootsOfUnity> {
    params: NewtonParams,
    polynomial: P,
    basin: Option<Grid2<u32>>,
    iterations: Option<Grid2<u32>>,
}

impl NewtonBasinSolver<RootsOfUnity> {
    /// Solver for the default `z^d − 1` family given by `params.degree`.
    pub fn new(params: NewtonParams) -> crate::Result<Self> {
        let polynomial = RootsOfUnity::new(params.degree)?;
        Ok(Self::with_polynomial(params, polynomial))
    }
}

impl<P: NewtonPolynomial + Sync> NewtonBasinSolver<P> {
    /// Solver for an arbitrary polynomial with known roots. The basin label
    /// range is `1..=polynomial.roots().len()` regardless of `params.degree`.
    pub fn with_polynomial(params: NewtonParams, polynomial: P) -> Self {
        Self {
            params,
            polynomial,
            basin: None,
            iterations: None,
        }
    }

    pub fn params(&self) -> &NewtonParams {
        &self.params
    }

    pub fn polynomial(&self) -> &P {
        &self.polynomial
    }

    /// Basin labels: 0 = never converged to a root, `k` = converged to the
    /// k-th root (1-based). Fails with `InvalidState` before [`compute`](Self::compute).
    pub fn basin(&self) -> crate::Result<&Grid2<u32>> {
        self.basin.as_ref().ok_or_else(|| CoreError::InvalidState {
            reason: "basin grid read before compute()".to_string(),
        })
    }

    /// Sweep index at which each cell first converged. Meaningful only for
    /// cells with a nonzero basin label: an unconverged cell keeps 0, which
    /// is indistinguishable from "converged at sweep 0" by this grid alone.
    pub fn iteration_counts(&self) -> crate::Result<&Grid2<u32>> {
        self.iterations
            .as_ref()
            .ok_or_else(|| CoreError::InvalidState {
                reason: "iteration-count grid read before compute()".to_string(),
            })
    }

    /// Run Newton's method over the whole grid until every cell has
    /// stabilized or `max_iterations` sweeps have run.
    ///
    /// Re-running resets and recomputes both output grids; the computation
    /// is fully deterministic, so identical parameters produce identical
    /// grids. Each sweep updates rows in parallel (no cell depends on
    /// another within a sweep); sweeps themselves are strictly sequential.
    pub fn compute(&mut self) {
        let start = Instant::now();
        let r = self.params.resolution as usize;
        let tolerance = self.params.tolerance;
        let roots = self.polynomial.roots();

        let xs = linspace(self.params.x_bounds, r);
        let ys = linspace(self.params.y_bounds, r);
        let mut z = Grid2::from_fn(r, r, |col, row| Complex::new(xs[col], ys[row]));
        let mut basin = Grid2::new(r, r, 0u32);
        let mut iterations = Grid2::new(r, r, 0u32);

        let mut sweeps = 0;
        for i in 0..self.params.max_iterations {
            sweeps = i + 1;
            let polynomial = &self.polynomial;

            let all_converged = z
                .as_mut_slice()
                .par_chunks_mut(r)
                .zip(basin.as_mut_slice().par_chunks_mut(r))
                .zip(iterations.as_mut_slice().par_chunks_mut(r))
                .map(|((z_row, basin_row), iter_row)| {
                    let mut row_converged = true;
                    for ((cell, label), count) in
                        z_row.iter_mut().zip(basin_row).zip(iter_row)
                    {
                        let z_old = *cell;
                        let z_new =
                            z_old - polynomial.value(z_old) / polynomial.derivative(z_old);
                        *cell = z_new;

                        // Non-finite values (zero derivative upstream) fail
                        // this comparison forever, so the cell stays at 0.
                        if !((z_new - z_old).norm() < tolerance) {
                            row_converged = false;
                            continue;
                        }
                        if *label != 0 {
                            continue;
                        }
                        *count = i;
                        for (k, &root) in roots.iter().enumerate() {
                            if (z_new - root).norm() < tolerance {
                                *label = k as u32 + 1;
                                break;
                            }
                        }
                    }
                    row_converged
                })
                .reduce(|| true, |a, b| a && b);

            debug!(sweep = i, all_converged, "newton sweep complete");
            if all_converged {
                break;
            }
        }

        let labeled = basin.as_slice().iter().filter(|&&l| l != 0).count();
        info!(
            sweeps,
            labeled,
            cells = r * r,
            elapsed_ms = start.elapsed().as_millis(),
            "basin computation complete"
        );

        self.basin = Some(basin);
        self.iterations = Some(iterations);
    }
}
