use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::CoreError;
use crate::point::{Point, Triangle};

/// Supplies the corner index (`0..3`) used for each jump.
///
/// This is the seam that makes chaos-game runs reproducible: production code
/// uses [`UniformPicker`]; tests inject a scripted sequence. Designed for
/// static dispatch — the generator is generic over `P: CornerPicker` rather
/// than holding a `dyn` trait object, so the hot loop stays inlineable.
pub trait CornerPicker {
    /// Next corner index. Must be in `0..3`.
    fn pick(&mut self) -> usize;
}

/// Uniform corner selection backed by a small, seedable RNG.
///
/// Each of the three corners is equally likely and picks are independent
/// across calls — in particular the previously chosen corner is *not*
/// excluded, which is a deliberate property of the algorithm.
#[derive(Debug, Clone)]
pub struct UniformPicker {
    rng: SmallRng,
}

impl UniformPicker {
    /// Picker with a fixed seed; two pickers with equal seeds yield
    /// identical pick sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl CornerPicker for UniformPicker {
    #[inline]
    fn pick(&mut self) -> usize {
        self.rng.gen_range(0..3)
    }
}

/// The chaos game: repeatedly jump halfway toward a randomly chosen corner
/// of a triangle, recording every visited point. For almost every corner
/// sequence the recorded set approximates the Sierpinski attractor.
///
/// State is exclusively owned by the run driving it; independent runs are
/// embarrassingly parallel (one generator per worker, nothing shared).
#[derive(Debug, Clone)]
pub struct ChaosGame<P: CornerPicker = UniformPicker> {
    triangle: Triangle,
    picker: P,
    current: Option<Point>,
    points: Vec<Point>,
}

impl ChaosGame<UniformPicker> {
    /// Generator with a seeded corner source; fully reproducible.
    pub fn seeded(triangle: Triangle, seed: u64) -> Self {
        Self::with_picker(triangle, UniformPicker::seeded(seed))
    }

    pub fn from_entropy(triangle: Triangle) -> Self {
        Self::with_picker(triangle, UniformPicker::from_entropy())
    }
}

impl<P: CornerPicker> ChaosGame<P> {
    pub fn with_picker(triangle: Triangle, picker: P) -> Self {
        Self {
            triangle,
            picker,
            current: None,
            points: Vec::new(),
        }
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Points recorded so far, in generation order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Select a random corner as the starting point.
    ///
    /// Begins a fresh run: any previously recorded points are discarded.
    /// The starting corner itself is not recorded as a sample.
    pub fn start(&mut self) -> Point {
        let corner = self.triangle.corner(self.picker.pick());
        self.current = Some(corner);
        self.points.clear();
        corner
    }

    /// Jump halfway toward a freshly picked corner and record the landing
    /// point. Fails with `InvalidState` if `start()` has not been called.
    pub fn step(&mut self) -> crate::Result<Point> {
        let current = self.current.ok_or_else(|| CoreError::InvalidState {
            reason: "step() called before start()".to_string(),
        })?;
        let corner = self.triangle.corner(self.picker.pick());
        let next = Point::midpoint(current, corner);
        self.current = Some(next);
        self.points.push(next);
        Ok(next)
    }

    /// Run the full game: `start()` once, then `step()` exactly `n` times.
    ///
    /// Returns the recorded sequence, whose length is exactly `n` — the
    /// starting corner is not a sample.
    pub fn run(&mut self, n: usize) -> crate::Result<&[Point]> {
        let start = self.start();
        debug!(n, start = %start, "chaos game starting");
        for _ in 0..n {
            self.step()?;
        }
        Ok(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays back a fixed corner-index sequence, then panics if exhausted.
    struct Scripted {
        picks: std::vec::IntoIter<usize>,
    }

    impl Scripted {
        fn new(picks: Vec<usize>) -> Self {
            Self {
                picks: picks.into_iter(),
            }
        }
    }

    impl CornerPicker for Scripted {
        fn pick(&mut self) -> usize {
            self.picks.next().expect("scripted picks exhausted")
        }
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn unit_triangle() -> Triangle {
        Triangle::new(p(1.0, 1.0), p(2.0, 3.0f64.sqrt()), p(3.0, 1.0))
    }

    #[test]
    fn step_before_start_is_invalid_state() {
        let mut game = ChaosGame::seeded(unit_triangle(), 1);
        let err = game.step().unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
    }

    #[test]
    fn run_yields_exactly_n_points() {
        let mut game = ChaosGame::seeded(unit_triangle(), 42);
        assert_eq!(game.run(0).unwrap().len(), 0);
        assert_eq!(game.run(1).unwrap().len(), 1);
        assert_eq!(game.run(1000).unwrap().len(), 1000);
    }

    #[test]
    fn points_stay_inside_corner_bounding_box() {
        let triangle = unit_triangle();
        let bb = triangle.bounding_box();
        let mut game = ChaosGame::seeded(triangle, 7);
        for &point in game.run(5000).unwrap() {
            assert!(bb.contains(point), "{point} escaped the hull");
        }
    }

    #[test]
    fn equal_seeds_reproduce_the_sequence() {
        let mut a = ChaosGame::seeded(unit_triangle(), 123);
        let mut b = ChaosGame::seeded(unit_triangle(), 123);
        assert_eq!(a.run(500).unwrap(), b.run(500).unwrap());

        let mut c = ChaosGame::seeded(unit_triangle(), 124);
        assert_ne!(a.points(), c.run(500).unwrap());
    }

    #[test]
    fn scripted_run_matches_hand_computation() {
        // Corners (1,1), (2,√3), (3,1); start at corner 1, then jump toward
        // corners 2, 1, 3, 2, 1. Each landing point is computable by hand
        // with the min + |a−b|/2 midpoint; x-coordinates are exact dyadics.
        let s3 = 3.0f64.sqrt();
        let picks = Scripted::new(vec![0, 1, 0, 2, 1, 0]);
        let mut game = ChaosGame::with_picker(unit_triangle(), picks);
        let points = game.run(5).unwrap().to_vec();

        let y1 = 1.0 + (s3 - 1.0) / 2.0;
        let y2 = 1.0 + (y1 - 1.0) / 2.0;
        let y3 = 1.0 + (y2 - 1.0) / 2.0;
        let y4 = y3 + (s3 - y3) / 2.0;
        let y5 = 1.0 + (y4 - 1.0) / 2.0;
        let expected = [
            p(1.5, y1),
            p(1.25, y2),
            p(2.125, y3),
            p(2.0625, y4),
            p(1.53125, y5),
        ];
        assert_eq!(points, expected);
    }

    #[test]
    fn start_resets_the_sequence() {
        let mut game = ChaosGame::seeded(unit_triangle(), 9);
        game.run(10).unwrap();
        game.start();
        assert!(game.points().is_empty());
        game.step().unwrap();
        assert_eq!(game.points().len(), 1);
    }

    #[test]
    fn degenerate_triangle_stays_on_its_line() {
        // Collinear corners are accepted; the output collapses onto the line.
        let t = Triangle::new(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0));
        let mut game = ChaosGame::seeded(t, 5);
        for &point in game.run(200).unwrap() {
            assert!((point.x() - point.y()).abs() < 1e-12);
        }
    }
}
