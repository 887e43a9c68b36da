use crate::error::CoreError;

/// An immutable point in the plane.
///
/// Coordinates are validated at construction: non-finite input fails with
/// [`CoreError::InvalidArgument`]. There are no setters — an "update"
/// produces a new value, so a `Point` that exists is always valid.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Point {
    x: f64,
    y: f64,
}

/// Helper for deserialization — revalidates coordinates on load, so a
/// `Point` deserialized from untrusted data upholds the same invariant
/// as one built through [`Point::new`].
impl<'de> serde::Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Point::new(raw.x, raw.y).map_err(serde::de::Error::custom)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> crate::Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::InvalidArgument {
                reason: format!("point coordinates must be finite, got ({x}, {y})"),
            });
        }
        Ok(Self { x, y })
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// The point exactly halfway between `a` and `b`.
    ///
    /// Computed per component as `min + |a − b| / 2` rather than the naive
    /// `(a + b) / 2`. The two are mathematically equivalent for finite
    /// floats but can differ by representable-ULP amounts over very long
    /// runs; this crate standardizes on the offset-from-min form.
    #[inline]
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: midpoint_1d(a.x, b.x),
            y: midpoint_1d(a.y, b.y),
        }
    }
}

#[inline]
fn midpoint_1d(a: f64, b: f64) -> f64 {
    a.min(b) + (a - b).abs() / 2.0
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned bounding box, used for hull containment and for framing
/// the rendered scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow the box by `fraction` of its extent on every side.
    pub fn padded(&self, fraction: f64) -> Self {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// Exactly three corner points, fixed for the lifetime of a generation run.
///
/// Degenerate (collinear) corners are accepted: the chaos game then produces
/// a degenerate (collinear) point set, which is the documented behavior, not
/// something the constructor guards against.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    corners: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self { corners: [a, b, c] }
    }

    #[inline]
    pub fn corners(&self) -> &[Point; 3] {
        &self.corners
    }

    /// Corner by index; panics if `index >= 3`.
    #[inline]
    pub fn corner(&self, index: usize) -> Point {
        self.corners[index]
    }

    /// The convex hull's bounding box. Iterated points never leave it.
    pub fn bounding_box(&self) -> Aabb {
        let [a, b, c] = self.corners;
        Aabb {
            min_x: a.x.min(b.x).min(c.x),
            min_y: a.y.min(b.y).min(c.y),
            max_x: a.x.max(b.x).max(c.x),
            max_y: a.y.max(b.y).max(c.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(Point::new(f64::NAN, 0.0).is_err());
        assert!(Point::new(0.0, f64::INFINITY).is_err());
        assert!(Point::new(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn deserialization_revalidates() {
        let bad: Result<Point, _> = serde_json::from_str(r#"{"x": null, "y": 1.0}"#);
        assert!(bad.is_err());
        let good: Point = serde_json::from_str(r#"{"x": 2.0, "y": 3.0}"#).unwrap();
        assert_eq!(good, p(2.0, 3.0));
    }

    #[test]
    fn midpoint_is_symmetric() {
        let a = p(1.0, 1.0);
        let b = p(3.0, 5.0);
        assert_eq!(Point::midpoint(a, b), Point::midpoint(b, a));
        assert_eq!(Point::midpoint(a, b), p(2.0, 3.0));
    }

    #[test]
    fn midpoint_of_identical_points() {
        let a = p(-1.5, 2.5);
        assert_eq!(Point::midpoint(a, a), a);
    }

    #[test]
    fn midpoint_matches_offset_from_min_form() {
        let a = p(0.1, 7.0);
        let b = p(0.3, -2.0);
        let m = Point::midpoint(a, b);
        assert_eq!(m.x(), 0.1 + (0.1f64 - 0.3).abs() / 2.0);
        assert_eq!(m.y(), -2.0 + 9.0 / 2.0);
    }

    #[test]
    fn bounding_box_covers_all_corners() {
        let t = Triangle::new(p(1.0, 1.0), p(2.0, 3.0), p(3.0, 1.0));
        let bb = t.bounding_box();
        assert_eq!(bb.min_x, 1.0);
        assert_eq!(bb.max_x, 3.0);
        assert_eq!(bb.min_y, 1.0);
        assert_eq!(bb.max_y, 3.0);
        for &c in t.corners() {
            assert!(bb.contains(c));
        }
    }

    #[test]
    fn padded_box_grows_both_ways() {
        let t = Triangle::new(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 2.0));
        let bb = t.bounding_box().padded(0.5);
        assert_eq!(bb.min_x, -1.0);
        assert_eq!(bb.max_x, 3.0);
        assert_eq!(bb.min_y, -1.0);
        assert_eq!(bb.max_y, 3.0);
    }

    #[test]
    fn collinear_corners_are_accepted() {
        let t = Triangle::new(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0));
        assert_eq!(t.bounding_box().width(), 2.0);
    }
}
