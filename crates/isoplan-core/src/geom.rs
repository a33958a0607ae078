use serde::{Deserialize, Serialize};

/// 2×2 linear transform. Translation is never baked in; it is added at draw time.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Below this x-extent a segment is treated as vertical (no usable line equation).
pub const VERTICAL_EPSILON: f64 = 0.1;

/// Points closer than this are equal; overlaps narrower than this carry no ordering information.
pub const POINT_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Shift straight down the screen, the direction walls extrude in.
    pub fn drop_by(self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn approx_eq(self, other: Vec2) -> bool {
        (self.x - other.x).abs() < POINT_EPSILON && (self.y - other.y).abs() < POINT_EPSILON
    }

    pub fn transform(self, m: &Matrix2) -> Self {
        Self::new(
            self.x * m[(0, 0)] + self.y * m[(0, 1)],
            self.x * m[(1, 0)] + self.y * m[(1, 1)],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment2 {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Parametric intersection of two finite segments.
    ///
    /// Parallel segments (zero determinant) never intersect, even when collinear.
    pub fn intersect(&self, other: &Segment2) -> Option<Vec2> {
        let dx1 = self.b.x - self.a.x;
        let dy1 = self.b.y - self.a.y;
        let dx2 = other.b.x - other.a.x;
        let dy2 = other.b.y - other.a.y;

        let det = dx1 * dy2 - dx2 * dy1;
        if det == 0.0 {
            return None;
        }

        let ox = other.a.x - self.a.x;
        let oy = other.a.y - self.a.y;
        let t1 = (ox * dy2 - oy * dx2) / det;
        let t2 = (ox * dy1 - oy * dx1) / det;

        if (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2) {
            Some(Vec2::new(self.a.x + t1 * dx1, self.a.y + t1 * dy1))
        } else {
            None
        }
    }

    pub fn x_span(&self) -> Interval {
        Interval::new(self.a.x, self.b.x)
    }
}

/// Closed 1-D range; endpoints are sorted on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(a: f64, b: f64) -> Self {
        if a < b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        if self.hi < other.lo || other.hi < self.lo {
            return None;
        }
        Some(Interval {
            lo: self.lo.max(other.lo),
            hi: self.hi.min(other.hi),
        })
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) * 0.5
    }
}

/// Linear interpolation; `t` outside `[0, 1]` extrapolates.
pub fn interpolate(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

pub fn rotation_matrix(angle_deg: f64) -> Matrix2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Matrix2::new(cos, -sin, sin, cos)
}

/// Isometric shear for a camera tilted by `angle_deg`, clamped to `[0, 90]`.
pub fn isometric_matrix(angle_deg: f64) -> Matrix2 {
    let (sin, cos) = angle_deg.clamp(0.0, 90.0).to_radians().sin_cos();
    Matrix2::new(cos, -cos, sin, sin)
}

pub fn scale_matrix(factor: f64) -> Matrix2 {
    Matrix2::new(factor, 0.0, 0.0, factor)
}

/// `m1 · m2`: applying the result equals applying `m2` first, then `m1`.
pub fn compose(m1: &Matrix2, m2: &Matrix2) -> Matrix2 {
    m1 * m2
}

pub fn transform_points(points: &mut [Vec2], m: &Matrix2) {
    for p in points {
        *p = p.transform(m);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include_point(*p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }
}
