use crate::error::{Error, Result};
use crate::feature::Feature;
use isoplan_core::geom::{Matrix2, Segment2, Vec2, POINT_EPSILON, VERTICAL_EPSILON};
use isoplan_core::report::OrderingStats;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOrder {
    Before,
    After,
    Undetermined,
}

impl RenderOrder {
    pub fn inverse(self) -> Self {
        match self {
            RenderOrder::Before => RenderOrder::After,
            RenderOrder::After => RenderOrder::Before,
            RenderOrder::Undetermined => RenderOrder::Undetermined,
        }
    }

    pub fn is_determined(self) -> bool {
        !matches!(self, RenderOrder::Undetermined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LineEquation {
    slope: f64,
    intercept: f64,
}

impl LineEquation {
    fn through(a: Vec2, b: Vec2) -> Option<Self> {
        if (a.x - b.x).abs() < VERTICAL_EPSILON {
            return None;
        }
        let slope = (b.y - a.y) / (b.x - a.x);
        Some(Self {
            slope,
            intercept: a.y - slope * a.x,
        })
    }

    fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    wall: String,
    initial: Segment2,
    pub point1: Vec2,
    pub point2: Vec2,
    line: Option<LineEquation>,
    low_y: f64,
    high_y: f64,
    pub feature: Option<Feature>,
}

impl Surface {
    fn new(id: SurfaceId, wall: &str, point1: Vec2, point2: Vec2) -> Self {
        if (point1.x - point2.x).abs() < VERTICAL_EPSILON
            && (point1.y - point2.y).abs() < VERTICAL_EPSILON
        {
            tracing::warn!(surface = %id, wall, ?point1, ?point2, "surface endpoints nearly coincide");
        }
        let mut surface = Self {
            id,
            wall: wall.to_string(),
            initial: Segment2::new(point1, point2),
            point1,
            point2,
            line: None,
            low_y: 0.0,
            high_y: 0.0,
            feature: None,
        };
        surface.update_line();
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn wall(&self) -> &str {
        &self.wall
    }

    pub fn initial(&self) -> Segment2 {
        self.initial
    }

    /// `None` when the projected segment is (near-)vertical.
    pub fn slope(&self) -> Option<f64> {
        self.line.map(|l| l.slope)
    }

    pub fn line_y(&self, x: f64) -> Option<f64> {
        self.line.map(|l| l.y_at(x))
    }

    pub fn low_y(&self) -> f64 {
        self.low_y
    }

    pub fn high_y(&self) -> f64 {
        self.high_y
    }

    pub fn segment(&self) -> Segment2 {
        Segment2::new(self.point1, self.point2)
    }

    pub fn quad(&self, offset: Vec2, height: f64) -> Vec<Vec2> {
        let p1 = self.point1.translate(offset);
        let p2 = self.point2.translate(offset);
        vec![p1, p1.drop_by(height), p2.drop_by(height), p2, p1]
    }

    fn reset(&mut self) {
        self.point1 = self.initial.a;
        self.point2 = self.initial.b;
        self.update_line();
    }

    fn transform(&mut self, m: &Matrix2) {
        self.point1 = self.point1.transform(m);
        self.point2 = self.point2.transform(m);
        self.update_line();
    }

    fn basis_translate(&mut self, by: Vec2) {
        self.initial = Segment2::new(self.initial.a.translate(by), self.initial.b.translate(by));
    }

    fn basis_scale(&mut self, factor: f64) {
        self.initial = Segment2::new(self.initial.a.scale(factor), self.initial.b.scale(factor));
    }

    fn update_line(&mut self) {
        self.line = LineEquation::through(self.point1, self.point2);
        self.low_y = self.point1.y.min(self.point2.y);
        self.high_y = self.point1.y.max(self.point2.y);
    }
}

/// Memoized pairwise relations for the current projection.
///
/// Each unordered pair is stored once, oriented from the lower id to the
/// higher; looking it up the other way round returns the inverse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOrderCache {
    entries: HashMap<(SurfaceId, SurfaceId), RenderOrder>,
}

impl RenderOrderCache {
    pub fn get(&self, a: SurfaceId, b: SurfaceId) -> Option<RenderOrder> {
        if a <= b {
            self.entries.get(&(a, b)).copied()
        } else {
            self.entries.get(&(b, a)).map(|o| o.inverse())
        }
    }

    pub fn insert(&mut self, a: SurfaceId, b: SurfaceId, order: RenderOrder) {
        if a <= b {
            self.entries.insert((a, b), order);
        } else {
            self.entries.insert((b, a), order.inverse());
        }
    }

    pub fn evict(&mut self, id: SurfaceId) {
        self.entries.retain(|&(a, b), _| a != id && b != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceSet {
    surfaces: Vec<Surface>,
    cache: RenderOrderCache,
    stats: OrderingStats,
    y_range_shortcut: bool,
}

impl Default for SurfaceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            cache: RenderOrderCache::default(),
            stats: OrderingStats::default(),
            y_range_shortcut: true,
        }
    }

    /// Disable the disjoint-y shortcut. It is only sound while every wall
    /// extrudes in the same screen direction.
    pub fn with_y_range_shortcut(mut self, enabled: bool) -> Self {
        self.y_range_shortcut = enabled;
        self
    }

    pub fn add(&mut self, wall: &str, point1: Vec2, point2: Vec2) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(Surface::new(id, wall, point1, point2));
        id
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.0)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        id.0 < self.surfaces.len()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        (0..self.surfaces.len()).map(SurfaceId).collect()
    }

    pub fn cache(&self) -> &RenderOrderCache {
        &self.cache
    }

    pub fn stats(&self) -> OrderingStats {
        self.stats
    }

    pub(crate) fn count_round(&mut self) {
        self.stats.rounds += 1;
    }

    pub fn reset(&mut self, id: SurfaceId) -> Result<()> {
        let surface = self
            .surfaces
            .get_mut(id.0)
            .ok_or(Error::UnknownSurface(id))?;
        surface.reset();
        self.cache.evict(id);
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for surface in &mut self.surfaces {
            surface.reset();
        }
        self.cache.clear();
        self.stats = OrderingStats::default();
    }

    pub fn transform_all(&mut self, m: &Matrix2) {
        for surface in &mut self.surfaces {
            surface.transform(m);
        }
    }

    pub fn rebase(&mut self, translate: Vec2, scale: f64) {
        for surface in &mut self.surfaces {
            surface.basis_translate(translate);
            surface.basis_scale(scale);
            surface.reset();
        }
        self.cache.clear();
    }

    /// Whether `a` must be painted before `b` in the current projection.
    ///
    /// Screen y grows downwards and walls hang below their top edge, so the
    /// surface whose edge sits lower on screen is nearer and paints later.
    /// Equal samples resolve to [`RenderOrder::Before`].
    pub fn is_rendered_before(&mut self, a: SurfaceId, b: SurfaceId) -> Result<RenderOrder> {
        let sa = self.surfaces.get(a.0).ok_or(Error::UnknownSurface(a))?;
        let sb = self.surfaces.get(b.0).ok_or(Error::UnknownSurface(b))?;

        if self.y_range_shortcut {
            if sa.high_y < sb.low_y {
                self.stats.fast_rejections += 1;
                return Ok(RenderOrder::Before);
            }
            if sb.high_y < sa.low_y {
                self.stats.fast_rejections += 1;
                return Ok(RenderOrder::After);
            }
        }

        if let Some(order) = self.cache.get(a, b) {
            self.stats.cache_hits += 1;
            return Ok(order);
        }

        self.stats.evaluations += 1;
        let order = compare_lines(sa, sb);
        self.cache.insert(a, b, order);
        Ok(order)
    }
}

fn compare_lines(a: &Surface, b: &Surface) -> RenderOrder {
    let (Some(line_a), Some(line_b)) = (a.line, b.line) else {
        tracing::debug!(a = %a.id, b = %b.id, "vertical segment, order undetermined");
        return RenderOrder::Undetermined;
    };

    let Some(overlap) = a.segment().x_span().overlap(&b.segment().x_span()) else {
        return RenderOrder::Undetermined;
    };

    // A shared corner is not enough to tell which wall is in front.
    if overlap.width() < POINT_EPSILON {
        return RenderOrder::Undetermined;
    }

    let x = overlap.midpoint();
    if line_a.y_at(x) > line_b.y_at(x) {
        RenderOrder::After
    } else {
        RenderOrder::Before
    }
}
