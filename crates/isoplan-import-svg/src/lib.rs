//! Floor-plan SVG import.
//!
//! The top-level groups are identified by id: `plan` holds the `outline` and
//! `interior` shapes, `room`/`rooms` holds one shape per room (nested groups
//! allowed), and `features` holds a `doors` group of door markers.

use anyhow::{Context, Result};
use isoplan_core::geom::Vec2;
use isoplan_core::model::{DoorMarker, FloorPlan, Room};
use roxmltree::{Document, Node};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// SVG user units per plan unit.
    pub px_per_unit: f64,
    /// Line segments used to approximate each curve in a path.
    pub curve_segments: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            px_per_unit: 1.25,
            curve_segments: 8,
        }
    }
}

pub fn import_svg(path: &Path, cfg: &ImportConfig) -> Result<FloorPlan> {
    let xml = std::fs::read_to_string(path).with_context(|| format!("read SVG: {path:?}"))?;
    parse_svg(&xml, cfg).with_context(|| format!("import floor plan: {path:?}"))
}

pub fn parse_svg(xml: &str, cfg: &ImportConfig) -> Result<FloorPlan> {
    let doc = Document::parse(xml).context("parse SVG XML")?;
    let svg = doc
        .descendants()
        .find(|n| n.has_tag_name("svg"))
        .context("no <svg> root element")?;

    let mut importer = Importer {
        cfg,
        plan: FloorPlan::default(),
    };
    let root_tx = parse_transform(svg.attribute("transform"));

    let mut features = None;
    for group in svg.children().filter(|n| n.is_element()) {
        if !group.has_tag_name("g") {
            continue;
        }
        let tx = root_tx.mul(parse_transform(group.attribute("transform")));
        match clean_id(group).as_str() {
            "plan" => importer.plan_group(group, tx),
            "room" | "rooms" => importer.room_group(group, tx),
            "features" => features = Some((group, tx)),
            other => tracing::warn!(group = other, "unknown group name"),
        }
    }

    // Doors are resolved against walls, so they come after every wall source.
    if let Some((features, tx)) = features {
        for group in features.children().filter(|n| n.has_tag_name("g")) {
            let tx = tx.mul(parse_transform(group.attribute("transform")));
            match clean_id(group).as_str() {
                "doors" => importer.door_group(group, tx),
                other => tracing::warn!(group = other, "unknown feature group name"),
            }
        }
    }

    if importer.plan.outline.is_none() {
        tracing::warn!("floor plan has no outline; centring on the room walls instead");
    }
    Ok(importer.plan)
}

struct Importer<'c> {
    cfg: &'c ImportConfig,
    plan: FloorPlan,
}

impl Importer<'_> {
    fn plan_group(&mut self, group: Node<'_, '_>, parent_tx: Transform2D) {
        for el in group.children().filter(|n| n.is_element()) {
            let id = clean_id(el);
            let tx = parent_tx.mul(parse_transform(el.attribute("transform")));
            match id.as_str() {
                "outline" => {
                    if let Some(points) =
                        self.shape_points(el, tx, &["path", "polygon", "polyline", "rect"], &id)
                    {
                        tracing::info!(points = points.len(), "adding outline");
                        self.plan.outline = Some(points);
                    }
                }
                "interior" => {
                    if let Some(points) = self.shape_points(el, tx, &["path"], &id) {
                        tracing::info!(points = points.len(), "adding interior");
                        self.plan.interior = Some(points);
                    }
                }
                _ => {}
            }
        }
    }

    fn room_group(&mut self, group: Node<'_, '_>, parent_tx: Transform2D) {
        for el in group.children().filter(|n| n.is_element()) {
            let id = clean_id(el);
            let tx = parent_tx.mul(parse_transform(el.attribute("transform")));
            if el.has_tag_name("g") {
                tracing::info!(group = %id, "adding room group");
                self.room_group(el, tx);
            } else if let Some(points) =
                self.shape_points(el, tx, &["polygon", "polyline", "rect"], &id)
            {
                tracing::info!(room = %id, "adding room");
                self.plan.rooms.push(Room { id, points });
            }
        }
    }

    fn door_group(&mut self, group: Node<'_, '_>, parent_tx: Transform2D) {
        for el in group.children().filter(|n| n.is_element()) {
            let id = clean_id(el);
            let tx = parent_tx.mul(parse_transform(el.attribute("transform")));
            if let Some(points) = self.shape_points(el, tx, &["polygon", "polyline", "rect"], &id) {
                self.plan.door_markers.push(DoorMarker { id, points });
            }
        }
    }

    fn shape_points(
        &self,
        el: Node<'_, '_>,
        tx: Transform2D,
        accepted: &[&str],
        id: &str,
    ) -> Option<Vec<Vec2>> {
        let tag = el.tag_name().name();
        if !accepted.contains(&tag) {
            tracing::warn!(element = id, shape = tag, accepted = ?accepted, "invalid shape type; skipped");
            return None;
        }

        let raw = match tag {
            "rect" => parse_rect(el),
            "polygon" => parse_points(el).map(|mut pts| {
                if let Some(first) = pts.first().copied() {
                    pts.push(first);
                }
                pts
            }),
            "polyline" => parse_points(el),
            "path" => el
                .attribute("d")
                .map(|d| flatten_path(d, self.cfg.curve_segments.max(1))),
            _ => None,
        }?;

        let points: Vec<Vec2> = raw
            .into_iter()
            .map(|p| {
                let p = tx.apply_point(p);
                Vec2::new(p.x / self.cfg.px_per_unit, p.y / self.cfg.px_per_unit)
            })
            .collect();
        if points.len() < 2 {
            tracing::warn!(element = id, "shape has fewer than two points; skipped");
            return None;
        }
        Some(points)
    }
}

/// Element id with Illustrator's `_x5F` underscore escape removed.
fn clean_id(node: Node<'_, '_>) -> String {
    node.attribute("id").unwrap_or("").replace("_x5F", "")
}

fn parse_rect(node: Node<'_, '_>) -> Option<Vec<Vec2>> {
    let x = node.attribute("x").and_then(parse_len).unwrap_or(0.0);
    let y = node.attribute("y").and_then(parse_len).unwrap_or(0.0);
    let w = parse_len(node.attribute("width")?)?;
    let h = parse_len(node.attribute("height")?)?;
    Some(vec![
        Vec2::new(x, y),
        Vec2::new(x + w, y),
        Vec2::new(x + w, y + h),
        Vec2::new(x, y + h),
        Vec2::new(x, y),
    ])
}

fn parse_points(node: Node<'_, '_>) -> Option<Vec<Vec2>> {
    let points = node.attribute("points")?;
    Some(
        svgtypes::PointsParser::from(points)
            .map(|(x, y)| Vec2::new(x, y))
            .collect(),
    )
}

/// First subpath of `d` as a polyline; curves are sampled, arcs become chords.
fn flatten_path(d: &str, curve_segments: usize) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::new();
    let mut cur = Vec2::new(0.0, 0.0);
    let mut start = cur;

    let resolve = |cur: Vec2, abs: bool, x: f64, y: f64| {
        if abs {
            Vec2::new(x, y)
        } else {
            Vec2::new(cur.x + x, cur.y + y)
        }
    };

    for seg in svgtypes::PathParser::from(d) {
        let seg = match seg {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(%err, "malformed path data; keeping the points read so far");
                break;
            }
        };
        use svgtypes::PathSegment::*;
        match seg {
            MoveTo { abs, x, y } => {
                if !out.is_empty() {
                    tracing::warn!("path has several subpaths; only the first is used");
                    break;
                }
                cur = resolve(cur, abs, x, y);
                start = cur;
                out.push(cur);
            }
            LineTo { abs, x, y } => {
                cur = resolve(cur, abs, x, y);
                out.push(cur);
            }
            HorizontalLineTo { abs, x } => {
                cur = Vec2::new(if abs { x } else { cur.x + x }, cur.y);
                out.push(cur);
            }
            VerticalLineTo { abs, y } => {
                cur = Vec2::new(cur.x, if abs { y } else { cur.y + y });
                out.push(cur);
            }
            CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let c1 = resolve(cur, abs, x1, y1);
                let c2 = resolve(cur, abs, x2, y2);
                let end = resolve(cur, abs, x, y);
                for i in 1..=curve_segments {
                    out.push(cubic_at(cur, c1, c2, end, i as f64 / curve_segments as f64));
                }
                cur = end;
            }
            Quadratic { abs, x1, y1, x, y } => {
                let c = resolve(cur, abs, x1, y1);
                let end = resolve(cur, abs, x, y);
                for i in 1..=curve_segments {
                    out.push(quadratic_at(cur, c, end, i as f64 / curve_segments as f64));
                }
                cur = end;
            }
            SmoothCurveTo { abs, x, y, .. }
            | SmoothQuadratic { abs, x, y }
            | EllipticalArc { abs, x, y, .. } => {
                cur = resolve(cur, abs, x, y);
                out.push(cur);
            }
            ClosePath { .. } => {
                if out.last().is_some_and(|last| *last != start) {
                    out.push(start);
                }
                cur = start;
            }
        }
    }
    out
}

fn cubic_at(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Vec2::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

fn quadratic_at(p0: Vec2, p1: Vec2, p2: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    let (a, b, c) = (u * u, 2.0 * u * t, t * t);
    Vec2::new(
        a * p0.x + b * p1.x + c * p2.x,
        a * p0.y + b * p1.y + c * p2.y,
    )
}

fn parse_len(s: &str) -> Option<f64> {
    // Numeric prefix only; units (px/mm/etc) are ignored.
    let end = s
        .char_indices()
        .find(|&(_, ch)| !(ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].trim().parse().ok()
}

fn parse_transform(transform: Option<&str>) -> Transform2D {
    let Some(t) = transform else {
        return Transform2D::identity();
    };

    match t.parse::<svgtypes::Transform>() {
        Ok(m) => Transform2D {
            a: m.a,
            b: m.b,
            c: m.c,
            d: m.d,
            e: m.e,
            f: m.f,
        },
        Err(err) => {
            tracing::warn!(transform = t, %err, "unparseable transform; ignored");
            Transform2D::identity()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transform2D {
    // SVG affine matrix: [a c e; b d f; 0 0 1]
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform2D {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    fn apply_point(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}
