// Copyright 2008 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Based on SkStroke.cpp's overall shape (segment bodies + per-joint outer
// patch + end caps) but reworked around already-flattened polylines, since
// SWCanvas always flattens curves before stroking.

use crate::dash::StrokeDash;
use crate::point::Point;
use crate::scalar::{Scalar, SCALAR_NEARLY_ZERO};

/// Draws at the beginning and end of an open subpath.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LineCap {
    /// No extension past the endpoint.
    Butt,
    /// A semicircular cap.
    Round,
    /// A square cap extending half the line width past the endpoint.
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

/// How corners are drawn when stroking a shape.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LineJoin {
    /// Extends to the miter limit, falling back to `Bevel` past it.
    Miter,
    /// A circular arc join.
    Round,
    /// A flat triangular join connecting the two outer corners.
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// Stroke properties: width, join/cap behavior, miter limit, and dashing.
#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// Stroke thickness. Must be `>= 0`; `0` renders nothing.
    pub width: f32,
    /// Ratio limit at which a miter join falls back to bevel.
    pub miter_limit: f32,
    /// Cap style for open subpath endpoints.
    pub line_cap: LineCap,
    /// Join style for interior/closing vertices.
    pub line_join: LineJoin,
    /// Optional dash pattern.
    pub dash: Option<StrokeDash>,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            width: 1.0,
            miter_limit: 4.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            dash: None,
        }
    }
}

/// An error produced while converting a stroke to fill polygons.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StrokeError {
    /// `Stroke::width` was negative.
    NegativeWidth,
    /// `Stroke::miter_limit` was `<= 0`.
    NonPositiveMiterLimit,
}

impl std::fmt::Display for StrokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrokeError::NegativeWidth => write!(f, "stroke width must be >= 0"),
            StrokeError::NonPositiveMiterLimit => write!(f, "miter limit must be > 0"),
        }
    }
}

impl std::error::Error for StrokeError {}

const ROUND_STEP: f32 = std::f32::consts::FRAC_PI_4;

/// Converts stroked polylines into a set of filled, positively-wound
/// polygons whose union is the stroke geometry.
#[derive(Copy, Clone, Debug)]
pub struct PathStroker;

impl PathStroker {
    /// Strokes a single flattened subpath (already in the space the output
    /// polygons should be in — typically user space, transformed to device
    /// space afterward by the caller so non-uniform scale correctly shears
    /// the stroke width).
    ///
    /// Appends each output polygon to `out`. `closed` indicates the
    /// subpath was explicitly closed (`closePath`); dashing always produces
    /// open segments regardless, since a dash pattern breaks the loop.
    pub fn stroke(
        polyline: &[Point],
        closed: bool,
        stroke: &Stroke,
        out: &mut Vec<Vec<Point>>,
    ) -> Result<(), StrokeError> {
        if stroke.width < 0.0 {
            return Err(StrokeError::NegativeWidth);
        }
        if stroke.miter_limit <= 0.0 {
            return Err(StrokeError::NonPositiveMiterLimit);
        }
        if stroke.width.is_nearly_zero() {
            return Ok(());
        }

        match &stroke.dash {
            Some(dash) => {
                for segment in dash.apply(polyline, closed) {
                    stroke_open_or_closed(&segment, false, stroke, out);
                }
            }
            None => stroke_open_or_closed(polyline, closed, stroke, out),
        }

        Ok(())
    }
}

fn stroke_open_or_closed(points: &[Point], closed: bool, stroke: &Stroke, out: &mut Vec<Vec<Point>>) {
    let pts = dedupe(points);
    if pts.len() < 2 {
        return;
    }

    let hw = stroke.width.half();
    let n = pts.len();
    let edge_count = if closed { n } else { n - 1 };

    // tangent[i] is the unit direction of the edge pts[i] -> pts[(i+1) % n].
    let mut tangents: Vec<Option<Point>> = Vec::with_capacity(edge_count);
    for i in 0..edge_count {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        tangents.push((b - a).normalize());
        if let Some(t) = tangents[i] {
            emit_rect_body(a, b, t, hw, out);
        }
    }

    let joint_count = if closed { n } else { n - 2 };
    for j in 0..joint_count {
        let vertex_idx = if closed { (j + 1) % n } else { j + 1 };
        let prev_edge = j;
        let next_edge = (j + 1) % edge_count;

        if let (Some(tp), Some(tn)) = (tangents[prev_edge], tangents[next_edge]) {
            emit_join(pts[vertex_idx], tp, tn, hw, stroke, out);
        }
    }

    if !closed {
        if let Some(t0) = tangents[0] {
            emit_cap(pts[0], -t0, hw, stroke.line_cap, out);
        }
        if let Some(tl) = tangents[edge_count - 1] {
            emit_cap(pts[n - 1], tl, hw, stroke.line_cap, out);
        }
    }
}

fn dedupe(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().map_or(true, |last: &Point| (*last - p).length() > SCALAR_NEARLY_ZERO) {
            out.push(p);
        }
    }
    out
}

fn left_normal(t: Point) -> Point {
    Point::from_xy(-t.y, t.x)
}

fn emit_rect_body(p1: Point, p2: Point, t: Point, hw: f32, out: &mut Vec<Vec<Point>>) {
    let n = left_normal(t) * hw;
    push_polygon(vec![p1 + n, p2 + n, p2 - n, p1 - n], out);
}

fn emit_cap(endpoint: Point, outward: Point, hw: f32, cap: LineCap, out: &mut Vec<Vec<Point>>) {
    match cap {
        LineCap::Butt => {}
        LineCap::Square => emit_rect_body(endpoint, endpoint + outward * hw, outward, hw, out),
        LineCap::Round => {
            let n = left_normal(outward);
            let start_angle = n.y.atan2(n.x);
            let end_angle = (-n.y).atan2(-n.x);
            let fan = round_fan(endpoint, hw, start_angle, end_angle, outward);
            let mut poly = vec![endpoint];
            poly.extend(fan);
            push_polygon(poly, out);
        }
    }
}

/// Emits the outer join patch between two adjacent stroked edges. The inner
/// corner is left to the body rectangles' natural overlap (nonzero fill
/// handles the overlap without a hole).
fn emit_join(v: Point, t_prev: Point, t_next: Point, hw: f32, stroke: &Stroke, out: &mut Vec<Vec<Point>>) {
    let cross = t_prev.cross(t_next);
    let dot = t_prev.dot(t_next);

    if cross.abs().is_nearly_zero() {
        if dot > 0.0 {
            return; // collinear, body rects already meet flush.
        }
        // 180 degree reversal: degenerate cusp, bevel it arbitrarily.
        let n_prev = left_normal(t_prev) * hw;
        let n_next = left_normal(t_next) * hw;
        push_polygon(vec![v + n_prev, v + n_next, v], out);
        return;
    }

    let outer_sign = if cross > 0.0 { -1.0 } else { 1.0 };
    let n_prev = left_normal(t_prev) * (hw * outer_sign);
    let n_next = left_normal(t_next) * (hw * outer_sign);
    let prev_outer = v + n_prev;
    let next_outer = v + n_next;

    match stroke.line_join {
        LineJoin::Bevel => push_polygon(vec![prev_outer, next_outer, v], out),
        LineJoin::Round => {
            let start_angle = n_prev.y.atan2(n_prev.x);
            let end_angle = n_next.y.atan2(n_next.x);
            let outward = (n_prev + n_next).normalize().unwrap_or(n_prev);
            let mut poly = vec![v];
            poly.extend(round_fan(v, hw, start_angle, end_angle, outward));
            push_polygon(poly, out);
        }
        LineJoin::Miter => match line_intersection(prev_outer, t_prev, next_outer, t_next) {
            Some(m) if (m - v).length() / hw <= stroke.miter_limit => {
                push_polygon(vec![v, prev_outer, m, next_outer], out);
            }
            _ => push_polygon(vec![prev_outer, next_outer, v], out),
        },
    }
}

/// Intersection of line `p1 + s*d1` with line `p2 + t*d2`.
fn line_intersection(p1: Point, d1: Point, p2: Point, d2: Point) -> Option<Point> {
    let denom = d1.cross(d2);
    if denom.abs().is_nearly_zero() {
        return None;
    }
    let diff = p2 - p1;
    let s = diff.cross(d2) / denom;
    Some(p1 + d1 * s)
}

/// Points along the arc of radius `r` around `center`, from `start_angle` to
/// `end_angle`, going the way that passes through `outward` (so the fan
/// bulges away from the joint/endpoint rather than the short way round),
/// with a step no larger than pi/4.
fn round_fan(center: Point, r: f32, start_angle: f32, end_angle: f32, outward: Point) -> Vec<Point> {
    let outward_angle = outward.y.atan2(outward.x);

    let mut delta = end_angle - start_angle;
    // Normalize delta into (-2pi, 2pi], then flip to the long way around if
    // the short way doesn't pass near `outward_angle`.
    let two_pi = std::f32::consts::TAU;
    while delta <= -std::f32::consts::PI {
        delta += two_pi;
    }
    while delta > std::f32::consts::PI {
        delta -= two_pi;
    }

    let mid_angle = start_angle + delta / 2.0;
    let mid = Point::from_xy(mid_angle.cos(), mid_angle.sin());
    let outward_dir = Point::from_xy(outward_angle.cos(), outward_angle.sin());
    if mid.dot(outward_dir) < 0.0 {
        delta = if delta > 0.0 { delta - two_pi } else { delta + two_pi };
    }

    let steps = (delta.abs() / ROUND_STEP).ceil().max(1.0) as u32;
    let mut out = Vec::with_capacity(steps as usize);
    for i in 1..=steps {
        let a = start_angle + delta * (i as f32 / steps as f32);
        out.push(center + Point::from_xy(a.cos(), a.sin()) * r);
    }
    out
}

fn push_polygon(mut poly: Vec<Point>, out: &mut Vec<Vec<Point>>) {
    if poly.len() < 3 {
        return;
    }
    if signed_area(&poly) < 0.0 {
        poly.reverse();
    }
    out.push(poly);
}

fn signed_area(poly: &[Point]) -> f32 {
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}
