// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Curve and arc flattening: turns the curved verbs recorded in a [`Path`]
//! into polylines, at a tolerance appropriate for the transform in effect
//! at draw time.
//!
//! Flattening is always done here, at draw time, never when the path is
//! recorded — the tolerance is defined in *device* space, so it must be
//! computed after the current transform is known.
//!
//! [`Path`]: crate::Path

use crate::point::Point;
use crate::scalar::Scalar;

/// Default flattening tolerance, in device pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

/// Minimum number of line segments used to approximate any non-zero-length
/// arc.
pub const MIN_ARC_STEPS: u32 = 8;

/// Flattens a quadratic Bezier (`p0`, control `p1`, end `p2`) into a polyline
/// and appends its points (excluding `p0`) to `out`.
///
/// Uses adaptive subdivision: stops recursing once the control point is
/// within `tolerance` of the chord (distance of the control point from the
/// line through the endpoints).
pub fn flatten_quad(p0: Point, p1: Point, p2: Point, tolerance: f32, out: &mut Vec<Point>) {
    flatten_quad_rec(p0, p1, p2, tolerance, out, 0);
}

fn flatten_quad_rec(p0: Point, p1: Point, p2: Point, tolerance: f32, out: &mut Vec<Point>, depth: u32) {
    if depth >= 24 || is_quad_flat(p0, p1, p2, tolerance) {
        out.push(p2);
        return;
    }

    let p01 = p0.ave_point(p1);
    let p12 = p1.ave_point(p2);
    let p012 = p01.ave_point(p12);

    flatten_quad_rec(p0, p01, p012, tolerance, out, depth + 1);
    flatten_quad_rec(p012, p12, p2, tolerance, out, depth + 1);
}

fn is_quad_flat(p0: Point, p1: Point, p2: Point, tolerance: f32) -> bool {
    point_line_distance(p1, p0, p2) <= tolerance
}

/// Flattens a cubic Bezier into a polyline and appends its points (excluding
/// `p0`) to `out`.
pub fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f32, out: &mut Vec<Point>) {
    flatten_cubic_rec(p0, p1, p2, p3, tolerance, out, 0);
}

fn flatten_cubic_rec(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    out: &mut Vec<Point>,
    depth: u32,
) {
    if depth >= 24 || is_cubic_flat(p0, p1, p2, p3, tolerance) {
        out.push(p3);
        return;
    }

    let p01 = p0.ave_point(p1);
    let p12 = p1.ave_point(p2);
    let p23 = p2.ave_point(p3);
    let p012 = p01.ave_point(p12);
    let p123 = p12.ave_point(p23);
    let p0123 = p012.ave_point(p123);

    flatten_cubic_rec(p0, p01, p012, p0123, tolerance, out, depth + 1);
    flatten_cubic_rec(p0123, p123, p23, p3, tolerance, out, depth + 1);
}

fn is_cubic_flat(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f32) -> bool {
    point_line_distance(p1, p0, p3) <= tolerance && point_line_distance(p2, p0, p3) <= tolerance
}

/// Perpendicular distance from `p` to the (infinite) line through `a`/`b`.
fn point_line_distance(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len.is_nearly_zero() {
        return (p - a).length();
    }
    (ab.cross(p - a)).abs() / len
}

trait AvePoint {
    fn ave_point(self, other: Point) -> Point;
}

impl AvePoint for Point {
    fn ave_point(self, other: Point) -> Point {
        Point::from_xy(self.x.ave(other.x), self.y.ave(other.y))
    }
}

/// Flattens a circular arc into a polyline, appending points to `out`.
///
/// `out` does not include the arc's start point — callers that need it
/// (e.g. to decide whether an initial `lineTo` to the arc start is needed)
/// must add it themselves.
///
/// Step count is `max(MIN_ARC_STEPS, ceil(radius_device * |delta_angle|  / k))`
/// where `k` is chosen so steps grow with apparent device-space arc length.
pub fn flatten_arc(
    center: Point,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    device_radius: f32,
    out: &mut Vec<Point>,
) {
    let delta = end_angle - start_angle;
    if delta.abs().is_nearly_zero() || radius.is_nearly_zero() {
        out.push(Point::from_xy(
            center.x + radius * start_angle.cos(),
            center.y + radius * start_angle.sin(),
        ));
        return;
    }

    // Roughly one segment per 0.5 device pixels of arc length, matching the
    // 0.25px flattening tolerance used for curves.
    let arc_len = device_radius.max(0.001) * delta.abs();
    let steps = (arc_len / 0.5).ceil().max(MIN_ARC_STEPS as f32) as u32;

    for i in 1..=steps {
        let t = start_angle + delta * (i as f32 / steps as f32);
        out.push(Point::from_xy(center.x + radius * t.cos(), center.y + radius * t.sin()));
    }
}

/// Approximates an ellipse arc (center, radii, rotation, start/end angle) as
/// a sequence of cubic Beziers, one per quadrant-sized chunk (max pi/2 per
/// curve, as is standard practice for circle-to-bezier approximation).
///
/// Used to decompose `ellipse()`/`arcTo()` at *record* time, unlike the
/// native circular-arc verb, which stays verbatim.
pub fn ellipse_to_cubics(
    center: Point,
    rx: f32,
    ry: f32,
    rotation: f32,
    start_angle: f32,
    end_angle: f32,
) -> Vec<[Point; 3]> {
    const MAX_ARC: f32 = std::f32::consts::FRAC_PI_2;

    let total = end_angle - start_angle;
    if total.is_nearly_zero() {
        return Vec::new();
    }

    let segments = (total.abs() / MAX_ARC).ceil().max(1.0) as u32;
    let step = total / segments as f32;
    let (sin_r, cos_r) = rotation.sin_cos();

    let ellipse_point = |angle: f32| -> Point {
        let (s, c) = angle.sin_cos();
        let x = rx * c;
        let y = ry * s;
        Point::from_xy(center.x + x * cos_r - y * sin_r, center.y + x * sin_r + y * cos_r)
    };

    let mut out = Vec::with_capacity(segments as usize);
    let mut angle = start_angle;
    for _ in 0..segments {
        let next = angle + step;
        // Standard 4/3*tan(step/4) magic-number control point distance for
        // approximating a circular arc with a single cubic.
        let alpha = (4.0 / 3.0) * (step / 4.0).tan();

        let p0 = ellipse_point(angle);
        let p3 = ellipse_point(next);

        let tangent0 = Point::from_xy(-rx * angle.sin(), ry * angle.cos());
        let tangent1 = Point::from_xy(-rx * next.sin(), ry * next.cos());
        let rot = |v: Point| Point::from_xy(v.x * cos_r - v.y * sin_r, v.x * sin_r + v.y * cos_r);
        let t0 = rot(tangent0);
        let t1 = rot(tangent1);

        let p1 = p0 + t0 * alpha;
        let p2 = p3 - t1 * alpha;

        out.push([p1, p2, p3]);
        angle = next;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_straight_quad_collapses_to_one_segment() {
        let mut out = Vec::new();
        flatten_quad(Point::from_xy(0.0, 0.0), Point::from_xy(5.0, 0.0), Point::from_xy(10.0, 0.0), 0.25, &mut out);
        // A degenerate (straight) quad is flat immediately.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], Point::from_xy(10.0, 0.0));
    }

    #[test]
    fn flatten_curved_quad_produces_multiple_points() {
        let mut out = Vec::new();
        flatten_quad(Point::from_xy(0.0, 0.0), Point::from_xy(50.0, 0.0), Point::from_xy(50.0, 50.0), 0.25, &mut out);
        assert!(out.len() > 1);
    }

    #[test]
    fn arc_has_minimum_step_count() {
        let mut out = Vec::new();
        flatten_arc(Point::from_xy(0.0, 0.0), 1.0, 0.0, 0.001, 1.0, &mut out);
        assert!(out.len() as u32 >= MIN_ARC_STEPS);
    }

    #[test]
    fn ellipse_full_circle_yields_at_least_four_cubics() {
        let cubics = ellipse_to_cubics(
            Point::from_xy(0.0, 0.0),
            10.0,
            10.0,
            0.0,
            0.0,
            std::f32::consts::TAU,
        );
        assert!(cubics.len() >= 4);
    }
}
