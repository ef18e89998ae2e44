// Copyright 2006 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// NOTE: this is not SkPathBuilder, but a reimplementation of SkPath/SkPathBuilder
// shaped around the Canvas path command set.

use crate::path::{ArcParams, Path, PathVerb};
use crate::path_geometry;
use crate::point::Point;
use crate::rect::Rect;
use crate::scalar::Scalar;

/// Builds up a [`Path`] one command at a time, mirroring the HTML5 Canvas
/// path API.
///
/// A drawing command issued against an empty builder (or right after
/// [`close`](PathBuilder::close)) implicitly starts a new subpath with a
/// `moveTo` at the first given point, matching Canvas semantics.
#[derive(Clone, Debug)]
pub struct PathBuilder {
    verbs: Vec<PathVerb>,
    points: Vec<Point>,
    arcs: Vec<ArcParams>,
    last_move_to_index: usize,
    move_to_required: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        PathBuilder::new()
    }
}

/// Canvas's arc-sweep rule: normalizes `end_angle` against `start_angle` and
/// `ccw` by adding or subtracting a full turn when the raw angles would
/// otherwise sweep the wrong way, so a plain `end_angle - start_angle`
/// always has the sign of the requested direction.
fn normalize_arc_end(start_angle: f32, end_angle: f32, ccw: bool) -> f32 {
    if ccw {
        if end_angle > start_angle { end_angle - std::f32::consts::TAU } else { end_angle }
    } else if end_angle < start_angle {
        end_angle + std::f32::consts::TAU
    } else {
        end_angle
    }
}

impl PathBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        PathBuilder {
            verbs: Vec::new(),
            points: Vec::new(),
            arcs: Vec::new(),
            last_move_to_index: 0,
            move_to_required: true,
        }
    }

    pub(crate) fn from_storage(verbs: Vec<PathVerb>, points: Vec<Point>, arcs: Vec<ArcParams>) -> Self {
        let mut b = PathBuilder::new();
        b.verbs = verbs;
        b.points = points;
        b.arcs = arcs;
        b.verbs.clear();
        b.points.clear();
        b.arcs.clear();
        b
    }

    /// `true` if no commands have been recorded.
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    fn inject_move_to_if_needed(&mut self) {
        if self.move_to_required {
            match self.points.get(self.last_move_to_index).copied() {
                Some(p) => self.move_to(p.x, p.y),
                None => self.move_to(0.0, 0.0),
            }
        }
    }

    /// Starts a new subpath at `(x, y)`.
    ///
    /// A run of consecutive `moveTo`s collapses: only the last one is kept,
    /// matching `SkPath`'s behavior and Canvas's (a `moveTo` right after
    /// another just repositions the pending subpath start).
    pub fn move_to(&mut self, x: f32, y: f32) {
        if let Some(PathVerb::MoveTo) = self.verbs.last() {
            let idx = self.points.len() - 1;
            self.points[idx] = Point::from_xy(x, y);
        } else {
            self.last_move_to_index = self.points.len();
            self.move_to_required = false;
            self.verbs.push(PathVerb::MoveTo);
            self.points.push(Point::from_xy(x, y));
        }
    }

    /// Adds a line from the current point to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.inject_move_to_if_needed();
        self.verbs.push(PathVerb::LineTo);
        self.points.push(Point::from_xy(x, y));
    }

    /// Adds a quadratic curve from the current point through control point
    /// `(x1, y1)` to `(x, y)`.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.inject_move_to_if_needed();
        self.verbs.push(PathVerb::QuadTo);
        self.points.push(Point::from_xy(x1, y1));
        self.points.push(Point::from_xy(x, y));
    }

    /// Adds a cubic curve from the current point through control points
    /// `(x1, y1)`, `(x2, y2)` to `(x, y)`.
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.inject_move_to_if_needed();
        self.verbs.push(PathVerb::CubicTo);
        self.points.push(Point::from_xy(x1, y1));
        self.points.push(Point::from_xy(x2, y2));
        self.points.push(Point::from_xy(x, y));
    }

    /// Records a circular arc verbatim (not flattened until draw time).
    ///
    /// `start_angle`/`end_angle` are in radians, measured from the positive
    /// x axis; `ccw` selects the sweep direction, matching Canvas's
    /// `arc(x, y, radius, startAngle, endAngle, counterclockwise)`. The
    /// stored end angle is normalized against `ccw` (see
    /// [`normalize_arc_end`]) so everything downstream can just read
    /// `end_angle - start_angle` as the signed sweep.
    ///
    /// Unlike `lineTo`/`curveTo`, `arc` does *not* draw a connecting line
    /// from the current point to the arc's start — callers that want a
    /// continuous subpath (as `Context2D::arc` does) must `line_to` the
    /// arc's start point themselves first.
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32, ccw: bool) {
        self.inject_move_to_if_needed();
        let center = Point::from_xy(cx, cy);
        let end_angle = normalize_arc_end(start_angle, end_angle, ccw);
        self.verbs.push(PathVerb::ArcTo);
        self.points.push(center);
        self.arcs.push(ArcParams { center, radius, start_angle, end_angle });
    }

    /// Canvas's `arcTo(x1, y1, x2, y2, radius)`: draws the arc tangent to
    /// the two lines `(current -> (x1,y1))` and `((x1,y1) -> (x2,y2))`.
    ///
    /// Decomposed into a `lineTo` plus a native arc at record time, since
    /// both tangent points and the arc's angles are fully determined by the
    /// inputs and the current point — there is nothing left to defer to
    /// draw time.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        self.inject_move_to_if_needed();

        let p0 = self.last_point().unwrap_or(Point::from_xy(x1, y1));
        let p1 = Point::from_xy(x1, y1);
        let p2 = Point::from_xy(x2, y2);

        if radius <= 0.0 {
            self.line_to(x1, y1);
            return;
        }

        let v0 = match (p0 - p1).normalize() {
            Some(v) => v,
            None => {
                self.line_to(x1, y1);
                return;
            }
        };
        let v1 = match (p2 - p1).normalize() {
            Some(v) => v,
            None => {
                self.line_to(x1, y1);
                return;
            }
        };

        let angle = (v0.dot(v1)).clamp(-1.0, 1.0).acos();
        if angle.is_nearly_zero() || (std::f32::consts::PI - angle).is_nearly_zero() {
            self.line_to(x1, y1);
            return;
        }

        let dist = radius / (angle / 2.0).tan();
        let t0 = p1 + v0 * dist;
        let t1 = p1 + v1 * dist;

        // Center lies along both inward normals from the tangent points.
        let bisector = (v0 + v1).normalize().unwrap_or(v0);
        let half_angle = angle / 2.0;
        let center_dist = radius / half_angle.sin();
        let center = p1 + bisector * center_dist;

        let start_angle = (t0.y - center.y).atan2(t0.x - center.x);
        let end_angle = (t1.y - center.y).atan2(t1.x - center.x);
        let ccw = v0.cross(v1) > 0.0;

        self.line_to(t0.x, t0.y);
        self.arc(center.x, center.y, radius, start_angle, end_angle, ccw);
    }

    /// Canvas's `ellipse(...)`: decomposed into cubic Beziers at record
    /// time.
    pub fn ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        ccw: bool,
    ) {
        let sweep = normalize_arc_end(start_angle, end_angle, ccw);

        let cubics = path_geometry::ellipse_to_cubics(
            Point::from_xy(cx, cy),
            rx,
            ry,
            rotation,
            start_angle,
            sweep,
        );

        let (sin_r, cos_r) = rotation.sin_cos();
        let ellipse_point = |angle: f32| -> Point {
            let (s, c) = angle.sin_cos();
            let x = rx * c;
            let y = ry * s;
            Point::from_xy(cx + x * cos_r - y * sin_r, cy + x * sin_r + y * cos_r)
        };
        let start = ellipse_point(start_angle);
        self.line_to(start.x, start.y);

        for [p1, p2, p3] in cubics {
            self.cubic_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
        }
    }

    /// Adds a new, closed rectangle subpath.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close();
    }

    /// Adds a rounded-rect subpath: four straight edges and four corner
    /// arcs, as a single closed contour.
    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        let rx = rx.min(w / 2.0).max(0.0);
        let ry = ry.min(h / 2.0).max(0.0);

        if rx.is_nearly_zero() || ry.is_nearly_zero() {
            self.rect(x, y, w, h);
            return;
        }

        // Circular corners only (rx == ry), matching the native Arc verb;
        // an elliptical corner would need the ellipse-to-cubic path instead.
        let r = rx.min(ry);
        let half_pi = std::f32::consts::FRAC_PI_2;

        self.move_to(x + r, y);
        self.line_to(x + w - r, y);
        self.arc(x + w - r, y + r, r, -half_pi, 0.0, false);
        self.line_to(x + w, y + h - r);
        self.arc(x + w - r, y + h - r, r, 0.0, half_pi, false);
        self.line_to(x + r, y + h);
        self.arc(x + r, y + h - r, r, half_pi, std::f32::consts::PI, false);
        self.line_to(x, y + r);
        self.arc(x + r, y + r, r, std::f32::consts::PI, std::f32::consts::PI * 1.5, false);
        self.close();
    }

    /// Closes the current subpath with a line back to its start point.
    ///
    /// A no-op on an empty path or one that's already closed.
    pub fn close(&mut self) {
        if !self.verbs.is_empty() && self.verbs.last().copied() != Some(PathVerb::Close) {
            self.verbs.push(PathVerb::Close);
        }
        self.move_to_required = true;
    }

    /// The most recently added point, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Number of recorded verbs.
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Clears the builder's contents.
    pub fn clear(&mut self) {
        self.verbs.clear();
        self.points.clear();
        self.arcs.clear();
        self.last_move_to_index = 0;
        self.move_to_required = true;
    }

    /// Consumes the builder, producing an immutable [`Path`].
    ///
    /// Returns `None` for an empty builder.
    pub fn finish(self) -> Option<Path> {
        if self.verbs.is_empty() {
            None
        } else {
            Some(Path { verbs: self.verbs, points: self.points, arcs: self.arcs })
        }
    }
}

impl From<Rect> for Path {
    /// Builds a closed rectangular path, clockwise from the top-left.
    fn from(rect: Rect) -> Path {
        let mut b = PathBuilder::new();
        b.rect(rect.x(), rect.y(), rect.width(), rect.height());
        b.finish().expect("rect always produces a non-empty path")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_produces_no_path() {
        assert!(PathBuilder::new().finish().is_none());
    }

    #[test]
    fn line_to_on_empty_builder_injects_move_to_origin() {
        let mut pb = PathBuilder::new();
        pb.line_to(10.0, 10.0);
        let path = pb.finish().unwrap();
        assert_eq!(path.verbs(), &[PathVerb::MoveTo, PathVerb::LineTo]);
        assert_eq!(path.points()[0], Point::from_xy(0.0, 0.0));
    }

    #[test]
    fn consecutive_move_to_collapse() {
        let mut pb = PathBuilder::new();
        pb.move_to(1.0, 1.0);
        pb.move_to(2.0, 2.0);
        pb.line_to(3.0, 3.0);
        let path = pb.finish().unwrap();
        assert_eq!(path.verbs(), &[PathVerb::MoveTo, PathVerb::LineTo]);
        assert_eq!(path.points()[0], Point::from_xy(2.0, 2.0));
    }

    #[test]
    fn close_then_draw_reopens_at_last_move_to() {
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.line_to(10.0, 0.0);
        pb.close();
        pb.line_to(5.0, 5.0);
        let path = pb.finish().unwrap();
        assert_eq!(
            path.verbs(),
            &[PathVerb::MoveTo, PathVerb::LineTo, PathVerb::Close, PathVerb::MoveTo, PathVerb::LineTo]
        );
    }

    #[test]
    fn rect_is_closed_clockwise() {
        let mut pb = PathBuilder::new();
        pb.rect(0.0, 0.0, 10.0, 20.0);
        let path = pb.finish().unwrap();
        assert_eq!(
            path.verbs(),
            &[PathVerb::MoveTo, PathVerb::LineTo, PathVerb::LineTo, PathVerb::LineTo, PathVerb::Close]
        );
    }

    #[test]
    fn round_rect_has_four_arcs() {
        let mut pb = PathBuilder::new();
        pb.round_rect(0.0, 0.0, 40.0, 40.0, 8.0, 8.0);
        let path = pb.finish().unwrap();
        let arc_count = path.verbs().iter().filter(|v| **v == PathVerb::ArcTo).count();
        assert_eq!(arc_count, 4);
    }

    #[test]
    fn ccw_arc_sweeps_the_opposite_way_from_cw() {
        use std::f32::consts::FRAC_PI_2;

        let mut cw = PathBuilder::new();
        cw.arc(50.0, 50.0, 30.0, 0.0, FRAC_PI_2, false);
        let cw_path = cw.finish().unwrap();
        let cw_arc = cw_path.arc_params()[0];
        assert!((cw_arc.end_angle - cw_arc.start_angle - FRAC_PI_2).abs() < 1e-5);

        let mut ccw = PathBuilder::new();
        ccw.arc(50.0, 50.0, 30.0, 0.0, FRAC_PI_2, true);
        let ccw_path = ccw.finish().unwrap();
        let ccw_arc = ccw_path.arc_params()[0];
        // Canvas wraparound rule: ccw with end > start subtracts a full
        // turn, so this sweeps the long way around instead of matching cw.
        assert!((ccw_arc.end_angle - ccw_arc.start_angle + std::f32::consts::TAU - FRAC_PI_2).abs() < 1e-5);
        assert_ne!(cw_arc.end_angle, ccw_arc.end_angle);
    }
}
