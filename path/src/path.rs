// Copyright 2006 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::path_builder::PathBuilder;
use crate::point::Point;
use crate::rect::Rect;
use crate::transform::Transform;

/// A path command kind.
///
/// Arcs are kept as their own verb instead of being expanded into curves at
/// record time: the device-space flattening tolerance for an arc depends on
/// the transform in effect at *draw* time, so flattening must stay deferred
/// (see [`crate::path_geometry`]).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathVerb {
    /// Starts a new subpath.
    MoveTo,
    /// A straight line.
    LineTo,
    /// A quadratic Bezier curve.
    QuadTo,
    /// A cubic Bezier curve.
    CubicTo,
    /// An arc of a circle. Extra parameters live in a side table; see
    /// [`Path::arc_params`].
    ArcTo,
    /// Closes the current subpath back to its starting point.
    Close,
}

/// The extra parameters of an [`PathVerb::ArcTo`] command.
///
/// `start_angle`/`end_angle` are already normalized at record time so that
/// `end_angle - start_angle` is the signed sweep in the direction the arc
/// was drawn (see [`crate::path_builder::PathBuilder::arc`]) — there is no
/// separate `ccw` flag to consult downstream.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ArcParams {
    /// Arc center.
    pub center: Point,
    /// Arc radius.
    pub radius: f32,
    /// Start angle, radians.
    pub start_angle: f32,
    /// End angle, radians, normalized against `start_angle` so their
    /// difference is the signed sweep.
    pub end_angle: f32,
}

/// An immutable, recorded sequence of path commands.
///
/// Points are stored in user space, at the coordinates given when the
/// command was recorded; curves and arcs are *not* flattened here.
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    pub(crate) verbs: Vec<PathVerb>,
    pub(crate) points: Vec<Point>,
    pub(crate) arcs: Vec<ArcParams>,
}

impl Path {
    /// Number of recorded verbs.
    #[inline]
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// `true` if no commands were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// The verb list.
    #[inline]
    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    /// The flat point list (one entry per `MoveTo`/`LineTo`, two per
    /// `QuadTo`, three per `CubicTo`, one center point per `ArcTo`, zero for
    /// `Close`).
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The arc parameter side table, in the order `ArcTo` verbs occur.
    #[inline]
    pub fn arc_params(&self) -> &[ArcParams] {
        &self.arcs
    }

    /// The bounding box of all recorded points, ignoring that curves/arcs
    /// may bulge outside the control-point hull. Returns `None` for an
    /// empty path.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.all_points_including_arcs().as_slice())
    }

    fn all_points_including_arcs(&self) -> Vec<Point> {
        let mut pts: Vec<Point> = self.points.clone();
        for arc in &self.arcs {
            pts.push(Point::from_xy(arc.center.x - arc.radius, arc.center.y - arc.radius));
            pts.push(Point::from_xy(arc.center.x + arc.radius, arc.center.y + arc.radius));
        }
        pts
    }

    /// Returns a new path with every point mapped through `ts`. Arc centers
    /// are transformed; the radius is approximated by the transform's
    /// average scale (exact only for similarity transforms, which is all
    /// that callers of this method need it for).
    pub fn transform(&self, ts: Transform) -> Path {
        let mut points = self.points.clone();
        ts.map_points(&mut points);
        let mut arcs = self.arcs.clone();
        for arc in &mut arcs {
            arc.center = ts.map_point(arc.center);
            arc.radius *= ts.max_scale();
        }
        Path { verbs: self.verbs.clone(), points, arcs }
    }

    /// Clears the path, returning a [`PathBuilder`] that reuses its storage.
    pub fn clear(self) -> PathBuilder {
        PathBuilder::from_storage(self.verbs, self.points, self.arcs)
    }

    /// Iterates over the path as a sequence of [`PathSegment`]s.
    pub fn segments(&self) -> PathSegmentsIter<'_> {
        PathSegmentsIter { path: self, verb_idx: 0, point_idx: 0, arc_idx: 0 }
    }
}

impl Rect {
    pub(crate) fn from_points(points: &[Point]) -> Option<Rect> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::from_ltrb(min_x, min_y, max_x, max_y)
    }
}

/// One command of a [`Path`], with its resolved points.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PathSegment {
    /// Starts a new subpath at this point.
    MoveTo(Point),
    /// A line to this point.
    LineTo(Point),
    /// A quadratic curve: control point, end point.
    QuadTo(Point, Point),
    /// A cubic curve: two control points, end point.
    CubicTo(Point, Point, Point),
    /// An arc, with its center/radius/angle parameters.
    ArcTo(ArcParams),
    /// Closes the subpath.
    Close,
}

/// Iterator over a [`Path`]'s segments.
#[derive(Clone, Debug)]
pub struct PathSegmentsIter<'a> {
    path: &'a Path,
    verb_idx: usize,
    point_idx: usize,
    arc_idx: usize,
}

impl<'a> Iterator for PathSegmentsIter<'a> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<PathSegment> {
        let verb = *self.path.verbs.get(self.verb_idx)?;
        self.verb_idx += 1;

        let seg = match verb {
            PathVerb::MoveTo => {
                let p = self.path.points[self.point_idx];
                self.point_idx += 1;
                PathSegment::MoveTo(p)
            }
            PathVerb::LineTo => {
                let p = self.path.points[self.point_idx];
                self.point_idx += 1;
                PathSegment::LineTo(p)
            }
            PathVerb::QuadTo => {
                let p0 = self.path.points[self.point_idx];
                let p1 = self.path.points[self.point_idx + 1];
                self.point_idx += 2;
                PathSegment::QuadTo(p0, p1)
            }
            PathVerb::CubicTo => {
                let p0 = self.path.points[self.point_idx];
                let p1 = self.path.points[self.point_idx + 1];
                let p2 = self.path.points[self.point_idx + 2];
                self.point_idx += 3;
                PathSegment::CubicTo(p0, p1, p2)
            }
            PathVerb::ArcTo => {
                // Arc's center also occupies one slot in the flat point array
                // so bounds/transform can walk a single list.
                self.point_idx += 1;
                let arc = self.path.arcs[self.arc_idx];
                self.arc_idx += 1;
                PathSegment::ArcTo(arc)
            }
            PathVerb::Close => PathSegment::Close,
        };

        Some(seg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_builder::PathBuilder;

    #[test]
    fn segments_roundtrip() {
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.line_to(10.0, 0.0);
        pb.quad_to(15.0, 5.0, 10.0, 10.0);
        pb.close();
        let path = pb.finish().unwrap();

        let segs: Vec<_> = path.segments().collect();
        assert_eq!(segs.len(), 4);
        assert!(matches!(segs[0], PathSegment::MoveTo(_)));
        assert!(matches!(segs[3], PathSegment::Close));
    }
}
