// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Turns a recorded [`Path`] into per-subpath polylines, at a tolerance
//! derived from the transform in effect at draw time.
//!
//! Output stays in user space — callers apply the current transform
//! afterwards, before handing polygons to the rasterizer — so the same
//! flattened polyline can be fed to either the fill or the stroke pipeline.

use swcanvas_path::path_geometry::{self, DEFAULT_TOLERANCE};
use swcanvas_path::{Path, PathSegment, Point};

/// One flattened subpath.
#[derive(Clone, Debug)]
pub struct FlattenedSubpath {
    /// The polyline, in user space.
    pub points: Vec<Point>,
    /// `true` if the subpath ended in an explicit `closePath`.
    pub closed: bool,
}

/// Flattens every subpath of `path`.
///
/// `device_scale` is the current transform's [`Transform::max_scale`], used
/// to pick a tolerance that stays `DEFAULT_TOLERANCE` device pixels wide
/// regardless of how much the CTM magnifies the path.
///
/// [`Transform::max_scale`]: swcanvas_path::Transform::max_scale
pub fn flatten_path(path: &Path, device_scale: f32) -> Vec<FlattenedSubpath> {
    let tolerance = DEFAULT_TOLERANCE / device_scale.max(1e-6);

    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut closed = false;
    let mut last = Point::from_xy(0.0, 0.0);
    let mut start = Point::from_xy(0.0, 0.0);

    for seg in path.segments() {
        match seg {
            PathSegment::MoveTo(p) => {
                push_subpath(&mut subpaths, &mut current, closed);
                closed = false;
                current.push(p);
                last = p;
                start = p;
            }
            PathSegment::LineTo(p) => {
                current.push(p);
                last = p;
            }
            PathSegment::QuadTo(c, p) => {
                path_geometry::flatten_quad(last, c, p, tolerance, &mut current);
                last = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                path_geometry::flatten_cubic(last, c1, c2, p, tolerance, &mut current);
                last = p;
            }
            PathSegment::ArcTo(arc) => {
                let device_radius = arc.radius * device_scale;
                path_geometry::flatten_arc(arc.center, arc.radius, arc.start_angle, arc.end_angle, device_radius, &mut current);
                last = *current.last().unwrap_or(&last);
            }
            PathSegment::Close => {
                if current.len() > 1 && (last.x, last.y) != (start.x, start.y) {
                    current.push(start);
                }
                closed = true;
                push_subpath(&mut subpaths, &mut current, closed);
                closed = false;
                last = start;
            }
        }
    }
    push_subpath(&mut subpaths, &mut current, closed);

    subpaths
}

fn push_subpath(out: &mut Vec<FlattenedSubpath>, current: &mut Vec<Point>, closed: bool) {
    if current.len() >= 2 {
        out.push(FlattenedSubpath { points: std::mem::take(current), closed });
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swcanvas_path::PathBuilder;

    #[test]
    fn straight_edges_pass_through_unchanged() {
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.line_to(10.0, 0.0);
        pb.line_to(10.0, 10.0);
        let path = pb.finish().unwrap();

        let subpaths = flatten_path(&path, 1.0);
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].points.len(), 3);
        assert!(!subpaths[0].closed);
    }

    #[test]
    fn close_marks_subpath_closed_and_two_subpaths_split() {
        let mut pb = PathBuilder::new();
        pb.rect(0.0, 0.0, 10.0, 10.0);
        pb.rect(20.0, 20.0, 10.0, 10.0);
        let path = pb.finish().unwrap();

        let subpaths = flatten_path(&path, 1.0);
        assert_eq!(subpaths.len(), 2);
        assert!(subpaths[0].closed);
        assert!(subpaths[1].closed);
    }

    #[test]
    fn higher_device_scale_yields_finer_curve_tessellation() {
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.quad_to(50.0, 0.0, 50.0, 50.0);
        let path = pb.finish().unwrap();

        let coarse = flatten_path(&path, 1.0);
        let fine = flatten_path(&path, 8.0);
        assert!(fine[0].points.len() >= coarse[0].points.len());
    }
}
