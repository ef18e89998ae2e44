// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Direct rasterization of a standalone circular arc (a path consisting of
//! exactly one `arc(...)` command), for fill and stroke.
//!
//! A full-circle arc (`|end - start| >= 2π`) is delegated to [`crate::circle_ops::CircleOps`],
//! which has a cheaper closed-form implementation; a genuine partial arc is
//! flattened directly (skipping `Path`/`PathBuilder` recording) and handed
//! to the shared polygon rasterizer — still a fast path in the sense that
//! spares the general pipeline's joins/caps/dashing machinery for the
//! common "just stroke or fill this one arc" case.

use std::f32::consts::TAU;

use swcanvas_path::{path_geometry, PathStroker, Point, Stroke};

use crate::circle_ops::CircleOps;
use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::device_fill;
use crate::polygon_filler::FillRule;
use crate::surface::Surface;

/// Direct arc fill/stroke rasterizer.
pub struct ArcOps;

impl ArcOps {
    /// Fills the circular-segment region enclosed by the arc, implicitly
    /// closed with a straight chord back to its start point (Canvas fills
    /// an open subpath by connecting its end back to its start with a
    /// line, not by routing through the arc's center).
    #[allow(clippy::too_many_arguments)]
    pub fn fill(
        surface: &mut Surface,
        clip: &ClipMask,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        device_radius: f32,
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        if (end_angle - start_angle).abs() >= TAU - 1e-4 {
            CircleOps::fill(surface, clip, center, radius, color, global_alpha, op);
            return;
        }

        let mut polyline = Vec::new();
        path_geometry::flatten_arc(center, radius, start_angle, end_angle, device_radius, &mut polyline);
        polyline.insert(0, Point::from_xy(center.x + radius * start_angle.cos(), center.y + radius * start_angle.sin()));
        device_fill::fill_polygons(surface, clip, &[polyline], FillRule::NonZero, color, global_alpha, op);
    }

    /// Strokes the arc's curve (not the pie-slice boundary).
    #[allow(clippy::too_many_arguments)]
    pub fn stroke(
        surface: &mut Surface,
        clip: &ClipMask,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        device_radius: f32,
        stroke: &Stroke,
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        if (end_angle - start_angle).abs() >= TAU - 1e-4 {
            CircleOps::stroke(surface, clip, center, radius, stroke.width * 0.5, color, global_alpha, op);
            return;
        }

        let mut polyline = vec![Point::from_xy(center.x + radius * start_angle.cos(), center.y + radius * start_angle.sin())];
        path_geometry::flatten_arc(center, radius, start_angle, end_angle, device_radius, &mut polyline);

        let mut polygons = Vec::new();
        if PathStroker::stroke(&polyline, false, stroke, &mut polygons).is_ok() {
            device_fill::fill_polygons(surface, clip, &polygons, FillRule::NonZero, color, global_alpha, op);
        }
    }
}
