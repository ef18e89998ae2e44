// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Direct rasterization of a standalone stroked line segment (a path
//! consisting of exactly one `moveTo` + `lineTo`).
//!
//! Skips `Path`/`PathFlattener` entirely — there is nothing to flatten —
//! and calls `PathStroker` directly on the two-point polyline, which is
//! already the stroker's cheapest case (one body rectangle, no joins).

use swcanvas_path::{Point, PathStroker, Stroke};

use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::device_fill;
use crate::polygon_filler::FillRule;
use crate::surface::Surface;

/// Direct single-segment line stroker.
pub struct LineOps;

impl LineOps {
    /// Strokes the device-space segment `p0 -> p1`.
    pub fn stroke(surface: &mut Surface, clip: &ClipMask, p0: Point, p1: Point, stroke: &Stroke, color: Color, global_alpha: u8, op: CompositeOp) {
        let mut polygons = Vec::new();
        if PathStroker::stroke(&[p0, p1], false, stroke, &mut polygons).is_err() {
            return;
        }
        device_fill::fill_polygons(surface, clip, &polygons, FillRule::NonZero, color, global_alpha, op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swcanvas_path::LineCap;

    #[test]
    fn horizontal_line_produces_a_band() {
        let mut s = Surface::new(20, 20).unwrap();
        let clip = ClipMask::none();
        let stroke = Stroke { width: 4.0, line_cap: LineCap::Butt, ..Stroke::default() };
        LineOps::stroke(&mut s, &clip, Point::from_xy(2.0, 10.0), Point::from_xy(18.0, 10.0), &stroke, Color::from_rgba8(0, 0, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(10, 10), Some(Color::from_rgba8(0, 0, 0, 255)));
        assert_eq!(s.pixel(10, 2), Some(Color::TRANSPARENT));
    }
}
