// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Shared plumbing that runs device-space polygons through the scanline
//! rasterizer and out to the surface.
//!
//! Both the general polygon pipeline and the rotated ("Rot") variants of
//! the direct-primitive fast paths bottom out here: a "Rot" primitive
//! builds its outline directly from closed-form corner/arc points (instead
//! of going through `Path`/`PathFlattener`/`PathStroker`), but the last
//! step — turning a polygon list into coverage and writing it through the
//! clip and composite op — is the same scanline machinery either way. This
//! is this crate's Edge Buffer Rasterization: the active-edge scanline
//! walk in `polygon_filler` computes exactly the per-row min/max crossings
//! that edge-buffer rasterization builds explicitly.

use swcanvas_path::Point;

use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::polygon_filler::{self, FillRule};
use crate::span_ops;
use crate::surface::Surface;

/// Rasterizes `polygons` (device space) under `rule` and composites `color`
/// through every covered pixel.
pub fn fill_polygons(
    surface: &mut Surface,
    clip: &ClipMask,
    polygons: &[Vec<Point>],
    rule: FillRule,
    color: Color,
    global_alpha: u8,
    op: CompositeOp,
) {
    if polygons.is_empty() {
        return;
    }
    let width = surface.width();
    let height = surface.height();
    let coverage = polygon_filler::rasterize_coverage(polygons, rule, width, height);
    for y in 0..height {
        let row = &coverage[y as usize * width as usize..(y as usize + 1) * width as usize];
        span_ops::write_row_coverage(surface, clip, y, row, color, global_alpha, op);
    }
}

/// Fills the annular region `outer \ inner` (the "Dual Edge Buffer" case: a
/// stroke's outer and inner perimeters) by rasterizing both polygons
/// together under the even-odd rule.
pub fn fill_ring(
    surface: &mut Surface,
    clip: &ClipMask,
    outer: Vec<Point>,
    inner: Vec<Point>,
    color: Color,
    global_alpha: u8,
    op: CompositeOp,
) {
    fill_polygons(surface, clip, &[outer, inner], FillRule::EvenOdd, color, global_alpha, op);
}
