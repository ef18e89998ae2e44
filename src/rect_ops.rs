// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The `fillRect`/`strokeRect`/`clearRect` direct primitive.

use swcanvas_path::{Point, Rect};

use crate::clip::ClipMask;
use crate::color::{mul_u8, Color};
use crate::composite::CompositeOp;
use crate::device_fill;
use crate::polygon_filler::FillRule;
use crate::span_ops;
use crate::surface::Surface;

/// Direct rasterization of an axis-aligned-transform `fillRect`/`strokeRect`.
pub struct RectOps;

impl RectOps {
    /// Fills `rect` (already in device space, transform axis-aligned) with
    /// `color`, analytically covering fractional pixel overlap at the
    /// boundary — no polygon, edge list, or per-pixel coverage array
    /// involved: every row is at most one opaque/alpha interior span plus
    /// up to two single-pixel boundary writes.
    pub fn fill_axis_aligned(
        surface: &mut Surface,
        clip: &ClipMask,
        rect: Rect,
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        let width = surface.width();
        let height = surface.height();

        let top = rect.top().max(0.0);
        let bottom = rect.bottom().min(height as f32);
        let left = rect.left().max(0.0);
        let right = rect.right().min(width as f32);
        if left >= right || top >= bottom {
            return;
        }

        let y0 = top.floor().max(0.0) as u32;
        let y1 = (bottom.ceil() as u32).min(height);

        let x_interior0 = left.ceil() as u32;
        let x_interior1 = right.floor() as u32;
        // `> ` rather than `>=`: when equal there are still two distinct
        // boundary columns (see the module tests) rather than one shared one.
        let single_column = if x_interior0 > x_interior1 { Some((left.floor() as u32, right - left)) } else { None };

        for y in y0..y1 {
            let vfrac = (bottom.min(y as f32 + 1.0) - top.max(y as f32)).clamp(0.0, 1.0);
            if vfrac <= 0.0 {
                continue;
            }

            if let Some((col, hfrac)) = single_column {
                write_coverage_span(surface, clip, y, col, col + 1, color, global_alpha, vfrac * hfrac, op);
                continue;
            }

            if x_interior1 > x_interior0 {
                write_coverage_span(surface, clip, y, x_interior0, x_interior1, color, global_alpha, vfrac, op);
            }
            let left_floor = left.floor();
            if left_floor < x_interior0 as f32 {
                let hfrac = x_interior0 as f32 - left;
                write_coverage_span(surface, clip, y, left_floor as u32, x_interior0, color, global_alpha, vfrac * hfrac, op);
            }
            if right > x_interior1 as f32 {
                let hfrac = right - x_interior1 as f32;
                write_coverage_span(surface, clip, y, x_interior1, x_interior1 + 1, color, global_alpha, vfrac * hfrac, op);
            }
        }
    }

    /// Fills a rect whose device-space outline is an arbitrary (rotated or
    /// sheared) quadrilateral, via the shared scanline Edge Buffer
    /// Rasterization path.
    pub fn fill_rotated(
        surface: &mut Surface,
        clip: &ClipMask,
        corners: [Point; 4],
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        device_fill::fill_polygons(surface, clip, &[corners.to_vec()], FillRule::NonZero, color, global_alpha, op);
    }

    /// Strokes `rect`'s border (axis-aligned), `hw` being half the stroke
    /// width. Implemented as the outer rect minus the inner rect (the
    /// "Dual Edge Buffer" technique — two nested rectangle outlines
    /// rasterized together under even-odd).
    pub fn stroke_axis_aligned(
        surface: &mut Surface,
        clip: &ClipMask,
        rect: Rect,
        hw: f32,
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        let outer = rect.outset(hw, hw).unwrap_or(rect);
        let outer_poly = rect_polygon(outer);

        match rect.inset(hw, hw) {
            Some(inner) if inner.width() > 0.0 && inner.height() > 0.0 => {
                device_fill::fill_ring(surface, clip, outer_poly, rect_polygon(inner), color, global_alpha, op);
            }
            _ => {
                device_fill::fill_polygons(surface, clip, &[outer_poly], FillRule::NonZero, color, global_alpha, op);
            }
        }
    }

    /// Strokes a rotated rect's border given its outer and inner device-space
    /// quadrilaterals.
    pub fn stroke_rotated(
        surface: &mut Surface,
        clip: &ClipMask,
        outer: [Point; 4],
        inner: [Point; 4],
        color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        device_fill::fill_ring(surface, clip, outer.to_vec(), inner.to_vec(), color, global_alpha, op);
    }
}

/// Writes one row's span of `[x0, x1)` at coverage `coverage` (0.0..=1.0),
/// choosing the verbatim opaque writer when the combined coverage and
/// `global_alpha` add up to fully opaque source-over/copy, and the blended
/// writer otherwise.
#[allow(clippy::too_many_arguments)]
fn write_coverage_span(
    surface: &mut Surface,
    clip: &ClipMask,
    y: u32,
    x0: u32,
    x1: u32,
    color: Color,
    global_alpha: u8,
    coverage: f32,
    op: CompositeOp,
) {
    if x1 <= x0 {
        return;
    }
    let coverage_u8 = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
    let effective_alpha = mul_u8(global_alpha, coverage_u8);
    if effective_alpha == 255 && color.is_opaque() && matches!(op, CompositeOp::SourceOver | CompositeOp::Copy) {
        span_ops::write_span_opaque(surface, clip, y, x0, x1, color);
    } else {
        span_ops::write_span_alpha(surface, clip, y, x0, x1, color, effective_alpha, op);
    }
}

fn rect_polygon(r: Rect) -> Vec<Point> {
    vec![
        Point::from_xy(r.left(), r.top()),
        Point::from_xy(r.right(), r.top()),
        Point::from_xy(r.right(), r.bottom()),
        Point::from_xy(r.left(), r.bottom()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_axis_aligned_writes_exact_region() {
        let mut s = Surface::new(10, 10).unwrap();
        let clip = ClipMask::none();
        let rect = Rect::from_xywh(2.0, 2.0, 4.0, 4.0).unwrap();
        RectOps::fill_axis_aligned(&mut s, &clip, rect, Color::from_rgba8(255, 0, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(3, 3), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(s.pixel(6, 6), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn stroke_axis_aligned_leaves_interior_untouched() {
        let mut s = Surface::new(20, 20).unwrap();
        let clip = ClipMask::none();
        let rect = Rect::from_xywh(5.0, 5.0, 10.0, 10.0).unwrap();
        RectOps::stroke_axis_aligned(&mut s, &clip, rect, 1.0, Color::from_rgba8(0, 0, 255, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(10, 10), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(5, 10), Some(Color::from_rgba8(0, 0, 255, 255)));
    }

    #[test]
    fn fill_axis_aligned_blends_fractional_boundary_columns() {
        let mut s = Surface::new(10, 10).unwrap();
        s.fill(Color::from_rgba8(0, 0, 0, 255));
        let clip = ClipMask::none();
        // Spans columns 2 (30% covered) through 5 (20% covered), rows
        // 2..6 fully covered vertically: two distinct boundary columns,
        // not the single-column overlap case.
        let rect = Rect::from_ltrb(2.7, 2.0, 5.2, 6.0).unwrap();
        RectOps::fill_axis_aligned(&mut s, &clip, rect, Color::from_rgba8(255, 255, 255, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(3, 3), Some(Color::from_rgba8(255, 255, 255, 255)));
        let left_edge = s.pixel(2, 3).unwrap();
        assert!(left_edge.red() > 0 && left_edge.red() < 255);
        let right_edge = s.pixel(5, 3).unwrap();
        assert!(right_edge.red() > 0 && right_edge.red() < 255);
        assert_eq!(s.pixel(6, 3), Some(Color::from_rgba8(0, 0, 0, 255)));
    }

    #[test]
    fn fill_axis_aligned_handles_sub_pixel_rect() {
        let mut s = Surface::new(10, 10).unwrap();
        s.fill(Color::from_rgba8(0, 0, 0, 255));
        let clip = ClipMask::none();
        // Entirely inside column 2, 50% horizontal coverage.
        let rect = Rect::from_ltrb(2.3, 2.0, 2.8, 6.0).unwrap();
        RectOps::fill_axis_aligned(&mut s, &clip, rect, Color::from_rgba8(255, 255, 255, 255), 255, CompositeOp::SourceOver);
        let px = s.pixel(2, 3).unwrap();
        assert!(px.red() > 0 && px.red() < 255);
        assert_eq!(s.pixel(1, 3), Some(Color::from_rgba8(0, 0, 0, 255)));
        assert_eq!(s.pixel(3, 3), Some(Color::from_rgba8(0, 0, 0, 255)));
    }
}
