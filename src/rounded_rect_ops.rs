// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Direct rasterization of an axis-aligned rounded rect, including the
//! combined fill+stroke case.

use std::f32::consts::FRAC_PI_2;

use swcanvas_path::{path_geometry, Point, Rect};

use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::device_fill;
use crate::polygon_filler::FillRule;
use crate::surface::Surface;

/// Tiny inward contraction applied to fill geometry so it doesn't leave
/// boundary speckles when a stroke is drawn on top of it.
const FILL_CONTRACTION_EPSILON: f32 = 1e-4;

/// Direct rounded-rect fill/stroke rasterizer.
pub struct RoundedRectOps;

impl RoundedRectOps {
    /// Fills the rounded rect's interior.
    pub fn fill(surface: &mut Surface, clip: &ClipMask, rect: Rect, radius: f32, color: Color, global_alpha: u8, op: CompositeOp) {
        let outline = outline_polygon(rect, radius);
        device_fill::fill_polygons(surface, clip, &[outline], FillRule::NonZero, color, global_alpha, op);
    }

    /// Strokes the rounded rect's border, `hw` half the stroke width, via
    /// outer/inner rounded-rect outlines rasterized together (even-odd).
    pub fn stroke(surface: &mut Surface, clip: &ClipMask, rect: Rect, radius: f32, hw: f32, color: Color, global_alpha: u8, op: CompositeOp) {
        let outer_rect = rect.outset(hw, hw).unwrap_or(rect);
        let outer = outline_polygon(outer_rect, radius + hw);

        match rect.inset(hw, hw) {
            Some(inner_rect) if inner_rect.width() > 0.0 && inner_rect.height() > 0.0 => {
                let inner = outline_polygon(inner_rect, (radius - hw).max(0.0));
                device_fill::fill_ring(surface, clip, outer, inner, color, global_alpha, op);
            }
            _ => device_fill::fill_polygons(surface, clip, &[outer], FillRule::NonZero, color, global_alpha, op),
        }
    }

    /// Fills then strokes a single rounded rect in one coordinated pass, so
    /// the fill's edge never shows through (or double-blends under) a
    /// semi-transparent stroke.
    ///
    /// When the stroke is opaque, the fill is contracted to the stroke's
    /// inner extent — the stroke alone covers the transition. When the
    /// stroke is translucent, the fill extends out to the nominal path
    /// extent (clamped to the stroke's outer bound) so the two blend
    /// together correctly instead of leaving a gap.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_and_stroke(
        surface: &mut Surface,
        clip: &ClipMask,
        rect: Rect,
        radius: f32,
        hw: f32,
        fill_color: Color,
        stroke_color: Color,
        global_alpha: u8,
        op: CompositeOp,
    ) {
        let stroke_opaque = stroke_color.is_opaque() && global_alpha == 255;

        let nominal_fill_rect = if stroke_opaque {
            rect.inset(hw, hw).unwrap_or(rect)
        } else {
            rect
        };
        let fill_rect = nominal_fill_rect.inset(FILL_CONTRACTION_EPSILON, FILL_CONTRACTION_EPSILON).unwrap_or(nominal_fill_rect);
        let fill_radius = (radius - FILL_CONTRACTION_EPSILON).max(0.0);

        Self::fill(surface, clip, fill_rect, fill_radius, fill_color, global_alpha, op);
        Self::stroke(surface, clip, rect, radius, hw, stroke_color, global_alpha, op);
    }
}

/// The rounded rect's boundary as a closed polygon, corners flattened via
/// `path_geometry::flatten_arc`. Exposed crate-wide so the rotated ("Rot")
/// fast-path case in the dispatcher can map it through an arbitrary affine
/// transform directly, without going through `Path`/`PathBuilder`.
pub(crate) fn outline_polygon(rect: Rect, radius: f32) -> Vec<Point> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    if r <= 1e-3 {
        return vec![
            Point::from_xy(rect.left(), rect.top()),
            Point::from_xy(rect.right(), rect.top()),
            Point::from_xy(rect.right(), rect.bottom()),
            Point::from_xy(rect.left(), rect.bottom()),
        ];
    }

    let mut out = Vec::new();
    let corner = |cx: f32, cy: f32, start: f32, end: f32, out: &mut Vec<Point>| {
        out.push(Point::from_xy(cx + r * start.cos(), cy + r * start.sin()));
        path_geometry::flatten_arc(Point::from_xy(cx, cy), r, start, end, r, out);
    };

    out.push(Point::from_xy(rect.left() + r, rect.top()));
    out.push(Point::from_xy(rect.right() - r, rect.top()));
    corner(rect.right() - r, rect.top() + r, -FRAC_PI_2, 0.0, &mut out);
    out.push(Point::from_xy(rect.right(), rect.bottom() - r));
    corner(rect.right() - r, rect.bottom() - r, 0.0, FRAC_PI_2, &mut out);
    out.push(Point::from_xy(rect.left() + r, rect.bottom()));
    corner(rect.left() + r, rect.bottom() - r, FRAC_PI_2, std::f32::consts::PI, &mut out);
    out.push(Point::from_xy(rect.left(), rect.top() + r));
    corner(rect.left() + r, rect.top() + r, std::f32::consts::PI, std::f32::consts::PI * 1.5, &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_center_and_excludes_outer_corner() {
        let mut s = Surface::new(40, 40).unwrap();
        let clip = ClipMask::none();
        let rect = Rect::from_xywh(4.0, 4.0, 32.0, 32.0).unwrap();
        RoundedRectOps::fill(&mut s, &clip, rect, 8.0, Color::from_rgba8(0, 0, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(20, 20), Some(Color::from_rgba8(0, 0, 0, 255)));
        assert_eq!(s.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn fill_and_stroke_has_no_visible_gap_at_boundary() {
        let mut s = Surface::new(40, 40).unwrap();
        let clip = ClipMask::none();
        let rect = Rect::from_xywh(4.0, 4.0, 32.0, 32.0).unwrap();
        RoundedRectOps::fill_and_stroke(
            &mut s,
            &clip,
            rect,
            8.0,
            1.0,
            Color::from_rgba8(255, 0, 0, 255),
            Color::from_rgba8(0, 0, 255, 255),
            255,
            CompositeOp::SourceOver,
        );
        assert_eq!(s.pixel(20, 20), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(s.pixel(20, 4), Some(Color::from_rgba8(0, 0, 255, 255)));
    }
}
