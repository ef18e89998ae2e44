// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Direct rasterization of full-circle `arc(cx, cy, r, 0, 2π)` fills and
//! strokes.
//!
//! A circle is rotation-invariant, so unlike `RectOps`/`RoundedRectOps`
//! there is no separate "Rot" variant here: the fast path applies whenever
//! the CTM is axis-aligned (uniform scale folds into `radius` by the
//! caller before reaching this module), and an arbitrary affine (shear or
//! non-uniform scale, which turns a circle into an ellipse) falls back to
//! the general polygon pipeline instead.

use swcanvas_path::Point;

use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::polygon_filler::{self, SUBSAMPLES};
use crate::span_ops;
use crate::surface::Surface;

/// Direct circle fill/stroke rasterizer.
pub struct CircleOps;

impl CircleOps {
    /// Fills the disc of `radius` around `center` (device space).
    pub fn fill(surface: &mut Surface, clip: &ClipMask, center: Point, radius: f32, color: Color, global_alpha: u8, op: CompositeOp) {
        if radius <= 0.0 {
            return;
        }
        let width = surface.width();
        let height = surface.height();
        let y0 = (center.y - radius).max(0.0).floor() as u32;
        let y1 = ((center.y + radius).ceil().max(0.0) as u32).min(height);

        let sub_weight = 1.0 / SUBSAMPLES as f32;
        let mut row = vec![0.0f32; width as usize];
        for y in y0..y1 {
            row.iter_mut().for_each(|v| *v = 0.0);
            for sub in 0..SUBSAMPLES {
                let sample_y = y as f32 + (sub as f32 + 0.5) * sub_weight;
                let dy = sample_y - center.y;
                if dy.abs() > radius {
                    continue;
                }
                let dx = (radius * radius - dy * dy).max(0.0).sqrt();
                polygon_filler::add_span(&mut row, center.x - dx, center.x + dx, sub_weight, width);
            }
            let byte_row: Vec<u8> = row.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).collect();
            span_ops::write_row_coverage(surface, clip, y, &byte_row, color, global_alpha, op);
        }
    }

    /// Strokes the circle's outline, `hw` half the stroke width, via the
    /// "Dual Edge Buffer" technique: each row's outer span has its inner
    /// span (if any) carved out in the same pass, so there is no
    /// double-covered pixel at the row's ends.
    pub fn stroke(surface: &mut Surface, clip: &ClipMask, center: Point, radius: f32, hw: f32, color: Color, global_alpha: u8, op: CompositeOp) {
        if radius <= 0.0 || hw <= 0.0 {
            return;
        }
        let outer_r = radius + hw;
        let inner_r = (radius - hw).max(0.0);
        let width = surface.width();
        let height = surface.height();
        let y0 = (center.y - outer_r).max(0.0).floor() as u32;
        let y1 = ((center.y + outer_r).ceil().max(0.0) as u32).min(height);

        let sub_weight = 1.0 / SUBSAMPLES as f32;
        let mut row = vec![0.0f32; width as usize];
        for y in y0..y1 {
            row.iter_mut().for_each(|v| *v = 0.0);
            for sub in 0..SUBSAMPLES {
                let sample_y = y as f32 + (sub as f32 + 0.5) * sub_weight;
                let dy = sample_y - center.y;
                if dy.abs() > outer_r {
                    continue;
                }
                let outer_dx = (outer_r * outer_r - dy * dy).max(0.0).sqrt();
                if inner_r > 0.0 && dy.abs() < inner_r {
                    let inner_dx = (inner_r * inner_r - dy * dy).max(0.0).sqrt();
                    polygon_filler::add_span(&mut row, center.x - outer_dx, center.x - inner_dx, sub_weight, width);
                    polygon_filler::add_span(&mut row, center.x + inner_dx, center.x + outer_dx, sub_weight, width);
                } else {
                    polygon_filler::add_span(&mut row, center.x - outer_dx, center.x + outer_dx, sub_weight, width);
                }
            }
            let byte_row: Vec<u8> = row.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).collect();
            span_ops::write_row_coverage(surface, clip, y, &byte_row, color, global_alpha, op);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_center_not_corners() {
        let mut s = Surface::new(100, 100).unwrap();
        let clip = ClipMask::none();
        CircleOps::fill(&mut s, &clip, Point::from_xy(50.0, 50.0), 30.0, Color::from_rgba8(255, 0, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(50, 50), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(s.pixel(10, 10), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(50, 20), Some(Color::from_rgba8(255, 0, 0, 255)));
    }

    #[test]
    fn stroke_leaves_interior_transparent() {
        let mut s = Surface::new(60, 60).unwrap();
        let clip = ClipMask::none();
        CircleOps::stroke(&mut s, &clip, Point::from_xy(30.0, 30.0), 20.0, 2.0, Color::from_rgba8(0, 255, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(30, 30), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(30, 10), Some(Color::from_rgba8(0, 255, 0, 255)));
    }
}
