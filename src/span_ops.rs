// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Innermost per-row pixel writers. Every rasterizer path — fast
//! primitives and the general polygon pipeline alike — bottoms out here,
//! so this is the one place that touches `Surface` bytes, checks the clip
//! mask, and applies the composite op.

use crate::clip::ClipMask;
use crate::color::{mul_u8, Color};
use crate::composite::{composite, CompositeOp};
use crate::surface::Surface;

/// Writes `color` verbatim across `[x0, x1)` on row `y`, gated by `clip`.
/// Used when the caller has already established the span is fully opaque,
/// `globalAlpha == 1`, and the composite op is `source-over`/`copy` acting
/// identically (an opaque source-over write is the same as a copy) — the
/// common fast-path case.
#[inline]
pub fn write_span_opaque(surface: &mut Surface, clip: &ClipMask, y: u32, x0: u32, x1: u32, color: Color) {
    if y >= surface.height() {
        return;
    }
    let x1 = x1.min(surface.width());
    if x0 >= x1 {
        return;
    }
    let width = surface.width();
    let row_start = y as usize * width as usize;
    let pixels = surface.pixels_mut();
    for x in x0..x1 {
        if clip.is_allowed(x, y) {
            pixels[row_start + x as usize] = color;
        }
    }
}

/// Writes `color` across `[x0, x1)` on row `y`, blending through
/// `global_alpha` (0..=255) and `op`, gated by `clip`.
pub fn write_span_alpha(
    surface: &mut Surface,
    clip: &ClipMask,
    y: u32,
    x0: u32,
    x1: u32,
    color: Color,
    global_alpha: u8,
    op: CompositeOp,
) {
    if y >= surface.height() {
        return;
    }
    let x1 = x1.min(surface.width());
    if x0 >= x1 {
        return;
    }
    let width = surface.width();
    let row_start = y as usize * width as usize;
    let pixels = surface.pixels_mut();
    for x in x0..x1 {
        if clip.is_allowed(x, y) {
            let dst = pixels[row_start + x as usize];
            pixels[row_start + x as usize] = composite(dst, color, global_alpha, op);
        }
    }
}

/// Writes one full row of per-pixel coverage (as produced by
/// [`crate::polygon_filler::rasterize_coverage`]) through `color`,
/// `global_alpha`, and `op`, gated by `clip`. `coverage` must have exactly
/// `surface.width()` entries.
pub fn write_row_coverage(
    surface: &mut Surface,
    clip: &ClipMask,
    y: u32,
    coverage: &[u8],
    color: Color,
    global_alpha: u8,
    op: CompositeOp,
) {
    if y >= surface.height() {
        return;
    }
    let width = surface.width();
    debug_assert_eq!(coverage.len(), width as usize);
    let row_start = y as usize * width as usize;
    let pixels = surface.pixels_mut();
    for x in 0..width {
        let cov = coverage[x as usize];
        if cov == 0 || !clip.is_allowed(x, y) {
            continue;
        }
        let effective_alpha = mul_u8(global_alpha, cov);
        let dst = pixels[row_start + x as usize];
        pixels[row_start + x as usize] = composite(dst, color, effective_alpha, op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_span_respects_clip() {
        let mut s = Surface::new(4, 1).unwrap();
        let mut clip = ClipMask::none();
        clip.intersect_path(
            &[vec![
                swcanvas_path::Point::from_xy(2.0, 0.0),
                swcanvas_path::Point::from_xy(4.0, 0.0),
                swcanvas_path::Point::from_xy(4.0, 1.0),
                swcanvas_path::Point::from_xy(2.0, 1.0),
            ]],
            crate::polygon_filler::FillRule::NonZero,
            4,
            1,
        );
        write_span_opaque(&mut s, &clip, 0, 0, 4, Color::from_rgba8(1, 2, 3, 255));
        assert_eq!(s.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(2, 0), Some(Color::from_rgba8(1, 2, 3, 255)));
    }

    #[test]
    fn coverage_row_scales_alpha() {
        let mut s = Surface::new(3, 1).unwrap();
        s.fill(Color::from_rgba8(255, 255, 255, 255));
        let clip = ClipMask::none();
        let coverage = [0u8, 128, 255];
        write_row_coverage(&mut s, &clip, 0, &coverage, Color::from_rgba8(0, 0, 0, 255), 255, CompositeOp::SourceOver);
        assert_eq!(s.pixel(0, 0), Some(Color::from_rgba8(255, 255, 255, 255)));
        assert_eq!(s.pixel(2, 0), Some(Color::from_rgba8(0, 0, 0, 255)));
        let mid = s.pixel(1, 0).unwrap();
        assert!(mid.red() < 255 && mid.red() > 0);
    }
}
