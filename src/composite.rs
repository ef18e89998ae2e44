// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Porter-Duff compositing of a straight-alpha source onto a straight-alpha
//! destination.

use crate::color::{mul_u8, Color};

/// The two composite operations in scope.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CompositeOp {
    /// Premultiplied-over blend: `out = src·α + dst·(1−α)` per channel.
    SourceOver,
    /// Writes `src` verbatim (including alpha), ignoring `dst` entirely.
    Copy,
}

impl Default for CompositeOp {
    fn default() -> Self {
        CompositeOp::SourceOver
    }
}

/// Composites `src` over `dst`, with `global_alpha` (0..=255, already
/// clamped from `globalAlpha ∈ [0,1]`) folded into the source's alpha.
pub fn composite(dst: Color, src: Color, global_alpha: u8, op: CompositeOp) -> Color {
    match op {
        CompositeOp::Copy => {
            Color::from_rgba8(src.red(), src.green(), src.blue(), mul_u8(src.alpha(), global_alpha))
        }
        CompositeOp::SourceOver => {
            let psrc = src.premultiply(global_alpha);
            let pdst = dst.premultiply(255);
            let inv_a = 255 - psrc.a;

            crate::color::PremultipliedColor {
                r: psrc.r.saturating_add(mul_u8(pdst.r, inv_a)),
                g: psrc.g.saturating_add(mul_u8(pdst.g, inv_a)),
                b: psrc.b.saturating_add(mul_u8(pdst.b, inv_a)),
                a: psrc.a.saturating_add(mul_u8(pdst.a, inv_a)),
            }
            .demultiply()
        }
    }
}
