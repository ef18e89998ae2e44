// Copyright 2006 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Straight sRGB color representation and premultiplied-alpha packing.
//!
//! All rasterizer writes go through [`crate::span_ops`] so that
//! byte-order/endianness concerns stay localized to one module; this module
//! only defines the color types and the pack/unpack functions that module
//! calls.

/// Fully transparent alpha.
pub const ALPHA_TRANSPARENT: u8 = 0x00;
/// Fully opaque alpha.
pub const ALPHA_OPAQUE: u8 = 0xFF;

/// A straight (non-premultiplied) 8-bit sRGB color, as stored in a
/// [`crate::Surface`].
///
/// `#[repr(C)]` plus `bytemuck::Pod`/`Zeroable` so a `Surface`'s byte buffer
/// can be reinterpreted as `&[Color]` with no copy (same trick as the
/// teacher's `PremultipliedColorU8`/`pixels()`).
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    /// Opaque black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    /// Opaque white.
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    /// Creates a color from straight RGBA bytes.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Red channel.
    #[inline]
    pub const fn red(self) -> u8 {
        self.r
    }
    /// Green channel.
    #[inline]
    pub const fn green(self) -> u8 {
        self.g
    }
    /// Blue channel.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.b
    }
    /// Alpha channel.
    #[inline]
    pub const fn alpha(self) -> u8 {
        self.a
    }

    /// `true` iff `alpha() == 255`.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == ALPHA_OPAQUE
    }

    /// `true` iff `alpha() == 0`.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == ALPHA_TRANSPARENT
    }

    /// Premultiplies this color by its own alpha and an additional
    /// `extra_alpha` in `0..=255` (used to fold in `globalAlpha`).
    #[inline]
    pub fn premultiply(self, extra_alpha: u8) -> PremultipliedColor {
        let a = mul_u8(self.a, extra_alpha);
        PremultipliedColor {
            r: mul_u8(self.r, a),
            g: mul_u8(self.g, a),
            b: mul_u8(self.b, a),
            a,
        }
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Color").field("r", &self.r).field("g", &self.g).field("b", &self.b).field("a", &self.a).finish()
    }
}

/// A premultiplied-alpha color, used only as compositing math's working
/// representation — never stored in a [`crate::Surface`], which always
/// holds straight channels.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct PremultipliedColor {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl PremultipliedColor {
    /// Fully transparent.
    pub const TRANSPARENT: PremultipliedColor = PremultipliedColor { r: 0, g: 0, b: 0, a: 0 };

    /// Un-premultiplies back into a straight [`Color`].
    #[inline]
    pub fn demultiply(self) -> Color {
        if self.a == ALPHA_OPAQUE {
            Color::from_rgba8(self.r, self.g, self.b, self.a)
        } else if self.a == 0 {
            Color::TRANSPARENT
        } else {
            let a = self.a as u32;
            Color::from_rgba8(
                ((self.r as u32 * 255 + a / 2) / a) as u8,
                ((self.g as u32 * 255 + a / 2) / a) as u8,
                ((self.b as u32 * 255 + a / 2) / a) as u8,
                self.a,
            )
        }
    }
}

/// Rounded `a*b/255`, the standard fixed-point alpha multiply.
#[inline]
pub(crate) fn mul_u8(a: u8, b: u8) -> u8 {
    let x = a as u32 * b as u32 + 128;
    (((x >> 8) + x) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_u8_identity() {
        assert_eq!(mul_u8(200, 255), 200);
        assert_eq!(mul_u8(200, 0), 0);
    }

    #[test]
    fn premultiply_opaque_is_unchanged() {
        let c = Color::from_rgba8(10, 20, 30, 255);
        let p = c.premultiply(255);
        assert_eq!((p.r, p.g, p.b, p.a), (10, 20, 30, 255));
    }

    #[test]
    fn premultiply_then_demultiply_roundtrips_within_one() {
        let c = Color::from_rgba8(200, 100, 50, 128);
        let p = c.premultiply(255);
        let back = p.demultiply();
        assert!((back.red() as i32 - c.red() as i32).abs() <= 1);
        assert!((back.green() as i32 - c.green() as i32).abs() <= 1);
    }
}
