// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! `ImageData`, and the `getImageData`/`putImageData`/`drawImage` pixel
//! transfer operations.

use swcanvas_path::{Point, Transform};

use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::{self, CompositeOp};
use crate::error::{Result, SwCanvasError};
use crate::surface::Surface;

/// An owned `width x height` RGBA8 pixel buffer, independent of any
/// [`Surface`] — the currency `getImageData`/`putImageData`/`drawImage`
/// pass around.
///
/// Unlike [`Surface`], which is always RGBA, `ImageData` can also be built
/// from plain RGB bytes ([`ImageData::from_bytes`]): callers that only have
/// an opaque `w*h*3` buffer don't need to pad it themselves.
#[derive(Clone, PartialEq, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// A zeroed (fully transparent) buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SwCanvasError::InvalidArgument("ImageData dimensions must be positive"));
        }
        let len = width as usize * height as usize * 4;
        Ok(ImageData { width, height, data: vec![0u8; len] })
    }

    /// Builds an `ImageData` from `data`, which must be exactly
    /// `width*height*4` (RGBA) or `width*height*3` (RGB, alpha assumed
    /// opaque).
    pub fn from_bytes(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SwCanvasError::InvalidArgument("ImageData dimensions must be positive"));
        }
        let pixels = width as usize * height as usize;
        if data.len() == pixels * 4 {
            Ok(ImageData { width, height, data: data.to_vec() })
        } else if data.len() == pixels * 3 {
            let mut rgba = Vec::with_capacity(pixels * 4);
            for px in data.chunks_exact(3) {
                rgba.extend_from_slice(px);
                rgba.push(255);
            }
            Ok(ImageData { width, height, data: rgba })
        } else {
            Err(SwCanvasError::InvalidArgument("image data length must be width*height*3 or width*height*4"))
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA bytes, row-major, `width*height*4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Color::from_rgba8(self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3])
    }
}

/// Reads back a `w x h` rect of `surface` at `(x, y)`. The rect is clipped
/// to the surface's bounds rather than rejected when it runs off the edge;
/// pixels outside the surface in the returned buffer are transparent black,
/// matching HTML5 Canvas.
pub fn get_image_data(surface: &Surface, x: i32, y: i32, w: u32, h: u32) -> Result<ImageData> {
    let mut out = ImageData::new(w, h)?;
    for row in 0..h {
        let sy = y + row as i32;
        if sy < 0 || sy as u32 >= surface.height() {
            continue;
        }
        for col in 0..w {
            let sx = x + col as i32;
            if sx < 0 || sx as u32 >= surface.width() {
                continue;
            }
            if let Some(c) = surface.pixel(sx as u32, sy as u32) {
                let idx = (row as usize * w as usize + col as usize) * 4;
                out.data[idx] = c.red();
                out.data[idx + 1] = c.green();
                out.data[idx + 2] = c.blue();
                out.data[idx + 3] = c.alpha();
            }
        }
    }
    Ok(out)
}

/// Writes `img`'s bytes verbatim into `surface` at `(x, y)` — no blending,
/// no transform, no clip, matching HTML5 Canvas `putImageData`. Clipped to
/// the intersection with the surface, silently dropping out-of-bounds
/// pixels.
pub fn put_image_data(surface: &mut Surface, img: &ImageData, x: i32, y: i32) {
    for row in 0..img.height() {
        let dy = y + row as i32;
        if dy < 0 || dy as u32 >= surface.height() {
            continue;
        }
        for col in 0..img.width() {
            let dx = x + col as i32;
            if dx < 0 || dx as u32 >= surface.width() {
                continue;
            }
            surface.put_pixel(dx as u32, dy as u32, img.pixel(col, row));
        }
    }
}

/// Draws `img` with its top-left corner anchored at user-space `(dx, dy)`,
/// blended through `clip`, `global_alpha`, and `op`.
///
/// Only the CTM's translation is applied to the placement of the image's
/// top-left corner; the image itself is copied pixel-for-pixel rather than
/// resampled under rotation/scale. Image transforms and resampling are out
/// of scope (gradients and patterns are likewise not modeled), so a direct
/// copy anchored through the transform is what this draws.
pub fn draw_image(surface: &mut Surface, clip: &ClipMask, img: &ImageData, dx: f32, dy: f32, ctm: &Transform, global_alpha: u8, op: CompositeOp) {
    let origin = ctm.map_point(Point::from_xy(dx, dy));
    let ox = origin.x.round() as i32;
    let oy = origin.y.round() as i32;

    for row in 0..img.height() {
        let py = oy + row as i32;
        if py < 0 || py as u32 >= surface.height() {
            continue;
        }
        for col in 0..img.width() {
            let px = ox + col as i32;
            if px < 0 || px as u32 >= surface.width() {
                continue;
            }
            if !clip.is_allowed(px as u32, py as u32) {
                continue;
            }
            let src = img.pixel(col, row);
            if let Some(dst) = surface.pixel(px as u32, py as u32) {
                surface.put_pixel(px as u32, py as u32, composite::composite(dst, src, global_alpha, op));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_input_gets_opaque_alpha() {
        let img = ImageData::from_bytes(1, 1, &[10, 20, 30]).unwrap();
        assert_eq!(img.data(), &[10, 20, 30, 255]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(ImageData::from_bytes(2, 2, &[0u8; 5]).is_err());
    }

    #[test]
    fn get_image_data_clips_to_surface_bounds() {
        let mut s = Surface::new(4, 4).unwrap();
        s.put_pixel(0, 0, Color::from_rgba8(1, 2, 3, 4));
        let img = get_image_data(&s, -2, -2, 4, 4).unwrap();
        // (2,2) in the output corresponds to (0,0) on the surface.
        let idx = (2 * 4 + 2) * 4;
        assert_eq!(&img.data()[idx..idx + 4], &[1, 2, 3, 4]);
        assert_eq!(&img.data()[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn put_then_get_roundtrips_in_bounds() {
        let mut s = Surface::new(4, 4).unwrap();
        let img = ImageData::from_bytes(2, 2, &[1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]).unwrap();
        put_image_data(&mut s, &img, 1, 1);
        assert_eq!(s.pixel(1, 1), Some(Color::from_rgba8(1, 2, 3, 255)));
        assert_eq!(s.pixel(2, 2), Some(Color::from_rgba8(10, 11, 12, 255)));
    }

    #[test]
    fn draw_image_blends_through_global_alpha() {
        let mut s = Surface::new(4, 4).unwrap();
        s.fill(Color::WHITE);
        let img = ImageData::from_bytes(1, 1, &[0, 0, 0, 255]).unwrap();
        draw_image(&mut s, &ClipMask::none(), &img, 0.0, 0.0, &Transform::identity(), 128, CompositeOp::SourceOver);
        let p = s.pixel(0, 0).unwrap();
        assert!((p.red() as i32 - 127).abs() <= 1);
    }
}
