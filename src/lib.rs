// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A CPU-only software rasterizer implementing the HTML5 Canvas 2D drawing
//! model: paths, affine transforms, fill/stroke, clipping, and
//! premultiplied-alpha Porter-Duff compositing over a plain RGBA8 [`Surface`].
//!
//! There is no GPU, windowing, or image-decoding involved — just a
//! [`Surface`] to draw into and a [`Context2D`] to draw with:
//!
//! ```
//! use swcanvas::{Color, Context2D};
//!
//! let mut ctx = Context2D::new(200, 150).unwrap();
//! ctx.set_fill_style(Color::from_rgba8(220, 40, 40, 255));
//! ctx.fill_rect(10.0, 10.0, 80.0, 60.0).unwrap();
//! let surface = ctx.into_surface();
//! assert_eq!(surface.data().len(), 200 * 150 * 4);
//! ```
//!
//! Geometry (paths, transforms, stroking, dashing) lives in the sibling
//! `swcanvas-path` crate and is re-exported here for convenience; this
//! crate owns rasterization, compositing, and the `Context2D` state
//! machine that ties them together.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::too_many_arguments)]

mod arc_ops;
mod circle_ops;
mod clip;
mod color;
mod composite;
mod context;
mod device_fill;
mod error;
mod image_data;
mod line_ops;
mod path_flattener;
mod polygon_filler;
mod rect_ops;
mod rounded_rect_ops;
mod span_ops;
mod surface;

pub use clip::ClipMask;
pub use color::{Color, PremultipliedColor};
pub use composite::CompositeOp;
pub use context::Context2D;
pub use error::{Result, SwCanvasError};
pub use image_data::ImageData;
pub use polygon_filler::FillRule;
pub use surface::Surface;

pub use swcanvas_path::{LineCap, LineJoin, Path, PathBuilder, Stroke, StrokeDash, StrokeError, Transform};

/// Creates a fresh `width x height` canvas context — the convenience
/// constructor the `HTMLCanvasElement.getContext('2d')` facade in a real
/// browser embedding would call.
pub fn create_canvas(width: u32, height: u32) -> Result<Context2D> {
    Context2D::new(width, height)
}
