// Copyright 2006 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Geometry primitives for [`swcanvas`](https://docs.rs/swcanvas): paths,
//! affine transforms, curve flattening, dashing and stroking.
//!
//! This crate has no rasterization logic — it only turns recorded path
//! commands into the flattened polylines and filled polygons that the
//! rasterizer consumes. Same split as `tiny-skia`/`tiny-skia-path`.

#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::excessive_precision)]

mod dash;
mod path;
mod path_builder;
pub mod path_geometry;
mod point;
mod rect;
mod scalar;
mod stroker;
mod transform;

pub use dash::StrokeDash;
pub use path::{ArcParams, Path, PathSegment, PathSegmentsIter, PathVerb};
pub use path_builder::PathBuilder;
pub use point::Point;
pub use rect::Rect;
pub use scalar::{Scalar, SCALAR_NEARLY_ZERO, SCALAR_ROOT_2_OVER_2};
pub use stroker::{LineCap, LineJoin, PathStroker, Stroke, StrokeError};
pub use transform::Transform;
