// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The crate's error taxonomy.

use std::fmt;

/// Errors returned by fallible `swcanvas` operations.
///
/// There is no `OutOfRange` variant: out-of-bounds `getImageData`/
/// `putImageData` rectangles are clipped to the surface's intersection
/// rather than rejected, matching HTML5 Canvas, so nothing needs signaling
/// for that case.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SwCanvasError {
    /// A negative dimension, non-finite coordinate, bad enum value,
    /// negative `lineWidth`, or non-positive `miterLimit`.
    InvalidArgument(&'static str),
    /// An operation attempted against a context in an invalid state (e.g.
    /// drawing against a consumed surface). Note that `restore()` with an
    /// empty state stack is a no-op, not a `StateError`.
    StateError(&'static str),
}

impl fmt::Display for SwCanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwCanvasError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            SwCanvasError::StateError(msg) => write!(f, "invalid state: {msg}"),
        }
    }
}

impl std::error::Error for SwCanvasError {}

/// Convenience alias used throughout the crate's fallible API.
pub type Result<T> = std::result::Result<T, SwCanvasError>;
