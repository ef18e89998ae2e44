// Copyright 2006 The Android Open Source Project
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::point::Point;
use crate::scalar::{Scalar, SCALAR_NEARLY_ZERO};

/// An affine transformation matrix.
///
/// Maps a point `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. Composition
/// follows the standard column-vector convention: `t.post_concat(&s)` maps a
/// point by applying `s` first, then `t` — so a sequence of Canvas calls
/// `ctx.translate(30, 30); ctx.scale(2, 2)` builds its CTM as
/// `Transform::identity().post_concat(&from_translate(30, 30)).post_concat(&from_scale(2, 2))`,
/// which scales a local point first and translates the result.
///
/// # Guarantees
///
/// - All six components are finite.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[inline]
    pub fn identity() -> Self {
        Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    /// Creates a transform from its six components. Returns `None` if any
    /// component is non-finite.
    pub fn from_row(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Option<Self> {
        if [a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
            Some(Transform { a, b, c, d, e, f })
        } else {
            None
        }
    }

    /// Creates a translation transform.
    #[inline]
    pub fn from_translate(tx: f32, ty: f32) -> Self {
        Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: tx, f: ty }
    }

    /// Creates a scale transform.
    #[inline]
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Transform { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    /// Creates a rotation transform, `angle` in degrees, clockwise in a
    /// y-down device space (matching Canvas's `rotate`).
    #[inline]
    pub fn from_rotate(angle: f32) -> Self {
        let rad = angle.to_radians();
        let (sin, cos) = rad.sin_cos();
        Transform { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// Returns the six components in `(a, b, c, d, e, f)` order.
    #[inline]
    pub fn get_row(&self) -> (f32, f32, f32, f32, f32, f32) {
        (self.a, self.b, self.c, self.d, self.e, self.f)
    }

    /// `true` iff this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Transform::identity()
    }

    /// `true` iff the transform has no rotation or skew component
    /// (`b == 0 && c == 0` within tolerance), i.e. it only scales/translates.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.b.is_nearly_zero() && self.c.is_nearly_zero()
    }

    /// `true` iff the transform is axis-aligned and scales both axes by the
    /// same factor (`|a| == |d|`).
    #[inline]
    pub fn is_uniform_scale(&self) -> bool {
        self.is_axis_aligned() && (self.a.abs() - self.d.abs()).is_nearly_zero()
    }

    /// Post-multiplies `other` onto this transform: `self * other`, i.e. a
    /// point is first transformed by `other` then by `self`. This is the
    /// operation backing Canvas's `transform(a,b,c,d,e,f)` when called as
    /// `current.post_concat(&new)`.
    pub fn post_concat(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Pre-multiplies `other` onto this transform: `other * self`.
    pub fn pre_concat(&self, other: &Transform) -> Transform {
        other.post_concat(self)
    }

    /// Returns a new transform with an additional translation applied before
    /// the existing ones (`self.pre_concat(&from_translate(tx, ty))`).
    #[inline]
    pub fn pre_translate(&self, tx: f32, ty: f32) -> Transform {
        self.pre_concat(&Transform::from_translate(tx, ty))
    }

    /// Returns a new transform with an additional scale applied before the
    /// existing ones.
    #[inline]
    pub fn pre_scale(&self, sx: f32, sy: f32) -> Transform {
        self.pre_concat(&Transform::from_scale(sx, sy))
    }

    /// Returns a new transform with an additional rotation (degrees) applied
    /// before the existing ones.
    #[inline]
    pub fn pre_rotate(&self, angle: f32) -> Transform {
        self.pre_concat(&Transform::from_rotate(angle))
    }

    /// The matrix determinant, `a*d - b*c`.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse transform, or `None` if the matrix is singular.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() <= SCALAR_NEARLY_ZERO || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        let e = -(a * self.e + c * self.f);
        let f = -(b * self.e + d * self.f);
        Transform::from_row(a, b, c, d, e, f)
    }

    /// Maps a point through this transform.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point::from_xy(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Maps a vector (direction) through this transform, ignoring translation.
    #[inline]
    pub fn map_vector(&self, p: Point) -> Point {
        Point::from_xy(self.a * p.x + self.c * p.y, self.b * p.x + self.d * p.y)
    }

    /// Maps every point in `points` in place.
    pub fn map_points(&self, points: &mut [Point]) {
        for p in points {
            *p = self.map_point(*p);
        }
    }

    /// An estimate of how much this transform scales lengths, used to pick a
    /// device-space-correct curve flattening tolerance. Returns the larger
    /// singular value of the 2x2 linear part.
    pub fn max_scale(&self) -> f32 {
        let sx = Point::from_xy(self.a, self.b).length();
        let sy = Point::from_xy(self.c, self.d).length();
        sx.max(sy).max(SCALAR_NEARLY_ZERO)
    }
}
