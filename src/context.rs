// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! `Context2D`: the state machine tying together the transform stack,
//! styles, clip, and current path, and the dispatcher that picks a
//! direct-primitive fast path or the general polygon pipeline for each draw
//! call.

use std::f32::consts::TAU;

use swcanvas_path::{LineCap, LineJoin, Path, PathBuilder, PathStroker, PathVerb, Point, Rect, Stroke, StrokeDash, Transform};

use crate::arc_ops::ArcOps;
use crate::circle_ops::CircleOps;
use crate::clip::ClipMask;
use crate::color::Color;
use crate::composite::CompositeOp;
use crate::device_fill;
use crate::error::{Result, SwCanvasError};
use crate::image_data::{self, ImageData};
use crate::line_ops::LineOps;
use crate::path_flattener;
use crate::polygon_filler::FillRule;
use crate::rect_ops::RectOps;
use crate::rounded_rect_ops::{self, RoundedRectOps};
use crate::surface::Surface;

/// Tolerance used when deciding whether a recorded path's points form an
/// exact axis-aligned rectangle (for fast-path classification).
const SHAPE_EPS: f32 = 1e-3;

/// The shape class a recorded path matches, used to pick a direct-primitive
/// fast path over the general pipeline. Detected structurally from the
/// path's verb/point sequence — e.g. exactly the five verbs `rect()` emits.
enum Shape {
    AxisRect(Rect),
    RoundedRect { rect: Rect, radius: f32 },
    Circle { center: Point, radius: f32 },
    Arc { center: Point, radius: f32, start: f32, end: f32 },
    Line { p0: Point, p1: Point },
    General,
}

fn classify_shape(path: &Path) -> Shape {
    let verbs = path.verbs();
    let points = path.points();

    if verbs == [PathVerb::MoveTo, PathVerb::LineTo, PathVerb::LineTo, PathVerb::LineTo, PathVerb::Close] {
        let (p0, p1, p2, p3) = (points[0], points[1], points[2], points[3]);
        let axis_aligned = (p0.y - p1.y).abs() < SHAPE_EPS
            && (p1.x - p2.x).abs() < SHAPE_EPS
            && (p2.y - p3.y).abs() < SHAPE_EPS
            && (p3.x - p0.x).abs() < SHAPE_EPS;
        if axis_aligned {
            if let Some(r) = Rect::from_ltrb(p0.x.min(p2.x), p0.y.min(p2.y), p0.x.max(p2.x), p0.y.max(p2.y)) {
                return Shape::AxisRect(r);
            }
        }
    }

    if verbs
        == [
            PathVerb::MoveTo,
            PathVerb::LineTo,
            PathVerb::ArcTo,
            PathVerb::LineTo,
            PathVerb::ArcTo,
            PathVerb::LineTo,
            PathVerb::ArcTo,
            PathVerb::LineTo,
            PathVerb::ArcTo,
            PathVerb::Close,
        ]
    {
        let arcs = path.arc_params();
        if arcs.len() == 4 && arcs.iter().all(|a| (a.radius - arcs[0].radius).abs() < SHAPE_EPS) {
            if let Some(bounds) = path.bounds() {
                return Shape::RoundedRect { rect: bounds, radius: arcs[0].radius };
            }
        }
    }

    if verbs == [PathVerb::MoveTo, PathVerb::ArcTo] {
        if let [arc] = path.arc_params() {
            if (arc.end_angle - arc.start_angle).abs() >= TAU - 1e-4 {
                return Shape::Circle { center: arc.center, radius: arc.radius };
            }
            return Shape::Arc { center: arc.center, radius: arc.radius, start: arc.start_angle, end: arc.end_angle };
        }
    }

    if verbs == [PathVerb::MoveTo, PathVerb::LineTo] && points.len() == 2 {
        return Shape::Line { p0: points[0], p1: points[1] };
    }

    Shape::General
}

fn map_rect_axis_aligned(rect: Rect, ctm: &Transform) -> Option<Rect> {
    let p0 = ctm.map_point(Point::from_xy(rect.left(), rect.top()));
    let p1 = ctm.map_point(Point::from_xy(rect.right(), rect.bottom()));
    Rect::from_ltrb(p0.x.min(p1.x), p0.y.min(p1.y), p0.x.max(p1.x), p0.y.max(p1.y))
}

fn map_rect_corners(rect: Rect, ctm: &Transform) -> [Point; 4] {
    [
        ctm.map_point(Point::from_xy(rect.left(), rect.top())),
        ctm.map_point(Point::from_xy(rect.right(), rect.top())),
        ctm.map_point(Point::from_xy(rect.right(), rect.bottom())),
        ctm.map_point(Point::from_xy(rect.left(), rect.bottom())),
    ]
}

#[derive(Clone, Debug)]
struct SavedState {
    ctm: Transform,
    fill_color: Color,
    stroke_color: Color,
    global_alpha: f32,
    composite_op: CompositeOp,
    stroke: Stroke,
    dash_pattern: Vec<f32>,
    dash_offset: f32,
    clip: ClipMask,
}

/// Drawing context for a [`Surface`]: current transform, styles, line
/// properties, clip, and recorded path, plus the fast/general path
/// dispatcher.
///
/// The current path is deliberately *not* part of the saved/restored state:
/// it persists across `save`/`restore`, matching HTML5 Canvas.
#[derive(Debug)]
pub struct Context2D {
    surface: Surface,
    ctm: Transform,
    fill_color: Color,
    stroke_color: Color,
    global_alpha: f32,
    composite_op: CompositeOp,
    stroke: Stroke,
    dash_pattern: Vec<f32>,
    dash_offset: f32,
    clip: ClipMask,
    path: PathBuilder,
    stack: Vec<SavedState>,
    slow_path_used: bool,
}

impl Context2D {
    /// Creates a context over a freshly allocated, fully transparent
    /// `width x height` surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Context2D::from_surface(Surface::new(width, height)?))
    }

    /// Wraps an existing surface, starting from the default state (identity
    /// transform, opaque black fill/stroke, `globalAlpha = 1`, source-over).
    pub fn from_surface(surface: Surface) -> Self {
        Context2D {
            surface,
            ctm: Transform::identity(),
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            global_alpha: 1.0,
            composite_op: CompositeOp::SourceOver,
            stroke: Stroke::default(),
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
            clip: ClipMask::none(),
            path: PathBuilder::new(),
            stack: Vec::new(),
            slow_path_used: false,
        }
    }

    /// The surface being drawn into.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Consumes the context, handing back its surface.
    pub fn into_surface(self) -> Surface {
        self.surface
    }

    fn alpha_u8(&self) -> u8 {
        (self.global_alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    fn effective_stroke(&self) -> Stroke {
        let mut s = self.stroke.clone();
        s.dash = if self.dash_pattern.is_empty() { None } else { StrokeDash::new(self.dash_pattern.clone(), self.dash_offset) };
        s
    }

    // ---- state stack ----

    /// Pushes the current transform, styles, line properties, and clip.
    /// The current path is unaffected.
    pub fn save(&mut self) {
        self.stack.push(SavedState {
            ctm: self.ctm,
            fill_color: self.fill_color,
            stroke_color: self.stroke_color,
            global_alpha: self.global_alpha,
            composite_op: self.composite_op,
            stroke: self.stroke.clone(),
            dash_pattern: self.dash_pattern.clone(),
            dash_offset: self.dash_offset,
            clip: self.clip.clone(),
        });
    }

    /// Pops the most recently saved state. A no-op on an empty stack,
    /// matching HTML5 Canvas rather than an error.
    pub fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.ctm = s.ctm;
            self.fill_color = s.fill_color;
            self.stroke_color = s.stroke_color;
            self.global_alpha = s.global_alpha;
            self.composite_op = s.composite_op;
            self.stroke = s.stroke;
            self.dash_pattern = s.dash_pattern;
            self.dash_offset = s.dash_offset;
            self.clip = s.clip;
        }
    }

    // ---- transform ----

    /// Post-concatenates a translation onto the CTM.
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.ctm = self.ctm.post_concat(&Transform::from_translate(tx, ty));
    }

    /// Post-concatenates a scale onto the CTM.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.ctm = self.ctm.post_concat(&Transform::from_scale(sx, sy));
    }

    /// Post-concatenates a rotation onto the CTM. `angle` is in *radians*,
    /// matching Canvas (`Transform::from_rotate` itself takes degrees, so
    /// this converts).
    pub fn rotate(&mut self, angle_radians: f32) {
        self.ctm = self.ctm.post_concat(&Transform::from_rotate(angle_radians.to_degrees()));
    }

    /// Canvas's `transform(a,b,c,d,e,f)`: post-concatenates an arbitrary
    /// affine onto the CTM.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Result<()> {
        let t = Transform::from_row(a, b, c, d, e, f).ok_or(SwCanvasError::InvalidArgument("transform components must be finite"))?;
        self.ctm = self.ctm.post_concat(&t);
        Ok(())
    }

    /// Canvas's `setTransform(a,b,c,d,e,f)`: replaces the CTM outright.
    pub fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Result<()> {
        self.ctm = Transform::from_row(a, b, c, d, e, f).ok_or(SwCanvasError::InvalidArgument("transform components must be finite"))?;
        Ok(())
    }

    /// Resets the CTM to identity.
    pub fn reset_transform(&mut self) {
        self.ctm = Transform::identity();
    }

    /// The current transform matrix.
    pub fn current_transform(&self) -> Transform {
        self.ctm
    }

    // ---- style / line properties ----

    /// Sets the fill color (core API: numeric, not a CSS string — string
    /// parsing belongs in an optional facade layer, not here).
    pub fn set_fill_style(&mut self, color: Color) {
        self.fill_color = color;
    }
    /// The current fill color.
    pub fn fill_style(&self) -> Color {
        self.fill_color
    }

    /// Sets the stroke color.
    pub fn set_stroke_style(&mut self, color: Color) {
        self.stroke_color = color;
    }
    /// The current stroke color.
    pub fn stroke_style(&self) -> Color {
        self.stroke_color
    }

    /// Sets `globalAlpha`, clamped to `[0, 1]`.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }
    /// The current `globalAlpha`.
    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    /// Sets the composite operation (`source-over` or `copy`).
    pub fn set_global_composite_operation(&mut self, op: CompositeOp) {
        self.composite_op = op;
    }
    /// The current composite operation.
    pub fn global_composite_operation(&self) -> CompositeOp {
        self.composite_op
    }

    /// Sets `lineWidth`. `InvalidArgument` for negative or non-finite.
    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        if !width.is_finite() || width < 0.0 {
            return Err(SwCanvasError::InvalidArgument("lineWidth must be finite and >= 0"));
        }
        self.stroke.width = width;
        Ok(())
    }
    /// The current `lineWidth`.
    pub fn line_width(&self) -> f32 {
        self.stroke.width
    }

    /// Sets `lineJoin`.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.stroke.line_join = join;
    }
    /// The current `lineJoin`.
    pub fn line_join(&self) -> LineJoin {
        self.stroke.line_join
    }

    /// Sets `lineCap`.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.stroke.line_cap = cap;
    }
    /// The current `lineCap`.
    pub fn line_cap(&self) -> LineCap {
        self.stroke.line_cap
    }

    /// Sets `miterLimit`. `InvalidArgument` for non-positive or non-finite.
    pub fn set_miter_limit(&mut self, limit: f32) -> Result<()> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(SwCanvasError::InvalidArgument("miterLimit must be finite and > 0"));
        }
        self.stroke.miter_limit = limit;
        Ok(())
    }
    /// The current `miterLimit`.
    pub fn miter_limit(&self) -> f32 {
        self.stroke.miter_limit
    }

    /// Canvas's `setLineDash(segments)`. An empty slice clears dashing.
    /// `InvalidArgument` if any entry is negative or non-finite.
    pub fn set_line_dash(&mut self, segments: &[f32]) -> Result<()> {
        if segments.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SwCanvasError::InvalidArgument("dash segments must be finite and non-negative"));
        }
        self.dash_pattern = segments.to_vec();
        Ok(())
    }
    /// The current dash pattern (empty means "no dash").
    pub fn line_dash(&self) -> &[f32] {
        &self.dash_pattern
    }

    /// Sets `lineDashOffset`.
    pub fn set_line_dash_offset(&mut self, offset: f32) {
        self.dash_offset = offset;
    }
    /// The current `lineDashOffset`.
    pub fn line_dash_offset(&self) -> f32 {
        self.dash_offset
    }

    // ---- diagnostics ----

    /// `true` if any draw call since the last [`reset_slow_path_flag`] went
    /// through the general polygon pipeline rather than a direct-primitive
    /// fast path.
    ///
    /// [`reset_slow_path_flag`]: Context2D::reset_slow_path_flag
    pub fn was_slow_path_used(&self) -> bool {
        self.slow_path_used
    }

    /// Clears the slow-path diagnostic flag.
    pub fn reset_slow_path_flag(&mut self) {
        self.slow_path_used = false;
    }

    // ---- path recording ----

    /// Discards the current path.
    pub fn begin_path(&mut self) {
        self.path = PathBuilder::new();
    }

    /// Starts a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    /// Adds a line to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    /// Adds a quadratic curve through control point `(cx, cy)` to `(x, y)`.
    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.path.quad_to(cx, cy, x, y);
    }

    /// Adds a cubic curve through control points `(c1x,c1y)`/`(c2x,c2y)` to
    /// `(x, y)`.
    pub fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.path.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    /// Canvas's `arc(cx,cy,r,startAngle,endAngle,counterclockwise)`. Draws a
    /// connecting line from the current point to the arc's start if the
    /// path already has content, matching Canvas (the underlying arc verb
    /// itself never auto-connects).
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32, ccw: bool) -> Result<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(SwCanvasError::InvalidArgument("arc radius must be finite and >= 0"));
        }
        let start = Point::from_xy(cx + radius * start_angle.cos(), cy + radius * start_angle.sin());
        if self.path.is_empty() {
            self.path.move_to(start.x, start.y);
        } else {
            self.path.line_to(start.x, start.y);
        }
        self.path.arc(cx, cy, radius, start_angle, end_angle, ccw);
        Ok(())
    }

    /// Canvas's `arcTo(x1,y1,x2,y2,radius)`.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) -> Result<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(SwCanvasError::InvalidArgument("arcTo radius must be finite and >= 0"));
        }
        self.path.arc_to(x1, y1, x2, y2, radius);
        Ok(())
    }

    /// Canvas's `ellipse(...)`.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, start_angle: f32, end_angle: f32, ccw: bool) -> Result<()> {
        if !rx.is_finite() || !ry.is_finite() || rx < 0.0 || ry < 0.0 {
            return Err(SwCanvasError::InvalidArgument("ellipse radii must be finite and >= 0"));
        }
        self.path.ellipse(cx, cy, rx, ry, rotation, start_angle, end_angle, ccw);
        Ok(())
    }

    /// Adds a new closed rectangular subpath.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path.rect(x, y, w, h);
    }

    /// Adds a rounded-rect subpath (circular corners of radius `r`).
    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) -> Result<()> {
        if !r.is_finite() || r < 0.0 {
            return Err(SwCanvasError::InvalidArgument("roundRect radius must be finite and >= 0"));
        }
        self.path.round_rect(x, y, w, h, r, r);
        Ok(())
    }

    /// Closes the current subpath.
    pub fn close_path(&mut self) {
        self.path.close();
    }

    fn snapshot_path(&self) -> Option<Path> {
        self.path.clone().finish()
    }

    // ---- fill / stroke / clip ----

    /// Fills the current path under the nonzero winding rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(FillRule::NonZero);
    }

    /// Fills the current path under `rule`.
    pub fn fill_with_rule(&mut self, rule: FillRule) {
        if let Some(path) = self.snapshot_path() {
            self.fill_path(&path, rule);
        }
    }

    /// Strokes the current path.
    pub fn stroke(&mut self) {
        if let Some(path) = self.snapshot_path() {
            self.stroke_path(&path);
        }
    }

    /// Fills then strokes the current path, equivalent to calling `fill()`
    /// followed by `stroke()` — except for an axis-aligned rounded rect,
    /// which is coordinated in a single pass (see
    /// [`RoundedRectOps::fill_and_stroke`]) so the fill's edge never shows
    /// through, or double-blends under, a semi-transparent stroke.
    pub fn fill_and_stroke(&mut self) {
        let Some(path) = self.snapshot_path() else { return };
        let stroke = self.effective_stroke();
        let ctm = self.ctm;

        if let Shape::RoundedRect { rect, radius } = classify_shape(&path) {
            if stroke.width > 1e-6 && stroke.dash.is_none() && ctm.is_axis_aligned() {
                if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                    log::trace!("fill_and_stroke dispatch: rounded-rect shape -> RoundedRectOps");
                    let scale = ctm.max_scale();
                    RoundedRectOps::fill_and_stroke(
                        &mut self.surface,
                        &self.clip,
                        device_rect,
                        radius * scale,
                        stroke.width * 0.5 * scale,
                        self.fill_color,
                        self.stroke_color,
                        self.alpha_u8(),
                        self.composite_op,
                    );
                    return;
                }
            }
        }

        self.fill_path(&path, FillRule::NonZero);
        self.stroke_path(&path);
    }

    /// Intersects the current clip with the current path under the
    /// nonzero rule.
    pub fn clip(&mut self) {
        self.clip_with_rule(FillRule::NonZero);
    }

    /// Intersects the current clip with the current path under `rule`.
    pub fn clip_with_rule(&mut self, rule: FillRule) {
        let Some(path) = self.snapshot_path() else { return };
        let device_scale = self.ctm.max_scale();
        let subpaths = path_flattener::flatten_path(&path, device_scale);
        if subpaths.is_empty() {
            return;
        }
        let polygons: Vec<Vec<Point>> = subpaths
            .iter()
            .map(|sp| {
                let mut pts = sp.points.clone();
                self.ctm.map_points(&mut pts);
                pts
            })
            .collect();
        self.clip.intersect_path(&polygons, rule, self.surface.width(), self.surface.height());
    }

    fn fill_path(&mut self, path: &Path, rule: FillRule) {
        let color = self.fill_color;
        let alpha = self.alpha_u8();
        let op = self.composite_op;
        let ctm = self.ctm;

        match classify_shape(path) {
            Shape::AxisRect(rect) => {
                log::trace!("fill dispatch: axis-rect shape -> RectOps");
                if ctm.is_axis_aligned() {
                    if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                        RectOps::fill_axis_aligned(&mut self.surface, &self.clip, device_rect, color, alpha, op);
                    }
                } else {
                    RectOps::fill_rotated(&mut self.surface, &self.clip, map_rect_corners(rect, &ctm), color, alpha, op);
                }
            }
            Shape::RoundedRect { rect, radius } if ctm.is_uniform_scale() => {
                log::trace!("fill dispatch: rounded-rect shape -> RoundedRectOps");
                let scale = ctm.max_scale();
                if ctm.is_axis_aligned() {
                    if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                        RoundedRectOps::fill(&mut self.surface, &self.clip, device_rect, radius * scale, color, alpha, op);
                    }
                } else {
                    let mut outline = rounded_rect_ops::outline_polygon(rect, radius);
                    ctm.map_points(&mut outline);
                    device_fill::fill_polygons(&mut self.surface, &self.clip, &[outline], FillRule::NonZero, color, alpha, op);
                }
            }
            Shape::Circle { center, radius } if ctm.is_uniform_scale() => {
                log::trace!("fill dispatch: circle shape -> CircleOps");
                CircleOps::fill(&mut self.surface, &self.clip, ctm.map_point(center), radius * ctm.max_scale(), color, alpha, op);
            }
            Shape::Arc { center, radius, start, end } if ctm.is_uniform_scale() => {
                log::trace!("fill dispatch: arc shape -> ArcOps");
                let device_radius = radius * ctm.max_scale();
                ArcOps::fill(&mut self.surface, &self.clip, ctm.map_point(center), device_radius, start, end, device_radius, color, alpha, op);
            }
            _ => {
                self.slow_path_used = true;
                log::trace!("fill dispatch: general polygon pipeline");
                let device_scale = ctm.max_scale();
                let subpaths = path_flattener::flatten_path(path, device_scale);
                if subpaths.is_empty() {
                    return;
                }
                let polygons: Vec<Vec<Point>> = subpaths
                    .iter()
                    .map(|sp| {
                        let mut pts = sp.points.clone();
                        ctm.map_points(&mut pts);
                        pts
                    })
                    .collect();
                device_fill::fill_polygons(&mut self.surface, &self.clip, &polygons, rule, color, alpha, op);
            }
        }
    }

    fn stroke_path(&mut self, path: &Path) {
        let stroke = self.effective_stroke();
        if !(stroke.width > 1e-6) {
            return;
        }
        let color = self.stroke_color;
        let alpha = self.alpha_u8();
        let op = self.composite_op;
        let ctm = self.ctm;
        let hw = stroke.width * 0.5;
        let unscaled_fast_path = stroke.dash.is_none();

        match classify_shape(path) {
            Shape::AxisRect(rect) if unscaled_fast_path => {
                log::trace!("stroke dispatch: axis-rect shape -> RectOps");
                if ctm.is_axis_aligned() {
                    if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                        RectOps::stroke_axis_aligned(&mut self.surface, &self.clip, device_rect, hw * ctm.max_scale(), color, alpha, op);
                    }
                } else {
                    let outer = rect.outset(hw, hw).unwrap_or(rect);
                    let outer_corners = map_rect_corners(outer, &ctm);
                    match rect.inset(hw, hw) {
                        Some(inner) if inner.width() > 0.0 && inner.height() > 0.0 => {
                            RectOps::stroke_rotated(&mut self.surface, &self.clip, outer_corners, map_rect_corners(inner, &ctm), color, alpha, op);
                        }
                        _ => RectOps::fill_rotated(&mut self.surface, &self.clip, outer_corners, color, alpha, op),
                    }
                }
            }
            Shape::RoundedRect { rect, radius } if unscaled_fast_path && ctm.is_uniform_scale() => {
                log::trace!("stroke dispatch: rounded-rect shape -> RoundedRectOps");
                let scale = ctm.max_scale();
                if ctm.is_axis_aligned() {
                    if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                        RoundedRectOps::stroke(&mut self.surface, &self.clip, device_rect, radius * scale, hw * scale, color, alpha, op);
                    }
                } else {
                    let outer_rect = rect.outset(hw, hw).unwrap_or(rect);
                    let mut outer = rounded_rect_ops::outline_polygon(outer_rect, radius + hw);
                    ctm.map_points(&mut outer);
                    match rect.inset(hw, hw) {
                        Some(inner_rect) if inner_rect.width() > 0.0 && inner_rect.height() > 0.0 => {
                            let mut inner = rounded_rect_ops::outline_polygon(inner_rect, (radius - hw).max(0.0));
                            ctm.map_points(&mut inner);
                            device_fill::fill_ring(&mut self.surface, &self.clip, outer, inner, color, alpha, op);
                        }
                        _ => device_fill::fill_polygons(&mut self.surface, &self.clip, &[outer], FillRule::NonZero, color, alpha, op),
                    }
                }
            }
            Shape::Circle { center, radius } if unscaled_fast_path && ctm.is_uniform_scale() => {
                log::trace!("stroke dispatch: circle shape -> CircleOps");
                let scale = ctm.max_scale();
                CircleOps::stroke(&mut self.surface, &self.clip, ctm.map_point(center), radius * scale, hw * scale, color, alpha, op);
            }
            Shape::Arc { center, radius, start, end } if unscaled_fast_path && ctm.is_uniform_scale() => {
                log::trace!("stroke dispatch: arc shape -> ArcOps");
                let scale = ctm.max_scale();
                let device_radius = radius * scale;
                let device_stroke = Stroke { width: stroke.width * scale, ..stroke.clone() };
                ArcOps::stroke(&mut self.surface, &self.clip, ctm.map_point(center), device_radius, start, end, device_radius, &device_stroke, color, alpha, op);
            }
            Shape::Line { p0, p1 } if unscaled_fast_path && ctm.is_uniform_scale() => {
                log::trace!("stroke dispatch: line shape -> LineOps");
                let scale = ctm.max_scale();
                let device_stroke = Stroke { width: stroke.width * scale, ..stroke.clone() };
                LineOps::stroke(&mut self.surface, &self.clip, ctm.map_point(p0), ctm.map_point(p1), &device_stroke, color, alpha, op);
            }
            _ => {
                self.slow_path_used = true;
                log::trace!("stroke dispatch: general polygon pipeline");
                let device_scale = ctm.max_scale();
                let subpaths = path_flattener::flatten_path(path, device_scale);
                let mut polygons = Vec::new();
                for sp in &subpaths {
                    if PathStroker::stroke(&sp.points, sp.closed, &stroke, &mut polygons).is_err() {
                        return;
                    }
                }
                for poly in polygons.iter_mut() {
                    ctm.map_points(poly);
                }
                device_fill::fill_polygons(&mut self.surface, &self.clip, &polygons, FillRule::NonZero, color, alpha, op);
            }
        }
    }

    // ---- direct rect primitives ----

    /// Fills `[x, x+w) x [y, y+h)` (in user space) with the current fill
    /// style, independent of the recorded path.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let rect = Rect::from_xywh(x, y, w, h).ok_or(SwCanvasError::InvalidArgument("fillRect requires a positive, finite width/height"))?;
        log::trace!("fillRect dispatch: RectOps");
        let (color, alpha, op, ctm) = (self.fill_color, self.alpha_u8(), self.composite_op, self.ctm);
        if ctm.is_axis_aligned() {
            if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                RectOps::fill_axis_aligned(&mut self.surface, &self.clip, device_rect, color, alpha, op);
            }
        } else {
            RectOps::fill_rotated(&mut self.surface, &self.clip, map_rect_corners(rect, &ctm), color, alpha, op);
        }
        Ok(())
    }

    /// Strokes the border of `[x, x+w) x [y, y+h)` with the current stroke
    /// style, independent of the recorded path.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let rect = Rect::from_xywh(x, y, w, h).ok_or(SwCanvasError::InvalidArgument("strokeRect requires a positive, finite width/height"))?;
        if !(self.stroke.width > 1e-6) {
            return Ok(());
        }
        log::trace!("strokeRect dispatch: RectOps");
        let (color, alpha, op, ctm, hw) = (self.stroke_color, self.alpha_u8(), self.composite_op, self.ctm, self.stroke.width * 0.5);
        if ctm.is_axis_aligned() {
            if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                RectOps::stroke_axis_aligned(&mut self.surface, &self.clip, device_rect, hw * ctm.max_scale(), color, alpha, op);
            }
        } else {
            let outer = rect.outset(hw, hw).unwrap_or(rect);
            let outer_corners = map_rect_corners(outer, &ctm);
            match rect.inset(hw, hw) {
                Some(inner) if inner.width() > 0.0 && inner.height() > 0.0 => {
                    RectOps::stroke_rotated(&mut self.surface, &self.clip, outer_corners, map_rect_corners(inner, &ctm), color, alpha, op);
                }
                _ => RectOps::fill_rotated(&mut self.surface, &self.clip, outer_corners, color, alpha, op),
            }
        }
        Ok(())
    }

    /// Clears `[x, x+w) x [y, y+h)` to fully transparent, ignoring
    /// `globalAlpha`/composite op (matches HTML5 Canvas `clearRect`).
    /// Implemented as a `Copy`-op rect fill, which writes verbatim — the
    /// same direct primitive `fillRect` uses.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let rect = Rect::from_xywh(x, y, w, h).ok_or(SwCanvasError::InvalidArgument("clearRect requires a positive, finite width/height"))?;
        let ctm = self.ctm;
        if ctm.is_axis_aligned() {
            if let Some(device_rect) = map_rect_axis_aligned(rect, &ctm) {
                RectOps::fill_axis_aligned(&mut self.surface, &self.clip, device_rect, Color::TRANSPARENT, 255, CompositeOp::Copy);
            }
        } else {
            RectOps::fill_rotated(&mut self.surface, &self.clip, map_rect_corners(rect, &ctm), Color::TRANSPARENT, 255, CompositeOp::Copy);
        }
        Ok(())
    }

    // ---- image data ----

    /// Reads back a `w x h` rect of the surface at `(x, y)`, clipped to the
    /// surface's bounds rather than erroring on an out-of-range rect.
    pub fn get_image_data(&self, x: i32, y: i32, w: u32, h: u32) -> Result<ImageData> {
        image_data::get_image_data(&self.surface, x, y, w, h)
    }

    /// Writes `img`'s bytes verbatim at `(x, y)`, no blending, clipped to
    /// the intersection with the surface.
    pub fn put_image_data(&mut self, img: &ImageData, x: i32, y: i32) {
        image_data::put_image_data(&mut self.surface, img, x, y);
    }

    /// Draws `img` with its top-left anchored at user-space `(dx, dy)`,
    /// blended through the current clip, `globalAlpha`, and composite op.
    pub fn draw_image(&mut self, img: &ImageData, dx: f32, dy: f32) {
        image_data::draw_image(&mut self.surface, &self.clip, img, dx, dy, &self.ctm, self.alpha_u8(), self.composite_op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_writes_exact_region_scenario_1() {
        let mut ctx = Context2D::new(100, 100).unwrap();
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.fill_rect(25.0, 25.0, 50.0, 50.0).unwrap();
        assert_eq!(ctx.surface().pixel(30, 30), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(10, 10), Some(Color::TRANSPARENT));
        assert_eq!(ctx.surface().pixel(80, 80), Some(Color::TRANSPARENT));
        assert!(!ctx.was_slow_path_used());
    }

    #[test]
    fn global_alpha_blends_scenario_2() {
        let mut ctx = Context2D::new(200, 150).unwrap();
        ctx.set_fill_style(Color::WHITE);
        ctx.fill_rect(0.0, 0.0, 200.0, 150.0).unwrap();
        ctx.set_global_alpha(0.5);
        ctx.set_fill_style(Color::from_rgba8(0, 255, 0, 255));
        ctx.fill_rect(40.0, 40.0, 80.0, 60.0).unwrap();
        let p = ctx.surface().pixel(80, 70).unwrap();
        assert!((p.red() as i32 - 127).abs() <= 1);
        assert_eq!(p.green(), 255);
        assert!((p.blue() as i32 - 127).abs() <= 1);
    }

    #[test]
    fn translate_then_scale_moves_fillrect_scenario_3() {
        let mut ctx = Context2D::new(100, 100).unwrap();
        ctx.translate(40.0, 40.0);
        ctx.scale(2.0, 2.0);
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.fill_rect(0.0, 0.0, 15.0, 15.0).unwrap();
        assert_eq!(ctx.surface().pixel(41, 41), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(35, 35), Some(Color::TRANSPARENT));
    }

    #[test]
    fn arc_clip_then_fill_rect_scenario_4() {
        let mut ctx = Context2D::new(100, 100).unwrap();
        ctx.begin_path();
        ctx.arc(50.0, 50.0, 30.0, 0.0, std::f32::consts::TAU, false).unwrap();
        ctx.clip();
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.fill_rect(0.0, 0.0, 100.0, 100.0).unwrap();
        assert_eq!(ctx.surface().pixel(50, 50), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(10, 10), Some(Color::TRANSPARENT));
        assert_eq!(ctx.surface().pixel(50, 19), Some(Color::TRANSPARENT));
        assert_eq!(ctx.surface().pixel(50, 20), Some(Color::from_rgba8(255, 0, 0, 255)));
    }

    #[test]
    fn evenodd_fill_leaves_inner_rect_hollow_scenario_5() {
        let mut ctx = Context2D::new(100, 100).unwrap();
        ctx.begin_path();
        ctx.rect(20.0, 20.0, 60.0, 60.0);
        ctx.rect(30.0, 30.0, 40.0, 40.0);
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.fill_with_rule(FillRule::EvenOdd);
        assert_eq!(ctx.surface().pixel(25, 25), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(50, 50), Some(Color::TRANSPARENT));
        assert_eq!(ctx.surface().pixel(70, 70), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert!(ctx.was_slow_path_used());
    }

    #[test]
    fn save_restore_round_trips_state_but_not_path() {
        let mut ctx = Context2D::new(10, 10).unwrap();
        ctx.move_to(1.0, 1.0);
        ctx.save();
        ctx.set_fill_style(Color::from_rgba8(9, 9, 9, 9));
        ctx.translate(5.0, 5.0);
        ctx.line_to(2.0, 2.0);
        ctx.restore();
        assert_eq!(ctx.fill_style(), Color::BLACK);
        assert_eq!(ctx.current_transform(), Transform::identity());
        // The path survives restore (still has both the pre- and post-save points).
        assert!(ctx.snapshot_path().is_some());
    }

    #[test]
    fn restore_on_empty_stack_is_a_no_op() {
        let mut ctx = Context2D::new(10, 10).unwrap();
        ctx.restore();
        assert_eq!(ctx.current_transform(), Transform::identity());
    }

    #[test]
    fn rect_fast_path_and_general_path_strokes_match_axis_aligned() {
        let mut a = Context2D::new(40, 40).unwrap();
        a.set_stroke_style(Color::from_rgba8(0, 0, 255, 255));
        a.set_line_width(3.0).unwrap();
        a.rect(10.0, 10.0, 20.0, 20.0);
        a.stroke();
        assert!(!a.was_slow_path_used());

        let mut b = Context2D::new(40, 40).unwrap();
        b.set_stroke_style(Color::from_rgba8(0, 0, 255, 255));
        b.set_line_width(3.0).unwrap();
        // A rotation of exactly 0 degrees still routes through the general
        // pipeline, since `transform()` is not a recognized fast shape by
        // itself -- force it via an explicit non-identity-but-trivial skew.
        b.transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).unwrap();
        b.move_to(10.0, 10.0);
        b.line_to(30.0, 10.0);
        b.line_to(30.0, 30.0);
        b.line_to(10.0, 30.0);
        b.close_path();
        b.stroke();
        assert!(b.was_slow_path_used());

        assert_eq!(a.surface().data(), b.surface().data());
    }

    #[test]
    fn fill_and_stroke_coordinates_rounded_rect() {
        let mut ctx = Context2D::new(40, 40).unwrap();
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.set_stroke_style(Color::from_rgba8(0, 0, 255, 255));
        ctx.set_line_width(2.0).unwrap();
        ctx.round_rect(4.0, 4.0, 32.0, 32.0, 8.0).unwrap();
        ctx.fill_and_stroke();
        assert_eq!(ctx.surface().pixel(20, 20), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(20, 4), Some(Color::from_rgba8(0, 0, 255, 255)));
    }

    #[test]
    fn fill_and_stroke_falls_back_for_non_rounded_rect_shapes() {
        let mut ctx = Context2D::new(40, 40).unwrap();
        ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        ctx.set_stroke_style(Color::from_rgba8(0, 0, 255, 255));
        ctx.set_line_width(2.0).unwrap();
        ctx.arc(20.0, 20.0, 10.0, 0.0, std::f32::consts::TAU, false).unwrap();
        ctx.fill_and_stroke();
        assert_eq!(ctx.surface().pixel(20, 20), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(ctx.surface().pixel(20, 10), Some(Color::from_rgba8(0, 0, 255, 255)));
    }
}
