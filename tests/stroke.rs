use swcanvas::{Color, Context2D, LineCap};

#[test]
fn stroke_rect_leaves_the_interior_untouched() {
    let mut ctx = Context2D::new(40, 40).unwrap();
    ctx.set_stroke_style(Color::from_rgba8(0, 0, 255, 255));
    ctx.set_line_width(4.0).unwrap();
    ctx.stroke_rect(10.0, 10.0, 20.0, 20.0).unwrap();

    assert_eq!(ctx.surface().pixel(20, 20), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().pixel(10, 20), Some(Color::from_rgba8(0, 0, 255, 255)));
}

#[test]
fn rect_path_stroke_fast_path_matches_general_pipeline() {
    let build = |ctx: &mut Context2D| {
        ctx.set_stroke_style(Color::from_rgba8(10, 20, 30, 255));
        ctx.set_line_width(3.0).unwrap();
    };

    let mut fast = Context2D::new(40, 40).unwrap();
    build(&mut fast);
    fast.begin_path();
    fast.rect(10.0, 10.0, 20.0, 20.0);
    fast.stroke();
    assert!(!fast.was_slow_path_used());

    let mut general = Context2D::new(40, 40).unwrap();
    build(&mut general);
    general.begin_path();
    general.move_to(10.0, 10.0);
    general.line_to(30.0, 10.0);
    general.line_to(30.0, 30.0);
    general.line_to(10.0, 30.0);
    // An explicit fourth edge back to start instead of close_path() keeps
    // this shape off the rect-path classifier (no trailing Close verb),
    // forcing the general pipeline for comparison.
    general.line_to(10.0, 10.0);
    general.stroke();
    assert!(general.was_slow_path_used());

    assert_eq!(fast.surface().data(), general.surface().data());
}

#[test]
fn line_width_zero_strokes_nothing() {
    let mut ctx = Context2D::new(20, 20).unwrap();
    ctx.set_stroke_style(Color::BLACK);
    ctx.set_line_width(0.0).unwrap();
    ctx.move_to(0.0, 10.0);
    ctx.line_to(20.0, 10.0);
    ctx.stroke();
    assert_eq!(ctx.surface().pixel(10, 10), Some(Color::TRANSPARENT));
}

#[test]
fn negative_line_width_is_rejected() {
    let mut ctx = Context2D::new(10, 10).unwrap();
    assert!(ctx.set_line_width(-1.0).is_err());
}

#[test]
fn square_cap_extends_past_the_line_endpoint() {
    let mut ctx = Context2D::new(40, 20).unwrap();
    ctx.set_stroke_style(Color::BLACK);
    ctx.set_line_width(4.0).unwrap();
    ctx.set_line_cap(LineCap::Square);
    ctx.move_to(10.0, 10.0);
    ctx.line_to(30.0, 10.0);
    ctx.stroke();

    // Square caps extend half the line width (2px) past each endpoint.
    assert_eq!(ctx.surface().pixel(9, 10), Some(Color::BLACK));
    assert_eq!(ctx.surface().pixel(6, 10), Some(Color::TRANSPARENT));
}
