use swcanvas::{Color, Context2D, FillRule};

#[test]
fn circular_clip_restricts_a_later_fill() {
    let mut ctx = Context2D::new(100, 100).unwrap();
    ctx.begin_path();
    ctx.arc(50.0, 50.0, 30.0, 0.0, std::f32::consts::TAU, false).unwrap();
    ctx.clip();

    ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
    ctx.fill_rect(0.0, 0.0, 100.0, 100.0).unwrap();

    assert_eq!(ctx.surface().pixel(50, 50), Some(Color::from_rgba8(255, 0, 0, 255)));
    assert_eq!(ctx.surface().pixel(1, 1), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().pixel(99, 99), Some(Color::TRANSPARENT));
}

#[test]
fn second_clip_intersects_with_the_first() {
    let mut ctx = Context2D::new(100, 100).unwrap();
    ctx.begin_path();
    ctx.rect(10.0, 10.0, 60.0, 60.0);
    ctx.clip();

    ctx.begin_path();
    ctx.rect(40.0, 40.0, 60.0, 60.0);
    ctx.clip();

    ctx.set_fill_style(Color::from_rgba8(0, 255, 0, 255));
    ctx.fill_rect(0.0, 0.0, 100.0, 100.0).unwrap();

    // Only the overlap of the two clip rects, [40,70)x[40,70), is painted.
    assert_eq!(ctx.surface().pixel(50, 50), Some(Color::from_rgba8(0, 255, 0, 255)));
    assert_eq!(ctx.surface().pixel(20, 20), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().pixel(80, 80), Some(Color::TRANSPARENT));
}

#[test]
fn clip_is_restored_by_restore() {
    let mut ctx = Context2D::new(40, 40).unwrap();
    ctx.save();
    ctx.begin_path();
    ctx.rect(5.0, 5.0, 10.0, 10.0);
    ctx.clip();
    ctx.restore();

    ctx.set_fill_style(Color::from_rgba8(0, 0, 255, 255));
    ctx.fill_rect(0.0, 0.0, 40.0, 40.0).unwrap();

    // The clip set before restore() no longer applies.
    assert_eq!(ctx.surface().pixel(30, 30), Some(Color::from_rgba8(0, 0, 255, 255)));
}

#[test]
fn evenodd_clip_leaves_the_inner_rect_unclipped() {
    let mut ctx = Context2D::new(100, 100).unwrap();
    ctx.begin_path();
    ctx.rect(10.0, 10.0, 80.0, 80.0);
    ctx.rect(30.0, 30.0, 40.0, 40.0);
    ctx.clip_with_rule(FillRule::EvenOdd);

    ctx.set_fill_style(Color::from_rgba8(10, 20, 30, 255));
    ctx.fill_rect(0.0, 0.0, 100.0, 100.0).unwrap();

    assert_eq!(ctx.surface().pixel(50, 50), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().pixel(15, 15), Some(Color::from_rgba8(10, 20, 30, 255)));
}
