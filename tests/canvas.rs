use swcanvas::{Color, Context2D};

#[test]
fn fill_rect_writes_exact_region() {
    let mut ctx = Context2D::new(100, 100).unwrap();
    ctx.set_fill_style(Color::from_rgba8(50, 127, 150, 200));
    ctx.fill_rect(20.0, 10.0, 50.0, 30.0).unwrap();

    assert_eq!(ctx.surface().pixel(40, 25), Some(Color::from_rgba8(50, 127, 150, 200)));
    assert_eq!(ctx.surface().pixel(5, 5), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().pixel(69, 39), Some(Color::TRANSPARENT));
}

#[test]
fn rotated_fill_rect_takes_the_rotated_fast_path() {
    let mut ctx = Context2D::new(100, 100).unwrap();
    ctx.translate(50.0, 50.0);
    ctx.rotate(std::f32::consts::FRAC_PI_4);
    ctx.set_fill_style(Color::from_rgba8(0, 0, 0, 255));
    ctx.fill_rect(-10.0, -10.0, 20.0, 20.0).unwrap();

    // The center is always covered regardless of rotation.
    assert_eq!(ctx.surface().pixel(50, 50), Some(Color::from_rgba8(0, 0, 0, 255)));
    // A 45-degree rotation turns the 20x20 square into a diamond reaching
    // further along the axes (~14.1px) than along its original diagonal
    // (~10px), so this point just past the diagonal falls outside it.
    assert_eq!(ctx.surface().pixel(50 + 13, 50 - 13), Some(Color::TRANSPARENT));
    assert!(!ctx.was_slow_path_used());
}

#[test]
fn global_alpha_blends_the_whole_draw() {
    let mut ctx = Context2D::new(10, 10).unwrap();
    ctx.set_fill_style(Color::WHITE);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();

    ctx.set_global_alpha(0.5);
    ctx.set_fill_style(Color::from_rgba8(0, 255, 0, 255));
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();

    let p = ctx.surface().pixel(5, 5).unwrap();
    assert!((p.red() as i32 - 127).abs() <= 1);
    assert_eq!(p.green(), 255);
}

#[test]
fn save_restore_round_trips_style_and_transform() {
    let mut ctx = Context2D::new(10, 10).unwrap();
    ctx.set_fill_style(Color::from_rgba8(1, 2, 3, 4));
    ctx.translate(3.0, 4.0);

    ctx.save();
    ctx.set_fill_style(Color::WHITE);
    ctx.translate(1.0, 1.0);
    ctx.restore();

    assert_eq!(ctx.fill_style(), Color::from_rgba8(1, 2, 3, 4));
    assert_eq!(ctx.current_transform(), swcanvas::Transform::from_translate(3.0, 4.0));
}

#[test]
fn clear_rect_undoes_a_fill_regardless_of_composite_op() {
    let mut ctx = Context2D::new(10, 10).unwrap();
    ctx.set_fill_style(Color::from_rgba8(255, 0, 0, 128));
    ctx.set_global_composite_operation(swcanvas::CompositeOp::SourceOver);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
    ctx.clear_rect(2.0, 2.0, 4.0, 4.0).unwrap();

    assert_eq!(ctx.surface().pixel(4, 4), Some(Color::TRANSPARENT));
    assert_ne!(ctx.surface().pixel(0, 0), Some(Color::TRANSPARENT));
}
