use super::*;

#[test]
fn overlay_canvas_is_fixed_800x600() {
    assert_eq!(Canvas::OVERLAY.width, 800);
    assert_eq!(Canvas::OVERLAY.height, 600);
    assert_eq!(Canvas::OVERLAY.pixel_count(), 480_000);
    assert_eq!(Canvas::OVERLAY.rgba8_len(), 1_920_000);
}

#[test]
fn alpha_as_unit_float() {
    assert_eq!(Rgba8::BLACK.alpha_f32(), 1.0);
    assert_eq!(Rgba8::new(255, 0, 0, 0).alpha_f32(), 0.0);
    assert!((Rgba8::new(0, 0, 0, 51).alpha_f32() - 0.2).abs() < 1e-6);
}
