use super::*;

#[test]
fn none_and_absent_mean_no_paint() {
    assert_eq!(resolve_color(Some("none"), 1.0), None);
    assert_eq!(resolve_color(None, 1.0), None);
}

#[test]
fn hex_with_half_opacity_truncates_alpha() {
    assert_eq!(
        resolve_color(Some("#ff0000"), 0.5),
        Some(Rgba8::new(255, 0, 0, 127))
    );
}

#[test]
fn names_and_short_hex_resolve() {
    assert_eq!(
        resolve_color(Some("blue"), 1.0),
        Some(Rgba8::new(0, 0, 255, 255))
    );
    assert_eq!(
        resolve_color(Some("#0f0"), 1.0),
        Some(Rgba8::new(0, 255, 0, 255))
    );
    assert_eq!(
        resolve_color(Some("yellow"), 0.2),
        Some(Rgba8::new(255, 255, 0, 51))
    );
}

#[test]
fn unknown_color_is_unfilled_not_an_error() {
    assert_eq!(resolve_color(Some("covenant-purple"), 1.0), None);
    assert_eq!(resolve_color(Some(""), 1.0), None);
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(resolve_color(Some("white"), 3.0).map(|c| c.a), Some(255));
    assert_eq!(resolve_color(Some("white"), -1.0).map(|c| c.a), Some(0));
    assert_eq!(opacity_to_alpha(f64::NAN, 255), 255);
}

#[test]
fn colors_with_their_own_alpha_scale_it() {
    assert_eq!(resolve_color(Some("transparent"), 1.0).map(|c| c.a), Some(0));
    assert_eq!(resolve_color(Some("#00000080"), 0.5).map(|c| c.a), Some(64));
}
