use super::*;

fn paint(fill: Option<&str>, stroke: Option<&str>, width: Option<&str>, opacity: Option<&str>) -> PaintAttrs {
    PaintAttrs {
        fill: fill.map(str::to_owned),
        stroke: stroke.map(str::to_owned),
        stroke_width: width.map(str::to_owned),
        opacity: opacity.map(str::to_owned),
    }
}

#[test]
fn opacity_defaults_and_clamps() {
    assert_eq!(resolve_opacity(None), 1.0);
    assert_eq!(resolve_opacity(Some("0.2")), 0.2);
    assert_eq!(resolve_opacity(Some("high")), 1.0);
    assert_eq!(resolve_opacity(Some("NaN")), 1.0);
    assert_eq!(resolve_opacity(Some("7")), 1.0);
    assert_eq!(resolve_opacity(Some("-1")), 0.0);
}

#[test]
fn stroke_width_truncates_to_whole_pixels() {
    assert_eq!(resolve_stroke_width(None), 1);
    assert_eq!(resolve_stroke_width(Some("2.9")), 2);
    assert_eq!(resolve_stroke_width(Some("0.8")), 0);
    assert_eq!(resolve_stroke_width(Some("1%")), 8);
    assert_eq!(resolve_stroke_width(Some("thick")), 1);
    assert_eq!(resolve_stroke_width(Some("-3")), 0);
    assert_eq!(resolve_stroke_width(Some("inf")), 1);
    assert_eq!(resolve_stroke_width(Some("1e12")), 4096);
}

#[test]
fn opacity_modulates_fill_but_not_stroke() {
    let mut diags = Diagnostics::new();
    let style = Resolver::new("circle", &mut diags).style(&paint(
        Some("red"),
        Some("red"),
        Some("3"),
        Some("0.2"),
    ));
    assert_eq!(style.fill, Some(Rgba8::new(255, 0, 0, 51)));
    assert_eq!(style.stroke, Some(Rgba8::new(255, 0, 0, 255)));
    assert_eq!(style.stroke_width, 3);
    assert_eq!(style.outline(), Some((Rgba8::new(255, 0, 0, 255), 3)));
    assert!(diags.is_empty());
}

#[test]
fn none_fill_and_missing_stroke_paint_nothing() {
    let mut diags = Diagnostics::new();
    let style = Resolver::new("circle", &mut diags).style(&paint(Some("none"), None, None, None));
    assert_eq!(style.fill, None);
    assert_eq!(style.stroke, None);
    assert_eq!(style.outline(), None);
    assert!(diags.is_empty());
}

#[test]
fn zero_width_disables_outline() {
    let mut diags = Diagnostics::new();
    let style = Resolver::new("rect", &mut diags).style(&paint(None, Some("black"), Some("0.5"), None));
    assert_eq!(style.stroke_width, 0);
    assert_eq!(style.outline(), None);
}

#[test]
fn bad_values_are_reported_once_each() {
    let mut diags = Diagnostics::new();
    let style = Resolver::new("rect", &mut diags).style(&paint(
        Some("unsc-blue"),
        Some("black"),
        Some("wide"),
        Some("mostly"),
    ));
    assert_eq!(style.fill, None);
    assert_eq!(style.stroke_width, 1);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(diags.count(DiagnosticKind::AttributeDefaulted), 3);
    assert!(diags.iter().any(|d| d.message.contains("unsc-blue")));
}

#[test]
fn length_reports_only_present_garbage() {
    let mut diags = Diagnostics::new();
    let mut r = Resolver::new("rect", &mut diags);
    assert_eq!(r.length("x", None, 0.0), 0.0);
    assert_eq!(r.length("x", Some("10%"), 0.0), 80.0);
    assert_eq!(r.length("y", Some("top"), 0.0), 0.0);
    assert_eq!(diags.count(DiagnosticKind::AttributeDefaulted), 1);
}
