use super::*;
use crate::foundation::core::Point;
use crate::style::ResolvedStyle;

fn run(content: &str, fill: Option<Rgba8>, stroke: Option<Rgba8>) -> TextRun {
    TextRun {
        origin: Point::new(120.0, 48.5),
        content: content.to_owned(),
        font_size: 18.0,
        font_family: "DejaVu Sans".to_owned(),
        style: ResolvedStyle {
            fill,
            stroke,
            stroke_width: 2,
            opacity: 1.0,
        },
    }
}

#[test]
fn markup_anchors_label_at_top_left() {
    let svg = text_markup(&run("Red Base", None, None), Canvas::OVERLAY);
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\""));
    assert!(svg.contains(
        r#"x="120" y="48.5" font-size="18" dominant-baseline="text-before-edge" font-family="DejaVu Sans""#
    ));
    assert!(svg.contains(r#"fill="rgb(0,0,0)" fill-opacity="1""#));
    assert!(!svg.contains("stroke"));
    assert!(svg.ends_with(">Red Base</text></svg>"));
}

#[test]
fn markup_escapes_untrusted_content() {
    let mut r = run(r#"<b>"A&B"</b>"#, None, None);
    r.font_family = r#"x" onload="y"#.to_owned();
    let svg = text_markup(&r, Canvas::OVERLAY);
    assert!(svg.contains("&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"));
    assert!(svg.contains(r#"font-family="x&quot; onload=&quot;y""#));
    roxmltree::Document::parse(&svg).unwrap();
}

#[test]
fn outline_is_painted_under_the_fill() {
    let svg = text_markup(
        &run("Hill", Some(Rgba8::new(255, 0, 0, 255)), Some(Rgba8::new(0, 0, 255, 255))),
        Canvas::OVERLAY,
    );
    assert!(svg.contains(r#"fill="rgb(255,0,0)""#));
    assert!(svg.contains(r#"stroke="rgb(0,0,255)" stroke-opacity="1" stroke-width="2" paint-order="stroke""#));
}

#[test]
fn no_fonts_means_no_layer() {
    let text = TextRasterizer::without_fonts();
    assert!(!text.has_fonts());
    let layer = text
        .rasterize(&run("Boneyard", None, None), Canvas::OVERLAY)
        .unwrap();
    assert_eq!(layer, TextLayer::NoFonts);
}
