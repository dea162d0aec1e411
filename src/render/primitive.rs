use crate::foundation::core::{Point, Rgba8};
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::markup::tree::{CircleAttrs, NodeKind, PolygonAttrs, RectAttrs, TextAttrs};
use crate::style::length::parse_length;
use crate::style::{ResolvedStyle, Resolver};
use crate::transform::TransformStack;

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "serif";

/// Largest magnitude accepted for a canvas-space coordinate, size or radius.
///
/// Curve flattening cost grows with the radius, so anything past this is skipped rather than
/// handed to the rasterizer.
pub const MAX_EXTENT: f64 = 1.0e6;

/// Largest font size a label may ask for. Same bound as stroke widths.
pub const MAX_FONT_SIZE: f64 = 4096.0;

/// A text label in canvas coordinates. `origin` is the top-left corner of the first glyph's
/// line box (ascender line, left edge).
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub origin: Point,
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    pub style: ResolvedStyle,
}

impl TextRun {
    /// Glyph color. Text without a usable fill is drawn opaque black.
    pub fn glyph_color(&self) -> Rgba8 {
        self.style.fill.unwrap_or(Rgba8::BLACK)
    }
}

/// One paintable element, fully resolved and already offset into canvas space.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect {
        rect: kurbo::Rect,
        style: ResolvedStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        style: ResolvedStyle,
    },
    Polygon {
        points: Vec<Point>,
        style: ResolvedStyle,
    },
    Text(TextRun),
}

/// Resolve a node into something paintable, mapping its coordinates through `stack`.
///
/// Groups and unknown elements have nothing of their own to paint and give `None`. Elements
/// with geometry that cannot be drawn (non-finite, negative or beyond [`MAX_EXTENT`]) are
/// skipped with an `ElementSkipped` diagnostic.
pub fn resolve_primitive(
    kind: &NodeKind,
    stack: &TransformStack,
    diags: &mut Diagnostics,
) -> Option<Primitive> {
    match kind {
        NodeKind::Rect(a) => resolve_rect(a, stack, diags),
        NodeKind::Circle(a) => resolve_circle(a, stack, diags),
        NodeKind::Polygon(a) => resolve_polygon(a, stack, diags),
        NodeKind::Text(a) => resolve_text(a, stack, diags),
        NodeKind::Group(_) | NodeKind::Unknown { .. } => None,
    }
}

/// Check finiteness and the extent cap, recording the skip reason.
fn in_bounds(diags: &mut Diagnostics, element: &str, values: &[f64]) -> bool {
    if !values.iter().all(|v| v.is_finite()) {
        skip(diags, element, "geometry is not finite");
        return false;
    }
    if let Some(v) = values.iter().find(|v| v.abs() > MAX_EXTENT) {
        skip(diags, element, &format!("value {v} exceeds the {MAX_EXTENT} extent limit"));
        return false;
    }
    true
}

fn resolve_rect(a: &RectAttrs, stack: &TransformStack, diags: &mut Diagnostics) -> Option<Primitive> {
    let mut r = Resolver::new("rect", diags);
    let local = Point::new(
        r.length("x", a.x.as_deref(), 0.0),
        r.length("y", a.y.as_deref(), 0.0),
    );
    let w = r.length("width", a.width.as_deref(), 0.0);
    let h = r.length("height", a.height.as_deref(), 0.0);
    let style = r.style(&a.paint);

    let origin = stack.apply(local);
    if !in_bounds(r.diagnostics(), "rect", &[origin.x, origin.y, w, h]) {
        return None;
    }
    if w < 0.0 || h < 0.0 {
        skip(r.diagnostics(), "rect", &format!("negative size {w}x{h}"));
        return None;
    }
    Some(Primitive::Rect {
        rect: kurbo::Rect::from_origin_size(origin, (w, h)),
        style,
    })
}

fn resolve_circle(
    a: &CircleAttrs,
    stack: &TransformStack,
    diags: &mut Diagnostics,
) -> Option<Primitive> {
    let mut r = Resolver::new("circle", diags);
    let local = Point::new(
        r.length("cx", a.cx.as_deref(), 0.0),
        r.length("cy", a.cy.as_deref(), 0.0),
    );
    let radius = r.length("r", a.r.as_deref(), 0.0);
    let style = r.style(&a.paint);

    let center = stack.apply(local);
    if !in_bounds(r.diagnostics(), "circle", &[center.x, center.y, radius]) {
        return None;
    }
    if radius < 0.0 {
        skip(r.diagnostics(), "circle", &format!("negative radius {radius}"));
        return None;
    }
    Some(Primitive::Circle {
        center,
        radius,
        style,
    })
}

fn resolve_polygon(
    a: &PolygonAttrs,
    stack: &TransformStack,
    diags: &mut Diagnostics,
) -> Option<Primitive> {
    let mut r = Resolver::new("polygon", diags);
    let points: Vec<Point> = parse_points(a.points.as_deref().unwrap_or_default(), r.diagnostics())
        .into_iter()
        .map(|p| stack.apply(p))
        .collect();
    let style = r.style(&a.paint);

    let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    if !in_bounds(r.diagnostics(), "polygon", &coords) {
        return None;
    }
    Some(Primitive::Polygon { points, style })
}

fn resolve_text(a: &TextAttrs, stack: &TransformStack, diags: &mut Diagnostics) -> Option<Primitive> {
    if a.content.trim().is_empty() {
        return None;
    }
    let mut r = Resolver::new("text", diags);
    let local = Point::new(
        r.length("x", a.x.as_deref(), 0.0),
        r.length("y", a.y.as_deref(), 0.0),
    );
    let font_size = font_size(&mut r, a.font_size.as_deref());
    let style = r.style(&a.paint);

    let origin = stack.apply(local);
    if !in_bounds(r.diagnostics(), "text", &[origin.x, origin.y]) {
        return None;
    }
    if font_size > MAX_FONT_SIZE {
        skip(
            r.diagnostics(),
            "text",
            &format!("font-size {font_size} exceeds the {MAX_FONT_SIZE} limit"),
        );
        return None;
    }
    let font_family = a
        .font_family
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FONT_FAMILY)
        .to_owned();

    Some(Primitive::Text(TextRun {
        origin,
        content: a.content.clone(),
        font_size,
        font_family,
        style,
    }))
}

fn font_size(r: &mut Resolver<'_>, raw: Option<&str>) -> f64 {
    let Some(s) = raw else {
        return DEFAULT_FONT_SIZE;
    };
    let t = s.trim();
    let t = t.strip_suffix("px").unwrap_or(t);
    match parse_length(t) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => {
            r.diagnostics().record(
                DiagnosticKind::AttributeDefaulted,
                format!("text: font-size='{s}' is unusable, using {DEFAULT_FONT_SIZE}"),
            );
            DEFAULT_FONT_SIZE
        }
    }
}

/// Parse a `points` list of whitespace separated `x,y` pairs.
///
/// Tokens without a comma are dropped with a `PointSkipped` diagnostic. Each half of a pair is
/// a length with default 0, so `"5,abc"` is `(5, 0)`.
pub fn parse_points(raw: &str, diags: &mut Diagnostics) -> Vec<Point> {
    let mut out = Vec::new();
    for token in raw.split_whitespace() {
        let Some((xs, ys)) = token.split_once(',') else {
            diags.record(
                DiagnosticKind::PointSkipped,
                format!("polygon: point '{token}' has no comma"),
            );
            continue;
        };
        let mut r = Resolver::new("polygon", diags);
        let x = r.length("points", Some(xs), 0.0);
        let y = r.length("points", Some(ys), 0.0);
        out.push(Point::new(x, y));
    }
    out
}

fn skip(diags: &mut Diagnostics, element: &str, why: &str) {
    diags.record(DiagnosticKind::ElementSkipped, format!("{element}: {why}"));
}

#[cfg(test)]
#[path = "../../tests/unit/render/primitive.rs"]
mod tests;
