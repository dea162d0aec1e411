use serde::Serialize;

use crate::foundation::core::Rgba8;
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::markup::tree::PaintAttrs;
use crate::style::color::{NO_PAINT, parse_color, resolve_color};
use crate::style::length::{parse_length, resolve_length};

pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_STROKE_WIDTH: u32 = 1;

/// Outline widths are clamped here so the stroker never sees absurd geometry.
const MAX_STROKE_WIDTH: f64 = 4096.0;

/// Paint for one element, computed during traversal and then dropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResolvedStyle {
    /// Fill color with opacity folded into alpha.
    pub fill: Option<Rgba8>,
    /// Outline color. Opacity never applies here.
    pub stroke: Option<Rgba8>,
    /// Whole-pixel outline width; 0 disables the outline.
    pub stroke_width: u32,
    /// The element opacity, clamped to `0..=1`.
    pub opacity: f64,
}

impl ResolvedStyle {
    /// Outline color and width, when an outline should be drawn.
    pub fn outline(&self) -> Option<(Rgba8, u32)> {
        match self.stroke {
            Some(c) if self.stroke_width > 0 => Some((c, self.stroke_width)),
            _ => None,
        }
    }
}

/// Parse an `opacity` attribute, default 1.0.
pub fn resolve_opacity(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map_or(DEFAULT_OPACITY, |v| v.clamp(0.0, 1.0))
}

/// Parse a `stroke-width` attribute into whole pixels (fraction truncated), default 1.
pub fn resolve_stroke_width(raw: Option<&str>) -> u32 {
    let w = resolve_length(raw, f64::from(DEFAULT_STROKE_WIDTH));
    if !w.is_finite() {
        return DEFAULT_STROKE_WIDTH;
    }
    let w = w.trunc();
    if w <= 0.0 {
        0
    } else {
        w.min(MAX_STROKE_WIDTH) as u32
    }
}

/// Attribute resolution for one element that reports every fallback to a default.
///
/// The free functions in [`crate::style`] give the same values; this wrapper only adds the
/// `AttributeDefaulted` diagnostics.
pub struct Resolver<'d> {
    element: &'static str,
    diags: &'d mut Diagnostics,
}

impl<'d> Resolver<'d> {
    pub fn new(element: &'static str, diags: &'d mut Diagnostics) -> Self {
        Self { element, diags }
    }

    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diags
    }

    pub fn length(&mut self, attr: &str, raw: Option<&str>, default: f64) -> f64 {
        if let Some(s) = raw
            && parse_length(s).is_none()
        {
            self.defaulted(attr, s, default);
        }
        resolve_length(raw, default)
    }

    pub fn style(&mut self, paint: &PaintAttrs) -> ResolvedStyle {
        let opacity_raw = paint.opacity.as_deref();
        if let Some(s) = opacity_raw
            && !s.trim().parse::<f64>().is_ok_and(f64::is_finite)
        {
            self.defaulted("opacity", s, DEFAULT_OPACITY);
        }
        let opacity = resolve_opacity(opacity_raw);

        if let Some(s) = paint.stroke_width.as_deref()
            && !parse_length(s).is_some_and(f64::is_finite)
        {
            self.defaulted("stroke-width", s, f64::from(DEFAULT_STROKE_WIDTH));
        }
        let stroke_width = resolve_stroke_width(paint.stroke_width.as_deref());

        self.check_color("fill", paint.fill.as_deref());
        self.check_color("stroke", paint.stroke.as_deref());

        ResolvedStyle {
            fill: resolve_color(paint.fill.as_deref(), opacity),
            stroke: resolve_color(paint.stroke.as_deref(), DEFAULT_OPACITY),
            stroke_width,
            opacity,
        }
    }

    fn check_color(&mut self, attr: &str, raw: Option<&str>) {
        let Some(s) = raw else {
            return;
        };
        if s.trim() != NO_PAINT && parse_color(s).is_none() {
            self.diags.record(
                DiagnosticKind::AttributeDefaulted,
                format!("{}: unknown {attr} color '{s}', left unpainted", self.element),
            );
        }
    }

    fn defaulted(&mut self, attr: &str, raw: &str, default: f64) {
        self.diags.record(
            DiagnosticKind::AttributeDefaulted,
            format!("{}: {attr}='{raw}' is not a number, using {default}", self.element),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/resolve.rs"]
mod tests;
