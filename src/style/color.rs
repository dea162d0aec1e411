use std::str::FromStr;

use crate::foundation::core::Rgba8;

/// Attribute value meaning "do not paint".
pub const NO_PAINT: &str = "none";

/// Parse a color by name (`red`), hex (`#f00`, `#ff0000`, `#ff000080`) or functional notation.
pub fn parse_color(raw: &str) -> Option<svgtypes::Color> {
    svgtypes::Color::from_str(raw.trim()).ok()
}

/// Alpha from an opacity, truncated toward zero.
///
/// `base` is the color's own alpha (255 for opaque colors), so `0.5` over an opaque color
/// gives `127`, not `128`. Non-finite opacities count as fully opaque.
pub fn opacity_to_alpha(opacity: f64, base: u8) -> u8 {
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };
    (opacity * f64::from(base)) as u8
}

/// Resolve a fill/stroke color. `None` means the shape part is left unpainted.
pub fn resolve_color(name: Option<&str>, opacity: f64) -> Option<Rgba8> {
    let name = name?;
    if name.trim() == NO_PAINT {
        return None;
    }
    let c = parse_color(name)?;
    Some(Rgba8::new(
        c.red,
        c.green,
        c.blue,
        opacity_to_alpha(opacity, c.alpha),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
