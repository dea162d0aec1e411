use crate::foundation::core::CANVAS_WIDTH;

/// Pixels per percent. Percentages resolve against the canvas width for both axes.
const PX_PER_PERCENT: f64 = CANVAS_WIDTH as f64 / 100.0;

/// Parse a length: a plain number, or a number with trailing `%`.
pub fn parse_length(raw: &str) -> Option<f64> {
    let s = raw.trim();
    match s.strip_suffix('%') {
        Some(pct) => pct
            .trim_end_matches('%')
            .trim_end()
            .parse::<f64>()
            .ok()
            .map(|v| v * PX_PER_PERCENT),
        None => s.parse::<f64>().ok(),
    }
}

/// Resolve an optional raw length, falling back to `default` when absent or unparseable.
pub fn resolve_length(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(parse_length).unwrap_or(default)
}

#[cfg(test)]
#[path = "../../tests/unit/style/length.rs"]
mod tests;
