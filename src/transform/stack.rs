use std::sync::OnceLock;

use regex::Regex;

use crate::foundation::core::{Point, Vec2};

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("number regex must compile"))
}

/// Parse a `translate(dx, dy)` directive.
///
/// Returns `None` when the attribute is not a translate directive at all. Missing or
/// unparseable components default to 0, so `translate(10)` is `(10, 0)`.
pub fn parse_translate(transform: &str) -> Option<Vec2> {
    let t = transform.trim_start();
    if !t.starts_with("translate") {
        return None;
    }
    let mut nums = number_re()
        .find_iter(t)
        .map(|m| m.as_str().parse::<f64>().unwrap_or(0.0));
    let dx = nums.next().unwrap_or(0.0);
    let dy = nums.next().unwrap_or(0.0);
    Some(Vec2::new(dx, dy))
}

/// Cumulative translation offsets for the groups currently being walked.
///
/// The bottom entry is the root offset `(0, 0)` and is never popped, so [`offset`] is always
/// defined. Each [`push`] must be paired with one [`pop`] when the group is left.
///
/// [`offset`]: TransformStack::offset
/// [`push`]: TransformStack::push
/// [`pop`]: TransformStack::pop
#[derive(Clone, Debug, PartialEq)]
pub struct TransformStack {
    offsets: Vec<Vec2>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            offsets: vec![Vec2::ZERO],
        }
    }

    /// The offset applied to the element currently being visited.
    pub fn offset(&self) -> Vec2 {
        self.offsets.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// Enter a group translated by `delta` relative to its parent. Returns the new offset.
    pub fn push(&mut self, delta: Vec2) -> Vec2 {
        let next = self.offset() + delta;
        self.offsets.push(next);
        next
    }

    /// Leave the innermost group. The root entry stays; popping it returns `None`.
    pub fn pop(&mut self) -> Option<Vec2> {
        if self.offsets.len() <= 1 {
            return None;
        }
        self.offsets.pop()
    }

    /// Map a locally declared point to canvas coordinates.
    pub fn apply(&self, local: Point) -> Point {
        local + self.offset()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/stack.rs"]
mod tests;
