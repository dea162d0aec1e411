//! Element tree produced by recovery parsing.
//!
//! Attribute values are kept as the raw strings found in the markup. Every field is optional;
//! the defaults applied when a field is absent (or unparseable) are documented on the field and
//! applied by [`crate::style`] during rasterization, never here.

use serde::Serialize;

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};

/// Nesting depth beyond which subtrees are dropped.
pub const MAX_DEPTH: usize = 256;

/// Paint attributes shared by every shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PaintAttrs {
    /// Fill color. Absent or `none` means unfilled (text falls back to opaque black).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Outline color. Absent or `none` means no outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Outline width in whole pixels. Default 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<String>,
    /// Fill opacity in `0..=1`. Default 1.0. Does not affect the outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<String>,
}

/// `<rect>`; every length defaults to 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RectAttrs {
    pub x: Option<String>,
    pub y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    #[serde(flatten)]
    pub paint: PaintAttrs,
}

/// `<circle>`; every length defaults to 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CircleAttrs {
    pub cx: Option<String>,
    pub cy: Option<String>,
    pub r: Option<String>,
    #[serde(flatten)]
    pub paint: PaintAttrs,
}

/// `<polygon>`; `points` defaults to the empty list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PolygonAttrs {
    pub points: Option<String>,
    #[serde(flatten)]
    pub paint: PaintAttrs,
}

/// `<text>`; `x`/`y` default to 0, `font-size` to 16, `font-family` to serif.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TextAttrs {
    pub x: Option<String>,
    pub y: Option<String>,
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    #[serde(flatten)]
    pub paint: PaintAttrs,
    /// Literal inline text (the text before the first child element).
    pub content: String,
}

/// `<g>`; a missing transform means no offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupAttrs {
    pub transform: Option<String>,
}

/// The closed set of element kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum NodeKind {
    Rect(RectAttrs),
    Circle(CircleAttrs),
    Polygon(PolygonAttrs),
    Text(TextAttrs),
    Group(GroupAttrs),
    /// Anything else, including nested `<svg>`. Never painted; children are still walked.
    Unknown { name: String },
}

impl NodeKind {
    pub fn tag_name(&self) -> &str {
        match self {
            NodeKind::Rect(_) => "rect",
            NodeKind::Circle(_) => "circle",
            NodeKind::Polygon(_) => "polygon",
            NodeKind::Text(_) => "text",
            NodeKind::Group(_) => "g",
            NodeKind::Unknown { name } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// The root `<svg>` element. Its own attributes (size, viewBox) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn node_count(&self) -> usize {
        self.children.iter().map(Node::subtree_len).sum()
    }

    /// Build from a parsed XML document whose root element is `<svg>`.
    pub(crate) fn from_xml(doc: &roxmltree::Document<'_>, diags: &mut Diagnostics) -> Self {
        Self {
            children: children_from_xml(doc.root_element(), 1, diags),
        }
    }
}

fn children_from_xml(
    parent: roxmltree::Node<'_, '_>,
    depth: usize,
    diags: &mut Diagnostics,
) -> Vec<Node> {
    let elements = parent.children().filter(roxmltree::Node::is_element);
    if depth > MAX_DEPTH {
        let dropped = elements.count();
        if dropped > 0 {
            diags.record(
                DiagnosticKind::DepthLimit,
                format!("dropped {dropped} element(s) nested deeper than {MAX_DEPTH}"),
            );
        }
        return Vec::new();
    }
    elements
        .map(|el| node_from_xml(el, depth, diags))
        .collect()
}

fn node_from_xml(el: roxmltree::Node<'_, '_>, depth: usize, diags: &mut Diagnostics) -> Node {
    let attr = |name: &str| el.attribute(name).map(str::to_owned);
    let paint = || PaintAttrs {
        fill: attr("fill"),
        stroke: attr("stroke"),
        stroke_width: attr("stroke-width"),
        opacity: attr("opacity"),
    };

    let kind = match el.tag_name().name() {
        "rect" => NodeKind::Rect(RectAttrs {
            x: attr("x"),
            y: attr("y"),
            width: attr("width"),
            height: attr("height"),
            paint: paint(),
        }),
        "circle" => NodeKind::Circle(CircleAttrs {
            cx: attr("cx"),
            cy: attr("cy"),
            r: attr("r"),
            paint: paint(),
        }),
        "polygon" => NodeKind::Polygon(PolygonAttrs {
            points: attr("points"),
            paint: paint(),
        }),
        "text" => NodeKind::Text(TextAttrs {
            x: attr("x"),
            y: attr("y"),
            font_size: attr("font-size"),
            font_family: attr("font-family"),
            paint: paint(),
            content: el.text().unwrap_or_default().to_owned(),
        }),
        "g" => NodeKind::Group(GroupAttrs {
            transform: attr("transform"),
        }),
        other => {
            diags.record(
                DiagnosticKind::UnknownElement,
                format!("<{other}> is not painted; walking its children"),
            );
            NodeKind::Unknown {
                name: other.to_owned(),
            }
        }
    };

    Node {
        kind,
        children: children_from_xml(el, depth + 1, diags),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/tree.rs"]
mod tests;
