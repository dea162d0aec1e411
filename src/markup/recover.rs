//! Recovery parsing: turn free-form model output into a valid [`Document`], no matter what.
//!
//! The candidate markup goes through reasoning-block removal, preamble trimming, block
//! extraction, namespace repair and a strict XML parse. Any failure along the way swaps in
//! [`FALLBACK_MARKUP`] and records why in [`Diagnostics`].

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::markup::tree::Document;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Canonical substitute markup: one filled triangle.
pub const FALLBACK_MARKUP: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600">"##,
    r##"<polygon points="400,150 550,450 250,450" fill="#d62828" stroke="black" stroke-width="2"/>"##,
    r##"</svg>"##
);

#[derive(thiserror::Error, Debug)]
pub enum MarkupError {
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),
}

/// Where the recovered tree came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "reason", rename_all = "snake_case")]
pub enum MarkupSource {
    /// The model's own markup parsed cleanly.
    Extracted,
    /// No block was found in the input.
    FallbackNoMarkup,
    /// A block was found but failed the structural parse.
    FallbackMalformed(String),
}

impl MarkupSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, MarkupSource::Extracted)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Recovered {
    #[serde(flatten)]
    pub source: MarkupSource,
    pub document: Document,
}

fn reasoning_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<think>.*?</think>").expect("reasoning regex must compile"))
}

fn svg_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<svg.*?</svg>").expect("svg block regex must compile"))
}

fn xmlns_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\sxmlns\s*=").expect("xmlns regex must compile"))
}

/// Remove every `<think>...</think>` block (case-insensitive, non-greedy).
pub fn strip_reasoning(text: &str) -> Cow<'_, str> {
    reasoning_re().replace_all(text, "")
}

/// Find the first `<svg ...>...</svg>` block, ignoring anything before or after it.
pub fn extract_markup_block(text: &str) -> Option<&str> {
    let text = match text.find("<svg") {
        Some(i) => &text[i..],
        None => text,
    };
    svg_block_re().find(text).map(|m| m.as_str())
}

/// Make sure the opening tag declares a default namespace, injecting the SVG one once.
pub fn ensure_namespace(block: &str) -> Cow<'_, str> {
    let open_end = block.find('>').unwrap_or(block.len());
    if xmlns_attr_re().is_match(&block[..open_end]) {
        return Cow::Borrowed(block);
    }

    let name_end = block
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c.is_whitespace() || c == '>' || c == '/')
        .map_or(block.len(), |(i, _)| i);
    let mut out = String::with_capacity(block.len() + SVG_NAMESPACE.len() + 10);
    out.push_str(&block[..name_end]);
    out.push_str(" xmlns=\"");
    out.push_str(SVG_NAMESPACE);
    out.push('"');
    out.push_str(&block[name_end..]);
    Cow::Owned(out)
}

/// Strict structural parse of a single markup block.
pub fn parse_document(markup: &str, diags: &mut Diagnostics) -> Result<Document, MarkupError> {
    let xml = roxmltree::Document::parse(markup)?;
    let root = xml.root_element().tag_name().name();
    if root != "svg" {
        return Err(MarkupError::UnexpectedRoot(root.to_owned()));
    }
    Ok(Document::from_xml(&xml, diags))
}

/// Parse [`FALLBACK_MARKUP`]. Failure here is a defect in the constant, not bad input.
pub fn fallback_document(diags: &mut Diagnostics) -> OverlayResult<Document> {
    parse_document(FALLBACK_MARKUP, diags)
        .map_err(|e| OverlayError::internal(format!("fallback markup failed to parse: {e} (bug)")))
}

/// Run the whole recovery sequence over raw model output.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn recover_document(text: &str, diags: &mut Diagnostics) -> OverlayResult<Recovered> {
    let stripped = strip_reasoning(text);
    if let Cow::Owned(_) = &stripped {
        diags.record(
            DiagnosticKind::ReasoningStripped,
            format!("removed {} bytes of reasoning", text.len() - stripped.len()),
        );
    }

    if let Some(i) = stripped.find("<svg")
        && !stripped[..i].trim().is_empty()
    {
        diags.record(
            DiagnosticKind::PreambleDropped,
            format!("dropped {i} bytes before the first <svg"),
        );
    }

    let Some(block) = extract_markup_block(&stripped) else {
        diags.record(
            DiagnosticKind::NoMarkupFound,
            "no <svg>...</svg> block in input; using fallback markup",
        );
        return Ok(Recovered {
            source: MarkupSource::FallbackNoMarkup,
            document: fallback_document(diags)?,
        });
    };

    let block = ensure_namespace(block);
    if let Cow::Owned(_) = &block {
        diags.record(
            DiagnosticKind::NamespaceInjected,
            format!("declared xmlns=\"{SVG_NAMESPACE}\" on the root tag"),
        );
    }

    // Element diagnostics from a rejected candidate would describe a tree that is never drawn.
    let mut candidate_diags = Diagnostics::new();
    match parse_document(&block, &mut candidate_diags) {
        Ok(document) => {
            diags.extend(candidate_diags);
            tracing::debug!(nodes = document.node_count(), "markup parsed");
            Ok(Recovered {
                source: MarkupSource::Extracted,
                document,
            })
        }
        Err(e) => {
            let reason = e.to_string();
            diags.record(
                DiagnosticKind::MalformedMarkup,
                format!("structural parse failed: {reason}; using fallback markup"),
            );
            Ok(Recovered {
                source: MarkupSource::FallbackMalformed(reason),
                document: fallback_document(diags)?,
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/recover.rs"]
mod tests;
