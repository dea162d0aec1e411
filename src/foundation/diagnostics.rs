use serde::Serialize;

/// What kind of absorbed failure (or notable repair) a diagnostic records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `<think>` block was removed from the input.
    ReasoningStripped,
    /// Commentary before the first `<svg` was dropped.
    PreambleDropped,
    /// No `<svg>...</svg>` block was found; the fallback markup was used.
    NoMarkupFound,
    /// The SVG namespace was injected into the opening tag.
    NamespaceInjected,
    /// The extracted block failed the structural parse; the fallback markup was used.
    MalformedMarkup,
    /// A subtree nested deeper than the traversal limit was dropped.
    DepthLimit,
    /// A group transform other than `translate(..)` was ignored.
    IgnoredTransform,
    /// A present attribute value could not be parsed and its default was used.
    AttributeDefaulted,
    /// A polygon point token without a comma was skipped.
    PointSkipped,
    /// An element was not painted: unusable or oversized geometry, or no font for a label.
    ElementSkipped,
    /// An element outside the supported vocabulary was passed through.
    UnknownElement,
    /// The requested background could not be loaded; the fallback background was used.
    BackgroundFallback,
}

impl DiagnosticKind {
    /// Whether the entry means output quality degraded (logged at `warn`).
    pub fn is_degradation(self) -> bool {
        matches!(
            self,
            Self::NoMarkupFound
                | Self::MalformedMarkup
                | Self::DepthLimit
                | Self::ElementSkipped
                | Self::BackgroundFallback
        )
    }
}

/// One absorbed failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Side channel for absorbed failures, kept apart from [`crate::OverlayError`].
///
/// Recording never interrupts rendering. Every entry is also emitted as a `tracing` event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        if kind.is_degradation() {
            tracing::warn!(?kind, "{message}");
        } else {
            tracing::debug!(?kind, "{message}");
        }
        self.entries.push(Diagnostic { kind, message });
    }

    /// Append entries recorded elsewhere (already logged when first recorded).
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
