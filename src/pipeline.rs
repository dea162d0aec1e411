use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::RenderConfig;
use crate::foundation::diagnostics::Diagnostics;
use crate::foundation::error::OverlayResult;
use crate::markup::recover::{MarkupSource, recover_document};
use crate::render::{Overlay, TextRasterizer, composite, load_background, rasterize, write_output};

/// Pipeline stage reached, as logged at `debug`.
#[derive(Clone, Copy, Debug)]
enum RenderStage {
    Received,
    Parsed,
    Rasterized,
    Composited,
    Written,
}

/// Outcome of a successful render.
#[derive(Clone, Debug, Serialize)]
pub struct RenderReport {
    /// Absolute path of the written image.
    pub output: PathBuf,
    /// The background actually drawn under the overlay.
    pub background: PathBuf,
    pub background_fallback: bool,
    /// How the drawn tree was obtained. Fallback variants mean the input was not drawn.
    pub markup: MarkupSource,
    pub width: u32,
    pub height: u32,
    pub diagnostics: Diagnostics,
}

impl RenderReport {
    pub fn used_fallback_markup(&self) -> bool {
        self.markup.is_fallback()
    }
}

/// Turns model output into a finished map image.
///
/// A renderer holds only configuration and the lazily built font database, so one instance
/// can serve many renders. Renders that share an output path overwrite each other; use
/// [`OverlayRenderer::render_to`] with distinct paths when that matters.
#[derive(Debug)]
pub struct OverlayRenderer {
    config: RenderConfig,
    text: TextRasterizer,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl OverlayRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let text = TextRasterizer::new(config.system_fonts, config.font_dirs.clone());
        Self { config, text }
    }

    /// Use a specific text rasterizer instead of the one derived from the config.
    pub fn with_text(mut self, text: TextRasterizer) -> Self {
        self.text = text;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render to the configured output path.
    pub fn render(&self, markup: &str, background: &Path) -> OverlayResult<RenderReport> {
        self.render_to(markup, background, &self.config.output_path)
    }

    /// Render to `out`.
    ///
    /// Markup problems are absorbed into the report's diagnostics. Only an unusable
    /// background (requested and fallback both) or a failure to write `out` is an error; in
    /// that case no new file appears at `out`.
    #[tracing::instrument(skip(self, markup), fields(markup_len = markup.len()))]
    pub fn render_to(
        &self,
        markup: &str,
        background: &Path,
        out: &Path,
    ) -> OverlayResult<RenderReport> {
        let mut diags = Diagnostics::new();
        tracing::debug!(stage = ?RenderStage::Received);

        let (source, overlay) = self.rasterize_markup(markup, &mut diags)?;
        tracing::debug!(stage = ?RenderStage::Rasterized);

        let bg = load_background(background, &self.config.fallback_background, &mut diags)?;

        let image = composite(&bg.image, &overlay, self.config.resize_filter.to_filter_type())?;
        tracing::debug!(stage = ?RenderStage::Composited);

        let output = write_output(&image, out)?;
        tracing::debug!(stage = ?RenderStage::Written);
        tracing::info!(
            out = %output.display(),
            diagnostics = diags.len(),
            degraded = diags.iter().filter(|d| d.kind.is_degradation()).count(),
            "map rendered"
        );

        Ok(RenderReport {
            output,
            background: bg.path,
            background_fallback: bg.fell_back,
            markup: source,
            width: image.width,
            height: image.height,
            diagnostics: diags,
        })
    }

    /// Recover and paint the markup without touching the filesystem.
    pub fn rasterize_markup(
        &self,
        markup: &str,
        diags: &mut Diagnostics,
    ) -> OverlayResult<(MarkupSource, Overlay)> {
        let recovered = recover_document(markup, diags)?;
        tracing::debug!(stage = ?RenderStage::Parsed, source = ?recovered.source);
        let overlay = rasterize(&recovered.document, &self.text, diags)?;
        Ok((recovered.source, overlay))
    }
}

/// Render `markup` over `background` with the default configuration.
///
/// Returns the absolute path of the written image, or a readable error message.
pub fn render_map(markup: &str, background: impl AsRef<Path>) -> Result<PathBuf, String> {
    OverlayRenderer::default()
        .render(markup, background.as_ref())
        .map(|report| report.output)
        .map_err(|e| format!("Error rendering map: {e}"))
}
