//! Text labels, shaped and rasterized through usvg/resvg one label at a time.
//!
//! Each label becomes a tiny standalone SVG document covering the whole canvas, and the result
//! is a premultiplied RGBA8 layer the same size as the overlay. The label origin is the top-left
//! of its line box: `dominant-baseline="text-before-edge"` moves the baseline down by the font
//! ascent, so glyphs hang below `y` instead of sitting on it.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::markup::recover::SVG_NAMESPACE;
use crate::render::primitive::TextRun;

/// What [`TextRasterizer::rasterize`] produced for one label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextLayer {
    /// Canvas-sized premultiplied RGBA8 pixels.
    Painted(Vec<u8>),
    /// No font faces could be loaded.
    NoFonts,
    /// Shaping produced nothing to draw.
    Empty,
}

/// Font lookup and text rasterization.
///
/// The font database is built on first use and shared afterwards. With no fonts available,
/// every label comes back as [`TextLayer::NoFonts`].
pub struct TextRasterizer {
    system_fonts: bool,
    font_dirs: Vec<PathBuf>,
    fontdb: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("system_fonts", &self.system_fonts)
            .field("font_dirs", &self.font_dirs)
            .field("loaded", &self.fontdb.get().is_some())
            .finish()
    }
}

impl TextRasterizer {
    pub fn new(system_fonts: bool, font_dirs: Vec<PathBuf>) -> Self {
        Self {
            system_fonts,
            font_dirs,
            fontdb: OnceLock::new(),
        }
    }

    /// A rasterizer that never finds a font.
    pub fn without_fonts() -> Self {
        Self::new(false, Vec::new())
    }

    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_init(|| build_fontdb(self.system_fonts, &self.font_dirs))
    }

    pub fn has_fonts(&self) -> bool {
        self.fontdb().faces().next().is_some()
    }

    /// Rasterize one label into a canvas-sized premultiplied RGBA8 layer.
    #[tracing::instrument(skip_all, fields(chars = run.content.chars().count()))]
    pub fn rasterize(&self, run: &TextRun, canvas: Canvas) -> OverlayResult<TextLayer> {
        if !self.has_fonts() {
            return Ok(TextLayer::NoFonts);
        }

        let markup = text_markup(run, canvas);
        let opts = usvg::Options {
            fontdb: Arc::clone(self.fontdb()),
            font_resolver: font_resolver(),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&markup, &opts).context("parse text layer markup")?;
        if tree.root().children().is_empty() {
            return Ok(TextLayer::Empty);
        }

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| OverlayError::internal("text layer pixmap has zero size"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(TextLayer::Painted(pixmap.take()))
    }
}

fn build_fontdb(system_fonts: bool, font_dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if system_fonts {
        db.load_system_fonts();
    }
    for dir in font_dirs {
        db.load_fonts_dir(dir);
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

/// Resolve the requested family, then any generic family, then any face at all.
fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::Serif);
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: match font.style() {
                    usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                    usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                    usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
                },
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Standalone SVG document drawing a single label with its top-left at `run.origin`.
///
/// The outline, when present, is painted under the glyph fill.
pub fn text_markup(run: &TextRun, canvas: Canvas) -> String {
    let fill = run.glyph_color();
    let mut out = String::with_capacity(256 + run.content.len());
    let _ = write!(
        out,
        r#"<svg xmlns="{SVG_NAMESPACE}" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{x}" y="{y}" font-size="{size}" dominant-baseline="text-before-edge" font-family=""#,
        w = canvas.width,
        h = canvas.height,
        x = run.origin.x,
        y = run.origin.y,
        size = run.font_size,
    );
    escape_xml(&run.font_family, &mut out);
    let _ = write!(out, r#"" {}"#, paint_attr("fill", fill));
    if let Some((stroke, width)) = run.style.outline() {
        let _ = write!(
            out,
            r#" {} stroke-width="{width}" paint-order="stroke""#,
            paint_attr("stroke", stroke)
        );
    }
    out.push_str(r#" xml:space="preserve">"#);
    escape_xml(&run.content, &mut out);
    out.push_str("</text></svg>");
    out
}

fn paint_attr(name: &str, c: Rgba8) -> String {
    format!(
        r#"{name}="rgb({},{},{})" {name}-opacity="{}""#,
        c.r,
        c.g,
        c.b,
        c.alpha_f32()
    )
}

fn escape_xml(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
