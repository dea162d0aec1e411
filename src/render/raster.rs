use vello_cpu::kurbo::{BezPath, Shape as _, Stroke};

use crate::foundation::core::{Canvas, Rgba8, Vec2};
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::markup::tree::{Document, GroupAttrs, Node, NodeKind};
use crate::render::composite::over_in_place;
use crate::render::primitive::{Primitive, resolve_primitive};
use crate::render::text::{TextLayer, TextRasterizer};
use crate::style::ResolvedStyle;
use crate::transform::{TransformStack, parse_translate};

/// Flattening tolerance for curved outlines, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// The painted overlay: premultiplied RGBA8, row-major, transparent where nothing was drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Overlay {
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0; canvas.rgba8_len()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Paint `doc` onto a fresh transparent overlay in document order.
#[tracing::instrument(skip_all, fields(nodes = doc.node_count()))]
pub fn rasterize(
    doc: &Document,
    text: &TextRasterizer,
    diags: &mut Diagnostics,
) -> OverlayResult<Overlay> {
    let mut painter = Painter::new(Canvas::OVERLAY, text)?;
    let mut stack = TransformStack::new();
    painter.walk(&doc.children, &mut stack, diags)?;
    painter.finish()
}

/// Shapes are batched in a vello render context and flushed into the overlay whenever a text
/// layer has to be stacked on top, so paint order holds across both backends.
struct Painter<'t> {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    queued: usize,
    painted: usize,
    overlay: Overlay,
    text: &'t TextRasterizer,
}

impl<'t> Painter<'t> {
    fn new(canvas: Canvas, text: &'t TextRasterizer) -> OverlayResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| OverlayError::internal("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| OverlayError::internal("canvas height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            queued: 0,
            painted: 0,
            overlay: Overlay::transparent(canvas),
            text,
        })
    }

    fn walk(
        &mut self,
        nodes: &[Node],
        stack: &mut TransformStack,
        diags: &mut Diagnostics,
    ) -> OverlayResult<()> {
        for node in nodes {
            if let NodeKind::Group(g) = &node.kind {
                stack.push(group_offset(g, diags));
                let walked = self.walk(&node.children, stack, diags);
                stack.pop();
                walked?;
                continue;
            }

            if let Some(prim) = resolve_primitive(&node.kind, stack, diags) {
                self.paint(&prim, diags)?;
            }
            self.walk(&node.children, stack, diags)?;
        }
        Ok(())
    }

    fn paint(&mut self, prim: &Primitive, diags: &mut Diagnostics) -> OverlayResult<()> {
        match prim {
            Primitive::Rect { rect, style } => {
                let path = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
                    .to_path(PATH_TOLERANCE);
                self.fill_and_stroke(&path, style);
            }
            Primitive::Circle {
                center,
                radius,
                style,
            } => {
                if *radius <= 0.0 {
                    return Ok(());
                }
                let path = vello_cpu::kurbo::Circle::new((center.x, center.y), *radius)
                    .to_path(PATH_TOLERANCE);
                self.fill_and_stroke(&path, style);
            }
            Primitive::Polygon { points, style } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                let mut path = BezPath::new();
                path.move_to((first.x, first.y));
                for p in rest {
                    path.line_to((p.x, p.y));
                }
                path.close_path();
                self.fill_and_stroke(&path, style);
            }
            Primitive::Text(run) => {
                self.flush()?;
                let why = match self.text.rasterize(run, self.overlay.canvas) {
                    Ok(TextLayer::Painted(layer)) => {
                        over_in_place(&mut self.overlay.data, &layer, 1.0)?;
                        None
                    }
                    Ok(TextLayer::NoFonts) => Some("no fonts available".to_owned()),
                    Ok(TextLayer::Empty) => Some("no glyphs produced".to_owned()),
                    Err(e) => Some(e.to_string()),
                };
                if let Some(why) = why {
                    diags.record(
                        DiagnosticKind::ElementSkipped,
                        format!("text '{}': {why}", run.content),
                    );
                    return Ok(());
                }
            }
        }
        self.painted += 1;
        Ok(())
    }

    fn fill_and_stroke(&mut self, path: &BezPath, style: &ResolvedStyle) {
        if let Some(fill) = style.fill.filter(|c| c.a > 0) {
            self.ctx.set_paint(cpu_color(fill));
            self.ctx.fill_path(path);
            self.queued += 1;
        }
        if let Some((color, width)) = style.outline() {
            self.ctx.set_stroke(Stroke::new(f64::from(width)));
            self.ctx.set_paint(cpu_color(color));
            self.ctx.stroke_path(path);
            self.queued += 1;
        }
    }

    /// Move queued shapes into the overlay.
    fn flush(&mut self) -> OverlayResult<()> {
        if self.queued == 0 {
            return Ok(());
        }
        self.ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut layer);
        over_in_place(&mut self.overlay.data, layer.data_as_u8_slice(), 1.0)?;
        self.ctx.reset();
        self.queued = 0;
        Ok(())
    }

    fn finish(mut self) -> OverlayResult<Overlay> {
        self.flush()?;
        tracing::debug!(painted = self.painted, "overlay rasterized");
        Ok(self.overlay)
    }
}

fn group_offset(g: &GroupAttrs, diags: &mut Diagnostics) -> Vec2 {
    let Some(raw) = g.transform.as_deref() else {
        return Vec2::ZERO;
    };
    parse_translate(raw).unwrap_or_else(|| {
        diags.record(
            DiagnosticKind::IgnoredTransform,
            format!("g: transform='{raw}' is not a translation, ignored"),
        );
        Vec2::ZERO
    })
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
