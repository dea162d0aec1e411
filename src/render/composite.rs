use std::path::{Path, PathBuf};

use anyhow::Context;
use image::imageops::FilterType;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::assets::{PreparedImage, load_image};
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::raster::Overlay;

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> OverlayResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(OverlayError::composite(format!(
            "over_in_place expects equal-length rgba8 buffers (dst {}, src {})",
            dst.len(),
            src.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// The background that will actually be drawn under the overlay.
#[derive(Clone, Debug)]
pub struct Background {
    pub image: PreparedImage,
    pub path: PathBuf,
    pub fell_back: bool,
}

/// Load `requested`, or `fallback` when that fails.
///
/// Both failing is the one fatal input condition of a render.
pub fn load_background(
    requested: &Path,
    fallback: &Path,
    diags: &mut Diagnostics,
) -> OverlayResult<Background> {
    let first = match load_image(requested) {
        Ok(image) => {
            return Ok(Background {
                image,
                path: requested.to_path_buf(),
                fell_back: false,
            });
        }
        Err(e) => e,
    };

    match load_image(fallback) {
        Ok(image) => {
            diags.record(
                DiagnosticKind::BackgroundFallback,
                format!(
                    "background '{}' unusable ({first}); using '{}'",
                    requested.display(),
                    fallback.display()
                ),
            );
            Ok(Background {
                image,
                path: fallback.to_path_buf(),
                fell_back: true,
            })
        }
        Err(second) => Err(OverlayError::background_missing(
            requested,
            fallback,
            format!("{first}; {second}"),
        )),
    }
}

/// Stretch the overlay to `width` x `height`. Sizes that already match are copied as is.
pub fn resize_overlay(
    overlay: &Overlay,
    width: u32,
    height: u32,
    filter: FilterType,
) -> OverlayResult<Vec<u8>> {
    let canvas = overlay.canvas();
    if canvas.width == width && canvas.height == height {
        return Ok(overlay.data().to_vec());
    }
    let src = image::RgbaImage::from_raw(canvas.width, canvas.height, overlay.data().to_vec())
        .ok_or_else(|| OverlayError::composite("overlay buffer does not match its canvas"))?;
    let mut out = image::imageops::resize(&src, width, height, filter).into_raw();

    // Overshooting filters can leave a color channel above its alpha.
    for px in out.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
    Ok(out)
}

/// Resize `overlay` to the background and blend it on top.
#[tracing::instrument(skip_all, fields(width = background.width, height = background.height))]
pub fn composite(
    background: &PreparedImage,
    overlay: &Overlay,
    filter: FilterType,
) -> OverlayResult<PreparedImage> {
    if background.width == 0 || background.height == 0 {
        return Err(OverlayError::composite("background has zero size"));
    }
    let layer = resize_overlay(overlay, background.width, background.height, filter)?;
    let mut out = background.rgba8_premul.clone();
    over_in_place(&mut out, &layer, 1.0)?;
    Ok(PreparedImage {
        width: background.width,
        height: background.height,
        rgba8_premul: out,
    })
}

/// Encode `image` to `path` and return its absolute path.
///
/// The file is written next to the destination first and renamed over it, so a failed
/// encode never leaves a truncated file at `path`. The format follows the extension and
/// defaults to PNG.
#[tracing::instrument(skip(image), fields(path = %path.display()))]
pub fn write_output(image: &PreparedImage, path: &Path) -> OverlayResult<PathBuf> {
    let format = image::ImageFormat::from_path(path).unwrap_or(image::ImageFormat::Png);

    let mut rgba = image.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut rgba);
    let buf = image::RgbaImage::from_raw(image.width, image.height, rgba)
        .ok_or_else(|| OverlayError::composite("image buffer does not match its size"))?;
    let dyn_img = match format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(buf).into_rgb8(),
        ),
        _ => image::DynamicImage::ImageRgba8(buf),
    };

    let partial = partial_path(path)?;
    if let Err(e) = dyn_img.save_with_format(&partial, format) {
        let _ = std::fs::remove_file(&partial);
        return Err(OverlayError::composite(format!(
            "encode {format:?} to '{}': {e}",
            partial.display()
        )));
    }
    if let Err(e) = std::fs::rename(&partial, path) {
        let _ = std::fs::remove_file(&partial);
        return Err(anyhow::Error::new(e)
            .context(format!("move output into place at '{}'", path.display()))
            .into());
    }

    let abs = std::fs::canonicalize(path)
        .with_context(|| format!("resolve output path '{}'", path.display()))?;
    tracing::debug!(out = %abs.display(), "output written");
    Ok(abs)
}

fn partial_path(path: &Path) -> OverlayResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| OverlayError::config(format!("output path '{}' has no file name", path.display())))?;
    let mut tmp = std::ffi::OsString::from(".");
    tmp.push(name);
    tmp.push(".partial");
    Ok(path.with_file_name(tmp))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
