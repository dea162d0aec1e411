use super::*;
use crate::foundation::core::Canvas;

fn solid(width: u32, height: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: px.repeat((width * height) as usize),
    }
}

fn save_png(path: &Path, width: u32, height: u32, px: [u8; 4]) {
    image::RgbaImage::from_pixel(width, height, image::Rgba(px))
        .save(path)
        .unwrap();
}

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn over_half_red_on_white() {
    let out = over([255, 255, 255, 255], [128, 0, 0, 128], 1.0);
    assert_eq!(out, [255, 127, 127, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let err = over_in_place(&mut dst, &[0u8; 4], 1.0).unwrap_err();
    assert!(matches!(err, OverlayError::Composite(_)));
}

#[test]
fn resize_keeps_matching_sizes_untouched() {
    let overlay = Overlay::transparent(Canvas::OVERLAY);
    let out = resize_overlay(&overlay, 800, 600, FilterType::CatmullRom).unwrap();
    assert_eq!(out, overlay.data());
}

#[test]
fn resize_stretches_and_stays_premultiplied() {
    let overlay = Overlay::transparent(Canvas::OVERLAY);
    let out = resize_overlay(&overlay, 1024, 300, FilterType::Lanczos3).unwrap();
    assert_eq!(out.len(), 1024 * 300 * 4);
    assert!(
        out.chunks_exact(4)
            .all(|px| px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3])
    );
}

#[test]
fn composite_of_blank_overlay_is_the_background() {
    let bg = solid(40, 30, [10, 20, 30, 255]);
    let out = composite(&bg, &Overlay::transparent(Canvas::OVERLAY), FilterType::Nearest).unwrap();
    assert_eq!(out, bg);
    assert_eq!(out.pixel(39, 29), Some([10, 20, 30, 255]));
    assert_eq!(out.pixel(40, 0), None);
}

#[test]
fn zero_sized_background_is_a_composite_error() {
    let bg = solid(0, 0, [0, 0, 0, 0]);
    let err = composite(&bg, &Overlay::transparent(Canvas::OVERLAY), FilterType::Nearest)
        .unwrap_err();
    assert!(matches!(err, OverlayError::Composite(_)));
}

#[test]
fn background_falls_back_and_reports_it() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("reach.png");
    save_png(&fallback, 4, 3, [0, 0, 255, 255]);

    let mut diags = Diagnostics::new();
    let bg = load_background(&dir.path().join("missing.png"), &fallback, &mut diags).unwrap();
    assert!(bg.fell_back);
    assert_eq!(bg.path, fallback);
    assert_eq!((bg.image.width, bg.image.height), (4, 3));
    assert!(diags.contains(DiagnosticKind::BackgroundFallback));
}

#[test]
fn requested_background_wins_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let requested = dir.path().join("beach.png");
    save_png(&requested, 2, 2, [255, 255, 255, 255]);

    let mut diags = Diagnostics::new();
    let bg = load_background(&requested, &dir.path().join("nope.png"), &mut diags).unwrap();
    assert!(!bg.fell_back);
    assert!(diags.is_empty());
}

#[test]
fn both_backgrounds_missing_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut diags = Diagnostics::new();
    let err = load_background(
        &dir.path().join("a.png"),
        &dir.path().join("b.png"),
        &mut diags,
    )
    .unwrap_err();
    assert!(matches!(err, OverlayError::BackgroundMissing { .. }));
    assert!(!diags.contains(DiagnosticKind::BackgroundFallback));
}

#[test]
fn write_output_replaces_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("final_map.png");
    std::fs::write(&out, b"stale").unwrap();

    let img = solid(3, 2, [64, 0, 0, 128]);
    let abs = write_output(&img, &out).unwrap();
    assert!(abs.is_absolute());
    assert!(!dir.path().join(".final_map.png.partial").exists());

    let back = image::open(&out).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(back.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn write_output_without_file_name_is_rejected() {
    let img = solid(1, 1, [0, 0, 0, 255]);
    let err = write_output(&img, Path::new("/")).unwrap_err();
    assert!(matches!(err, OverlayError::Config(_)));
}
