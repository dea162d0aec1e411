use super::*;

#[test]
fn defaults_match_the_agent_layout() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.fallback_background, Path::new("data/halo-reach-map.png"));
    assert_eq!(cfg.output_path, Path::new("final_map.png"));
    assert!(cfg.system_fonts);
    assert_eq!(cfg.resize_filter, ResizeFilter::CatmullRom);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg = RenderConfig::from_json(r#"{"output_path":"out/map.png","resize_filter":"nearest"}"#)
        .unwrap();
    assert_eq!(cfg.output_path, Path::new("out/map.png"));
    assert_eq!(cfg.resize_filter, ResizeFilter::Nearest);
    assert_eq!(cfg.fallback_background, Path::new(DEFAULT_FALLBACK_BACKGROUND));
}

#[test]
fn unknown_fields_and_bad_values_are_config_errors() {
    for bad in [
        r#"{"outputPath":"x.png"}"#,
        r#"{"resize_filter":"bicubic"}"#,
        r#"{"output_path":""}"#,
        r#"{"output_path":"/"}"#,
        r#"{"font_dirs":[""]}"#,
        "not json",
    ] {
        let err = RenderConfig::from_json(bad).unwrap_err();
        assert!(matches!(err, OverlayError::Config(_)), "{bad}: {err}");
    }
}

#[test]
fn missing_file_names_the_path() {
    let err = RenderConfig::from_path(Path::new("nope/render.json")).unwrap_err();
    assert!(err.to_string().contains("nope/render.json"));
}
