use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OverlayError::composite("x")
            .to_string()
            .contains("composite error:")
    );
    assert!(OverlayError::config("x").to_string().contains("config error:"));
    assert!(
        OverlayError::internal("x")
            .to_string()
            .contains("internal error:")
    );
}

#[test]
fn background_missing_names_both_paths() {
    let err = OverlayError::background_missing("maps/beach.png", "data/reach.png", "gone");
    let msg = err.to_string();
    assert!(msg.starts_with("background missing:"));
    assert!(msg.contains("maps/beach.png"));
    assert!(msg.contains("data/reach.png"));
    assert!(msg.contains("gone"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OverlayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
