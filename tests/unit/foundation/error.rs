use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlideError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlideError::format("x")
            .to_string()
            .contains("bitmap format error:")
    );
    assert!(SlideError::io("x").to_string().contains("io error:"));
    assert!(SlideError::engine("x").to_string().contains("engine error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlideError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn load_failures_are_io_and_format_only() {
    assert!(SlideError::io("missing").is_load_failure());
    assert!(SlideError::format("bad header").is_load_failure());
    assert!(!SlideError::validation("x").is_load_failure());
    assert!(!SlideError::engine("x").is_load_failure());
}
