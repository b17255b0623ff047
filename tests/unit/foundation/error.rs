use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MediaError::invalid_dimensions(0, 4, "width must be > 0")
            .to_string()
            .contains("invalid dimensions: 0x4")
    );
    assert!(
        MediaError::invalid_color("x")
            .to_string()
            .contains("invalid color:")
    );
    assert!(
        MediaError::invalid_duration("x")
            .to_string()
            .contains("invalid duration:")
    );
    assert!(
        MediaError::DuplicateRequestId("a1".to_string())
            .to_string()
            .contains("duplicate request id 'a1'")
    );
    assert!(
        MediaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MediaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn io_failure_names_path_and_keeps_source() {
    let err = MediaError::io(
        "out/images/a1.bmp",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    let msg = err.to_string();
    assert!(msg.contains("out/images/a1.bmp"));
    assert!(msg.contains("denied"));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(err.kind_name(), "IoFailure");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MediaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
