use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&ArcConfig::default()).is_ok());
}

#[test]
fn zero_timeout_is_rejected() {
    let mut config = ArcConfig::default();
    config.bridge.request_timeout_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.request_timeout_ms"));
}

#[test]
fn inverted_zoom_bounds_are_rejected() {
    let mut config = ArcConfig::default();
    config.zoom.min = 3.0;
    config.zoom.max = 2.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("must be below zoom.max"));
}

#[test]
fn non_positive_zoom_step_is_rejected() {
    let mut config = ArcConfig::default();
    config.zoom.step = 0.0;
    assert!(validate(&config).is_err());
}

#[test]
fn unknown_platform_override_is_rejected() {
    let mut config = ArcConfig::default();
    config.platform.override_platform = Some("beos".into());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("beos"));
}

#[test]
fn all_errors_are_collected() {
    let mut config = ArcConfig::default();
    config.bridge.request_timeout_ms = 0;
    config.bridge.ready_timeout_ms = 0;
    config.logging.level = "loud".into();
    let err = validate(&config).unwrap_err().to_string();
    assert_eq!(err.matches(';').count(), 2);
}
