use arc_config::schema::ZoomConfig;

/// Zoom factor after stepping `current` by `delta`, clamped to the
/// configured range and rounded to hundredths.
pub fn next_zoom(current: f64, delta: f64, limits: &ZoomConfig) -> f64 {
    let stepped = ((current + delta) * 100.0).round() / 100.0;
    stepped.clamp(limits.min, limits.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ZoomConfig {
        ZoomConfig::default()
    }

    #[test]
    fn steps_by_delta() {
        assert_eq!(next_zoom(1.0, 0.1, &limits()), 1.1);
        assert_eq!(next_zoom(1.1, -0.1, &limits()), 1.0);
    }

    #[test]
    fn clamps_at_upper_bound() {
        assert_eq!(next_zoom(5.0, 0.1, &limits()), 5.0);
        assert_eq!(next_zoom(4.95, 0.1, &limits()), 5.0);
    }

    #[test]
    fn clamps_at_lower_bound() {
        assert_eq!(next_zoom(0.25, -0.1, &limits()), 0.25);
        assert_eq!(next_zoom(0.3, -0.1, &limits()), 0.25);
    }

    #[test]
    fn repeated_steps_do_not_drift() {
        let mut zoom = 1.0;
        for _ in 0..10 {
            zoom = next_zoom(zoom, 0.1, &limits());
        }
        assert_eq!(zoom, 2.0);
    }
}
