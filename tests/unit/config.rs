use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults_match_demo_placeholders() {
    let cfg = SynthConfig::default();
    assert_eq!(cfg.rich_size, Size2::new(400, 400));
    assert_eq!(cfg.fallback_size, Size2::new(100, 100));
    assert_eq!(cfg.tone.sample_rate, 22_050);
    assert_eq!(cfg.tone.frequency_hz, 440.0);
    assert_eq!(cfg.tone.amplitude, 10_000);
    assert_eq!(cfg.images_dir, "images");
    assert_eq!(cfg.voice_dir, "voice");
    assert_eq!(cfg.seed, None);
    assert!(!cfg.run.parallel);
    cfg.validate().unwrap();
}

#[test]
fn json_overrides_are_partial() {
    let cfg = SynthConfig::from_json_str(
        r#"{ "fallback_size": { "width": 8, "height": 6 }, "tone": { "frequency_hz": 220.0 }, "seed": 9 }"#,
    )
    .unwrap();
    assert_eq!(cfg.fallback_size, Size2::new(8, 6));
    assert_eq!(cfg.tone.frequency_hz, 220.0);
    assert_eq!(cfg.tone.sample_rate, 22_050);
    assert_eq!(cfg.seed, Some(9));
    assert_eq!(cfg.rich_size, Size2::new(400, 400));
}

#[test]
fn json_rejects_unknown_fields_and_bad_values() {
    assert!(matches!(
        SynthConfig::from_json_str(r#"{ "colour": 1 }"#).unwrap_err(),
        MediaError::Serde(_)
    ));
    assert!(matches!(
        SynthConfig::from_json_str(r#"{ "fallback_size": { "width": 0, "height": 1 } }"#)
            .unwrap_err(),
        MediaError::InvalidDimensions { .. }
    ));
    assert!(SynthConfig::from_json_str(r#"{ "images_dir": "../up" }"#).is_err());
    assert!(SynthConfig::from_json_str(r#"{ "voice_dir": "images" }"#).is_err());
}

#[test]
fn env_overrides_apply() {
    let cfg = SynthConfig::default()
        .with_env_overrides(env(&[
            ("MEDIASEED_SEED", "42"),
            ("MEDIASEED_THREADS", "3"),
            ("MEDIASEED_PARALLEL", "true"),
            ("MEDIASEED_NO_RICH", "1"),
        ]))
        .unwrap();
    assert_eq!(cfg.seed, Some(42));
    assert_eq!(cfg.run.threads, Some(3));
    assert!(cfg.run.parallel);
    assert_eq!(cfg.renderer, RendererChoice::Disabled);
}

#[test]
fn env_overrides_reject_garbage() {
    assert!(
        SynthConfig::default()
            .with_env_overrides(env(&[("MEDIASEED_SEED", "-1")]))
            .is_err()
    );
    assert!(
        SynthConfig::default()
            .with_env_overrides(env(&[("MEDIASEED_THREADS", "0")]))
            .is_err()
    );
    assert!(
        SynthConfig::default()
            .with_env_overrides(env(&[("MEDIASEED_PARALLEL", "maybe")]))
            .is_err()
    );
    let cfg = SynthConfig::default()
        .with_env_overrides(env(&[("MEDIASEED_NO_RICH", "0")]))
        .unwrap();
    assert_eq!(cfg.renderer, RendererChoice::Auto);
}
