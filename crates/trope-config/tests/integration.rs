//! Integration tests for trope-config.
//!
//! Files on disk, factory presets, and the full render pipeline.

use tempfile::TempDir;
use trope_config::{
    ConfigError, EnvelopeConfig, Performance, Performer, PerformerConfig, factory_presets,
    get_factory_preset,
};

/// Save into a directory that does not exist yet, then load it back.
#[test]
fn save_creates_parents_and_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("performers").join("descant.toml");

    let config = PerformerConfig::new("Descant", vec![vec![523.25, 0.0, 659.25]])
        .with_description("High line")
        .with_durations(vec![0.25, 0.25, 0.5])
        .with_timbre([(1.0, 1.0), (3.0, 0.2)])
        .with_envelope(EnvelopeConfig::parametric(4, 8, 30, 25));
    config.save(&path).unwrap();

    assert!(path.exists());
    let loaded = PerformerConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = PerformerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "name = \"x\"\nrefrain = [[440.0]]\nvolume = 11\n").unwrap();
    assert!(matches!(
        PerformerConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

/// Every factory preset renders to a normalized, non-silent buffer.
#[test]
fn factory_presets_render() {
    for preset in factory_presets() {
        let name = preset.name.clone();
        let audio = Performer::new(preset).unwrap().render().unwrap();
        let peak = audio.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(!audio.is_empty(), "{name}");
        assert!((peak - 1.0).abs() < 1e-6, "{name} peak {peak}");
    }
}

#[test]
fn canon_preset_loops_before_delay() {
    let canon = get_factory_preset("canon").unwrap();
    let single = PerformerConfig {
        loop_count: 1,
        delay: None,
        ..canon.clone()
    };

    let once = Performer::new(single).unwrap().render().unwrap();
    let full = Performer::new(canon).unwrap().render().unwrap();
    assert_eq!(full.len(), 2 * once.len());
}

#[test]
fn performance_mixes_two_performers() {
    let melody = PerformerConfig::new("melody", vec![vec![440.0, 494.0, 523.25]])
        .with_durations(vec![0.2]);
    let bass = PerformerConfig::new("bass", vec![vec![110.0]]).with_durations(vec![1.0]);

    let performance = Performance::from_configs([melody, bass]).unwrap();
    assert_eq!(performance.len(), 2);
    assert_eq!(performance.sample_rate(), Some(44100));

    let mix = performance.render().unwrap();
    let melody_len = performance.performers()[0].render().unwrap().len();
    assert_eq!(mix.len(), melody_len);
    assert!(mix.iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn recorded_timbre_and_envelope_drive_a_render() {
    let sr = 44100;
    let recording: Vec<f32> = (0..8192)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let swell = (t * 40.0).min(1.0) * (-4.0 * t).exp();
            swell
                * ((2.0 * std::f32::consts::PI * 330.0 * t).sin()
                    + 0.5 * (2.0 * std::f32::consts::PI * 990.0 * t).sin())
        })
        .collect();

    let config = PerformerConfig::new("sampled", vec![vec![220.0, 330.0]])
        .with_durations(vec![0.3])
        .with_timbre_from_recording(&recording, sr, 2)
        .unwrap()
        .with_envelope(EnvelopeConfig::from_recording(&recording, sr));

    assert_eq!(config.timbre.len(), 2);
    assert!((config.timbre[1].ratio - 3.0).abs() < 0.02);
    assert_eq!(config.validate(), Ok(()));

    let audio = Performer::new(config).unwrap().render().unwrap();
    assert!(audio.iter().any(|&s| s != 0.0));
}
