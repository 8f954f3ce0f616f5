//! Factory performers and timbres bundled with the library.
//!
//! Presets are embedded TOML, parsed on demand, so they go through exactly the
//! same loader and validation as user files.

use trope_synth::Timbre;

use crate::PerformerConfig;

/// Factory preset names, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "scale", "chorale", "canon", "bells"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("scale", SCALE_PRESET),
    ("chorale", CHORALE_PRESET),
    ("canon", CANON_PRESET),
    ("bells", BELLS_PRESET),
];

/// A single A4 for one second.
const INIT_PRESET: &str = r#"
name = "Init"
description = "A single A4, base envelope"
refrain = [[440.0]]
durations = [1.0]
"#;

/// Ascending C major scale.
const SCALE_PRESET: &str = r#"
name = "Scale"
description = "C major, one octave up"
refrain = [[261.63, 293.66, 329.63, 349.23, 392.0, 440.0, 493.88, 523.25]]
durations = [0.25, 0.25, 0.25, 0.25, 0.25, 0.25, 0.25, 0.75]
timbre_preset = "clarinet"

[envelope]
kind = "parametric"
attack = 8
decay = 12
sustain = 35
release = 15
"#;

/// Four-voice cadence with organ stops.
const CHORALE_PRESET: &str = r#"
name = "Chorale"
description = "I-IV-V-I in four voices"
refrain = [
    [523.25, 523.25, 493.88, 523.25],
    [329.63, 349.23, 392.0, 329.63],
    [261.63, 261.63, 293.66, 261.63],
    [130.81, 174.61, 196.0, 130.81],
]
durations = [1.0, 1.0, 1.0, 2.0]
timbre_preset = "organ"

[envelope]
kind = "parametric"
attack = 20
decay = 5
sustain = 90
release = 10
"#;

/// Short motif with mirrored echoes.
const CANON_PRESET: &str = r#"
name = "Canon"
description = "A motif chasing itself through a decaying echo stack"
loop_count = 2
refrain = [[392.0, 440.0, 493.88, 0.0, 587.33, 493.88]]
durations = [0.2, 0.2, 0.2, 0.2, 0.4, 0.4]

[[timbre]]
ratio = 1.0
amplitude = 1.0

[[timbre]]
ratio = 3.0
amplitude = 0.2

[delay]
repeats = 3
time_ms = 400.0
decay = [0.7, 0.2]
edge_mode = "mirror"
"#;

/// Inharmonic strikes with long release.
const BELLS_PRESET: &str = r#"
name = "Bells"
description = "Struck bells, long release"
refrain = [[659.25, 0.0, 523.25, 783.99]]
durations = [0.6, 0.2, 0.6, 1.2]
timbre_preset = "bell"

[envelope]
kind = "parametric"
attack = 0
decay = 30
sustain = 10
release = 80
"#;

/// Factory timbre names.
pub static FACTORY_TIMBRE_NAMES: &[&str] = &["sine", "organ", "clarinet", "bell"];

static FACTORY_TIMBRES: &[(&str, &[(f32, f32)])] = &[
    ("sine", &[(1.0, 1.0)]),
    ("organ", &[(1.0, 1.0), (2.0, 0.5), (3.0, 0.33), (4.0, 0.25), (6.0, 0.12), (8.0, 0.1)]),
    // odd harmonics dominate
    ("clarinet", &[(1.0, 1.0), (3.0, 0.75), (5.0, 0.5), (7.0, 0.14), (9.0, 0.09)]),
    ("bell", &[(1.0, 1.0), (2.0, 0.6), (2.4, 0.5), (3.0, 0.25), (4.2, 0.2), (5.4, 0.12)]),
];

/// Get all factory presets.
pub fn factory_presets() -> Vec<PerformerConfig> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| PerformerConfig::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by internal or display name, case-insensitive.
///
/// # Example
///
/// ```rust
/// use trope_config::get_factory_preset;
///
/// let chorale = get_factory_preset("Chorale").unwrap();
/// assert_eq!(chorale.refrain.len(), 4);
/// assert!(get_factory_preset("fugue").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<PerformerConfig> {
    let name_lower = name.to_lowercase();

    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(preset_name, toml)| {
            let config = PerformerConfig::from_toml(toml).ok()?;
            let matches = preset_name.to_lowercase() == name_lower
                || config.name.to_lowercase() == name_lower;
            matches.then_some(config)
        })
        .next()
}

/// Check if a name is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

/// Get a factory timbre by name, case-insensitive.
pub fn factory_timbre(name: &str) -> Option<Timbre> {
    let name_lower = name.to_lowercase();
    FACTORY_TIMBRES
        .iter()
        .find(|(timbre_name, _)| *timbre_name == name_lower)
        .and_then(|(_, pairs)| Timbre::from_pairs(pairs).ok())
}

/// Check if a name is a factory timbre.
pub fn is_factory_timbre(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    FACTORY_TIMBRE_NAMES.iter().any(|n| *n == name_lower)
}
