//! Performer file format and conversion into runtime types.

use serde::{Deserialize, Serialize};
use std::path::Path;

use trope_analysis::{DEFAULT_SMOOTHING_WINDOW, TimbreExtractor, amplitude_contour};
use trope_effects::{Delay, EdgeMode};
use trope_synth::{Envelope, Refrain, StageSettings, TimeScale, Timbre};

use crate::error::ConfigError;
use crate::factory_presets::factory_timbre;
use crate::validation::{ValidationResult, validate_performer};

/// One performer: what to play, how it sounds, and how often it repeats.
///
/// # TOML Format
///
/// ```toml
/// name = "Descant"
/// sample_rate = 44100
/// loop_count = 2
/// refrain = [[523.25, 587.33, 0.0, 659.25]]
/// durations = [0.25, 0.25, 0.25, 0.5]
///
/// [[timbre]]
/// ratio = 1.0
/// amplitude = 1.0
///
/// [[timbre]]
/// ratio = 2.0
/// amplitude = 0.3
///
/// [envelope]
/// kind = "parametric"
/// attack = 5
/// decay = 10
/// sustain = 40
/// release = 20
///
/// [delay]
/// repeats = 2
/// time_ms = 250.0
/// decay = [0.6, 0.2]
/// edge_mode = "mirror"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PerformerConfig {
    /// Name of the performer.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Times the rendered refrain is repeated back to back.
    #[serde(default = "default_loop_count")]
    pub loop_count: u32,

    /// Frequencies in Hz, one row per voice; `0.0` is a rest.
    pub refrain: Vec<Vec<f32>>,

    /// Slot durations in seconds.
    #[serde(default = "default_durations")]
    pub durations: Vec<f32>,

    /// Name of a factory timbre, used when `timbre` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timbre_preset: Option<String>,

    /// Explicit partials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timbre: Vec<PartialConfig>,

    /// Envelope; the base parametric envelope when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeConfig>,

    /// Echo stack applied after looping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelayConfig>,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_loop_count() -> u32 {
    1
}

fn default_durations() -> Vec<f32> {
    vec![1.0]
}

/// One `(ratio, amplitude)` partial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    /// Frequency multiplier.
    pub ratio: f32,
    /// Relative amplitude.
    pub amplitude: f32,
}

impl PartialConfig {
    /// Create a partial.
    pub fn new(ratio: f32, amplitude: f32) -> Self {
        Self { ratio, amplitude }
    }
}

/// Stage time table spacing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeScaleConfig {
    /// Geometric table.
    #[default]
    Geometric,
    /// Evenly spaced table.
    Linear,
}

impl From<TimeScaleConfig> for TimeScale {
    fn from(scale: TimeScaleConfig) -> Self {
        match scale {
            TimeScaleConfig::Geometric => TimeScale::Geometric,
            TimeScaleConfig::Linear => TimeScale::Linear,
        }
    }
}

/// Envelope settings, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum EnvelopeConfig {
    /// Table-driven stages.
    Parametric {
        /// Attack setting, 0-99.
        attack: u8,
        /// Decay setting, 0-99.
        decay: u8,
        /// Sustain setting, 0-99.
        sustain: u8,
        /// Release as a percentage of each tone, 0-99.
        release: u8,
        /// Table spacing.
        #[serde(default)]
        time_scale: TimeScaleConfig,
    },
    /// Amplitude contour taken from a recording.
    Reference {
        /// Contour values in `[0, 1]`.
        contour: Vec<f32>,
        /// Sample rate of the recording.
        source_rate: u32,
    },
}

impl EnvelopeConfig {
    /// Parametric envelope on the geometric table.
    pub fn parametric(attack: u8, decay: u8, sustain: u8, release: u8) -> Self {
        EnvelopeConfig::Parametric {
            attack,
            decay,
            sustain,
            release,
            time_scale: TimeScaleConfig::Geometric,
        }
    }

    /// Reference envelope from the amplitude contour of a recording.
    pub fn from_recording(signal: &[f32], sample_rate: u32) -> Self {
        EnvelopeConfig::Reference {
            contour: amplitude_contour(signal, DEFAULT_SMOOTHING_WINDOW),
            source_rate: sample_rate,
        }
    }

    /// Build the runtime envelope for output at `sample_rate`.
    pub fn to_envelope(&self, sample_rate: f32) -> Result<Envelope, ConfigError> {
        let envelope = match self {
            EnvelopeConfig::Parametric {
                attack,
                decay,
                sustain,
                release,
                time_scale,
            } => Envelope::with_settings(
                StageSettings::new(*attack, *decay, *sustain, *release),
                sample_rate,
                (*time_scale).into(),
            )?,
            EnvelopeConfig::Reference {
                contour,
                source_rate,
            } => Envelope::from_reference(contour.clone(), *source_rate as f32)?,
        };
        Ok(envelope)
    }
}

/// How the start of each echo is filled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeModeConfig {
    /// Silence.
    #[default]
    #[serde(alias = "empty", alias = "constant")]
    Zero,
    /// Repeat the first sample.
    Edge,
    /// Reflect about the first sample.
    #[serde(alias = "reflect")]
    Mirror,
}

impl From<EdgeModeConfig> for EdgeMode {
    fn from(mode: EdgeModeConfig) -> Self {
        match mode {
            EdgeModeConfig::Zero => EdgeMode::Zero,
            EdgeModeConfig::Edge => EdgeMode::Edge,
            EdgeModeConfig::Mirror => EdgeMode::Mirror,
        }
    }
}

/// Echo stack settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DelayConfig {
    /// Number of delayed copies.
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    /// Spacing between copies in milliseconds.
    #[serde(default = "default_time_ms")]
    pub time_ms: f32,
    /// `[start, end]` gains of the copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<[f32; 2]>,
    /// Fill mode before the start of each copy.
    #[serde(default)]
    pub edge_mode: EdgeModeConfig,
}

fn default_repeats() -> usize {
    1
}

fn default_time_ms() -> f32 {
    300.0
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            time_ms: default_time_ms(),
            decay: None,
            edge_mode: EdgeModeConfig::Zero,
        }
    }
}

impl DelayConfig {
    /// Build the runtime delay for output at `sample_rate`.
    pub fn to_delay(&self, sample_rate: f32) -> Result<Delay, ConfigError> {
        let mut delay = Delay::new(sample_rate)?
            .with_repeats(self.repeats)
            .with_delay_time_ms(self.time_ms)
            .with_edge_mode(self.edge_mode.into());
        delay.set_decay(self.decay.map(|[start, end]| (start, end)));
        Ok(delay)
    }
}

impl PerformerConfig {
    /// A performer with default settings playing `refrain`.
    pub fn new(name: impl Into<String>, refrain: Vec<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            loop_count: default_loop_count(),
            refrain,
            durations: default_durations(),
            timbre_preset: None,
            timbre: Vec::new(),
            envelope: None,
            delay: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the slot durations.
    pub fn with_durations(mut self, durations: Vec<f32>) -> Self {
        self.durations = durations;
        self
    }

    /// Set explicit partials.
    pub fn with_timbre(mut self, partials: impl IntoIterator<Item = (f32, f32)>) -> Self {
        self.timbre = partials
            .into_iter()
            .map(|(ratio, amplitude)| PartialConfig::new(ratio, amplitude))
            .collect();
        self
    }

    /// Use the partials of a recording, strongest `max_partials` peaks.
    pub fn with_timbre_from_recording(
        mut self,
        signal: &[f32],
        sample_rate: u32,
        max_partials: usize,
    ) -> Result<Self, ConfigError> {
        let timbre = TimbreExtractor::new(max_partials).extract(signal, sample_rate as f32)?;
        self.timbre = timbre
            .iter()
            .map(|p| PartialConfig::new(p.ratio, p.amplitude))
            .collect();
        self.timbre_preset = None;
        Ok(self)
    }

    /// Set the envelope.
    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Set the delay.
    pub fn with_delay(mut self, delay: DelayConfig) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the loop count.
    pub fn with_loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Load a performer from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded performer");
        Ok(config)
    }

    /// Load a performer from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the performer to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved performer");
        Ok(())
    }

    /// Convert the performer to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field, reporting all problems at once.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_performer(self)
    }

    /// Output sample rate as `f32`.
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }

    /// The refrain as runtime notes.
    pub fn to_refrain(&self) -> Result<Refrain, ConfigError> {
        Ok(Refrain::from_frequencies(self.refrain.clone())?)
    }

    /// Explicit partials, else the named factory timbre, else none.
    pub fn to_timbre(&self) -> Result<Option<Timbre>, ConfigError> {
        if !self.timbre.is_empty() {
            let pairs: Vec<(f32, f32)> = self.timbre.iter().map(|p| (p.ratio, p.amplitude)).collect();
            return Ok(Some(Timbre::from_pairs(&pairs)?));
        }
        match &self.timbre_preset {
            Some(name) => factory_timbre(name)
                .map(Some)
                .ok_or_else(|| ConfigError::PresetNotFound(name.clone())),
            None => Ok(None),
        }
    }

    /// The configured envelope, or the base envelope.
    pub fn to_envelope(&self) -> Result<Envelope, ConfigError> {
        match &self.envelope {
            Some(envelope) => envelope.to_envelope(self.sample_rate_hz()),
            None => Ok(Envelope::base(self.sample_rate_hz())?),
        }
    }

    /// The configured delay, if any.
    pub fn to_delay(&self) -> Result<Option<Delay>, ConfigError> {
        self.delay
            .as_ref()
            .map(|d| d.to_delay(self.sample_rate_hz()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trope_synth::Note;

    const FULL: &str = r#"
name = "Descant"
description = "High line"
sample_rate = 48000
loop_count = 2
refrain = [[523.25, 0.0], [659.25, 783.99]]
durations = [0.25, 0.5]

[[timbre]]
ratio = 1.0
amplitude = 1.0

[[timbre]]
ratio = 2.0
amplitude = 0.3

[envelope]
kind = "parametric"
attack = 5
decay = 10
sustain = 40
release = 20
time_scale = "linear"

[delay]
repeats = 2
time_ms = 250.0
decay = [0.6, 0.2]
edge_mode = "reflect"
"#;

    #[test]
    fn parses_full_performer() {
        let config = PerformerConfig::from_toml(FULL).unwrap();
        assert_eq!(config.name, "Descant");
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.loop_count, 2);
        assert_eq!(config.refrain[1], vec![659.25, 783.99]);
        assert_eq!(config.timbre[1], PartialConfig::new(2.0, 0.3));
        assert_eq!(
            config.envelope,
            Some(EnvelopeConfig::Parametric {
                attack: 5,
                decay: 10,
                sustain: 40,
                release: 20,
                time_scale: TimeScaleConfig::Linear,
            })
        );
        let delay = config.delay.as_ref().unwrap();
        assert_eq!(delay.decay, Some([0.6, 0.2]));
        assert_eq!(delay.edge_mode, EdgeModeConfig::Mirror);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let config = PerformerConfig::from_toml("name = \"A\"\nrefrain = [[440.0]]\n").unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.loop_count, 1);
        assert_eq!(config.durations, vec![1.0]);
        assert!(config.timbre.is_empty());
        assert!(config.envelope.is_none());
        assert!(config.delay.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PerformerConfig::from_toml("name = \"A\"\nrefrain = [[440.0]]\ntempo = 120\n").is_err());

        let bad_envelope = "name = \"A\"\nrefrain = [[440.0]]\n[envelope]\nkind = \"parametric\"\nattack = 1\ndecay = 1\nsustain = 1\nrelease = 1\nhold = 3\n";
        assert!(PerformerConfig::from_toml(bad_envelope).is_err());

        let bad_kind = "name = \"A\"\nrefrain = [[440.0]]\n[envelope]\nkind = \"adsr\"\n";
        assert!(PerformerConfig::from_toml(bad_kind).is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = PerformerConfig::from_toml(FULL).unwrap();
        let again = PerformerConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn converts_to_runtime_types() {
        let config = PerformerConfig::from_toml(FULL).unwrap();

        let refrain = config.to_refrain().unwrap();
        assert_eq!(refrain.voice_count(), 2);
        assert_eq!(refrain.get(0, 1), Some(Note::Rest));

        let timbre = config.to_timbre().unwrap().unwrap();
        assert_eq!(timbre.len(), 2);

        let Envelope::Parametric(p) = config.to_envelope().unwrap() else {
            panic!("expected parametric envelope");
        };
        assert_eq!(p.time_scale(), TimeScale::Linear);
        assert_eq!(p.sample_rate(), 48000.0);

        let delay = config.to_delay().unwrap().unwrap();
        assert_eq!(delay.repeats(), 2);
        assert_eq!(delay.delay_samples(), 12000);
        assert_eq!(delay.edge_mode(), EdgeMode::Mirror);
        assert_eq!(delay.decay(), Some((0.6, 0.2)));
    }

    #[test]
    fn missing_envelope_uses_base() {
        let config = PerformerConfig::new("plain", vec![vec![440.0]]);
        let Envelope::Parametric(p) = config.to_envelope().unwrap() else {
            panic!("expected parametric envelope");
        };
        assert_eq!(p.settings(), StageSettings::default());
        assert!(config.to_timbre().unwrap().is_none());
        assert!(config.to_delay().unwrap().is_none());
    }

    #[test]
    fn timbre_preset_resolves() {
        let mut config = PerformerConfig::new("organist", vec![vec![220.0]]);
        config.timbre_preset = Some("organ".to_string());
        assert!(config.to_timbre().unwrap().unwrap().len() > 1);

        config.timbre_preset = Some("theremin".to_string());
        assert!(matches!(config.to_timbre(), Err(ConfigError::PresetNotFound(_))));
    }

    #[test]
    fn reference_envelope_from_recording() {
        let recording: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.1).sin() * i as f32 / 2000.0).collect();
        let env = EnvelopeConfig::from_recording(&recording, 22050);
        let EnvelopeConfig::Reference { contour, source_rate } = &env else {
            panic!("expected reference envelope");
        };
        assert_eq!(contour.len(), 2000);
        assert_eq!(*source_rate, 22050);
        assert!(matches!(env.to_envelope(44100.0).unwrap(), Envelope::FromReference(_)));
    }
}
