//! Performer configuration validation.
//!
//! Every problem in a configuration is collected before a render starts, so a
//! user fixing a TOML file sees all of them at once.
//!
//! # Example
//!
//! ```rust
//! use trope_config::{PerformerConfig, ValidationError, validate_performer};
//!
//! let mut config = PerformerConfig::new("broken", vec![vec![440.0]]);
//! config.durations = vec![-1.0];
//! config.loop_count = 0;
//!
//! let err = validate_performer(&config).unwrap_err();
//! assert!(matches!(err, ValidationError::Multiple(ref errors) if errors.len() == 2));
//! ```

use thiserror::Error;

use crate::factory_presets::is_factory_timbre;
use crate::performer_config::{EnvelopeConfig, PerformerConfig};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the field.
        field: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// A list that must have entries is empty.
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Any other malformed field.
    #[error("invalid '{field}': {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest envelope stage setting.
pub const MAX_STAGE_SETTING: u8 = 99;

struct Collector(Vec<ValidationError>);

impl Collector {
    fn range(&mut self, field: impl Into<String>, value: f32, min: f32, max: f32) {
        if !(value.is_finite() && value >= min && value <= max) {
            self.0.push(ValidationError::OutOfRange {
                field: field.into(),
                value,
                min,
                max,
            });
        }
    }

    fn positive(&mut self, field: impl Into<String>, value: f32) {
        if !(value.is_finite() && value > 0.0) {
            self.0.push(ValidationError::OutOfRange {
                field: field.into(),
                value,
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
            });
        }
    }

    fn non_empty<T>(&mut self, field: &str, values: &[T]) -> bool {
        if values.is_empty() {
            self.0.push(ValidationError::Empty(field.to_string()));
            return false;
        }
        true
    }

    fn invalid(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(ValidationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        });
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.0.len() {
            0 => Ok(()),
            1 => Err(self.0.remove(0)),
            _ => Err(ValidationError::Multiple(self.0)),
        }
    }
}

/// Validate a performer configuration, reporting every problem found.
pub fn validate_performer(config: &PerformerConfig) -> ValidationResult<()> {
    let mut errors = Collector(Vec::new());

    if config.sample_rate == 0 {
        errors.invalid("sample_rate", "must be greater than 0");
    }
    if config.loop_count == 0 {
        errors.invalid("loop_count", "must be at least 1");
    }

    if errors.non_empty("refrain", &config.refrain) {
        let expected = config.refrain[0].len();
        for (row, voice) in config.refrain.iter().enumerate() {
            if voice.is_empty() {
                errors.0.push(ValidationError::Empty(format!("refrain[{row}]")));
            } else if voice.len() != expected {
                errors.invalid(
                    format!("refrain[{row}]"),
                    format!("has {} slots, expected {expected}", voice.len()),
                );
            }
            for (slot, &hz) in voice.iter().enumerate() {
                errors.range(format!("refrain[{row}][{slot}]"), hz, 0.0, f32::MAX);
            }
        }
    }

    if errors.non_empty("durations", &config.durations) {
        for (i, &seconds) in config.durations.iter().enumerate() {
            errors.positive(format!("durations[{i}]"), seconds);
        }
    }

    for (i, partial) in config.timbre.iter().enumerate() {
        errors.positive(format!("timbre[{i}].ratio"), partial.ratio);
        errors.range(format!("timbre[{i}].amplitude"), partial.amplitude, 0.0, f32::MAX);
    }
    if let Some(name) = &config.timbre_preset {
        if !config.timbre.is_empty() {
            errors.invalid("timbre_preset", "cannot be combined with an explicit timbre");
        } else if !is_factory_timbre(name) {
            errors.invalid("timbre_preset", format!("unknown factory timbre '{name}'"));
        }
    }

    match &config.envelope {
        Some(EnvelopeConfig::Parametric {
            attack,
            decay,
            sustain,
            release,
            ..
        }) => {
            let max = f32::from(MAX_STAGE_SETTING);
            for (stage, value) in [
                ("attack", attack),
                ("decay", decay),
                ("sustain", sustain),
                ("release", release),
            ] {
                errors.range(format!("envelope.{stage}"), f32::from(*value), 0.0, max);
            }
        }
        Some(EnvelopeConfig::Reference {
            contour,
            source_rate,
        }) => {
            errors.non_empty("envelope.contour", contour);
            if *source_rate == 0 {
                errors.invalid("envelope.source_rate", "must be greater than 0");
            }
        }
        None => {}
    }

    if let Some(delay) = &config.delay {
        errors.range("delay.time_ms", delay.time_ms, 0.0, f32::MAX);
        if let Some([start, end]) = delay.decay {
            errors.range("delay.decay[0]", start, 0.0, 1.0);
            errors.range("delay.decay[1]", end, 0.0, 1.0);
        }
    }

    errors.finish()
}
