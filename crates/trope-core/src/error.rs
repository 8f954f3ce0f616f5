//! Error types for synthesis and effect operations.
//!
//! Rendering is a pure computation, so every error here describes input that
//! was rejected before (or while) sizing the output. Conditions the renderer can
//! absorb on its own, such as a tone too short for its envelope stages or a
//! silent row during normalization, never show up as errors.

use alloc::string::String;
use thiserror::Error;

/// Errors that can occur while rendering a refrain or applying an effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// The refrain has no voices or no time slots.
    #[error("refrain is empty")]
    EmptyRefrain,

    /// A voice row has a different number of time slots than the first row.
    #[error("refrain row {row} has {found} slots, expected {expected}")]
    RaggedRefrain {
        /// Index of the offending row.
        row: usize,
        /// Slot count of row 0.
        expected: usize,
        /// Slot count of the offending row.
        found: usize,
    },

    /// No durations were supplied.
    #[error("durations are empty")]
    EmptyDurations,

    /// A duration is negative or not finite.
    #[error("duration {index} is invalid: {value}")]
    InvalidDuration {
        /// Index into the durations sequence.
        index: usize,
        /// The rejected value, in seconds.
        value: f32,
    },

    /// Sample rate is zero, negative, or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Frequency is negative or not finite. Rests are written as `0`.
    #[error("invalid frequency: {0} Hz")]
    InvalidFrequency(f32),

    /// A timbre was supplied with no partials.
    #[error("timbre has no partials")]
    EmptyTimbre,

    /// A timbre partial has a non-positive ratio or a negative amplitude.
    #[error("timbre partial {index} is invalid (ratio {ratio}, amplitude {amplitude})")]
    InvalidPartial {
        /// Index of the partial.
        index: usize,
        /// Harmonic ratio of the partial.
        ratio: f32,
        /// Amplitude of the partial.
        amplitude: f32,
    },

    /// A tone was asked to pad itself to fewer samples than it already has.
    #[error("cannot pad a {length}-sample tone to {pad_to} samples")]
    PaddingTooShort {
        /// Quantized tone length.
        length: usize,
        /// Requested padded length.
        pad_to: usize,
    },

    /// An envelope stage setting is outside the 0-99 table range.
    #[error("envelope {stage} setting {value} is outside 0..=99")]
    InvalidEnvelopeSetting {
        /// Stage name ("attack", "decay", "sustain" or "release").
        stage: &'static str,
        /// The rejected setting.
        value: u8,
    },

    /// A reference envelope contour has no samples.
    #[error("reference envelope contour is empty")]
    EmptyReferenceContour,

    /// Delay parameters cannot be realised.
    #[error("invalid delay: {0}")]
    InvalidDelay(String),

    /// A decay range endpoint is not finite.
    #[error("decay range must have finite endpoints")]
    InvalidDecayRange,
}

/// Result type for synthesis operations.
pub type Result<T> = core::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn ragged_refrain_display() {
        let err = SynthError::RaggedRefrain {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "refrain row 2 has 3 slots, expected 4");
    }

    #[test]
    fn invalid_frequency_display() {
        let err = SynthError::InvalidFrequency(-440.0);
        assert_eq!(err.to_string(), "invalid frequency: -440 Hz");
    }

    #[test]
    fn envelope_setting_display() {
        let err = SynthError::InvalidEnvelopeSetting {
            stage: "attack",
            value: 120,
        };
        assert_eq!(err.to_string(), "envelope attack setting 120 is outside 0..=99");
    }

    #[test]
    fn padding_display() {
        let err = SynthError::PaddingTooShort {
            length: 100,
            pad_to: 50,
        };
        assert_eq!(err.to_string(), "cannot pad a 100-sample tone to 50 samples");
    }
}
