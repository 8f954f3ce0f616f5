//! Sine tone generation with zero-crossing quantized lengths.
//!
//! A tone that stops mid-cycle ends on a non-zero sample, and the jump to the
//! next segment is heard as a click. [`duration_to_samples`] rounds every
//! requested duration to the nearest half-cycle boundary of the tone's own
//! frequency, so each segment starts and ends on (or within a sample of) a
//! zero crossing.
//!
//! When several tones share one time slot the slot is as wide as the longest
//! of them; shorter tones are centred in the slot with zero padding on both
//! sides instead of being left-aligned, which keeps overtones from leading or
//! lagging their fundamental.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::TAU;
use libm::{ceil, fabs, floor, sin};
use trope_core::{Result, SynthError};

use crate::note::Note;

/// Quantize a duration to the nearest half-cycle boundary, in samples.
///
/// Half-cycle boundaries `k · sample_rate / (2 · frequency)` are laid out
/// (rounded up to whole samples) from zero to just past the naive length
/// `sample_rate · duration_seconds`; whichever of the last two is closer to the
/// naive length wins, ties going to the shorter one. The result is always
/// within one half-cycle (plus the one-sample rounding) of the naive length.
///
/// A frequency of `0.0` is a rest and quantizes to `0`.
///
/// # Example
///
/// ```rust
/// use trope_synth::duration_to_samples;
///
/// // 441 Hz at 44.1 kHz has a 50-sample half-cycle; 1 s lands exactly on one.
/// assert_eq!(duration_to_samples(441.0, 1.0, 44100.0).unwrap(), 44100);
///
/// // 0.26 s is 11466 samples naive; nearest boundaries are 11450 and 11500.
/// assert_eq!(duration_to_samples(441.0, 0.26, 44100.0).unwrap(), 11450);
///
/// assert_eq!(duration_to_samples(0.0, 1.0, 44100.0).unwrap(), 0);
/// assert!(duration_to_samples(-440.0, 1.0, 44100.0).is_err());
/// ```
pub fn duration_to_samples(frequency: f32, duration_seconds: f32, sample_rate: f32) -> Result<usize> {
    check_sample_rate(sample_rate)?;
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(SynthError::InvalidDuration {
            index: 0,
            value: duration_seconds,
        });
    }
    Note::from(frequency).validate()?;
    if frequency == 0.0 {
        return Ok(0);
    }

    let sr = f64::from(sample_rate);
    let naive = sr * f64::from(duration_seconds);
    let half_cycle = sr / f64::from(frequency) / 2.0;

    // Boundaries k * half_cycle for k * half_cycle < stop.
    let stop = floor(naive + half_cycle);
    if stop <= 0.0 {
        return Ok(0);
    }
    let count = ceil(stop / half_cycle) as usize;
    if count < 2 {
        return Ok(0);
    }

    let last = ceil((count - 1) as f64 * half_cycle);
    let second_to_last = ceil((count - 2) as f64 * half_cycle);

    let chosen = if fabs(naive - second_to_last) <= fabs(naive - last) {
        second_to_last
    } else {
        last
    };
    Ok(chosen as usize)
}

pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidSampleRate(sample_rate))
    }
}

/// Sine tone generator for a fixed sample rate.
///
/// # Example
///
/// ```rust
/// use trope_synth::{Note, ToneGenerator};
///
/// let tones = ToneGenerator::new(44100.0).unwrap();
/// assert_eq!(tones.quantize(Note::Pitch(441.0), 0.01).unwrap(), 450);
///
/// // Centre a 441-sample tone inside a 450-sample slot.
/// let tone = tones.generate(Note::Pitch(441.0), 441, 0.5, Some(450)).unwrap();
/// assert_eq!(tone.len(), 450);
/// assert!(tone[..4].iter().all(|&s| s == 0.0));
/// assert!(tone[445..].iter().all(|&s| s == 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneGenerator {
    sample_rate: f32,
}

impl ToneGenerator {
    /// Create a generator, rejecting non-positive sample rates.
    pub fn new(sample_rate: f32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        Ok(Self { sample_rate })
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Quantized length of `note` held for `duration_seconds`.
    pub fn quantize(&self, note: Note, duration_seconds: f32) -> Result<usize> {
        duration_to_samples(note.frequency(), duration_seconds, self.sample_rate)
    }

    /// Generate a tone, optionally centre-padded to `pad_to` samples.
    ///
    /// A rest yields `pad_to` (or `duration_in_samples`) zeros.
    pub fn generate(
        &self,
        note: Note,
        duration_in_samples: usize,
        amplitude: f32,
        pad_to: Option<usize>,
    ) -> Result<Vec<f32>> {
        let mut out = vec![0.0; pad_to.unwrap_or(duration_in_samples)];
        self.generate_into(note, duration_in_samples, amplitude, &mut out)?;
        Ok(out)
    }

    /// Write a tone centred in `out`, zeroing every sample it doesn't cover.
    ///
    /// The leading pad is `floor(gap / 2)` samples and the trailing pad takes
    /// the remainder, so the tone plus padding fills `out` exactly.
    pub fn generate_into(
        &self,
        note: Note,
        duration_in_samples: usize,
        amplitude: f32,
        out: &mut [f32],
    ) -> Result<()> {
        note.validate()?;
        let hz = match note {
            Note::Rest => {
                out.fill(0.0);
                return Ok(());
            }
            Note::Pitch(hz) => hz,
        };
        if duration_in_samples > out.len() {
            return Err(SynthError::PaddingTooShort {
                length: duration_in_samples,
                pad_to: out.len(),
            });
        }

        let lead = (out.len() - duration_in_samples) / 2;
        let (head, rest) = out.split_at_mut(lead);
        let (body, tail) = rest.split_at_mut(duration_in_samples);
        head.fill(0.0);
        tail.fill(0.0);

        let cycles_per_sample = f64::from(hz) / f64::from(self.sample_rate);
        for (n, sample) in body.iter_mut().enumerate() {
            let phase = n as f64 * cycles_per_sample;
            let phase = phase - floor(phase);
            *sample = sin(TAU * phase) as f32 * amplitude;
        }
        Ok(())
    }
}
