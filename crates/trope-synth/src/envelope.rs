//! Amplitude envelopes matched to an exact tone length.
//!
//! Unlike a gate-driven ADSR that runs sample by sample, these envelopes are
//! shaped offline: the renderer knows every tone's final length before it
//! writes a sample, so [`Envelope::shape`] returns the whole curve at once and
//! always returns exactly the requested number of values.
//!
//! Two variants are supported:
//!
//! - **Parametric**: four integer settings (0-99) index into time tables that
//!   run from 1 ms to 5 s (attack) or 10 s (decay and sustain). Release is
//!   a percentage of the tone length, not a table lookup.
//! - **FromReference**: a normalized amplitude contour taken from a recording
//!   and stretched to the tone.
//!
//! # Fitting
//!
//! A parametric envelope is fitted to a tone of `L` samples with release length
//! `R = L · release / 100`, trying in order:
//!
//! 1. attack + release cover the tone: the attack is cut to `L - R` and the
//!    release starts from wherever it stopped
//! 2. attack + decay + release cover it: sustain is dropped, decay is cut
//! 3. otherwise all four stages play and sustain is stretched or cut so the
//!    release ends on the last sample
//!
//! Tones shorter than [`MIN_STAGED_SAMPLES`] skip the ladder and get a plain
//! ramp up to full level and back.

use alloc::vec::Vec;
use libm::{ceil, floor, fabsf};
use trope_core::{Result, SynthError, geomspace, linspace, resample_linear};

use crate::tone::check_sample_rate;

/// Peak level reached at the end of the attack stage.
pub const ATTACK_LEVEL: f32 = 1.0;

/// Level held during sustain.
pub const SUSTAIN_LEVEL: f32 = 0.75;

/// Near-silent floor that attack starts from and release falls to.
pub const QUIET_LEVEL: f32 = 0.001;

/// Leading attack samples forced to exact silence.
pub const ONSET_SILENCE: usize = 10;

/// Entries per stage time table.
pub const TABLE_STEPS: usize = 100;

/// Shortest tone that is fitted with stages instead of a plain ramp.
pub const MIN_STAGED_SAMPLES: usize = 20;

const SHORTEST_STAGE_SECONDS: f32 = 0.001;
const LONGEST_ATTACK_SECONDS: f32 = 5.0;
const LONGEST_STAGE_SECONDS: f32 = 10.0;

/// Spacing of the stage time tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeScale {
    /// Constant ratio between neighbouring entries; fine control of short stages.
    #[default]
    Geometric,
    /// Constant difference between neighbouring entries.
    Linear,
}

impl TimeScale {
    fn table(self, longest_seconds: f32) -> Vec<f32> {
        match self {
            TimeScale::Geometric => geomspace(SHORTEST_STAGE_SECONDS, longest_seconds, TABLE_STEPS),
            TimeScale::Linear => linspace(SHORTEST_STAGE_SECONDS, longest_seconds, TABLE_STEPS),
        }
    }

    /// Stage length in samples for a 0-99 setting.
    pub fn stage_samples(self, setting: u8, longest_seconds: f32, sample_rate: f32) -> usize {
        let table = self.table(longest_seconds);
        let seconds = table[usize::from(setting).min(TABLE_STEPS - 1)];
        (seconds * sample_rate) as usize
    }
}

/// Stage settings of a parametric envelope, each in `0..=99`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageSettings {
    /// Attack table index.
    pub attack: u8,
    /// Decay table index.
    pub decay: u8,
    /// Sustain table index.
    pub sustain: u8,
    /// Release as a percentage of the tone length.
    pub release: u8,
}

impl StageSettings {
    /// Create stage settings.
    pub const fn new(attack: u8, decay: u8, sustain: u8, release: u8) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    fn validate(&self) -> Result<()> {
        for (stage, value) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("sustain", self.sustain),
            ("release", self.release),
        ] {
            if usize::from(value) >= TABLE_STEPS {
                return Err(SynthError::InvalidEnvelopeSetting { stage, value });
            }
        }
        Ok(())
    }
}

impl Default for StageSettings {
    fn default() -> Self {
        Self::new(2, 2, 10, 10)
    }
}

/// Which branch of the fitting ladder a tone length fell into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeFit {
    /// No samples.
    Empty,
    /// Too short for stages; a straight ramp up and down.
    Ramp,
    /// Attack (possibly cut short) straight into release.
    AttackRelease {
        /// Attack samples played.
        attack: usize,
        /// Release samples.
        release: usize,
    },
    /// Full attack, cut decay, release.
    AttackDecayRelease {
        /// Decay samples played.
        decay: usize,
        /// Release samples.
        release: usize,
    },
    /// All four stages.
    Full {
        /// Sustain samples played.
        sustain: usize,
        /// Release samples.
        release: usize,
        /// `true` when sustain was shorter than its table length.
        sustain_truncated: bool,
    },
}

/// Parametric envelope with its stage curves computed once.
#[derive(Clone, Debug, PartialEq)]
pub struct Parametric {
    settings: StageSettings,
    sample_rate: f32,
    time_scale: TimeScale,
    attack_curve: Vec<f32>,
    decay_curve: Vec<f32>,
    sustain_samples: usize,
}

impl Parametric {
    fn new(settings: StageSettings, sample_rate: f32, time_scale: TimeScale) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        settings.validate()?;

        let attack_len =
            time_scale.stage_samples(settings.attack, LONGEST_ATTACK_SECONDS, sample_rate);
        let decay_len =
            time_scale.stage_samples(settings.decay, LONGEST_STAGE_SECONDS, sample_rate);
        let sustain_samples =
            time_scale.stage_samples(settings.sustain, LONGEST_STAGE_SECONDS, sample_rate);

        let mut attack_curve = linspace(QUIET_LEVEL, ATTACK_LEVEL, attack_len);
        let silent = ONSET_SILENCE.min(attack_curve.len());
        attack_curve[..silent].fill(0.0);

        Ok(Self {
            settings,
            sample_rate,
            time_scale,
            attack_curve,
            decay_curve: linspace(ATTACK_LEVEL, SUSTAIN_LEVEL, decay_len),
            sustain_samples,
        })
    }

    /// Stage settings.
    pub fn settings(&self) -> StageSettings {
        self.settings
    }

    /// Sample rate the stage lengths were computed for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Table spacing.
    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Attack length in samples.
    pub fn attack_samples(&self) -> usize {
        self.attack_curve.len()
    }

    /// Decay length in samples.
    pub fn decay_samples(&self) -> usize {
        self.decay_curve.len()
    }

    /// Sustain length in samples, before fitting.
    pub fn sustain_samples(&self) -> usize {
        self.sustain_samples
    }

    /// Release length for a tone of `len` samples.
    pub fn release_samples(&self, len: usize) -> usize {
        len * usize::from(self.settings.release) / 100
    }

    /// Decide how a tone of `len` samples is fitted.
    pub fn fit(&self, len: usize) -> EnvelopeFit {
        if len == 0 {
            return EnvelopeFit::Empty;
        }
        if len < MIN_STAGED_SAMPLES {
            return EnvelopeFit::Ramp;
        }
        let attack = self.attack_samples();
        let decay = self.decay_samples();
        let release = self.release_samples(len);

        if attack + release >= len {
            EnvelopeFit::AttackRelease {
                attack: len - release,
                release,
            }
        } else if attack + decay + release >= len {
            EnvelopeFit::AttackDecayRelease {
                decay: len - attack - release,
                release,
            }
        } else {
            let sustain = len - attack - decay - release;
            EnvelopeFit::Full {
                sustain,
                release,
                sustain_truncated: sustain < self.sustain_samples,
            }
        }
    }

    fn shape_into(&self, out: &mut Vec<f32>, len: usize) {
        match self.fit(len) {
            EnvelopeFit::Empty => {}
            EnvelopeFit::Ramp => push_ramp(out, len),
            EnvelopeFit::AttackRelease { attack, release } => {
                out.extend_from_slice(&self.attack_curve[..attack]);
                push_release(out, release);
            }
            EnvelopeFit::AttackDecayRelease { decay, release } => {
                out.extend_from_slice(&self.attack_curve);
                out.extend_from_slice(&self.decay_curve[..decay]);
                push_release(out, release);
            }
            EnvelopeFit::Full {
                sustain, release, ..
            } => {
                out.extend_from_slice(&self.attack_curve);
                out.extend_from_slice(&self.decay_curve);
                out.resize(out.len() + sustain, SUSTAIN_LEVEL);
                push_release(out, release);
            }
        }
    }
}

/// Release from the curve's current level down to the quiet floor.
fn push_release(out: &mut Vec<f32>, release: usize) {
    let start = out.last().copied().unwrap_or(QUIET_LEVEL);
    let end = start.min(QUIET_LEVEL);
    out.extend(linspace(start, end, release).into_iter().map(|v| v.max(end)));
}

fn push_ramp(out: &mut Vec<f32>, len: usize) {
    let span = len as f32;
    out.extend((0..len).map(|i| {
        let pos = 2.0 * (i as f32 + 0.5) / span - 1.0;
        (QUIET_LEVEL + (ATTACK_LEVEL - QUIET_LEVEL) * (1.0 - fabsf(pos))).min(ATTACK_LEVEL)
    }));
}

/// Amplitude contour taken from a reference recording.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    contour: Vec<f32>,
    source_rate: f32,
}

impl Reference {
    /// The stored contour, clamped to `[0, 1]`.
    pub fn contour(&self) -> &[f32] {
        &self.contour
    }

    /// Sample rate of the recording the contour came from.
    pub fn source_rate(&self) -> f32 {
        self.source_rate
    }

    fn shape_into(&self, out: &mut Vec<f32>, len: usize) {
        let contour_len = self.contour.len() as f64;
        let source_rate = f64::from(self.source_rate);
        let target_rate = floor(len as f64 / contour_len * source_rate);
        let resampled_len = ceil(contour_len * target_rate / source_rate) as usize;

        let curve = resample_linear(&self.contour, resampled_len);
        if curve.len() >= len {
            out.extend_from_slice(&curve[..len]);
        } else {
            out.resize(len - curve.len(), 0.0);
            out.extend(curve);
        }
        for v in out.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }
}

/// Amplitude envelope, parametric or taken from a reference recording.
///
/// # Example
///
/// ```rust
/// use trope_synth::{Envelope, EnvelopeFit};
///
/// let env = Envelope::parametric(2, 2, 10, 10, 44100.0).unwrap();
///
/// let curve = env.shape(44100);
/// assert_eq!(curve.len(), 44100);
/// assert_eq!(curve[0], 0.0);
/// assert!(curve.iter().all(|&v| (0.0..=1.0).contains(&v)));
///
/// // A 100-sample tone is too short for sustain.
/// assert!(matches!(env.fit(100), Some(EnvelopeFit::AttackDecayRelease { .. })));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    /// Attack/decay/sustain/release from table settings.
    Parametric(Parametric),
    /// Contour from a recording, stretched to each tone.
    FromReference(Reference),
}

impl Envelope {
    /// Parametric envelope on the default geometric time scale.
    pub fn parametric(attack: u8, decay: u8, sustain: u8, release: u8, sample_rate: f32) -> Result<Self> {
        Self::with_settings(
            StageSettings::new(attack, decay, sustain, release),
            sample_rate,
            TimeScale::default(),
        )
    }

    /// Parametric envelope with explicit settings and time scale.
    pub fn with_settings(settings: StageSettings, sample_rate: f32, time_scale: TimeScale) -> Result<Self> {
        Parametric::new(settings, sample_rate, time_scale).map(Envelope::Parametric)
    }

    /// The envelope used when none is configured: settings `(2, 2, 10, 10)`.
    pub fn base(sample_rate: f32) -> Result<Self> {
        Self::with_settings(StageSettings::default(), sample_rate, TimeScale::default())
    }

    /// Envelope following a pre-extracted amplitude contour.
    ///
    /// Values are clamped to `[0, 1]`; non-finite values become `0.0`.
    pub fn from_reference(contour: Vec<f32>, source_rate: f32) -> Result<Self> {
        check_sample_rate(source_rate)?;
        if contour.is_empty() {
            return Err(SynthError::EmptyReferenceContour);
        }
        let contour = contour
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 })
            .collect();
        Ok(Envelope::FromReference(Reference {
            contour,
            source_rate,
        }))
    }

    /// Ladder branch for a tone of `len` samples; `None` for reference envelopes.
    pub fn fit(&self, len: usize) -> Option<EnvelopeFit> {
        match self {
            Envelope::Parametric(p) => Some(p.fit(len)),
            Envelope::FromReference(_) => None,
        }
    }

    /// Amplitude curve of exactly `len` values in `[0, 1]`.
    pub fn shape(&self, len: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(len);
        match self {
            Envelope::Parametric(p) => p.shape_into(&mut out, len),
            Envelope::FromReference(r) => r.shape_into(&mut out, len),
        }
        debug_assert_eq!(out.len(), len);
        out
    }

    /// Multiply `buffer` in place by an envelope of its own length.
    pub fn apply(&self, buffer: &mut [f32]) {
        let curve = self.shape(buffer.len());
        for (sample, gain) in buffer.iter_mut().zip(curve) {
            *sample *= gain;
        }
    }
}
