//! Echo stack: time-shifted, decaying copies of a rendered buffer.
//!
//! Unlike a feedback delay line, [`Delay::apply`] never mixes anything. It
//! returns one row per copy so the caller can sum, normalize or route the
//! echoes however it likes.

use alloc::format;
use core::str::FromStr;
use trope_core::{Result, SampleMatrix, SynthError, linspace, ms_to_samples};

/// How samples before the start of the buffer are filled in a shifted copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Silence.
    #[default]
    Zero,
    /// Repeat the first sample.
    Edge,
    /// Reflect the buffer about its first sample (the first sample itself is
    /// not repeated).
    Mirror,
}

impl EdgeMode {
    /// Value at virtual position `-offset` (`offset >= 1`) before the buffer.
    fn before_start(self, buffer: &[f32], offset: usize) -> f32 {
        match self {
            EdgeMode::Zero => 0.0,
            EdgeMode::Edge => buffer.first().copied().unwrap_or(0.0),
            EdgeMode::Mirror => match buffer.len() {
                0 => 0.0,
                1 => buffer[0],
                n => {
                    let period = 2 * (n - 1);
                    let folded = offset % period;
                    let index = if folded < n { folded } else { period - folded };
                    buffer[index]
                }
            },
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeMode::Zero => "zero",
            EdgeMode::Edge => "edge",
            EdgeMode::Mirror => "mirror",
        }
    }
}

impl FromStr for EdgeMode {
    type Err = SynthError;

    /// Accepts `zero` (also `empty`, `constant`), `edge`, and `mirror` (also
    /// `reflect`).
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zero" | "empty" | "constant" => Ok(EdgeMode::Zero),
            "edge" => Ok(EdgeMode::Edge),
            "mirror" | "reflect" => Ok(EdgeMode::Mirror),
            other => Err(SynthError::InvalidDelay(format!("unknown edge mode '{other}'"))),
        }
    }
}

/// Stacked echo effect.
///
/// Row 0 of the result is the input. Row `k` is the input delayed by
/// `k × delay_samples`, scaled by the `k`-th value of the decay ramp when one
/// is set.
///
/// ## Parameters
///
/// | Name | Range | Default |
/// |------|-------|---------|
/// | Repeats | 0- | 1 |
/// | Delay Time | ≥ 0 ms | 300.0 |
/// | Decay | `(start, end)` gains, optional | none |
/// | Edge Mode | zero / edge / mirror | zero |
///
/// # Example
///
/// ```rust
/// use trope_effects::Delay;
///
/// let mut delay = Delay::new(1000.0).unwrap();
/// delay.set_repeats(2);
/// delay.set_delay_time_ms(2.0);
/// delay.set_decay(Some((0.5, 0.25)));
///
/// let stack = delay.apply(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(stack.shape(), (3, 5));
/// assert_eq!(stack.row(0), &[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(stack.row(1), &[0.0, 0.0, 0.5, 1.0, 1.5]);
/// assert_eq!(stack.row(2), &[0.0, 0.0, 0.0, 0.0, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    sample_rate: f32,
    repeats: usize,
    delay_time_ms: f32,
    decay: Option<(f32, f32)>,
    edge_mode: EdgeMode,
}

impl Delay {
    /// One 300 ms repeat, no decay, zero-filled.
    pub fn new(sample_rate: f32) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            repeats: 1,
            delay_time_ms: 300.0,
            decay: None,
            edge_mode: EdgeMode::Zero,
        })
    }

    /// Set the number of delayed copies.
    pub fn set_repeats(&mut self, repeats: usize) {
        self.repeats = repeats;
    }

    /// Number of delayed copies.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Set the spacing between copies in milliseconds.
    pub fn set_delay_time_ms(&mut self, delay_ms: f32) {
        self.delay_time_ms = delay_ms;
    }

    /// Spacing between copies in milliseconds.
    pub fn delay_time_ms(&self) -> f32 {
        self.delay_time_ms
    }

    /// Spacing between copies in whole samples.
    pub fn delay_samples(&self) -> usize {
        ms_to_samples(self.delay_time_ms, self.sample_rate)
    }

    /// Set the gain ramp applied to copies `1..=repeats`.
    pub fn set_decay(&mut self, decay: Option<(f32, f32)>) {
        self.decay = decay;
    }

    /// Gain ramp, if any.
    pub fn decay(&self) -> Option<(f32, f32)> {
        self.decay
    }

    /// Set how the gap before each shifted copy is filled.
    pub fn set_edge_mode(&mut self, mode: EdgeMode) {
        self.edge_mode = mode;
    }

    /// Gap fill mode.
    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Builder form of [`set_repeats`](Self::set_repeats).
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Builder form of [`set_delay_time_ms`](Self::set_delay_time_ms).
    pub fn with_delay_time_ms(mut self, delay_ms: f32) -> Self {
        self.delay_time_ms = delay_ms;
        self
    }

    /// Builder form of [`set_decay`](Self::set_decay).
    pub fn with_decay(mut self, start: f32, end: f32) -> Self {
        self.decay = Some((start, end));
        self
    }

    /// Builder form of [`set_edge_mode`](Self::set_edge_mode).
    pub fn with_edge_mode(mut self, mode: EdgeMode) -> Self {
        self.edge_mode = mode;
        self
    }

    /// Gain of each copy, copy 0 first.
    pub fn gains(&self) -> alloc::vec::Vec<f32> {
        let mut gains = alloc::vec![1.0];
        match self.decay {
            Some((start, end)) => gains.extend(linspace(start, end, self.repeats)),
            None => gains.resize(self.repeats + 1, 1.0),
        }
        gains
    }

    fn validate(&self) -> Result<()> {
        if !self.delay_time_ms.is_finite() || self.delay_time_ms < 0.0 {
            return Err(SynthError::InvalidDelay(format!(
                "delay time must be a non-negative number of milliseconds, got {}",
                self.delay_time_ms
            )));
        }
        match self.decay {
            Some((start, end)) if !(start.is_finite() && end.is_finite()) => {
                Err(SynthError::InvalidDecayRange)
            }
            _ => Ok(()),
        }
    }

    /// Stack `repeats + 1` copies of `buffer`, each one delay later.
    ///
    /// The result has shape `(repeats + 1, buffer.len())`; copies are cut at
    /// the end of the buffer, never extended.
    pub fn apply(&self, buffer: &[f32]) -> Result<SampleMatrix> {
        self.validate()?;

        let len = buffer.len();
        let step = self.delay_samples();
        let gains = self.gains();
        let mut stack = SampleMatrix::new(self.repeats + 1, len);

        for (copy, &gain) in gains.iter().enumerate() {
            let shift = copy.saturating_mul(step);
            let split = shift.min(len);
            let row = stack.row_mut(copy);
            for (i, sample) in row[..split].iter_mut().enumerate() {
                *sample = self.edge_mode.before_start(buffer, shift - i) * gain;
            }
            for (sample, &x) in row[split..].iter_mut().zip(buffer) {
                *sample = x * gain;
            }
        }

        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn ramp(n: usize) -> Vec<f32> {
        (1..=n).map(|i| i as f32).collect()
    }

    #[test]
    fn zero_repeats_is_identity() {
        let input = ramp(8);
        let stack = Delay::new(1000.0)
            .unwrap()
            .with_repeats(0)
            .with_decay(0.1, 0.1)
            .apply(&input)
            .unwrap();
        assert_eq!(stack.shape(), (1, 8));
        assert_eq!(stack.row(0), input.as_slice());
    }

    #[test]
    fn edge_mode_repeats_first_sample() {
        let stack = Delay::new(1000.0)
            .unwrap()
            .with_delay_time_ms(2.0)
            .with_edge_mode(EdgeMode::Edge)
            .apply(&ramp(5))
            .unwrap();
        assert_eq!(stack.row(1), &[1.0, 1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn mirror_mode_reflects() {
        let stack = Delay::new(1000.0)
            .unwrap()
            .with_delay_time_ms(3.0)
            .with_edge_mode(EdgeMode::Mirror)
            .apply(&ramp(5))
            .unwrap();
        // reflect of [1 2 3 4 5] padded by 3: [4 3 2 | 1 2 ...]
        assert_eq!(stack.row(1), &[4.0, 3.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn mirror_folds_past_buffer_length() {
        let stack = Delay::new(1000.0)
            .unwrap()
            .with_repeats(2)
            .with_delay_time_ms(4.0)
            .with_edge_mode(EdgeMode::Mirror)
            .apply(&[1.0, 2.0, 3.0])
            .unwrap();
        // reflection repeats every 2 * (3 - 1) samples: ... 1 2 3 2 | 1 2 3
        assert_eq!(stack.row(1), &[1.0, 2.0, 3.0]);
        assert_eq!(stack.row(2), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn mirror_of_single_sample() {
        assert_eq!(EdgeMode::Mirror.before_start(&[7.0], 4), 7.0);
        assert_eq!(EdgeMode::Mirror.before_start(&[], 4), 0.0);
    }

    #[test]
    fn decay_ramp_skips_copy_zero() {
        let delay = Delay::new(44100.0).unwrap().with_repeats(3).with_decay(0.9, 0.1);
        let gains = delay.gains();
        assert_eq!(gains.len(), 4);
        assert_eq!(gains[0], 1.0);
        assert_eq!(gains[1], 0.9);
        assert!((gains[2] - 0.5).abs() < 1e-6);
        assert_eq!(gains[3], 0.1);
    }

    #[test]
    fn long_delay_fills_whole_copy() {
        let stack = Delay::new(1000.0)
            .unwrap()
            .with_delay_time_ms(100.0)
            .apply(&ramp(4))
            .unwrap();
        assert_eq!(stack.row(1), &[0.0; 4]);
    }

    #[test]
    fn invalid_parameters_rejected() {
        let bad_time = Delay::new(1000.0).unwrap().with_delay_time_ms(-1.0);
        assert!(matches!(bad_time.apply(&[1.0]), Err(SynthError::InvalidDelay(_))));

        let bad_decay = Delay::new(1000.0).unwrap().with_decay(f32::NAN, 0.5);
        assert_eq!(bad_decay.apply(&[1.0]), Err(SynthError::InvalidDecayRange));

        assert!(Delay::new(0.0).is_err());
    }

    #[test]
    fn edge_mode_names() {
        assert_eq!("empty".parse::<EdgeMode>(), Ok(EdgeMode::Zero));
        assert_eq!("reflect".parse::<EdgeMode>(), Ok(EdgeMode::Mirror));
        assert_eq!("edge".parse::<EdgeMode>().map(EdgeMode::as_str), Ok("edge"));
        assert!("wrap".parse::<EdgeMode>().is_err());
    }

    #[test]
    fn empty_buffer() {
        let stack = Delay::new(1000.0).unwrap().with_repeats(2).apply(&[]).unwrap();
        assert_eq!(stack.shape(), (3, 0));
    }
}
