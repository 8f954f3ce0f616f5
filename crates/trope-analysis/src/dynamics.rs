//! Level statistics for rendered buffers
//!
//! - RMS level
//! - Peak level in dB
//! - Crest factor (peak-to-RMS ratio)
//! - Windowed RMS envelope

use trope_core::peak;

/// Level reported for silence, in dB.
pub const SILENCE_DB: f32 = -200.0;

fn to_db(linear: f32) -> f32 {
    if linear > 1e-10 {
        20.0 * linear.log10()
    } else {
        SILENCE_DB
    }
}

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB)
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_sq / signal.len() as f32).sqrt()
}

/// Compute RMS level in dB
pub fn rms_db(signal: &[f32]) -> f32 {
    to_db(rms(signal))
}

/// Compute peak level in dB
pub fn peak_db(signal: &[f32]) -> f32 {
    to_db(peak(signal))
}

/// Compute crest factor (peak-to-RMS ratio)
///
/// A sine gives about 1.41. Silence gives 0.
pub fn crest_factor(signal: &[f32]) -> f32 {
    let rms_val = rms(signal);
    if rms_val > 1e-10 {
        peak(signal) / rms_val
    } else {
        0.0
    }
}

/// RMS of consecutive windows of `window_size` samples, `hop_size` apart.
///
/// Signals shorter than one window give a single value.
pub fn rms_envelope(signal: &[f32], window_size: usize, hop_size: usize) -> Vec<f32> {
    if signal.len() < window_size || window_size == 0 || hop_size == 0 {
        return vec![rms(signal)];
    }

    (0..=signal.len() - window_size)
        .step_by(hop_size)
        .map(|offset| rms(&signal[offset..offset + window_size]))
        .collect()
}

/// Summary levels of a buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    /// Peak absolute sample value
    pub peak: f32,
    /// RMS level, linear
    pub rms: f32,
    /// Peak / RMS
    pub crest_factor: f32,
}

impl Levels {
    /// Measure a buffer.
    pub fn measure(signal: &[f32]) -> Self {
        Self {
            peak: peak(signal),
            rms: rms(signal),
            crest_factor: crest_factor(signal),
        }
    }

    /// RMS level in dB
    pub fn rms_db(&self) -> f32 {
        to_db(self.rms)
    }
}
