//! Array helpers for offline rendering.
//!
//! These are the few vector operations the renderer is built from. All of
//! them allocate their result once and are suitable for `no_std` + `alloc`.
//!
//! # Ramps
//!
//! - [`linspace`] - Evenly spaced values, endpoints included
//! - [`geomspace`] - Geometrically spaced values, endpoints included
//!
//! # Sequences
//!
//! - [`tile`] - Repeat a slice end-to-end
//! - [`resample_linear`] - Stretch a curve to a new length
//!
//! # Levels
//!
//! - [`peak`] - Largest absolute sample value
//! - [`normalize_to_peak`] - Scale a buffer so its peak hits a target
//! - [`ms_to_samples`] - Millisecond to whole-sample conversion

use alloc::vec::Vec;
use libm::{expf, floorf, logf};

/// Evenly spaced values from `start` to `end`, both included.
///
/// `num == 0` yields an empty vector and `num == 1` yields `[start]`. The last
/// value is exactly `end`.
///
/// # Example
/// ```rust
/// use trope_core::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
/// ```
pub fn linspace(start: f32, end: f32, num: usize) -> Vec<f32> {
    match num {
        0 => Vec::new(),
        1 => alloc::vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f32;
            let mut out: Vec<f32> = (0..num).map(|i| start + i as f32 * step).collect();
            out[num - 1] = end;
            out
        }
    }
}

/// Geometrically spaced values from `start` to `end`, both included.
///
/// Both endpoints must be positive. Each value is a constant ratio larger than
/// the previous one, which gives a table finer resolution near `start`.
///
/// # Example
/// ```rust
/// use trope_core::geomspace;
///
/// let table = geomspace(1.0, 1000.0, 4);
/// assert!((table[1] - 10.0).abs() < 1e-3);
/// assert!((table[2] - 100.0).abs() < 1e-2);
/// assert_eq!(table[3], 1000.0);
/// ```
pub fn geomspace(start: f32, end: f32, num: usize) -> Vec<f32> {
    match num {
        0 => Vec::new(),
        1 => alloc::vec![start],
        _ => {
            let log_start = logf(start);
            let log_step = (logf(end) - log_start) / (num - 1) as f32;
            let mut out: Vec<f32> = (0..num)
                .map(|i| expf(log_start + i as f32 * log_step))
                .collect();
            out[0] = start;
            out[num - 1] = end;
            out
        }
    }
}

/// Repeat `values` end-to-end `reps` times.
///
/// # Example
/// ```rust
/// use trope_core::tile;
///
/// assert_eq!(tile(&[1, 2], 3), vec![1, 2, 1, 2, 1, 2]);
/// ```
pub fn tile<T: Clone>(values: &[T], reps: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len() * reps);
    for _ in 0..reps {
        out.extend_from_slice(values);
    }
    out
}

/// Largest absolute sample value, or `0.0` for an empty buffer.
#[inline]
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Scale `buffer` so its peak absolute value equals `target`.
///
/// A silent buffer (peak of zero) is left untouched and `false` is returned;
/// nothing is ever divided by zero. Each sample is divided by the peak before
/// the target is applied, so for `target == 1.0` the loudest sample becomes
/// exactly `±1.0`.
///
/// # Example
/// ```rust
/// use trope_core::normalize_to_peak;
///
/// let mut buf = vec![0.25, -0.5, 0.1];
/// assert!(normalize_to_peak(&mut buf, 1.0));
/// assert_eq!(buf[1], -1.0);
///
/// let mut silent = vec![0.0; 8];
/// assert!(!normalize_to_peak(&mut silent, 1.0));
/// ```
pub fn normalize_to_peak(buffer: &mut [f32], target: f32) -> bool {
    let p = peak(buffer);
    if p == 0.0 || !p.is_finite() {
        return false;
    }
    for sample in buffer.iter_mut() {
        *sample = *sample / p * target;
    }
    true
}

/// Resample a control curve to `out_len` points by linear interpolation.
///
/// The first and last input values map onto the first and last output
/// positions. An empty input yields zeros.
///
/// # Example
/// ```rust
/// use trope_core::resample_linear;
///
/// assert_eq!(resample_linear(&[0.0, 1.0], 3), vec![0.0, 0.5, 1.0]);
/// ```
pub fn resample_linear(signal: &[f32], out_len: usize) -> Vec<f32> {
    if signal.is_empty() {
        return alloc::vec![0.0; out_len];
    }
    if out_len == 0 {
        return Vec::new();
    }
    if out_len == 1 || signal.len() == 1 {
        return alloc::vec![signal[0]; out_len];
    }

    let scale = (signal.len() - 1) as f32 / (out_len - 1) as f32;
    let last = signal.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f32 * scale;
            let idx = (floorf(pos) as usize).min(last);
            let frac = pos - idx as f32;
            if idx == last {
                signal[last]
            } else {
                signal[idx] + (signal[idx + 1] - signal[idx]) * frac
            }
        })
        .collect()
}

/// Convert milliseconds to a whole number of samples, truncating.
///
/// # Example
/// ```rust
/// use trope_core::ms_to_samples;
///
/// assert_eq!(ms_to_samples(100.0, 44100.0), 4410);
/// ```
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    (sample_rate * (ms / 1000.0)).max(0.0) as usize
}
