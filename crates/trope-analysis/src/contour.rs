//! Amplitude contours of reference recordings
//!
//! A contour is the rectified signal, smoothed with a first-order
//! Savitzky–Golay filter and scaled so its peak is 1.0. It is the input of
//! [`Envelope::from_reference`].

use trope_core::{Result, normalize_to_peak};
use trope_synth::Envelope;

/// Default smoothing window in samples.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 511;

/// First-order Savitzky–Golay smoothing.
///
/// Interior samples are the mean of a centred window of `window` samples
/// (the value a least-squares line takes at its centre). The first and last
/// half-windows are evaluated on a line fitted to the edge window.
///
/// `window` is forced odd and shrunk to fit the signal; windows below 3
/// return the input unchanged.
pub fn savgol_smooth(signal: &[f32], window: usize) -> Vec<f32> {
    let window = fit_window(window, signal.len());
    if window < 3 {
        return signal.to_vec();
    }
    let half = window / 2;
    let n = signal.len();
    let mut out = vec![0.0f32; n];

    let mut sum: f64 = signal[..window].iter().map(|&x| f64::from(x)).sum();
    for centre in half..n - half {
        if centre > half {
            sum += f64::from(signal[centre + half]) - f64::from(signal[centre - half - 1]);
        }
        out[centre] = (sum / window as f64) as f32;
    }

    let (a, b) = line_fit(&signal[..window]);
    for (i, o) in out[..half].iter_mut().enumerate() {
        *o = (a + b * i as f64) as f32;
    }
    let (a, b) = line_fit(&signal[n - window..]);
    for (i, o) in out[n - half..].iter_mut().enumerate() {
        *o = (a + b * (window - half + i) as f64) as f32;
    }
    out
}

/// Largest odd window no longer than `requested` or `len`.
fn fit_window(requested: usize, len: usize) -> usize {
    let w = requested.min(len);
    if w % 2 == 0 { w.saturating_sub(1) } else { w }
}

/// Least-squares line `a + b·x` through `(i, y[i])`.
fn line_fit(y: &[f32]) -> (f64, f64) {
    let n = y.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = y.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, &v) in y.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (f64::from(v) - mean_y);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    (mean_y - slope * mean_x, slope)
}

/// Rectify, smooth, clamp at zero and peak-normalize a recording.
///
/// A silent recording gives an all-zero contour of the same length.
pub fn amplitude_contour(signal: &[f32], window: usize) -> Vec<f32> {
    let rectified: Vec<f32> = signal.iter().map(|x| x.abs()).collect();
    let mut contour = savgol_smooth(&rectified, window);
    for v in contour.iter_mut() {
        *v = v.max(0.0);
    }
    normalize_to_peak(&mut contour, 1.0);
    contour
}

/// Build a reference envelope from a recording at `sample_rate`.
///
/// ```rust
/// use trope_analysis::contour::reference_envelope;
///
/// let swell: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.3).sin() * i as f32 / 4410.0).collect();
/// let env = reference_envelope(&swell, 44100.0).unwrap();
/// assert_eq!(env.shape(1000).len(), 1000);
/// ```
pub fn reference_envelope(signal: &[f32], sample_rate: f32) -> Result<Envelope> {
    let contour = amplitude_contour(signal, DEFAULT_SMOOTHING_WINDOW);
    Envelope::from_reference(contour, sample_rate)
}
