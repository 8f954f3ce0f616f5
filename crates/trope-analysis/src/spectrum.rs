//! Magnitude spectra and peak picking

use crate::fft::{Fft, Window};

/// Compute magnitude spectrum from time-domain signal
///
/// The signal is windowed over its own length and zero-padded to `fft_size`.
pub fn magnitude_spectrum(signal: &[f32], fft_size: usize, window: Window) -> Vec<f32> {
    let fft = Fft::new(fft_size);

    let mut windowed: Vec<f32> = signal.iter().take(fft_size).copied().collect();
    window.apply(&mut windowed);

    fft.forward(&windowed).iter().map(|c| c.norm()).collect()
}

/// Width of one bin in Hz for a spectrum of `bins` points (DC to Nyquist).
pub fn bin_width(bins: usize, sample_rate: f32) -> f32 {
    let fft_size = (bins.max(2) - 1) * 2;
    sample_rate / fft_size as f32
}

/// A local maximum of a magnitude spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Interpolated frequency in Hz
    pub frequency: f32,
    /// Magnitude at the peak bin
    pub magnitude: f32,
}

/// Find peak frequencies in spectrum
///
/// Local maxima above `threshold_db` (relative to the strongest bin) are taken
/// strongest first; a peak closer than `min_distance_hz` to one already taken
/// is dropped. Frequencies are refined by parabolic interpolation over the
/// neighbouring bins. Results are sorted by magnitude, descending.
pub fn find_peaks(
    spectrum: &[f32],
    sample_rate: f32,
    threshold_db: f32,
    min_distance_hz: f32,
) -> Vec<SpectralPeak> {
    if spectrum.len() < 3 {
        return Vec::new();
    }
    let width = bin_width(spectrum.len(), sample_rate);
    let strongest = spectrum.iter().copied().fold(0.0f32, f32::max);
    if strongest <= 0.0 {
        return Vec::new();
    }
    let threshold = strongest * 10.0_f32.powf(threshold_db / 20.0);

    let mut candidates: Vec<SpectralPeak> = (1..spectrum.len() - 1)
        .filter(|&i| {
            let mag = spectrum[i];
            mag >= threshold && mag > spectrum[i - 1] && mag >= spectrum[i + 1]
        })
        .map(|i| {
            let (a, b, c) = (spectrum[i - 1], spectrum[i], spectrum[i + 1]);
            let denom = a - 2.0 * b + c;
            let offset = if denom.abs() > f32::EPSILON {
                (0.5 * (a - c) / denom).clamp(-0.5, 0.5)
            } else {
                0.0
            };
            SpectralPeak {
                frequency: (i as f32 + offset) * width,
                magnitude: b,
            }
        })
        .collect();

    candidates.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));

    let mut peaks: Vec<SpectralPeak> = Vec::new();
    for candidate in candidates {
        let too_close = peaks
            .iter()
            .any(|p| (p.frequency - candidate.frequency).abs() < min_distance_hz);
        if !too_close {
            peaks.push(candidate);
        }
    }
    peaks
}
