//! Timbre extraction from a reference recording
//!
//! The strongest spectral peaks of a recording become the partials of a
//! [`Timbre`]: ratios are taken against the lowest picked peak, amplitudes
//! against the strongest.

use crate::fft::Window;
use crate::spectrum::{find_peaks, magnitude_spectrum};
use trope_core::{Result, SynthError};
use trope_synth::Timbre;

/// Peak-picking timbre extractor
#[derive(Debug, Clone, PartialEq)]
pub struct TimbreExtractor {
    /// Number of partials to keep
    pub max_partials: usize,
    /// Peak threshold relative to the strongest bin, in dB
    pub threshold_db: f32,
    /// Minimum spacing between picked peaks, in Hz
    pub min_distance_hz: f32,
    /// Analysis window
    pub window: Window,
}

impl Default for TimbreExtractor {
    fn default() -> Self {
        Self {
            max_partials: 8,
            threshold_db: -40.0,
            min_distance_hz: 20.0,
            window: Window::Hann,
        }
    }
}

impl TimbreExtractor {
    /// Extractor keeping up to `max_partials` peaks, other settings default.
    pub fn new(max_partials: usize) -> Self {
        Self {
            max_partials,
            ..Self::default()
        }
    }

    /// Set the peak threshold in dB.
    pub fn with_threshold_db(mut self, threshold_db: f32) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Set the minimum peak spacing in Hz.
    pub fn with_min_distance_hz(mut self, min_distance_hz: f32) -> Self {
        self.min_distance_hz = min_distance_hz;
        self
    }

    /// Set the analysis window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Extract a timbre from `signal` recorded at `sample_rate`.
    ///
    /// The whole signal is analysed in one frame, zero-padded to the next
    /// power of two. Returns [`SynthError::EmptyTimbre`] for silence or when
    /// no peak clears the threshold.
    pub fn extract(&self, signal: &[f32], sample_rate: f32) -> Result<Timbre> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        if signal.is_empty() || self.max_partials == 0 {
            return Err(SynthError::EmptyTimbre);
        }

        let fft_size = signal.len().next_power_of_two().max(4);
        let spectrum = magnitude_spectrum(signal, fft_size, self.window);
        let mut peaks = find_peaks(
            &spectrum,
            sample_rate,
            self.threshold_db,
            self.min_distance_hz,
        );
        peaks.retain(|p| p.frequency > 0.0);
        peaks.truncate(self.max_partials);
        if peaks.is_empty() {
            return Err(SynthError::EmptyTimbre);
        }

        let strongest = peaks[0].magnitude;
        peaks.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        let lowest = peaks[0].frequency;

        let pairs: Vec<(f32, f32)> = peaks
            .iter()
            .map(|p| (p.frequency / lowest, p.magnitude / strongest))
            .collect();
        Timbre::from_pairs(&pairs)
    }
}

/// Extract a timbre with default settings.
pub fn extract_timbre(signal: &[f32], sample_rate: f32, max_partials: usize) -> Result<Timbre> {
    TimbreExtractor::new(max_partials).extract(signal, sample_rate)
}
