//! Trope Analysis - reading timbres and contours off reference recordings
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrum`] - Magnitude spectra and peak picking
//! - [`timbre`] - Harmonic timbre extraction
//! - [`contour`] - Smoothed amplitude contours for reference envelopes
//! - [`dynamics`] - RMS, peak and crest factor of rendered buffers
//!
//! ## Example Workflow
//!
//! ```rust
//! use trope_analysis::{TimbreExtractor, reference_envelope};
//! use trope_synth::{Refrain, Synthesis};
//!
//! // A recorded note (here: a decaying two-partial tone)
//! let sr = 44100.0;
//! let recording: Vec<f32> = (0..8192)
//!     .map(|i| {
//!         let t = i as f32 / sr;
//!         let decay = (-3.0 * t).exp();
//!         decay * ((2.0 * std::f32::consts::PI * 330.0 * t).sin()
//!             + 0.4 * (2.0 * std::f32::consts::PI * 660.0 * t).sin())
//!     })
//!     .collect();
//!
//! let timbre = TimbreExtractor::new(4).extract(&recording, sr).unwrap();
//! let envelope = reference_envelope(&recording, sr).unwrap();
//!
//! let synth = Synthesis::new(sr).unwrap().with_timbre(timbre).with_envelope(envelope);
//! let out = synth.render(&Refrain::melody(&[220.0, 0.0, 440.0]).unwrap(), &[0.25]).unwrap();
//! assert!(out.mono.iter().all(|s| s.abs() <= 1.0));
//! ```

pub mod contour;
pub mod dynamics;
pub mod fft;
pub mod spectrum;
pub mod timbre;

pub use contour::{DEFAULT_SMOOTHING_WINDOW, amplitude_contour, reference_envelope, savgol_smooth};
pub use dynamics::{Levels, crest_factor, peak_db, rms, rms_db, rms_envelope};
pub use fft::{Fft, Window};
pub use spectrum::{SpectralPeak, bin_width, find_peaks, magnitude_spectrum};
pub use timbre::{TimbreExtractor, extract_timbre};
