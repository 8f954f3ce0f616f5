//! Trope Synth - offline score-to-buffer synthesis
//!
//! This crate turns a refrain (a grid of frequencies, voices × time slots) and
//! its slot durations into sample-accurate audio. Every tone is cut on a
//! half-cycle boundary, shaped by an envelope fitted to its exact length, and
//! laid into a single pre-sized sample matrix.
//!
//! # Core Components
//!
//! ## Score
//!
//! - [`Note`] - A pitch in Hz, or a rest
//! - [`Refrain`] - Rectangular grid of notes
//! - [`Timbre`] / [`Partial`] - Harmonic ratios and amplitudes layered onto each note
//!
//! ## Tones
//!
//! - [`duration_to_samples`] - Zero-crossing quantization of a duration
//! - [`ToneGenerator`] - Sine segments, centre-padded to a slot width
//!
//! ```rust
//! use trope_synth::{Note, ToneGenerator};
//!
//! let tones = ToneGenerator::new(44100.0).unwrap();
//! let len = tones.quantize(Note::Pitch(440.0), 0.5).unwrap();
//! let tone = tones.generate(Note::Pitch(440.0), len, 1.0, None).unwrap();
//! assert_eq!(tone.len(), len);
//! ```
//!
//! ## Envelopes
//!
//! - [`Envelope`] - Parametric (table-driven ADSR) or from a reference contour
//! - [`EnvelopeFit`] - Which stages a tone of a given length receives
//! - [`TimeScale`] - Geometric or linear stage time tables
//!
//! ## Rendering
//!
//! - [`Synthesis`] - Sizes ([`Layout`]) and renders ([`Rendered`]) refrains
//! - [`render`] - One-call convenience wrapper
//!
//! # Features
//!
//! - `std` (default) - Standard library support
//! - `parallel` - Fill matrix rows on the rayon thread pool
//! - `tracing` - Emit `tracing` events for layout and render summaries
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! trope-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example: A Chord With Overtones
//!
//! ```rust
//! use trope_synth::{Envelope, Refrain, Synthesis, Timbre};
//!
//! let refrain = Refrain::from_frequencies(vec![
//!     vec![261.63, 293.66],
//!     vec![329.63, 0.0],
//! ])
//! .unwrap();
//!
//! let synth = Synthesis::new(44100.0)
//!     .unwrap()
//!     .with_timbre(Timbre::from_pairs(&[(1.0, 1.0), (2.0, 0.3), (3.0, 0.1)]).unwrap())
//!     .with_envelope(Envelope::parametric(5, 10, 40, 20, 44100.0).unwrap());
//!
//! let out = synth.render(&refrain, &[0.5, 0.25]).unwrap();
//!
//! assert_eq!(out.matrix.rows(), 6);
//! assert_eq!(out.matrix.cols(), out.layout.slot_widths().iter().sum::<usize>());
//! assert!(out.mono.iter().all(|s| s.abs() <= 1.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod envelope;
pub mod note;
pub mod synthesis;
pub mod timbre;
pub mod tone;

pub use envelope::{Envelope, EnvelopeFit, Parametric, Reference, StageSettings, TimeScale};
pub use note::{Note, Refrain};
pub use synthesis::{Layout, Rendered, Synthesis, render};
pub use timbre::{Partial, Timbre};
pub use tone::{ToneGenerator, duration_to_samples};

// Re-export the shared buffer and error types
pub use trope_core::{Result, SampleMatrix, SynthError};
