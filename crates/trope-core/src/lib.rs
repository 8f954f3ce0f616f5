//! Trope Core - buffers, math, and errors shared by the trope synthesis crates
//!
//! This crate holds the pieces every stage of the renderer agrees on: the dense
//! sample matrix that voices are laid into, the small set of array helpers the
//! renderer is built from, and the error taxonomy for malformed input.
//!
//! # Core Abstractions
//!
//! ## Sample Matrix
//!
//! - [`SampleMatrix`] - Row-major `rows × samples` buffer, one row per voice.
//!   Allocated once, written in place, then reduced with [`SampleMatrix::sum_rows`].
//!
//! ## Array Helpers
//!
//! - [`linspace`] / [`geomspace`] - Evenly and geometrically spaced ramps
//! - [`tile`] - Repeat a sequence end-to-end
//! - [`peak`] / [`normalize_to_peak`] - Peak measurement and silent-safe normalization
//! - [`resample_linear`] - Stretch or squeeze a control curve to a target length
//!
//! ## Errors
//!
//! - [`SynthError`] - Every way a render can be rejected up front
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! trope-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use trope_core::{SampleMatrix, linspace};
//!
//! let mut matrix = SampleMatrix::new(2, 4);
//! matrix.write_segment(0, 0, &linspace(0.0, 0.75, 4));
//! matrix.write_segment(1, 2, &[0.5, 0.25]);
//!
//! let mono = matrix.sum_rows();
//! assert_eq!(mono, vec![0.0, 0.25, 1.0, 1.0]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod math;
pub mod matrix;

pub use error::{Result, SynthError};
pub use math::{
    geomspace, linspace, ms_to_samples, normalize_to_peak, peak, resample_linear, tile,
};
pub use matrix::SampleMatrix;
