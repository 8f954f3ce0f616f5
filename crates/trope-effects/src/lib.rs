//! Trope Effects - offline effects for rendered buffers
//!
//! Effects here work on whole buffers after a render has finished, not on a
//! live sample stream:
//!
//! - [`Delay`] - Stack of time-shifted, decaying copies
//! - [`EdgeMode`] - How a shifted copy fills the gap before the buffer start
//!
//! ## Example
//!
//! ```rust
//! use trope_effects::{Delay, EdgeMode};
//!
//! let tone: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.0627).sin()).collect();
//!
//! let stack = Delay::new(44100.0)
//!     .unwrap()
//!     .with_repeats(3)
//!     .with_delay_time_ms(20.0)
//!     .with_decay(0.9, 0.1)
//!     .with_edge_mode(EdgeMode::Mirror)
//!     .apply(&tone)
//!     .unwrap();
//!
//! // The effect never mixes; summing is up to the caller.
//! assert_eq!(stack.shape(), (4, 4410));
//! let mixed = stack.sum_rows();
//! assert_eq!(mixed.len(), 4410);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod delay;

pub use delay::{Delay, EdgeMode};
