//! Configuration, presets and the render pipeline for trope performers.
//!
//! A performer is a refrain plus everything needed to turn it into audio:
//! durations, timbre, envelope, loop count and an optional echo stack. This
//! crate stores performers as TOML, validates them, and renders them.
//!
//! # Features
//!
//! - **Performer files**: Load and save [`PerformerConfig`] as TOML; unknown keys are rejected
//! - **Validation**: Every problem in a file is reported at once
//! - **Factory Presets**: Built-in performers and named timbres
//! - **Pipeline**: [`Performer`] and [`Performance`] render configs to normalized buffers
//!
//! # Example
//!
//! ```rust
//! use trope_config::{DelayConfig, EnvelopeConfig, Performer, PerformerConfig};
//!
//! let config = PerformerConfig::new("Motif", vec![vec![392.0, 440.0, 0.0, 523.25]])
//!     .with_durations(vec![0.2, 0.2, 0.2, 0.4])
//!     .with_timbre([(1.0, 1.0), (2.0, 0.25)])
//!     .with_envelope(EnvelopeConfig::parametric(5, 10, 40, 20))
//!     .with_delay(DelayConfig { repeats: 2, time_ms: 150.0, ..DelayConfig::default() })
//!     .with_loop_count(2);
//!
//! let toml = config.to_toml().unwrap();
//! let config = PerformerConfig::from_toml(&toml).unwrap();
//!
//! let audio = Performer::new(config).unwrap().render().unwrap();
//! assert!(audio.iter().all(|s| s.abs() <= 1.0));
//! ```

mod error;
mod performance;
mod performer_config;

/// Performer validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, FACTORY_TIMBRE_NAMES, factory_presets, factory_timbre,
    get_factory_preset, is_factory_preset, is_factory_timbre,
};
pub use performance::{Performance, Performer};
pub use performer_config::{
    DelayConfig, EdgeModeConfig, EnvelopeConfig, PartialConfig, PerformerConfig, TimeScaleConfig,
};
pub use validation::{ValidationError, ValidationResult, validate_performer};
