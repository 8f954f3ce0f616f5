//! Render pipeline for configured performers.
//!
//! A [`Performer`] renders its refrain, loops it, runs it through its echo
//! stack and normalizes the result. A [`Performance`] mixes several performers
//! that share a sample rate.

use trope_analysis::Levels;
use trope_core::{normalize_to_peak, tile};
use trope_effects::Delay;
use trope_synth::{Refrain, Synthesis};

use crate::error::ConfigError;
use crate::performer_config::PerformerConfig;
use crate::validation::ValidationError;

/// A validated performer, ready to render.
///
/// # Example
///
/// ```rust
/// use trope_config::{Performer, get_factory_preset};
///
/// let performer = Performer::new(get_factory_preset("init").unwrap()).unwrap();
/// let audio = performer.render().unwrap();
/// assert!(audio.iter().all(|s| s.abs() <= 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Performer {
    config: PerformerConfig,
    refrain: Refrain,
    synthesis: Synthesis,
    delay: Option<Delay>,
}

impl Performer {
    /// Validate `config` and build its runtime pieces.
    pub fn new(config: PerformerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let refrain = config.to_refrain()?;
        let mut synthesis =
            Synthesis::new(config.sample_rate_hz())?.with_envelope(config.to_envelope()?);
        if let Some(timbre) = config.to_timbre()? {
            synthesis = synthesis.with_timbre(timbre);
        }
        let delay = config.to_delay()?;

        Ok(Self {
            config,
            refrain,
            synthesis,
            delay,
        })
    }

    /// Performer name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// The configuration this performer was built from.
    pub fn config(&self) -> &PerformerConfig {
        &self.config
    }

    /// Render, loop, delay and normalize to a peak of 1.0.
    pub fn render(&self) -> Result<Vec<f32>, ConfigError> {
        let rendered = self.synthesis.render(&self.refrain, &self.config.durations)?;
        let looped = tile(&rendered.mono, self.config.loop_count as usize);

        let mut out = match &self.delay {
            Some(delay) => delay.apply(&looped)?.sum_rows(),
            None => looped,
        };
        normalize_to_peak(&mut out, 1.0);

        let levels = Levels::measure(&out);
        tracing::info!(
            performer = %self.config.name,
            rows = rendered.matrix.rows(),
            samples = out.len(),
            loop_count = self.config.loop_count,
            delay = self.delay.is_some(),
            rms_db = levels.rms_db(),
            "performer rendered"
        );
        Ok(out)
    }
}

/// Several performers mixed into one buffer.
#[derive(Debug, Clone, Default)]
pub struct Performance {
    performers: Vec<Performer>,
}

impl Performance {
    /// Create an empty performance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build performers from configs; all must share one sample rate.
    pub fn from_configs(
        configs: impl IntoIterator<Item = PerformerConfig>,
    ) -> Result<Self, ConfigError> {
        let mut performance = Self::new();
        for config in configs {
            performance.push(Performer::new(config)?)?;
        }
        Ok(performance)
    }

    /// Add a performer.
    pub fn push(&mut self, performer: Performer) -> Result<(), ConfigError> {
        if let Some(first) = self.performers.first()
            && first.sample_rate() != performer.sample_rate()
        {
            return Err(ValidationError::Invalid {
                field: format!("{}.sample_rate", performer.name()),
                reason: format!(
                    "{} Hz does not match the performance rate of {} Hz",
                    performer.sample_rate(),
                    first.sample_rate()
                ),
            }
            .into());
        }
        self.performers.push(performer);
        Ok(())
    }

    /// The performers in order.
    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    /// Number of performers.
    pub fn len(&self) -> usize {
        self.performers.len()
    }

    /// True when there are no performers.
    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
    }

    /// Shared sample rate, if any performer is present.
    pub fn sample_rate(&self) -> Option<u32> {
        self.performers.first().map(Performer::sample_rate)
    }

    /// Render every performer, cut all to the shortest, normalize each, sum,
    /// and normalize the mix.
    pub fn render(&self) -> Result<Vec<f32>, ConfigError> {
        if self.performers.is_empty() {
            return Err(ValidationError::Empty("performers".to_string()).into());
        }

        let parts = self
            .performers
            .iter()
            .map(Performer::render)
            .collect::<Result<Vec<_>, _>>()?;
        let shortest = parts.iter().map(Vec::len).min().unwrap_or(0);

        let mut mix = vec![0.0f32; shortest];
        for mut part in parts {
            part.truncate(shortest);
            normalize_to_peak(&mut part, 1.0);
            for (acc, s) in mix.iter_mut().zip(&part) {
                *acc += s;
            }
        }
        normalize_to_peak(&mut mix, 1.0);

        tracing::info!(performers = self.performers.len(), samples = shortest, "performance mixed");
        Ok(mix)
    }
}
