//! Refrain renderer: lays every voice and partial into one sample matrix.
//!
//! Rendering runs in two passes. The first ([`Synthesis::layout`]) reconciles
//! the refrain with its durations, expands voices by the timbre, quantizes
//! every cell and fixes each slot's width and start offset. Nothing is
//! allocated for audio until that pass has finished. The second fills the
//! matrix row by row; rows never overlap, so with the `parallel` feature they
//! are filled on the rayon thread pool with the layout shared read-only.
//!
//! # Example
//!
//! ```rust
//! use trope_synth::{Refrain, Synthesis, Timbre};
//!
//! let synth = Synthesis::new(44100.0)
//!     .unwrap()
//!     .with_timbre(Timbre::from_pairs(&[(1.0, 1.0), (2.0, 0.5)]).unwrap());
//!
//! let refrain = Refrain::melody(&[220.0, 0.0, 330.0]).unwrap();
//! let out = synth.render(&refrain, &[0.25]).unwrap();
//!
//! // Durations were tiled to three slots; each voice became two rows.
//! assert_eq!(out.layout.slot_count(), 3);
//! assert_eq!(out.matrix.rows(), 2);
//! assert_eq!(out.mono.len(), out.layout.total_samples());
//! ```

use alloc::vec;
use alloc::vec::Vec;
use trope_core::{Result, SampleMatrix, SynthError, normalize_to_peak, tile};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::envelope::Envelope;
use crate::note::{Note, Refrain};
use crate::timbre::{Partial, Timbre};
use crate::tone::ToneGenerator;

/// Sizing of a render, computed before any audio is allocated.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    refrain: Refrain,
    durations: Vec<f32>,
    partials: Vec<Partial>,
    cell_samples: Vec<usize>,
    slot_widths: Vec<usize>,
    boundaries: Vec<usize>,
    total_samples: usize,
}

impl Layout {
    /// Voices in the (tiled) refrain, before timbre expansion.
    pub fn voice_count(&self) -> usize {
        self.refrain.voice_count()
    }

    /// Partials per voice; `1` without a timbre.
    pub fn partial_count(&self) -> usize {
        self.partials.len()
    }

    /// Rows of the sample matrix: voices × partials.
    pub fn row_count(&self) -> usize {
        self.voice_count() * self.partial_count()
    }

    /// Time slots after reconciling refrain and durations.
    pub fn slot_count(&self) -> usize {
        self.slot_widths.len()
    }

    /// The refrain after tiling.
    pub fn refrain(&self) -> &Refrain {
        &self.refrain
    }

    /// Per-slot durations in seconds, after tiling.
    pub fn durations(&self) -> &[f32] {
        &self.durations
    }

    /// Width of each slot in samples.
    pub fn slot_widths(&self) -> &[usize] {
        &self.slot_widths
    }

    /// Start offset of each slot in samples.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Total rendered length in samples; the sum of all slot widths.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Partial that produced `row`.
    pub fn partial(&self, row: usize) -> Partial {
        self.partials[row % self.partials.len()]
    }

    /// Note sounded by `row` in `slot`, with the partial ratio applied.
    pub fn note(&self, row: usize, slot: usize) -> Note {
        let voice = row / self.partials.len();
        self.refrain
            .get(voice, slot)
            .unwrap_or_default()
            .scaled(self.partial(row).ratio)
    }

    /// Quantized tone length of one cell, before centring in its slot.
    pub fn cell_samples(&self, row: usize, slot: usize) -> usize {
        self.cell_samples[row * self.slot_count() + slot]
    }
}

/// A finished render.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// One row per voice and partial, each row normalized to its partial's
    /// amplitude.
    pub matrix: SampleMatrix,
    /// All rows summed, peak-normalized to `1.0` (silent renders stay zero).
    pub mono: Vec<f32>,
    /// Sizing the matrix was built from.
    pub layout: Layout,
}

/// Renders refrains at a fixed sample rate, timbre and envelope.
#[derive(Clone, Debug)]
pub struct Synthesis {
    tones: ToneGenerator,
    timbre: Option<Timbre>,
    envelope: Envelope,
}

impl Synthesis {
    /// A renderer with no timbre and the base envelope.
    pub fn new(sample_rate: f32) -> Result<Self> {
        Ok(Self {
            tones: ToneGenerator::new(sample_rate)?,
            timbre: None,
            envelope: Envelope::base(sample_rate)?,
        })
    }

    /// Layer `timbre` onto every note.
    pub fn with_timbre(mut self, timbre: Timbre) -> Self {
        self.timbre = Some(timbre);
        self
    }

    /// Shape every tone with `envelope`.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.tones.sample_rate()
    }

    /// Configured timbre, if any.
    pub fn timbre(&self) -> Option<&Timbre> {
        self.timbre.as_ref()
    }

    /// Configured envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Size a render without producing audio.
    ///
    /// When the refrain's slot count differs from the number of durations,
    /// the refrain is repeated once per duration and the durations once per
    /// original slot, so both end up `slots × durations` long.
    pub fn layout(&self, refrain: &Refrain, durations: &[f32]) -> Result<Layout> {
        if durations.is_empty() {
            return Err(SynthError::EmptyDurations);
        }
        if let Some((index, &value)) = durations
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d < 0.0)
        {
            return Err(SynthError::InvalidDuration { index, value });
        }
        refrain.validate()?;

        let (refrain, durations) = if refrain.slot_count() == durations.len() {
            (refrain.clone(), durations.to_vec())
        } else {
            (
                refrain.tile_slots(durations.len()),
                tile(durations, refrain.slot_count()),
            )
        };

        let partials = match &self.timbre {
            Some(timbre) => timbre.partials().to_vec(),
            None => vec![Partial::new(1.0, 1.0)],
        };

        let slots = durations.len();
        let rows = refrain.voice_count() * partials.len();
        let mut layout = Layout {
            refrain,
            durations,
            partials,
            cell_samples: vec![0; rows * slots],
            slot_widths: vec![0; slots],
            boundaries: vec![0; slots],
            total_samples: 0,
        };

        for row in 0..rows {
            // A silent partial takes no room in its slot.
            if layout.partial(row).amplitude == 0.0 {
                continue;
            }
            for slot in 0..slots {
                let len = self
                    .tones
                    .quantize(layout.note(row, slot), layout.durations[slot])?;
                layout.cell_samples[row * slots + slot] = len;
                layout.slot_widths[slot] = layout.slot_widths[slot].max(len);
            }
        }

        // A slot where nothing sounds still holds its duration as silence.
        let sample_rate = f64::from(self.sample_rate());
        for (width, &seconds) in layout.slot_widths.iter_mut().zip(&layout.durations) {
            if *width == 0 {
                *width = (sample_rate * f64::from(seconds)) as usize;
            }
        }

        let mut offset = 0;
        for (start, &width) in layout.boundaries.iter_mut().zip(&layout.slot_widths) {
            *start = offset;
            offset += width;
        }
        layout.total_samples = offset;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            voices = layout.voice_count(),
            partials = layout.partial_count(),
            slots,
            total_samples = layout.total_samples,
            "synthesis layout"
        );
        #[cfg(feature = "tracing")]
        tracing::trace!(widths = ?layout.slot_widths, "slot widths");

        Ok(layout)
    }

    /// Render `refrain` with per-slot `durations` in seconds.
    pub fn render(&self, refrain: &Refrain, durations: &[f32]) -> Result<Rendered> {
        let layout = self.layout(refrain, durations)?;
        let mut matrix = SampleMatrix::new(layout.row_count(), layout.total_samples());

        if layout.total_samples() > 0 {
            #[cfg(feature = "parallel")]
            matrix
                .as_mut_slice()
                .par_chunks_mut(layout.total_samples())
                .enumerate()
                .try_for_each(|(row, samples)| self.fill_row(&layout, row, samples))?;

            #[cfg(not(feature = "parallel"))]
            for (row, samples) in matrix.rows_mut().enumerate() {
                self.fill_row(&layout, row, samples)?;
            }
        }

        let targets: Vec<f32> = (0..layout.row_count())
            .map(|row| layout.partial(row).amplitude)
            .collect();
        matrix.normalize_rows_to(&targets);

        let mut mono = matrix.sum_rows();
        normalize_to_peak(&mut mono, 1.0);

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = matrix.rows(), samples = mono.len(), "synthesis rendered");

        Ok(Rendered {
            matrix,
            mono,
            layout,
        })
    }

    fn fill_row(&self, layout: &Layout, row: usize, samples: &mut [f32]) -> Result<()> {
        let amplitude = layout.partial(row).amplitude;
        for (slot, (&start, &width)) in layout
            .boundaries()
            .iter()
            .zip(layout.slot_widths())
            .enumerate()
        {
            let segment = &mut samples[start..start + width];
            let note = layout.note(row, slot);
            let len = layout.cell_samples(row, slot);
            self.tones.generate_into(note, len, amplitude, segment)?;
            if len > 0 && !note.is_rest() {
                // the tone sits centred in its slot
                let lead = (width - len) / 2;
                self.envelope.apply(&mut segment[lead..lead + len]);
            }
        }
        Ok(())
    }
}

/// Render in one call with an optional timbre and envelope.
///
/// Without an envelope the base envelope for `sample_rate` is used.
pub fn render(
    refrain: &Refrain,
    durations: &[f32],
    sample_rate: f32,
    timbre: Option<&Timbre>,
    envelope: Option<&Envelope>,
) -> Result<Rendered> {
    let mut synth = Synthesis::new(sample_rate)?;
    if let Some(timbre) = timbre {
        synth = synth.with_timbre(timbre.clone());
    }
    if let Some(envelope) = envelope {
        synth = synth.with_envelope(envelope.clone());
    }
    synth.render(refrain, durations)
}
