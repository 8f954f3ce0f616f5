//! Notes and the refrain grid.
//!
//! A [`Refrain`] is a rectangular grid of [`Note`]s: rows are simultaneous
//! voices (the tones of a chord), columns are sequential time slots.

use alloc::vec::Vec;
use trope_core::{Result, SynthError, tile};

/// One cell of a refrain: a pitch in Hz, or silence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Note {
    /// Silence for the length of the slot.
    #[default]
    Rest,
    /// A pitched tone at this frequency in Hz.
    Pitch(f32),
}

impl Note {
    /// Frequency in Hz, `0.0` for a rest.
    #[inline]
    pub fn frequency(self) -> f32 {
        match self {
            Note::Rest => 0.0,
            Note::Pitch(hz) => hz,
        }
    }

    /// Returns `true` for a rest.
    #[inline]
    pub fn is_rest(self) -> bool {
        matches!(self, Note::Rest)
    }

    /// Multiply the pitch by a harmonic ratio. Rests stay rests.
    #[inline]
    pub fn scaled(self, ratio: f32) -> Note {
        match self {
            Note::Rest => Note::Rest,
            Note::Pitch(hz) => Note::from(hz * ratio),
        }
    }

    /// Reject negative and non-finite pitches.
    pub fn validate(self) -> Result<()> {
        match self {
            Note::Rest => Ok(()),
            Note::Pitch(hz) if hz.is_finite() && hz > 0.0 => Ok(()),
            Note::Pitch(hz) => Err(SynthError::InvalidFrequency(hz)),
        }
    }
}

impl From<f32> for Note {
    /// `0.0` is a rest; anything else is a pitch (and may fail validation).
    fn from(hz: f32) -> Self {
        if hz == 0.0 { Note::Rest } else { Note::Pitch(hz) }
    }
}

impl From<Option<f32>> for Note {
    fn from(hz: Option<f32>) -> Self {
        hz.map_or(Note::Rest, Note::from)
    }
}

/// Rectangular grid of notes, voices × time slots.
///
/// # Example
///
/// ```rust
/// use trope_synth::{Note, Refrain};
///
/// // A two-note melody over a held bass, with a rest in the middle voice.
/// let refrain = Refrain::from_frequencies(vec![
///     vec![440.0, 880.0],
///     vec![0.0, 660.0],
///     vec![110.0, 110.0],
/// ])
/// .unwrap();
///
/// assert_eq!(refrain.voice_count(), 3);
/// assert_eq!(refrain.slot_count(), 2);
/// assert_eq!(refrain.get(1, 0), Some(Note::Rest));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Refrain {
    voices: Vec<Vec<Note>>,
    slots: usize,
}

impl Refrain {
    /// Build a refrain from note rows.
    ///
    /// Fails if there are no rows, no slots, or rows of unequal length.
    pub fn new(voices: Vec<Vec<Note>>) -> Result<Self> {
        let slots = voices.first().map_or(0, Vec::len);
        if slots == 0 {
            return Err(SynthError::EmptyRefrain);
        }
        for (row, voice) in voices.iter().enumerate() {
            if voice.len() != slots {
                return Err(SynthError::RaggedRefrain {
                    row,
                    expected: slots,
                    found: voice.len(),
                });
            }
        }
        Ok(Self { voices, slots })
    }

    /// Build a refrain from frequency rows, where `0.0` marks a rest.
    pub fn from_frequencies(rows: Vec<Vec<f32>>) -> Result<Self> {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Note::from).collect())
                .collect(),
        )
    }

    /// A single-voice refrain.
    pub fn melody(frequencies: &[f32]) -> Result<Self> {
        Self::new(alloc::vec![frequencies.iter().copied().map(Note::from).collect()])
    }

    /// Number of simultaneous voices (rows).
    #[inline]
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of time slots (columns).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Note at `(voice, slot)`.
    pub fn get(&self, voice: usize, slot: usize) -> Option<Note> {
        self.voices.get(voice).and_then(|v| v.get(slot)).copied()
    }

    /// Repeat every voice's slots end-to-end `reps` times.
    pub fn tile_slots(&self, reps: usize) -> Refrain {
        Refrain {
            voices: self.voices.iter().map(|v| tile(v, reps)).collect(),
            slots: self.slots * reps,
        }
    }

    /// Check every note for a valid pitch.
    pub fn validate(&self) -> Result<()> {
        self.voices.iter().flatten().try_for_each(|n| n.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn zero_is_rest() {
        assert_eq!(Note::from(0.0), Note::Rest);
        assert_eq!(Note::from(None), Note::Rest);
        assert_eq!(Note::from(Some(220.0)), Note::Pitch(220.0));
    }

    #[test]
    fn negative_pitch_rejected() {
        assert_eq!(
            Note::from(-1.0).validate(),
            Err(SynthError::InvalidFrequency(-1.0))
        );
        assert!(Note::Pitch(f32::NAN).validate().is_err());
        assert!(Note::Rest.validate().is_ok());
    }

    #[test]
    fn scaled_keeps_rests() {
        assert_eq!(Note::Rest.scaled(2.0), Note::Rest);
        assert_eq!(Note::Pitch(220.0).scaled(2.0), Note::Pitch(440.0));
    }

    #[test]
    fn empty_refrain_rejected() {
        assert_eq!(Refrain::new(vec![]), Err(SynthError::EmptyRefrain));
        assert_eq!(Refrain::new(vec![vec![]]), Err(SynthError::EmptyRefrain));
    }

    #[test]
    fn ragged_refrain_rejected() {
        let err = Refrain::from_frequencies(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            SynthError::RaggedRefrain {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn tile_slots_repeats_rows() {
        let r = Refrain::from_frequencies(vec![vec![1.0, 2.0], vec![3.0, 0.0]]).unwrap();
        let t = r.tile_slots(3);
        assert_eq!(t.slot_count(), 6);
        assert_eq!(t.voice_count(), 2);
        assert_eq!(t.get(0, 4), Some(Note::Pitch(1.0)));
        assert_eq!(t.get(1, 5), Some(Note::Rest));
    }
}
