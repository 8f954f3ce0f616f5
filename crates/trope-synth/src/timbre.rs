//! Harmonic timbre: which overtones sound above a fundamental, and how loud.

use alloc::vec::Vec;
use trope_core::{Result, SynthError};

/// One harmonic layer of a timbre.
///
/// `ratio` multiplies the fundamental (1.0 is the fundamental itself, 2.0 the
/// octave, 3.0 the twelfth). `amplitude` is the layer's relative peak level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Partial {
    /// Frequency multiplier relative to the written note.
    pub ratio: f32,
    /// Relative peak amplitude, `0.0` silences the layer.
    pub amplitude: f32,
}

impl Partial {
    /// Create a partial.
    pub const fn new(ratio: f32, amplitude: f32) -> Self {
        Self { ratio, amplitude }
    }
}

/// Ordered set of partials layered onto every note.
///
/// Rendering expands each refrain voice into one row per partial, so a
/// three-note chord with a four-partial timbre renders twelve rows.
///
/// # Example
///
/// ```rust
/// use trope_synth::Timbre;
///
/// let timbre = Timbre::from_pairs(&[(1.0, 1.0), (2.0, 0.5)]).unwrap();
/// assert_eq!(timbre.len(), 2);
/// assert_eq!(timbre.partials()[1].amplitude, 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Timbre {
    partials: Vec<Partial>,
}

impl Timbre {
    /// Build a timbre, rejecting an empty list or malformed partials.
    pub fn new(partials: Vec<Partial>) -> Result<Self> {
        if partials.is_empty() {
            return Err(SynthError::EmptyTimbre);
        }
        for (index, p) in partials.iter().enumerate() {
            let ratio_ok = p.ratio.is_finite() && p.ratio > 0.0;
            let amp_ok = p.amplitude.is_finite() && p.amplitude >= 0.0;
            if !ratio_ok || !amp_ok {
                return Err(SynthError::InvalidPartial {
                    index,
                    ratio: p.ratio,
                    amplitude: p.amplitude,
                });
            }
        }
        Ok(Self { partials })
    }

    /// Build a timbre from `(ratio, amplitude)` pairs.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(r, a)| Partial::new(r, a)).collect())
    }

    /// Fundamental only, at full amplitude.
    pub fn fundamental() -> Self {
        Self {
            partials: alloc::vec![Partial::new(1.0, 1.0)],
        }
    }

    /// The partials in order.
    #[inline]
    pub fn partials(&self) -> &[Partial] {
        &self.partials
    }

    /// Number of partials.
    #[inline]
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// Always `false`; a timbre has at least one partial.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Iterate over partials.
    pub fn iter(&self) -> core::slice::Iter<'_, Partial> {
        self.partials.iter()
    }
}

impl Default for Timbre {
    fn default() -> Self {
        Self::fundamental()
    }
}

impl<'a> IntoIterator for &'a Timbre {
    type Item = &'a Partial;
    type IntoIter = core::slice::Iter<'a, Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.partials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_timbre_rejected() {
        assert_eq!(Timbre::new(vec![]), Err(SynthError::EmptyTimbre));
    }

    #[test]
    fn bad_partials_rejected() {
        assert!(Timbre::from_pairs(&[(1.0, 1.0), (0.0, 0.5)]).is_err());
        assert!(Timbre::from_pairs(&[(-2.0, 0.5)]).is_err());
        assert!(Timbre::from_pairs(&[(2.0, -0.5)]).is_err());
        assert!(Timbre::from_pairs(&[(f32::INFINITY, 0.5)]).is_err());
    }

    #[test]
    fn zero_amplitude_allowed() {
        let t = Timbre::from_pairs(&[(1.0, 1.0), (3.0, 0.0)]).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn default_is_fundamental() {
        let t = Timbre::default();
        assert_eq!(t.partials(), &[Partial::new(1.0, 1.0)]);
    }
}
