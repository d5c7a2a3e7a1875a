//! Bi-phase mark modulation of codewords into an audio-band square wave.

use num::rational::Ratio;

use crate::{
    codeword::{Codeword, CODEWORD_BITS},
    rate::FrameRate,
};


/// Converts 80-bit codewords into a two-level audio waveform.
///
/// Each frame is divided into 80 equal bit cells.  Every cell carries a level transition at its
/// midpoint (the clock); a cell whose data bit is one carries an additional transition at its
/// start.  A zero bit therefore produces one transition per cell and a one bit produces two,
/// which makes the waveform DC-balanced, self-clocking, and independent of tape direction.
///
/// The signal level is owned by the modulator and persists across frames: it starts at +1.0 and
/// is never reset, so consecutive frames join with no phase discontinuity.
#[derive(Debug)]
pub struct Modulator {
    level: f32,
    samples_per_frame: usize,
    cell: usize,
}

impl Modulator {
    /// Create a modulator for the given sample rate and frame rate.
    ///
    /// # Panics
    ///
    /// Panics if a bit cell would span fewer than two samples, since the mid-cell clock
    /// transition is undefined below that.  Every combination of a supported sample rate and a
    /// recognized frame rate yields cells of at least `floor(44100 / 60) / 80 = 9` samples.
    pub fn new(sample_rate: u32, rate: FrameRate) -> Modulator {
        let samples_per_frame = samples_per_frame(sample_rate, rate);
        let cell = samples_per_frame / CODEWORD_BITS;
        assert!(
            cell >= 2,
            "a bit cell of {cell} samples cannot carry the mid-cell clock transition"
        );
        Modulator { level: 1.0, samples_per_frame, cell }
    }

    /// Modulate one codeword into `out`, which must hold exactly one frame of samples.
    ///
    /// Any samples left over after the 80 bit cells trail at the final level; the resulting
    /// sub-sample jitter is absorbed across frames.
    pub fn write_frame(&mut self, word: Codeword, out: &mut [f32]) {
        assert_eq!(out.len(), self.samples_per_frame, "output slice must hold one frame");
        let half = self.cell / 2;
        let mut position = 0;
        for index in 0..CODEWORD_BITS {
            if word.bit(index) {
                self.level = -self.level;
            }
            for sample in &mut out[position..position + half] {
                *sample = self.level;
            }
            self.level = -self.level;
            for sample in &mut out[position + half..position + self.cell] {
                *sample = self.level;
            }
            position += self.cell;
        }
        for sample in &mut out[position..] {
            *sample = self.level;
        }
    }
}

/// The exact number of samples spanned by one frame: `floor(sample_rate / fps)`.
pub fn samples_per_frame(sample_rate: u32, rate: FrameRate) -> usize {
    let fps = rate.exact_fps();
    let frames = Ratio::new(
        u64::from(sample_rate) * u64::from(*fps.denom()),
        u64::from(*fps.numer()),
    );
    frames.to_integer() as usize
}
