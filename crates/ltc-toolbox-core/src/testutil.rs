//! Helpers shared by the test modules.

use crate::{codeword::CODEWORD_BITS, timecode::Timecode};

/// Shorthand constructor for timecode literals in test case tables.
pub(crate) fn tc(hour: u8, minute: u8, second: u8, frame: u8) -> Timecode {
    Timecode { hour, minute, second, frame }
}

/// Parse whitespace-separated hex bytes, as written in binary fixture strings.
pub(crate) fn from_hex(hex: &str) -> Vec<u8> {
    data_encoding::HEXUPPER_PERMISSIVE.decode(hex.replace(' ', "").as_bytes()).unwrap()
}

/// Recover the codeword bits from one frame of bi-phase mark audio.
///
/// `prev_level` is the signal level immediately before the frame's first sample (the modulator's
/// initial +1.0 for the first frame of a run, or the last sample of the previous frame).  A bit
/// is one exactly when the level changes at the cell boundary.  Only exact cell lengths are
/// supported; callers must pick sample rates where `samples.len()` is a multiple of 80.
pub(crate) fn demodulate_frame(samples: &[f32], prev_level: f32) -> u128 {
    assert_eq!(samples.len() % CODEWORD_BITS, 0, "frame length must be a whole number of cells");
    let cell = samples.len() / CODEWORD_BITS;
    let mut word = 0u128;
    let mut last = prev_level;
    for index in 0..CODEWORD_BITS {
        let first = samples[index * cell];
        if first != last {
            word |= 1 << index;
        }
        last = samples[index * cell + cell - 1];
    }
    word
}

/// Count the level transitions in `samples`, including a possible transition from `prev_level`
/// into the first sample.
pub(crate) fn count_transitions(samples: &[f32], prev_level: f32) -> usize {
    let mut transitions = 0;
    let mut last = prev_level;
    for &sample in samples {
        if sample != last {
            transitions += 1;
        }
        last = sample;
    }
    transitions
}
