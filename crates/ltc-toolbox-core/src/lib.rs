//! This crate synthesizes [SMPTE 12M](https://en.wikipedia.org/wiki/SMPTE_timecode) linear
//! timecode (LTC) audio signals and serializes them as monaural PCM WAVE files.
//!
//! LTC encodes a running timecode (hours, minutes, seconds, frames) as an audio-band
//! bi-phase-mark-modulated square wave that professional video and audio equipment can decode
//! to recover frame-accurate timing.
//!
//! The synthesis pipeline, in data-flow order:
//! - [`rate::FrameRate`]: the closed set of recognized frame rates,
//! - [`timecode::Timecode`]: the frame counter, including SMPTE drop-frame counting,
//! - [`codeword::Codeword`]: assembly of the 80-bit LTC word for one frame,
//! - [`modulator::Modulator`]: the bi-phase mark modulator producing the audio waveform,
//! - [`wave`]: quantization and RIFF/WAVE emission,
//! - [`generate`]: the configuration type and the single-pass driver tying it all together.
//!
//! Relevant standards:
//!
//! - IEC 60461:2010 (entire standard) - Time and control code
//! - SMPTE 12M (entire standard) - Time and Control Code

pub mod codeword;
pub mod generate;
pub mod modulator;
pub mod rate;
pub mod timecode;
pub mod wave;

#[cfg(test)]
pub(crate) mod testutil;

pub use generate::{default_output_path, generate, Config, GenerateError, SUPPORTED_SAMPLE_RATES};
pub use rate::FrameRate;
pub use timecode::Timecode;
pub use wave::BitDepth;
