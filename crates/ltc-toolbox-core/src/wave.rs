//! Quantization of the synthesized waveform and canonical RIFF/WAVE serialization.

use std::io::{self, Write};

use log::trace;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};


/// Linear PCM sample width of the output file.
///
/// Serialized with [`serde`] as the plain bit count (`16` or `24`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    /// 16-bit signed little-endian samples.
    Pcm16,

    /// 24-bit signed little-endian samples, packed as the low three bytes of the 32-bit
    /// two's complement representation.
    Pcm24,
}

impl BitDepth {
    /// Every supported sample width, in the order a host should present them.
    pub const ALL: [BitDepth; 2] = [BitDepth::Pcm16, BitDepth::Pcm24];

    /// The sample width in bits.
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Pcm16 => 16,
            BitDepth::Pcm24 => 24,
        }
    }

    /// The sample width in bytes.
    pub fn bytes_per_sample(self) -> u32 {
        u32::from(self.bits()) / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = UnsupportedBitDepthError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(BitDepth::Pcm16),
            24 => Ok(BitDepth::Pcm24),
            _ => UnsupportedBitDepthSnafu { bits }.fail(),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> u16 {
        depth.bits()
    }
}

/// Error type for a PCM width other than 16 or 24 bits.
#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("{bits}-bit PCM is not supported; the bit depth must be 16 or 24"))]
pub struct UnsupportedBitDepthError {
    bits: u16,
}

/// Quantize `samples` (floats in `[-1, +1]`) and write a canonical one-channel RIFF/WAVE file.
///
/// The output is a 44-byte header followed by the little-endian integer sample stream.  No
/// metadata chunks are written.  The writer is buffered internally and flushed before
/// returning.
pub fn write_wave<W: Write>(
    writer: W,
    sample_rate: u32,
    bit_depth: BitDepth,
    samples: &[f32],
) -> Result<(), WaveError> {
    let bytes_per_sample = bit_depth.bytes_per_sample();
    let data_bytes = u32::try_from(samples.len() as u64 * u64::from(bytes_per_sample))
        .ok()
        .context(DataTooLargeSnafu { sample_count: samples.len() })?;

    let mut writer = io::BufWriter::new(writer);
    writer.write_all(b"RIFF").context(IoSnafu)?;
    writer.write_all(&(36 + data_bytes).to_le_bytes()).context(IoSnafu)?;
    writer.write_all(b"WAVE").context(IoSnafu)?;
    writer.write_all(b"fmt ").context(IoSnafu)?;
    writer.write_all(&16u32.to_le_bytes()).context(IoSnafu)?; // PCM fmt chunk size
    writer.write_all(&1u16.to_le_bytes()).context(IoSnafu)?; // format tag: integer PCM
    writer.write_all(&1u16.to_le_bytes()).context(IoSnafu)?; // channels
    writer.write_all(&sample_rate.to_le_bytes()).context(IoSnafu)?;
    writer.write_all(&(sample_rate * bytes_per_sample).to_le_bytes()).context(IoSnafu)?;
    writer.write_all(&(bytes_per_sample as u16).to_le_bytes()).context(IoSnafu)?; // block align
    writer.write_all(&bit_depth.bits().to_le_bytes()).context(IoSnafu)?;
    writer.write_all(b"data").context(IoSnafu)?;
    writer.write_all(&data_bytes.to_le_bytes()).context(IoSnafu)?;

    match bit_depth {
        BitDepth::Pcm16 => {
            for &sample in samples {
                writer.write_all(&quantize_i16(sample).to_le_bytes()).context(IoSnafu)?;
            }
        }
        BitDepth::Pcm24 => {
            for &sample in samples {
                writer.write_all(&quantize_i24(sample).to_le_bytes()[..3]).context(IoSnafu)?;
            }
        }
    }
    writer.flush().context(IoSnafu)?;
    trace!("wrote {} bytes of {}-bit PCM", 44 + u64::from(data_bytes), bit_depth.bits());
    Ok(())
}

/// Quantize a float sample to a signed 16-bit integer, rounding and clamping to full scale.
fn quantize_i16(sample: f32) -> i16 {
    (f64::from(sample) * 32_767.0).round().clamp(-32_768.0, 32_767.0) as i16
}

/// Quantize a float sample to a signed 24-bit integer held in an `i32`.
///
/// Quantization happens in floating point first and the result is clamped to the 24-bit range;
/// the caller then packs the low three little-endian bytes, which is correct for negative
/// values because the sign bit of the 24-bit field lives in the third byte.
fn quantize_i24(sample: f32) -> i32 {
    (f64::from(sample) * 8_388_607.0).round().clamp(-8_388_608.0, 8_388_607.0) as i32
}

/// Error type for a failed WAVE serialization.
#[derive(Debug, Snafu)]
pub enum WaveError {
    /// The underlying writer failed.
    #[snafu(display("Could not write WAVE data"))]
    Io { source: io::Error, backtrace: snafu::Backtrace },

    /// The sample stream does not fit in a RIFF data chunk, whose size field is 32 bits.
    #[snafu(display("{sample_count} samples do not fit in a RIFF data chunk"))]
    DataTooLarge { sample_count: usize },
}
