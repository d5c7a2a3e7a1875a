//! Assembly of the 80-bit LTC codeword transmitted once per frame.

use arbitrary_int::{u2, u3, u4};
use bitbybit::bitfield;

use crate::{rate::FrameRate, timecode::Timecode};


/// Number of bits in one LTC codeword.
pub const CODEWORD_BITS: usize = 80;

/// The fixed sync pattern, occupying bit positions 48 through 63 of the codeword.
///
/// Decoders read the sixteen sync bits least-significant-bit-first out of the transmission
/// order, so bit 48 carries the pattern's LSB.
pub const SYNC_WORD: u16 = 0x3FFD;

/// Binary layout of the low 64 bits of a codeword.
///
/// All numeric fields are binary-coded decimal with the units nibble at the lower bit positions
/// (transmitted before the tens nibble), each nibble LSB-first.  The four user bit groups, the
/// color frame flag, the binary group flags, and the polarity correction bit are all held at
/// zero by this encoder.
///
/// - IEC 60461:2010 Section 8.2 - Linear time code
/// - SMPTE 12M (entire standard) - Time and Control Code
#[bitfield(u64)]
struct RawCodeword {
    #[bits(0..=3, rw)]
    frame_units: u4,
    #[bits(4..=7, rw)]
    user_group_1: u4,
    #[bits(8..=9, rw)]
    frame_tens: u2,
    #[bit(10, rw)]
    drop_frame: bool,
    #[bit(11, rw)]
    color_frame: bool,
    #[bits(12..=15, rw)]
    second_units: u4,
    #[bits(16..=19, rw)]
    user_group_2: u4,
    #[bits(20..=22, rw)]
    second_tens: u3,
    #[bit(23, rw)]
    binary_group_flag_0: bool,
    #[bits(24..=27, rw)]
    minute_units: u4,
    #[bits(28..=31, rw)]
    user_group_3: u4,
    #[bits(32..=34, rw)]
    minute_tens: u3,
    #[bit(35, rw)]
    binary_group_flag_1: bool,
    #[bits(36..=39, rw)]
    hour_units: u4,
    #[bits(40..=43, rw)]
    user_group_4: u4,
    #[bits(44..=45, rw)]
    hour_tens: u2,
    #[bit(46, rw)]
    binary_group_flag_2: bool,
    #[bit(47, rw)]
    polarity_correction: bool,
    #[bits(48..=63, rw)]
    sync: u16,
}

/// One 80-bit LTC codeword.
///
/// Bit 0 is transmitted first.  Bits 64 through 79 carry no payload and always read zero.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Codeword(u128);

impl Codeword {
    /// Assemble the codeword for the frame at `time` under `rate`.
    ///
    /// The caller is responsible for supplying a `time` that is valid for `rate`; see
    /// [`Timecode`] for the validation rules.
    ///
    /// The frame tens field is only two bits wide, so for the 50 and 60 fps rates the tens
    /// digit of frame numbers 40 and above loses its high bit.  Decoders built for those rates
    /// recover the full number from context; the layout itself offers no more room.
    pub fn assemble(time: Timecode, rate: FrameRate) -> Codeword {
        let raw = RawCodeword::builder()
            .with_frame_units(u4::new(time.frame % 10))
            .with_user_group_1(u4::new(0))
            .with_frame_tens(u2::new((time.frame / 10) & 0b11))
            .with_drop_frame(rate.is_drop_frame())
            .with_color_frame(false)
            .with_second_units(u4::new(time.second % 10))
            .with_user_group_2(u4::new(0))
            .with_second_tens(u3::new(time.second / 10))
            .with_binary_group_flag_0(false)
            .with_minute_units(u4::new(time.minute % 10))
            .with_user_group_3(u4::new(0))
            .with_minute_tens(u3::new(time.minute / 10))
            .with_binary_group_flag_1(false)
            .with_hour_units(u4::new(time.hour % 10))
            .with_user_group_4(u4::new(0))
            .with_hour_tens(u2::new(time.hour / 10))
            .with_binary_group_flag_2(false)
            .with_polarity_correction(false)
            .with_sync(SYNC_WORD)
            .build();
        Codeword(u128::from(raw.raw_value()))
    }

    /// The value of the bit at `index`, counted in transmission order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 80 or greater.
    pub fn bit(self, index: usize) -> bool {
        assert!(index < CODEWORD_BITS, "bit index {index} is out of range for an LTC codeword");
        (self.0 >> index) & 1 == 1
    }

    /// The number of one bits in the codeword.
    ///
    /// Each one bit adds one level transition to the modulated frame beyond the 80 per-cell
    /// clock transitions.
    pub fn count_ones(self) -> u32 {
        self.0.count_ones()
    }
}

#[cfg(test)]
impl Codeword {
    /// Wrap bits recovered by a test demodulator.
    pub(crate) fn from_bits(bits: u128) -> Codeword {
        Codeword(bits)
    }

    /// Decode the BCD time fields back out of the codeword.
    pub(crate) fn decode_time(self) -> Timecode {
        let raw = RawCodeword::new_with_raw_value(self.0 as u64);
        Timecode {
            hour: raw.hour_tens().value() * 10 + raw.hour_units().value(),
            minute: raw.minute_tens().value() * 10 + raw.minute_units().value(),
            second: raw.second_tens().value() * 10 + raw.second_units().value(),
            frame: raw.frame_tens().value() * 10 + raw.frame_units().value(),
        }
    }

    /// The sixteen sync bits, read LSB-first out of bit positions 48 through 63.
    pub(crate) fn sync_field(self) -> u16 {
        RawCodeword::new_with_raw_value(self.0 as u64).sync()
    }

    /// The drop frame flag at bit position 10.
    pub(crate) fn drop_frame_flag(self) -> bool {
        RawCodeword::new_with_raw_value(self.0 as u64).drop_frame()
    }
}
