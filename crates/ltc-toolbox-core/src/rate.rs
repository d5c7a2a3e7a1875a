//! The closed set of frame rates that an LTC stream can be locked to.

use derive_more::derive::Display;
use num::rational::Ratio;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

#[cfg(test)]
mod tests;

/// Frame rate of the video signal that an LTC stream is locked to.
///
/// The rate is described by an exact rational frame rate and a drop-frame flag.  Only the ten
/// combinations listed on the variants are recognized; drop-frame counting exists solely to keep
/// 30000/1001-family timecode aligned with the wall clock, so it is only valid for the 29.97 and
/// 59.94 rates.
///
/// The *nominal* frame count per second (the integer the frame field of a timecode counts up to)
/// is derived from the exact rate with [`FrameRate::nominal_fps`] rather than stored.
///
/// When serialized with [`serde`], a rate is represented by its display label (for example
/// `"29.97 DF"`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, Serialize, Deserialize)]
pub enum FrameRate {
    /// 24000/1001 fps, non-drop-frame (film pulled down to NTSC).
    #[display("23.976 NDF")]
    #[serde(rename = "23.976 NDF")]
    Fps23_976,

    /// 24/1 fps, non-drop-frame.
    #[display("24 NDF")]
    #[serde(rename = "24 NDF")]
    Fps24,

    /// 25/1 fps, non-drop-frame (PAL/SECAM).
    #[display("25 NDF")]
    #[serde(rename = "25 NDF")]
    Fps25,

    /// 30000/1001 fps, non-drop-frame (NTSC).
    #[display("29.97 NDF")]
    #[serde(rename = "29.97 NDF")]
    Fps29_97,

    /// 30/1 fps, non-drop-frame.
    #[display("30 NDF")]
    #[serde(rename = "30 NDF")]
    Fps30,

    /// 50/1 fps, non-drop-frame.
    #[display("50 NDF")]
    #[serde(rename = "50 NDF")]
    Fps50,

    /// 60000/1001 fps, non-drop-frame.
    #[display("59.94 NDF")]
    #[serde(rename = "59.94 NDF")]
    Fps59_94,

    /// 60/1 fps, non-drop-frame.
    #[display("60 NDF")]
    #[serde(rename = "60 NDF")]
    Fps60,

    /// 30000/1001 fps with drop-frame counting.
    #[display("29.97 DF")]
    #[serde(rename = "29.97 DF")]
    Fps29_97Df,

    /// 60000/1001 fps with drop-frame counting.
    #[display("59.94 DF")]
    #[serde(rename = "59.94 DF")]
    Fps59_94Df,
}

impl FrameRate {
    /// Every recognized frame rate, in the order a host should present them.
    pub const ALL: [FrameRate; 10] = [
        FrameRate::Fps23_976,
        FrameRate::Fps24,
        FrameRate::Fps25,
        FrameRate::Fps29_97,
        FrameRate::Fps30,
        FrameRate::Fps50,
        FrameRate::Fps59_94,
        FrameRate::Fps60,
        FrameRate::Fps29_97Df,
        FrameRate::Fps59_94Df,
    ];

    /// Look up the rate for an exact `(numerator, denominator, drop_frame)` triple.
    ///
    /// The triple must match one of the recognized rates exactly; ratios are not reduced, so
    /// `48000/2001` is not an alias for anything.
    pub fn from_parts(
        numerator: u32,
        denominator: u32,
        drop_frame: bool,
    ) -> Result<FrameRate, InvalidRateError> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.parts() == (numerator, denominator, drop_frame))
            .ok_or_else(|| InvalidRateSnafu { numerator, denominator, drop_frame }.build())
    }

    /// The exact frame rate as a rational number of frames per second.
    pub fn exact_fps(self) -> Ratio<u32> {
        let (numerator, denominator, _) = self.parts();
        Ratio::new(numerator, denominator)
    }

    /// The integer frame count the frame field rolls over at: the ceiling of the exact rate.
    ///
    /// For example, both 29.97 rates count 30 frame numbers per second.
    pub fn nominal_fps(self) -> u8 {
        self.exact_fps().ceil().to_integer() as u8
    }

    /// Whether drop-frame counting applies to this rate.
    pub fn is_drop_frame(self) -> bool {
        self.parts().2
    }

    /// The defining `(numerator, denominator, drop_frame)` triple.
    fn parts(self) -> (u32, u32, bool) {
        match self {
            FrameRate::Fps23_976 => (24_000, 1_001, false),
            FrameRate::Fps24 => (24, 1, false),
            FrameRate::Fps25 => (25, 1, false),
            FrameRate::Fps29_97 => (30_000, 1_001, false),
            FrameRate::Fps30 => (30, 1, false),
            FrameRate::Fps50 => (50, 1, false),
            FrameRate::Fps59_94 => (60_000, 1_001, false),
            FrameRate::Fps60 => (60, 1, false),
            FrameRate::Fps29_97Df => (30_000, 1_001, true),
            FrameRate::Fps59_94Df => (60_000, 1_001, true),
        }
    }
}

/// Error type for a `(numerator, denominator, drop_frame)` triple that names no recognized rate.
#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display(
    "{numerator}/{denominator} fps (drop frame: {drop_frame}) is not a recognized LTC frame rate"
))]
pub struct InvalidRateError {
    numerator: u32,
    denominator: u32,
    drop_frame: bool,
}
