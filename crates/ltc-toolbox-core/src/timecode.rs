//! The time address carried by each LTC frame, and the counting rules that advance it.

use std::{fmt, sync::LazyLock};

use garde::Validate;
use regex::Regex;
use serde::{de, de::Unexpected, Deserialize, Serialize};

use crate::rate::FrameRate;


/// Contains the time address for one frame.
///
/// When a timecode value reaches 24 hours, it wraps back to the 00 hour, similar to how normal
/// clock time works.  The maximum value of [`Timecode::hour`] is 23.
///
/// Validation requires a [`FrameRate`] context, because the maximum frame number and the set of
/// skipped drop-frame numbers both depend on the rate.
///
/// When the structure is serialized to a string, the following formats apply:
/// - `hh:mm:ss:ff`: timecode with zero-based frame number.
/// - `hh:mm:ss;ff`: accepted on input; the `;` separator is how drop-frame material is
///   conventionally written.  Serialization always uses `:`, since the drop-frame property
///   belongs to the [`FrameRate`], not to the time address.
///
/// General timecode standards:
///
/// - IEC 60461:2010 (entire standard) - Time and control code
/// - SMPTE 12M (entire standard) - Time and Control Code
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Validate)]
#[garde(context(FrameRate))]
pub struct Timecode {
    /// The hour of the timecode, in range `[0, 23]`.
    #[garde(range(min = 0, max = 23))]
    pub hour: u8,

    /// The minute of the timecode, in range `[0, 59]`.
    #[garde(range(min = 0, max = 59))]
    pub minute: u8,

    /// The second of the timecode, in range `[0, 59]`.
    #[garde(range(min = 0, max = 59))]
    pub second: u8,

    /// The frame number of the timecode.
    ///
    /// The minimum value is generally 0 and the maximum is one less than the rate's nominal
    /// frame count.  Special rules apply when the rate uses drop-frame counting: frame numbers
    /// 00 and 01 do not occur in the first second of a minute, except for the minutes evenly
    /// divisible by 10.
    #[garde(custom(check_frame_number(&self)))]
    pub frame: u8,
}

/// Validate the maximum frame number, which varies with the frame rate.
///
/// Also validates the minimum frame number when drop-frame counting is in use to ensure that we
/// aren't given a frame number that is supposed to be skipped.
fn check_frame_number(time: &Timecode) -> impl FnOnce(&u8, &FrameRate) -> garde::Result + '_ {
    move |frame_number, rate| {
        let max = rate.nominal_fps() - 1;
        if *frame_number > max {
            return Err(garde::Error::new(format!(
                "frame number {frame_number} is greater than {max}, which is the maximum \
                valid frame number at {rate}"
            )));
        }
        // IEC 60461:2010 Section 4.2.3 - Drop frame - NTSC time compensated mode
        // Frame numbers 0 and 1 are skipped at the start of each minute, except for minutes
        // 00, 10, 20, 30, 40, and 50.
        if rate.is_drop_frame()
            && time.minute % 10 > 0
            && time.second == 0
            && *frame_number < 2
        {
            return Err(garde::Error::new(format!(
                "the rate {rate} uses drop frame counting, but the dropped frame number \
                {frame_number} was provided"
            )));
        }
        Ok(())
    }
}

impl Timecode {
    /// Advance to the time address of the next frame under `rate`.
    ///
    /// The frame field increments and overflow cascades through seconds, minutes, and hours;
    /// the hour wraps from 23 back to 0.  For drop-frame rates, the skip is applied after the
    /// cascade: if the new address lands on second 00 with frame 00 or 01 in a minute not
    /// divisible by 10, the frame number jumps ahead by two.  Skipping after the rollover is
    /// what keeps a drop-frame minute at exactly 1798 counted frames.
    pub fn advance(&mut self, rate: FrameRate) {
        self.frame += 1;
        if self.frame >= rate.nominal_fps() {
            self.frame = 0;
            self.second += 1;
            if self.second >= 60 {
                self.second = 0;
                self.minute += 1;
                if self.minute >= 60 {
                    self.minute = 0;
                    self.hour += 1;
                    if self.hour >= 24 {
                        self.hour = 0;
                    }
                }
            }
        }
        if rate.is_drop_frame() && self.second == 0 && self.frame < 2 && self.minute % 10 != 0 {
            self.frame += 2;
        }
    }

    /// The time address `seconds` earlier on the wall clock, wrapping through midnight.
    ///
    /// The frame field is unchanged.  Used to shift the start of a run backwards when a preroll
    /// is requested.
    pub fn rewound(self, seconds: u32) -> Timecode {
        const SECONDS_PER_DAY: u32 = 24 * 60 * 60;
        let clock = u32::from(self.hour) * 3600
            + u32::from(self.minute) * 60
            + u32::from(self.second);
        let clock = (clock + SECONDS_PER_DAY - seconds % SECONDS_PER_DAY) % SECONDS_PER_DAY;
        Timecode {
            hour: (clock / 3600) as u8,
            minute: (clock / 60 % 60) as u8,
            second: (clock % 60) as u8,
            frame: self.frame,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}:{:02}", self.hour, self.minute, self.second, self.frame)
    }
}

impl Serialize for Timecode {
    /// Serialize the time address to a string.  The string format is defined in the
    /// documentation for [`Timecode`].
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<hour>\d+):(?P<minute>\d+):(?P<second>\d+)[:;](?P<frame>\d+)$").unwrap()
});

struct TimecodeVisitor;

impl de::Visitor<'_> for TimecodeVisitor {
    type Value = Timecode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a timecode string such as 01:23:45:10")
    }

    /// Deserialize the time address from a string.  The string format is defined in the
    /// documentation for [`Timecode`].  Range checking against a frame rate is left to
    /// validation.
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let capture = TIME_RE
            .captures(v)
            .ok_or(E::invalid_value(Unexpected::Str(v), &"a timecode string such as 01:23:45:10"))?;
        Ok(Timecode {
            hour: capture["hour"].parse().map_err(E::custom)?,
            minute: capture["minute"].parse().map_err(E::custom)?,
            second: capture["second"].parse().map_err(E::custom)?,
            frame: capture["frame"].parse().map_err(E::custom)?,
        })
    }
}

impl<'de> Deserialize<'de> for Timecode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(TimecodeVisitor)
    }
}
