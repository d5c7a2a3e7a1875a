//! The generation driver: configuration, validation, synthesis, and file output.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use garde::{Unvalidated, Validate};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt, Snafu};

use crate::{
    codeword::Codeword,
    modulator::{samples_per_frame, Modulator},
    rate::FrameRate,
    timecode::Timecode,
    wave::{self, BitDepth},
};


/// Sample rates accepted by [`Config::sample_rate`], in hertz.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [44_100, 48_000, 96_000, 192_000];

/// Wall-clock seconds prepended to a run when [`Config::preroll`] is set.
pub const PREROLL_SECONDS: u32 = 10;

/// Beyond this count the `f64` arithmetic deriving the sample count is no longer exact.
const MAX_SAMPLES: f64 = (1u64 << 53) as f64;

/// Caller-supplied description of one generation run.
///
/// A configuration must be validated before samples can be synthesized from it; [`generate`]
/// does so internally.  Validation covers the sample rate, the start timecode (against the
/// frame rate, including drop-frame skipped numbers), and nothing else: the frame rate and bit
/// depth are closed enums and need no further checking, and the duration has its own error
/// reporting in [`generate`].
#[derive(Debug, Clone, PartialEq, Validate, Serialize, Deserialize)]
pub struct Config {
    /// Frame rate of the video signal the LTC stream is locked to.
    #[garde(skip)]
    pub frame_rate: FrameRate,

    /// Output sample rate in hertz; one of [`SUPPORTED_SAMPLE_RATES`].
    #[garde(custom(is_supported_sample_rate))]
    pub sample_rate: u32,

    /// PCM width of the output file.
    #[garde(skip)]
    pub bit_depth: BitDepth,

    /// Timecode of the first synthesized frame (before any preroll is applied).
    #[garde(custom(check_start(&self)))]
    pub start: Timecode,

    /// Length of the generated signal in seconds, excluding any preroll.
    #[garde(skip)]
    pub duration_seconds: f64,

    /// Start the signal ten wall-clock seconds before [`Config::start`], extending the
    /// duration to match.  Gives chasing equipment time to lock before the material begins.
    #[serde(default)]
    #[garde(skip)]
    pub preroll: bool,

    /// Destination path of the WAVE file.
    #[garde(skip)]
    pub output_path: PathBuf,
}

fn is_supported_sample_rate(sample_rate: &u32, _: &()) -> garde::Result {
    if SUPPORTED_SAMPLE_RATES.contains(sample_rate) {
        Ok(())
    } else {
        Err(garde::Error::new(format!("sample rate of {sample_rate} Hz is not supported")))
    }
}

/// Validate the start timecode against the configuration's own frame rate.
fn check_start(config: &Config) -> impl FnOnce(&Timecode, &()) -> garde::Result + '_ {
    move |start, _| match start.validate_with(&config.frame_rate) {
        Ok(()) => Ok(()),
        Err(report) => {
            Err(garde::Error::new(format!("start timecode {start} is invalid: {report}")))
        }
    }
}

/// Generate an LTC WAVE file as described by `config`, returning the path written.
///
/// Validation happens entirely up front; after it passes, the full signal is synthesized in
/// memory, quantized, and written to a temporary sibling of [`Config::output_path`] which is
/// renamed into place.  On any error the temporary file is removed, so a failed call leaves no
/// partial output behind.  Two calls with identical configurations produce identical files.
pub fn generate(config: &Config) -> Result<PathBuf, GenerateError> {
    let valid = Unvalidated::new(config.clone()).validate().context(InvalidConfigSnafu)?;
    let config: &Config = &valid;

    let duration = config.duration_seconds;
    ensure!(duration.is_finite() && duration > 0.0, InvalidDurationSnafu { duration });
    let effective_duration = effective_run(config).1;
    ensure!(
        effective_duration * f64::from(config.sample_rate) < MAX_SAMPLES,
        InvalidDurationSnafu { duration }
    );

    debug!(
        "generating {} LTC from {} for {} s at {} Hz / {}-bit into {}",
        config.frame_rate,
        config.start,
        duration,
        config.sample_rate,
        config.bit_depth.bits(),
        config.output_path.display(),
    );

    let samples = synthesize(config);
    write_output(config, &samples)?;
    Ok(config.output_path.clone())
}

/// The start timecode and duration actually synthesized, with any preroll applied.
fn effective_run(config: &Config) -> (Timecode, f64) {
    if config.preroll {
        let rewound = config.start.rewound(PREROLL_SECONDS);
        (rewound, config.duration_seconds + f64::from(PREROLL_SECONDS))
    } else {
        (config.start, config.duration_seconds)
    }
}

/// Synthesize the whole run into a float buffer of `round(duration * sample_rate)` samples.
///
/// One codeword is modulated per frame; the final frame is clipped at the buffer's end, which
/// leaves a sample-exact prefix of the continuous waveform in place.
fn synthesize(config: &Config) -> Vec<f32> {
    let rate = config.frame_rate;
    let (start, duration) = effective_run(config);
    let total_samples = (duration * f64::from(config.sample_rate)).round() as usize;
    let frame_len = samples_per_frame(config.sample_rate, rate);

    let mut modulator = Modulator::new(config.sample_rate, rate);
    let mut buffer = vec![0.0f32; total_samples];
    let mut frame = vec![0.0f32; frame_len];
    let mut time = start;
    let mut frames = 0u64;
    let mut written = 0;
    while written < total_samples {
        modulator.write_frame(Codeword::assemble(time, rate), &mut frame);
        let take = frame_len.min(total_samples - written);
        buffer[written..written + take].copy_from_slice(&frame[..take]);
        written += take;
        frames += 1;
        time.advance(rate);
    }
    trace!("synthesized {frames} codewords into {total_samples} samples starting at {start}");
    buffer
}

/// Serialize `samples` to the configured output path via a temporary sibling file.
fn write_output(config: &Config, samples: &[f32]) -> Result<(), GenerateError> {
    let path = &config.output_path;
    let staging = staging_path(path);
    let file = fs::File::create(&staging).context(CreateSnafu { path: staging.clone() })?;
    let result = wave::write_wave(file, config.sample_rate, config.bit_depth, samples)
        .context(SerializeSnafu { path: staging.clone() })
        .and_then(|()| {
            fs::rename(&staging, path)
                .context(PersistSnafu { from: staging.clone(), to: path.clone() })
        });
    if result.is_err() {
        // Leave no partial file behind; the write error is the one worth reporting.
        let _ = fs::remove_file(&staging);
    }
    result
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name =
        path.file_name().map_or_else(|| OsString::from("ltc.wav"), |name| name.to_os_string());
    name.push(".tmp");
    path.with_file_name(name)
}

/// A deterministic output file name for `config`, for hosts that do not supply one.
///
/// For example, 29.97 DF starting at 01:00:00:00 written as 48 kHz / 16-bit yields
/// `ltc_2997df_01000000_48000hz_16bit.wav`.
pub fn default_output_path(config: &Config) -> PathBuf {
    let label = config.frame_rate.to_string().to_lowercase().replace([' ', '.'], "");
    let start = config.start;
    PathBuf::from(format!(
        "ltc_{label}_{:02}{:02}{:02}{:02}_{}hz_{}bit.wav",
        start.hour,
        start.minute,
        start.second,
        start.frame,
        config.sample_rate,
        config.bit_depth.bits(),
    ))
}

/// Error type for a failed generation run.
#[derive(Debug, Snafu)]
pub enum GenerateError {
    /// The configuration failed boundary validation; see [`Config`] for the rules.
    #[snafu(display("Invalid configuration"))]
    InvalidConfig { source: garde::Report },

    /// The duration is not a positive finite number of seconds, or it describes more samples
    /// than can be counted exactly.
    #[snafu(display("Invalid duration of {duration} seconds"))]
    InvalidDuration { duration: f64 },

    /// The staging file could not be created.
    #[snafu(display("Could not create {}", path.display()))]
    Create { path: PathBuf, source: io::Error, backtrace: snafu::Backtrace },

    /// The WAVE serializer failed while writing the staging file.
    #[snafu(display("Could not write {}", path.display()))]
    Serialize { path: PathBuf, source: wave::WaveError },

    /// The finished staging file could not be renamed over the output path.
    #[snafu(display("Could not move {} into place at {}", from.display(), to.display()))]
    Persist { from: PathBuf, to: PathBuf, source: io::Error, backtrace: snafu::Backtrace },
}
