//! Tuner type definitions

use serde::Serialize;

use crate::error::MicrophoneError;

/// Samples analysed per frame.
pub const WINDOW_SIZE: usize = 4096;

/// Frames quieter than this RMS are treated as silence.
pub const RMS_THRESHOLD: f64 = 0.01;

/// Best NSDF value below which a frame counts as unvoiced.
pub const MIN_CORRELATION: f64 = 0.5;

/// Fraction of the best NSDF value the first accepted peak must reach.
pub const PEAK_THRESHOLD_RATIO: f64 = 0.9;

/// Frames that must agree before a reading is reported at full clarity.
pub const STABILITY_FRAMES: usize = 3;

pub const MIN_FREQUENCY: f64 = 60.0;
pub const MAX_FREQUENCY: f64 = 1200.0;

pub const A4_FREQUENCY: f64 = 440.0;

/// One confident (or dimmed) reading.
///
/// `clarity` is the frame's best NSDF value, halved when the last frames
/// disagreed on the note.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TunerResult {
    pub frequency: f64,
    pub note: &'static str,
    pub octave: i32,
    pub cents: i32,
    pub clarity: f64,
}

impl TunerResult {
    /// Note plus octave, e.g. `A4`.
    pub fn label(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }
}

/// What one analysed frame produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Silence, noise or an out-of-range pitch. Reported as "no reading".
    Rejected,
    /// A pitch was found but the stability window is not full yet. Nothing is reported.
    Settling,
    Detected(TunerResult),
}

/// A live sample source the tuner reads from.
pub trait AudioInput {
    fn sample_rate(&self) -> f64;

    /// Copy the most recent `buffer.len()` samples into `buffer`.
    fn read_latest(&mut self, buffer: &mut [f32]);

    /// Release the device. Called once when the tuner stops.
    fn close(&mut self) {}
}

/// Opens [`AudioInput`]s; the platform microphone or a test double.
pub trait InputDevice {
    fn open(&mut self) -> Result<Box<dyn AudioInput>, MicrophoneError>;
}
