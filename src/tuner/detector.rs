//! NSDF pitch detection
//!
//! A frame goes through an RMS gate, a normalized square-difference search over
//! the 60-1200 Hz lag range, a first-peak pick to stay on the fundamental,
//! parabolic refinement and finally a stability check across frames.

use std::collections::VecDeque;

use super::types::{
    Detection, TunerResult, A4_FREQUENCY, MAX_FREQUENCY, MIN_CORRELATION, MIN_FREQUENCY,
    PEAK_THRESHOLD_RATIO, RMS_THRESHOLD, STABILITY_FRAMES,
};
use crate::pitch::CHROMATIC_SHARPS;

/// Round half up, so `-0.5` goes to `0` rather than `-1`.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub fn rms(buffer: &[f32]) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f64 = buffer.iter().map(|&s| s as f64 * s as f64).sum();
    (sum / buffer.len() as f64).sqrt()
}

/// Normalized square difference at `lag`: `2·Σ x[i]x[i+lag] / Σ (x[i]² + x[i+lag]²)`.
pub fn nsdf(buffer: &[f32], lag: usize) -> f64 {
    if lag >= buffer.len() {
        return 0.0;
    }
    let mut num = 0.0;
    let mut den = 0.0;
    for (a, b) in buffer.iter().zip(&buffer[lag..]) {
        let (a, b) = (*a as f64, *b as f64);
        num += a * b;
        den += a * a + b * b;
    }
    if den > 0.0 {
        2.0 * num / den
    } else {
        0.0
    }
}

/// Lags covering [`MIN_FREQUENCY`]..=[`MAX_FREQUENCY`], capped below the buffer length.
///
/// At 44.1 kHz the range starts at lag 36. A pure tone under about 88 Hz still
/// correlates positively there, so the first-peak pick lands on the boundary and
/// the frame is rejected; string tones with harmonics are not affected.
pub fn lag_range(sample_rate: f64, len: usize) -> std::ops::Range<usize> {
    let min_lag = (sample_rate / MAX_FREQUENCY).floor() as usize;
    let max_lag = (sample_rate / MIN_FREQUENCY).ceil() as usize;
    min_lag..(max_lag + 1).min(len)
}

/// Refine `lag` with a parabola through its neighbours, shifting at most one sample.
pub fn parabolic_interpolation(buffer: &[f32], lag: usize) -> f64 {
    if lag == 0 || lag + 1 >= buffer.len() {
        return lag as f64;
    }
    let y0 = nsdf(buffer, lag - 1);
    let y1 = nsdf(buffer, lag);
    let y2 = nsdf(buffer, lag + 1);

    let denom = 2.0 * (2.0 * y1 - y2 - y0);
    if denom.abs() < 1e-10 {
        return lag as f64;
    }
    let shift = ((y2 - y0) / denom).clamp(-1.0, 1.0);
    lag as f64 + shift
}

/// Nearest equal-tempered note of `frequency` and the deviation in cents.
pub fn frequency_to_note(frequency: f64) -> (&'static str, i32, i32) {
    let semitones = 12.0 * (frequency / A4_FREQUENCY).log2();
    let rounded = round_half_up(semitones);
    let cents = round_half_up((semitones - rounded) * 100.0) as i32;
    let midi = rounded as i32 + 69;
    let note = CHROMATIC_SHARPS[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    (note, octave, cents)
}

/// Pitch estimate of a single frame before stability gating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEstimate {
    pub frequency: f64,
    pub correlation: f64,
}

/// Why a frame produced no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    Silence,
    Unvoiced,
    OutOfRange,
}

/// Run the NSDF search on one frame.
pub fn estimate_frame(buffer: &[f32], sample_rate: f64) -> Result<FrameEstimate, FrameRejection> {
    if rms(buffer) < RMS_THRESHOLD {
        return Err(FrameRejection::Silence);
    }

    let lags = lag_range(sample_rate, buffer.len());
    let values: Vec<(usize, f64)> = lags.map(|lag| (lag, nsdf(buffer, lag))).collect();

    let mut best: Option<(usize, f64)> = None;
    for &(lag, value) in &values {
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((lag, value));
        }
    }
    let Some((best_lag, best_corr)) = best else {
        return Err(FrameRejection::Unvoiced);
    };
    if best_corr < MIN_CORRELATION || best_lag == 0 {
        return Err(FrameRejection::Unvoiced);
    }

    // first lag past a peak that reaches the threshold
    let threshold = best_corr * PEAK_THRESHOLD_RATIO;
    let mut chosen_lag = best_lag;
    let mut prev = 0.0;
    for &(lag, value) in &values {
        if value >= threshold && value < prev {
            chosen_lag = lag - 1;
            break;
        }
        prev = value;
    }

    let frequency = sample_rate / parabolic_interpolation(buffer, chosen_lag);
    if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
        return Err(FrameRejection::OutOfRange);
    }
    Ok(FrameEstimate { frequency, correlation: best_corr })
}

/// Frame-by-frame detector with the note stability window.
#[derive(Debug, Default)]
pub struct PitchDetector {
    history: VecDeque<String>,
}

impl PitchDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Analyse one frame.
    ///
    /// Silence and unvoiced frames clear the stability window; an out-of-range
    /// pitch is rejected without touching it.
    pub fn process(&mut self, buffer: &[f32], sample_rate: f64) -> Detection {
        let estimate = match estimate_frame(buffer, sample_rate) {
            Ok(estimate) => estimate,
            Err(FrameRejection::OutOfRange) => return Detection::Rejected,
            Err(_) => {
                self.history.clear();
                return Detection::Rejected;
            }
        };

        let (note, octave, cents) = frequency_to_note(estimate.frequency);
        let result = TunerResult {
            frequency: estimate.frequency,
            note,
            octave,
            cents,
            clarity: estimate.correlation,
        };
        let label = result.label();

        self.history.push_back(label.clone());
        if self.history.len() > STABILITY_FRAMES {
            self.history.pop_front();
        }
        if self.history.len() < STABILITY_FRAMES {
            return Detection::Settling;
        }

        if self.history.iter().all(|h| *h == label) {
            Detection::Detected(result)
        } else {
            Detection::Detected(TunerResult { clarity: result.clarity * 0.5, ..result })
        }
    }
}
