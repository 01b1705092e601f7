//! Metronome type definitions

use serde::Serialize;

pub const DEFAULT_BPM: u32 = 120;
pub const MIN_BPM: u32 = 30;
pub const MAX_BPM: u32 = 300;

/// How often the host should call `tick()`, seconds.
pub const SCHEDULER_INTERVAL: f64 = 0.025;

/// How far ahead of the output clock each tick schedules, seconds.
pub const LOOKAHEAD: f64 = 0.1;

/// Delay between `start()` and the first event, seconds.
pub const START_DELAY: f64 = 0.05;

/// Step count the drum counter wraps at when no pattern is bound.
pub const DEFAULT_PATTERN_STEPS: usize = 16;

pub const ACCENT_CLICK_FREQUENCY: f64 = 1000.0;
pub const CLICK_FREQUENCY: f64 = 800.0;
pub const ACCENT_CLICK_GAIN: f64 = 0.8;
pub const CLICK_GAIN: f64 = 0.5;
pub const CLICK_LENGTH: f64 = 0.05;

/// Clamp a tempo to [`MIN_BPM`]..=[`MAX_BPM`].
pub fn clamp_bpm(bpm: u32) -> u32 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// A meter.
///
/// Simple meters (x/4) run on a sixteenth-note grid, four steps to the beat,
/// with the tempo counting quarter notes. Compound meters (x/8) run on an
/// eighth-note grid, one step per counted beat, and the tempo counts the
/// dotted-quarter pulse: every eighth lasts a third of `60 / bpm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSignature {
    pub beats: u8,
    pub subdivision: u8,
    pub label: &'static str,
}

impl TimeSignature {
    pub const fn new(beats: u8, subdivision: u8, label: &'static str) -> Self {
        Self { beats, subdivision, label }
    }

    pub fn is_compound(&self) -> bool {
        self.subdivision == 8
    }

    pub fn steps_per_beat(&self) -> usize {
        if self.is_compound() {
            1
        } else {
            4
        }
    }

    pub fn steps_per_measure(&self) -> usize {
        self.beats as usize * self.steps_per_beat()
    }

    /// Seconds between grid steps at `bpm`.
    pub fn step_duration(&self, bpm: u32) -> f64 {
        let beat = 60.0 / bpm as f64;
        if self.is_compound() {
            beat / 3.0
        } else {
            beat / 4.0
        }
    }

    /// Whether the click sounds on step `step` of the measure.
    ///
    /// Simple meters click on every beat. Compound meters click on the
    /// dotted-quarter pulse; 7/8 is grouped 3+2+2.
    pub fn clicks_on(&self, step: usize) -> bool {
        if !self.is_compound() {
            return step % 4 == 0;
        }
        if self.beats == 7 {
            matches!(step, 0 | 3 | 5)
        } else {
            step % 3 == 0
        }
    }

    /// Beat index of step `step`, or `None` between beats.
    pub fn beat_at(&self, step: usize) -> Option<usize> {
        let per_beat = self.steps_per_beat();
        (step % per_beat == 0).then_some(step / per_beat)
    }
}

pub const TIME_SIGNATURES: [TimeSignature; 6] = [
    TimeSignature::new(4, 4, "4/4"),
    TimeSignature::new(3, 4, "3/4"),
    TimeSignature::new(6, 8, "6/8"),
    TimeSignature::new(2, 4, "2/4"),
    TimeSignature::new(5, 4, "5/4"),
    TimeSignature::new(7, 8, "7/8"),
];

pub fn find_time_signature(label: &str) -> Option<&'static TimeSignature> {
    TIME_SIGNATURES.iter().find(|ts| ts.label == label)
}

/// One scheduled grid step, as seen by an observer of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledStep {
    /// Output clock time of the step.
    pub time: f64,
    /// Position within the measure.
    pub step: usize,
    /// Position within the drum pattern.
    pub drum_step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beat: Option<usize>,
    pub click: bool,
    pub accent: bool,
    pub drums: Vec<super::drums::DrumSound>,
}
