//! # Metronome Module
//!
//! Click track with an optional drum-machine overlay, scheduled ahead of time
//! against an audio output clock.
//!
//! ## Sub-modules
//! - `types` - TimeSignature, the step grid and scheduler constants
//! - `drums` - drum patterns in lane notation and the drum voices
//! - `engine` - MetronomeEngine (lookahead scheduler) and TapTempo
//!
//! ## Entry Point
//! [`MetronomeEngine`] - create with an output, `start()`, then `tick()` every
//! 25 ms until `stop()`.
//!
//! ## Example
//! ```rust
//! use fretlab::audio::RecordingOutput;
//! use fretlab::metronome::{MetronomeEngine, SCHEDULER_INTERVAL};
//!
//! let mut metronome = MetronomeEngine::new(RecordingOutput::new());
//! metronome.set_bpm(120);
//! metronome.start();
//!
//! for _ in 0..80 {
//!     metronome.tick();
//!     metronome.output_mut().advance(SCHEDULER_INTERVAL);
//! }
//!
//! // two seconds at 120 BPM in 4/4: one measure of clicks plus the lookahead
//! assert_eq!(metronome.output().tones().len(), 5);
//! ```
//!
//! ## Step Grid
//!
//! | Meter | Grid       | Steps/measure | Clicks on steps     |
//! |-------|------------|---------------|---------------------|
//! | 4/4   | sixteenths | 16            | 0, 4, 8, 12         |
//! | 3/4   | sixteenths | 12            | 0, 4, 8             |
//! | 2/4   | sixteenths | 8             | 0, 4                |
//! | 5/4   | sixteenths | 20            | 0, 4, 8, 12, 16     |
//! | 6/8   | eighths    | 6             | 0, 3                |
//! | 7/8   | eighths    | 7             | 0, 3, 5             |
//!
//! In x/8 meters the tempo counts the dotted quarter, so an eighth lasts
//! `(60 / bpm) / 3`. Step 0 carries the accented click.
//!
//! ## Beat Notices
//!
//! Beats are scheduled up to 100 ms early, but `on_beat` fires when the beat
//! is heard: each notice is held until the output clock reaches its time and is
//! delivered by the next `tick()` or `poll()`. [`MetronomeEngine::next_notice_delay`]
//! tells a host how long it may sleep.
//!
//! ## Related Modules
//! - `audio` - the output handle the engine schedules on

mod types;
mod drums;
mod engine;


pub use types::{
    clamp_bpm, find_time_signature, ScheduledStep, TimeSignature, ACCENT_CLICK_FREQUENCY,
    ACCENT_CLICK_GAIN, CLICK_FREQUENCY, CLICK_GAIN, CLICK_LENGTH, DEFAULT_BPM,
    DEFAULT_PATTERN_STEPS, LOOKAHEAD, MAX_BPM, MIN_BPM, SCHEDULER_INTERVAL, START_DELAY,
    TIME_SIGNATURES,
};
pub use drums::{
    find_drum_pattern, parse_pattern, schedule_drum, DrumPattern, DrumSound, DrumStep, PatternGrid,
    DEFAULT_DRUM_VOLUME, DRUM_PATTERNS,
};
pub use engine::{MetronomeEngine, TapTempo, TAP_HISTORY};
