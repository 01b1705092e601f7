//! # fretlab
//!
//! Music-theory engine behind a guitar and bass reference app: scales and
//! keys, chord tones and inversions, fretboard voicings, tunings and CAGED
//! boxes, plus a pitch-detecting tuner and a lookahead metronome.
//!
//! The theory modules are pure functions over static catalogs. The tuner and
//! metronome are stateful engines driven by the host and talk to audio hardware
//! only through the traits in [`audio`] and [`tuner`].

pub mod audio;
pub mod caged;
pub mod chord;
pub mod error;
pub mod key;
pub mod metronome;
pub mod pitch;
pub mod progression;
pub mod report;
pub mod scale;
pub mod settings;
pub mod tuner;
pub mod tuning;
pub mod voicing;

#[cfg(feature = "audio")]
pub mod backend;

pub use error::{FretlabError, MicrophoneError, Result};
pub use report::{describe_chord, describe_key, describe_scale, ChordReport, KeyReport, ScaleReport};
pub use settings::Settings;
