//! Drum patterns and drum voices
//!
//! Patterns are written one lane per instrument, one character per grid step:
//! `x` is a hit, `.` a rest, and on the hi-hat lane `o` is an open hi-hat.
//! Simple meters use a sixteenth-note grid (4/4 has 16 steps), compound meters
//! an eighth-note grid (6/8 has 6).

use serde::Serialize;

use crate::audio::{AudioOutput, Filter, NoiseBurst, Tone, Waveform};

pub const DEFAULT_DRUM_VOLUME: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DrumSound {
    Kick,
    Snare,
    Hihat,
    HihatOpen,
}

/// Sounds triggered on one grid step.
pub type DrumStep = Vec<DrumSound>;

/// Turn three instrument lanes into a step grid.
///
/// The kick lane sets the length; a shorter snare or hi-hat lane is treated as
/// rests past its end.
pub fn parse_pattern(kick: &str, snare: &str, hihat: &str) -> Vec<DrumStep> {
    let snare = snare.as_bytes();
    let hihat = hihat.as_bytes();
    kick.bytes()
        .enumerate()
        .map(|(i, k)| {
            let mut sounds = Vec::new();
            if k == b'x' {
                sounds.push(DrumSound::Kick);
            }
            if snare.get(i) == Some(&b'x') {
                sounds.push(DrumSound::Snare);
            }
            match hihat.get(i) {
                Some(b'x') => sounds.push(DrumSound::Hihat),
                Some(b'o') => sounds.push(DrumSound::HihatOpen),
                _ => {}
            }
            sounds
        })
        .collect()
}

/// A pattern's lanes for one time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternGrid {
    pub time_sig: &'static str,
    pub kick: &'static str,
    pub snare: &'static str,
    pub hihat: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumPattern {
    pub name: &'static str,
    pub grids: &'static [PatternGrid],
}

impl DrumPattern {
    /// Step grid for the time signature `label`, if the pattern has one.
    pub fn steps_for(&self, label: &str) -> Option<Vec<DrumStep>> {
        self.grids
            .iter()
            .find(|g| g.time_sig == label)
            .map(|g| parse_pattern(g.kick, g.snare, g.hihat))
    }
}

const fn grid(time_sig: &'static str, kick: &'static str, snare: &'static str, hihat: &'static str) -> PatternGrid {
    PatternGrid { time_sig, kick, snare, hihat }
}

pub const DRUM_PATTERNS: [DrumPattern; 8] = [
    DrumPattern {
        name: "Rock",
        grids: &[
            grid("4/4", "x...x...x...x...", "....x.......x...", "x.x.x.x.x.x.x.x."),
            grid("3/4", "x.......x...", "....x.......", "x.x.x.x.x.x."),
            grid("6/8", "x..x..", "...x..", "x.xx.x"),
            grid("2/4", "x...x...", "....x...", "x.x.x.x."),
            grid("5/4", "x...x...x...x.......", "....x.......x.......", "x.x.x.x.x.x.x.x.x.x."),
            grid("7/8", "x..x...", "...x..x", "xxxxxxx"),
        ],
    },
    DrumPattern {
        name: "Pop",
        grids: &[
            grid("4/4", "x.....x.x.......", "....x.......x...", "x.x.x.x.x.x.x.x."),
            grid("3/4", "x.....x.....", "....x.......", "x.x.x.x.x.x."),
            grid("6/8", "x....x", "...x..", "x.xx.x"),
            grid("2/4", "x.....x.", "....x...", "x.x.x.x."),
            grid("5/4", "x.....x.x.....x.....", "....x.......x.......", "x.x.x.x.x.x.x.x.x.x."),
            grid("7/8", "x..x...", "...x..x", "xxxxxxx"),
        ],
    },
    DrumPattern {
        name: "Disco",
        grids: &[
            grid("4/4", "x...x...x...x...", "....x.......x...", "x.x.o.x.x.x.o.x."),
            grid("3/4", "x...x...x...", "....x.......", "x.x.o.x.x.x."),
            grid("6/8", "x..x..", "...x..", "xoxxox"),
            grid("2/4", "x...x...", "....x...", "x.x.o.x."),
            grid("5/4", "x...x...x...x...x...", "....x.......x.......", "x.x.o.x.x.x.o.x.x.x."),
            grid("7/8", "x.xx...", "...x..x", "xoxxoxx"),
        ],
    },
    DrumPattern {
        name: "Funk",
        grids: &[
            grid("4/4", "x..x..x...x.....", "....x..x....x..x", "x.x.x.x.x.x.x.x."),
            grid("3/4", "x..x..x.....", "....x....x..", "x.x.x.x.x.x."),
            grid("6/8", "x..x.x", "..x..x", "x.xx.x"),
            grid("2/4", "x..x..x.", "....x..x", "x.x.x.x."),
            grid("5/4", "x..x..x...x....x....", "....x..x....x..x....", "x.x.x.x.x.x.x.x.x.x."),
            grid("7/8", "xx.xx..", "...x..x", "xxxxxxx"),
        ],
    },
    DrumPattern {
        name: "Jazz",
        grids: &[
            grid("4/4", "x.....x.........", "....x.......x...", "x..x..x..x..x..x"),
            grid("3/4", "x.....x.....", "....x.......", "x..x..x..x.."),
            grid("6/8", "x.....", "...x..", "x..x.x"),
            grid("2/4", "x.....x.", "....x...", "x..x..x."),
            grid("5/4", "x.....x.....x.......", "....x.......x.......", "x..x..x..x..x..x..x."),
            grid("7/8", "x..x...", ".x..x.x", "x.xx.xx"),
        ],
    },
    DrumPattern {
        name: "Ballad",
        grids: &[
            grid("4/4", "x...........x...", "........x.......", "x...x...x...x..."),
            grid("3/4", "x...........", "....x.......", "x...x...x..."),
            grid("6/8", "x..x..", "......", "x..x.."),
            grid("2/4", "x.......", "....x...", "x...x..."),
            grid("5/4", "x...............x...", "........x...........", "x...x...x...x...x..."),
            grid("7/8", "x......", "..x....", "x.xx.xx"),
        ],
    },
    DrumPattern {
        name: "Latin",
        grids: &[
            grid("4/4", "x..x..x...x.x...", "......x.......x.", "x.x.x.x.x.x.x.x."),
            grid("3/4", "x..x..x.....", "......x.....", "x.x.x.x.x.x."),
            grid("6/8", "x..x.x", "..x...", "x.xx.x"),
            grid("2/4", "x..x..x.", "......x.", "x.x.x.x."),
            grid("5/4", "x..x..x...x.x..x....", "......x.......x.....", "x.x.x.x.x.x.x.x.x.x."),
            grid("7/8", "x.xx.x.", "..x..x.", "xxxxxxx"),
        ],
    },
    DrumPattern {
        name: "Reggae",
        grids: &[
            grid("4/4", "............x...", "....x.......x...", "..x...x...x...x."),
            grid("3/4", "........x...", "....x.......", "..x...x...x."),
            grid("6/8", "...x..", "...x..", ".x..x."),
            grid("2/4", "....x...", "....x...", "..x...x."),
            grid("5/4", "............x.......", "....x.......x.......", "..x...x...x...x...x."),
            grid("7/8", "....x..", "...xx..", ".xx.xxx"),
        ],
    },
];

pub fn find_drum_pattern(name: &str) -> Option<&'static DrumPattern> {
    DRUM_PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Schedule one drum hit at `time`.
pub fn schedule_drum<O: AudioOutput + ?Sized>(output: &mut O, sound: DrumSound, time: f64, volume: f64) {
    match sound {
        DrumSound::Kick => {
            output.schedule_tone(
                Tone::new(Waveform::Sine, 150.0, time, 0.3, volume).with_glide(40.0, 0.1),
            );
            // attack transient
            output.schedule_tone(Tone::new(Waveform::Sine, 80.0, time, 0.02, volume * 0.5));
        }
        DrumSound::Snare => {
            output.schedule_noise(NoiseBurst {
                start: time,
                duration: 0.15,
                gain: volume * 0.6,
                decay: 0.15,
                filters: vec![Filter::highpass(1000.0)],
            });
            output.schedule_tone(
                Tone::new(Waveform::Triangle, 180.0, time, 0.08, volume * 0.5).with_glide(100.0, 0.05),
            );
        }
        DrumSound::Hihat | DrumSound::HihatOpen => {
            let open = sound == DrumSound::HihatOpen;
            output.schedule_noise(NoiseBurst {
                start: time,
                duration: if open { 0.3 } else { 0.05 },
                gain: volume * 0.4,
                decay: if open { 0.25 } else { 0.04 },
                filters: vec![Filter::highpass(7000.0), Filter::bandpass(10000.0)],
            });
        }
    }
}
