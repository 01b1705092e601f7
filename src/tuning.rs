//! # Tunings and Fretboard
//!
//! Instrument definitions, their tuning catalogs, and the note grid a tuning
//! produces on the neck.
//!
//! String lists run high to low (display order, first string on top), for both
//! note names and MIDI numbers.
//!
//! ## Example
//! ```rust
//! use fretlab::tuning::{build_fretboard_for_tuning, get_tuning_for_instrument, InstrumentId};
//!
//! let drop_d = get_tuning_for_instrument(InstrumentId::Guitar, "Drop D");
//! assert!(!drop_d.is_standard_interval());
//!
//! let board = build_fretboard_for_tuning(&drop_d.notes, 12);
//! assert_eq!(board[5][2], "E");
//! ```

use serde::{Deserialize, Serialize};

use crate::pitch::{note_index, CHROMATIC_SHARPS};

/// Frets drawn when no instrument override applies.
pub const NUM_FRETS: usize = 21;

/// Frets that carry an inlay marker.
pub const FRET_MARKERS: [usize; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 24];

/// Semitone gaps between adjacent strings of standard guitar tuning, low to high.
pub const STANDARD_INTERVALS: [i32; 5] = [5, 5, 5, 4, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TuningCategory {
    Standard,
    Drop,
    Open,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentTuning {
    pub name: String,
    pub category: TuningCategory,
    pub notes: Vec<String>,
    pub midi_notes: Vec<u8>,
}

impl InstrumentTuning {
    /// Whether the tuning has the guitar's 5-5-5-4-5 string spacing.
    ///
    /// CAGED boxes and the voicing templates only hold for such tunings.
    pub fn is_standard_interval(&self) -> bool {
        is_standard_interval_tuning(&self.midi_notes)
    }

    pub fn string_count(&self) -> usize {
        self.notes.len()
    }
}

struct TuningDef {
    name: &'static str,
    category: TuningCategory,
    notes: &'static [&'static str],
    midi_notes: &'static [u8],
}

impl TuningDef {
    fn build(&self) -> InstrumentTuning {
        InstrumentTuning {
            name: self.name.to_string(),
            category: self.category,
            notes: self.notes.iter().map(|n| n.to_string()).collect(),
            midi_notes: self.midi_notes.to_vec(),
        }
    }
}

const GUITAR_TUNINGS: [TuningDef; 9] = [
    TuningDef {
        name: "Standard",
        category: TuningCategory::Standard,
        notes: &["E", "B", "G", "D", "A", "E"],
        midi_notes: &[64, 59, 55, 50, 45, 40],
    },
    TuningDef {
        name: "Half-Step Down",
        category: TuningCategory::Standard,
        notes: &["D♯", "A♯", "F♯", "C♯", "G♯", "D♯"],
        midi_notes: &[63, 58, 54, 49, 44, 39],
    },
    TuningDef {
        name: "Full-Step Down",
        category: TuningCategory::Standard,
        notes: &["D", "A", "F", "C", "G", "D"],
        midi_notes: &[62, 57, 53, 48, 43, 38],
    },
    TuningDef {
        name: "Drop D",
        category: TuningCategory::Drop,
        notes: &["E", "B", "G", "D", "A", "D"],
        midi_notes: &[64, 59, 55, 50, 45, 38],
    },
    TuningDef {
        name: "Drop C",
        category: TuningCategory::Drop,
        notes: &["D", "A", "F", "C", "G", "C"],
        midi_notes: &[62, 57, 53, 48, 43, 36],
    },
    TuningDef {
        name: "Open G",
        category: TuningCategory::Open,
        notes: &["D", "B", "G", "D", "G", "D"],
        midi_notes: &[62, 59, 55, 50, 43, 38],
    },
    TuningDef {
        name: "Open D",
        category: TuningCategory::Open,
        notes: &["D", "A", "F♯", "D", "A", "D"],
        midi_notes: &[62, 57, 54, 50, 45, 38],
    },
    TuningDef {
        name: "Open E",
        category: TuningCategory::Open,
        notes: &["E", "B", "G♯", "E", "B", "E"],
        midi_notes: &[64, 59, 56, 52, 47, 40],
    },
    TuningDef {
        name: "DADGAD",
        category: TuningCategory::Other,
        notes: &["D", "A", "G", "D", "A", "D"],
        midi_notes: &[62, 57, 55, 50, 45, 38],
    },
];

const BASS_TUNINGS: [TuningDef; 5] = [
    TuningDef {
        name: "Standard",
        category: TuningCategory::Standard,
        notes: &["G", "D", "A", "E"],
        midi_notes: &[43, 38, 33, 28],
    },
    TuningDef {
        name: "Half-Step Down",
        category: TuningCategory::Standard,
        notes: &["F♯", "C♯", "G♯", "D♯"],
        midi_notes: &[42, 37, 32, 27],
    },
    TuningDef {
        name: "Drop D",
        category: TuningCategory::Drop,
        notes: &["G", "D", "A", "D"],
        midi_notes: &[43, 38, 33, 26],
    },
    TuningDef {
        name: "D Standard",
        category: TuningCategory::Standard,
        notes: &["F", "C", "G", "D"],
        midi_notes: &[41, 36, 31, 26],
    },
    TuningDef {
        name: "Drop C",
        category: TuningCategory::Drop,
        notes: &["F", "C", "G", "C"],
        midi_notes: &[41, 36, 31, 24],
    },
];

/// Six-string guitar tunings, Standard first.
pub fn guitar_tunings() -> Vec<InstrumentTuning> {
    GUITAR_TUNINGS.iter().map(TuningDef::build).collect()
}

/// Four-string bass tunings, Standard first.
pub fn bass_tunings() -> Vec<InstrumentTuning> {
    BASS_TUNINGS.iter().map(TuningDef::build).collect()
}

pub fn standard_tuning() -> InstrumentTuning {
    GUITAR_TUNINGS[0].build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentId {
    Guitar,
    Bass,
}

impl InstrumentId {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "guitar" => Some(InstrumentId::Guitar),
            "bass" => Some(InstrumentId::Bass),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentId::Guitar => "guitar",
            InstrumentId::Bass => "bass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: InstrumentId,
    pub label: &'static str,
    pub string_count: usize,
    pub default_frets: usize,
    pub tunings: Vec<InstrumentTuning>,
    pub default_tuning_name: &'static str,
    pub supports_caged: bool,
    pub has_chord_voicings: bool,
}

impl Instrument {
    pub fn find_tuning(&self, name: &str) -> Option<&InstrumentTuning> {
        self.tunings.iter().find(|t| t.name == name)
    }
}

pub fn get_instrument(id: InstrumentId) -> Instrument {
    match id {
        InstrumentId::Guitar => Instrument {
            id,
            label: "Guitar",
            string_count: 6,
            default_frets: 24,
            tunings: guitar_tunings(),
            default_tuning_name: "Standard",
            supports_caged: true,
            has_chord_voicings: true,
        },
        InstrumentId::Bass => Instrument {
            id,
            label: "Bass",
            string_count: 4,
            default_frets: 20,
            tunings: bass_tunings(),
            default_tuning_name: "Standard",
            supports_caged: false,
            has_chord_voicings: false,
        },
    }
}

/// Tuning by name, falling back to the instrument's default tuning.
pub fn get_tuning_for_instrument(id: InstrumentId, tuning_name: &str) -> InstrumentTuning {
    let mut instrument = get_instrument(id);
    let idx = instrument
        .tunings
        .iter()
        .position(|t| t.name == tuning_name)
        .or_else(|| {
            instrument
                .tunings
                .iter()
                .position(|t| t.name == instrument.default_tuning_name)
        })
        .unwrap_or(0);
    instrument.tunings.swap_remove(idx)
}

/// A user-entered tuning. Notes and MIDI numbers are kept as given.
pub fn build_custom_tuning(notes: Vec<String>, midi_notes: Vec<u8>) -> InstrumentTuning {
    InstrumentTuning {
        name: "Custom".to_string(),
        category: TuningCategory::Other,
        notes,
        midi_notes,
    }
}

/// True when six high-to-low MIDI notes are spaced 5-5-5-4-5 from the low string up.
pub fn is_standard_interval_tuning(midi_notes: &[u8]) -> bool {
    if midi_notes.len() != 6 {
        return false;
    }
    let low_to_high: Vec<i32> = midi_notes.iter().rev().map(|&m| m as i32).collect();
    low_to_high
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .eq(STANDARD_INTERVALS.iter().copied())
}

/// Sharp-spelled note names for frets `0..=fret_count` of every string.
///
/// A string whose open note is not a known name gets an empty row so rows stay
/// aligned with strings.
pub fn build_fretboard_for_tuning<S: AsRef<str>>(tuning_notes: &[S], fret_count: usize) -> Vec<Vec<&'static str>> {
    tuning_notes
        .iter()
        .map(|open| match note_index(open.as_ref()) {
            Some(start) => (0..=fret_count)
                .map(|fret| CHROMATIC_SHARPS[(start as usize + fret) % 12])
                .collect(),
            None => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_shapes() {
        for tuning in guitar_tunings() {
            assert_eq!(tuning.notes.len(), 6, "{}", tuning.name);
            assert_eq!(tuning.midi_notes.len(), 6, "{}", tuning.name);
            for (note, midi) in tuning.notes.iter().zip(&tuning.midi_notes) {
                assert_eq!(note_index(note), Some(midi % 12), "{} {}", tuning.name, note);
            }
        }
        for tuning in bass_tunings() {
            assert_eq!(tuning.string_count(), 4);
            for (note, midi) in tuning.notes.iter().zip(&tuning.midi_notes) {
                assert_eq!(note_index(note), Some(midi % 12), "{} {}", tuning.name, note);
            }
        }
    }

    #[test]
    fn test_standard_interval_tunings() {
        let standard: Vec<String> = guitar_tunings()
            .into_iter()
            .filter(|t| t.is_standard_interval())
            .map(|t| t.name)
            .collect();
        assert_eq!(standard, ["Standard", "Half-Step Down", "Full-Step Down"]);
        assert!(!is_standard_interval_tuning(&[43, 38, 33, 28]));
    }

    #[test]
    fn test_tuning_fallback_chain() {
        assert_eq!(get_tuning_for_instrument(InstrumentId::Guitar, "DADGAD").name, "DADGAD");
        assert_eq!(get_tuning_for_instrument(InstrumentId::Bass, "D Standard").midi_notes, [41, 36, 31, 26]);
        // DADGAD is guitar only
        let bass = get_tuning_for_instrument(InstrumentId::Bass, "DADGAD");
        assert_eq!(bass.name, "Standard");
        assert_eq!(bass.notes, ["G", "D", "A", "E"]);
    }

    #[test]
    fn test_instruments() {
        let guitar = get_instrument(InstrumentId::Guitar);
        assert_eq!(guitar.default_frets, 24);
        assert!(guitar.supports_caged && guitar.has_chord_voicings);
        let bass = get_instrument(InstrumentId::Bass);
        assert_eq!(bass.string_count, 4);
        assert!(!bass.supports_caged && !bass.has_chord_voicings);
        assert!(bass.find_tuning("Drop C").is_some());
        assert_eq!(InstrumentId::parse("bass"), Some(InstrumentId::Bass));
        assert_eq!(InstrumentId::parse("banjo"), None);
    }

    #[test]
    fn test_fretboard_grid() {
        let board = build_fretboard_for_tuning(&["E", "B", "G", "D", "A", "E"], NUM_FRETS);
        assert_eq!(board.len(), 6);
        assert!(board.iter().all(|row| row.len() == NUM_FRETS + 1));
        assert_eq!(board[0][0], "E");
        assert_eq!(board[0][1], "F");
        assert_eq!(board[0][12], "E");
        assert_eq!(board[1][1], "C");
        assert_eq!(board[4][3], "C");
    }

    #[test]
    fn test_fretboard_wraps_and_spells_sharps() {
        let board = build_fretboard_for_tuning(&["B♭", "nope"], 3);
        assert_eq!(board[0], ["A♯", "B", "C", "C♯"]);
        assert!(board[1].is_empty());
    }

    #[test]
    fn test_custom_tuning() {
        let custom = build_custom_tuning(
            ["E", "B", "G", "D", "A", "E"].iter().map(|s| s.to_string()).collect(),
            vec![64, 59, 55, 50, 45, 40],
        );
        assert_eq!(custom.name, "Custom");
        assert_eq!(custom.category, TuningCategory::Other);
        assert!(custom.is_standard_interval());
    }
}
