//! # Scales
//!
//! Static scale catalog and the derivations built on it: spelled scale notes
//! and the seven diatonic triads of a heptatonic scale.
//!
//! ## Example
//! ```rust
//! use fretlab::scale::{find_scale, get_scale_notes, get_scale_triads};
//!
//! let dorian = find_scale("Dorian").unwrap();
//! assert_eq!(get_scale_notes("D", dorian.intervals), ["D", "E", "F", "G", "A", "B", "C"]);
//!
//! let triads = get_scale_triads("C", dorian.intervals).unwrap();
//! assert_eq!(triads[0].chord_name, "Cm");
//! assert_eq!(triads[0].numeral, "i");
//! ```

use serde::Serialize;

use crate::pitch::{note_index, note_name, Spelling};

/// Scale family, used to group the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScaleCategory {
    Diatonic,
    Pentatonic,
    Blues,
    Mode,
    Harmonic,
    Melodic,
    Exotic,
}

/// A named interval pattern. Intervals ascend from 0 (the root).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleDefinition {
    pub name: &'static str,
    pub category: ScaleCategory,
    pub intervals: &'static [u8],
}

const fn scale(name: &'static str, category: ScaleCategory, intervals: &'static [u8]) -> ScaleDefinition {
    ScaleDefinition { name, category, intervals }
}

pub const SCALE_DEFINITIONS: &[ScaleDefinition] = &[
    scale("Major", ScaleCategory::Diatonic, &[0, 2, 4, 5, 7, 9, 11]),
    scale("Natural Minor", ScaleCategory::Diatonic, &[0, 2, 3, 5, 7, 8, 10]),
    scale("Pentatonic Major", ScaleCategory::Pentatonic, &[0, 2, 4, 7, 9]),
    scale("Pentatonic Minor", ScaleCategory::Pentatonic, &[0, 3, 5, 7, 10]),
    scale("Blues Major", ScaleCategory::Blues, &[0, 2, 3, 4, 7, 9]),
    scale("Blues Minor", ScaleCategory::Blues, &[0, 3, 5, 6, 7, 10]),
    scale("Ionian", ScaleCategory::Mode, &[0, 2, 4, 5, 7, 9, 11]),
    scale("Dorian", ScaleCategory::Mode, &[0, 2, 3, 5, 7, 9, 10]),
    scale("Phrygian", ScaleCategory::Mode, &[0, 1, 3, 5, 7, 8, 10]),
    scale("Lydian", ScaleCategory::Mode, &[0, 2, 4, 6, 7, 9, 11]),
    scale("Mixolydian", ScaleCategory::Mode, &[0, 2, 4, 5, 7, 9, 10]),
    scale("Aeolian", ScaleCategory::Mode, &[0, 2, 3, 5, 7, 8, 10]),
    scale("Locrian", ScaleCategory::Mode, &[0, 1, 3, 5, 6, 8, 10]),
    scale("Harmonic Minor", ScaleCategory::Harmonic, &[0, 2, 3, 5, 7, 8, 11]),
    scale("Harmonic Major", ScaleCategory::Harmonic, &[0, 2, 4, 5, 7, 8, 11]),
    scale("Double Harmonic", ScaleCategory::Harmonic, &[0, 1, 4, 5, 7, 8, 11]),
    scale("Phrygian Dominant", ScaleCategory::Harmonic, &[0, 1, 4, 5, 7, 8, 10]),
    scale("Melodic Minor", ScaleCategory::Melodic, &[0, 2, 3, 5, 7, 9, 11]),
    scale("Lydian Dominant", ScaleCategory::Melodic, &[0, 2, 4, 6, 7, 9, 10]),
    scale("Super Locrian", ScaleCategory::Melodic, &[0, 1, 3, 4, 6, 8, 10]),
    scale("Lydian Augmented", ScaleCategory::Melodic, &[0, 2, 4, 6, 8, 9, 11]),
    scale("Hungarian Minor", ScaleCategory::Exotic, &[0, 2, 3, 6, 7, 8, 11]),
    scale("Neapolitan Minor", ScaleCategory::Exotic, &[0, 1, 3, 5, 7, 8, 11]),
    scale("Neapolitan Major", ScaleCategory::Exotic, &[0, 1, 3, 5, 7, 9, 11]),
    scale("Enigmatic", ScaleCategory::Exotic, &[0, 1, 4, 6, 8, 10, 11]),
    scale("Whole Tone", ScaleCategory::Exotic, &[0, 2, 4, 6, 8, 10]),
    scale("Diminished HW", ScaleCategory::Exotic, &[0, 1, 3, 4, 6, 7, 9, 10]),
    scale("Diminished WH", ScaleCategory::Exotic, &[0, 2, 3, 5, 6, 8, 9, 11]),
];

/// Look up a catalog scale by exact name.
pub fn find_scale(name: &str) -> Option<&'static ScaleDefinition> {
    SCALE_DEFINITIONS.iter().find(|s| s.name == name)
}

/// Triad quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl TriadQuality {
    /// Classify by (third, fifth) interval above the root.
    ///
    /// Only the four tertian pairs are recognised; everything else reads as major.
    pub fn from_intervals(third: i32, fifth: i32) -> Self {
        match (third.rem_euclid(12), fifth.rem_euclid(12)) {
            (4, 8) => TriadQuality::Augmented,
            (3, 6) => TriadQuality::Diminished,
            (3, 7) => TriadQuality::Minor,
            _ => TriadQuality::Major,
        }
    }

    /// Chord-symbol suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            TriadQuality::Major => "",
            TriadQuality::Minor => "m",
            TriadQuality::Diminished => "°",
            TriadQuality::Augmented => "+",
        }
    }
}

const UPPER_ROMAN: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
const LOWER_ROMAN: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

/// One triad built on a scale degree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTriad {
    /// 1-based degree
    pub degree: usize,
    pub root: String,
    pub quality: TriadQuality,
    pub chord_name: String,
    pub numeral: String,
}

/// Spell every scale tone of `root` + `intervals`, in interval order.
///
/// Returns an empty list for an unknown root.
pub fn get_scale_notes(root: &str, intervals: &[u8]) -> Vec<String> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let use_flats = Spelling::for_root(root).use_flats();
    intervals
        .iter()
        .map(|&i| note_name(root_idx as i32 + i as i32, use_flats).to_string())
        .collect()
}

/// Stack thirds on each degree of a seven-note scale.
///
/// Returns `None` unless `intervals` has exactly seven entries and `root` is a
/// known note.
pub fn get_scale_triads(root: &str, intervals: &[u8]) -> Option<Vec<ScaleTriad>> {
    if intervals.len() != 7 {
        return None;
    }
    let root_idx = note_index(root)? as i32;
    let use_flats = Spelling::for_root(root).use_flats();

    // Absolute semitone of degree `i`, lifted an octave when the index wraps.
    let degree_semitone = |i: usize| -> i32 {
        let octave = if i >= 7 { 12 } else { 0 };
        root_idx + intervals[i % 7] as i32 + octave
    };

    let triads = (0..7)
        .map(|i| {
            let chord_root = degree_semitone(i);
            let third = degree_semitone(i + 2);
            let fifth = degree_semitone(i + 4);
            let quality = TriadQuality::from_intervals(third - chord_root, fifth - chord_root);

            let root_name = note_name(chord_root, use_flats).to_string();
            let roman = match quality {
                TriadQuality::Minor | TriadQuality::Diminished => LOWER_ROMAN[i],
                TriadQuality::Major | TriadQuality::Augmented => UPPER_ROMAN[i],
            };
            let numeral_mark = match quality {
                TriadQuality::Diminished => "°",
                TriadQuality::Augmented => "+",
                _ => "",
            };

            ScaleTriad {
                degree: i + 1,
                chord_name: format!("{}{}", root_name, quality.suffix()),
                root: root_name,
                quality,
                numeral: format!("{}{}", roman, numeral_mark),
            }
        })
        .collect();

    Some(triads)
}
