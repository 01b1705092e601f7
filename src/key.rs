//! # Keys
//!
//! Key signatures, diatonic harmony and the chromatic chords a key commonly
//! borrows: secondary dominants and modal-interchange chords.
//!
//! Diatonic qualities always come from the major or *natural* minor scale, no
//! matter which scale is selected elsewhere in the UI.
//!
//! ## Example
//! ```rust
//! use fretlab::key::{get_diatonic_chords, get_secondary_dominants};
//!
//! assert_eq!(get_diatonic_chords("G", false), ["G", "Am", "Bm", "C", "D", "Em", "F♯°"]);
//!
//! let secondary = get_secondary_dominants("C", false);
//! assert_eq!(secondary[0].symbol, "V/ii");
//! assert_eq!(secondary[0].chord, "A7");
//! ```

use serde::Serialize;

use crate::pitch::{key_label, note_index, note_name, Spelling, CHROMATIC_FLATS, CHROMATIC_SHARPS};

pub const MAJOR_SCALE_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
pub const MAJOR_CHORD_QUALITIES: [&str; 7] = ["", "m", "m", "", "", "m", "°"];

pub const MINOR_SCALE_INTERVALS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
pub const MINOR_CHORD_QUALITIES: [&str; 7] = ["m", "°", "", "m", "m", "", ""];

pub const MAJOR_NUMERALS: [&str; 7] = ["I", "ii", "iii", "IV", "V", "vi", "vii°"];
pub const MINOR_NUMERALS: [&str; 7] = ["i", "ii°", "III", "iv", "v", "VI", "VII"];

/// Intervals and chord qualities of the major or natural-minor scale.
pub(crate) fn diatonic_tables(is_minor: bool) -> (&'static [u8; 7], &'static [&'static str; 7]) {
    if is_minor {
        (&MINOR_SCALE_INTERVALS, &MINOR_CHORD_QUALITIES)
    } else {
        (&MAJOR_SCALE_INTERVALS, &MAJOR_CHORD_QUALITIES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccidentalType {
    Sharp,
    Flat,
    None,
}

/// Accidentals of a major key and its relative minor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySignature {
    pub key: &'static str,
    pub relative_minor: &'static str,
    pub accidentals: &'static [&'static str],
    #[serde(rename = "type")]
    pub kind: AccidentalType,
}

const fn signature(
    key: &'static str,
    relative_minor: &'static str,
    accidentals: &'static [&'static str],
    kind: AccidentalType,
) -> KeySignature {
    KeySignature { key, relative_minor, accidentals, kind }
}

/// The twelve major keys, sharp side then flat side (enharmonic duplicates omitted).
pub const KEY_SIGNATURES: [KeySignature; 12] = [
    signature("C", "Am", &[], AccidentalType::None),
    signature("G", "Em", &["F♯"], AccidentalType::Sharp),
    signature("D", "Bm", &["F♯", "C♯"], AccidentalType::Sharp),
    signature("A", "F♯m", &["F♯", "C♯", "G♯"], AccidentalType::Sharp),
    signature("E", "C♯m", &["F♯", "C♯", "G♯", "D♯"], AccidentalType::Sharp),
    signature("B", "G♯m", &["F♯", "C♯", "G♯", "D♯", "A♯"], AccidentalType::Sharp),
    signature("F♯", "D♯m", &["F♯", "C♯", "G♯", "D♯", "A♯", "E♯"], AccidentalType::Sharp),
    signature("D♭", "B♭m", &["B♭", "E♭", "A♭", "D♭", "G♭"], AccidentalType::Flat),
    signature("A♭", "Fm", &["B♭", "E♭", "A♭", "D♭"], AccidentalType::Flat),
    signature("E♭", "Cm", &["B♭", "E♭", "A♭"], AccidentalType::Flat),
    signature("B♭", "Gm", &["B♭", "E♭"], AccidentalType::Flat),
    signature("F", "Dm", &["B♭"], AccidentalType::Flat),
];

pub fn get_key_signature(key: &str) -> Option<&'static KeySignature> {
    KEY_SIGNATURES.iter().find(|ks| ks.key == key)
}

/// The seven diatonic chords of `root` major or natural minor.
///
/// Returns an empty list for an unknown root.
pub fn get_diatonic_chords(root: &str, is_minor: bool) -> Vec<String> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let (intervals, qualities) = diatonic_tables(is_minor);
    let use_flats = Spelling::for_key(&key_label(root, is_minor)).use_flats();
    intervals
        .iter()
        .zip(qualities.iter())
        .map(|(&interval, quality)| {
            format!("{}{}", note_name(root_idx as i32 + interval as i32, use_flats), quality)
        })
        .collect()
}

/// Diatonic chords of one key, labelled with its key name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyChords {
    pub key: String,
    pub chords: Vec<String>,
}

const NATURAL_ROOTS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

fn build_key_chords(is_minor: bool) -> Vec<KeyChords> {
    NATURAL_ROOTS
        .iter()
        .map(|root| KeyChords {
            key: key_label(root, is_minor),
            chords: get_diatonic_chords(root, is_minor),
        })
        .collect()
}

/// Reference table of the major keys on natural roots.
pub fn major_key_chords() -> Vec<KeyChords> {
    build_key_chords(false)
}

/// Reference table of the natural-minor keys on natural roots.
pub fn minor_key_chords() -> Vec<KeyChords> {
    build_key_chords(true)
}

/// Major keys around the circle of fifths starting at C.
///
/// Positions past F♯ switch to flat names (D♭, A♭, ...).
pub fn circle_major() -> Vec<&'static str> {
    let mut idx = 0usize;
    (0..12)
        .map(|i| {
            let name = if i >= 7 { CHROMATIC_FLATS[idx] } else { CHROMATIC_SHARPS[idx] };
            idx = (idx + 7) % 12;
            name
        })
        .collect()
}

/// Relative minors aligned with [`circle_major`].
///
/// From the F♯/G♭ boundary on the minors are spelled with flats.
pub fn circle_minor() -> Vec<String> {
    circle_major()
        .iter()
        .enumerate()
        .filter_map(|(i, major)| {
            let major_idx = note_index(major)? as i32;
            Some(format!("{}m", note_name(major_idx - 3, i >= 6)))
        })
        .collect()
}

/// A dominant seventh that tonicizes a diatonic chord other than I.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryDominant {
    /// e.g. `V/ii`
    pub symbol: String,
    /// e.g. `A7`
    pub chord: String,
    /// e.g. `Dm`
    pub resolves_to: String,
}

/// Secondary dominants of every non-tonic, non-diminished degree.
pub fn get_secondary_dominants(root: &str, is_minor: bool) -> Vec<SecondaryDominant> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let (intervals, qualities) = diatonic_tables(is_minor);
    let numerals = if is_minor { &MINOR_NUMERALS } else { &MAJOR_NUMERALS };
    let use_flats = Spelling::for_key(&key_label(root, is_minor)).use_flats();

    (1..7)
        .filter(|&i| qualities[i] != "°")
        .map(|i| {
            let target = root_idx as i32 + intervals[i] as i32;
            SecondaryDominant {
                symbol: format!("V/{}", numerals[i]),
                chord: format!("{}7", note_name(target + 7, use_flats)),
                resolves_to: format!("{}{}", note_name(target, use_flats), qualities[i]),
            }
        })
        .collect()
}

/// A chord borrowed from the parallel key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowedChord {
    pub chord: String,
    pub source: &'static str,
    pub numeral: &'static str,
}

/// Modal-interchange chords: a fixed recipe, not a general computation.
///
/// Major keys borrow ♭III, iv, ♭VI and ♭VII from the parallel minor; minor keys
/// borrow IV and V from the parallel major.
pub fn get_borrowed_chords(root: &str, is_minor: bool) -> Vec<BorrowedChord> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let use_flats = Spelling::for_key(&key_label(root, is_minor)).use_flats();
    let chord = |offset: i32, suffix: &str| {
        format!("{}{}", note_name(root_idx as i32 + offset, use_flats), suffix)
    };

    if is_minor {
        let source = "Parallel Major";
        vec![
            BorrowedChord { chord: chord(5, ""), source, numeral: "IV" },
            BorrowedChord { chord: chord(7, ""), source, numeral: "V" },
        ]
    } else {
        let source = "Parallel Minor";
        vec![
            BorrowedChord { chord: chord(3, ""), source, numeral: "♭III" },
            BorrowedChord { chord: chord(5, "m"), source, numeral: "iv" },
            BorrowedChord { chord: chord(8, ""), source, numeral: "♭VI" },
            BorrowedChord { chord: chord(10, ""), source, numeral: "♭VII" },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diatonic_major_and_minor() {
        assert_eq!(get_diatonic_chords("C", false), ["C", "Dm", "Em", "F", "G", "Am", "B°"]);
        assert_eq!(get_diatonic_chords("A", true), ["Am", "B°", "C", "Dm", "Em", "F", "G"]);
        assert_eq!(get_diatonic_chords("D", true), ["Dm", "E°", "F", "Gm", "Am", "B♭", "C"]);
        assert_eq!(get_diatonic_chords("B♭", false), ["B♭", "Cm", "Dm", "E♭", "F", "Gm", "A°"]);
    }

    #[test]
    fn test_diatonic_unknown_root() {
        assert!(get_diatonic_chords("X", false).is_empty());
    }

    #[test]
    fn test_key_signatures() {
        assert_eq!(KEY_SIGNATURES.len(), 12);
        let a = get_key_signature("A").unwrap();
        assert_eq!(a.accidentals, ["F♯", "C♯", "G♯"]);
        assert_eq!(a.relative_minor, "F♯m");
        let db = get_key_signature("D♭").unwrap();
        assert_eq!(db.accidentals, ["B♭", "E♭", "A♭", "D♭", "G♭"]);
        assert_eq!(db.kind, AccidentalType::Flat);
        assert_eq!(get_key_signature("C").unwrap().kind, AccidentalType::None);
        assert!(get_key_signature("G♭").is_none());
    }

    #[test]
    fn test_circle_of_fifths() {
        assert_eq!(
            circle_major(),
            ["C", "G", "D", "A", "E", "B", "F♯", "D♭", "A♭", "E♭", "B♭", "F"]
        );
        assert_eq!(
            circle_minor(),
            ["Am", "Em", "Bm", "F♯m", "C♯m", "G♯m", "E♭m", "B♭m", "Fm", "Cm", "Gm", "Dm"]
        );
    }

    #[test]
    fn test_key_chord_tables() {
        let majors = major_key_chords();
        assert_eq!(majors.len(), 7);
        assert_eq!(majors[3].key, "F");
        assert_eq!(majors[3].chords[3], "B♭");
        let minors = minor_key_chords();
        assert_eq!(minors[0].key, "Cm");
        assert_eq!(minors[0].chords, ["Cm", "D°", "E♭", "Fm", "Gm", "A♭", "B♭"]);
    }

    #[test]
    fn test_secondary_dominants_major() {
        let result = get_secondary_dominants("C", false);
        let symbols: Vec<&str> = result.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["V/ii", "V/iii", "V/IV", "V/V", "V/vi"]);
        assert_eq!(
            result[0],
            SecondaryDominant {
                symbol: "V/ii".to_string(),
                chord: "A7".to_string(),
                resolves_to: "Dm".to_string(),
            }
        );
        assert_eq!(result[3].chord, "D7");
        assert_eq!(result[3].resolves_to, "G");
    }

    #[test]
    fn test_secondary_dominants_minor_skip_diminished() {
        let result = get_secondary_dominants("A", true);
        let symbols: Vec<&str> = result.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["V/III", "V/iv", "V/v", "V/VI", "V/VII"]);
        assert_eq!(result[0].chord, "G7");
        assert_eq!(result[0].resolves_to, "C");
    }

    #[test]
    fn test_borrowed_chords() {
        let major: Vec<String> = get_borrowed_chords("C", false).into_iter().map(|b| b.chord).collect();
        assert_eq!(major, ["D♯", "Fm", "G♯", "A♯"]);
        let f_major: Vec<String> = get_borrowed_chords("F", false).into_iter().map(|b| b.chord).collect();
        assert_eq!(f_major, ["A♭", "B♭m", "D♭", "E♭"]);
        let minor = get_borrowed_chords("A", true);
        assert_eq!(minor.len(), 2);
        assert_eq!(minor[0].chord, "D");
        assert_eq!(minor[1].chord, "E");
        assert_eq!(minor[1].source, "Parallel Major");
    }
}
