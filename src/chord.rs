//! # Chords
//!
//! Interval formulas, formula resolution, chord tones and inversions.
//!
//! A formula is a comma-separated list of interval tokens (`"1, ♭3, 5"`). Tokens
//! map to semitones through a fixed table that reaches up to the 13th; a token
//! outside the table is passed through as text so a malformed catalog entry
//! still renders.
//!
//! ## Example
//! ```rust
//! use fretlab::chord::{get_chord_inversions, resolve_chord_formula};
//!
//! let notes = resolve_chord_formula("C", "1, 3, 5");
//! assert_eq!(notes, ["C", "E", "G"]);
//!
//! let inversions = get_chord_inversions("C", &notes);
//! assert_eq!(inversions[1].slash_notation, "C/E");
//! assert_eq!(inversions[1].notes, ["E", "G", "C"]);
//! ```

use serde::Serialize;

use crate::pitch::{note_index, note_name, Spelling};

/// A named interval formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChordFormula {
    pub name: &'static str,
    pub formula: &'static str,
}

const fn formula(name: &'static str, formula: &'static str) -> ChordFormula {
    ChordFormula { name, formula }
}

pub const CHORD_FORMULAS: [ChordFormula; 21] = [
    formula("Major", "1, 3, 5"),
    formula("Minor", "1, ♭3, 5"),
    formula("Power (5)", "1, 5"),
    formula("Sus2", "1, 2, 5"),
    formula("Sus4", "1, 4, 5"),
    formula("Dominant 7", "1, 3, 5, ♭7"),
    formula("Major 7", "1, 3, 5, 7"),
    formula("Minor 7", "1, ♭3, 5, ♭7"),
    formula("Minor/Major 7", "1, ♭3, 5, 7"),
    formula("7sus4", "1, 4, 5, ♭7"),
    formula("6", "1, 3, 5, 6"),
    formula("Minor 6", "1, ♭3, 5, 6"),
    formula("9", "1, 3, 5, ♭7, 9"),
    formula("Major 9", "1, 3, 5, 7, 9"),
    formula("Minor 9", "1, ♭3, 5, ♭7, 9"),
    formula("Add9", "1, 3, 5, 9"),
    formula("Diminished", "1, ♭3, ♭5"),
    formula("Diminished 7", "1, ♭3, ♭5, 6"),
    formula("Half-Dim (m7♭5)", "1, ♭3, ♭5, ♭7"),
    formula("Augmented", "1, 3, ♯5"),
    formula("Aug 7", "1, 3, ♯5, ♭7"),
];

pub fn find_chord_formula(name: &str) -> Option<&'static ChordFormula> {
    CHORD_FORMULAS.iter().find(|f| f.name == name)
}

/// Semitones above the root for an interval token.
pub fn interval_semitones(token: &str) -> Option<u8> {
    let semitones = match token {
        "1" => 0,
        "♭2" => 1,
        "2" => 2,
        "♭3" => 3,
        "3" => 4,
        "4" => 5,
        "♭5" => 6,
        "5" => 7,
        "♯5" => 8,
        "6" => 9,
        "♭7" => 10,
        "7" => 11,
        "♭9" => 13,
        "9" => 14,
        "♯9" => 15,
        "11" => 17,
        "♯11" => 18,
        "♭13" => 20,
        "13" => 21,
        _ => return None,
    };
    Some(semitones)
}

/// Interval tokens of a formula string, trimmed.
pub fn formula_tokens(formula: &str) -> Vec<&str> {
    formula.split(',').map(str::trim).collect()
}

/// Concrete note names of `formula` built on `root`.
///
/// Unknown tokens pass through as written. An unknown root resolves nothing and
/// returns an empty list.
pub fn resolve_chord_formula(root: &str, formula: &str) -> Vec<String> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let use_flats = Spelling::for_root(root).use_flats();
    formula_tokens(formula)
        .into_iter()
        .map(|token| match interval_semitones(token) {
            Some(semitones) => note_name(root_idx as i32 + semitones as i32, use_flats).to_string(),
            None => token.to_string(),
        })
        .collect()
}

/// Split a chord name into root and quality suffix (`"F♯m7"` → `("F♯", "m7")`).
pub fn parse_chord_name(name: &str) -> Option<(&str, &str)> {
    let mut chars = name.char_indices();
    match chars.next() {
        Some((_, 'A'..='G')) => {}
        _ => return None,
    }
    let split = match chars.next() {
        Some((i, c @ ('♯' | '♭'))) => i + c.len_utf8(),
        Some((i, _)) => i,
        None => name.len(),
    };
    Some(name.split_at(split))
}

/// Formula name for a chord quality suffix, for the qualities the chord view knows.
pub fn quality_formula_name(quality: &str) -> Option<&'static str> {
    let name = match quality {
        "" => "Major",
        "m" => "Minor",
        "7" => "Dominant 7",
        "maj7" => "Major 7",
        "m7" => "Minor 7",
        "m7♭5" => "Half-Dim (m7♭5)",
        "°" => "Diminished",
        "°7" => "Diminished 7",
        "+" => "Augmented",
        "sus2" => "Sus2",
        "sus4" => "Sus4",
        "6" => "6",
        "m6" => "Minor 6",
        "9" => "9",
        "maj9" => "Major 9",
        "m9" => "Minor 9",
        "add9" => "Add9",
        "5" => "Power (5)",
        _ => return None,
    };
    Some(name)
}

/// A chord resolved to its tones, each labelled with its interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordTones {
    pub root: String,
    pub quality: String,
    pub formula_name: &'static str,
    pub formula: &'static str,
    pub notes: Vec<String>,
    pub labels: Vec<&'static str>,
}

/// Chord tones of a chord name such as `"Am7"`, or `None` for an unknown quality.
pub fn get_chord_tones(chord_name: &str) -> Option<ChordTones> {
    let (root, quality) = parse_chord_name(chord_name)?;
    let chord_formula = find_chord_formula(quality_formula_name(quality)?)?;
    Some(ChordTones {
        root: root.to_string(),
        quality: quality.to_string(),
        formula_name: chord_formula.name,
        formula: chord_formula.formula,
        notes: resolve_chord_formula(root, chord_formula.formula),
        labels: formula_tokens(chord_formula.formula),
    })
}

/// One rotation of a chord's tones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordInversion {
    pub inversion_number: usize,
    pub label: String,
    pub slash_notation: String,
    pub bass_note: String,
    pub notes: Vec<String>,
}

fn inversion_label(i: usize) -> String {
    match i {
        0 => "Root Position".to_string(),
        1 => "1st Inversion".to_string(),
        2 => "2nd Inversion".to_string(),
        3 => "3rd Inversion".to_string(),
        4 => "4th Inversion".to_string(),
        _ => format!("{}th Inversion", i),
    }
}

/// Every rotation of `notes`, root position first. Fewer than two notes have no
/// inversions.
pub fn get_chord_inversions<S: AsRef<str>>(chord_name: &str, notes: &[S]) -> Vec<ChordInversion> {
    if notes.len() < 2 {
        return Vec::new();
    }
    let notes: Vec<String> = notes.iter().map(|n| n.as_ref().to_string()).collect();
    (0..notes.len())
        .map(|i| {
            let bass_note = notes[i].clone();
            let mut reordered = notes.clone();
            reordered.rotate_left(i);
            ChordInversion {
                inversion_number: i,
                label: inversion_label(i),
                slash_notation: if i == 0 {
                    chord_name.to_string()
                } else {
                    format!("{}/{}", chord_name, bass_note)
                },
                bass_note,
                notes: reordered,
            }
        })
        .collect()
}

/// Split `"C/E"` into chord and bass. Both halves must be non-empty.
pub fn parse_slash_chord(name: &str) -> Option<(&str, &str)> {
    let (chord, bass) = name.split_once('/')?;
    if chord.is_empty() || bass.is_empty() {
        return None;
    }
    Some((chord, bass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_formula_spelling() {
        assert_eq!(resolve_chord_formula("A", "1, ♭3, 5, ♭7"), ["A", "C", "E", "G"]);
        // D major resolves with flats because D minor is a flat key
        assert_eq!(resolve_chord_formula("D", "1, 3, 5"), ["D", "G♭", "A"]);
        assert_eq!(resolve_chord_formula("E", "1, 3, 5, ♭7, 9"), ["E", "G♯", "B", "D", "F♯"]);
    }

    #[test]
    fn test_resolve_formula_unknown_token_passes_through() {
        assert_eq!(resolve_chord_formula("C", "1, 3, x, 5"), ["C", "E", "x", "G"]);
        assert!(resolve_chord_formula("H", "1, 3, 5").is_empty());
    }

    #[test]
    fn test_compound_intervals() {
        assert_eq!(interval_semitones("13"), Some(21));
        assert_eq!(interval_semitones("♯11"), Some(18));
        assert_eq!(interval_semitones("#11"), None);
        // C resolves with flats because C minor is a flat key
        assert_eq!(resolve_chord_formula("C", "1, ♭9, ♯9, 11, ♭13"), ["C", "D♭", "E♭", "F", "A♭"]);
    }

    #[test]
    fn test_parse_chord_name() {
        assert_eq!(parse_chord_name("C"), Some(("C", "")));
        assert_eq!(parse_chord_name("F♯m7♭5"), Some(("F♯", "m7♭5")));
        assert_eq!(parse_chord_name("B♭maj7"), Some(("B♭", "maj7")));
        assert_eq!(parse_chord_name("Am"), Some(("A", "m")));
        assert_eq!(parse_chord_name("H7"), None);
        assert_eq!(parse_chord_name(""), None);
    }

    #[test]
    fn test_chord_tones() {
        let tones = get_chord_tones("Am7").unwrap();
        assert_eq!(tones.root, "A");
        assert_eq!(tones.formula_name, "Minor 7");
        assert_eq!(tones.notes, ["A", "C", "E", "G"]);
        assert_eq!(tones.labels, ["1", "♭3", "5", "♭7"]);

        let dim = get_chord_tones("B°7").unwrap();
        assert_eq!(dim.notes, ["B", "D", "F", "G♯"]);

        assert!(get_chord_tones("C13").is_none());
        assert!(get_chord_tones("X").is_none());
    }

    #[test]
    fn test_formula_catalog_tokens_all_known() {
        assert_eq!(CHORD_FORMULAS.len(), 21);
        for f in CHORD_FORMULAS.iter() {
            for token in formula_tokens(f.formula) {
                assert!(interval_semitones(token).is_some(), "{}: {}", f.name, token);
            }
        }
    }

    #[test]
    fn test_inversions() {
        let inversions = get_chord_inversions("G7", &["G", "B", "D", "F"]);
        assert_eq!(inversions.len(), 4);
        assert_eq!(inversions[0].label, "Root Position");
        assert_eq!(inversions[0].slash_notation, "G7");
        assert_eq!(inversions[3].label, "3rd Inversion");
        assert_eq!(inversions[3].slash_notation, "G7/F");
        assert_eq!(inversions[3].notes, ["F", "G", "B", "D"]);
        assert_eq!(inversions[2].bass_note, "D");
    }

    #[test]
    fn test_inversion_labels_past_fourth() {
        let notes = ["C", "E", "G", "B♭", "D", "F", "A"];
        let inversions = get_chord_inversions("C13", &notes);
        assert_eq!(inversions[4].label, "4th Inversion");
        assert_eq!(inversions[5].label, "5th Inversion");
        assert_eq!(inversions[6].label, "6th Inversion");
    }

    #[test]
    fn test_inversions_need_two_notes() {
        assert!(get_chord_inversions("C", &["C"]).is_empty());
        assert!(get_chord_inversions::<&str>("C", &[]).is_empty());
    }

    #[test]
    fn test_parse_slash_chord() {
        assert_eq!(parse_slash_chord("C/E"), Some(("C", "E")));
        assert_eq!(parse_slash_chord("Am7/G"), Some(("Am7", "G")));
        assert_eq!(parse_slash_chord("C"), None);
        assert_eq!(parse_slash_chord("/E"), None);
        assert_eq!(parse_slash_chord("C/"), None);
    }
}
