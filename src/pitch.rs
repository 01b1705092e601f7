//! # Pitch Space
//!
//! Chromatic note naming, enharmonic spelling and semitone arithmetic.
//!
//! A note's identity is its pitch class (semitone 0-11 above C). Whether it is
//! displayed as `C♯` or `D♭` is decided by the key being rendered, never stored
//! with the note. Spelling follows a fixed table of "flat" key labels taken from
//! the flat side of the circle of fifths; it is not derived from accidental counts.
//!
//! ## Example
//! ```rust
//! use fretlab::pitch::{note_index, note_name, Spelling};
//!
//! assert_eq!(note_index("D♭"), Some(1));
//! assert_eq!(note_index("C♯"), Some(1));
//! assert_eq!(note_name(-1, false), "B");
//! assert_eq!(Spelling::for_key("E♭"), Spelling::Flats);
//! ```

use serde::Serialize;

/// Sharp-spelled chromatic scale starting at C.
pub const CHROMATIC_SHARPS: [&str; 12] = [
    "C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯", "A", "A♯", "B",
];

/// Flat-spelled chromatic scale starting at C.
pub const CHROMATIC_FLATS: [&str; 12] = [
    "C", "D♭", "D", "E♭", "E", "F", "G♭", "G", "A♭", "A", "B♭", "B",
];

/// Natural note letters in scale order.
pub const NATURAL_NOTES: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Key labels rendered with flats. Minor keys carry an `m` suffix.
pub const FLAT_KEYS: [&str; 10] = ["F", "B♭", "E♭", "A♭", "D♭", "Fm", "Cm", "Gm", "Dm", "B♭m"];

/// Fallback color for anything that is not a natural note letter.
pub const FALLBACK_NOTE_COLOR: &str = "#666";

/// Enharmonic spelling used when rendering a pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    Sharps,
    Flats,
}

impl Spelling {
    /// Spelling for a key label such as `"B♭"` or `"Dm"`.
    pub fn for_key(key_label: &str) -> Self {
        if uses_flats(key_label) {
            Spelling::Flats
        } else {
            Spelling::Sharps
        }
    }

    /// Spelling for a bare root, flat if either its major or minor key is flat.
    ///
    /// Used where no major/minor context exists (scales, chord formulas).
    pub fn for_root(root: &str) -> Self {
        if uses_flats(root) || uses_flats(&format!("{}m", root)) {
            Spelling::Flats
        } else {
            Spelling::Sharps
        }
    }

    pub fn use_flats(self) -> bool {
        self == Spelling::Flats
    }
}

/// A pitch class. Equality ignores spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Wrap any semitone offset (negative included) into a pitch class.
    pub fn new(semitone: i32) -> Self {
        Self(semitone.rem_euclid(12) as u8)
    }

    /// Look up a spelled note name in either chromatic table.
    pub fn from_name(name: &str) -> Option<Self> {
        note_index(name).map(Self)
    }

    pub fn semitone(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    pub fn name(self, spelling: Spelling) -> &'static str {
        note_name(self.0 as i32, spelling.use_flats())
    }
}

/// Semitone index (0-11) of a spelled note name, or `None` when unknown.
///
/// Both sharp and flat spellings are accepted; anything else (including ASCII
/// `#`/`b` accidentals) is a miss.
pub fn note_index(name: &str) -> Option<u8> {
    CHROMATIC_SHARPS
        .iter()
        .position(|n| *n == name)
        .or_else(|| CHROMATIC_FLATS.iter().position(|n| *n == name))
        .map(|i| i as u8)
}

/// Name of a semitone offset from C. Negative and >11 offsets wrap.
pub fn note_name(semitone: i32, use_flats: bool) -> &'static str {
    let idx = semitone.rem_euclid(12) as usize;
    if use_flats {
        CHROMATIC_FLATS[idx]
    } else {
        CHROMATIC_SHARPS[idx]
    }
}

/// Whether a key label belongs to the fixed flat-key set.
pub fn uses_flats(key_label: &str) -> bool {
    FLAT_KEYS.contains(&key_label)
}

/// Key label for a root in major or minor (`"A"` / `"Am"`).
pub fn key_label(root: &str, is_minor: bool) -> String {
    if is_minor {
        format!("{}m", root)
    } else {
        root.to_string()
    }
}

/// Display color of a note or chord name, keyed by its natural letter.
///
/// Accidental and quality marks are stripped first; anything left that does not
/// start with a note letter gets [`FALLBACK_NOTE_COLOR`].
pub fn get_note_color(note: &str) -> &'static str {
    let stripped = note
        .replacen('♯', "", 1)
        .replacen('♭', "", 1)
        .replacen('m', "", 1)
        .replacen('°', "", 1);
    match stripped.chars().next() {
        Some('C') => "#ef4444",
        Some('D') => "#f97316",
        Some('E') => "#eab308",
        Some('F') => "#22c55e",
        Some('G') => "#3b82f6",
        Some('A') => "#6366f1",
        Some('B') => "#a855f7",
        _ => FALLBACK_NOTE_COLOR,
    }
}

/// Enharmonic-aware membership test.
pub fn is_note_in_scale(note: &str, scale_notes: &[String]) -> bool {
    get_scale_degree(note, scale_notes).is_some()
}

/// 1-based position of `note` in `scale_notes`, matching by pitch class.
pub fn get_scale_degree(note: &str, scale_notes: &[String]) -> Option<usize> {
    let idx = note_index(note)?;
    scale_notes
        .iter()
        .position(|sn| note_index(sn) == Some(idx))
        .map(|pos| pos + 1)
}

/// Frequency in Hz of a MIDI note number (A4 = 69 = 440 Hz).
pub fn midi_to_frequency(midi: f64) -> f64 {
    440.0 * 2.0_f64.powf((midi - 69.0) / 12.0)
}

/// Rewrite ASCII accidentals typed on a keyboard (`C#`, `Bb`) into the
/// `♯`/`♭` spelling the note tables use. Only the character right after the
/// leading note letter is touched, so suffixes like `m7b5` keep their text.
pub fn normalize_accidentals(input: &str) -> String {
    let mut chars = input.chars();
    let mut out = String::with_capacity(input.len() + 2);
    match chars.next() {
        Some(first) => out.push(first),
        None => return out,
    }
    let rest: String = chars.collect();
    if let Some(tail) = rest.strip_prefix('#') {
        out.push('♯');
        out.push_str(tail);
    } else if let Some(tail) = rest.strip_prefix('b') {
        out.push('♭');
        out.push_str(tail);
    } else {
        out.push_str(&rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_index_both_spellings() {
        assert_eq!(note_index("C"), Some(0));
        assert_eq!(note_index("F♯"), Some(6));
        assert_eq!(note_index("G♭"), Some(6));
        assert_eq!(note_index("B"), Some(11));
        assert_eq!(note_index("H"), None);
        assert_eq!(note_index("C#"), None);
    }

    #[test]
    fn test_note_name_wraps_negative() {
        assert_eq!(note_name(-1, false), "B");
        assert_eq!(note_name(-11, true), "D♭");
        assert_eq!(note_name(13, false), "C♯");
        assert_eq!(note_name(22, true), "B♭");
    }

    #[test]
    fn test_round_trip_preserves_pitch_class() {
        for name in CHROMATIC_SHARPS.iter().chain(CHROMATIC_FLATS.iter()) {
            let idx = note_index(name).unwrap();
            for use_flats in [false, true] {
                let spelled = note_name(idx as i32, use_flats);
                assert_eq!(note_index(spelled), Some(idx));
            }
        }
    }

    #[test]
    fn test_pitch_class_equality_ignores_spelling() {
        assert_eq!(PitchClass::from_name("A♯"), PitchClass::from_name("B♭"));
        assert_eq!(PitchClass::new(-3), PitchClass::new(9));
        assert_eq!(PitchClass::new(9).transpose(5).name(Spelling::Flats), "D");
    }

    #[test]
    fn test_flat_key_table() {
        assert_eq!(Spelling::for_key("F"), Spelling::Flats);
        assert_eq!(Spelling::for_key("B♭m"), Spelling::Flats);
        assert_eq!(Spelling::for_key("G♭"), Spelling::Sharps);
        assert_eq!(Spelling::for_key("Am"), Spelling::Sharps);
        // D is a sharp key, but D minor is flat
        assert_eq!(Spelling::for_key("D"), Spelling::Sharps);
        assert_eq!(Spelling::for_root("D"), Spelling::Flats);
    }

    #[test]
    fn test_note_colors() {
        assert_eq!(get_note_color("C"), "#ef4444");
        assert_eq!(get_note_color("F♯m"), "#22c55e");
        assert_eq!(get_note_color("B♭°"), "#a855f7");
        assert_eq!(get_note_color("X"), FALLBACK_NOTE_COLOR);
        assert_eq!(get_note_color(""), FALLBACK_NOTE_COLOR);
    }

    #[test]
    fn test_scale_degree_is_enharmonic() {
        let scale: Vec<String> = ["F", "G", "A", "B♭", "C", "D", "E"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(get_scale_degree("A♯", &scale), Some(4));
        assert_eq!(get_scale_degree("F", &scale), Some(1));
        assert!(!is_note_in_scale("B", &scale));
        assert!(!is_note_in_scale("nope", &scale));
    }

    #[test]
    fn test_midi_to_frequency() {
        assert!((midi_to_frequency(69.0) - 440.0).abs() < 1e-9);
        assert!((midi_to_frequency(60.0) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_accidentals() {
        assert_eq!(normalize_accidentals("C#"), "C♯");
        assert_eq!(normalize_accidentals("Bbm7"), "B♭m7");
        assert_eq!(normalize_accidentals("Bm7b5"), "Bm7b5");
        assert_eq!(normalize_accidentals("E♭"), "E♭");
        assert_eq!(normalize_accidentals(""), "");
    }
}
