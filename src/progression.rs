//! # Progressions
//!
//! Roman-numeral progressions and their resolution into concrete chord names.
//!
//! A token is an optional `♭`/`♯`, a roman numeral and an optional suffix. An
//! explicit suffix is appended verbatim (`iim7` → `Dm7`). Without one the numeral's
//! case picks the triad: lower case is minor, upper case is major. A degree that
//! is diminished in the key still reads as minor unless the token says `°`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::key::diatonic_tables;
use crate::pitch::{key_label, note_index, note_name, Spelling};

fn roman_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // pattern is a literal
    PATTERN.get_or_init(|| {
        Regex::new(r"^([♭♯]?)(III|II|IV|I|VII|VI|V|iii|ii|iv|i|vii|vi|v)(.*)$")
            .expect("roman numeral pattern is valid")
    })
}

fn roman_degree(numeral: &str) -> Option<usize> {
    match numeral.to_ascii_uppercase().as_str() {
        "I" => Some(0),
        "II" => Some(1),
        "III" => Some(2),
        "IV" => Some(3),
        "V" => Some(4),
        "VI" => Some(5),
        "VII" => Some(6),
        _ => None,
    }
}

/// Resolve roman-numeral tokens against a key.
///
/// Tokens that do not parse (and every token when `root` is unknown) are passed
/// through unchanged.
///
/// # Example
/// ```
/// use fretlab::progression::resolve_progression;
///
/// assert_eq!(resolve_progression(&["ii", "V7", "I"], "C", false), ["Dm", "G7", "C"]);
/// assert_eq!(resolve_progression(&["I", "♭VII", "IV"], "D", false), ["D", "C", "G"]);
/// ```
pub fn resolve_progression<S: AsRef<str>>(chords: &[S], root: &str, is_minor: bool) -> Vec<String> {
    let Some(root_idx) = note_index(root) else {
        log::debug!("unknown progression root '{}', tokens left as-is", root);
        return chords.iter().map(|c| c.as_ref().to_string()).collect();
    };
    let (intervals, _) = diatonic_tables(is_minor);
    let use_flats = Spelling::for_key(&key_label(root, is_minor)).use_flats();

    chords
        .iter()
        .map(|token| {
            let token = token.as_ref();
            let Some(caps) = roman_pattern().captures(token) else {
                return token.to_string();
            };
            let roman = &caps[2];
            let Some(degree) = roman_degree(roman) else {
                return token.to_string();
            };
            let accidental = match &caps[1] {
                "♭" => -1,
                "♯" => 1,
                _ => 0,
            };
            let suffix = &caps[3];

            let semitone = root_idx as i32 + intervals[degree] as i32 + accidental;
            let chord_root = note_name(semitone, use_flats);

            if !suffix.is_empty() {
                format!("{}{}", chord_root, suffix)
            } else if roman.chars().all(|c| c.is_ascii_lowercase()) {
                format!("{}m", chord_root)
            } else {
                chord_root.to_string()
            }
        })
        .collect()
}

/// A named (or anonymous) roman-numeral progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub name: Option<&'static str>,
    pub chords: &'static [&'static str],
}

/// Progressions grouped by style. Minor groups are meant for minor keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionGroup {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub is_minor: bool,
    pub progressions: &'static [Progression],
}

const fn named(name: &'static str, chords: &'static [&'static str]) -> Progression {
    Progression { name: Some(name), chords }
}

const fn unnamed(chords: &'static [&'static str]) -> Progression {
    Progression { name: None, chords }
}

pub const PROGRESSIONS: [ProgressionGroup; 4] = [
    ProgressionGroup {
        kind: "Pop / Rock",
        is_minor: false,
        progressions: &[
            unnamed(&["I", "IV", "V"]),
            named("Pop Anthem", &["I", "V", "vi", "IV"]),
            named("'50s", &["I", "vi", "IV", "V"]),
            named("Axis", &["vi", "IV", "I", "V"]),
            unnamed(&["I", "IV", "vi", "V"]),
            named("Mixolydian Vamp", &["I", "♭VII", "IV", "I"]),
        ],
    },
    ProgressionGroup {
        kind: "Jazz",
        is_minor: false,
        progressions: &[
            named("ii-V-I", &["iim7", "V7", "Imaj7"]),
            named("Turnaround", &["Imaj7", "vim7", "iim7", "V7"]),
            named("iii-vi-ii-V", &["iiim7", "vim7", "iim7", "V7"]),
            named(
                "Rhythm Changes A",
                &["Imaj7", "vim7", "iim7", "V7", "iiim7", "vim7", "iim7", "V7"],
            ),
            named("ii-V to IV", &["iim7", "V7", "Imaj7", "IVmaj7"]),
        ],
    },
    ProgressionGroup {
        kind: "Minor",
        is_minor: true,
        progressions: &[
            unnamed(&["i", "iv", "VII"]),
            named("Andalusian", &["i", "VI", "III", "VII"]),
            unnamed(&["i", "iv", "v"]),
            unnamed(&["i", "VII", "VI", "VII"]),
            unnamed(&["i", "ii°", "V", "i"]),
        ],
    },
    ProgressionGroup {
        kind: "Minor Jazz",
        is_minor: true,
        progressions: &[
            named("Minor ii-V-i", &["iim7♭5", "V7", "im7"]),
            unnamed(&["im7", "ivm7", "V7", "im7"]),
            unnamed(&["im7", "♭VImaj7", "iim7♭5", "V7"]),
            unnamed(&["im7", "ivm7", "♭VImaj7", "V7"]),
        ],
    },
];

/// Find a named progression in any group.
pub fn find_progression(name: &str) -> Option<(&'static ProgressionGroup, &'static Progression)> {
    PROGRESSIONS.iter().find_map(|group| {
        group
            .progressions
            .iter()
            .find(|p| p.name == Some(name))
            .map(|p| (group, p))
    })
}
