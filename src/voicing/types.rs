//! Voicing type definitions
//!
//! Fret arrays run from the low E string (index 0) to the high E string (index 5).

use serde::Serialize;

/// Fret value of a string that is not played.
pub const MUTED: i8 = -1;

/// Number of strings every voicing covers.
pub const STRING_COUNT: usize = 6;

/// Open-string MIDI notes of standard tuning, low E to high E.
pub const STANDARD_OPEN_MIDI: [u8; STRING_COUNT] = [40, 45, 50, 55, 59, 64];

/// Grouping shown in the chord view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoicingCategory {
    Open,
    BarreE,
    BarreA,
    Shell,
    Drop2,
    Drop3,
    Partial,
}

impl VoicingCategory {
    pub fn label(self) -> &'static str {
        match self {
            VoicingCategory::Open => "open",
            VoicingCategory::BarreE => "barre-e",
            VoicingCategory::BarreA => "barre-a",
            VoicingCategory::Shell => "shell",
            VoicingCategory::Drop2 => "drop2",
            VoicingCategory::Drop3 => "drop3",
            VoicingCategory::Partial => "partial",
        }
    }
}

/// A concrete fretting of a chord.
///
/// # Fields
/// - `frets`: [`MUTED`], `0` for open, or the absolute fret number
/// - `fingers`: `0` for open/muted strings, `1`-`4` otherwise
/// - `base_fret`: first fret of the diagram window, always at least 1
/// - `barre_at` / `barre_strings`: set together; strings are an inclusive `[from, to]` range
/// - `bass_note`: sharp-spelled name of the lowest sounding string
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordVoicing {
    pub name: String,
    pub frets: [i8; STRING_COUNT],
    pub fingers: [u8; STRING_COUNT],
    pub base_fret: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barre_at: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barre_strings: Option<[usize; 2]>,
    pub category: VoicingCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub bass_note: String,
}

impl ChordVoicing {
    /// Canonical pattern used to compare voicings (`"-1,3,2,0,1,0"`).
    pub fn pattern_key(&self) -> String {
        self.frets
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Barre of a template, relative to the transposed base fret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barre {
    pub offset: u8,
    pub strings: [usize; 2],
}

/// A movable shape anchored on `root_string`, written for a root at fret 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicingTemplate {
    pub shape: [i8; STRING_COUNT],
    pub fingers: [u8; STRING_COUNT],
    pub root_string: usize,
    pub barre: Option<Barre>,
    pub category: VoicingCategory,
    pub label: &'static str,
}

/// Chord qualities that have movable templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished,
    Diminished7,
    Sus2,
    Sus4,
    Add9,
    Sixth,
    MinorSixth,
    Ninth,
    Major9,
    Minor9,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 15] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::HalfDiminished,
        ChordQuality::Diminished7,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Add9,
        ChordQuality::Sixth,
        ChordQuality::MinorSixth,
        ChordQuality::Ninth,
        ChordQuality::Major9,
        ChordQuality::Minor9,
    ];

    /// Parse a chord-name suffix. Suffixes without templates give `None`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let quality = match suffix {
            "" => ChordQuality::Major,
            "m" => ChordQuality::Minor,
            "7" => ChordQuality::Dominant7,
            "maj7" => ChordQuality::Major7,
            "m7" => ChordQuality::Minor7,
            "m7♭5" => ChordQuality::HalfDiminished,
            "°7" => ChordQuality::Diminished7,
            "sus2" => ChordQuality::Sus2,
            "sus4" => ChordQuality::Sus4,
            "add9" => ChordQuality::Add9,
            "6" => ChordQuality::Sixth,
            "m6" => ChordQuality::MinorSixth,
            "9" => ChordQuality::Ninth,
            "maj9" => ChordQuality::Major9,
            "m9" => ChordQuality::Minor9,
            _ => return None,
        };
        Some(quality)
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished => "m7♭5",
            ChordQuality::Diminished7 => "°7",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Add9 => "add9",
            ChordQuality::Sixth => "6",
            ChordQuality::MinorSixth => "m6",
            ChordQuality::Ninth => "9",
            ChordQuality::Major9 => "maj9",
            ChordQuality::Minor9 => "m9",
        }
    }
}
