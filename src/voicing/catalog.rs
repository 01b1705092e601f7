//! Hand-fingered voicings looked up by exact chord name.

use super::types::{ChordVoicing, VoicingCategory, MUTED, STANDARD_OPEN_MIDI, STRING_COUNT};
use crate::pitch::note_name;

/// A fixed catalog fretting. The bass note is derived when it is turned into a
/// [`ChordVoicing`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub frets: [i8; STRING_COUNT],
    pub fingers: [u8; STRING_COUNT],
    pub base_fret: u8,
    pub barre: Option<(u8, [usize; 2])>,
    pub category: VoicingCategory,
}

const X: i8 = MUTED;

const fn open(name: &'static str, frets: [i8; STRING_COUNT], fingers: [u8; STRING_COUNT]) -> CatalogEntry {
    CatalogEntry { name, frets, fingers, base_fret: 1, barre: None, category: VoicingCategory::Open }
}

const fn barred(
    name: &'static str,
    frets: [i8; STRING_COUNT],
    fingers: [u8; STRING_COUNT],
    barre_at: u8,
    base_fret: u8,
    category: VoicingCategory,
) -> CatalogEntry {
    CatalogEntry { name, frets, fingers, base_fret, barre: Some((barre_at, [0, 5])), category }
}

pub const VOICINGS: [CatalogEntry; 29] = [
    // open major
    open("C", [X, 3, 2, 0, 1, 0], [0, 3, 2, 0, 1, 0]),
    open("D", [X, X, 0, 2, 3, 2], [0, 0, 0, 1, 3, 2]),
    open("E", [0, 2, 2, 1, 0, 0], [0, 2, 3, 1, 0, 0]),
    barred("F", [1, 1, 2, 3, 3, 1], [1, 1, 2, 3, 4, 1], 1, 1, VoicingCategory::Open),
    open("G", [3, 2, 0, 0, 0, 3], [2, 1, 0, 0, 0, 3]),
    open("A", [X, 0, 2, 2, 2, 0], [0, 0, 1, 2, 3, 0]),
    // open minor
    open("Dm", [X, X, 0, 2, 3, 1], [0, 0, 0, 2, 3, 1]),
    open("Em", [0, 2, 2, 0, 0, 0], [0, 2, 3, 0, 0, 0]),
    open("Am", [X, 0, 2, 2, 1, 0], [0, 0, 2, 3, 1, 0]),
    // barre
    barred("F", [1, 3, 3, 2, 1, 1], [1, 3, 4, 2, 1, 1], 1, 1, VoicingCategory::BarreE),
    barred("B♭", [1, 1, 3, 3, 3, 1], [1, 1, 2, 3, 4, 1], 1, 6, VoicingCategory::BarreA),
    barred("Fm", [1, 3, 3, 1, 1, 1], [1, 3, 4, 1, 1, 1], 1, 1, VoicingCategory::BarreE),
    barred("Bm", [2, 2, 4, 4, 3, 2], [1, 1, 3, 4, 2, 1], 2, 1, VoicingCategory::BarreA),
    // dominant 7
    open("A7", [X, 0, 2, 0, 2, 0], [0, 0, 2, 0, 3, 0]),
    open("B7", [X, 2, 1, 2, 0, 2], [0, 2, 1, 3, 0, 4]),
    open("C7", [X, 3, 2, 3, 1, 0], [0, 3, 2, 4, 1, 0]),
    open("D7", [X, X, 0, 2, 1, 2], [0, 0, 0, 2, 1, 3]),
    open("E7", [0, 2, 0, 1, 0, 0], [0, 2, 0, 1, 0, 0]),
    open("G7", [3, 2, 0, 0, 0, 1], [3, 2, 0, 0, 0, 1]),
    // minor 7
    open("Am7", [X, 0, 2, 0, 1, 0], [0, 0, 2, 0, 1, 0]),
    open("Dm7", [X, X, 0, 2, 1, 1], [0, 0, 0, 2, 1, 1]),
    open("Em7", [0, 2, 0, 0, 0, 0], [0, 2, 0, 0, 0, 0]),
    // sus
    open("Asus2", [X, 0, 2, 2, 0, 0], [0, 0, 1, 2, 0, 0]),
    open("Asus4", [X, 0, 2, 2, 3, 0], [0, 0, 1, 2, 3, 0]),
    open("Dsus2", [X, X, 0, 2, 3, 0], [0, 0, 0, 1, 3, 0]),
    open("Dsus4", [X, X, 0, 2, 3, 3], [0, 0, 0, 1, 2, 3]),
    open("Esus4", [0, 2, 2, 2, 0, 0], [0, 2, 3, 4, 0, 0]),
    // power
    open("E5", [0, 2, 2, X, X, X], [0, 1, 2, 0, 0, 0]),
    open("A5", [X, 0, 2, 2, X, X], [0, 0, 1, 2, 0, 0]),
];

/// Sharp-spelled name of the lowest sounding string, or `None` if every string
/// is muted.
pub fn bass_note(frets: &[i8; STRING_COUNT]) -> Option<&'static str> {
    frets
        .iter()
        .zip(STANDARD_OPEN_MIDI.iter())
        .find(|(&fret, _)| fret != MUTED)
        .map(|(&fret, &open)| note_name(open as i32 + fret as i32, false))
}

impl CatalogEntry {
    pub fn to_voicing(&self) -> ChordVoicing {
        ChordVoicing {
            name: self.name.to_string(),
            frets: self.frets,
            fingers: self.fingers,
            base_fret: self.base_fret,
            barre_at: self.barre.map(|(at, _)| at),
            barre_strings: self.barre.map(|(_, strings)| strings),
            category: self.category,
            label: None,
            bass_note: bass_note(&self.frets).unwrap_or_default().to_string(),
        }
    }
}

/// Catalog voicings whose name is exactly `chord_name`, in catalog order.
pub fn direct_voicings(chord_name: &str) -> Vec<ChordVoicing> {
    VOICINGS
        .iter()
        .filter(|entry| entry.name == chord_name)
        .map(CatalogEntry::to_voicing)
        .collect()
}
