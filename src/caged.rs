//! # CAGED Boxes
//!
//! The five pentatonic box positions, moved to any key.
//!
//! The boxes are defined once for A minor pentatonic. Another key shifts all of
//! them by its distance from A, then each box is repeated an octave down and up
//! so the whole neck is covered. Boxes are clipped to the drawn fret range and
//! dropped when they fall entirely outside it.

use serde::Serialize;

use crate::pitch::note_index;
use crate::tuning::{Instrument, InstrumentTuning, NUM_FRETS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CagedShape {
    C,
    A,
    G,
    E,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CagedBox {
    pub shape: CagedShape,
    pub color: &'static str,
    pub low_fret: u8,
    pub high_fret: u8,
}

/// Box positions for A minor pentatonic.
pub const CAGED_REFERENCE: [CagedBox; 5] = [
    CagedBox { shape: CagedShape::E, color: "rgba(239,68,68,0.12)", low_fret: 0, high_fret: 3 },
    CagedBox { shape: CagedShape::D, color: "rgba(168,85,247,0.12)", low_fret: 2, high_fret: 5 },
    CagedBox { shape: CagedShape::C, color: "rgba(59,130,246,0.12)", low_fret: 4, high_fret: 8 },
    CagedBox { shape: CagedShape::A, color: "rgba(34,197,94,0.12)", low_fret: 7, high_fret: 10 },
    CagedBox { shape: CagedShape::G, color: "rgba(234,179,8,0.12)", low_fret: 9, high_fret: 12 },
];

/// Root the reference boxes are written for (A).
pub const REFERENCE_ROOT: u8 = 9;

/// Boxes for `root`, up to and including fret [`NUM_FRETS`].
///
/// Boxes come grouped by reference shape, lowest octave first. An unknown root
/// has no boxes.
pub fn get_caged_boxes_for_key(root: &str) -> Vec<CagedBox> {
    get_caged_boxes(root, NUM_FRETS as i32)
}

/// Like [`get_caged_boxes_for_key`] with an explicit last fret.
pub fn get_caged_boxes(root: &str, max_fret: i32) -> Vec<CagedBox> {
    let Some(root_idx) = note_index(root) else {
        return Vec::new();
    };
    let offset = (root_idx as i32 - REFERENCE_ROOT as i32).rem_euclid(12);

    let mut boxes = Vec::new();
    for reference in CAGED_REFERENCE.iter() {
        let base_low = reference.low_fret as i32 + offset;
        let base_high = reference.high_fret as i32 + offset;
        for octave in [-12, 0, 12] {
            let low = base_low + octave;
            let high = base_high + octave;
            if high < 0 || low > max_fret {
                continue;
            }
            boxes.push(CagedBox {
                low_fret: low.max(0) as u8,
                high_fret: high.min(max_fret) as u8,
                ..*reference
            });
        }
    }
    boxes
}

/// Boxes for `root` on `instrument` in `tuning`, up to `max_fret`.
///
/// `None` when the shapes do not apply: the instrument has no CAGED support
/// (bass) or the tuning breaks the 5-5-5-4-5 string spacing the boxes assume.
pub fn caged_boxes_for_tuning(
    root: &str,
    instrument: &Instrument,
    tuning: &InstrumentTuning,
    max_fret: usize,
) -> Option<Vec<CagedBox>> {
    if !instrument.supports_caged || !tuning.is_standard_interval() {
        log::debug!("no CAGED boxes for {} in {}", instrument.label, tuning.name);
        return None;
    }
    Some(get_caged_boxes(root, max_fret as i32))
}
