//! Voicing lookup and template transposition
//!
//! Catalog entries always come first. Templates are transposed from their
//! anchor string, filtered for playability, then deduplicated against
//! everything already returned.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::catalog::{bass_note, direct_voicings};
use super::templates::{templates_for, validate_all_templates};
use super::types::{ChordQuality, ChordVoicing, VoicingTemplate, MUTED, STANDARD_OPEN_MIDI};
use crate::chord::parse_chord_name;
use crate::pitch::note_index;

/// Widest stretch between the lowest and highest fretted string.
pub const MAX_FRET_SPAN: i8 = 4;

/// Highest fret a generated voicing may use.
pub const MAX_FRET: i8 = 15;

/// All voicings for a chord name: catalog matches, then generated shapes.
///
/// An unparseable name or a quality without templates yields only the catalog
/// matches, which may be empty.
pub fn get_chord_voicings(chord_name: &str) -> Vec<ChordVoicing> {
    let direct = direct_voicings(chord_name);

    let Some((root, suffix)) = parse_chord_name(chord_name) else {
        return direct;
    };
    let Some(root_idx) = note_index(root) else {
        return direct;
    };
    let templates = match ChordQuality::from_suffix(suffix) {
        Some(quality) if templates_are_valid() => templates_for(quality),
        _ => &[],
    };

    let generated = generate_voicings(chord_name, root_idx, templates);
    merge_voicings(direct, generated)
}

/// Whether the shipped templates pass [`validate_all_templates`]. Checked once;
/// a malformed table disables generated voicings and leaves the catalog.
pub fn templates_are_valid() -> bool {
    static VALID: OnceLock<bool> = OnceLock::new();
    *VALID.get_or_init(|| match validate_all_templates() {
        Ok(()) => true,
        Err(e) => {
            log::error!("voicing templates disabled: {}", e);
            false
        }
    })
}

/// Transpose `templates` so their anchor string sounds `root_idx`.
///
/// Templates whose transposition lands on fret 0 are skipped; open shapes live
/// in the catalog.
pub fn generate_voicings(chord_name: &str, root_idx: u8, templates: &[VoicingTemplate]) -> Vec<ChordVoicing> {
    templates
        .iter()
        .filter_map(|template| transpose_template(chord_name, root_idx, template))
        .collect()
}

fn transpose_template(chord_name: &str, root_idx: u8, template: &VoicingTemplate) -> Option<ChordVoicing> {
    let open = STANDARD_OPEN_MIDI[template.root_string] as i32;
    let base_fret = (root_idx as i32 - open).rem_euclid(12) as i8;
    if base_fret == 0 {
        return None;
    }

    let frets = template.shape.map(|offset| if offset == MUTED { MUTED } else { offset + base_fret });
    if !is_playable(&frets) {
        log::trace!("{} {}: {:?} rejected", chord_name, template.label, frets);
        return None;
    }

    let barre_at = template.barre.map(|b| base_fret as u8 + b.offset);
    Some(ChordVoicing {
        name: chord_name.to_string(),
        frets,
        fingers: template.fingers,
        base_fret: base_fret as u8,
        barre_at,
        barre_strings: template.barre.map(|b| b.strings),
        category: template.category,
        label: Some(template.label.to_string()),
        bass_note: bass_note(&frets).unwrap_or_default().to_string(),
    })
}

/// Fretted strings (open and muted excluded) must fit one hand span and stay
/// below [`MAX_FRET`].
pub fn is_playable(frets: &[i8]) -> bool {
    let fretted: Vec<i8> = frets.iter().copied().filter(|&f| f > 0).collect();
    let (Some(&min), Some(&max)) = (fretted.iter().min(), fretted.iter().max()) else {
        return true;
    };
    max - min <= MAX_FRET_SPAN && max <= MAX_FRET
}

fn merge_voicings(direct: Vec<ChordVoicing>, generated: Vec<ChordVoicing>) -> Vec<ChordVoicing> {
    let mut seen: HashSet<String> = direct.iter().map(ChordVoicing::pattern_key).collect();
    let mut result = direct;
    for voicing in generated {
        if seen.insert(voicing.pattern_key()) {
            result.push(voicing);
        } else {
            log::debug!("dropping duplicate {} voicing {}", voicing.name, voicing.pattern_key());
        }
    }
    result
}

/// Voicings whose lowest sounding note matches `bass`, compared by pitch class.
pub fn voicings_for_bass<'a>(voicings: &'a [ChordVoicing], bass: &str) -> Vec<&'a ChordVoicing> {
    let Some(target) = note_index(bass) else {
        return Vec::new();
    };
    voicings
        .iter()
        .filter(|v| note_index(&v.bass_note) == Some(target))
        .collect()
}
