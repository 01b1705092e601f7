//! Aggregated views for a UI or the CLI's `--json` output.
//!
//! Each report bundles what one screen shows: a scale with its triads, a key
//! with its harmony, or a chord with its tones, inversions and voicings.

use serde::Serialize;

use crate::chord::{get_chord_inversions, get_chord_tones, parse_slash_chord, ChordInversion, ChordTones};
use crate::key::{
    get_borrowed_chords, get_diatonic_chords, get_key_signature, get_secondary_dominants,
    BorrowedChord, KeySignature, SecondaryDominant,
};
use crate::pitch::{key_label, note_index};
use crate::scale::{find_scale, get_scale_notes, get_scale_triads, ScaleTriad};
use crate::tuning::InstrumentTuning;
use crate::voicing::{get_chord_voicings, voicings_for_bass, ChordVoicing};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub root: String,
    pub scale: &'static str,
    pub notes: Vec<String>,
    /// Present for seven-note scales only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triads: Option<Vec<ScaleTriad>>,
}

/// Notes and triads of `scale_name` on `root`; `None` for an unknown scale or root.
pub fn describe_scale(root: &str, scale_name: &str) -> Option<ScaleReport> {
    note_index(root)?;
    let scale = find_scale(scale_name)?;
    Some(ScaleReport {
        root: root.to_string(),
        scale: scale.name,
        notes: get_scale_notes(root, scale.intervals),
        triads: get_scale_triads(root, scale.intervals),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    pub key: String,
    /// Only major keys carry a signature entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<&'static KeySignature>,
    pub diatonic_chords: Vec<String>,
    pub secondary_dominants: Vec<SecondaryDominant>,
    pub borrowed_chords: Vec<BorrowedChord>,
}

pub fn describe_key(root: &str, is_minor: bool) -> Option<KeyReport> {
    note_index(root)?;
    Some(KeyReport {
        key: key_label(root, is_minor),
        signature: if is_minor { None } else { get_key_signature(root) },
        diatonic_chords: get_diatonic_chords(root, is_minor),
        secondary_dominants: get_secondary_dominants(root, is_minor),
        borrowed_chords: get_borrowed_chords(root, is_minor),
    })
}

/// An inversion with the voicings whose lowest note is its bass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionReport {
    #[serde(flatten)]
    pub inversion: ChordInversion,
    pub voicings: Vec<ChordVoicing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordReport {
    pub name: String,
    pub tones: ChordTones,
    pub inversions: Vec<InversionReport>,
    pub voicings: Vec<ChordVoicing>,
    /// True when voicings were left out because the tuning is not standard-interval.
    pub voicings_suppressed: bool,
}

/// Tones, inversions and voicings of `chord_name`.
///
/// A slash chord such as `C/E` is described through its chord part, with the
/// voicings narrowed to those sounding the given bass. Voicings assume
/// standard-interval guitar tuning; for any other `tuning` they are left out.
pub fn describe_chord(chord_name: &str, tuning: Option<&InstrumentTuning>) -> Option<ChordReport> {
    let (chord, bass) = match parse_slash_chord(chord_name) {
        Some((chord, bass)) => (chord, Some(bass)),
        None => (chord_name, None),
    };
    let tones = get_chord_tones(chord)?;

    let suppressed = tuning.is_some_and(|t| !t.is_standard_interval());
    let all_voicings = if suppressed { Vec::new() } else { get_chord_voicings(chord) };

    let inversions = get_chord_inversions(chord, &tones.notes)
        .into_iter()
        .map(|inversion| {
            let voicings = voicings_for_bass(&all_voicings, &inversion.bass_note)
                .into_iter()
                .cloned()
                .collect();
            InversionReport { inversion, voicings }
        })
        .collect();

    let voicings = match bass {
        Some(bass) => voicings_for_bass(&all_voicings, bass).into_iter().cloned().collect(),
        None => all_voicings,
    };

    Some(ChordReport {
        name: chord_name.to_string(),
        tones,
        inversions,
        voicings,
        voicings_suppressed: suppressed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{get_tuning_for_instrument, InstrumentId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_scale() {
        let report = describe_scale("A", "Pentatonic Minor").unwrap();
        assert_eq!(report.notes, ["A", "C", "D", "E", "G"]);
        assert!(report.triads.is_none());

        let major = describe_scale("G", "Major").unwrap();
        assert_eq!(major.triads.unwrap().len(), 7);

        assert!(describe_scale("H", "Major").is_none());
        assert!(describe_scale("C", "Nonexistent").is_none());
    }

    #[test]
    fn test_describe_key() {
        let report = describe_key("C", false).unwrap();
        assert_eq!(report.key, "C");
        assert_eq!(report.signature.map(|s| s.relative_minor), Some("Am"));
        assert_eq!(report.diatonic_chords[1], "Dm");

        let minor = describe_key("A", true).unwrap();
        assert_eq!(minor.key, "Am");
        assert!(minor.signature.is_none());
    }

    #[test]
    fn test_describe_chord_pairs_inversions_with_voicings() {
        let report = describe_chord("C", None).unwrap();
        assert_eq!(report.tones.notes, ["C", "E", "G"]);
        assert_eq!(report.inversions.len(), 3);
        assert!(!report.voicings_suppressed);
        // the open C voicing has C in the bass
        assert!(report.inversions[0]
            .voicings
            .iter()
            .any(|v| v.frets == [-1, 3, 2, 0, 1, 0]));
        for inversion in &report.inversions {
            assert!(inversion
                .voicings
                .iter()
                .all(|v| v.bass_note == inversion.inversion.bass_note));
        }
    }

    #[test]
    fn test_describe_slash_chord() {
        let report = describe_chord("C/E", None).unwrap();
        assert_eq!(report.name, "C/E");
        assert_eq!(report.tones.root, "C");
        assert!(report.voicings.iter().all(|v| v.bass_note == "E"));
    }

    #[test]
    fn test_non_standard_tuning_suppresses_voicings() {
        let drop_d = get_tuning_for_instrument(InstrumentId::Guitar, "Drop D");
        let report = describe_chord("G", Some(&drop_d)).unwrap();
        assert!(report.voicings_suppressed);
        assert!(report.voicings.is_empty());
        assert_eq!(report.inversions.len(), 3);
    }

    #[test]
    fn test_unknown_chord() {
        assert!(describe_chord("Cxyz", None).is_none());
    }
}
