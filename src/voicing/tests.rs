use super::*;
use crate::error::FretlabError;
use pretty_assertions::assert_eq;

fn patterns(voicings: &[ChordVoicing]) -> Vec<[i8; 6]> {
    voicings.iter().map(|v| v.frets).collect()
}

#[test]
fn test_c_includes_open_voicing_first() {
    let voicings = get_chord_voicings("C");
    assert_eq!(voicings[0].frets, [-1, 3, 2, 0, 1, 0]);
    assert_eq!(voicings[0].category, VoicingCategory::Open);
    assert_eq!(voicings[0].bass_note, "C");
}

#[test]
fn test_c_generated_shapes() {
    let voicings = get_chord_voicings("C");
    assert_eq!(
        patterns(&voicings),
        vec![
            [-1, 3, 2, 0, 1, 0],
            [8, 10, 10, 9, 8, 8],
            [-1, 3, 5, 5, 5, 3],
            [-1, -1, 10, 11, 10, -1],
        ]
    );
    let e_form = &voicings[1];
    assert_eq!(e_form.base_fret, 8);
    assert_eq!(e_form.barre_at, Some(8));
    assert_eq!(e_form.barre_strings, Some([0, 5]));
    assert_eq!(e_form.label.as_deref(), Some("E-form"));

    let shell = &voicings[3];
    assert_eq!(shell.barre_at, None);
    assert_eq!(shell.barre_strings, None);
    assert!(voicings.iter().all(|v| v.bass_note == "C"));
}

#[test]
fn test_f_barre_is_deduplicated() {
    let voicings = get_chord_voicings("F");
    assert_eq!(
        patterns(&voicings),
        vec![
            [1, 1, 2, 3, 3, 1],
            [1, 3, 3, 2, 1, 1],
            [-1, 8, 10, 10, 10, 8],
            [-1, -1, 3, 4, 3, -1],
        ]
    );
    let barre = voicings
        .iter()
        .find(|v| v.base_fret == 1 && v.barre_strings == Some([0, 5]))
        .unwrap();
    assert_eq!(barre.barre_at, Some(1));

    let keys: Vec<String> = voicings.iter().map(ChordVoicing::pattern_key).collect();
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(keys.len(), unique.len());
}

#[test]
fn test_open_root_skips_zero_base_fret() {
    // the E-form lands on fret 0 for E; the catalog covers it
    let voicings = get_chord_voicings("E");
    assert_eq!(
        patterns(&voicings),
        vec![[0, 2, 2, 1, 0, 0], [-1, 7, 9, 9, 9, 7], [-1, -1, 2, 3, 2, -1]]
    );
}

#[test]
fn test_unknown_quality_returns_catalog_only() {
    assert!(get_chord_voicings("C13").is_empty());
    let e5 = get_chord_voicings("E5");
    assert_eq!(e5.len(), 1);
    assert_eq!(e5[0].bass_note, "E");
}

#[test]
fn test_invalid_names() {
    assert!(get_chord_voicings("").is_empty());
    assert!(get_chord_voicings("H7").is_empty());
    assert!(get_chord_voicings("xyz").is_empty());
}

#[test]
fn test_generated_for_every_root_respect_limits() {
    for root in crate::pitch::CHROMATIC_SHARPS {
        for quality in ChordQuality::ALL {
            let name = format!("{}{}", root, quality.suffix());
            for voicing in get_chord_voicings(&name) {
                if voicing.label.is_some() {
                    assert!(is_playable(&voicing.frets), "{} {:?}", name, voicing.frets);
                    assert!(voicing.base_fret >= 1);
                }
                assert_eq!(voicing.barre_at.is_some(), voicing.barre_strings.is_some());
            }
        }
    }
}

#[test]
fn test_span_five_template_is_excluded() {
    let wide = VoicingTemplate {
        shape: [0, 5, MUTED, MUTED, MUTED, MUTED],
        fingers: [1, 4, 0, 0, 0, 0],
        root_string: 0,
        barre: None,
        category: VoicingCategory::Partial,
        label: "wide",
    };
    let narrow = VoicingTemplate { shape: [0, 4, MUTED, MUTED, MUTED, MUTED], label: "narrow", ..wide };

    // F on the low E string: base fret 1
    let generated = generate_voicings("F", 5, &[wide, narrow]);
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].label.as_deref(), Some("narrow"));
    assert_eq!(generated[0].frets, [1, 5, -1, -1, -1, -1]);
}

#[test]
fn test_playability_filter() {
    assert!(is_playable(&[-1, 3, 2, 0, 1, 0]));
    assert!(is_playable(&[0, 0, 0, 0, 0, 0]));
    assert!(is_playable(&[-1, -1, -1, -1, -1, -1]));
    assert!(is_playable(&[11, 15, -1, -1, -1, -1]));
    assert!(!is_playable(&[12, 16, -1, -1, -1, -1]));
    assert!(!is_playable(&[1, 6, -1, -1, -1, -1]));
    // open strings do not stretch the span
    assert!(is_playable(&[0, 10, 12, 0, -1, -1]));
}

#[test]
fn test_voicings_for_bass_is_enharmonic() {
    let voicings = get_chord_voicings("B♭");
    assert_eq!(voicings.len(), 4);
    assert_eq!(voicings[0].base_fret, 6);
    assert_eq!(voicings_for_bass(&voicings, "B♭").len(), 3);
    assert_eq!(voicings_for_bass(&voicings, "A♯").len(), 3);
    assert_eq!(voicings_for_bass(&voicings, "F").len(), 1);
    assert!(voicings_for_bass(&voicings, "nope").is_empty());
}

#[test]
fn test_bass_note() {
    assert_eq!(bass_note(&[-1, 0, 2, 2, 2, 0]), Some("A"));
    assert_eq!(bass_note(&[-1, -1, 0, 2, 3, 2]), Some("D"));
    assert_eq!(bass_note(&[-1, -1, -1, -1, -1, 1]), Some("F"));
    assert_eq!(bass_note(&[-1; 6]), None);
}

#[test]
fn test_catalog_shapes() {
    for entry in VOICINGS.iter() {
        assert!(entry.base_fret >= 1, "{}", entry.name);
        let voicing = entry.to_voicing();
        assert!(!voicing.bass_note.is_empty(), "{}", entry.name);
    }
    let direct = direct_voicings("F");
    assert_eq!(direct.len(), 2);
    assert_eq!(direct[1].category, VoicingCategory::BarreE);
}

#[test]
fn test_quality_suffix_round_trip() {
    for quality in ChordQuality::ALL {
        assert_eq!(ChordQuality::from_suffix(quality.suffix()), Some(quality));
        assert!(!templates_for(quality).is_empty());
    }
    assert_eq!(ChordQuality::from_suffix("13"), None);
}

#[test]
fn test_shipped_templates_are_valid() {
    assert!(validate_all_templates().is_ok());
    // lookups gate generation on the same check
    assert!(templates_are_valid());
    assert!(get_chord_voicings("B♭m7").iter().any(|v| v.label.is_some()));
}

#[test]
fn test_malformed_template_is_rejected() {
    let bad = VoicingTemplate {
        shape: [1, 3, 3, 2, 1, 1],
        fingers: [1, 3, 4, 2, 1, 1],
        root_string: 0,
        barre: Some(Barre { offset: 0, strings: [0, 5] }),
        category: VoicingCategory::BarreE,
        label: "shifted",
    };
    let err = validate_template(ChordQuality::Major, &bad).unwrap_err();
    assert!(matches!(err, FretlabError::InvalidTemplate { .. }));

    let fingered_mute = VoicingTemplate {
        shape: [MUTED, 0, 2, 2, 2, 0],
        fingers: [1, 1, 3, 3, 3, 1],
        root_string: 1,
        barre: None,
        category: VoicingCategory::BarreA,
        label: "muted finger",
    };
    assert!(validate_template(ChordQuality::Major, &fingered_mute).is_err());
}

#[test]
fn test_voicing_serializes_camel_case() {
    let json = serde_json::to_value(&get_chord_voicings("C")[1]).unwrap();
    assert_eq!(json["baseFret"], 8);
    assert_eq!(json["barreStrings"], serde_json::json!([0, 5]));
    assert_eq!(json["category"], "barre-e");
    assert_eq!(json["bassNote"], "C");
}
