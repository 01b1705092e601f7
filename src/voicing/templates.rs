//! Movable voicing templates, one set per chord quality.

use super::types::VoicingCategory::{BarreA, BarreE, Open, Partial, Shell};
use super::types::{Barre, ChordQuality, VoicingCategory, VoicingTemplate, MUTED, STRING_COUNT};
use crate::error::{FretlabError, Result};

const X: i8 = MUTED;

const fn shape(
    shape: [i8; STRING_COUNT],
    fingers: [u8; STRING_COUNT],
    root_string: usize,
    category: VoicingCategory,
    label: &'static str,
) -> VoicingTemplate {
    VoicingTemplate { shape, fingers, root_string, barre: None, category, label }
}

const fn barre(
    shape: [i8; STRING_COUNT],
    fingers: [u8; STRING_COUNT],
    root_string: usize,
    strings: [usize; 2],
    category: VoicingCategory,
    label: &'static str,
) -> VoicingTemplate {
    VoicingTemplate {
        shape,
        fingers,
        root_string,
        barre: Some(Barre { offset: 0, strings }),
        category,
        label,
    }
}

const MAJOR: &[VoicingTemplate] = &[
    barre([0, 2, 2, 1, 0, 0], [1, 3, 4, 2, 1, 1], 0, [0, 5], BarreE, "E-form"),
    barre([X, 0, 2, 2, 2, 0], [0, 1, 3, 3, 3, 1], 1, [1, 5], BarreA, "A-form"),
    shape([X, X, 0, 1, 0, X], [0, 0, 0, 2, 0, 0], 2, Shell, "Shell (R-3-5)"),
];

const MINOR: &[VoicingTemplate] = &[
    barre([0, 2, 2, 0, 0, 0], [1, 3, 4, 1, 1, 1], 0, [0, 5], BarreE, "E-form"),
    barre([X, 0, 2, 2, 1, 0], [0, 1, 3, 4, 2, 1], 1, [1, 5], BarreA, "A-form"),
];

const DOMINANT_7: &[VoicingTemplate] = &[
    barre([0, 2, 0, 1, 0, 0], [1, 3, 0, 2, 0, 1], 0, [0, 5], BarreE, "E-form 7"),
    barre([X, 0, 2, 0, 2, 0], [0, 1, 3, 0, 4, 0], 1, [1, 5], BarreA, "A-form 7"),
    shape([X, 0, 1, 0, X, X], [0, 0, 2, 0, 0, 0], 1, Shell, "Shell (R-3-b7)"),
    shape([X, 0, 0, 1, X, X], [0, 0, 0, 2, 0, 0], 1, Shell, "Shell (R-b7-3)"),
];

const MAJOR_7: &[VoicingTemplate] = &[
    barre([0, 2, 1, 1, 0, 0], [1, 4, 2, 3, 1, 1], 0, [0, 5], BarreE, "E-form maj7"),
    barre([X, 0, 2, 1, 2, 0], [0, 1, 3, 2, 4, 1], 1, [1, 5], BarreA, "A-form maj7"),
    shape([X, 0, 1, 1, X, X], [0, 0, 2, 3, 0, 0], 1, Shell, "Shell (R-3-7)"),
];

const MINOR_7: &[VoicingTemplate] = &[
    barre([0, 2, 0, 0, 0, 0], [1, 3, 0, 0, 1, 1], 0, [0, 5], BarreE, "E-form m7"),
    barre([X, 0, 2, 0, 1, 0], [0, 1, 4, 0, 2, 1], 1, [1, 5], BarreA, "A-form m7"),
    shape([X, 0, 0, 0, X, X], [0, 0, 0, 0, 0, 0], 1, Shell, "Shell (R-b3-b7)"),
];

const HALF_DIMINISHED: &[VoicingTemplate] = &[
    shape([X, 0, 1, 0, 1, X], [0, 1, 2, 0, 3, 0], 1, BarreA, "A-form m7b5"),
];

const DIMINISHED_7: &[VoicingTemplate] = &[
    shape([X, 0, 1, X, 1, X], [0, 0, 2, 0, 3, 0], 1, Partial, "dim7"),
];

const SUS2: &[VoicingTemplate] = &[
    barre([0, 2, 2, 0, 0, X], [1, 3, 4, 0, 1, 0], 0, [0, 4], BarreE, "E-form sus2"),
];

const SUS4: &[VoicingTemplate] = &[
    barre([0, 2, 2, 2, 0, 0], [1, 2, 3, 4, 1, 1], 0, [0, 5], BarreE, "E-form sus4"),
];

const ADD9: &[VoicingTemplate] = &[
    shape([X, 0, 2, 2, 0, 0], [0, 0, 2, 3, 0, 0], 1, Open, "add9"),
];

const SIXTH: &[VoicingTemplate] = &[
    barre([0, 2, 2, 1, 2, 0], [1, 2, 3, 1, 4, 1], 0, [0, 5], BarreE, "E-form 6"),
];

const MINOR_SIXTH: &[VoicingTemplate] = &[
    barre([0, 2, 2, 0, 2, 0], [1, 2, 3, 0, 4, 1], 0, [0, 5], BarreE, "E-form m6"),
];

const NINTH: &[VoicingTemplate] = &[
    shape([X, 0, 2, 1, 2, 0], [0, 1, 3, 2, 4, 0], 1, BarreA, "A-form 9"),
];

const MAJOR_9: &[VoicingTemplate] = &[
    shape([X, 0, 2, 1, 0, 0], [0, 0, 3, 2, 0, 0], 1, Partial, "maj9"),
];

const MINOR_9: &[VoicingTemplate] = &[
    barre([X, 0, 2, 0, 0, 0], [0, 1, 4, 0, 0, 1], 1, [1, 5], BarreA, "A-form m9"),
];

/// Templates for a quality, in display order.
pub fn templates_for(quality: ChordQuality) -> &'static [VoicingTemplate] {
    match quality {
        ChordQuality::Major => MAJOR,
        ChordQuality::Minor => MINOR,
        ChordQuality::Dominant7 => DOMINANT_7,
        ChordQuality::Major7 => MAJOR_7,
        ChordQuality::Minor7 => MINOR_7,
        ChordQuality::HalfDiminished => HALF_DIMINISHED,
        ChordQuality::Diminished7 => DIMINISHED_7,
        ChordQuality::Sus2 => SUS2,
        ChordQuality::Sus4 => SUS4,
        ChordQuality::Add9 => ADD9,
        ChordQuality::Sixth => SIXTH,
        ChordQuality::MinorSixth => MINOR_SIXTH,
        ChordQuality::Ninth => NINTH,
        ChordQuality::Major9 => MAJOR_9,
        ChordQuality::Minor9 => MINOR_9,
    }
}

/// Check one template against the shape invariants.
///
/// The root string must sit at offset 0, muted strings carry no finger, and a
/// barre must cover an ordered range that includes the root string.
pub fn validate_template(quality: ChordQuality, template: &VoicingTemplate) -> Result<()> {
    let invalid = |reason: String| FretlabError::InvalidTemplate {
        quality: quality.suffix().to_string(),
        reason: format!("{}: {}", template.label, reason),
    };

    if template.root_string >= STRING_COUNT {
        return Err(invalid(format!("root string {} out of range", template.root_string)));
    }
    if template.shape[template.root_string] != 0 {
        return Err(invalid("root string must be at offset 0".to_string()));
    }
    for (string, (&offset, &finger)) in template.shape.iter().zip(template.fingers.iter()).enumerate() {
        if offset < MUTED {
            return Err(invalid(format!("string {} has offset {}", string, offset)));
        }
        if offset == MUTED && finger != 0 {
            return Err(invalid(format!("muted string {} has finger {}", string, finger)));
        }
        if finger > 4 {
            return Err(invalid(format!("string {} has finger {}", string, finger)));
        }
    }
    if let Some(barre) = template.barre {
        let [from, to] = barre.strings;
        if from > to || to >= STRING_COUNT {
            return Err(invalid(format!("barre strings [{}, {}]", from, to)));
        }
        if !(from..=to).contains(&template.root_string) {
            return Err(invalid("barre does not cover the root string".to_string()));
        }
    }
    Ok(())
}

/// Validate every shipped template.
pub fn validate_all_templates() -> Result<()> {
    for quality in ChordQuality::ALL {
        for template in templates_for(quality) {
            validate_template(quality, template)?;
        }
    }
    Ok(())
}
