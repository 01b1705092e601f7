//! # Voicing Module
//!
//! Guitar chord shapes for a chord name in standard tuning.
//!
//! ## Purpose
//! A chord name resolves to a list of frettings drawn from two sources:
//! 1. **Catalog** - hand-fingered open and barre shapes, matched by exact name
//! 2. **Templates** - movable shapes per chord quality, transposed up the neck
//!
//! ## Sub-modules
//! - `types` - ChordVoicing, VoicingTemplate, ChordQuality definitions
//! - `catalog` - the fixed hand-fingered voicings
//! - `templates` - movable shapes keyed by [`ChordQuality`]
//! - `engine` - lookup, transposition, playability filter and deduplication
//!
//! ## Entry Point
//! [`get_chord_voicings()`] - every voicing for a chord name
//!
//! ## Example
//! ```rust
//! use fretlab::voicing::get_chord_voicings;
//!
//! let voicings = get_chord_voicings("C");
//! assert_eq!(voicings[0].frets, [-1, 3, 2, 0, 1, 0]);
//! assert!(voicings.iter().skip(1).all(|v| v.base_fret > 1));
//! ```
//!
//! ## Transposition
//!
//! A template is written with its root at offset 0 on `root_string`. For a
//! target root the base fret is the distance from that open string up to the
//! root, modulo an octave. Every non-muted offset is shifted by the base fret:
//!
//! ```text
//! E-form major   [0, 2, 2, 1, 0, 0]
//! G (base 3)     [3, 5, 5, 4, 3, 3]   barre at 3 over strings 0-5
//! ```
//!
//! A base fret of 0 is skipped since the open shape is already in the catalog.
//!
//! ## Playability
//!
//! Fretted strings (fret > 0) must fit within a four-fret span and no fret may
//! exceed 15. Open and muted strings do not count toward the span.
//!
//! ## Ordering
//!
//! Catalog matches come first in catalog order, followed by generated shapes in
//! template order. A generated shape with the same fret pattern as one already
//! listed is dropped. Nothing is re-sorted.
//!
//! ## Related Modules
//! - `chord` - chord-name parsing and chord tones
//! - `tuning` - whether the current tuning can use these shapes at all

mod types;
mod catalog;
mod templates;
mod engine;

#[cfg(test)]
mod tests;

pub use types::{
    Barre, ChordQuality, ChordVoicing, VoicingCategory, VoicingTemplate, MUTED,
    STANDARD_OPEN_MIDI, STRING_COUNT,
};
pub use catalog::{bass_note, direct_voicings, CatalogEntry, VOICINGS};
pub use templates::{templates_for, validate_all_templates, validate_template};
pub use engine::{
    generate_voicings, get_chord_voicings, is_playable, templates_are_valid, voicings_for_bass,
    MAX_FRET, MAX_FRET_SPAN,
};
