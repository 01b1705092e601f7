//! # Settings
//!
//! Startup configuration, read from YAML.
//!
//! Keys are kebab-case and all optional:
//!
//! ```yaml
//! instrument: guitar        # guitar | bass
//! tuning: Drop D            # a tuning name the instrument carries
//! show-intervals: true
//! frets: 22                # 1..=24, default 21
//! metronome:
//!   bpm: 90                 # clamped to 30..=300
//!   time-signature: 6/8
//!   pattern: Jazz
//!   drums: true
//!   drum-volume: 0.5        # 0.0..=1.0
//!   click: false
//! ```
//!
//! The raw document is deserialized into [`RawSettings`] and then validated
//! into [`Settings`], so names are checked once at startup and the engines only
//! ever see known instruments, tunings, meters and patterns.

use std::path::Path;

use serde::Deserialize;

use crate::audio::AudioOutput;
use crate::error::{FretlabError, Result};
use crate::metronome::{
    clamp_bpm, find_drum_pattern, find_time_signature, DrumPattern, MetronomeEngine, TimeSignature,
    DEFAULT_BPM, DEFAULT_DRUM_VOLUME, TIME_SIGNATURES,
};
use crate::tuning::{
    get_instrument, get_tuning_for_instrument, InstrumentId, InstrumentTuning, NUM_FRETS,
};

/// Largest fret count a fretboard may be drawn with.
pub const MAX_FRETS: usize = 24;

/// Settings as written in the YAML file.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawSettings {
    pub instrument: Option<String>,
    pub tuning: Option<String>,
    pub show_intervals: Option<bool>,
    pub frets: Option<usize>,
    pub metronome: Option<RawMetronomeSettings>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawMetronomeSettings {
    pub bpm: Option<u32>,
    pub time_signature: Option<String>,
    pub pattern: Option<String>,
    pub drums: Option<bool>,
    pub drum_volume: Option<f64>,
    pub click: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetronomeSettings {
    pub bpm: u32,
    pub time_signature: TimeSignature,
    pub pattern: Option<&'static DrumPattern>,
    pub drums_enabled: bool,
    pub drum_volume: f64,
    pub click_enabled: bool,
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            time_signature: TIME_SIGNATURES[0],
            pattern: None,
            drums_enabled: false,
            drum_volume: DEFAULT_DRUM_VOLUME,
            click_enabled: true,
        }
    }
}

impl MetronomeSettings {
    /// Configure `engine` with these defaults.
    pub fn apply<O: AudioOutput>(&self, engine: &mut MetronomeEngine<O>) {
        engine.set_bpm(self.bpm);
        engine.set_time_signature(self.time_signature);
        engine.set_drum_pattern(self.pattern);
        engine.set_drums_enabled(self.drums_enabled);
        engine.set_drum_volume(self.drum_volume);
        engine.set_click_enabled(self.click_enabled);
    }
}

/// Validated startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub instrument: InstrumentId,
    pub tuning: String,
    pub show_intervals: bool,
    pub frets: usize,
    pub metronome: MetronomeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let guitar = get_instrument(InstrumentId::Guitar);
        Self {
            instrument: guitar.id,
            tuning: guitar.default_tuning_name.to_string(),
            show_intervals: false,
            frets: NUM_FRETS,
            metronome: MetronomeSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate a YAML settings document. An empty document gives
    /// the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSettings =
            serde_yaml::from_str(content).map_err(|e| FretlabError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FretlabError::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("loading settings from {}", path.display());
        Self::from_yaml(&content)
    }

    pub fn from_raw(raw: RawSettings) -> Result<Self> {
        let instrument_id = match &raw.instrument {
            Some(id) => InstrumentId::parse(id)
                .ok_or_else(|| FretlabError::Config(format!("Unknown instrument: {}", id)))?,
            None => InstrumentId::Guitar,
        };
        let instrument = get_instrument(instrument_id);

        let tuning = match raw.tuning {
            Some(name) => {
                if instrument.find_tuning(&name).is_none() {
                    return Err(FretlabError::UnknownTuning {
                        instrument: instrument_id.as_str().to_string(),
                        tuning: name,
                    });
                }
                name
            }
            None => instrument.default_tuning_name.to_string(),
        };

        let frets = raw.frets.unwrap_or(NUM_FRETS);
        if frets == 0 || frets > MAX_FRETS {
            return Err(FretlabError::Config(format!(
                "frets must be between 1 and {}, got {}",
                MAX_FRETS, frets
            )));
        }

        let metronome = match raw.metronome {
            Some(raw) => Self::metronome_from_raw(raw)?,
            None => MetronomeSettings::default(),
        };

        Ok(Settings {
            instrument: instrument_id,
            tuning,
            show_intervals: raw.show_intervals.unwrap_or(false),
            frets,
            metronome,
        })
    }

    fn metronome_from_raw(raw: RawMetronomeSettings) -> Result<MetronomeSettings> {
        let defaults = MetronomeSettings::default();

        let time_signature = match &raw.time_signature {
            Some(label) => *find_time_signature(label)
                .ok_or_else(|| FretlabError::Config(format!("Unknown time signature: {}", label)))?,
            None => defaults.time_signature,
        };

        let pattern = match &raw.pattern {
            Some(name) => Some(
                find_drum_pattern(name)
                    .ok_or_else(|| FretlabError::Config(format!("Unknown drum pattern: {}", name)))?,
            ),
            None => None,
        };

        let drum_volume = raw.drum_volume.unwrap_or(defaults.drum_volume);
        if !(0.0..=1.0).contains(&drum_volume) {
            return Err(FretlabError::Config(format!(
                "drum-volume must be between 0 and 1, got {}",
                drum_volume
            )));
        }

        Ok(MetronomeSettings {
            bpm: clamp_bpm(raw.bpm.unwrap_or(defaults.bpm)),
            time_signature,
            // naming a pattern turns the drums on unless they are switched off explicitly
            drums_enabled: raw.drums.unwrap_or(pattern.is_some()),
            pattern,
            drum_volume,
            click_enabled: raw.click.unwrap_or(defaults.click_enabled),
        })
    }

    /// The configured tuning. Validated names always resolve; the instrument
    /// default covers anything else.
    pub fn resolve_tuning(&self) -> InstrumentTuning {
        get_tuning_for_instrument(self.instrument, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingOutput;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_gives_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.instrument, InstrumentId::Guitar);
        assert_eq!(settings.frets, NUM_FRETS);
        assert_eq!(settings.resolve_tuning().name, "Standard");
    }

    #[test]
    fn test_fret_count_defaults_to_the_drawn_board() {
        assert_eq!(Settings::default().frets, 21);
        // the instrument's own fret count does not change the board
        let bass = Settings::from_yaml("instrument: bass").unwrap();
        assert_eq!(bass.frets, 21);
        assert_eq!(Settings::from_yaml("frets: 24").unwrap().frets, 24);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
instrument: bass
tuning: Drop D
show-intervals: true
frets: 20
metronome:
  bpm: 400
  time-signature: 6/8
  pattern: Jazz
  drum-volume: 0.5
  click: false
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.instrument, InstrumentId::Bass);
        assert!(settings.show_intervals);
        assert_eq!(settings.resolve_tuning().midi_notes.len(), 4);
        assert_eq!(settings.resolve_tuning().name, "Drop D");

        let metronome = &settings.metronome;
        assert_eq!(metronome.bpm, 300);
        assert_eq!(metronome.time_signature.label, "6/8");
        assert_eq!(metronome.pattern.map(|p| p.name), Some("Jazz"));
        assert!(metronome.drums_enabled);
        assert!(!metronome.click_enabled);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(matches!(Settings::from_yaml("instrument: banjo"), Err(FretlabError::Config(_))));
        assert!(matches!(
            Settings::from_yaml("instrument: bass\ntuning: DADGAD"),
            Err(FretlabError::UnknownTuning { .. })
        ));
        assert!(matches!(
            Settings::from_yaml("metronome:\n  time-signature: 9/8"),
            Err(FretlabError::Config(_))
        ));
        assert!(matches!(
            Settings::from_yaml("metronome:\n  pattern: Polka"),
            Err(FretlabError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_values() {
        assert!(Settings::from_yaml("frets: 0").is_err());
        assert!(Settings::from_yaml("frets: 30").is_err());
        assert!(Settings::from_yaml("metronome:\n  drum-volume: 1.5").is_err());
        assert!(Settings::from_yaml("metronome:\n  bpm: fast").is_err());
    }

    #[test]
    fn test_apply_configures_engine() {
        let settings = Settings::from_yaml("metronome:\n  bpm: 90\n  time-signature: 7/8\n  pattern: Latin").unwrap();
        let mut engine = MetronomeEngine::new(RecordingOutput::new());
        settings.metronome.apply(&mut engine);
        assert_eq!(engine.bpm(), 90);
        assert_eq!(engine.time_signature().label, "7/8");
        assert!(engine.drums_enabled());
        assert_eq!(engine.drum_pattern().map(|p| p.name), Some("Latin"));
    }
}
