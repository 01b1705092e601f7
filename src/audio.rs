//! # Audio Output
//!
//! The audio-output handle every sound-producing engine schedules against, plus
//! the note/chord/scale preview player.
//!
//! Engines never create their own output. The application opens one (the cpal
//! backend behind the `audio` feature, or [`RecordingOutput`] offline and in
//! tests) and hands it over at construction. All start times are on the
//! output's own clock, never wall-clock time, so arpeggios, scale runs and
//! metronome beats stay sample-accurate however late the caller gets around to
//! scheduling them.
//!
//! ## Example
//! ```rust
//! use fretlab::audio::{Player, RecordingOutput};
//!
//! let mut player = Player::new(RecordingOutput::new());
//! player.play_chord(&["C", "E", "G"]);
//!
//! let starts: Vec<f64> = player.output().tones().iter().map(|t| t.start).collect();
//! assert_eq!(starts.len(), 3);
//! assert!((starts[2] - 0.08).abs() < 1e-9);
//! ```

use serde::Serialize;

use crate::pitch::{midi_to_frequency, note_index};
use crate::tuning::InstrumentTuning;

/// Envelopes ramp exponentially from their gain down to this level.
pub const SILENCE_GAIN: f64 = 0.001;

/// Length of a previewed note, seconds.
pub const NOTE_DURATION: f64 = 2.5;

pub const NOTE_GAIN: f64 = 0.5;
pub const CHORD_GAIN: f64 = 0.35;

/// Gap between chord tones when a chord is strummed, seconds.
pub const ARPEGGIO_SPACING: f64 = 0.04;

/// Time between notes of a previewed scale, seconds.
pub const SCALE_STEP: f64 = 0.3;

/// MIDI note chord and scale previews start from (C4).
pub const PREVIEW_BASE_MIDI: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    /// Plucked-string patch: a sawtooth that darkens as it decays, an octave
    /// triangle on top and a short noise transient at the attack.
    Pluck,
}

/// Exponential frequency sweep from the tone's start frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Glide {
    pub target: f64,
    /// Seconds from the tone's start until `target` is reached.
    pub time: f64,
}

/// One oscillator voice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glide: Option<Glide>,
    /// Start time on the output clock, seconds.
    pub start: f64,
    /// The voice is cut after this many seconds.
    pub duration: f64,
    pub gain: f64,
    /// Seconds for the envelope to fall from `gain` to [`SILENCE_GAIN`].
    pub decay: f64,
}

impl Tone {
    /// A fixed-pitch voice whose envelope lasts its whole duration.
    pub fn new(waveform: Waveform, frequency: f64, start: f64, duration: f64, gain: f64) -> Self {
        Self {
            waveform,
            frequency,
            glide: None,
            start,
            duration,
            gain,
            decay: duration,
        }
    }

    pub fn with_glide(mut self, target: f64, time: f64) -> Self {
        self.glide = Some(Glide { target, time });
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Lowpass,
    Highpass,
    Bandpass,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub kind: FilterKind,
    pub frequency: f64,
}

impl Filter {
    pub fn highpass(frequency: f64) -> Self {
        Self { kind: FilterKind::Highpass, frequency }
    }

    pub fn bandpass(frequency: f64) -> Self {
        Self { kind: FilterKind::Bandpass, frequency }
    }
}

/// A burst of white noise through a chain of filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseBurst {
    pub start: f64,
    pub duration: f64,
    pub gain: f64,
    pub decay: f64,
    /// Applied in order.
    pub filters: Vec<Filter>,
}

/// Where scheduled sounds go.
///
/// Implementations queue the event and return immediately; overlapping events
/// simply layer.
pub trait AudioOutput {
    /// Current time of the output clock, seconds.
    fn current_time(&self) -> f64;

    fn schedule_tone(&mut self, tone: Tone);

    fn schedule_noise(&mut self, burst: NoiseBurst);

    /// Wake a suspended output. Engines call this before they start.
    fn resume(&mut self) {}

    /// Release the device. Nothing scheduled afterwards is heard.
    fn close(&mut self) {}
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn schedule_tone(&mut self, tone: Tone) {
        (**self).schedule_tone(tone)
    }

    fn schedule_noise(&mut self, burst: NoiseBurst) {
        (**self).schedule_noise(burst)
    }

    fn resume(&mut self) {
        (**self).resume()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// An offline output whose clock only moves when told to.
///
/// Keeps everything scheduled on it, which makes it both the test double for
/// the engines and the clock behind the CLI's printed metronome schedule.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    time: f64,
    tones: Vec<Tone>,
    noise: Vec<NoiseBurst>,
    resumed: bool,
    closed: bool,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.time += seconds;
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn noise(&self) -> &[NoiseBurst] {
        &self.noise
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn clear(&mut self) {
        self.tones.clear();
        self.noise.clear();
    }
}

impl AudioOutput for RecordingOutput {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn schedule_tone(&mut self, tone: Tone) {
        if !self.closed {
            self.tones.push(tone);
        }
    }

    fn schedule_noise(&mut self, burst: NoiseBurst) {
        if !self.closed {
            self.noise.push(burst);
        }
    }

    fn resume(&mut self) {
        self.resumed = true;
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// MIDI numbers for `notes` laid out ascending from C4.
///
/// Whenever a note would land on or below the previous one it moves up an
/// octave. Unknown names count as C.
pub fn scale_to_midi<S: AsRef<str>>(notes: &[S]) -> Vec<u8> {
    let mut midis: Vec<u8> = Vec::with_capacity(notes.len());
    let mut octave = PREVIEW_BASE_MIDI;
    for note in notes {
        let semitone = note_index(note.as_ref()).unwrap_or(0);
        let mut midi = octave.saturating_add(semitone);
        if midis.last().is_some_and(|&prev| midi <= prev) {
            octave = octave.saturating_add(12);
            midi = octave.saturating_add(semitone);
        }
        midis.push(midi);
    }
    midis
}

struct ScaleRun {
    midis: Vec<u8>,
    next: usize,
    start: f64,
}

/// Note, chord and scale preview.
///
/// Scale playback is stepwise: [`Player::play_scale`] sounds the first note
/// and [`Player::tick`] sounds each following one once its time has come.
/// Starting another scale cancels the one in flight.
pub struct Player<O: AudioOutput> {
    output: O,
    scale: Option<ScaleRun>,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O) -> Self {
        Self { output, scale: None }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Sound the note at `fret` on `string_index` (0 is the highest string).
    ///
    /// Returns the MIDI note, or `None` when the tuning has no such string.
    pub fn play_note(&mut self, string_index: usize, fret: u8, tuning: &InstrumentTuning) -> Option<u8> {
        let open = *tuning.midi_notes.get(string_index)?;
        let midi = open.saturating_add(fret);
        let now = self.output.current_time();
        self.sound(midi, now, NOTE_GAIN);
        Some(midi)
    }

    /// Strum `notes` upward from C4.
    pub fn play_chord<S: AsRef<str>>(&mut self, notes: &[S]) {
        let now = self.output.current_time();
        for (i, midi) in scale_to_midi(notes).into_iter().enumerate() {
            self.sound(midi, now + i as f64 * ARPEGGIO_SPACING, CHORD_GAIN);
        }
    }

    /// Run up `notes` from C4 and finish on the root an octave up.
    pub fn play_scale<S: AsRef<str>>(&mut self, notes: &[S]) {
        if self.scale.take().is_some() {
            log::debug!("scale preview cancelled by a new one");
        }
        let mut midis = scale_to_midi(notes);
        let Some(&root) = midis.first() else {
            return;
        };
        midis.push(root.saturating_add(12));

        self.scale = Some(ScaleRun {
            midis,
            next: 0,
            start: self.output.current_time(),
        });
        self.tick();
    }

    pub fn cancel_scale(&mut self) {
        self.scale = None;
    }

    pub fn is_playing_scale(&self) -> bool {
        self.scale.is_some()
    }

    /// Sound every pending scale note whose time has come. Returns how many.
    pub fn tick(&mut self) -> usize {
        let now = self.output.current_time();
        let mut due = Vec::new();
        if let Some(run) = self.scale.as_mut() {
            while run.next < run.midis.len() {
                let at = run.start + run.next as f64 * SCALE_STEP;
                if at > now {
                    break;
                }
                due.push((run.midis[run.next], at));
                run.next += 1;
            }
            if run.next == run.midis.len() {
                self.scale = None;
            }
        }
        for &(midi, at) in &due {
            self.sound(midi, at, NOTE_GAIN);
        }
        due.len()
    }

    /// Output clock time of the next pending scale note.
    pub fn next_scale_time(&self) -> Option<f64> {
        self.scale
            .as_ref()
            .map(|run| run.start + run.next as f64 * SCALE_STEP)
    }

    pub fn close(&mut self) {
        self.scale = None;
        self.output.close();
    }

    fn sound(&mut self, midi: u8, start: f64, gain: f64) {
        let frequency = midi_to_frequency(midi as f64);
        self.output
            .schedule_tone(Tone::new(Waveform::Pluck, frequency, start, NOTE_DURATION, gain));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::standard_tuning;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn midis(output: &RecordingOutput) -> Vec<u8> {
        output
            .tones()
            .iter()
            .map(|t| (69.0 + 12.0 * (t.frequency / 440.0).log2()).round() as u8)
            .collect()
    }

    #[test]
    fn test_scale_to_midi_ascends() {
        assert_eq!(scale_to_midi(&["C", "E", "G"]), vec![60, 64, 67]);
        assert_eq!(scale_to_midi(&["G", "B", "D"]), vec![67, 71, 74]);
        assert_eq!(scale_to_midi(&["A", "A"]), vec![69, 81]);
        assert_eq!(scale_to_midi(&["X"]), vec![60]);
        assert!(scale_to_midi::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_play_note_uses_open_string() {
        let mut player = Player::new(RecordingOutput::new());
        let tuning = standard_tuning();
        assert_eq!(player.play_note(0, 5, &tuning), Some(69));
        assert_eq!(player.play_note(5, 0, &tuning), Some(40));
        assert_eq!(player.play_note(6, 0, &tuning), None);

        let tones = player.output().tones();
        assert_eq!(tones.len(), 2);
        assert_abs_diff_eq!(tones[0].frequency, 440.0, epsilon = 1e-9);
        assert_eq!(tones[0].duration, NOTE_DURATION);
        assert_eq!(tones[0].gain, NOTE_GAIN);
    }

    #[test]
    fn test_play_chord_arpeggiates() {
        let mut player = Player::new(RecordingOutput::new());
        player.output_mut().set_time(1.0);
        player.play_chord(&["C", "E", "G"]);

        let tones = player.output().tones();
        assert_eq!(midis(player.output()), vec![60, 64, 67]);
        for (i, tone) in tones.iter().enumerate() {
            assert_abs_diff_eq!(tone.start, 1.0 + i as f64 * ARPEGGIO_SPACING, epsilon = 1e-9);
            assert_eq!(tone.gain, CHORD_GAIN);
        }
    }

    #[test]
    fn test_play_scale_steps_and_ends_on_octave() {
        let mut player = Player::new(RecordingOutput::new());
        player.play_scale(&["C", "D", "E"]);
        assert_eq!(midis(player.output()), vec![60]);

        player.output_mut().advance(0.35);
        assert_eq!(player.tick(), 1);
        player.output_mut().advance(1.0);
        assert_eq!(player.tick(), 2);
        assert!(!player.is_playing_scale());

        assert_eq!(midis(player.output()), vec![60, 62, 64, 72]);
        let starts: Vec<f64> = player.output().tones().iter().map(|t| t.start).collect();
        assert_abs_diff_eq!(starts[3], 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_new_scale_cancels_previous() {
        let mut player = Player::new(RecordingOutput::new());
        player.play_scale(&["C", "D", "E", "F"]);
        player.output_mut().advance(0.3);
        player.tick();

        player.play_scale(&["A"]);
        player.output_mut().advance(5.0);
        player.tick();

        // C D from the first run, then A4 and A5 from the second
        assert_eq!(midis(player.output()), vec![60, 62, 69, 81]);
    }

    #[test]
    fn test_empty_scale_plays_nothing() {
        let mut player = Player::new(RecordingOutput::new());
        player.play_scale::<&str>(&[]);
        assert!(!player.is_playing_scale());
        assert!(player.output().tones().is_empty());
    }

    #[test]
    fn test_closed_output_drops_events() {
        let mut player = Player::new(RecordingOutput::new());
        player.close();
        player.play_chord(&["C"]);
        assert!(player.output().is_closed());
        assert!(player.output().tones().is_empty());
    }
}
