//! Lookahead scheduler
//!
//! The host calls [`MetronomeEngine::tick`] every [`SCHEDULER_INTERVAL`]. Each
//! tick schedules every grid step that starts before `now + LOOKAHEAD` on the
//! output clock, so timing comes from the audio clock and never from when the
//! tick happened to run.

use std::collections::VecDeque;

use super::drums::{schedule_drum, DrumPattern, DrumStep, DEFAULT_DRUM_VOLUME};
use super::types::{
    clamp_bpm, ScheduledStep, TimeSignature, ACCENT_CLICK_FREQUENCY, ACCENT_CLICK_GAIN,
    CLICK_FREQUENCY, CLICK_GAIN, CLICK_LENGTH, DEFAULT_BPM, DEFAULT_PATTERN_STEPS, LOOKAHEAD,
    MAX_BPM, MIN_BPM, START_DELAY, TIME_SIGNATURES,
};
use crate::audio::{AudioOutput, Tone, Waveform};

type BeatCallback = Box<dyn FnMut(usize)>;
type StepCallback = Box<dyn FnMut(&ScheduledStep)>;

#[derive(Debug, Clone, Copy)]
struct BeatNotice {
    time: f64,
    beat: usize,
}

pub struct MetronomeEngine<O: AudioOutput> {
    output: O,
    bpm: u32,
    time_sig: TimeSignature,
    playing: bool,
    disposed: bool,
    next_step_time: f64,
    step: usize,
    drum_step: usize,
    drum_pattern: Option<&'static DrumPattern>,
    pattern_steps: Option<Vec<DrumStep>>,
    drums_enabled: bool,
    drum_volume: f64,
    click_enabled: bool,
    notices: VecDeque<BeatNotice>,
    on_beat: Option<BeatCallback>,
    on_step: Option<StepCallback>,
}

impl<O: AudioOutput> MetronomeEngine<O> {
    /// An idle metronome at 120 BPM in 4/4 with the click on and no drums.
    pub fn new(output: O) -> Self {
        Self {
            output,
            bpm: DEFAULT_BPM,
            time_sig: TIME_SIGNATURES[0],
            playing: false,
            disposed: false,
            next_step_time: 0.0,
            step: 0,
            drum_step: 0,
            drum_pattern: None,
            pattern_steps: None,
            drums_enabled: false,
            drum_volume: DEFAULT_DRUM_VOLUME,
            click_enabled: true,
            notices: VecDeque::new(),
            on_beat: None,
            on_step: None,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Set the tempo, clamped to 30..=300.
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = clamp_bpm(bpm);
        if self.bpm != bpm {
            log::debug!("bpm {} clamped to {} ({}..={})", bpm, self.bpm, MIN_BPM, MAX_BPM);
        }
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_sig
    }

    /// Change meter. The measure and drum counters restart from step 0.
    pub fn set_time_signature(&mut self, time_sig: TimeSignature) {
        self.time_sig = time_sig;
        self.step = 0;
        self.drum_step = 0;
        self.load_pattern_steps();
    }

    pub fn drum_pattern(&self) -> Option<&'static DrumPattern> {
        self.drum_pattern
    }

    pub fn set_drum_pattern(&mut self, pattern: Option<&'static DrumPattern>) {
        self.drum_pattern = pattern;
        self.drum_step = 0;
        self.load_pattern_steps();
    }

    pub fn drums_enabled(&self) -> bool {
        self.drums_enabled
    }

    pub fn set_drums_enabled(&mut self, enabled: bool) {
        self.drums_enabled = enabled;
    }

    pub fn drum_volume(&self) -> f64 {
        self.drum_volume
    }

    pub fn set_drum_volume(&mut self, volume: f64) {
        self.drum_volume = volume.clamp(0.0, 1.0);
    }

    pub fn click_enabled(&self) -> bool {
        self.click_enabled
    }

    pub fn set_click_enabled(&mut self, enabled: bool) {
        self.click_enabled = enabled;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Next step to be scheduled, counted within the measure.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Beat holding the next step to be scheduled. Equals
    /// [`TimeSignature::beat_at`] whenever that step starts a beat.
    pub fn current_beat(&self) -> usize {
        let per_beat = self.time_sig.steps_per_beat();
        let beat_start = self.step - self.step % per_beat;
        self.time_sig.beat_at(beat_start).unwrap_or(0)
    }

    /// Next step to be scheduled, counted within the drum pattern.
    pub fn current_drum_step(&self) -> usize {
        self.drum_step
    }

    /// Called with the beat index when a beat actually sounds.
    pub fn on_beat(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_beat = Some(Box::new(callback));
    }

    /// Called for every grid step as it is scheduled, ahead of time.
    pub fn on_step(&mut self, callback: impl FnMut(&ScheduledStep) + 'static) {
        self.on_step = Some(Box::new(callback));
    }

    /// Start from the top of the measure, slightly in the future. A no-op while playing.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        if self.disposed {
            log::warn!("metronome start ignored after dispose");
            return;
        }
        self.output.resume();
        self.playing = true;
        self.step = 0;
        self.drum_step = 0;
        self.notices.clear();
        self.next_step_time = self.output.current_time() + START_DELAY;
        log::info!("metronome started at {} BPM in {}", self.bpm, self.time_sig.label);
    }

    /// Stop and rewind the counters. Idempotent.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.step = 0;
        self.drum_step = 0;
        self.notices.clear();
        log::info!("metronome stopped");
    }

    /// Stop and close the output.
    pub fn dispose(&mut self) {
        self.stop();
        if !self.disposed {
            self.disposed = true;
            self.output.close();
        }
    }

    /// Schedule every step inside the lookahead window and deliver due beat
    /// notices. Returns the number of steps scheduled.
    pub fn tick(&mut self) -> usize {
        if !self.playing {
            return 0;
        }
        let now = self.output.current_time();
        let mut scheduled = 0;
        while self.next_step_time < now + LOOKAHEAD {
            self.schedule_step(self.next_step_time);
            self.next_step_time += self.time_sig.step_duration(self.bpm);
            self.advance();
            scheduled += 1;
        }
        self.deliver_notices(now);
        scheduled
    }

    /// Deliver beat notices whose time has come without scheduling anything.
    pub fn poll(&mut self) {
        let now = self.output.current_time();
        self.deliver_notices(now);
    }

    /// Seconds until the next pending beat notice is due.
    pub fn next_notice_delay(&self) -> Option<f64> {
        let now = self.output.current_time();
        self.notices.front().map(|n| (n.time - now).max(0.0))
    }

    fn schedule_step(&mut self, time: f64) {
        let step = self.step;
        let accent = step == 0;
        let click = self.click_enabled && self.time_sig.clicks_on(step);
        if click {
            let (frequency, gain) = if accent {
                (ACCENT_CLICK_FREQUENCY, ACCENT_CLICK_GAIN)
            } else {
                (CLICK_FREQUENCY, CLICK_GAIN)
            };
            self.output
                .schedule_tone(Tone::new(Waveform::Sine, frequency, time, CLICK_LENGTH, gain));
        }

        let drums = match (&self.pattern_steps, self.drums_enabled) {
            (Some(steps), true) => steps.get(self.drum_step).cloned().unwrap_or_default(),
            _ => Vec::new(),
        };
        for &sound in &drums {
            schedule_drum(&mut self.output, sound, time, self.drum_volume);
        }

        let beat = self.time_sig.beat_at(step);
        if let Some(beat) = beat {
            self.notices.push_back(BeatNotice { time, beat });
        }

        if let Some(callback) = self.on_step.as_mut() {
            callback(&ScheduledStep {
                time,
                step,
                drum_step: self.drum_step,
                beat,
                click,
                accent: click && accent,
                drums,
            });
        }
    }

    fn advance(&mut self) {
        self.step = (self.step + 1) % self.time_sig.steps_per_measure().max(1);
        let pattern_len = match &self.pattern_steps {
            Some(steps) if !steps.is_empty() => steps.len(),
            _ => DEFAULT_PATTERN_STEPS,
        };
        self.drum_step = (self.drum_step + 1) % pattern_len;
    }

    fn deliver_notices(&mut self, now: f64) {
        while let Some(notice) = self.notices.front().copied() {
            if notice.time > now {
                break;
            }
            self.notices.pop_front();
            if let Some(callback) = self.on_beat.as_mut() {
                callback(notice.beat);
            }
        }
    }

    fn load_pattern_steps(&mut self) {
        self.pattern_steps = self
            .drum_pattern
            .and_then(|p| p.steps_for(self.time_sig.label));
        if let (Some(pattern), None) = (self.drum_pattern, &self.pattern_steps) {
            log::debug!("pattern {} has no {} grid", pattern.name, self.time_sig.label);
        }
    }
}

/// Taps kept for averaging.
pub const TAP_HISTORY: usize = 6;

/// Tempo from the spacing of the last few taps.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: VecDeque<f64>,
}

impl TapTempo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap at `millis` (any monotonic clock).
    ///
    /// From the second tap on, returns the tempo of the averaged tap interval
    /// when it falls within 30..=300 BPM.
    pub fn tap(&mut self, millis: f64) -> Option<u32> {
        self.taps.push_back(millis);
        if self.taps.len() > TAP_HISTORY {
            self.taps.pop_front();
        }
        if self.taps.len() < 2 {
            return None;
        }
        let intervals: Vec<f64> = self
            .taps
            .iter()
            .zip(self.taps.iter().skip(1))
            .map(|(a, b)| b - a)
            .collect();
        let avg = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if avg <= 0.0 {
            return None;
        }
        let bpm = (60_000.0 / avg).round();
        (MIN_BPM as f64..=MAX_BPM as f64)
            .contains(&bpm)
            .then_some(bpm as u32)
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }
}
