//! cpal implementations of the audio traits.
//!
//! [`CpalOutput`] renders scheduled tones and noise bursts on the default output
//! device; its clock counts rendered frames. [`CpalInputDevice`] opens the
//! default input device for the tuner.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::{AudioOutput, Filter, FilterKind, NoiseBurst, Tone, Waveform, SILENCE_GAIN};
use crate::error::{FretlabError, MicrophoneError, Result};
use crate::tuner::{AudioInput, InputDevice, WINDOW_SIZE};

enum Event {
    Tone(Tone),
    Noise(NoiseBurst),
}

/// Exponential decay from `gain` to [`SILENCE_GAIN`] over `decay` seconds.
fn envelope(gain: f64, decay: f64, t: f64) -> f64 {
    if gain <= SILENCE_GAIN || decay <= 0.0 {
        return 0.0;
    }
    let progress = (t / decay).min(1.0);
    gain * (SILENCE_GAIN / gain).powf(progress)
}

fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    use std::f64::consts::TAU;
    let saw = |p: f64| 2.0 * p - 1.0;
    let triangle = |p: f64| 1.0 - 4.0 * (p - 0.5).abs();
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Triangle => triangle(phase),
        Waveform::Sawtooth => saw(phase),
        Waveform::Pluck => {
            0.6 * saw(phase) + 0.15 * triangle((2.0 * phase).fract()) + 0.25 * (TAU * phase).sin()
        }
    }
}

/// RBJ biquad, Q = 1.
struct Biquad {
    b: [f64; 3],
    a: [f64; 2],
    x: [f64; 2],
    y: [f64; 2],
}

impl Biquad {
    fn new(filter: Filter, sample_rate: f64) -> Self {
        let w0 = std::f64::consts::TAU * (filter.frequency / sample_rate).min(0.49);
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / 2.0;
        let (b0, b1, b2) = match filter.kind {
            FilterKind::Lowpass => ((1.0 - cos) / 2.0, 1.0 - cos, (1.0 - cos) / 2.0),
            FilterKind::Highpass => ((1.0 + cos) / 2.0, -(1.0 + cos), (1.0 + cos) / 2.0),
            FilterKind::Bandpass => (alpha, 0.0, -alpha),
        };
        let a0 = 1.0 + alpha;
        Self {
            b: [b0 / a0, b1 / a0, b2 / a0],
            a: [-2.0 * cos / a0, (1.0 - alpha) / a0],
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let out = self.b[0] * input + self.b[1] * self.x[0] + self.b[2] * self.x[1]
            - self.a[0] * self.y[0]
            - self.a[1] * self.y[1];
        self.x = [input, self.x[0]];
        self.y = [out, self.y[0]];
        out
    }
}

enum Source {
    Tone { tone: Tone, phase: f64 },
    Noise { burst: NoiseBurst, filters: Vec<Biquad>, seed: u32 },
}

struct Voice {
    start_frame: u64,
    end_frame: u64,
    source: Source,
}

impl Voice {
    fn new(event: Event, sample_rate: f64, seed: u32) -> Self {
        let frame = |t: f64| (t.max(0.0) * sample_rate) as u64;
        match event {
            Event::Tone(tone) => Voice {
                start_frame: frame(tone.start),
                end_frame: frame(tone.end()),
                source: Source::Tone { tone, phase: 0.0 },
            },
            Event::Noise(burst) => Voice {
                start_frame: frame(burst.start),
                end_frame: frame(burst.start + burst.duration),
                source: Source::Noise {
                    filters: burst.filters.iter().map(|&f| Biquad::new(f, sample_rate)).collect(),
                    burst,
                    seed: seed.max(1),
                },
            },
        }
    }

    fn sample(&mut self, frame: u64, sample_rate: f64) -> f64 {
        let t = (frame - self.start_frame) as f64 / sample_rate;
        match &mut self.source {
            Source::Tone { tone, phase } => {
                let frequency = match tone.glide {
                    Some(glide) if glide.time > 0.0 && glide.target > 0.0 => {
                        let progress = (t / glide.time).min(1.0);
                        tone.frequency * (glide.target / tone.frequency).powf(progress)
                    }
                    _ => tone.frequency,
                };
                let value = oscillator(tone.waveform, *phase) * envelope(tone.gain, tone.decay, t);
                *phase = (*phase + frequency / sample_rate).fract();
                value
            }
            Source::Noise { burst, filters, seed } => {
                // xorshift32
                *seed ^= *seed << 13;
                *seed ^= *seed >> 17;
                *seed ^= *seed << 5;
                let mut value = *seed as f64 / u32::MAX as f64 * 2.0 - 1.0;
                for filter in filters.iter_mut() {
                    value = filter.process(value);
                }
                value * envelope(burst.gain, burst.decay, t)
            }
        }
    }
}

/// The default output device.
///
/// Scheduling sends the event to the audio callback over a channel, so it
/// never blocks.
pub struct CpalOutput {
    stream: cpal::Stream,
    events: mpsc::Sender<Event>,
    frames: Arc<AtomicU64>,
    sample_rate: f64,
    closed: bool,
}

impl CpalOutput {
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| FretlabError::AudioBackend("no output audio device available".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| FretlabError::AudioBackend(format!("failed to get default output config: {}", e)))?;

        let sample_rate = config.sample_rate() as f64;
        let channels = config.channels().max(1) as usize;
        let (events, inbox) = mpsc::channel::<Event>();
        let frames = Arc::new(AtomicU64::new(0));
        let clock = Arc::clone(&frames);

        let mut voices: Vec<Voice> = Vec::new();
        let mut seed: u32 = 0x9E37_79B9;

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Ok(event) = inbox.try_recv() {
                        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                        voices.push(Voice::new(event, sample_rate, seed));
                    }
                    let first = clock.load(Ordering::Relaxed);
                    let mut frame = first;
                    for out in data.chunks_mut(channels) {
                        let mut mix = 0.0;
                        for voice in voices.iter_mut() {
                            if frame >= voice.start_frame && frame < voice.end_frame {
                                mix += voice.sample(frame, sample_rate);
                            }
                        }
                        out.fill(mix.clamp(-1.0, 1.0) as f32);
                        frame += 1;
                    }
                    voices.retain(|v| v.end_frame > frame);
                    clock.store(frame, Ordering::Relaxed);
                },
                move |err| {
                    log::warn!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| FretlabError::AudioBackend(format!("failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| FretlabError::AudioBackend(format!("failed to play stream: {}", e)))?;
        log::info!("audio output open at {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            stream,
            events,
            frames,
            sample_rate,
            closed: false,
        })
    }

    fn send(&mut self, event: Event) {
        if self.closed {
            return;
        }
        if self.events.send(event).is_err() {
            log::warn!("audio callback gone; event dropped");
        }
    }
}

impl AudioOutput for CpalOutput {
    fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    fn schedule_tone(&mut self, tone: Tone) {
        self.send(Event::Tone(tone));
    }

    fn schedule_noise(&mut self, burst: NoiseBurst) {
        self.send(Event::Noise(burst));
    }

    fn resume(&mut self) {
        if let Err(e) = self.stream.play() {
            log::warn!("could not resume audio output: {}", e);
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.pause() {
            log::warn!("could not pause audio output: {}", e);
        }
    }
}

/// Live samples from the default input device, first channel only.
pub struct CpalInput {
    stream: cpal::Stream,
    ring: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: f64,
}

impl AudioInput for CpalInput {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn read_latest(&mut self, buffer: &mut [f32]) {
        let Ok(ring) = self.ring.lock() else {
            buffer.fill(0.0);
            return;
        };
        let available = ring.len().min(buffer.len());
        let pad = buffer.len() - available;
        buffer[..pad].fill(0.0);
        for (slot, sample) in buffer[pad..].iter_mut().zip(ring.iter().skip(ring.len() - available)) {
            *slot = *sample;
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.stream.pause() {
            log::warn!("could not pause audio input: {}", e);
        }
    }
}

/// Opens the host's default input device.
#[derive(Debug, Default)]
pub struct CpalInputDevice;

impl InputDevice for CpalInputDevice {
    fn open(&mut self) -> std::result::Result<Box<dyn AudioInput>, MicrophoneError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(MicrophoneError::NoDevice)?;
        let config = device
            .default_input_config()
            .map_err(|e| MicrophoneError::Other(e.to_string()))?;

        let sample_rate = config.sample_rate() as f64;
        let channels = config.channels().max(1) as usize;
        let ring = Arc::new(Mutex::new(VecDeque::with_capacity(WINDOW_SIZE * 2)));
        let writer = Arc::clone(&ring);

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let Ok(mut ring) = writer.lock() else {
                        return;
                    };
                    for frame in data.chunks(channels) {
                        ring.push_back(frame[0]);
                    }
                    let excess = ring.len().saturating_sub(WINDOW_SIZE * 2);
                    ring.drain(..excess);
                },
                move |err| {
                    log::warn!("audio input error: {}", err);
                },
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => MicrophoneError::NoDevice,
                other => MicrophoneError::Other(other.to_string()),
            })?;

        stream.play().map_err(|e| MicrophoneError::Other(e.to_string()))?;
        Ok(Box::new(CpalInput { stream, ring, sample_rate }))
    }
}
