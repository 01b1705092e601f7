//! Tuner engine
//!
//! `Idle → Listening → Idle`. The host calls [`TunerEngine::detect`] once per
//! display frame while listening.

use super::detector::PitchDetector;
use super::types::{AudioInput, Detection, InputDevice, TunerResult, WINDOW_SIZE};
use crate::error::{MicrophoneError, Result};

type ResultCallback = Box<dyn FnMut(Option<&TunerResult>)>;
type ErrorCallback = Box<dyn FnMut(&MicrophoneError)>;

pub struct TunerEngine {
    device: Option<Box<dyn InputDevice>>,
    input: Option<Box<dyn AudioInput>>,
    buffer: Vec<f32>,
    detector: PitchDetector,
    on_result: Option<ResultCallback>,
    on_error: Option<ErrorCallback>,
}

impl TunerEngine {
    /// A tuner reading from `device`. `None` means the host has no audio input
    /// API at all; every `start()` then reports [`MicrophoneError::NotSupported`].
    pub fn new(device: Option<Box<dyn InputDevice>>) -> Self {
        Self {
            device,
            input: None,
            buffer: vec![0.0; WINDOW_SIZE],
            detector: PitchDetector::new(),
            on_result: None,
            on_error: None,
        }
    }

    /// Called with every reported reading; `None` clears the display.
    pub fn on_result(&mut self, callback: impl FnMut(Option<&TunerResult>) + 'static) {
        self.on_result = Some(Box::new(callback));
    }

    pub fn on_error(&mut self, callback: impl FnMut(&MicrophoneError) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    pub fn is_listening(&self) -> bool {
        self.input.is_some()
    }

    /// Open the input and start listening. A no-op while already listening.
    ///
    /// On failure the error callback fires, the engine stays idle and the error
    /// is returned so the caller may retry.
    pub fn start(&mut self) -> Result<()> {
        if self.is_listening() {
            return Ok(());
        }
        let opened = match self.device.as_mut() {
            Some(device) => device.open(),
            None => Err(MicrophoneError::NotSupported),
        };
        match opened {
            Ok(input) => {
                log::info!("tuner listening at {} Hz", input.sample_rate());
                self.input = Some(input);
                self.detector.reset();
                Ok(())
            }
            Err(err) => {
                log::warn!("tuner could not open input: {}", err);
                if let Some(callback) = self.on_error.as_mut() {
                    callback(&err);
                }
                Err(err.into())
            }
        }
    }

    /// Analyse the latest window and report what it produced.
    ///
    /// Returns the detection so hosts without callbacks can poll.
    pub fn detect(&mut self) -> Option<Detection> {
        let input = self.input.as_mut()?;
        input.read_latest(&mut self.buffer);
        let detection = self.detector.process(&self.buffer, input.sample_rate());

        match &detection {
            Detection::Rejected => self.emit(None),
            Detection::Detected(result) => self.emit(Some(result)),
            Detection::Settling => {}
        }
        Some(detection)
    }

    /// Stop listening and report a final empty reading. Idempotent.
    pub fn stop(&mut self) {
        let Some(mut input) = self.input.take() else {
            return;
        };
        input.close();
        log::info!("tuner stopped");
        self.emit(None);
    }

    /// Stop and drop the device handle.
    pub fn dispose(&mut self) {
        self.stop();
        self.device = None;
    }

    fn emit(&mut self, result: Option<&TunerResult>) {
        if let Some(callback) = self.on_result.as_mut() {
            callback(result);
        }
    }
}

impl Drop for TunerEngine {
    fn drop(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.close();
        }
    }
}

/// A fixed signal played back as if it were live input.
///
/// Each read returns the next window of the signal, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SignalInput {
    samples: Vec<f32>,
    sample_rate: f64,
    position: usize,
}

impl SignalInput {
    pub fn new(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self { samples, sample_rate, position: 0 }
    }

    /// A sine wave of `frequency` Hz lasting `seconds`.
    pub fn sine(frequency: f64, amplitude: f32, sample_rate: f64, seconds: f64) -> Self {
        let len = (sample_rate * seconds).round() as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate;
                amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
            })
            .collect();
        Self::new(samples, sample_rate)
    }
}

impl AudioInput for SignalInput {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn read_latest(&mut self, buffer: &mut [f32]) {
        if self.samples.is_empty() {
            buffer.fill(0.0);
            return;
        }
        for slot in buffer.iter_mut() {
            *slot = self.samples[self.position];
            self.position = (self.position + 1) % self.samples.len();
        }
    }
}

/// Hands out clones of one [`SignalInput`]; or a fixed error.
pub struct SignalDevice {
    signal: std::result::Result<SignalInput, MicrophoneError>,
}

impl SignalDevice {
    pub fn new(signal: SignalInput) -> Self {
        Self { signal: Ok(signal) }
    }

    pub fn failing(error: MicrophoneError) -> Self {
        Self { signal: Err(error) }
    }
}

impl InputDevice for SignalDevice {
    fn open(&mut self) -> std::result::Result<Box<dyn AudioInput>, MicrophoneError> {
        match &self.signal {
            Ok(signal) => Ok(Box::new(signal.clone())),
            Err(err) => Err(err.clone()),
        }
    }
}
