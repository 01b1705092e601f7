use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::error::{FretlabError, MicrophoneError};
use approx::assert_abs_diff_eq;

const SAMPLE_RATE: f64 = 44_100.0;

fn sine_window(frequency: f64) -> Vec<f32> {
    (0..WINDOW_SIZE)
        .map(|i| 0.5 * (2.0 * std::f64::consts::PI * frequency * i as f64 / SAMPLE_RATE).sin() as f32)
        .collect()
}

fn noise_window() -> Vec<f32> {
    let mut state: u32 = 0x1234_5678;
    (0..WINDOW_SIZE)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect()
}

fn recording_engine(signal: SignalInput) -> (TunerEngine, Rc<RefCell<Vec<Option<TunerResult>>>>) {
    let mut engine = TunerEngine::new(Some(Box::new(SignalDevice::new(signal))));
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    engine.on_result(move |r| sink.borrow_mut().push(r.cloned()));
    (engine, results)
}

#[test]
fn test_frequency_to_note() {
    assert_eq!(frequency_to_note(440.0), ("A", 4, 0));
    assert_eq!(frequency_to_note(261.6256), ("C", 4, 0));
    assert_eq!(frequency_to_note(82.41), ("E", 2, 0));
    // a quarter tone sharp of A4 rounds up to A♯ and reads flat
    let (note, octave, cents) = frequency_to_note(440.0 * 2f64.powf(0.6 / 12.0));
    assert_eq!((note, octave, cents), ("A♯", 4, -40));
}

#[test]
fn test_lag_range_covers_60_to_1200_hz() {
    let lags = lag_range(SAMPLE_RATE, WINDOW_SIZE);
    assert_eq!(lags.start, 36);
    assert_eq!(lags.end, 736);
    assert_eq!(lag_range(SAMPLE_RATE, 500).end, 500);
}

#[test]
fn test_nsdf_of_periodic_signal() {
    let buffer = sine_window(441.0);
    // 441 Hz at 44.1 kHz has a period of exactly 100 samples
    assert!(nsdf(&buffer, 100) > 0.99);
    assert!(nsdf(&buffer, 50) < -0.99);
    assert_eq!(nsdf(&buffer, WINDOW_SIZE), 0.0);
}

#[test]
fn test_rms() {
    assert_eq!(rms(&[]), 0.0);
    assert_abs_diff_eq!(rms(&[0.5, -0.5, 0.5, -0.5]), 0.5, epsilon = 1e-12);
}

#[test]
fn test_estimate_sine() {
    // lag 401 (four periods) correlates best; the first peak near lag 100 wins
    let estimate = estimate_frame(&sine_window(440.0), SAMPLE_RATE).unwrap();
    assert_abs_diff_eq!(estimate.frequency, 440.0, epsilon = 1.0);
    assert!(estimate.correlation > 0.9);
}

#[test]
fn test_estimate_low_string() {
    let estimate = estimate_frame(&sine_window(110.0), SAMPLE_RATE).unwrap();
    assert_abs_diff_eq!(estimate.frequency, 110.0, epsilon = 0.5);
}

#[test]
fn test_estimate_rejections() {
    assert_eq!(
        estimate_frame(&vec![0.0; WINDOW_SIZE], SAMPLE_RATE),
        Err(FrameRejection::Silence)
    );
    assert_eq!(
        estimate_frame(&vec![0.005; WINDOW_SIZE], SAMPLE_RATE),
        Err(FrameRejection::Silence)
    );
    assert_eq!(estimate_frame(&noise_window(), SAMPLE_RATE), Err(FrameRejection::Unvoiced));
}

#[test]
fn test_parabolic_interpolation_bounds() {
    let buffer = sine_window(440.0);
    assert_eq!(parabolic_interpolation(&buffer, 0), 0.0);
    assert_eq!(parabolic_interpolation(&buffer, WINDOW_SIZE - 1), (WINDOW_SIZE - 1) as f64);
    let refined = parabolic_interpolation(&buffer, 100);
    assert!((99.0..=101.0).contains(&refined));
    assert_abs_diff_eq!(refined, SAMPLE_RATE / 440.0, epsilon = 0.1);
}

#[test]
fn test_detector_needs_three_stable_frames() {
    let mut detector = PitchDetector::new();
    let frame = sine_window(440.0);
    assert_eq!(detector.process(&frame, SAMPLE_RATE), Detection::Settling);
    assert_eq!(detector.process(&frame, SAMPLE_RATE), Detection::Settling);
    let Detection::Detected(result) = detector.process(&frame, SAMPLE_RATE) else {
        panic!("expected a reading on the third frame");
    };
    assert_eq!(result.note, "A");
    assert_eq!(result.octave, 4);
    assert!(result.cents.abs() <= 1);
    assert!(result.clarity > 0.9);
}

#[test]
fn test_detector_dims_unstable_readings() {
    let mut detector = PitchDetector::new();
    let a = sine_window(440.0);
    let e = sine_window(329.63);
    detector.process(&a, SAMPLE_RATE);
    detector.process(&a, SAMPLE_RATE);
    let Detection::Detected(result) = detector.process(&e, SAMPLE_RATE) else {
        panic!("a full window always reports");
    };
    assert_eq!(result.label(), "E4");
    let full = estimate_frame(&e, SAMPLE_RATE).unwrap().correlation;
    assert_abs_diff_eq!(result.clarity, full * 0.5, epsilon = 1e-12);
}

#[test]
fn test_silence_clears_history() {
    let mut detector = PitchDetector::new();
    let frame = sine_window(440.0);
    detector.process(&frame, SAMPLE_RATE);
    detector.process(&frame, SAMPLE_RATE);
    assert_eq!(detector.process(&vec![0.0; WINDOW_SIZE], SAMPLE_RATE), Detection::Rejected);
    assert_eq!(detector.process(&frame, SAMPLE_RATE), Detection::Settling);
}

#[test]
fn test_engine_reports_after_three_frames() {
    let (mut engine, results) = recording_engine(SignalInput::sine(440.0, 0.5, SAMPLE_RATE, 1.0));
    engine.start().unwrap();
    assert!(engine.is_listening());

    engine.detect();
    engine.detect();
    assert!(results.borrow().is_empty());
    engine.detect();

    let results = results.borrow();
    assert_eq!(results.len(), 1);
    let reading = results[0].as_ref().unwrap();
    assert_eq!(reading.label(), "A4");
    assert!(reading.cents.abs() <= 1);
}

#[test]
fn test_engine_silence_reports_none() {
    let (mut engine, results) = recording_engine(SignalInput::new(vec![0.0; WINDOW_SIZE], SAMPLE_RATE));
    engine.start().unwrap();
    assert_eq!(engine.detect(), Some(Detection::Rejected));
    assert_eq!(*results.borrow(), vec![None]);
}

#[test]
fn test_engine_stop_emits_final_none_once() {
    let (mut engine, results) = recording_engine(SignalInput::sine(440.0, 0.5, SAMPLE_RATE, 1.0));
    engine.start().unwrap();
    engine.stop();
    engine.stop();
    assert!(!engine.is_listening());
    assert_eq!(*results.borrow(), vec![None]);
    assert_eq!(engine.detect(), None);
}

#[test]
fn test_engine_start_is_idempotent() {
    let (mut engine, _) = recording_engine(SignalInput::sine(440.0, 0.5, SAMPLE_RATE, 1.0));
    engine.start().unwrap();
    engine.detect();
    engine.start().unwrap();
    engine.detect();
    // the stability window was not reset by the second start
    assert!(matches!(engine.detect(), Some(Detection::Detected(_))));
}

#[test]
fn test_engine_microphone_errors() {
    let errors = Rc::new(RefCell::new(Vec::new()));

    let mut unsupported = TunerEngine::new(None);
    let sink = Rc::clone(&errors);
    unsupported.on_error(move |e| sink.borrow_mut().push(e.to_string()));
    let err = unsupported.start().unwrap_err();
    assert!(matches!(err, FretlabError::Microphone(MicrophoneError::NotSupported)));
    assert!(!unsupported.is_listening());

    let mut denied = TunerEngine::new(Some(Box::new(SignalDevice::failing(MicrophoneError::PermissionDenied))));
    let sink = Rc::clone(&errors);
    denied.on_error(move |e| sink.borrow_mut().push(e.to_string()));
    assert!(denied.start().is_err());
    assert!(!denied.is_listening());

    assert_eq!(*errors.borrow(), ["Microphone not supported", "Microphone access denied"]);
}

#[test]
fn test_dispose_stops_and_blocks_restart() {
    let (mut engine, _) = recording_engine(SignalInput::sine(440.0, 0.5, SAMPLE_RATE, 1.0));
    engine.start().unwrap();
    engine.dispose();
    assert!(!engine.is_listening());
    assert!(engine.start().is_err());
}

#[test]
fn test_result_serializes_camel_case() {
    let result = TunerResult { frequency: 440.0, note: "A", octave: 4, cents: 0, clarity: 0.98 };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["note"], "A");
    assert_eq!(json["octave"], 4);
}
