//! # Tuner Module
//!
//! Real-time pitch detection for the instrument tuner.
//!
//! ## Sub-modules
//! - `types` - TunerResult, Detection, the input traits and detector constants
//! - `detector` - NSDF analysis and the stability window
//! - `engine` - TunerEngine lifecycle plus a recorded-signal input
//!
//! ## Example
//! ```rust
//! use fretlab::tuner::{SignalDevice, SignalInput, TunerEngine};
//!
//! let sine = SignalInput::sine(440.0, 0.5, 44_100.0, 1.0);
//! let mut tuner = TunerEngine::new(Some(Box::new(SignalDevice::new(sine))));
//! tuner.start().unwrap();
//!
//! for _ in 0..3 {
//!     tuner.detect();
//! }
//! ```
//!
//! ## Per-frame pipeline
//!
//! 1. RMS below 0.01 is silence: report nothing and clear the window
//! 2. NSDF over lags for 60-1200 Hz; a best value below 0.5 is unvoiced
//! 3. The first peak reaching 90% of the best value is taken, which keeps the
//!    fundamental ahead of a stronger-looking harmonic at a longer lag
//! 4. Three-point parabolic refinement, at most one sample either way
//! 5. Frequencies outside 60-1200 Hz are rejected
//! 6. The nearest note is pushed onto a three-frame window
//!
//! ## Stability
//!
//! Nothing is reported until the window holds three frames. When all three
//! agree the reading carries the frame's full correlation as `clarity`;
//! otherwise it is still reported at half clarity so the display can dim it.

mod types;
mod detector;
mod engine;

#[cfg(test)]
mod tests;

pub use types::{
    AudioInput, Detection, InputDevice, TunerResult, A4_FREQUENCY, MAX_FREQUENCY,
    MIN_CORRELATION, MIN_FREQUENCY, PEAK_THRESHOLD_RATIO, RMS_THRESHOLD, STABILITY_FRAMES,
    WINDOW_SIZE,
};
pub use detector::{
    estimate_frame, frequency_to_note, lag_range, nsdf, parabolic_interpolation, rms,
    FrameEstimate, FrameRejection, PitchDetector,
};
pub use engine::{SignalDevice, SignalInput, TunerEngine};
