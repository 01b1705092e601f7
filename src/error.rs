//! # Error Types
//!
//! Error types for the fretlab engines.
//!
//! Most of the theory API never fails: unknown notes, chord qualities and scale
//! names come back as `None` or an empty `Vec`, which the UI shows as "no data".
//! `FretlabError` is reserved for the places where something outside the pure
//! functions can go wrong:
//!
//! - `Config` - invalid startup settings
//! - `UnknownTuning` - a tuning name the selected instrument does not carry
//! - `Microphone` - input device access for the tuner
//! - `AudioBackend` - output device / stream failures
//! - `InvalidTemplate` - malformed voicing template data shipped in the static catalog
//!
//! ## Usage
//! ```rust
//! use fretlab::{FretlabError, Settings};
//!
//! match Settings::from_yaml("instrument: banjo") {
//!     Ok(settings) => println!("{:?}", settings.instrument),
//!     Err(FretlabError::Config(message)) => eprintln!("bad settings: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Classified microphone failures.
///
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MicrophoneError {
    /// The host exposes no audio input API at all.
    #[error("Microphone not supported")]
    NotSupported,

    /// The user (or OS policy) refused access to the input device.
    #[error("Microphone access denied")]
    PermissionDenied,

    /// An input API exists but no capture device is attached.
    #[error("No microphone found")]
    NoDevice,

    /// Anything else reported by the backend.
    #[error("Microphone error: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum FretlabError {
    /// Invalid settings.
    ///
    /// # Example
    /// ```
    /// # use fretlab::FretlabError;
    /// let err = FretlabError::Config("bpm must be a number".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: bpm must be a number");
    /// ```
    #[error("Invalid settings: {0}")]
    Config(String),

    /// A tuning name that is not part of the instrument's catalog.
    #[error("Unknown tuning '{tuning}' for instrument '{instrument}'")]
    UnknownTuning { instrument: String, tuning: String },

    /// Microphone access failed; the tuner stays idle.
    #[error(transparent)]
    Microphone(#[from] MicrophoneError),

    /// The audio output could not be opened or driven.
    #[error("Audio backend error: {0}")]
    AudioBackend(String),

    /// Static voicing template data violates its own invariants.
    ///
    /// This is a programmer error in the shipped catalog, never a user error.
    #[error("Invalid voicing template for quality '{quality}': {reason}")]
    InvalidTemplate { quality: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FretlabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microphone_messages() {
        assert_eq!(MicrophoneError::NotSupported.to_string(), "Microphone not supported");
        assert_eq!(MicrophoneError::PermissionDenied.to_string(), "Microphone access denied");
        assert_eq!(MicrophoneError::NoDevice.to_string(), "No microphone found");
        assert_eq!(
            MicrophoneError::Other("busy".to_string()).to_string(),
            "Microphone error: busy"
        );
    }

    #[test]
    fn test_microphone_error_converts() {
        let err: FretlabError = MicrophoneError::NoDevice.into();
        assert_eq!(err.to_string(), "No microphone found");
    }
}
