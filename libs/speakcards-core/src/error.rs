//! Error types for speakcards-core.

use thiserror::Error;

/// Result type alias using TrainerError.
pub type Result<T> = std::result::Result<T, TrainerError>;

/// Errors surfaced by the trainer core.
///
/// All of these are local to the event they occurred in: the session stays
/// valid and unchanged, and retries are always a fresh user action.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("deck contains no cards")]
    EmptyDeck,

    #[error("failed to load deck: {0}")]
    DeckLoadFailure(String),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Speech recognition/synthesis failures.
///
/// The `Display` strings are the user-visible copy; callers render them
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("Speech recognition is not supported on this platform")]
    Unsupported,

    #[error("No speech detected. Try speaking louder.")]
    NoSpeech,

    #[error("Microphone not accessible.")]
    MicrophoneUnavailable,

    #[error("Microphone access denied.")]
    PermissionDenied,

    #[error("Recognition error: {0}")]
    Other(String),
}

/// Failures from the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("auth provider unavailable: {0}")]
    ProviderUnavailable(String),
}
