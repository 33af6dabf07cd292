//! Seams for the external capabilities the trainer consumes.
//!
//! Decks, speech recognition, speech synthesis, and identity are all
//! platform concerns; the core takes them as injected trait objects with
//! explicit availability queries so it can run against fakes in tests.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthError, Result, SpeechError};
use crate::types::{Card, Deck};

/// Delivers the ordered card list. The format is a flat JSON-serializable
/// list of card records; uniqueness is whatever the source provides.
pub trait DeckSource: Send + Sync {
    fn load(&self) -> Result<Vec<Card>>;
}

/// Load a deck, degrading to an empty one when the source fails. The
/// trainer tolerates zero-card operation; the ranker reports the empty deck
/// per event.
pub fn load_deck_or_empty<S: DeckSource + ?Sized>(source: &S) -> Deck {
    match source.load() {
        Ok(cards) => Deck::new(cards),
        Err(err) => {
            warn!(%err, "deck load failed, starting with an empty deck");
            Deck::default()
        }
    }
}

/// Speech-to-text capability.
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Best transcript for a single spoken utterance. At most one
    /// recognition is in flight at a time; there is no queueing.
    fn recognize(&self, language: &str) -> std::result::Result<String, SpeechError>;
}

/// Parameters for one synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    /// BCP 47 language tag, e.g. "ta-IN".
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

impl SpeechRequest {
    /// Request with the trainer's default prosody (slightly slow, slightly
    /// raised pitch).
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            rate: 0.8,
            pitch: 1.1,
        }
    }
}

/// Text-to-speech capability. Fire-and-forget; the core consumes no result.
pub trait SpeechSynthesizer: Send + Sync {
    fn is_available(&self) -> bool;

    fn speak(&self, request: &SpeechRequest);
}

/// Authentication state as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    SignedOut,
    SignedIn { user: String },
}

/// External identity provider. Gates access to the session UI only; nothing
/// in the trainer's data model depends on it.
pub trait AuthProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> std::result::Result<AuthState, AuthError>;

    fn sign_up(&self, email: &str, password: &str) -> std::result::Result<AuthState, AuthError>;

    /// Federated sign-in ("google", ...).
    fn sign_in_with_provider(&self, provider: &str)
        -> std::result::Result<AuthState, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrainerError;
    use pretty_assertions::assert_eq;

    struct StaticSource(std::result::Result<String, String>);

    impl DeckSource for StaticSource {
        fn load(&self) -> Result<Vec<Card>> {
            let json = self
                .0
                .as_ref()
                .map_err(|e| TrainerError::DeckLoadFailure(e.clone()))?;
            serde_json::from_str(json).map_err(|e| TrainerError::DeckLoadFailure(e.to_string()))
        }
    }

    #[test]
    fn failed_source_degrades_to_empty_deck() {
        let source = StaticSource(Err("unreachable".to_string()));
        let deck = load_deck_or_empty(&source);
        assert!(deck.is_empty());
    }

    #[test]
    fn good_source_loads_cards() {
        let json = r#"[{
            "text": "வீடு",
            "romanization": "veedu",
            "translation": "house",
            "category": "places"
        }]"#;
        let source = StaticSource(Ok(json.to_string()));
        let deck = load_deck_or_empty(&source);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn speech_request_defaults() {
        let request = SpeechRequest::new("வணக்கம்", "ta-IN");
        assert_eq!(request.rate, 0.8);
        assert_eq!(request.pitch, 1.1);
    }
}
