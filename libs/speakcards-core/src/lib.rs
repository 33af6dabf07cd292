//! Core library for speakcards, a pronunciation-first vocabulary trainer.
//!
//! Provides:
//! - Levenshtein-based pronunciation scoring
//! - Feedback tiers with fixed XP rewards
//! - Priority-weighted next-card selection
//! - Level/XP/streak/daily-challenge progression
//! - A session orchestrator turning external events into render data
//!
//! Rendering, storage, and the real speech/auth integrations live with the
//! caller; the core reaches them through the traits in [`providers`].

pub mod error;
pub mod feedback;
pub mod progression;
pub mod providers;
pub mod ranker;
pub mod scoring;
pub mod session;
pub mod types;

pub use error::{AuthError, Result, SpeechError, TrainerError};
pub use feedback::{classify, Feedback, Tier};
pub use progression::{PendingEffect, Progression, SUCCESS_THRESHOLD, XP_LEVELS};
pub use providers::{
    load_deck_or_empty, AuthProvider, AuthState, DeckSource, SpeechRecognizer, SpeechRequest,
    SpeechSynthesizer,
};
pub use ranker::{card_priority, select_next};
pub use scoring::{levenshtein_distance, pronunciation_score};
pub use session::{recognition_message, AttemptOutcome, CardActionOutcome, Session};
pub use types::{
    AttemptRecord, Card, CategoryFilter, DailyChallenge, Deck, SessionState, XpAward,
};
