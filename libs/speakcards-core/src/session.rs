//! Session orchestration: external events in, render data out.
//!
//! Each event runs to completion and returns plain values for the caller to
//! display; no rendering happens here. Deferred awards queue behind the
//! event that earned them and are applied when the caller drains, so a
//! refilter between the two cannot leave a stale index in play.

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SpeechError, TrainerError};
use crate::feedback::{classify, Feedback};
use crate::progression::{Progression, CHALLENGE_THRESHOLD};
use crate::providers::{SpeechRecognizer, SpeechRequest, SpeechSynthesizer};
use crate::ranker;
use crate::scoring::pronunciation_score;
use crate::types::{AttemptRecord, Card, CategoryFilter, Deck, SessionState, XpAward};

const EASY_XP: u32 = 5;
const HARD_XP: u32 = 2;
const EASY_MASTERY_BOOST: f64 = 10.0;

/// What one scored attempt produced.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub transcript: String,
    pub score: u8,
    pub feedback: Feedback,
    pub record: AttemptRecord,
    pub award: XpAward,
    /// Whether the session moved on to a new card (success does, failure
    /// stays for another try).
    pub advanced: bool,
}

/// Result of a manual easy/hard action.
#[derive(Debug, Clone)]
pub struct CardActionOutcome {
    pub award: XpAward,
    /// Snapshot of the card after the adjustment.
    pub card: Card,
    pub advanced: bool,
}

/// User-visible text for a failed recognition attempt. Session state is
/// untouched by recognition errors.
pub fn recognition_message(err: &SpeechError) -> String {
    err.to_string()
}

/// One practice session over a deck.
pub struct Session {
    deck: Deck,
    current: usize,
    progression: Progression,
}

impl Session {
    pub fn new(deck: Deck, state: SessionState) -> Self {
        Self {
            deck,
            current: 0,
            progression: Progression::new(state),
        }
    }

    pub fn state(&self) -> &SessionState {
        self.progression.state()
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Roll the daily challenge over if the calendar day changed.
    pub fn start_day(&mut self, today: NaiveDate) {
        self.progression.start_day(today);
    }

    /// The card currently shown. Position is re-checked against the view on
    /// every call rather than cached across deferrals.
    pub fn current_card(&self) -> Result<&Card> {
        let len = self.deck.view_len();
        if len == 0 {
            return Err(TrainerError::EmptyDeck);
        }
        self.deck.card(self.current % len).ok_or(TrainerError::EmptyDeck)
    }

    /// Swap the category filter and restart at the top of the view.
    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.deck.set_filter(filter);
        self.current = 0;
    }

    /// Let the ranker choose the card to show next.
    pub fn pick_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Card> {
        self.current = ranker::select_next(&self.deck, self.current, rng)?;
        self.deck.card(self.current).ok_or(TrainerError::EmptyDeck)
    }

    /// Explicit skip: cyclic advance, no scoring.
    pub fn advance(&mut self) -> Result<&Card> {
        let len = self.deck.view_len();
        if len == 0 {
            return Err(TrainerError::EmptyDeck);
        }
        self.current = (self.current + 1) % len;
        self.deck.card(self.current).ok_or(TrainerError::EmptyDeck)
    }

    /// Score a transcription against the current card and apply the full
    /// attempt pipeline: classify, record, award, challenge, adaptive
    /// difficulty, then ranked advance on success.
    pub fn handle_transcript<R: Rng + ?Sized>(
        &mut self,
        transcript: &str,
        rng: &mut R,
    ) -> Result<AttemptOutcome> {
        let len = self.deck.view_len();
        if len == 0 {
            return Err(TrainerError::EmptyDeck);
        }
        self.current %= len;

        let expected = self
            .deck
            .card(self.current)
            .ok_or(TrainerError::EmptyDeck)?
            .text
            .clone();
        let score = pronunciation_score(&expected, transcript);
        let feedback = classify(score);

        let card = self.deck.card_mut(self.current).ok_or(TrainerError::EmptyDeck)?;
        let record = self.progression.record_attempt(card, score);

        let reason = if record.success {
            format!("{score}% accuracy")
        } else {
            "Practice attempt".to_string()
        };
        let award = self.progression.award_xp(feedback.xp, &reason);

        if score >= CHALLENGE_THRESHOLD {
            self.progression.update_daily_challenge(true);
        }
        self.progression.update_adaptive_difficulty();

        let advanced = record.success;
        if advanced {
            self.current = ranker::select_next(&self.deck, self.current, rng)?;
        }

        debug!(score, success = record.success, "attempt scored");
        Ok(AttemptOutcome {
            transcript: transcript.to_string(),
            score,
            feedback,
            record,
            award,
            advanced,
        })
    }

    /// Run one listen-and-score interaction through an injected recognizer.
    /// A single recognition is in flight at a time; errors surface as
    /// user-visible text and leave the session unchanged.
    pub fn practice<R, S>(
        &mut self,
        recognizer: &S,
        language: &str,
        rng: &mut R,
    ) -> Result<AttemptOutcome>
    where
        R: Rng + ?Sized,
        S: SpeechRecognizer + ?Sized,
    {
        if !recognizer.is_available() {
            return Err(SpeechError::Unsupported.into());
        }
        let transcript = recognizer.recognize(language)?;
        self.handle_transcript(&transcript, rng)
    }

    /// Speak the current card's text through an injected synthesizer.
    /// Fire-and-forget; no result comes back.
    pub fn speak_current<S: SpeechSynthesizer + ?Sized>(
        &self,
        synthesizer: &S,
        language: &str,
    ) -> Result<()> {
        if !synthesizer.is_available() {
            return Err(SpeechError::Unsupported.into());
        }
        let card = self.current_card()?;
        synthesizer.speak(&SpeechRequest::new(card.text.clone(), language));
        Ok(())
    }

    /// Manual "this was easy": drop difficulty, boost mastery, small award,
    /// move on.
    pub fn mark_easy(&mut self) -> Result<CardActionOutcome> {
        let len = self.deck.view_len();
        if len == 0 {
            return Err(TrainerError::EmptyDeck);
        }
        self.current %= len;

        let card = self.deck.card_mut(self.current).ok_or(TrainerError::EmptyDeck)?;
        card.make_easier();
        card.raise_mastery(EASY_MASTERY_BOOST);
        let snapshot = card.clone();

        let award = self.progression.award_xp(EASY_XP, "Easy feedback");
        self.advance()?;
        Ok(CardActionOutcome {
            award,
            card: snapshot,
            advanced: true,
        })
    }

    /// Manual "this was hard": raise difficulty, small award, stay on the
    /// card. Mastery is untouched.
    pub fn mark_hard(&mut self) -> Result<CardActionOutcome> {
        let len = self.deck.view_len();
        if len == 0 {
            return Err(TrainerError::EmptyDeck);
        }
        self.current %= len;

        let card = self.deck.card_mut(self.current).ok_or(TrainerError::EmptyDeck)?;
        card.make_harder();
        let snapshot = card.clone();

        let award = self.progression.award_xp(HARD_XP, "Hard feedback");
        Ok(CardActionOutcome {
            award,
            card: snapshot,
            advanced: false,
        })
    }

    pub fn has_pending(&self) -> bool {
        self.progression.has_pending()
    }

    /// Apply deferred awards. The current position is re-validated first in
    /// case the deck was refiltered since the effects were queued.
    pub fn drain_pending(&mut self) -> Vec<XpAward> {
        let len = self.deck.view_len();
        if len > 0 {
            self.current %= len;
        }
        self.progression.drain_pending()
    }
}
