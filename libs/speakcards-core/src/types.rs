//! Core types for the vocabulary trainer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};

/// Mastery at or above this is considered learned and leaves the practice
/// pool.
pub const MASTERY_CUTOFF: f64 = 90.0;

fn default_difficulty() -> u8 {
    1
}

/// A single vocabulary card.
///
/// Invariants: `0 <= mastery <= 100`, `1 <= difficulty <= 5`,
/// `successes <= attempts`. Mutation goes through the methods below and the
/// progression engine; the ranker only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub emoji: String,
    /// Target-language text, the string a pronunciation is scored against.
    pub text: String,
    pub romanization: String,
    pub translation: String,
    pub category: String,
    /// Per-card difficulty, 1 (easy) to 5 (master).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Retention estimate, 0 to 100.
    #[serde(default)]
    pub mastery: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub successes: u32,
}

impl Card {
    pub fn is_mastered(&self) -> bool {
        self.mastery >= MASTERY_CUTOFF
    }

    /// Raise mastery, capped at 100.
    pub fn raise_mastery(&mut self, gain: f64) {
        self.mastery = (self.mastery + gain).min(100.0);
    }

    /// Lower mastery, floored at 0.
    pub fn lower_mastery(&mut self, loss: f64) {
        self.mastery = (self.mastery - loss).max(0.0);
    }

    /// Decrease difficulty by one step, floored at 1.
    pub fn make_easier(&mut self) {
        self.difficulty = self.difficulty.saturating_sub(1).max(1);
    }

    /// Increase difficulty by one step, capped at 5.
    pub fn make_harder(&mut self) {
        self.difficulty = (self.difficulty + 1).min(5);
    }
}

/// Category filter applied to a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::All
    }
}

impl CategoryFilter {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => card.category == *name,
        }
    }
}

/// An ordered deck of cards plus the currently filtered view.
///
/// The view is a list of indices into the full deck; filtering never mutates
/// card state. View positions are what the ranker and session work with.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    view: Vec<usize>,
    filter: CategoryFilter,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        let view = (0..cards.len()).collect();
        Self {
            cards,
            view,
            filter: CategoryFilter::All,
        }
    }

    /// Parse the flat JSON card list delivered by a deck source.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cards: Vec<Card> =
            serde_json::from_str(json).map_err(|e| TrainerError::DeckLoadFailure(e.to_string()))?;
        Ok(Self::new(cards))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the current filtered view.
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Rebuild the filtered view. Card state is untouched.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.view = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| filter.matches(card))
            .map(|(i, _)| i)
            .collect();
        self.filter = filter;
    }

    /// Card at a view position.
    pub fn card(&self, pos: usize) -> Option<&Card> {
        self.view.get(pos).map(|&i| &self.cards[i])
    }

    pub fn card_mut(&mut self, pos: usize) -> Option<&mut Card> {
        let i = *self.view.get(pos)?;
        Some(&mut self.cards[i])
    }

    /// Cards in the current view, in deck order.
    pub fn view_cards(&self) -> impl Iterator<Item = &Card> {
        self.view.iter().map(|&i| &self.cards[i])
    }

    /// Learned cards across the whole deck, ignoring the filter.
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }
}

/// Daily challenge counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
    /// XP awarded on completion.
    pub reward: u32,
}

impl Default for DailyChallenge {
    fn default() -> Self {
        Self {
            target: 5,
            progress: 0,
            completed: false,
            reward: 50,
        }
    }
}

/// Aggregate session counters, owned by the progression engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub level: u32,
    /// XP gained since the last level-up.
    pub xp: u32,
    pub total_xp: u32,
    /// Consecutive successful attempts.
    pub streak: u32,
    /// Consecutive calendar days played.
    pub daily_streak: u32,
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub session_attempts: u32,
    pub session_correct: u32,
    /// Adaptive difficulty, 1.0 to 5.0.
    pub difficulty_level: f64,
    pub daily_challenge: DailyChallenge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<NaiveDate>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            streak: 0,
            daily_streak: 1,
            total_attempts: 0,
            correct_answers: 0,
            session_attempts: 0,
            session_correct: 0,
            difficulty_level: 1.0,
            daily_challenge: DailyChallenge::default(),
            last_played: None,
        }
    }
}

/// A single observable XP award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub amount: u32,
    pub reason: String,
    /// Set when this award pushed the player to a new level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leveled_up_to: Option<u32>,
}

/// Outcome of scoring one attempt against a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub score: u8,
    pub success: bool,
    pub mastery_after: f64,
    pub streak_after: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(category: &str, mastery: f64) -> Card {
        Card {
            id: 0,
            emoji: String::new(),
            text: "வணக்கம்".to_string(),
            romanization: "vanakkam".to_string(),
            translation: "hello".to_string(),
            category: category.to_string(),
            difficulty: 3,
            mastery,
            attempts: 0,
            successes: 0,
        }
    }

    #[test]
    fn mastery_stays_in_bounds() {
        let mut c = card("greetings", 95.0);
        c.raise_mastery(15.0);
        assert_eq!(c.mastery, 100.0);
        let mut c = card("greetings", 1.0);
        c.lower_mastery(2.0);
        assert_eq!(c.mastery, 0.0);
    }

    #[test]
    fn difficulty_stays_in_bounds() {
        let mut c = card("greetings", 0.0);
        c.difficulty = 1;
        c.make_easier();
        assert_eq!(c.difficulty, 1);
        c.difficulty = 5;
        c.make_harder();
        assert_eq!(c.difficulty, 5);
    }

    #[test]
    fn filter_builds_view_without_touching_cards() {
        let mut deck = Deck::new(vec![card("greetings", 10.0), card("food", 20.0)]);
        deck.set_filter(CategoryFilter::Category("food".to_string()));
        assert_eq!(deck.view_len(), 1);
        assert_eq!(deck.card(0).unwrap().mastery, 20.0);
        assert_eq!(deck.len(), 2);

        deck.set_filter(CategoryFilter::All);
        assert_eq!(deck.view_len(), 2);
    }

    #[test]
    fn deck_parses_flat_json_list() {
        let json = r#"[
            {
                "emoji": "👋",
                "text": "வணக்கம்",
                "romanization": "vanakkam",
                "translation": "hello",
                "category": "greetings",
                "difficulty": 2,
                "mastery": 0,
                "attempts": 0,
                "successes": 0
            }
        ]"#;
        let deck = Deck::from_json_str(json).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.card(0).unwrap().romanization, "vanakkam");
    }

    #[test]
    fn malformed_deck_json_is_a_load_failure() {
        let err = Deck::from_json_str("not json").unwrap_err();
        assert!(matches!(err, TrainerError::DeckLoadFailure(_)));
    }

    #[test]
    fn missing_progress_fields_default() {
        let json = r#"[{
            "text": "நன்றி",
            "romanization": "nandri",
            "translation": "thank you",
            "category": "greetings"
        }]"#;
        let deck = Deck::from_json_str(json).unwrap();
        let c = deck.card(0).unwrap();
        assert_eq!(c.difficulty, 1);
        assert_eq!(c.mastery, 0.0);
        assert_eq!(c.attempts, 0);
    }
}
