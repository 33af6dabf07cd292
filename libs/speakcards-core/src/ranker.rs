//! Priority-weighted next-card selection.

use rand::Rng;

use crate::error::{Result, TrainerError};
use crate::types::{Card, Deck, MASTERY_CUTOFF};

/// How many of the highest-priority cards the random pick draws from.
const TOP_CANDIDATES: usize = 3;

/// Composite practice priority for a card. Higher means more urgently due.
///
/// Weights low mastery at 0.5, difficulty at 0.3, and never-attempted
/// recency at 0.2.
pub fn card_priority(card: &Card) -> f64 {
    let mastery_weight = 1.0 - card.mastery / 100.0;
    let difficulty_weight = card.difficulty as f64 / 5.0;
    let recency_weight = if card.attempts == 0 { 1.0 } else { 0.5 };

    mastery_weight * 0.5 + difficulty_weight * 0.3 + recency_weight * 0.2
}

/// Pick the view position of the next card to practice.
///
/// Cards below the mastery cutoff form the candidate pool; the pool is
/// sorted by priority (stable, so deck order breaks ties) and the pick is
/// uniform over the top three. With every card mastered, selection degrades
/// to a deterministic cyclic advance from `current`. An empty view is an
/// error; there is no default card.
pub fn select_next<R: Rng + ?Sized>(deck: &Deck, current: usize, rng: &mut R) -> Result<usize> {
    let len = deck.view_len();
    if len == 0 {
        return Err(TrainerError::EmptyDeck);
    }

    let mut candidates: Vec<(usize, f64)> = deck
        .view_cards()
        .enumerate()
        .filter(|(_, card)| card.mastery < MASTERY_CUTOFF)
        .map(|(pos, card)| (pos, card_priority(card)))
        .collect();

    if candidates.is_empty() {
        return Ok((current + 1) % len);
    }

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let top = candidates.len().min(TOP_CANDIDATES);
    Ok(candidates[rng.gen_range(0..top)].0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryFilter;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn card(mastery: f64, difficulty: u8, attempts: u32) -> Card {
        Card {
            id: 0,
            emoji: String::new(),
            text: "சொல்".to_string(),
            romanization: "sol".to_string(),
            translation: "word".to_string(),
            category: "words".to_string(),
            difficulty,
            mastery,
            attempts,
            successes: 0,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn unattempted_hard_card_outranks_mastered_easy_card() {
        let fresh = card(0.0, 3, 0);
        let known = card(95.0, 1, 10);
        assert!(card_priority(&fresh) > card_priority(&known));
    }

    #[test]
    fn empty_deck_is_an_error() {
        let deck = Deck::default();
        assert!(matches!(
            select_next(&deck, 0, &mut rng()),
            Err(TrainerError::EmptyDeck)
        ));
    }

    #[test]
    fn single_candidate_is_deterministic() {
        // Only the first card is below the cutoff, so it must always win.
        let deck = Deck::new(vec![card(0.0, 3, 0), card(95.0, 1, 10)]);
        for _ in 0..20 {
            assert_eq!(select_next(&deck, 1, &mut rng()).unwrap(), 0);
        }
    }

    #[test]
    fn all_mastered_cycles_deterministically() {
        let deck = Deck::new(vec![card(92.0, 1, 5), card(95.0, 1, 5), card(99.0, 1, 5)]);
        assert_eq!(select_next(&deck, 0, &mut rng()).unwrap(), 1);
        assert_eq!(select_next(&deck, 1, &mut rng()).unwrap(), 2);
        assert_eq!(select_next(&deck, 2, &mut rng()).unwrap(), 0);
    }

    #[test]
    fn pick_stays_in_top_three() {
        // Priorities descend with position, so only positions 0..3 qualify.
        let deck = Deck::new(vec![
            card(0.0, 5, 0),
            card(10.0, 4, 0),
            card(20.0, 3, 0),
            card(30.0, 2, 3),
            card(40.0, 1, 3),
        ]);
        let mut r = rng();
        for _ in 0..100 {
            let pos = select_next(&deck, 0, &mut r).unwrap();
            assert!(pos < 3, "picked outside the top candidates: {pos}");
        }
    }

    #[test]
    fn pick_respects_the_filter() {
        let mut food = card(0.0, 5, 0);
        food.category = "food".to_string();
        let mut deck = Deck::new(vec![card(0.0, 5, 0), food]);
        deck.set_filter(CategoryFilter::Category("food".to_string()));

        let mut r = rng();
        for _ in 0..20 {
            let pos = select_next(&deck, 0, &mut r).unwrap();
            assert_eq!(deck.card(pos).unwrap().category, "food");
        }
    }
}
