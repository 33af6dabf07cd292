//! Level, XP, streak, and daily-challenge bookkeeping.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{AttemptRecord, Card, SessionState, XpAward};

/// Cumulative XP needed to finish each level. Levels past the table reuse
/// the last threshold.
pub const XP_LEVELS: [u32; 11] = [
    100, 250, 500, 1000, 1750, 2750, 4250, 6500, 9750, 14250, 20250,
];

/// Scores at or above this count as a successful attempt.
pub const SUCCESS_THRESHOLD: u8 = 75;
/// Scores at or above this count toward the daily challenge.
pub const CHALLENGE_THRESHOLD: u8 = 90;

const LEVEL_UP_BONUS: u32 = 50;
const MASTERY_GAIN_CAP: f64 = 15.0;
const MASTERY_PENALTY: f64 = 2.0;

/// A follow-up award queued behind the event that earned it.
///
/// The original UI delays these so the primary award renders first; the
/// delay is cosmetic, the queue is what guarantees two distinct observable
/// awards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingEffect {
    LevelUpBonus,
    ChallengeReward { amount: u32 },
}

/// Owns the session state; every mutation goes through these methods.
#[derive(Debug, Default)]
pub struct Progression {
    state: SessionState,
    pending: VecDeque<PendingEffect>,
}

impl Progression {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Cumulative XP that finishes `level`.
    pub fn xp_for_level(level: u32) -> u32 {
        let idx = level.saturating_sub(1) as usize;
        XP_LEVELS
            .get(idx)
            .copied()
            .unwrap_or(XP_LEVELS[XP_LEVELS.len() - 1])
    }

    /// Level implied by a cumulative XP total.
    pub fn level_for_total_xp(total_xp: u32) -> u32 {
        for (i, threshold) in XP_LEVELS.iter().enumerate() {
            if total_xp < *threshold {
                return i as u32 + 1;
            }
        }
        XP_LEVELS.len() as u32 + 1
    }

    /// Add XP and recompute the level.
    ///
    /// A level increase resets the in-level XP counter and queues the level-up
    /// bonus as a deferred effect; crossing several thresholds in one award
    /// lands directly on the final level with a single bonus.
    pub fn award_xp(&mut self, amount: u32, reason: &str) -> XpAward {
        self.state.xp += amount;
        self.state.total_xp += amount;

        let new_level = Self::level_for_total_xp(self.state.total_xp);
        let leveled_up_to = if new_level > self.state.level {
            self.state.level = new_level;
            self.state.xp = 0;
            self.pending.push_back(PendingEffect::LevelUpBonus);
            info!(level = new_level, "level up");
            Some(new_level)
        } else {
            None
        };

        debug!(amount, reason, total_xp = self.state.total_xp, "xp awarded");
        XpAward {
            amount,
            reason: reason.to_string(),
            leveled_up_to,
        }
    }

    /// Record a scored attempt against a card, updating card and session
    /// counters together.
    pub fn record_attempt(&mut self, card: &mut Card, score: u8) -> AttemptRecord {
        card.attempts += 1;
        self.state.total_attempts += 1;
        self.state.session_attempts += 1;

        let success = score >= SUCCESS_THRESHOLD;
        if success {
            card.successes += 1;
            self.state.correct_answers += 1;
            self.state.session_correct += 1;
            self.state.streak += 1;
            card.raise_mastery((score as f64 / 5.0).min(MASTERY_GAIN_CAP));
        } else {
            self.state.streak = self.state.streak.saturating_sub(1);
            card.lower_mastery(MASTERY_PENALTY);
        }

        AttemptRecord {
            score,
            success,
            mastery_after: card.mastery,
            streak_after: self.state.streak,
        }
    }

    /// Nudge the adaptive difficulty from rolling session accuracy.
    ///
    /// The dead band between 50% and 80%, plus the minimum sample sizes,
    /// keeps the level from oscillating on small samples.
    pub fn update_adaptive_difficulty(&mut self) {
        let attempts = self.state.session_attempts;
        if attempts == 0 {
            return;
        }
        let accuracy = self.state.session_correct as f64 / attempts as f64 * 100.0;

        if accuracy > 80.0 && attempts >= 5 {
            self.state.difficulty_level = (self.state.difficulty_level + 0.5).min(5.0);
            debug!(difficulty = self.state.difficulty_level, "difficulty raised");
        } else if accuracy < 50.0 && attempts >= 3 {
            self.state.difficulty_level = (self.state.difficulty_level - 0.5).max(1.0);
            debug!(difficulty = self.state.difficulty_level, "difficulty lowered");
        }
    }

    /// Advance the daily challenge after a qualifying attempt. Completion
    /// fires once; the reward XP is queued as a deferred effect.
    pub fn update_daily_challenge(&mut self, success: bool) {
        let challenge = &mut self.state.daily_challenge;
        if !success || challenge.completed {
            return;
        }

        challenge.progress = (challenge.progress + 1).min(challenge.target);
        if challenge.progress >= challenge.target {
            challenge.completed = true;
            self.pending.push_back(PendingEffect::ChallengeReward {
                amount: challenge.reward,
            });
            info!("daily challenge complete");
        }
    }

    /// Roll over to a new calendar day if the stored date differs.
    ///
    /// Resets the challenge and maintains the daily streak: a consecutive day
    /// extends it, a gap restarts it at 1. The caller decides what "today"
    /// means (local-day semantics by convention).
    pub fn start_day(&mut self, today: NaiveDate) {
        match self.state.last_played {
            Some(last) if last == today => {}
            Some(last) => {
                self.state.daily_challenge.progress = 0;
                self.state.daily_challenge.completed = false;
                self.state.daily_streak = if last.succ_opt() == Some(today) {
                    self.state.daily_streak + 1
                } else {
                    1
                };
                self.state.last_played = Some(today);
                info!(%today, "daily challenge reset");
            }
            None => {
                self.state.last_played = Some(today);
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply queued follow-up awards in order.
    ///
    /// Each effect goes through [`award_xp`](Self::award_xp), so a bonus that
    /// itself levels up queues a further bonus, which drains in the same
    /// call. Every returned award is a distinct observable event.
    pub fn drain_pending(&mut self) -> Vec<XpAward> {
        let mut awards = Vec::new();
        while let Some(effect) = self.pending.pop_front() {
            let award = match effect {
                PendingEffect::LevelUpBonus => self.award_xp(LEVEL_UP_BONUS, "Level Up Bonus"),
                PendingEffect::ChallengeReward { amount } => {
                    self.award_xp(amount, "Daily Challenge")
                }
            };
            awards.push(award);
        }
        awards
    }

    /// XP gained within the current level and the amount the level needs,
    /// for progress-bar style display.
    pub fn xp_progress(&self) -> (u32, u32) {
        let floor = if self.state.level > 1 {
            Self::xp_for_level(self.state.level - 1)
        } else {
            0
        };
        let ceiling = Self::xp_for_level(self.state.level);
        (
            self.state.total_xp.saturating_sub(floor),
            ceiling.saturating_sub(floor),
        )
    }

    /// Lifetime accuracy percentage, rounded.
    pub fn lifetime_accuracy(&self) -> u32 {
        percentage(self.state.correct_answers, self.state.total_attempts)
    }

    /// Session accuracy percentage, rounded.
    pub fn session_accuracy(&self) -> u32 {
        percentage(self.state.session_correct, self.state.session_attempts)
    }
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}
