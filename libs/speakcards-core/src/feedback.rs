//! Qualitative feedback tiers for a pronunciation score.

use serde::{Deserialize, Serialize};

/// Skill bucket for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Beginner,
    NeedsWork,
    Okay,
    Good,
    Advanced,
    Expert,
}

impl Tier {
    /// Get the tier label as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::NeedsWork => "needs-work",
            Self::Okay => "okay",
            Self::Good => "good",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

/// Feedback for one attempt: display message, XP reward, skill tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub message: &'static str,
    pub xp: u32,
    pub tier: Tier,
}

/// Map a 0-100 score onto a feedback tier. Thresholds and rewards are fixed;
/// there is no configuration surface.
pub fn classify(score: u8) -> Feedback {
    if score >= 95 {
        Feedback {
            message: "Perfect pronunciation!",
            xp: 25,
            tier: Tier::Expert,
        }
    } else if score >= 85 {
        Feedback {
            message: "Excellent! Almost perfect!",
            xp: 20,
            tier: Tier::Advanced,
        }
    } else if score >= 75 {
        Feedback {
            message: "Great job! Very clear!",
            xp: 15,
            tier: Tier::Good,
        }
    } else if score >= 60 {
        Feedback {
            message: "Good attempt! Keep practicing!",
            xp: 10,
            tier: Tier::Okay,
        }
    } else if score >= 40 {
        Feedback {
            message: "Getting there! Try again!",
            xp: 5,
            tier: Tier::NeedsWork,
        }
    } else {
        Feedback {
            message: "Keep practicing! You can do it!",
            xp: 2,
            tier: Tier::Beginner,
        }
    }
}
