//! Heuristic constants for speaker attribution
//!
//! These values are empirical. They default to the tuned values and can be
//! overridden through the environment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributionTuning {
    // Character scorer
    /// Characters inspected on each side of a mention for cue phrases
    pub cue_window_chars: usize,
    /// Score for each `Name:` / `Name -` speaker label line
    pub speaker_label_weight: f64,
    /// Bonus when the first mention opens the text
    pub lead_mention_bonus: f64,

    // Dominance analyzer
    /// Minimum share of all paragraphs the primary character must hold
    pub dominant_share: f64,
    /// Minimum primary/secondary paragraph ratio
    pub dominant_ratio: f64,

    // Placement planner
    /// Runner-up must score at least this to earn a second placement
    pub runner_up_min_score: f64,
    /// Runner-up must score at least this fraction of the leader
    pub runner_up_ratio: f64,
}

impl Default for AttributionTuning {
    fn default() -> Self {
        Self {
            cue_window_chars: 24,
            speaker_label_weight: 2.0,
            lead_mention_bonus: 1.0,
            dominant_share: 0.6,
            dominant_ratio: 1.5,
            runner_up_min_score: 1.0,
            runner_up_ratio: 0.5,
        }
    }
}

impl AttributionTuning {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cue_window_chars: env_or("EMBEDS_CUE_WINDOW_CHARS", defaults.cue_window_chars),
            speaker_label_weight: env_or("EMBEDS_SPEAKER_LABEL_WEIGHT", defaults.speaker_label_weight),
            lead_mention_bonus: env_or("EMBEDS_LEAD_MENTION_BONUS", defaults.lead_mention_bonus),
            dominant_share: env_or("EMBEDS_DOMINANT_SHARE", defaults.dominant_share),
            dominant_ratio: env_or("EMBEDS_DOMINANT_RATIO", defaults.dominant_ratio),
            runner_up_min_score: env_or("EMBEDS_RUNNER_UP_MIN_SCORE", defaults.runner_up_min_score),
            runner_up_ratio: env_or("EMBEDS_RUNNER_UP_RATIO", defaults.runner_up_ratio),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
