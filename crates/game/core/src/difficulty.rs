//! Score-driven difficulty tiers.

/// Named difficulty bracket derived from cumulative score.
///
/// The tier bounds the random rank range used when building rounds: at
/// [`Difficulty::Beginner`] every ability is shown at rank 1.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    #[default]
    Beginner,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const MEDIUM_THRESHOLD: f64 = 10.0;
    pub const HARD_THRESHOLD: f64 = 20.0;
    pub const EXPERT_THRESHOLD: f64 = 30.0;

    /// Maps a score to its tier.
    ///
    /// Total over all inputs: negative scores are beginner, fractional scores
    /// compare without rounding (`9.5` is beginner, `10.1` is medium).
    pub fn for_score(score: impl Into<f64>) -> Self {
        let score = score.into();
        if score < Self::MEDIUM_THRESHOLD {
            Difficulty::Beginner
        } else if score < Self::HARD_THRESHOLD {
            Difficulty::Medium
        } else if score < Self::EXPERT_THRESHOLD {
            Difficulty::Hard
        } else if score >= Self::EXPERT_THRESHOLD {
            Difficulty::Expert
        } else {
            // NaN fails every comparison
            Difficulty::Beginner
        }
    }

    /// Whether ranks are pinned to 1 at this tier.
    pub const fn pins_rank(self) -> bool {
        matches!(self, Difficulty::Beginner)
    }
}
