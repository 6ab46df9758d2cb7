//! Discrete quality score derived from estimated and measured durations.

use super::FeedbackDomainError;
use crate::task::domain::DurationMinutes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(u8);

/// Ratio thresholds as `(numerator, denominator, score)`, checked in order.
///
/// A threshold matches when `estimated / actual >= numerator / denominator`.
const THRESHOLDS: [(u64, u64, u8); 4] = [(6, 5, 5), (1, 1, 4), (4, 5, 3), (3, 5, 2)];

impl Score {
    /// Lowest score.
    pub const MIN: Self = Self(1);

    /// Highest score.
    pub const MAX: Self = Self(5);

    /// Creates a score from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackDomainError::ScoreOutOfRange`] outside `1..=5`.
    pub fn new(value: i16) -> Result<Self, FeedbackDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|raw| (Self::MIN.0..=Self::MAX.0).contains(raw))
            .map(Self)
            .ok_or(FeedbackDomainError::ScoreOutOfRange(value))
    }

    /// Scores a completed task by the ratio `estimated / actual`.
    ///
    /// | ratio        | score |
    /// |--------------|-------|
    /// | `>= 1.2`     | 5     |
    /// | `[1.0, 1.2)` | 4     |
    /// | `[0.8, 1.0)` | 3     |
    /// | `[0.6, 0.8)` | 2     |
    /// | `< 0.6`      | 1     |
    ///
    /// The comparison is done by cross-multiplying hundredths, so boundary
    /// ratios land in the upper bucket exactly.
    #[must_use]
    pub fn from_durations(estimated: DurationMinutes, actual: DurationMinutes) -> Self {
        let estimated_hundredths = u64::from(estimated.hundredths());
        let actual_hundredths = u64::from(actual.hundredths());

        THRESHOLDS
            .iter()
            .find(|(numerator, denominator, _)| {
                estimated_hundredths.saturating_mul(*denominator)
                    >= actual_hundredths.saturating_mul(*numerator)
            })
            .map_or(Self::MIN, |(_, _, score)| Self(*score))
    }

    /// Returns the raw score value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i16> for Score {
    type Error = FeedbackDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i16 {
    fn from(value: Score) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
