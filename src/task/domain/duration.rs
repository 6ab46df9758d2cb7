//! Exact two-decimal durations measured in minutes.

use super::ParseDurationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HUNDREDTHS_PER_MINUTE: u32 = 100;
const MILLIS_PER_HUNDREDTH: u64 = 600;
const HALF_HUNDREDTH_MILLIS: u64 = 300;

/// Duration in minutes with two decimal places.
///
/// Stored as a whole number of hundredths of a minute so that rounding and
/// ratio comparisons are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    /// Floor applied to measured durations.
    pub const MINIMUM_ACTUAL: Self = Self(HUNDREDTHS_PER_MINUTE);

    /// Largest accepted estimate (999.99 minutes).
    pub const MAX_ESTIMATE: Self = Self(99_999);

    /// Creates a duration from hundredths of a minute.
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Creates a duration from whole minutes, or `None` on overflow.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes.checked_mul(HUNDREDTHS_PER_MINUTE) {
            Some(hundredths) => Some(Self(hundredths)),
            None => None,
        }
    }

    /// Returns the duration in hundredths of a minute.
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Returns whether the duration is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the duration as fractional minutes for presentation.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "presentation only; all domain arithmetic stays in hundredths"
    )]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(HUNDREDTHS_PER_MINUTE)
    }

    /// Measures the time between two instants.
    ///
    /// Rounds to the nearest hundredth of a minute (ties to even) and never
    /// returns less than [`Self::MINIMUM_ACTUAL`], so clock skew cannot
    /// produce a zero or negative duration.
    #[must_use]
    pub fn elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let signed_millis = end.signed_duration_since(start).num_milliseconds();
        let Ok(millis) = u64::try_from(signed_millis) else {
            return Self::MINIMUM_ACTUAL;
        };

        let quotient = millis.div_euclid(MILLIS_PER_HUNDREDTH);
        let remainder = millis.rem_euclid(MILLIS_PER_HUNDREDTH);
        let rounds_up = remainder > HALF_HUNDREDTH_MILLIS
            || (remainder == HALF_HUNDREDTH_MILLIS && quotient & 1 == 1);
        let rounded = if rounds_up {
            quotient.saturating_add(1)
        } else {
            quotient
        };

        Self(u32::try_from(rounded).unwrap_or(u32::MAX)).max(Self::MINIMUM_ACTUAL)
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.div_euclid(HUNDREDTHS_PER_MINUTE);
        let fraction = self.0.rem_euclid(HUNDREDTHS_PER_MINUTE);
        write!(f, "{whole}.{fraction:02}")
    }
}

impl FromStr for DurationMinutes {
    type Err = ParseDurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDurationError(value.to_owned());
        let trimmed = value.trim();
        let (whole_part, fraction_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if whole_part.is_empty()
            || !all_digits(whole_part)
            || !all_digits(fraction_part)
            || fraction_part.len() > 2
        {
            return Err(invalid());
        }

        let whole: u32 = whole_part.parse().map_err(|_| invalid())?;
        let fraction = match fraction_part.len() {
            0 => 0,
            1 => fraction_part
                .parse::<u32>()
                .map_err(|_| invalid())?
                .saturating_mul(10),
            _ => fraction_part.parse::<u32>().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(HUNDREDTHS_PER_MINUTE)
            .and_then(|hundredths| hundredths.checked_add(fraction))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for DurationMinutes {
    type Error = ParseDurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DurationMinutes> for String {
    fn from(value: DurationMinutes) -> Self {
        value.to_string()
    }
}
