//! Urgency boost for events happening soon.
#![forbid(unsafe_code)]

use chrono::NaiveDate;
use eventwise_core::Event;

use crate::ScoreWeights;

/// Last day, counted from today, that earns the one-week bonus.
const WEEK_HORIZON_DAYS: i64 = 7;
/// Last day, counted from today, that earns the one-month bonus.
const MONTH_HORIZON_DAYS: i64 = 30;

/// Whether and how event dates influence the recommendation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecencyPolicy {
    /// Dates are ignored.
    Disabled,
    /// Events one to seven days away earn
    /// [`ScoreWeights::upcoming_week`], eight to thirty days away
    /// [`ScoreWeights::upcoming_month`]. Events today, in the past, further
    /// out or undated earn nothing.
    #[default]
    UpcomingBoost,
}

impl RecencyPolicy {
    /// Return the policy as a kebab-case `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::UpcomingBoost => "upcoming-boost",
        }
    }

    /// Compute the boost for `event` evaluated on `today`.
    #[must_use]
    pub fn boost(self, event: &Event, today: NaiveDate, weights: &ScoreWeights) -> f64 {
        match (self, event.days_until(today)) {
            (Self::Disabled, _) | (Self::UpcomingBoost, None) => 0.0,
            (Self::UpcomingBoost, Some(days)) => match days {
                1..=WEEK_HORIZON_DAYS => weights.upcoming_week,
                8..=MONTH_HORIZON_DAYS => weights.upcoming_month,
                _ => 0.0,
            },
        }
    }
}

impl std::fmt::Display for RecencyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            "upcoming-boost" | "upcoming" | "on" => Ok(Self::UpcomingBoost),
            _ => Err(format!("unknown recency policy '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use rstest::rstest;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
    }

    fn event_in(days: Option<i64>) -> Event {
        let event = Event::new("1", "Talk");
        match days {
            Some(offset) if offset >= 0 => {
                event.with_date(today() + Days::new(offset.unsigned_abs()))
            }
            Some(offset) => event.with_date(today() - Days::new(offset.unsigned_abs())),
            None => event,
        }
    }

    #[rstest]
    #[case(Some(0), 0.0)]
    #[case(Some(1), 10.0)]
    #[case(Some(7), 10.0)]
    #[case(Some(8), 5.0)]
    #[case(Some(30), 5.0)]
    #[case(Some(31), 0.0)]
    #[case(Some(-1), 0.0)]
    #[case(None, 0.0)]
    fn upcoming_boost_bands(#[case] days: Option<i64>, #[case] expected: f64) {
        let boost =
            RecencyPolicy::UpcomingBoost.boost(&event_in(days), today(), &ScoreWeights::default());
        assert_eq!(boost, expected);
    }

    #[rstest]
    fn disabled_policy_ignores_dates() {
        let boost =
            RecencyPolicy::Disabled.boost(&event_in(Some(3)), today(), &ScoreWeights::default());
        assert_eq!(boost, 0.0);
    }

    #[rstest]
    #[case("disabled", RecencyPolicy::Disabled)]
    #[case("Upcoming-Boost", RecencyPolicy::UpcomingBoost)]
    fn parses_policy_names(#[case] raw: &str, #[case] expected: RecencyPolicy) {
        assert_eq!(raw.parse::<RecencyPolicy>(), Ok(expected));
    }
}
