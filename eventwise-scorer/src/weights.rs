//! Tunable weights for recommendation and similarity scoring.
#![forbid(unsafe_code)]

use crate::ScoreWeightsError;

/// Weights applied to each additive term of the recommendation score.
///
/// The defaults reproduce the dashboard's suggestion carousel.
///
/// # Examples
/// ```
/// use eventwise_scorer::ScoreWeights;
///
/// let weights = ScoreWeights {
///     attended_category_bonus: 20.0,
///     ..ScoreWeights::default()
/// }
/// .validate()?;
/// assert_eq!(weights.category_affinity, 3.0);
/// # Ok::<(), eventwise_scorer::ScoreWeightsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Multiplier for the accumulated category preference.
    pub category_affinity: f64,
    /// Flat bonus when the user attended an event of the same category.
    pub attended_category_bonus: f64,
    /// Per shared tag with each highly rated event.
    pub rated_tag_overlap: f64,
    /// Flat bonus per highly rated event from the same society.
    pub rated_same_society: f64,
    /// Flat bonus per positive feedback on an event of the same category.
    pub positive_feedback: f64,
    /// Multiplier for `ln(registrations + 1)`.
    pub popularity: f64,
    /// Multiplier for the event's average rating.
    pub quality: f64,
    /// Bonus for events within the next week.
    pub upcoming_week: f64,
    /// Bonus for events within the next month but beyond a week.
    pub upcoming_month: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category_affinity: 3.0,
            attended_category_bonus: 15.0,
            rated_tag_overlap: 5.0,
            rated_same_society: 8.0,
            positive_feedback: 12.0,
            popularity: 2.0,
            quality: 3.0,
            upcoming_week: 10.0,
            upcoming_month: 5.0,
        }
    }
}

impl ScoreWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] naming the first weight that is not
    /// finite or is negative.
    pub fn validate(self) -> Result<Self, ScoreWeightsError> {
        check_all(&[
            ("category_affinity", self.category_affinity),
            ("attended_category_bonus", self.attended_category_bonus),
            ("rated_tag_overlap", self.rated_tag_overlap),
            ("rated_same_society", self.rated_same_society),
            ("positive_feedback", self.positive_feedback),
            ("popularity", self.popularity),
            ("quality", self.quality),
            ("upcoming_week", self.upcoming_week),
            ("upcoming_month", self.upcoming_month),
        ])?;
        Ok(self)
    }
}

/// Weights for the snapshot-independent "similar events" score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    /// Bonus when both events carry the same category.
    pub same_category: f64,
    /// Per shared tag.
    pub tag_overlap: f64,
    /// Bonus when both events come from the same society.
    pub same_society: f64,
    /// Bonus when the ratings differ by less than [`Self::RATING_TOLERANCE`].
    pub close_rating: f64,
}

impl SimilarityWeights {
    /// Largest rating difference that still counts as "close".
    pub const RATING_TOLERANCE: f64 = 0.5;

    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] naming the first weight that is not
    /// finite or is negative.
    pub fn validate(self) -> Result<Self, ScoreWeightsError> {
        check_all(&[
            ("same_category", self.same_category),
            ("tag_overlap", self.tag_overlap),
            ("same_society", self.same_society),
            ("close_rating", self.close_rating),
        ])?;
        Ok(self)
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            same_category: 20.0,
            tag_overlap: 8.0,
            same_society: 10.0,
            close_rating: 5.0,
        }
    }
}

fn check_all(weights: &[(&'static str, f64)]) -> Result<(), ScoreWeightsError> {
    weights
        .iter()
        .try_for_each(|&(name, value)| check(name, value))
}

fn check(name: &'static str, value: f64) -> Result<(), ScoreWeightsError> {
    if !value.is_finite() {
        return Err(ScoreWeightsError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ScoreWeightsError::Negative { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults_are_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
        assert!(SimilarityWeights::default().validate().is_ok());
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn non_finite_weight_is_rejected(#[case] value: f64) {
        let err = ScoreWeights {
            quality: value,
            ..ScoreWeights::default()
        }
        .validate()
        .expect_err("non-finite weight should be rejected");
        assert!(matches!(
            err,
            ScoreWeightsError::NonFinite { name: "quality", .. }
        ));
    }

    #[rstest]
    fn negative_similarity_weight_is_rejected() {
        let err = SimilarityWeights {
            same_society: -1.0,
            ..SimilarityWeights::default()
        }
        .validate()
        .expect_err("negative weight should be rejected");
        assert!(matches!(
            err,
            ScoreWeightsError::Negative {
                name: "same_society",
                ..
            }
        ));
    }

    #[rstest]
    fn zero_weights_are_allowed() {
        let weights = ScoreWeights {
            upcoming_week: 0.0,
            upcoming_month: 0.0,
            ..ScoreWeights::default()
        };
        assert_eq!(weights.validate(), Ok(weights));
    }
}
