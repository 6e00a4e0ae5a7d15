use serde::Serialize;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Aggregate of the ratings a teacher has received.
///
/// Both the public teacher list and the teacher profile build their
/// numbers from this type, so the two pages can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `0.0` when there are no reviews
    pub average_rating: f64,
    pub total_reviews: u64,
    /// Number of reviews per star value, index 0 holds the 1-star count
    pub distribution: [u64; 5],
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i16>,
    {
        let mut distribution = [0u64; 5];
        let mut total = 0u64;
        let mut sum = 0i64;

        // Out of range values cannot be stored, but skip them rather than
        // let a bad row poison the average
        for rating in ratings
            .into_iter()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        {
            distribution[(rating - MIN_RATING) as usize] += 1;
            total += 1;
            sum += i64::from(rating);
        }

        let average_rating = if total == 0 {
            0.0
        } else {
            round_to_tenth(sum as f64 / total as f64)
        };

        Self {
            average_rating,
            total_reviews: total,
            distribution,
        }
    }

    /// Count of reviews that gave exactly `stars`
    pub fn count_for(&self, stars: i16) -> u64 {
        if (MIN_RATING..=MAX_RATING).contains(&stars) {
            self.distribution[(stars - MIN_RATING) as usize]
        } else {
            0
        }
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reviews_means_zero() {
        let summary = RatingSummary::from_ratings(Vec::new());
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.distribution, [0; 5]);
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        // 14 / 3 = 4.666...
        let summary = RatingSummary::from_ratings([5, 5, 4]);
        assert_eq!(summary.average_rating, 4.7);
        assert_eq!(summary.total_reviews, 3);

        // 7 / 4 = 1.75
        let summary = RatingSummary::from_ratings([1, 2, 2, 2]);
        assert_eq!(summary.average_rating, 1.8);
    }

    #[test]
    fn test_distribution_counts_each_star() {
        let summary = RatingSummary::from_ratings([1, 3, 3, 5, 5, 5]);
        assert_eq!(summary.distribution, [1, 0, 2, 0, 3]);
        assert_eq!(summary.count_for(5), 3);
        assert_eq!(summary.count_for(2), 0);
        assert_eq!(summary.count_for(9), 0);
    }

    #[test]
    fn test_out_of_range_ratings_are_ignored() {
        let summary = RatingSummary::from_ratings([0, 6, 4]);
        assert_eq!(summary.total_reviews, 1);
        assert_eq!(summary.average_rating, 4.0);
    }
}
