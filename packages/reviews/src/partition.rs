//! Splitting scored reviews into positive and negative groups.

use site_scout_reviews_models::ScoredReview;

/// The two halves of a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Up to `group_size` reviews, highest polarity first.
    pub positive: Vec<ScoredReview>,
    /// Up to `group_size` reviews, lowest polarity first.
    pub negative: Vec<ScoredReview>,
}

/// Takes the `group_size` most positive and the `group_size` most negative
/// reviews.
///
/// The groups are chosen independently, so when there are no more than
/// `group_size` reviews the same review can appear in both. Equal
/// polarities keep their input order.
#[must_use]
pub fn partition(reviews: &[ScoredReview], group_size: usize) -> Partition {
    let mut positive = reviews.to_vec();
    positive.sort_by(|a, b| b.polarity.total_cmp(&a.polarity));
    positive.truncate(group_size);

    let mut negative = reviews.to_vec();
    negative.sort_by(|a, b| a.polarity.total_cmp(&b.polarity));
    negative.truncate(group_size);

    Partition { positive, negative }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn review(text: &str, polarity: f64) -> ScoredReview {
        ScoredReview {
            author: "a".to_string(),
            rating: 3,
            text: text.to_string(),
            timestamp: DateTime::default(),
            polarity,
        }
    }

    fn texts(reviews: &[ScoredReview]) -> Vec<&str> {
        reviews.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn two_reviews_overlap() {
        let reviews = vec![review("good", 0.8), review("bad", -0.6)];
        let p = partition(&reviews, 5);
        assert_eq!(texts(&p.positive), vec!["good", "bad"]);
        assert_eq!(texts(&p.negative), vec!["bad", "good"]);
    }

    #[test]
    fn groups_are_capped() {
        let reviews: Vec<ScoredReview> = (0..8)
            .map(|i| review(&i.to_string(), f64::from(i) / 10.0))
            .collect();
        let p = partition(&reviews, 5);
        assert_eq!(texts(&p.positive), vec!["7", "6", "5", "4", "3"]);
        assert_eq!(texts(&p.negative), vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let reviews = vec![review("a", 0.5), review("b", 0.5), review("c", 0.5)];
        let p = partition(&reviews, 2);
        assert_eq!(texts(&p.positive), vec!["a", "b"]);
        assert_eq!(texts(&p.negative), vec!["a", "b"]);
    }

    #[test]
    fn empty_input() {
        let p = partition(&[], 5);
        assert!(p.positive.is_empty());
        assert!(p.negative.is_empty());
    }
}
