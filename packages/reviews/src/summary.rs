//! Compact lines and highlight sentences for review groups.

use site_scout_reviews_models::{AspectFlags, ReviewSummary, ScoredReview, SentimentGroup};

/// Keywords shown in a compact line.
pub const COMPACT_KEYWORDS: usize = 6;

const PRAISE_FALLBACK: &str = "overall experience";
const COMPLAINT_FALLBACK: &str = "service quality";

/// Builds the summary of one review group.
///
/// `compact_line` always has exactly three ` | `-separated fields.
#[must_use]
pub fn compose(
    group: SentimentGroup,
    reviews: Vec<ScoredReview>,
    aspects: AspectFlags,
    keywords: Vec<String>,
) -> ReviewSummary {
    let mean_polarity = mean_polarity(&reviews);
    let compact_line = format!(
        "{group} -> S:{mean_polarity:+.2} | A:{} | K:{}",
        aspects.codes(),
        keywords
            .iter()
            .take(COMPACT_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let highlight_sentence = highlight(group, &aspects);

    ReviewSummary {
        group,
        mean_polarity,
        aspects,
        keywords,
        compact_line,
        highlight_sentence,
        reviews,
    }
}

fn mean_polarity(reviews: &[ScoredReview]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = reviews.iter().map(|r| r.polarity).sum::<f64>() / reviews.len() as f64;
    // Avoid printing "-0.00".
    mean + 0.0
}

fn highlight(group: SentimentGroup, aspects: &AspectFlags) -> String {
    match group {
        SentimentGroup::Positive => format!(
            "Customers mostly praised the {}.",
            aspects.names().as_deref().unwrap_or(PRAISE_FALLBACK)
        ),
        SentimentGroup::Negative => format!(
            "Customers mainly complained about the {}.",
            aspects.names().as_deref().unwrap_or(COMPLAINT_FALLBACK)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use site_scout_reviews_models::Aspect;

    fn review(polarity: f64) -> ScoredReview {
        ScoredReview {
            author: "a".to_string(),
            rating: 4,
            text: "text".to_string(),
            timestamp: DateTime::default(),
            polarity,
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn positive_line_with_aspects() {
        let flags = [Aspect::Food, Aspect::Service, Aspect::Time]
            .into_iter()
            .collect();
        let summary = compose(
            SentimentGroup::Positive,
            vec![review(0.8)],
            flags,
            keywords(&["great", "food", "fast", "service"]),
        );
        assert_eq!(
            summary.compact_line,
            "POS -> S:+0.80 | A:FD, SV, TM | K:great, food, fast, service"
        );
        assert_eq!(
            summary.highlight_sentence,
            "Customers mostly praised the food, service, time."
        );
    }

    #[test]
    fn negative_line_without_aspects() {
        let summary = compose(
            SentimentGroup::Negative,
            vec![review(-0.6), review(-0.2)],
            AspectFlags::default(),
            keywords(&["terrible"]),
        );
        assert_eq!(summary.compact_line, "NEG -> S:-0.40 | A:— | K:terrible");
        assert_eq!(
            summary.highlight_sentence,
            "Customers mainly complained about the service quality."
        );
    }

    #[test]
    fn empty_group_still_has_three_fields() {
        let summary = compose(
            SentimentGroup::Positive,
            Vec::new(),
            AspectFlags::default(),
            Vec::new(),
        );
        assert_eq!(summary.compact_line, "POS -> S:+0.00 | A:— | K:");
        assert_eq!(summary.compact_line.split(" | ").count(), 3);
        assert_eq!(
            summary.highlight_sentence,
            "Customers mostly praised the overall experience."
        );
    }

    #[test]
    fn only_six_keywords_in_line() {
        let words = keywords(&["a1", "b2", "c3", "d4", "e5", "f6", "g7", "h8"]);
        let summary = compose(
            SentimentGroup::Positive,
            vec![review(0.1)],
            AspectFlags::default(),
            words,
        );
        assert!(summary.compact_line.ends_with("K:a1, b2, c3, d4, e5, f6"));
        assert_eq!(summary.keywords.len(), 8);
    }
}
