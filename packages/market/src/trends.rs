//! Category trend aggregation over a paginated nearby search.
//!
//! Pages are fetched strictly one after another: each request needs the
//! continuation token from the previous response, and the provider only
//! honours a token after a short delay, so [`TrendConfig::page_delay`] is
//! waited between fetches.

use std::collections::HashMap;

use site_scout_config::TrendConfig;
use site_scout_market_models::{CategoryCount, TrendReport};
use site_scout_places::{PlacesError, PlacesProvider};
use site_scout_places_models::NearbyQuery;

use crate::allow_list::AllowList;

/// Categories reported at each end of the ranking.
pub const REPORTED_CATEGORIES: usize = 5;

/// Category tallies in first-encounter order.
#[derive(Debug, Default)]
struct Tally {
    counts: Vec<CategoryCount>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, category: &str) {
        if let Some(&i) = self.index.get(category) {
            self.counts[i].count += 1;
        } else {
            self.index.insert(category.to_owned(), self.counts.len());
            self.counts.push(CategoryCount {
                category: category.to_owned(),
                count: 1,
            });
        }
    }

    fn into_report(self, pages_fetched: u32, truncated: bool) -> TrendReport {
        if self.counts.is_empty() {
            return TrendReport::NoData;
        }

        let mut top = self.counts.clone();
        top.sort_by(|a, b| b.count.cmp(&a.count));
        top.truncate(REPORTED_CATEGORIES);

        let mut bottom = self.counts;
        bottom.sort_by_key(|c| c.count);
        bottom.truncate(REPORTED_CATEGORIES);

        TrendReport::Categories {
            top_categories: top,
            bottom_categories: bottom,
            pages_fetched,
            truncated,
        }
    }
}

/// Counts allow-listed category tags across every result page of `query`.
///
/// Fetches at most `config.max_pages` pages. A failure on a later page, or
/// reaching the page limit while a continuation token remains, stops
/// pagination and marks the report as truncated.
///
/// # Errors
///
/// Returns the provider's error if the first page cannot be fetched.
pub async fn aggregate(
    places: &(impl PlacesProvider + ?Sized),
    query: &NearbyQuery,
    config: &TrendConfig,
    allow_list: &AllowList,
) -> Result<TrendReport, PlacesError> {
    let max_pages = config.max_pages.max(1);
    let mut tally = Tally::default();
    let mut token: Option<String> = None;
    let mut pages_fetched = 0;
    let mut truncated = false;

    loop {
        if pages_fetched > 0 && !config.page_delay().is_zero() {
            tokio::time::sleep(config.page_delay()).await;
        }

        let page = match places.nearby_page(query, token.as_deref()).await {
            Ok(page) => page,
            Err(e) if pages_fetched == 0 => return Err(e),
            Err(e) => {
                log::warn!("Stopping trend pagination after {pages_fetched} page(s): {e}");
                truncated = true;
                break;
            }
        };
        pages_fetched += 1;

        for place in &page.results {
            for tag in &place.types {
                if allow_list.contains(tag) {
                    tally.add(tag);
                }
            }
        }

        token = page.next_page_token;
        if token.is_none() {
            break;
        }
        if pages_fetched >= max_pages {
            log::debug!("Reached page limit ({max_pages}); more results were available");
            truncated = true;
            break;
        }
    }

    log::debug!(
        "Counted {} categories over {pages_fetched} page(s)",
        tally.counts.len()
    );
    Ok(tally.into_report(pages_fetched, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_geo_models::Coordinate;
    use site_scout_places::memory::MemoryPlaces;
    use site_scout_places_models::Place;
    use std::time::Duration;

    fn place(id: &str, types: &[&str]) -> Place {
        Place {
            place_id: id.to_string(),
            name: id.to_string(),
            location: Coordinate { lat: 0.0, lng: 0.0 },
            rating: 4.0,
            user_ratings_total: 10,
            vicinity: None,
            types: types.iter().map(ToString::to_string).collect(),
        }
    }

    fn query() -> NearbyQuery {
        NearbyQuery::place_type(Coordinate { lat: 12.9, lng: 77.6 }, 3000.0, "establishment")
    }

    fn config() -> TrendConfig {
        TrendConfig::default().with_page_delay(Duration::ZERO)
    }

    fn names(counts: &[CategoryCount]) -> Vec<(&str, u64)> {
        counts.iter().map(|c| (c.category.as_str(), c.count)).collect()
    }

    #[tokio::test]
    async fn counts_across_pages_sequentially() {
        let places = MemoryPlaces::new().with_pages(vec![
            vec![
                place("1", &["cafe", "food", "establishment"]),
                place("2", &["bakery", "cafe"]),
            ],
            vec![place("3", &["gym"]), place("4", &["cafe"])],
            vec![place("5", &["bakery", "point_of_interest"])],
        ]);

        let report = aggregate(&places, &query(), &config(), &AllowList::builtin())
            .await
            .unwrap();

        assert_eq!(
            places.page_requests(),
            vec![None, Some("page-1".to_string()), Some("page-2".to_string())]
        );
        let TrendReport::Categories {
            top_categories,
            bottom_categories,
            pages_fetched,
            truncated,
        } = report
        else {
            panic!("expected categories");
        };
        assert_eq!(pages_fetched, 3);
        assert!(!truncated);
        assert_eq!(
            names(&top_categories),
            vec![("cafe", 3), ("bakery", 2), ("gym", 1)]
        );
        assert_eq!(
            names(&bottom_categories),
            vec![("gym", 1), ("bakery", 2), ("cafe", 3)]
        );
    }

    #[tokio::test]
    async fn ties_follow_encounter_order() {
        let places = MemoryPlaces::new().with_pages(vec![vec![
            place("1", &["bar", "spa", "atm", "bank", "gym", "cafe", "doctor"]),
            place("2", &["doctor"]),
        ]]);
        let report = aggregate(&places, &query(), &config(), &AllowList::builtin())
            .await
            .unwrap();
        let TrendReport::Categories {
            top_categories,
            bottom_categories,
            ..
        } = report
        else {
            panic!("expected categories");
        };
        assert_eq!(
            names(&top_categories),
            vec![("doctor", 2), ("bar", 1), ("spa", 1), ("atm", 1), ("bank", 1)]
        );
        assert_eq!(
            names(&bottom_categories),
            vec![("bar", 1), ("spa", 1), ("atm", 1), ("bank", 1), ("gym", 1)]
        );
    }

    #[tokio::test]
    async fn nothing_allow_listed_is_no_data() {
        let places = MemoryPlaces::new().with_pages(vec![vec![
            place("1", &["point_of_interest", "establishment"]),
            place("2", &["food"]),
        ]]);
        let report = aggregate(&places, &query(), &config(), &AllowList::builtin())
            .await
            .unwrap();
        assert_eq!(report, TrendReport::NoData);
    }

    #[tokio::test]
    async fn empty_search_is_no_data() {
        let places = MemoryPlaces::new();
        let report = aggregate(&places, &query(), &config(), &AllowList::builtin())
            .await
            .unwrap();
        assert!(report.is_no_data());
    }

    #[tokio::test]
    async fn first_page_failure_is_fatal() {
        let places = MemoryPlaces::new()
            .with_pages(vec![vec![place("1", &["cafe"])]])
            .with_failing_page(0);
        let result = aggregate(&places, &query(), &config(), &AllowList::builtin()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn later_page_failure_truncates() {
        let places = MemoryPlaces::new()
            .with_pages(vec![
                vec![place("1", &["cafe"])],
                vec![place("2", &["gym"])],
                vec![place("3", &["bar"])],
            ])
            .with_failing_page(1);
        let report = aggregate(&places, &query(), &config(), &AllowList::builtin())
            .await
            .unwrap();
        let TrendReport::Categories {
            top_categories,
            pages_fetched,
            truncated,
            ..
        } = report
        else {
            panic!("expected categories");
        };
        assert!(truncated);
        assert_eq!(pages_fetched, 1);
        assert_eq!(names(&top_categories), vec![("cafe", 1)]);
        assert_eq!(places.page_requests().len(), 2);
    }

    #[tokio::test]
    async fn page_limit_is_respected() {
        let pages = (0..10).map(|i| vec![place(&i.to_string(), &["cafe"])]).collect();
        let places = MemoryPlaces::new().with_pages(pages);
        let config = TrendConfig {
            max_pages: 3,
            ..config()
        };
        let report = aggregate(&places, &query(), &config, &AllowList::builtin())
            .await
            .unwrap();
        assert_eq!(places.page_requests().len(), 3);
        assert!(matches!(
            report,
            TrendReport::Categories {
                pages_fetched: 3,
                truncated: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn last_page_at_the_limit_is_complete() {
        let pages = (0..3).map(|i| vec![place(&i.to_string(), &["cafe"])]).collect();
        let places = MemoryPlaces::new().with_pages(pages);
        let config = TrendConfig {
            max_pages: 3,
            ..config()
        };
        let report = aggregate(&places, &query(), &config, &AllowList::builtin())
            .await
            .unwrap();
        assert!(matches!(
            report,
            TrendReport::Categories {
                pages_fetched: 3,
                truncated: false,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_pages() {
        let places = MemoryPlaces::new().with_pages(vec![
            vec![place("1", &["cafe"])],
            vec![place("2", &["cafe"])],
            vec![place("3", &["cafe"])],
        ]);
        let start = tokio::time::Instant::now();
        aggregate(&places, &query(), &TrendConfig::default(), &AllowList::builtin())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
