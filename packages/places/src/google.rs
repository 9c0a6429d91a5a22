//! Google Maps web services adapter.
//!
//! Implements [`Geocoder`] and [`PlacesProvider`] against the JSON
//! Geocoding, Places Nearby Search, and Place Details endpoints. All
//! requests go through [`retry::send_json`](crate::retry::send_json) and
//! carry the configured per-request timeout.
//!
//! See <https://developers.google.com/maps/documentation/places/web-service/search-nearby>

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use site_scout_config::PlacesConfig;
use site_scout_geo_models::Coordinate;
use site_scout_places_models::{NearbyQuery, Place, PlacesPage, RawReview};

use crate::retry::{self, RetryPolicy};
use crate::{Geocoder, PlacesError, PlacesProvider};

/// Google Maps client holding the API key and a pooled HTTP client.
pub struct GoogleMapsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleMapsClient {
    /// Builds a client from [`PlacesConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidInput`] if no API key is configured, or
    /// [`PlacesError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.trim().is_empty() {
            return Err(PlacesError::invalid_input(
                "GOOGLE_MAPS_API_KEY is not configured",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                ..RetryPolicy::default()
            },
        })
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, PlacesError> {
        let url = format!("{}/{endpoint}", self.base_url);
        log::debug!("GET {endpoint} {:?}", params.iter().map(|(k, _)| *k).collect::<Vec<_>>());

        retry::send_json(&self.retry, || {
            self.client
                .get(&url)
                .query(params)
                .query(&[("key", self.api_key.as_str())])
        })
        .await
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, PlacesError> {
        let body = self
            .get("geocode/json", &[("address", query.to_string())])
            .await?;
        parse_geocode(&body)
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<String>, PlacesError> {
        let body = self
            .get("geocode/json", &[("latlng", coordinate.to_query_param())])
            .await?;
        parse_reverse_geocode(&body)
    }
}

#[async_trait]
impl PlacesProvider for GoogleMapsClient {
    async fn nearby_count(
        &self,
        coordinate: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<u64, PlacesError> {
        let query = NearbyQuery::keyword(coordinate, radius_m, category);
        let page = self.nearby_page(&query, None).await?;
        Ok(page.results.len() as u64)
    }

    async fn nearby_page(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        let mut params = vec![
            ("location", query.location.to_query_param()),
            ("radius", format!("{:.0}", query.radius_m)),
        ];
        if let Some(place_type) = &query.place_type {
            params.push(("type", place_type.clone()));
        }
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pagetoken", token.to_string()));
        }

        let body = self.get("place/nearbysearch/json", &params).await?;
        parse_places_page(&body)
    }

    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<RawReview>, PlacesError> {
        let body = self
            .get(
                "place/details/json",
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", "reviews".to_string()),
                ],
            )
            .await?;
        parse_reviews(&body)
    }
}

/// Checks the top-level `status` field.
///
/// Returns `Ok(true)` for `OK`, `Ok(false)` for `ZERO_RESULTS`, and an
/// error for everything else.
fn check_status(body: &serde_json::Value) -> Result<bool, PlacesError> {
    let status = body["status"].as_str().ok_or_else(|| PlacesError::Parse {
        message: "response missing 'status'".to_string(),
    })?;

    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" => Ok(false),
        "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited),
        other => Err(PlacesError::Status {
            status: other.to_string(),
            message: body["error_message"].as_str().unwrap_or_default().to_string(),
        }),
    }
}

fn parse_coordinate(value: &serde_json::Value) -> Option<Coordinate> {
    Coordinate::new(value["lat"].as_f64()?, value["lng"].as_f64()?)
}

/// Parses a Geocoding API response into the first result's location.
fn parse_geocode(body: &serde_json::Value) -> Result<Option<Coordinate>, PlacesError> {
    if !check_status(body)? {
        return Ok(None);
    }

    let Some(first) = body["results"].as_array().and_then(|r| r.first()) else {
        return Ok(None);
    };

    parse_coordinate(&first["geometry"]["location"])
        .map(Some)
        .ok_or_else(|| PlacesError::Parse {
            message: "geocode result missing geometry.location".to_string(),
        })
}

/// Parses a reverse Geocoding API response into the first formatted address.
fn parse_reverse_geocode(body: &serde_json::Value) -> Result<Option<String>, PlacesError> {
    if !check_status(body)? {
        return Ok(None);
    }

    Ok(body["results"]
        .as_array()
        .and_then(|r| r.first())
        .and_then(|r| r["formatted_address"].as_str())
        .filter(|s| !s.trim().is_empty())
        .map(String::from))
}

/// Parses a Nearby Search response page. Results without a usable
/// location or id are skipped.
fn parse_places_page(body: &serde_json::Value) -> Result<PlacesPage, PlacesError> {
    if !check_status(body)? {
        return Ok(PlacesPage::default());
    }

    let results = body["results"].as_array().ok_or_else(|| PlacesError::Parse {
        message: "nearby search response missing 'results' array".to_string(),
    })?;

    let places = results
        .iter()
        .filter_map(|r| {
            let Some(location) = parse_coordinate(&r["geometry"]["location"]) else {
                log::debug!("Skipping place without location: {:?}", r["name"]);
                return None;
            };
            Some(Place {
                place_id: r["place_id"].as_str()?.to_string(),
                name: r["name"].as_str().unwrap_or_default().to_string(),
                location,
                rating: r["rating"].as_f64().unwrap_or(0.0),
                user_ratings_total: r["user_ratings_total"].as_u64().unwrap_or(0),
                vicinity: r["vicinity"].as_str().map(String::from),
                types: r["types"]
                    .as_array()
                    .map(|types| {
                        types
                            .iter()
                            .filter_map(|t| t.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
        })
        .collect();

    let next_page_token = body["next_page_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(String::from);

    Ok(PlacesPage {
        results: places,
        next_page_token,
    })
}

/// Parses a Place Details response into its reviews.
fn parse_reviews(body: &serde_json::Value) -> Result<Vec<RawReview>, PlacesError> {
    if !check_status(body)? {
        return Ok(Vec::new());
    }

    let Some(reviews) = body["result"]["reviews"].as_array() else {
        return Ok(Vec::new());
    };

    Ok(reviews
        .iter()
        .map(|r| {
            let rating = r["rating"].as_u64().unwrap_or(0).clamp(1, 5);
            RawReview {
                author: r["author_name"].as_str().unwrap_or_default().to_string(),
                rating: u8::try_from(rating).unwrap_or(1),
                text: r["text"].as_str().unwrap_or_default().to_string(),
                timestamp: r["time"]
                    .as_i64()
                    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
                    .unwrap_or_default(),
            }
        })
        .collect())
}
