#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for site scouting.
//!
//! Every subcommand prints its result as pretty JSON on stdout; logs go to
//! stderr and are controlled with `RUST_LOG`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use site_scout_config::ScoutConfig;
use site_scout_market::AllowList;
use site_scout_places::google::GoogleMapsClient;
use site_scout_reviews::{LexiconScorer, Vocabulary};

#[derive(Parser)]
#[command(name = "site_scout", about = "Business site scouting and review analysis")]
struct Cli {
    /// TOML configuration file (defaults to `SITE_SCOUT_CONFIG` if set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest the least saturated zones for a business category
    Zones {
        /// Base location: free text or "lat,lng"
        #[arg(long)]
        location: String,
        /// Business category (e.g., "cafe")
        #[arg(long)]
        category: String,
        /// Override the configured grid half-width in meters
        #[arg(long)]
        radius_m: Option<f64>,
        /// Override the configured grid spacing in meters
        #[arg(long)]
        step_m: Option<f64>,
    },
    /// Summarize positive and negative reviews for places
    Reviews {
        /// Place IDs to summarize
        #[arg(required = true)]
        place_ids: Vec<String>,
    },
    /// Report the most and least common business categories nearby
    Trends {
        /// Base location: free text or "lat,lng"
        #[arg(long)]
        location: String,
    },
    /// Summarize competitors for a business category
    Competitors {
        /// Base location: free text or "lat,lng"
        #[arg(long)]
        location: String,
        /// Business category (e.g., "bakery")
        #[arg(long)]
        category: String,
        /// Attach review highlights to each competitor
        #[arg(long)]
        with_reviews: bool,
    },
    /// List competitor coordinates for a heatmap
    Heatmap {
        /// Base location: free text or "lat,lng"
        #[arg(long)]
        location: String,
        /// Business category (e.g., "gym")
        #[arg(long)]
        category: String,
    },
    /// List hostels, schools, and apartments that bring footfall nearby
    Landmarks {
        /// Base location: free text or "lat,lng"
        #[arg(long)]
        location: String,
    },
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = ScoutConfig::load(cli.config.as_deref())?;
    log::debug!("Using places endpoint {}", config.places.base_url);
    let client = GoogleMapsClient::new(&config.places)?;

    match cli.command {
        Commands::Zones {
            location,
            category,
            radius_m,
            step_m,
        } => {
            if let Some(radius_m) = radius_m {
                config.grid.radius_m = radius_m;
            }
            if let Some(step_m) = step_m {
                config.grid.step_m = step_m;
            }
            let zones = site_scout_spatial::suggest_zones(
                &client,
                &client,
                &config.grid,
                &location,
                &category,
            )
            .await?;
            print_json(&zones)?;
        }
        Commands::Reviews { place_ids } => {
            let batch = site_scout_reviews::summarize_places(
                &client,
                &LexiconScorer::builtin(),
                &Vocabulary::builtin(),
                &config.reviews,
                &place_ids,
            )
            .await;
            print_json(&batch)?;
        }
        Commands::Trends { location } => {
            let report = site_scout_market::category_trends(
                &client,
                &client,
                &config,
                &AllowList::builtin(),
                &location,
            )
            .await?;
            print_json(&report)?;
        }
        Commands::Competitors {
            location,
            category,
            with_reviews,
        } => {
            let insights = if with_reviews {
                site_scout_market::competitor_insights_with_reviews(
                    &client,
                    &client,
                    &LexiconScorer::builtin(),
                    &Vocabulary::builtin(),
                    &config,
                    &location,
                    &category,
                )
                .await?
            } else {
                site_scout_market::competitor_insights(
                    &client, &client, &config, &location, &category,
                )
                .await?
            };
            print_json(&insights)?;
        }
        Commands::Heatmap { location, category } => {
            let map =
                site_scout_market::competitor_heatmap(&client, &client, &config, &location, &category)
                    .await?;
            print_json(&map)?;
        }
        Commands::Landmarks { location } => {
            let landmarks =
                site_scout_market::nearby_landmarks(&client, &client, &config, &location).await?;
            print_json(&landmarks)?;
        }
    }

    Ok(())
}
